//! Snake on a fixed grid with solid walls, played in the terminal.
//!
//! [`board`] holds the game rules and can be driven without a terminal;
//! [`game`] wires it up to crossterm input and output.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod render;
pub mod term;
