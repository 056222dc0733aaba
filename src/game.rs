use std::{process::exit, time::{Duration, Instant}};

use anyhow::{bail, Result};
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use log::{debug, error, info};
use rand::rngs::StdRng;

use crate::board::{self, Board, Direction::{*, self}, Outcome};
use crate::render::Frame;
use crate::term::{self, TermManager};
use Command::*;

const POLL_INTERVAL_MS: u64 = 10;

const START_LINES: &[&str] = &[
    "Press W, A, S or D to start!",
    "",
    "Arrow keys work too",
    "Esc to pause",
    "CTRL+C to quit",
];
const PAUSE_LINES: &[&str] = &["Paused", "Press Esc to resume", "or Ctrl+C to quit"];
const WON_LINE: &str = "Congratulations, you won!";
const LOST_LINE: &str = "Game Over!";
const REPLAY_LINE: &str = "Play again? (Y/N)";
const INVALID_ANSWER_LINE: &str = "Please answer with 'Y' or 'N'";

/// What a key press means to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Quit,
    Ignored,
}

/// How a wait for the player's next move ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Steer {
    Turn(Direction),
    KeepGoing,
    Quit,
}

/// Where keys come from while the snake is moving.
pub trait Controls {
    /// Waits up to `timeout` for a key. Also returns how long it actually waited.
    fn next_key(&mut self, timeout: Duration) -> Result<(Option<KeyEvent>, Duration)>;

    fn set_paused(&mut self, paused: bool) -> Result<()>;
}

impl Controls for TermManager {
    fn next_key(&mut self, timeout: Duration) -> Result<(Option<KeyEvent>, Duration)> {
        let started = Instant::now();
        let key = self.poll_key(timeout)?;
        Ok((key, started.elapsed()))
    }

    fn set_paused(&mut self, paused: bool) -> Result<()> {
        if paused {
            self.show_message(PAUSE_LINES)?;
        } else {
            self.hide_message()?;
        }
        Ok(())
    }
}

pub struct SnakeGame {
    height: usize,
    width: usize,
    paused: bool,
    term: TermManager,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new(height: usize, width: usize, rng: StdRng) -> Result<Self> {
        board::check_dimensions(height, width)?;
        Ok(SnakeGame { height, width, paused: false, term: TermManager::new(), rng })
    }

    /// Checks the board fits on screen and takes over the terminal.
    pub fn initialize(&mut self) -> Result<()> {
        let (cols, rows) = TermManager::size()?;
        let (needed_cols, needed_rows) = required_terminal(self.height, self.width);

        if needed_cols > cols as usize || needed_rows > rows as usize {
            bail!(
                "a {}x{} board needs a terminal of at least {} columns and {} rows, \
                 this one has {} and {}",
                self.height, self.width, needed_cols, needed_rows, cols, rows
            );
        }

        self.term.setup()?;
        Ok(())
    }

    /// Plays one round to the end. Returns whether the player asked for
    /// another one.
    pub fn play(&mut self) -> Result<bool> {
        let mut board = Board::new(self.height, self.width)?;
        board.bake_food(&mut self.rng);
        self.paused = false;
        info!("New game on a {}x{} board", self.height, self.width);

        self.draw(&board)?;
        self.term.show_message(START_LINES)?;
        let start = self.wait_for_start()?;
        self.term.hide_message()?;

        board.launch(start, &mut self.rng);
        self.draw(&board)?;

        while !board.is_over() {
            let requested = match wait_for_turn(
                &mut self.term,
                board.speed(),
                board.direction(),
                &mut self.paused,
            )? {
                Steer::Turn(dir) => Some(dir),
                Steer::KeepGoing => None,
                Steer::Quit => self.clean_exit(),
            };
            board.tick(requested, &mut self.rng);
            self.draw(&board)?;
        }

        info!("Game finished: {:?} at size {}", board.outcome(), board.size());
        self.ask_replay(&board)
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.term.restore()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw(&mut self, board: &Board) -> Result<()> {
        self.term.draw_frame(Frame::from_board(board))?;
        Ok(())
    }

    fn wait_for_start(&mut self) -> Result<Direction> {
        loop {
            match key_command(&self.term.read_key_blocking()?) {
                Turn(dir) => return Ok(dir),
                Quit => self.clean_exit(),
                TogglePause | Ignored => {}
            }
        }
    }

    fn ask_replay(&mut self, board: &Board) -> Result<bool> {
        let headline = if board.outcome() == Outcome::Won { WON_LINE } else { LOST_LINE };
        let size_line = format!("Size: {}", board.size());
        let mut lines = vec![headline, &*size_line, "", REPLAY_LINE];

        self.term.show_message(&lines)?;

        loop {
            let ev = self.term.read_key_blocking()?;
            if is_ctrl_c(&ev) {
                self.clean_exit();
            }

            match replay_answer(&ev) {
                Some(again) => {
                    debug!("Replay answer: {}", again);
                    self.term.hide_message()?;
                    return Ok(again);
                }
                None if !lines.contains(&INVALID_ANSWER_LINE) => {
                    lines.push(INVALID_ANSWER_LINE);
                    self.term.show_message(&lines)?;
                }
                None => {}
            }
        }
    }

    fn clean_exit(&mut self) -> ! {
        info!("Quit by player");
        if let Err(e) = self.term.restore() {
            error!("Could not restore the terminal: {}", e);
        }
        exit(0);
    }
}

/// Gives the player `speed` polling intervals to turn. Only a real change of
/// course ends the wait early; running out of time means carrying on. Time
/// spent paused does not count.
pub fn wait_for_turn<C: Controls>(
    controls: &mut C,
    speed: u32,
    current: Direction,
    paused: &mut bool,
) -> Result<Steer> {
    let interval = Duration::from_millis(POLL_INTERVAL_MS);
    let mut budget = interval * speed;

    while *paused || budget > Duration::from_millis(0) {
        let timeout = if *paused { interval } else { budget.min(interval) };
        let (key, waited) = controls.next_key(timeout)?;

        if !*paused {
            budget = budget.checked_sub(waited).unwrap_or_default();
        }

        if let Some(ev) = key {
            match key_command(&ev) {
                Turn(dir) if !*paused && is_turn(dir, current) => return Ok(Steer::Turn(dir)),
                TogglePause => {
                    *paused = !*paused;
                    debug!("Paused: {}", *paused);
                    controls.set_paused(*paused)?;
                }
                Quit => return Ok(Steer::Quit),
                Turn(_) | Ignored => {}
            }
        }
    }

    Ok(Steer::KeepGoing)
}

/// Terminal columns and rows needed for the board, its status line and the
/// largest message box shown over it.
pub fn required_terminal(height: usize, width: usize) -> (usize, usize) {
    let max_size_line = format!("Size: {}", height.saturating_mul(width));
    let replay_lines = [WON_LINE, &*max_size_line, "", REPLAY_LINE, INVALID_ANSWER_LINE];

    [START_LINES, PAUSE_LINES, &replay_lines[..]]
        .iter()
        .map(|&lines| term::message_footprint(lines))
        .fold(Frame::footprint(height, width), |(cols, rows), (msg_cols, msg_rows)| {
            (cols.max(msg_cols), rows.max(msg_rows))
        })
}

pub fn key_command(ev: &KeyEvent) -> Command {
    match ev {
        ev if is_ctrl_c(ev) => Quit,
        KeyEvent { code, modifiers: _ } => match code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Turn(Up),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Turn(Left),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Turn(Down),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Turn(Right),
            KeyCode::Esc => TogglePause,
            _ => Ignored,
        }
    }
}

/// `Some(true)` for yes, `Some(false)` for no, `None` for anything else.
pub fn replay_answer(ev: &KeyEvent) -> Option<bool> {
    match ev.code {
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'y') => Some(true),
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'n') => Some(false),
        _ => None,
    }
}

fn is_turn(requested: Direction, current: Direction) -> bool {
    requested != current && requested != current.opposite()
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
