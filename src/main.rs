use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use simplelog::{Config, WriteLogger};

use term_snake::{config, game};

fn main() -> Result<()> {
    let args = config::Args::parse();

    // The screen belongs to the game, so logs go to a file
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("cannot create log file {}", args.log_file.display()))?;
    WriteLogger::init(args.log_level(), Config::default(), log_file)
        .context("failed to initialize logger")?;

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Starting snake: {}x{} board, seed {}", args.height, args.width, seed);

    let mut game = game::SnakeGame::new(args.height, args.width, StdRng::seed_from_u64(seed))?;
    game.initialize()?;

    // CTRL+C exits from inside the game loop
    while game.play()? {}

    game.shutdown()?;
    info!("Bye");
    Ok(())
}
