use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

pub const DEFAULT_HEIGHT: usize = 15;
pub const DEFAULT_WIDTH: usize = 30;
pub const DEFAULT_LOG_FILE: &str = "snake.log";

/// Snake in the terminal. Steer with WASD or the arrow keys.
#[derive(Parser, Debug, Clone)]
#[command(name = "snake", version)]
pub struct Args {
    /// Number of rows on the board (at least 2).
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,
    /// Number of columns on the board (at least 2).
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_WIDTH)]
    pub width: usize,
    /// Seed for food placement. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Where log output goes. The terminal itself is taken by the game.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
    /// Log more detail; repeat for even more.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["snake"]).unwrap();

        assert_eq!(args.height, DEFAULT_HEIGHT);
        assert_eq!(args.width, DEFAULT_WIDTH);
        assert_eq!(args.seed, None);
        assert_eq!(args.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(args.log_level(), LevelFilter::Info);
    }

    #[test]
    fn test_explicit_values() {
        let args = Args::try_parse_from([
            "snake",
            "--height",
            "8",
            "--width",
            "12",
            "--seed",
            "42",
            "--log-file",
            "/tmp/s.log",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.height, 8);
        assert_eq!(args.width, 12);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.log_file, PathBuf::from("/tmp/s.log"));
        assert_eq!(args.log_level(), LevelFilter::Trace);
    }

    #[test]
    fn test_small_dimensions_parse_but_negative_do_not() {
        // Dimensions below 2 are rejected by the board, not the parser
        let args = Args::try_parse_from(["snake", "--height", "1"]).unwrap();
        assert_eq!(args.height, 1);

        assert!(Args::try_parse_from(["snake", "--width", "-3"]).is_err());
        assert!(Args::try_parse_from(["snake", "--width", "wide"]).is_err());
    }
}
