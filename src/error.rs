use thiserror::Error;

use crate::board::MIN_DIMENSION;

/// Errors raised when building a board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error(
        "invalid dimensions {height}x{width}: both must be {min} or greater",
        min = MIN_DIMENSION
    )]
    InvalidDimensions { height: usize, width: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_message() {
        let err = BoardError::InvalidDimensions { height: 1, width: 5 };
        assert_eq!(err.to_string(), "invalid dimensions 1x5: both must be 2 or greater");
    }
}
