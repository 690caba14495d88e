use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character {0:?} at byte offset {1}")]
    UnexpectedChar(char, usize),

    #[error("unterminated number literal at byte offset {0}")]
    UnterminatedNumber(usize),

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEof(&'static str),

    #[error("unexpected token {0:?}, expected {1}")]
    UnexpectedToken(String, &'static str),

    #[error("unknown identifier {0:?}")]
    UnknownIdentifier(String),

    #[error("wrong argument count for {0:?}: expected {1}, got {2}")]
    ArityMismatch(&'static str, usize, usize),

    #[error("trailing input after a complete expression: {0:?}")]
    TrailingInput(String),
}
