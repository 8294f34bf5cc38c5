//! General error types for the parser

use std::fmt::{Display, Formatter};

use thiserror::Error as ThisError;

use crate::coords::Coords;

/// Global result type used throughout the parser stages
pub type ParserResult<T> = Result<T, Error>;

/// Enumeration of the various different parser stages that can produce an error
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Byte to character decoding, prior to lexing
    Decoder,
    /// The lexer stage of the parser
    Lexer,
    /// The parsing/tree construction stage of the parser
    Parser,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Decoder => write!(f, "decoder"),
            Stage::Lexer => write!(f, "lexer"),
            Stage::Parser => write!(f, "parser"),
        }
    }
}

/// A global enumeration of error codes
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Details {
    /// The bytes could not be fully decoded with the selected encoding (UTF-8 or ASCII)
    #[error("input contains bytes outside of the selected encoding")]
    InvalidEncodedInput,
    #[error("unknown character '{0}'")]
    InvalidCharacter(char),
    #[error("unknown escape character '{0}'")]
    InvalidEscapeSequence(char),
    #[error("invalid number '{0}'")]
    InvalidNumericRepresentation(String),
    #[error("end of input found whilst parsing string")]
    UnterminatedString,
    #[error("expected an object or array, found '{0}'")]
    InvalidRootObject(String),
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("unexpected token: {0}, expected: ':'")]
    PairExpected(String),
    #[error("end of input found whilst parsing object")]
    UnterminatedObject,
    #[error("end of input found whilst parsing array")]
    UnterminatedArray,
    #[error("unexpected token after the root value: {0}")]
    TrailingInput(String),
    #[error("maximum nesting depth of {0} exceeded")]
    MaxDepthExceeded(usize),
}

/// The general error structure
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The originating stage for the error
    pub stage: Stage,
    /// The global error code for the error
    pub details: Details,
    /// Optional parser coordinates
    pub coords: Option<Coords>,
}

impl Error {
    pub fn is_lexer_error(&self) -> bool {
        self.stage == Stage::Lexer
    }

    pub fn is_parser_error(&self) -> bool {
        self.stage == Stage::Parser
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.coords {
            Some(coords) => write!(f, "{} error at {}: {}", self.stage, coords, self.details),
            None => write!(f, "{} error: {}", self.stage, self.details),
        }
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! decoder_error {
    ($details: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Decoder,
            details: $details,
            coords: None,
        })
    };
}

#[macro_export]
macro_rules! lexer_error {
    ($details: expr, $coords : expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Lexer,
            details: $details,
            coords: Some($coords),
        })
    };
}

#[macro_export]
macro_rules! parser_error {
    ($details: expr, $coords: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Parser,
            details: $details,
            coords: Some($coords),
        })
    };
}
