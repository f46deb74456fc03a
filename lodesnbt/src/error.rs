//! Contains the Error and Result type used by the parser.

use std::fmt;

use lodenbt::Tag;

/// An error produced while parsing sNBT, located by line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    line: u32,
    col: u32,
    msg: String,
    kind: ErrorKind,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Input does not follow the sNBT grammar.
    Syntax,
    /// A numeric literal with an explicit suffix is out of the suffix's
    /// range.
    NumericRange,
    /// A list mixed elements of different types.
    HeterogeneousList,
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 1-based line of the offending token.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column of the offending token.
    pub fn col(&self) -> u32 {
        self.col
    }

    pub(crate) fn syntax(line: u32, col: u32, msg: impl Into<String>) -> Error {
        Error {
            line,
            col,
            msg: msg.into(),
            kind: ErrorKind::Syntax,
        }
    }

    pub(crate) fn numeric_range(line: u32, col: u32, msg: impl Into<String>) -> Error {
        Error {
            line,
            col,
            msg: msg.into(),
            kind: ErrorKind::NumericRange,
        }
    }

    pub(crate) fn heterogeneous(line: u32, col: u32, expected: Tag, found: Tag) -> Error {
        Error {
            line,
            col,
            msg: format!("expected a {} element but got a {}", expected, found),
            kind: ErrorKind::HeterogeneousList,
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.msg, self.line, self.col)
    }
}
