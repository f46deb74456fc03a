//! Contains the Error and Result type used across the crate.

use std::fmt;

use crate::scan::ScanError;
use crate::Tag;

/// Errors that can occur while materializing, writing or loading NBT data.
#[derive(Debug)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An underlying IO operation failed.
    Io,
    /// Truncated input.
    UnexpectedEof,
    /// Unknown tag id, possibly input read with the wrong byte order.
    InvalidTag,
    /// The scanner's caller-supplied stack budget was exhausted.
    DepthExceeded,
    /// The scanner's tag index could not be grown.
    OutOfMemory,
    /// The top-level structure of a file was not a compound.
    NoRootCompound,
    /// A list element did not match the list's element type.
    IncompatibleListItem,
    /// A value could not be coerced to the tag type a schema expects.
    Cast,
    /// A strict schema rejected a key it does not define.
    UnknownKey,
    /// Anything else.
    Other,
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub(crate) fn unexpected_eof() -> Error {
        Error {
            msg: "eof: unexpectedly ran out of input".to_owned(),
            kind: ErrorKind::UnexpectedEof,
        }
    }

    pub(crate) fn invalid_tag(tag: u8) -> Error {
        Error {
            msg: format!("invalid nbt tag value: {}", tag),
            kind: ErrorKind::InvalidTag,
        }
    }

    pub(crate) fn no_root_compound(found: Tag) -> Error {
        Error {
            msg: format!("invalid nbt: root tag is {}, not a compound", found),
            kind: ErrorKind::NoRootCompound,
        }
    }

    pub(crate) fn incompatible_item(expected: Tag, found: Tag) -> Error {
        Error {
            msg: format!("list of {} cannot hold a {} tag", expected, found),
            kind: ErrorKind::IncompatibleListItem,
        }
    }

    pub(crate) fn cast(found: Tag, expected: Tag) -> Error {
        Error {
            msg: format!("cannot cast {} to {}", found, expected),
            kind: ErrorKind::Cast,
        }
    }

    pub(crate) fn unknown_key(key: &str) -> Error {
        Error {
            msg: format!("schema does not define key {:?}", key),
            kind: ErrorKind::UnknownKey,
        }
    }

    pub(crate) fn bespoke(msg: impl Into<String>) -> Error {
        Error {
            msg: msg.into(),
            kind: ErrorKind::Other,
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        let kind = match e.kind() {
            std::io::ErrorKind::UnexpectedEof => ErrorKind::UnexpectedEof,
            _ => ErrorKind::Io,
        };
        Error {
            msg: format!("io error: {}", e),
            kind,
        }
    }
}

impl From<ScanError> for Error {
    fn from(e: ScanError) -> Self {
        let kind = match e {
            ScanError::UnexpectedEof => ErrorKind::UnexpectedEof,
            ScanError::InvalidType(_) => ErrorKind::InvalidTag,
            ScanError::DepthExceeded => ErrorKind::DepthExceeded,
            ScanError::OutOfMemory => ErrorKind::OutOfMemory,
        };
        Error {
            msg: e.to_string(),
            kind,
        }
    }
}
