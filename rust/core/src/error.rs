// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for STL ingestion
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while sniffing or decoding an STL file
#[derive(Error, Debug)]
pub enum Error {
    /// Neither a `solid` text header nor a size-consistent binary layout
    #[error("Unrecognized STL format: {reason}")]
    Format { reason: String },

    /// Malformed ASCII content (1-based line number)
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Binary stream ended inside a triangle record
    #[error("Unexpected end of binary STL in triangle {triangle} (byte offset {offset})")]
    Truncated { triangle: u32, offset: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Parse,
    Io,
}

impl Error {
    pub fn format(reason: impl Into<String>) -> Self {
        Error::Format {
            reason: reason.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }

    /// Which failure family this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format { .. } => ErrorKind::Format,
            Error::Parse { .. } | Error::Truncated { .. } => ErrorKind::Parse,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Format => "format",
            ErrorKind::Parse => "parse",
            ErrorKind::Io => "io",
        };
        f.write_str(name)
    }
}
