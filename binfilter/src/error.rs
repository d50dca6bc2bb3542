//! Error types for mask parsing and record filtering.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskParseError {
    #[error("Empty mask")]
    Empty,

    #[error("Invalid mask '{input}': expected a decimal, 0x-prefixed hex or 0-prefixed octal number")]
    Invalid { input: String },

    #[error("Mask '{input}' is outside [0, 0xFFFF]")]
    OutOfRange { input: String },
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Failed to open input file {}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create output file {}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read record")]
    Read(#[source] io::Error),

    /// Also covers short writes, which surface as [`io::ErrorKind::WriteZero`].
    #[error("Failed to write record")]
    Write(#[source] io::Error),

    #[error("Failed to flush output")]
    Flush(#[source] io::Error),
}
