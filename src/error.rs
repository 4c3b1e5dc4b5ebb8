//! Error types for index construction and fibre persistence.
//!
//! Query operations (`rank`, `lf_mapping`, `value`) have no error channel:
//! out-of-range positions are caller bugs and trip debug assertions.

use thiserror::Error;

/// Error variants for building, saving and opening index fibres.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred while reading or writing a fibre file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The fibre payload could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// The file does not start with the expected fibre header.
    #[error("bad magic for {0} fibre")]
    BadMagic(&'static str),

    /// The decoded fibre is structurally inconsistent.
    #[error("corrupt fibre: {0}")]
    Corrupt(String),

    /// The alphabet is empty, unsorted or contains duplicates.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// A text byte is not part of the alphabet.
    #[error("symbol {symbol:#04x} at position {position} is not in the alphabet")]
    InvalidSymbol {
        /// Offending byte.
        symbol: u8,
        /// Position of the byte in the scanned text.
        position: usize,
    },

    /// Sampling requires a compression factor of at least 1.
    #[error("invalid compression factor: {0}")]
    InvalidCompressionFactor(usize),

    /// The open mode does not allow the requested operation.
    #[error("open mode {0:?} does not permit {1}")]
    InvalidOpenMode(crate::config::OpenMode, &'static str),

    /// An out-of-band terminated BWT must hold exactly one sentinel byte.
    #[error("BWT holds {0} sentinel bytes, expected exactly one")]
    SentinelCount(usize),

    /// The text handed to the facade already contains the sentinel byte.
    #[error("text contains the sentinel byte at position {0}")]
    SentinelInText(usize),
}

/// A specialized Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;
