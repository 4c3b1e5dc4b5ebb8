//! Build-time sampling configuration and file open modes.

use core::fmt;
use core::ops::BitOr;

use crate::error::{Error, Result};

/// Default sampling interval of the compressed suffix array.
pub const DEFAULT_COMPRESSION_FACTOR: usize = 4;

/// Controls which suffix array entries are stored explicitly.
///
/// An entry is stored iff its within-sequence offset is divisible by
/// `compression_factor`, so every sequence start is sampled and a lookup
/// needs fewer than `compression_factor` LF steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingConfig {
    pub(crate) compression_factor: usize,
    pub(crate) offset: usize,
}

impl SamplingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store every `compression_factor`-th text offset. A larger factor
    /// means a smaller index but longer backward walks. The default is `4`.
    pub fn compression_factor(self, compression_factor: usize) -> Self {
        Self {
            compression_factor,
            ..self
        }
    }

    /// Number of leading positions that are reserved and never sampled.
    /// Used when an array is assembled from several parts. The default is `0`.
    pub fn offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    pub fn get_compression_factor(&self) -> usize {
        self.compression_factor
    }

    pub fn get_offset(&self) -> usize {
        self.offset
    }

    /// Reject configurations that would divide by zero during sampling.
    pub fn validate(&self) -> Result<()> {
        if self.compression_factor == 0 {
            return Err(Error::InvalidCompressionFactor(self.compression_factor));
        }
        Ok(())
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            compression_factor: DEFAULT_COMPRESSION_FACTOR,
            offset: 0,
        }
    }
}

/// Flags describing how a fibre file is opened.
///
/// Files are always opened in binary mode.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenMode(u8);

impl OpenMode {
    pub const READ: OpenMode = OpenMode(0b0001);
    pub const WRITE: OpenMode = OpenMode(0b0010);
    pub const READ_WRITE: OpenMode = OpenMode(0b0011);
    /// Create the file if it is missing.
    pub const CREATE: OpenMode = OpenMode(0b0100);
    /// Append instead of truncating. A fibre file holds exactly one record,
    /// so fibre saves reject this flag.
    pub const APPEND: OpenMode = OpenMode(0b1000);

    /// Mode used by `open` when none is given.
    pub const DEFAULT_LOAD: OpenMode = OpenMode::READ;
    /// Mode used by `save` when none is given.
    pub const DEFAULT_SAVE: OpenMode = OpenMode(0b0110);

    #[inline]
    pub fn contains(self, other: OpenMode) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    pub(crate) fn can_read(self) -> bool {
        self.contains(OpenMode::READ)
    }

    pub(crate) fn can_write(self) -> bool {
        self.contains(OpenMode::WRITE)
    }

    /// Options for loading: read only, whatever else is set. Loading never
    /// modifies the file.
    pub(crate) fn load_options(self) -> std::fs::OpenOptions {
        let mut options = std::fs::OpenOptions::new();
        options.read(true);
        options
    }

    /// Options for saving: the file is replaced by exactly one record.
    pub(crate) fn save_options(self) -> std::fs::OpenOptions {
        let mut options = std::fs::OpenOptions::new();
        options
            .write(true)
            .create(self.contains(OpenMode::CREATE))
            .truncate(true);
        options
    }
}

impl BitOr for OpenMode {
    type Output = OpenMode;

    fn bitor(self, rhs: OpenMode) -> OpenMode {
        OpenMode(self.0 | rhs.0)
    }
}

impl fmt::Debug for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (OpenMode::READ, "READ"),
            (OpenMode::WRITE, "WRITE"),
            (OpenMode::CREATE, "CREATE"),
            (OpenMode::APPEND, "APPEND"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            f.write_str("OpenMode(empty)")
        } else {
            write!(f, "OpenMode({})", set.join(" | "))
        }
    }
}
