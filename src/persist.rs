//! At-rest serialization of index fibres.
//!
//! Every fibre lives in its own file next to a common base path:
//! `<base>.occ`, `<base>.psum`, `<base>.ind`, `<base>.val`.
//!
//! File layout:
//! - magic: 6 bytes (`FMCSA1`)
//! - fibre tag: 1 byte
//! - bincode payload of the fibre

use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::OpenMode;
use crate::error::{Error, Result};

const MAGIC: &[u8; 6] = b"FMCSA1";

/// Named sub-structures that are persisted independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fibre {
    /// Rank dictionary over the BWT (part of the LF table).
    OccTable,
    /// Cumulative symbol counts (part of the LF table).
    PrefixSumTable,
    /// Sampled-position bits of the sparse suffix array.
    Indicators,
    /// Stored suffix array entries of the sparse suffix array.
    Values,
}

impl Fibre {
    pub fn extension(self) -> &'static str {
        match self {
            Fibre::OccTable => "occ",
            Fibre::PrefixSumTable => "psum",
            Fibre::Indicators => "ind",
            Fibre::Values => "val",
        }
    }

    fn tag(self) -> u8 {
        match self {
            Fibre::OccTable => 1,
            Fibre::PrefixSumTable => 2,
            Fibre::Indicators => 3,
            Fibre::Values => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Fibre::OccTable => "occurrence table",
            Fibre::PrefixSumTable => "prefix sum table",
            Fibre::Indicators => "indicator",
            Fibre::Values => "values",
        }
    }

    /// File holding this fibre for the given base path.
    ///
    /// The extension is appended, never substituted: `idx/genome.fa`
    /// becomes `idx/genome.fa.occ`.
    pub fn path(self, base: &Path) -> PathBuf {
        let mut name = base.as_os_str().to_owned();
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }
}

pub(crate) fn save_fibre<T: Serialize>(
    value: &T,
    fibre: Fibre,
    base: &Path,
    mode: OpenMode,
) -> Result<()> {
    if !mode.can_write() {
        return Err(Error::InvalidOpenMode(mode, "saving"));
    }
    if mode.contains(OpenMode::APPEND) {
        return Err(Error::InvalidOpenMode(mode, "appending"));
    }
    let path = fibre.path(base);
    let file = mode.save_options().open(&path)?;
    let mut out = BufWriter::new(file);
    out.write_all(MAGIC)?;
    out.write_all(&[fibre.tag()])?;
    bincode::serialize_into(&mut out, value)?;
    out.flush()?;
    log::info!("saved {} fibre to {}", fibre.name(), path.display());
    Ok(())
}

pub(crate) fn open_fibre<T: DeserializeOwned>(
    fibre: Fibre,
    base: &Path,
    mode: OpenMode,
) -> Result<T> {
    if !mode.can_read() {
        return Err(Error::InvalidOpenMode(mode, "opening"));
    }
    let path = fibre.path(base);
    let file = mode.load_options().open(&path)?;
    let mut input = BufReader::new(file);

    let mut header = [0u8; 7];
    input.read_exact(&mut header)?;
    if &header[..6] != MAGIC || header[6] != fibre.tag() {
        return Err(Error::BadMagic(fibre.name()));
    }

    let value = bincode::deserialize_from(&mut input)?;
    log::info!("opened {} fibre from {}", fibre.name(), path.display());
    Ok(value)
}
