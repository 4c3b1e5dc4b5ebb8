//! Ordered byte alphabets.
//!
//! Each symbol gets a dense code equal to its rank in alphabet order. The
//! rank dictionary packs codes, so an alphabet of at most four symbols maps
//! onto 2-bit codes in exactly this order (`A=0, C=1, G=2, T=3` for DNA).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const ABSENT: u8 = u8::MAX;

/// Largest alphabet that fits the 2-bit block layout.
pub const TWO_BIT_SIGMA: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    /// Symbols in ascending order; index = code.
    symbols: Vec<u8>,
    /// Byte -> code lookup, `ABSENT` for foreign bytes. Always 256 long.
    codes: Vec<u8>,
}

impl Alphabet {
    /// Build an alphabet from strictly increasing symbols.
    pub fn new(symbols: &[u8]) -> Result<Self> {
        if symbols.is_empty() {
            return Err(Error::InvalidAlphabet("no symbols".to_string()));
        }
        // 256 symbols would make the last code collide with ABSENT.
        if symbols.len() > 255 {
            return Err(Error::InvalidAlphabet(format!(
                "{} symbols exceed the 255 symbol limit",
                symbols.len()
            )));
        }
        if let Some(w) = symbols.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::InvalidAlphabet(format!(
                "symbols must be strictly increasing, found {:#04x} before {:#04x}",
                w[0], w[1]
            )));
        }

        let mut codes = vec![ABSENT; 256];
        for (code, &sym) in symbols.iter().enumerate() {
            codes[sym as usize] = code as u8;
        }
        Ok(Self {
            symbols: symbols.to_vec(),
            codes,
        })
    }

    /// The four DNA bases in canonical order.
    pub fn dna() -> Self {
        let mut codes = vec![ABSENT; 256];
        for (code, &sym) in b"ACGT".iter().enumerate() {
            codes[sym as usize] = code as u8;
        }
        Self {
            symbols: b"ACGT".to_vec(),
            codes,
        }
    }

    /// Smallest alphabet covering every byte of `text`.
    pub fn from_text(text: &[u8]) -> Result<Self> {
        let mut seen = [false; 256];
        for &b in text {
            seen[b as usize] = true;
        }
        let symbols: Vec<u8> = (0..=255u8).filter(|&b| seen[b as usize]).collect();
        Self::new(&symbols)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Rank of `symbol` within the alphabet.
    #[inline]
    pub fn code(&self, symbol: u8) -> Option<u8> {
        match self.codes[symbol as usize] {
            ABSENT => None,
            code => Some(code),
        }
    }

    /// Symbol for a code. Panics if `code >= len()`.
    #[inline]
    pub fn symbol(&self, code: u8) -> u8 {
        self.symbols[code as usize]
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Whether the bit-parallel 2-bit rank path applies.
    #[inline]
    pub fn is_two_bit(&self) -> bool {
        self.len() <= TWO_BIT_SIGMA
    }

    /// Map every byte of `text` to its code.
    pub fn encode(&self, text: &[u8]) -> Result<Vec<u8>> {
        text.iter()
            .enumerate()
            .map(|(position, &symbol)| {
                self.code(symbol)
                    .ok_or(Error::InvalidSymbol { symbol, position })
            })
            .collect()
    }

    /// Check the lookup table against the symbol list after decoding.
    pub(crate) fn check(&self) -> Result<()> {
        if self.codes.len() != 256 || self.symbols.len() > 255 {
            return Err(Error::Corrupt("alphabet lookup table".to_string()));
        }
        let consistent = self
            .symbols
            .iter()
            .enumerate()
            .all(|(code, &sym)| self.codes[sym as usize] as usize == code);
        let mapped = self.codes.iter().filter(|&&c| c != ABSENT).count();
        if !consistent || mapped != self.symbols.len() {
            return Err(Error::Corrupt("alphabet lookup table".to_string()));
        }
        Ok(())
    }
}
