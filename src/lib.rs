//! # fm-csa
//!
//! **FM-index core: LF-mapping and a compressed suffix array**
//!
//! > "Store every k-th suffix array entry. Walk back to the nearest one for the rest."
//!
//! ## Architecture
//!
//! - **Rank Dictionary**: [SuperBlock(4 x u64)|Block(u64)] per 32 BWT symbols, one popcount per query
//! - **Prefix Sums**: cumulative symbol counts (the `C` array)
//! - **LF Table**: `LF(i) = Rank(c, i] + C[c] - 1`
//! - **Compressed Suffix Array**: sampled entries plus LF walks, fewer than `k` steps each
//!
//! ## Performance
//!
//! | Operation | Time | Space |
//! |-----------|------|-------|
//! | Rank (2-bit) | **O(1)** | N / 4 bytes + N / 32 × 32 bytes |
//! | LF-mapping | **O(1)** | - |
//! | CSA value | O(k) | N / k entries + N bits |
//! | Count | **O(M)** | O(1) |
//! | Locate | O(M + occ × k) | **O(1)** (iterator) |
//!
//! ## Example
//!
//! ```
//! use fm_csa::{bwt, Alphabet, CompressedSuffixArray, LfTable};
//!
//! let text = b"banana$";
//! let sa = bwt::suffix_array(text);
//! let lf = LfTable::from_bwt(&bwt::bwt(text, &sa), Alphabet::from_text(text).unwrap()).unwrap();
//!
//! let mut csa = CompressedSuffixArray::<usize, &LfTable>::new();
//! csa.create_compressed_sa(&sa, 2).unwrap();
//! csa.set_lf_table(&lf);
//!
//! // Every entry is recovered, sampled or not.
//! assert!(csa.iter().eq(sa.iter().copied()));
//! ```
//!
//! Full-text search on top of it:
//!
//! ```
//! use fm_csa::FmIndex;
//!
//! let index = FmIndex::build(b"abracadabra", 4).unwrap();
//! assert_eq!(index.count(b"abra"), 2);
//! assert!(index.contains(b"cadabra"));
//! assert_eq!(index.locate(b"abra").len(), 2);
//! ```

pub mod alphabet;
pub mod bitvec;
pub mod bwt;
pub mod config;
pub mod csa;
pub mod error;
pub mod lf_table;
pub mod persist;
pub mod prefix_sum;
pub mod rank_dictionary;
pub mod sa_entry;
pub mod search;
pub mod sparse;

pub use alphabet::Alphabet;
pub use bitvec::BitVector;
pub use config::{OpenMode, SamplingConfig};
pub use csa::CompressedSuffixArray;
pub use error::{Error, Result};
pub use lf_table::LfTable;
pub use persist::Fibre;
pub use prefix_sum::PrefixSumTable;
pub use rank_dictionary::{RankDictionary, RankKind};
pub use sa_entry::{SaEntry, SeqPos};
pub use search::FmIndex;
pub use sparse::SparseSampledArray;

/// Version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn banana() -> (Vec<usize>, LfTable) {
        let text = b"banana$";
        let sa = bwt::suffix_array(text);
        let lf = LfTable::from_bwt(&bwt::bwt(text, &sa), Alphabet::from_text(text).unwrap()).unwrap();
        (sa, lf)
    }

    #[test]
    fn test_banana_end_to_end() {
        let (sa, lf) = banana();
        let mut csa = CompressedSuffixArray::<usize, &LfTable>::new();
        csa.create_compressed_sa(&sa, 2).unwrap();
        csa.set_lf_table(&lf);

        let sampled: Vec<usize> = (0..sa.len()).filter(|&p| csa.is_stored(p)).collect();
        assert_eq!(sampled, vec![0, 4, 5, 6]);
        assert_eq!(csa.iter().collect::<Vec<_>>(), sa);
    }

    #[test]
    fn test_shared_table_outlives_builder() {
        let (sa, lf) = banana();
        let lf = Arc::new(lf);
        let csa = {
            let mut csa = CompressedSuffixArray::<usize>::new();
            csa.create_compressed_sa(&sa, 3).unwrap();
            csa.set_lf_table(Arc::clone(&lf));
            csa
        };
        drop(lf);
        assert_eq!(csa.value(1), 5);
    }

    #[test]
    fn test_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LfTable>();
        assert_send_sync::<CompressedSuffixArray<u64>>();
        assert_send_sync::<CompressedSuffixArray<SeqPos, &LfTable>>();
        assert_send_sync::<FmIndex>();
    }
}
