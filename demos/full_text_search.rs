//! FM-Index Full-Text Search Example
//!
//! Builds an index, searches it, resolves suffix array entries through the
//! compressed suffix array and round-trips the fibres through disk.
//!
//! ```bash
//! cargo run --example full_text_search
//! ```

use fm_csa::bwt::multi_suffix_array;
use fm_csa::{Alphabet, CompressedSuffixArray, FmIndex, LfTable, SeqPos};

fn main() -> fm_csa::Result<()> {
    println!("=== fm-csa Demo ===\n");

    let text = b"the quick brown fox jumps over the lazy dog. \
                 the fox was quick and the dog was lazy. \
                 a quick brown dog outfoxed a lazy fox.";

    println!("Text ({} bytes):", text.len());
    println!("  \"{}\"", String::from_utf8_lossy(text));

    // Every 4th text offset keeps its suffix array entry
    let index = FmIndex::build(text, 4)?;

    println!("\n--- Search Results ---\n");

    let queries = ["fox", "the", "quick", "lazy", "cat", "brown fox"];

    for query in &queries {
        let count = index.count(query.as_bytes());
        let mut positions = index.locate_all(query.as_bytes());
        positions.sort_unstable();

        if count > 0 {
            println!("  \"{}\" -> {} occurrences at positions {:?}", query, count, positions);
        } else {
            println!("  \"{}\" -> not found", query);
        }
    }

    println!("\n--- Compressed Suffix Array ---\n");
    let csa = index.suffix_array();
    let walks: Vec<usize> = (0..csa.len()).map(|pos| csa.value_and_steps(pos).1).collect();
    println!(
        "  {} entries, {} stored, longest walk {} LF steps",
        csa.len(),
        csa.sparse().values().len(),
        walks.iter().max().copied().unwrap_or(0)
    );
    println!("  rank layout: {:?}", index.lf_table().rank_kind());
    println!("  heap: {} bytes", index.heap_bytes());

    println!("\n--- Collections ---\n");
    let reads: [&[u8]; 3] = [b"GATTACA", b"CAT", b"TACGATTA"];
    let multi = multi_suffix_array(&reads);
    let lf = LfTable::from_bwt(&multi.bwt, Alphabet::from_text(&multi.text)?)?;
    let mut reads_csa = CompressedSuffixArray::<SeqPos, &LfTable>::new();
    reads_csa.create_compressed_sa(&multi.suffix_array, 3)?;
    reads_csa.set_lf_table(&lf);
    for (pos, entry) in reads_csa.iter().enumerate().take(8) {
        println!("  SA[{}] = {:?}", pos, entry);
    }

    println!("\n--- Persistence ---\n");
    let base = std::env::temp_dir().join("fm_csa_demo");
    index.save(&base)?;
    let loaded = FmIndex::open(&base)?;
    println!(
        "  reopened from {}: count(\"quick\") = {}, compression factor {}",
        base.display(),
        loaded.count(b"quick"),
        loaded.compression_factor()
    );

    Ok(())
}
