use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fm_csa::bwt::{bwt, suffix_array, SENTINEL};
use fm_csa::{Alphabet, CompressedSuffixArray, FmIndex, LfTable, RankDictionary};

fn generate_dna(size: usize) -> Vec<u8> {
    // xorshift, fixed seed
    let mut state = 0x2545_f491_4f6c_dd1du64;
    let mut text = Vec::with_capacity(size + 1);
    while text.len() < size {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        text.push(b"ACGT"[(state >> 62) as usize]);
    }
    text
}

fn generate_text(size: usize) -> Vec<u8> {
    let words = [
        "the ", "quick ", "brown ", "fox ", "jumps ", "over ", "lazy ", "dog ",
        "genome ", "read ", "suffix ", "array ", "rank ", "select ", "sample ",
    ];
    let mut text = Vec::with_capacity(size);
    let mut i = 0;
    while text.len() < size {
        text.extend_from_slice(words[i % words.len()].as_bytes());
        i += 1;
    }
    text.truncate(size);
    text
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let n = 1 << 16;

    let four: Vec<u8> = generate_dna(n).iter().map(|&b| (b >> 1) & 3).collect();
    let two_bit = RankDictionary::build(&four, 4);
    group.bench_function("two_bit", |b| {
        let mut pos = 0usize;
        b.iter(|| {
            pos = (pos + 7919) % n;
            two_bit.rank(black_box(pos), black_box((pos & 3) as u8))
        })
    });

    let eight: Vec<u8> = (0..n).map(|i| ((i * 31) % 8) as u8).collect();
    let scan = RankDictionary::build(&eight, 8);
    group.bench_function("scan", |b| {
        let mut pos = 0usize;
        b.iter(|| {
            pos = (pos + 7919) % n;
            scan.rank(black_box(pos), black_box((pos & 7) as u8))
        })
    });
    group.finish();
}

fn bench_csa_value(c: &mut Criterion) {
    let mut text = generate_dna(20_000);
    text.push(SENTINEL);
    let sa = suffix_array(&text);
    let lf = LfTable::from_bwt_with_sentinel(&bwt(&text, &sa), Alphabet::dna()).unwrap();

    let mut group = c.benchmark_group("csa_value");
    for factor in [1, 4, 16, 32] {
        let mut csa = CompressedSuffixArray::<usize, &LfTable>::new();
        csa.create_compressed_sa(&sa, factor).unwrap();
        csa.set_lf_table(&lf);
        group.bench_with_input(BenchmarkId::new("factor", factor), &csa, |b, csa| {
            let mut pos = 0usize;
            b.iter(|| {
                pos = (pos + 7919) % text.len();
                csa.value(black_box(pos))
            })
        });
    }
    group.finish();
}

fn bench_build_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");

    for size in [1_000, 10_000, 50_000] {
        let text = generate_text(size);
        group.bench_with_input(BenchmarkId::new("bytes", size), &text, |b, text| {
            b.iter(|| FmIndex::build(black_box(text), 4))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let text = generate_text(100_000);
    let index = match FmIndex::build(&text, 8) {
        Ok(index) => index,
        Err(e) => panic!("index build failed: {}", e),
    };

    let mut group = c.benchmark_group("count");
    for pattern in ["fox", "the quick", "suffix array rank select"] {
        group.bench_with_input(
            BenchmarkId::new("pattern", pattern),
            pattern.as_bytes(),
            |b, pat| b.iter(|| index.count(black_box(pat))),
        );
    }
    group.finish();

    c.bench_function("locate_all_genome", |b| {
        b.iter(|| black_box(index.locate_all(black_box(b"genome")).len()))
    });
}

criterion_group!(
    benches,
    bench_rank,
    bench_csa_value,
    bench_build_index,
    bench_search,
);
criterion_main!(benches);
