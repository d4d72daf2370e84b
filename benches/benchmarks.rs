//! Performance benchmarks for ferro-genbank
//!
//! Run with: cargo bench
//! Run specific benchmark: cargo bench -- locations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferro_genbank::genbank::parse_str;
use ferro_genbank::{evaluate, parse_location, ParseConfig};

/// Deterministic ACGT sequence of the given length
fn synthetic_sequence(len: usize) -> String {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            b"ACGT"[(state % 4) as usize] as char
        })
        .collect()
}

/// A GenBank record with `n_features` split features over `len` bases
fn synthetic_record(len: usize, n_features: usize) -> String {
    let seq = synthetic_sequence(len).to_lowercase();
    let mut text = format!("LOCUS       BENCH {len} bp DNA linear SYN 01-JAN-2024\n");
    text.push_str("DEFINITION  synthetic benchmark record.\n");
    text.push_str("ACCESSION   BENCH\n");
    text.push_str("FEATURES             Location/Qualifiers\n");
    let span = len / n_features;
    for i in 0..n_features {
        let start = i * span + 1;
        let mid = start + span / 2;
        let end = start + span - 1;
        let location = if i % 2 == 0 {
            format!("join({start}..{},{}..{end})", mid - 1, mid + 1)
        } else {
            format!("complement({start}..{end})")
        };
        text.push_str(&format!("     CDS             {location}\n"));
        text.push_str(&format!("                     /gene=\"g{i}\"\n"));
        text.push_str(&format!("                     /locus_tag=\"B{i:05}\"\n"));
        text.push_str("                     /note=\"synthetic feature whose note wraps\n");
        text.push_str("                     onto a second line\"\n");
    }
    text.push_str("ORIGIN\n");
    for (i, chunk) in seq.as_bytes().chunks(60).enumerate() {
        let groups: Vec<&str> = chunk
            .chunks(10)
            .filter_map(|g| std::str::from_utf8(g).ok())
            .collect();
        text.push_str(&format!("{:>9} {}\n", i * 60 + 1, groups.join(" ")));
    }
    text.push_str("//\n");
    text
}

// =============================================================================
// Location benchmarks
// =============================================================================

fn bench_location_parsing(c: &mut Criterion) {
    let expressions = vec![
        ("range", "340..565"),
        ("fuzzy", "<345..>500"),
        ("point", "467"),
        ("complement", "complement(3300..4037)"),
        ("join", "join(12..78,134..202,400..450,500..612)"),
        (
            "nested",
            "complement(join(complement(1..5),order(7,9..12),20..30))",
        ),
        ("cross_ref", "join(1..100,J00194.1:100..202)"),
    ];

    let mut group = c.benchmark_group("locations");
    for (name, raw) in &expressions {
        group.bench_with_input(BenchmarkId::new("parse", name), raw, |b, raw| {
            b.iter(|| parse_location(black_box(raw)))
        });
    }
    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let seq = synthetic_sequence(100_000);
    let cases = vec![
        ("range_1kb", "1001..2000"),
        ("complement_1kb", "complement(1001..2000)"),
        ("join_4x250", "join(1..250,1001..1250,5001..5250,9001..9250)"),
        ("complement_join_10kb", "complement(join(1..5000,50001..55000))"),
    ];

    let mut group = c.benchmark_group("evaluation");
    for (name, raw) in &cases {
        let loc = parse_location(raw).unwrap();
        let bases: u64 = loc.ranges().iter().map(|r| r.len()).sum();
        group.throughput(Throughput::Bytes(bases));
        group.bench_with_input(BenchmarkId::new("evaluate", name), &loc, |b, loc| {
            b.iter(|| evaluate(black_box(loc), seq.as_str()))
        });
    }
    group.finish();
}

// =============================================================================
// Whole-file benchmarks
// =============================================================================

fn bench_file_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("files");
    group.sample_size(20);
    for &(len, n_features) in &[(10_000usize, 50usize), (100_000, 500), (1_000_000, 2_000)] {
        let text = synthetic_record(len, n_features);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("parse", format!("{len}bp_{n_features}f")),
            &text,
            |b, text| b.iter(|| parse_str(black_box(text), &ParseConfig::default())),
        );
    }
    group.finish();
}

fn bench_feature_sequences(c: &mut Criterion) {
    let text = synthetic_record(100_000, 500);
    let mut group = c.benchmark_group("feature_sequences");
    group.throughput(Throughput::Elements(500));

    group.bench_function("uncached", |b| {
        let config = ParseConfig::default().with_cache_sequences(false);
        let record = parse_str(&text, &config).unwrap().record;
        b.iter(|| {
            for feature in record.features() {
                let _ = black_box(feature.sequence());
            }
        })
    });

    group.bench_function("cached", |b| {
        let record = parse_str(&text, &ParseConfig::default()).unwrap().record;
        b.iter(|| {
            for feature in record.features() {
                let _ = black_box(feature.sequence());
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_location_parsing,
    bench_evaluation,
    bench_file_parsing,
    bench_feature_sequences,
);

criterion_main!(benches);
