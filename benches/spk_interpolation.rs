//! Benchmarks of the SPK type 2 reader
//!
//!   cargo bench --bench spk_interpolation
//!   cargo bench spk_interpolation -- spk_interpolation/record_parse
use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use eclipsis::jpl_ephem::naif::ephemeris_record::EphemerisRecord;
use eclipsis::jpl_ephem::{NaifData, NaifId};

/// DE4xx lunar segments use 13 coefficients per axis over 4 day records.
const NCOEFF: usize = 13;
const INTLEN: f64 = 4.0 * 86_400.0;

fn random_record(rng: &mut StdRng, mid: f64) -> EphemerisRecord {
    let mut axis = || {
        (0..NCOEFF)
            .map(|k| rng.random_range(-1.0..1.0) * 4e5 / (1 << k) as f64)
            .collect::<Vec<_>>()
    };
    EphemerisRecord {
        mid,
        radius: INTLEN / 2.0,
        x: axis(),
        y: axis(),
        z: axis(),
    }
}

fn record_bytes(record: &EphemerisRecord) -> Vec<u8> {
    [record.mid, record.radius]
        .iter()
        .chain(&record.x)
        .chain(&record.y)
        .chain(&record.z)
        .flat_map(|v| v.to_le_bytes())
        .collect()
}

/// Minimal kernel: file record, summary record, one Moon segment of `n` records.
fn moon_kernel(rng: &mut StdRng, n: usize) -> Vec<u8> {
    let mut file = vec![0u8; 2 * 1024];
    file[0..8].copy_from_slice(b"DAF/SPK ");
    file[8..12].copy_from_slice(&2i32.to_le_bytes());
    file[12..16].copy_from_slice(&6i32.to_le_bytes());
    file[76..80].copy_from_slice(&2i32.to_le_bytes());
    file[80..84].copy_from_slice(&2i32.to_le_bytes());
    file[88..96].copy_from_slice(b"LTL-IEEE");

    let first_addr = file.len() / 8 + 1;
    for k in 0..n {
        let mid = (k as f64 + 0.5) * INTLEN;
        file.extend(record_bytes(&random_record(rng, mid)));
    }
    let rsize = (2 + 3 * NCOEFF) as f64;
    for v in [0.0, INTLEN, rsize, n as f64] {
        file.extend_from_slice(&f64::to_le_bytes(v));
    }
    let last_addr = file.len() / 8;

    let base = 1024;
    file[base + 16..base + 24].copy_from_slice(&1f64.to_le_bytes());
    file[base + 24..base + 32].copy_from_slice(&0f64.to_le_bytes());
    file[base + 32..base + 40].copy_from_slice(&(n as f64 * INTLEN).to_le_bytes());
    for (j, v) in [301, 3, 1, 2, first_addr as i32, last_addr as i32]
        .iter()
        .enumerate()
    {
        file[base + 40 + 4 * j..base + 44 + 4 * j].copy_from_slice(&v.to_le_bytes());
    }
    file
}

fn bench_interpolate(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EC1_1B5E);
    let record = random_record(&mut rng, 0.0);

    c.bench_function("spk_interpolation/record_interpolate", |b| {
        b.iter_batched(
            || {
                (0..1_000)
                    .map(|_| rng.random_range(-INTLEN / 2.0..INTLEN / 2.0))
                    .collect::<Vec<_>>()
            },
            |times| {
                for et in times {
                    black_box(record.interpolate(black_box(et)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let bytes = record_bytes(&random_record(&mut rng, 0.0));

    c.bench_function("spk_interpolation/record_parse", |b| {
        b.iter(|| EphemerisRecord::parse_record(black_box(&bytes), NCOEFF))
    });
}

fn bench_segment_lookup(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 2_000;
    let kernel = moon_kernel(&mut rng, n);
    let naif = NaifData::from_reader(&mut Cursor::new(kernel.clone()), None)
        .expect("synthetic kernel");

    c.bench_function("spk_interpolation/load_segment_2000_records", |b| {
        b.iter(|| NaifData::from_reader(&mut Cursor::new(black_box(&kernel)), None))
    });

    c.bench_function("spk_interpolation/naif_ephemeris", |b| {
        b.iter_batched(
            || rng.random_range(0.0..n as f64 * INTLEN),
            |et| black_box(naif.ephemeris(NaifId::Moon, NaifId::EarthMoonBarycenter, et)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_interpolate, bench_parse, bench_segment_lookup);
criterion_main!(benches);
