use criterion::{Criterion, black_box, criterion_group, criterion_main};
use settings_fs::io::{self, RobustnessConfig};
use settings_fs::{NormalizedPath, compute_content_checksum};
use tempfile::tempdir;

fn write_atomic_benchmark(c: &mut Criterion) {
    c.bench_function("io::write_atomic", |b| {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("Settings.json"));
        let content = "{\n  \"primitives\": []\n}\n".as_bytes();
        let config = RobustnessConfig {
            enable_fsync: false,
            ..RobustnessConfig::default()
        };

        b.iter(|| {
            io::write_atomic(black_box(&path), black_box(content), config).unwrap();
        })
    });
}

fn checksum_benchmark(c: &mut Criterion) {
    let content = "{\"type\": \"f32\", \"key\": \"volume\", \"value\": 0.8}\n".repeat(500);

    c.bench_function("checksum::compute_content_checksum (500 entries)", |b| {
        b.iter(|| compute_content_checksum(black_box(&content)))
    });
}

criterion_group!(benches, write_atomic_benchmark, checksum_benchmark);
criterion_main!(benches);
