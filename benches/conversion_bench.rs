use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use psconvert::{Converter, Direction, DirectionDetector, MappingStore, SuggestionEngine};
use std::sync::Arc;

/// Benchmark mapping store construction (pattern compilation and reverse indexes)
fn bench_store_construction(c: &mut Criterion) {
    c.bench_function("mapping_store_new", |b| {
        b.iter(|| MappingStore::new().unwrap());
    });
}

/// Benchmark single and chained conversions in both directions
fn bench_conversion(c: &mut Criterion) {
    let converter = Converter::with_builtin_mappings().unwrap();
    let mut group = c.benchmark_group("convert");

    let inputs = [
        ("basic", "dir", Direction::CmdToPowerShell),
        ("pattern", "taskkill /im notepad.exe /f", Direction::CmdToPowerShell),
        ("switches", "xcopy C:\\src D:\\dst /s /e /y /z", Direction::CmdToPowerShell),
        ("chained", "cd C:\\temp && dir /s /b && del *.tmp /s /q", Direction::CmdToPowerShell),
        ("reverse", "Copy-Item -Path a -Destination b -Recurse -Force", Direction::PowerShellToCmd),
        ("auto", "Get-ChildItem -Recurse | Where-Object Length -gt 1MB", Direction::Auto),
        ("unknown", "frobnicate --all", Direction::CmdToPowerShell),
    ];

    for (name, input, direction) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| converter.convert(black_box(input), direction));
        });
    }

    group.finish();
}

/// Benchmark direction detection
fn bench_detection(c: &mut Criterion) {
    let detector = DirectionDetector::new();
    c.bench_function("detect", |b| {
        b.iter(|| detector.detect(black_box("Get-Process | Sort-Object CPU -Descending")));
    });
}

/// Benchmark similarity suggestions over the whole CMD table
fn bench_suggestions(c: &mut Criterion) {
    let engine = SuggestionEngine::new(Arc::new(MappingStore::new().unwrap()));
    let mut group = c.benchmark_group("suggest");

    for input in &["dier", "tasklst", "ipconfg", "xyzzyplugh"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| engine.suggest(black_box(input)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_store_construction,
    bench_conversion,
    bench_detection,
    bench_suggestions
);
criterion_main!(benches);
