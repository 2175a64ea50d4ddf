//! 路径解析性能基准测试

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dstu_core::dstu::path_parser::{build, parse, parse_checked};
use dstu_core::dstu::path_security::validate_path;
use dstu_core::dstu::path_types::infer_type;

fn benchmark_path_parsing(c: &mut Criterion) {
    c.bench_function("parse_nested_resource", |b| {
        b.iter(|| {
            let parsed = parse(black_box("/高考复习/函数/三角函数/note_abc123"));
            black_box(parsed);
        })
    });

    c.bench_function("parse_checked_nested_resource", |b| {
        b.iter(|| {
            let parsed = parse_checked(black_box("/高考复习/函数/三角函数/note_abc123"));
            black_box(parsed.is_ok());
        })
    });

    c.bench_function("parse_virtual", |b| {
        b.iter(|| {
            let parsed = parse(black_box("/@trash/note_abc123"));
            black_box(parsed);
        })
    });
}

fn benchmark_validation(c: &mut Criterion) {
    c.bench_function("validate_path_ok", |b| {
        b.iter(|| {
            let result = validate_path(black_box("/我的教材/第一章/tb_xyz789"));
            black_box(result.is_ok());
        })
    });

    c.bench_function("validate_path_bypass", |b| {
        b.iter(|| {
            let result = validate_path(black_box("/我的教材\u{FF0F}第一章/tb_xyz789"));
            black_box(result.is_err());
        })
    });

    c.bench_function("infer_type", |b| {
        b.iter(|| {
            let t = infer_type(black_box("file_1234567890"));
            black_box(t);
        })
    });
}

fn benchmark_build(c: &mut Criterion) {
    c.bench_function("build_nested_resource", |b| {
        b.iter(|| {
            let path = build(black_box(Some("/高考复习/函数")), black_box("note_abc123"));
            black_box(path.is_ok());
        })
    });
}

criterion_group!(
    benches,
    benchmark_path_parsing,
    benchmark_validation,
    benchmark_build
);
criterion_main!(benches);
