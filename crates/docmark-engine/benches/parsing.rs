use criterion::{Criterion, criterion_group, criterion_main};
use docmark_engine::{CommentConfig, CommentParser};
use pulldown_cmark::Parser;
mod common;

fn bench_pulldown_cmark_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = common::generate_long_details(100);
    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = Parser::new(std::hint::black_box(&content));
            let events: Vec<_> = parser.collect();
            std::hint::black_box(events);
        });
    });

    group.finish();
}

fn bench_comment_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("comments");
    let parser = CommentParser::new(&CommentConfig::default()).unwrap();

    let function = common::generate_function_comment(8);
    group.bench_function("function_comment", |b| {
        b.iter(|| {
            let parsed = parser.parse(std::hint::black_box(&function), true);
            std::hint::black_box(parsed)
        });
    });

    let details = common::generate_long_details(100);
    group.bench_function("long_details", |b| {
        b.iter(|| {
            let parsed = parser.parse(std::hint::black_box(&details), true);
            std::hint::black_box(parsed)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pulldown_cmark_baseline, bench_comment_parsing);
criterion_main!(benches);
