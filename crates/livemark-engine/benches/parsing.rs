use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use livemark_engine::{
    DeltaTransaction, DocumentSession, IncrementalMarkdownParser, MarkdownParser, ParseReason,
};
use pulldown_cmark::Parser;
mod common;

fn bench_pulldown_cmark_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);
    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = Parser::new(std::hint::black_box(&content));
            let events: Vec<_> = parser.collect();
            std::hint::black_box(events);
        });
    });
    group.bench_function("full_parse", |b| {
        let parser = IncrementalMarkdownParser::default();
        b.iter(|| parser.parse_full(std::hint::black_box(&content), ParseReason::FullParse));
    });

    group.finish();
}

fn bench_single_character_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit");
    group.sample_size(20);

    for sections in [10, 100, 1000] {
        let text = common::generate_note(sections);
        let at = common::middle_paragraph_offset(&text);
        let tx = DeltaTransaction::from_edits(&text, &[(at..at, "x")]);

        group.bench_with_input(BenchmarkId::new("incremental", sections), &tx, |b, tx| {
            b.iter_batched(
                || {
                    let mut session = DocumentSession::new();
                    session.set_text(&text);
                    session
                },
                |mut session| session.apply_transaction(tx),
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("set_text", sections), &text, |b, text| {
            b.iter_batched(
                || {
                    let mut session = DocumentSession::new();
                    session.set_text(text);
                    session
                },
                |mut session| session.set_text(&format!("{text}x")),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pulldown_cmark_baseline, bench_single_character_edit);
criterion_main!(benches);
