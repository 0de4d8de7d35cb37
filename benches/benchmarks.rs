use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mail_triage::dates::{DateExtractor, ExtractionStrategy};
use mail_triage::errors::ProviderError;

fn extraction_benchmarks(c: &mut Criterion) {
    let extractor = DateExtractor::new()
        .with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());

    c.bench_function("extract_date_and_time", |b| {
        b.iter(|| {
            black_box(extractor.extract(black_box(
                "Hi team, the quarterly review is on April 10th, 2025 at 3:00 PM. \
                 Please confirm your attendance before the end of the week.",
            )))
        })
    });

    c.bench_function("extract_no_date", |b| {
        b.iter(|| {
            black_box(extractor.extract(black_box(
                "Your order has shipped and should arrive within 3-5 business days.",
            )))
        })
    });

    let raw = DateExtractor::new().with_strategy(ExtractionStrategy::AllMatchesRaw);
    c.bench_function("extract_all_matches_raw", |b| {
        b.iter(|| {
            black_box(raw.extract(black_box(
                "Deadlines: April 10th, 2025, then 04/11/2025, final cut 2025-04-12.",
            )))
        })
    });
}

fn error_benchmarks(c: &mut Criterion) {
    c.bench_function("create_provider_error", |b| {
        b.iter(|| black_box(ProviderError::Unavailable("Test error".into())))
    });
}

criterion_group!(benches, extraction_benchmarks, error_benchmarks);
criterion_main!(benches);
