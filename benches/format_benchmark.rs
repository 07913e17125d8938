//! Benchmarks for vkrfmt formatting performance.
//!
//! Run with: cargo bench
//!
//! Documents are synthetic theses built in memory.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vkrfmt::{Document, FormatOptions, ParagraphClassifier, Requirements, StrategyKind, VkrFormatter};

/// Creates a thesis with a title page, contents and the given number of chapters.
fn create_test_thesis(chapters: usize) -> Document {
    let mut doc = Document::new();
    doc.add_paragraph("МИНИСТЕРСТВО НАУКИ И ВЫСШЕГО ОБРАЗОВАНИЯ");
    doc.add_paragraph("ВЫПУСКНАЯ КВАЛИФИКАЦИОННАЯ РАБОТА");
    doc.add_paragraph("СОДЕРЖАНИЕ");
    for i in 1..=chapters {
        doc.add_paragraph(&format!("{}. Глава номер {}........{}", i, i, i * 10));
    }
    doc.add_paragraph("ВВЕДЕНИЕ");
    doc.add_paragraph("Актуальность темы исследования обусловлена ростом числа документов.");

    for i in 1..=chapters {
        doc.add_paragraph(&format!("{}. ГЛАВА НОМЕР {}", i, i));
        for j in 1..=3 {
            doc.add_paragraph(&format!("{}.{} Раздел {}", i, j, j));
            for _ in 0..5 {
                doc.add_paragraph(
                    "Текст раздела с описанием предметной области и полученных результатов.",
                );
            }
            doc.add_paragraph("– первый пункт перечисления;");
            doc.add_paragraph("– второй пункт перечисления.");
            doc.add_paragraph(&format!("Таблица {}.{} – Результаты", i, j));
        }
        doc.add_table(4, 3);
    }

    doc.add_paragraph("ЗАКЛЮЧЕНИЕ");
    doc.add_paragraph("СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ");
    for i in 1..=30 {
        doc.add_paragraph(&format!("{}. Автор А.А. Название книги. – М.: Издательство, 2020.", i));
    }
    doc
}

/// Benchmark format detection.
fn bench_format_detection(c: &mut Criterion) {
    let data = create_test_thesis(1).to_bytes().unwrap();
    let non_docx = b"Not a DOCX file at all, just random text content";

    c.bench_function("detect_valid_docx", |b| {
        b.iter(|| vkrfmt::detect_format_from_bytes(black_box(&data)).unwrap());
    });

    c.bench_function("detect_non_docx", |b| {
        b.iter(|| vkrfmt::detect_format_from_bytes(black_box(non_docx)).is_err());
    });
}

/// Benchmark the classification pass alone.
fn bench_classification(c: &mut Criterion) {
    let requirements = Requirements::default();
    let texts: Vec<String> = create_test_thesis(5).paragraphs().map(|p| p.text()).collect();

    c.bench_function("classify_5_chapters", |b| {
        b.iter(|| {
            let mut classifier =
                ParagraphClassifier::new(&requirements, StrategyKind::Style).unwrap();
            for text in &texts {
                black_box(classifier.classify_text(text));
            }
        });
    });
}

/// Benchmark full in-memory runs at various sizes.
fn bench_format_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_document");
    let formatter = VkrFormatter::default();

    for chapters in [1, 5, 10].iter() {
        let doc = create_test_thesis(*chapters);

        group.bench_function(format!("{}_chapters", chapters), |b| {
            b.iter(|| {
                let mut doc = doc.clone();
                formatter.format_document(black_box(&mut doc)).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark a run from bytes to bytes, including the zip container.
fn bench_format_bytes(c: &mut Criterion) {
    let data = create_test_thesis(5).to_bytes().unwrap();
    let formatter =
        VkrFormatter::default().with_options(FormatOptions::new().with_strategy(StrategyKind::Pattern));

    c.bench_function("format_bytes_5_chapters", |b| {
        b.iter(|| formatter.format_bytes(black_box(&data)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_classification,
    bench_format_document,
    bench_format_bytes,
);
criterion_main!(benches);
