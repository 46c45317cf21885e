use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nifgraph::{Converter, DocumentSpan, GenericDocument, NifGraph, DEFAULT_BASE_URI};

fn setup_document(spans: usize) -> GenericDocument {
    //a synthetic document of repeated words, one span per word
    let word = "lorem ";
    let text: String = word.repeat(spans);
    let mut document = GenericDocument::new(text).with_source_uri("urn:bench:doc");
    for i in 0..spans {
        document = document.with_span(DocumentSpan::new(
            (i * word.len(), i * word.len() + 5),
            "word",
        ));
    }
    document
}

pub fn bench_convert(c: &mut Criterion) {
    let converter = Converter::new("https://example.org/bench", "bench");
    let document = setup_document(100);

    c.bench_function("convert_100_spans", |b| {
        b.iter(|| {
            let collection = converter.convert(black_box(&document)).unwrap();
            assert_eq!(collection.len(), 1);
        })
    });

    let collection = converter.convert(&document).unwrap();
    c.bench_function("flatten_100_spans", |b| {
        b.iter(|| {
            let count = black_box(&collection).triples().count();
            assert!(count > 100);
        })
    });
}

pub fn bench_parse(c: &mut Criterion) {
    let converter = Converter::new("https://example.org/bench", "bench");
    let collection = converter.convert(&setup_document(100)).unwrap();
    let mut graph = NifGraph::new().with_converter(converter);
    graph.parse_collection(&collection);
    let turtle = graph.to_turtle_string().unwrap();
    let hext = graph.to_hext_string().unwrap();

    c.bench_function("parse_turtle_100_spans", |b| {
        b.iter(|| {
            let mut graph = NifGraph::new();
            graph.parse_turtle(black_box(&turtle)).unwrap();
            assert!(!graph.is_empty());
        })
    });

    c.bench_function("parse_hext_100_spans", |b| {
        b.iter(|| {
            let mut graph = NifGraph::new();
            graph.parse_hext(black_box(&hext)).unwrap();
            assert!(!graph.is_empty());
        })
    });

    c.bench_function("reconstruct_100_spans", |b| {
        b.iter(|| {
            let collection = black_box(&graph).collection(DEFAULT_BASE_URI).unwrap();
            assert_eq!(collection.len(), 1);
        })
    });
}

criterion_group!(benches, bench_convert, bench_parse);
criterion_main!(benches);
