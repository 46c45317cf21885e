use std::io::Write;

use nifgraph::*;

const BASE_URI: &str = "https://example.org/rdf-data";

pub fn setup_document() -> GenericDocument {
    GenericDocument::new("Hello world")
        .with_source_uri("urn:doc:1")
        .with_author("tester")
        .with_span(DocumentSpan::new((0, 5), "greeting"))
}

pub fn setup_collection() -> Result<Collection, NifError> {
    let converter = Converter::new(BASE_URI, "data");
    converter.convert(&setup_document())
}

#[test]
fn convert_one_context() -> Result<(), NifError> {
    let collection = setup_collection()?;
    assert_eq!(collection.uri(), format!("{}/collection", BASE_URI));
    assert_eq!(collection.conforms_to(), NIF_PROFILE);
    assert_eq!(collection.len(), 1);

    let context = collection.contexts().next().unwrap();
    assert_eq!(context.text(), "Hello world");
    assert_eq!(context.source_uri(), Some("urn:doc:1"));
    assert_eq!(context.author(), Some("tester"));
    assert_eq!(context.collection(), Some(collection.uri()));

    let spans: Vec<_> = context.spans().collect();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].begin(), 0);
    assert_eq!(spans[0].end(), 5);
    assert_eq!(spans[0].label(), "greeting");
    assert_eq!(spans[0].anchor_of(), "Hello");
    Ok(())
}

#[test]
fn convert_requires_source_uri() {
    let converter = Converter::new(BASE_URI, "data");
    let document = GenericDocument::new("no source uri here");
    let result = converter.convert(&document);
    assert!(matches!(result, Err(NifError::MissingSourceUri(_))));
}

#[test]
fn convert_is_deterministic() -> Result<(), NifError> {
    //converting the same document twice yields identical identifiers and statements
    let a = setup_collection()?;
    let b = setup_collection()?;
    assert_eq!(a, b);
    let triples_a: Vec<_> = a.triples().collect();
    let triples_b: Vec<_> = b.triples().collect();
    assert_eq!(triples_a, triples_b);
    //and triples() is restartable: a second walk yields the same sequence
    let again: Vec<_> = a.triples().collect();
    assert_eq!(triples_a, again);
    Ok(())
}

#[test]
fn round_trip() -> Result<(), NifError> {
    let collection = setup_collection()?;
    let mut graph = NifGraph::new();
    graph.parse_collection(&collection);

    let reconstructed = graph.collection(DEFAULT_BASE_URI)?;
    assert_eq!(reconstructed, collection);

    let context = reconstructed.contexts().next().unwrap();
    assert_eq!(context.text(), "Hello world");
    let spans: Vec<_> = context
        .spans()
        .map(|s| (s.begin(), s.end(), s.label().to_string()))
        .collect();
    assert_eq!(spans, vec![(0, 5, "greeting".to_string())]);
    Ok(())
}

#[test]
fn round_trip_is_order_independent() -> Result<(), NifError> {
    let collection = setup_collection()?;
    let mut triples: Vec<Statement> = collection.triples().collect();
    triples.reverse();

    let mut graph = NifGraph::new();
    for statement in triples {
        graph.add(statement);
    }
    let reconstructed = graph.collection(DEFAULT_BASE_URI)?;

    //the set of context identifiers and per-context content must be unaffected
    assert_eq!(reconstructed.len(), collection.len());
    for context in collection.contexts() {
        let found = reconstructed.context(context.uri()).expect("context must exist");
        assert_eq!(found.text(), context.text());
        let mut expected: Vec<_> = context
            .spans()
            .map(|s| (s.begin(), s.end(), s.label().to_string()))
            .collect();
        let mut actual: Vec<_> = found
            .spans()
            .map(|s| (s.begin(), s.end(), s.label().to_string()))
            .collect();
        expected.sort();
        actual.sort();
        assert_eq!(expected, actual);
    }
    Ok(())
}

#[test]
fn round_trip_through_turtle() -> Result<(), NifError> {
    let collection = setup_collection()?;
    let mut graph = NifGraph::new();
    graph.parse_collection(&collection);
    let data = graph.to_turtle_string()?;

    let mut reparsed = NifGraph::new();
    reparsed.parse_turtle(&data)?;
    assert_eq!(reparsed.collection(DEFAULT_BASE_URI)?, collection);
    Ok(())
}

#[test]
fn round_trip_through_hextuples() -> Result<(), NifError> {
    let collection = setup_collection()?;
    let mut graph = NifGraph::new();
    graph.parse_collection(&collection);
    let data = graph.to_hext_string()?;

    let mut reparsed = NifGraph::new();
    reparsed.parse_hext(&data)?;
    assert_eq!(reparsed.collection(DEFAULT_BASE_URI)?, collection);
    Ok(())
}

#[test]
fn ingestion_is_idempotent() -> Result<(), NifError> {
    let collection = setup_collection()?;
    let mut graph = NifGraph::new();
    graph.parse_collection(&collection);
    let data = graph.to_hext_string()?;

    let mut once = NifGraph::new();
    once.parse_hext(&data)?;
    let mut twice = NifGraph::new();
    twice.parse_hext(&data)?;
    twice.parse_hext(&data)?;

    assert_eq!(once.len(), twice.len());
    for statement in once.statements() {
        assert!(twice.contains(statement));
    }
    assert_eq!(
        once.collection(DEFAULT_BASE_URI)?,
        twice.collection(DEFAULT_BASE_URI)?
    );
    Ok(())
}

#[test]
fn olia_links_round_trip() -> Result<(), NifError> {
    let document = GenericDocument::new("Hello world")
        .with_source_uri("urn:doc:olia")
        .with_span(
            DocumentSpan::new((0, 5), "greeting")
                .with_olia_link(format!("{}Interjection", OLIA))
                .with_olia_link(format!("{}Noun", OLIA)),
        );
    let converter = Converter::new(BASE_URI, "data");
    let collection = converter.convert(&document)?;

    let mut graph = NifGraph::new();
    graph.parse_collection(&collection);
    let reconstructed = graph.collection(DEFAULT_BASE_URI)?;
    let context = reconstructed.contexts().next().unwrap();
    let span = context.spans().next().unwrap();
    let links: Vec<_> = span.olia_links().collect();
    //multi-valued links accumulate in first-seen order
    assert_eq!(
        links,
        vec![
            format!("{}Interjection", OLIA).as_str(),
            format!("{}Noun", OLIA).as_str()
        ]
    );
    Ok(())
}

#[test]
fn created_date_round_trip() -> Result<(), NifError> {
    let created = chrono::DateTime::parse_from_rfc3339("2024-01-15T12:00:00+00:00").unwrap();
    let document = GenericDocument::new("dated text")
        .with_source_uri("urn:doc:dated")
        .with_created(created);
    let converter = Converter::new(BASE_URI, "data");
    let collection = converter.convert(&document)?;

    let mut graph = NifGraph::new();
    graph.parse_collection(&collection);
    let reconstructed = graph.collection(DEFAULT_BASE_URI)?;
    assert_eq!(
        reconstructed.contexts().next().unwrap().created(),
        Some(created)
    );
    Ok(())
}

// ----------------------------- reconstruction edge cases -----------------------------

#[test]
fn ambiguous_collection_tie_break() -> Result<(), NifError> {
    let mut graph = NifGraph::new();
    //two distinct collection subjects; the first by insertion order must win
    graph.parse_turtle(
        r#"
@prefix nif: <http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#> .
<urn:coll:1> a nif:ContextCollection ;
    nif:hasContext <urn:ctx:1> .
<urn:coll:2> a nif:ContextCollection ;
    nif:hasContext <urn:ctx:2> .
<urn:ctx:1> a nif:Context ;
    nif:isString "first" .
<urn:ctx:2> a nif:Context ;
    nif:isString "second" .
"#,
    )?;
    let collection = graph.collection(DEFAULT_BASE_URI)?;
    assert_eq!(collection.uri(), "urn:coll:1");
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.contexts().next().unwrap().text(), "first");
    Ok(())
}

#[test]
fn synthesized_collection_without_collection_subject() -> Result<(), NifError> {
    let mut graph = NifGraph::new();
    graph.parse_turtle(
        r#"
@prefix nif: <http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#> .
<urn:ctx:a> a nif:Context ; nif:isString "A" .
<urn:ctx:b> a nif:Context ; nif:isString "B" .
"#,
    )?;
    let collection = graph.collection("urn:coll:default")?;
    assert_eq!(collection.uri(), "urn:coll:default");
    assert_eq!(collection.len(), 2);
    assert!(collection.context("urn:ctx:a").is_some());
    assert!(collection.context("urn:ctx:b").is_some());
    Ok(())
}

#[test]
fn dangling_context_reference() -> Result<(), NifError> {
    let mut graph = NifGraph::new();
    graph.parse_turtle(
        r#"
@prefix nif: <http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#> .
<urn:coll:1> a nif:ContextCollection ;
    nif:hasContext <urn:ctx:gone> .
"#,
    )?;
    let result = graph.collection(DEFAULT_BASE_URI);
    match result {
        Err(NifError::MalformedContext(uri)) => assert_eq!(uri, "urn:ctx:gone"),
        other => panic!("expected MalformedContext, got {:?}", other.err()),
    }
    Ok(())
}

// ---------------------------------- archive ingestion ----------------------------------

fn build_archive(members: &[(&str, &str)]) -> std::io::Cursor<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in members {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap()
}

const CONTEXT_A_HEXT: &str = concat!(
    "[\"urn:ctx:a\",\"http://www.w3.org/1999/02/22-rdf-syntax-ns#type\",\"http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#Context\",\"globalId\",\"\",\"\"]\n",
    "[\"urn:ctx:a\",\"http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#isString\",\"Text A\",\"http://www.w3.org/2001/XMLSchema#string\",\"\",\"\"]\n",
);

const CONTEXT_B_TURTLE: &str = r#"
@prefix nif: <http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#> .
<urn:ctx:b> a nif:Context ;
    nif:isString "Text B" .
"#;

#[test]
fn archive_with_mixed_members() -> Result<(), NifError> {
    let archive = build_archive(&[("a.hext", CONTEXT_A_HEXT), ("b.ttl", CONTEXT_B_TURTLE)]);
    let mut graph = NifGraph::new();
    graph.parse_archive(archive, "mixed.zip")?;

    //neither member declares a collection subject, so reconstruction synthesizes one
    //holding both contexts
    let collection = graph.collection("urn:coll:default")?;
    assert_eq!(collection.uri(), "urn:coll:default");
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.context("urn:ctx:a").unwrap().text(), "Text A");
    assert_eq!(collection.context("urn:ctx:b").unwrap().text(), "Text B");
    Ok(())
}

#[test]
fn archive_atomicity() {
    //one well-formed member plus one malformed member: the whole archive must abort
    //and the graph must hold no partial statements
    let archive = build_archive(&[
        ("good.hext", CONTEXT_A_HEXT),
        ("bad.ttl", "this is not turtle at all"),
    ]);
    let mut graph = NifGraph::new();
    let result = graph.parse_archive(archive, "broken.zip");
    assert!(result.is_err());
    assert_eq!(graph.len(), 0);
}

#[test]
fn archive_member_with_unknown_suffix_uses_generic_parse() -> Result<(), NifError> {
    //an unrecognised member suffix falls back to the generic structured-triple parse
    let archive = build_archive(&[("a.triples", CONTEXT_B_TURTLE)]);
    let mut graph = NifGraph::new();
    graph.parse_archive(archive, "generic.zip")?;
    assert_eq!(graph.len(), 2);
    Ok(())
}

#[test]
fn nested_archive() -> Result<(), NifError> {
    let inner = build_archive(&[("b.ttl", CONTEXT_B_TURTLE)]);
    let inner_bytes = inner.into_inner();
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    writer.start_file("a.hext", options).unwrap();
    writer.write_all(CONTEXT_A_HEXT.as_bytes()).unwrap();
    writer.start_file("inner.zip", options).unwrap();
    writer.write_all(&inner_bytes).unwrap();
    let archive = writer.finish().unwrap();

    let mut graph = NifGraph::new();
    graph.parse_archive(archive, "nested.zip")?;
    let collection = graph.collection("urn:coll:default")?;
    assert_eq!(collection.len(), 2);
    Ok(())
}

// --------------------------------- document parsing ---------------------------------

/// A stand-in for the external annotation-XML parser: one line of text, then one
/// span per line as `begin end label`.
struct StubDocumentParser;

impl DocumentParser for StubDocumentParser {
    fn parse_document(
        &self,
        reader: &mut dyn std::io::BufRead,
    ) -> Result<Box<dyn AnnotationDocument>, NifError> {
        let mut data = String::new();
        reader
            .read_to_string(&mut data)
            .map_err(|e| NifError::IoError(e, "<stub>".to_string(), "Reading document failed"))?;
        let mut lines = data.lines();
        let source_uri = lines.next().unwrap_or_default().to_string();
        let text = lines.next().unwrap_or_default().to_string();
        let mut document = GenericDocument::new(text).with_source_uri(source_uri);
        for line in lines {
            let fields: Vec<&str> = line.splitn(3, ' ').collect();
            if fields.len() == 3 {
                let begin: usize = fields[0].parse().unwrap_or(0);
                let end: usize = fields[1].parse().unwrap_or(0);
                document = document.with_span(DocumentSpan::new((begin, end), fields[2]));
            }
        }
        Ok(Box::new(document))
    }
}

#[test]
fn document_ingestion() -> Result<(), NifError> {
    let mut graph = NifGraph::new()
        .with_converter(Converter::new(BASE_URI, "data"))
        .with_document_parser(Box::new(StubDocumentParser));
    graph.parse_document(&setup_document())?;

    let collection = graph.collection(DEFAULT_BASE_URI)?;
    assert_eq!(collection.len(), 1);
    assert_eq!(
        collection.contexts().next().unwrap().text(),
        "Hello world"
    );
    Ok(())
}

#[test]
fn annotation_xml_member_in_archive() -> Result<(), NifError> {
    //an archive member with the annotation-XML suffix routes through the registered
    //document parser and the converter
    let member = "urn:doc:42\nGood morning\n0 4 salutation\n";
    let archive = build_archive(&[("doc.naf.xml", member)]);
    let mut graph = NifGraph::new()
        .with_converter(Converter::new(BASE_URI, "data"))
        .with_document_parser(Box::new(StubDocumentParser));
    graph.parse_archive(archive, "docs.zip")?;

    let collection = graph.collection(DEFAULT_BASE_URI)?;
    //the converted member carries its own collection subject
    assert_eq!(collection.uri(), format!("{}/collection", BASE_URI));
    let context = collection.contexts().next().unwrap();
    assert_eq!(context.text(), "Good morning");
    let span = context.spans().next().unwrap();
    assert_eq!(
        (span.begin(), span.end(), span.label()),
        (0, 4, "salutation")
    );
    assert_eq!(span.anchor_of(), "Good");
    Ok(())
}

#[test]
fn annotation_xml_without_parser_is_unrecognized() {
    let archive = build_archive(&[("doc.naf.xml", "urn:doc:1\ntext\n")]);
    let mut graph = NifGraph::new();
    let result = graph.parse_archive(archive, "docs.zip");
    assert!(matches!(result, Err(NifError::UnrecognizedFormat(_))));
    assert_eq!(graph.len(), 0);
}

#[test]
fn file_round_trip() -> Result<(), NifError> {
    let collection = setup_collection()?;
    let mut graph = NifGraph::new();
    graph.parse_collection(&collection);

    let dir = std::env::temp_dir();
    for suffix in ["ttl", "hext"] {
        let path = dir.join(format!("nifgraph-file-round-trip.{}", suffix));
        let filename = path.to_str().unwrap();
        graph.to_file(filename)?;

        let mut reparsed = NifGraph::new();
        reparsed.parse_file(filename)?;
        assert_eq!(reparsed.collection(DEFAULT_BASE_URI)?, collection);
        std::fs::remove_file(&path).ok();
    }
    Ok(())
}

// ------------------------------------- catalog -------------------------------------

#[cfg(feature = "csv")]
#[test]
fn catalog_rows_and_columns() -> Result<(), NifError> {
    let document = GenericDocument::new("Hello world")
        .with_source_uri("urn:doc:1")
        .with_author("tester");
    let converter = Converter::new(BASE_URI, "data");
    let collection = converter.convert(&document)?;
    let mut graph = NifGraph::new();
    graph.parse_collection(&collection);

    let table = graph.catalog();
    assert_eq!(table.index.len(), 1);
    //columns are sorted by name
    let mut sorted = table.columns.clone();
    sorted.sort();
    assert_eq!(table.columns, sorted);
    //the collection-wide conformance profile is replicated on every row
    let conforms_column = table
        .columns
        .iter()
        .position(|c| c == "dcterms:conformsTo")
        .expect("conformsTo column must exist");
    for row in table.rows.iter() {
        assert_eq!(row[conforms_column], NIF_PROFILE);
    }
    //the author shows up under the dc:creator column
    let creator_column = table
        .columns
        .iter()
        .position(|c| c == "dc:creator")
        .expect("creator column must exist");
    assert_eq!(table.rows[0][creator_column], "tester");

    let csv = table.to_csv_string()?;
    assert!(csv.starts_with("index,"));
    assert!(csv.contains("tester"));
    Ok(())
}
