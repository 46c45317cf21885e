/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! The [`NifGraph`]: an in-memory statement store with triple-pattern querying,
//! multi-format ingestion (turtle, hextuples, zip archives, the native annotation XML)
//! and reconstruction of the typed [`Collection`]/[`Context`] model from statements.
//!
//! Ingestion is additive: statements accumulate across `parse_*` calls and duplicates
//! have no effect (idempotent union). Archive ingestion is atomic: all members are
//! staged first and committed only when every member parsed, so a malformed member
//! never leaves partial statements behind.

use sealed::sealed;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Seek};

use crate::collection::Collection;
use crate::config::{Config, Configurable};
use crate::context::Context;
use crate::convert::Converter;
use crate::document::{AnnotationDocument, DocumentParser};
use crate::error::NifError;
use crate::file::{open_file, open_file_reader, open_file_writer, sniff_format, SourceFormat};
use crate::hext;
use crate::statement::{Literal, Statement, Term, TriplePattern};
use crate::turtle;
use crate::types::*;
use crate::vocab::{self, Namespaces};

/// Base URI used when none is supplied by the caller
pub const DEFAULT_BASE_URI: &str = "https://example.org/rdf-data";
/// Prefix bound to [`DEFAULT_BASE_URI`]
pub const DEFAULT_PREFIX: &str = "data";

/// An in-memory NIF statement store.
pub struct NifGraph {
    /// All statements in insertion order. The set semantics live in `index`.
    statements: Vec<Statement>,

    /// Deduplication index over `statements`
    index: HashSet<Statement>,

    /// Prefix bindings used for turtle serialisation
    namespaces: Namespaces,

    config: Config,

    /// Converter used when ingesting annotation documents
    converter: Converter,

    /// External parser for the native annotation XML; `.naf.xml` ingestion is only
    /// available when one is registered
    document_parser: Option<Box<dyn DocumentParser>>,
}

impl Default for NifGraph {
    fn default() -> Self {
        Self {
            statements: Vec::new(),
            index: HashSet::new(),
            namespaces: Namespaces::default(),
            config: Config::default(),
            converter: Converter::new(DEFAULT_BASE_URI, DEFAULT_PREFIX),
            document_parser: None,
        }
    }
}

impl Configurable for NifGraph {
    fn config(&self) -> &Config {
        &self.config
    }

    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn set_config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }
}

#[sealed]
impl TypeInfo for NifGraph {
    fn typeinfo() -> Type {
        Type::Graph
    }
}

impl NifGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern to set the converter used for annotation-document ingestion
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.namespaces = converter.namespaces();
        self.converter = converter;
        self
    }

    /// Builder pattern to register an external parser for the native annotation XML
    pub fn with_document_parser(mut self, parser: Box<dyn DocumentParser>) -> Self {
        self.document_parser = Some(parser);
        self
    }

    // ------------------------------- store capability -------------------------------

    /// Add a statement. Returns true if the statement was new; duplicates are ignored
    /// (idempotent union).
    pub fn add(&mut self, statement: Statement) -> bool {
        if self.index.contains(&statement) {
            false
        } else {
            self.index.insert(statement.clone());
            self.statements.push(statement);
            true
        }
    }

    /// Bind a namespace prefix, used when serialising to turtle
    pub fn bind(&mut self, prefix: impl Into<String>, uri: impl Into<String>) -> &mut Self {
        self.namespaces.bind(prefix, uri);
        self
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Number of distinct statements in the graph
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// All statements, in insertion order
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// All statements matching the pattern, in insertion order
    pub fn query<'a>(
        &'a self,
        pattern: TriplePattern<'a>,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements.iter().filter(move |s| pattern.matches(s))
    }

    /// Does the graph contain the given statement?
    pub fn contains(&self, statement: &Statement) -> bool {
        self.index.contains(statement)
    }

    // ---------------------------------- ingestion ----------------------------------

    /// Ingest all statements of an in-memory collection
    pub fn parse_collection(&mut self, collection: &Collection) {
        for statement in collection.triples() {
            self.add(statement);
        }
    }

    /// Convert an annotation document (via the configured converter) and ingest the
    /// resulting statements.
    pub fn parse_document(&mut self, document: &dyn AnnotationDocument) -> Result<(), NifError> {
        debug(&self.config, || {
            "parse_document: converting annotation document".to_string()
        });
        let collection = self.converter.convert(document)?;
        self.namespaces = self.converter.namespaces();
        self.parse_collection(&collection);
        Ok(())
    }

    /// Ingest a file, dispatched purely on its filename suffix:
    /// the native annotation-XML suffix routes through the registered document parser
    /// and the converter; a zip archive is staged member by member and committed
    /// atomically; a hextuples or turtle suffix parses that encoding directly; anything
    /// else gets a best-effort generic parse.
    pub fn parse_file(&mut self, filename: &str) -> Result<(), NifError> {
        debug(&self.config, || format!("parse_file: {}", filename));
        match sniff_format(filename) {
            SourceFormat::AnnotationXml => {
                let Some(parser) = &self.document_parser else {
                    return Err(NifError::UnrecognizedFormat(format!(
                        "{} (no document parser registered)",
                        filename
                    )));
                };
                let mut reader = open_file_reader(filename, &self.config)?;
                let document = parser.parse_document(&mut reader)?;
                self.parse_document(document.as_ref())
            }
            SourceFormat::Archive => {
                let file = open_file(filename, &self.config)?;
                self.parse_archive(file, filename)
            }
            SourceFormat::Hextuples => {
                let data = self.read_to_string(filename)?;
                let statements = hext::parse_hext_str(&data)?;
                self.commit(statements);
                Ok(())
            }
            SourceFormat::Turtle => {
                let data = self.read_to_string(filename)?;
                let statements = turtle::parse_turtle_str(&data)?;
                self.commit(statements);
                Ok(())
            }
            SourceFormat::Unknown => {
                let data = self.read_to_string(filename)?;
                let statements = generic_parse(&data, filename)?;
                self.commit(statements);
                Ok(())
            }
        }
    }

    /// Parse a string holding either turtle or hextuples, auto-detected
    pub fn parse_str(&mut self, data: &str) -> Result<(), NifError> {
        let statements = generic_parse(data, "<string input>")?;
        self.commit(statements);
        Ok(())
    }

    /// Parse a turtle string
    pub fn parse_turtle(&mut self, data: &str) -> Result<(), NifError> {
        let statements = turtle::parse_turtle_str(data)?;
        self.commit(statements);
        Ok(())
    }

    /// Parse a hextuples string
    pub fn parse_hext(&mut self, data: &str) -> Result<(), NifError> {
        let statements = hext::parse_hext_str(data)?;
        self.commit(statements);
        Ok(())
    }

    /// Ingest a zip archive from any seekable reader. Every member is dispatched on its
    /// own filename suffix (annotation XML, hextuples, turtle, or the generic fallback),
    /// and nested archives recurse. All members are staged first; any failure aborts the
    /// whole archive and the graph is left untouched.
    pub fn parse_archive<R: Read + Seek>(
        &mut self,
        reader: R,
        name: &str,
    ) -> Result<(), NifError> {
        let mut staged: Vec<Statement> = Vec::new();
        self.stage_archive(reader, name, &mut staged)?;
        self.commit(staged);
        Ok(())
    }

    fn stage_archive<R: Read + Seek>(
        &self,
        reader: R,
        name: &str,
        staged: &mut Vec<Statement>,
    ) -> Result<(), NifError> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| NifError::ArchiveError(e, name.to_string(), "Opening archive failed"))?;
        for i in 0..archive.len() {
            let mut member = archive.by_index(i).map_err(|e| {
                NifError::ArchiveError(e, name.to_string(), "Reading archive member failed")
            })?;
            if member.is_dir() {
                continue;
            }
            let member_name = member.name().to_string();
            debug(&self.config, || {
                format!("parse_archive: member {} of {}", member_name, name)
            });
            let mut contents = Vec::new();
            member.read_to_end(&mut contents).map_err(|e| {
                NifError::IoError(e, member_name.clone(), "Reading archive member failed")
            })?;
            self.stage_member(&member_name, contents, staged)?;
        }
        Ok(())
    }

    /// Stage the statements of one archive member, dispatching on its suffix
    fn stage_member(
        &self,
        name: &str,
        contents: Vec<u8>,
        staged: &mut Vec<Statement>,
    ) -> Result<(), NifError> {
        match sniff_format(name) {
            SourceFormat::Archive => self.stage_archive(Cursor::new(contents), name, staged),
            SourceFormat::AnnotationXml => {
                let Some(parser) = &self.document_parser else {
                    return Err(NifError::UnrecognizedFormat(format!(
                        "{} (no document parser registered)",
                        name
                    )));
                };
                let mut reader = std::io::BufReader::new(Cursor::new(contents));
                let document = parser.parse_document(&mut reader)?;
                let collection = self.converter.convert(document.as_ref())?;
                staged.extend(collection.triples());
                Ok(())
            }
            format => {
                let data = String::from_utf8(contents).map_err(|_| {
                    NifError::SyntaxError(0, format!("{}: not valid UTF-8", name))
                })?;
                let statements = match format {
                    SourceFormat::Hextuples => hext::parse_hext_str(&data)?,
                    SourceFormat::Turtle => turtle::parse_turtle_str(&data)?,
                    _ => generic_parse(&data, name)?,
                };
                staged.extend(statements);
                Ok(())
            }
        }
    }

    fn read_to_string(&self, filename: &str) -> Result<String, NifError> {
        let mut reader = open_file_reader(filename, &self.config)?;
        let mut data = String::new();
        reader
            .read_to_string(&mut data)
            .map_err(|e| NifError::IoError(e, filename.to_string(), "Reading file failed"))?;
        Ok(data)
    }

    fn commit(&mut self, statements: Vec<Statement>) {
        for statement in statements {
            self.add(statement);
        }
    }

    // -------------------------------- serialisation --------------------------------

    /// Serialize the full statement set as turtle
    pub fn to_turtle_string(&self) -> Result<String, NifError> {
        let mut buffer = Vec::new();
        turtle::write_turtle(&mut buffer, self.statements(), &self.namespaces)?;
        String::from_utf8(buffer)
            .map_err(|_| NifError::SerializationError("turtle output was not UTF-8".to_string()))
    }

    /// Serialize the full statement set as hextuples
    pub fn to_hext_string(&self) -> Result<String, NifError> {
        let mut buffer = Vec::new();
        hext::write_hext(&mut buffer, self.statements())?;
        String::from_utf8(buffer).map_err(|_| {
            NifError::SerializationError("hextuples output was not UTF-8".to_string())
        })
    }

    /// Write the graph to a file; the encoding is chosen by filename suffix
    /// (`.ttl` for turtle, `.hext` for hextuples).
    pub fn to_file(&self, filename: &str) -> Result<(), NifError> {
        debug(&self.config, || format!("to_file: {}", filename));
        let mut writer = open_file_writer(filename, &self.config)?;
        match sniff_format(filename) {
            SourceFormat::Turtle => turtle::write_turtle(&mut writer, self.statements(), &self.namespaces),
            SourceFormat::Hextuples => hext::write_hext(&mut writer, self.statements()),
            _ => Err(NifError::SerializationError(format!(
                "No serializer for filename: {}",
                filename
            ))),
        }
    }

    // -------------------------------- reconstruction --------------------------------

    /// Reconstruct the typed collection from the statement set.
    ///
    /// When the graph holds a Collection-typed subject, that collection is rebuilt by
    /// following its has-context links (with multiple Collection subjects, the first in
    /// insertion order wins; a single collection per graph is the documented
    /// precondition). When no Collection subject exists, a collection is synthesized
    /// under `default_uri` holding every Context-typed subject in the graph.
    ///
    /// Fails with [`NifError::MalformedContext`] when a referenced context has no
    /// Context-typed subject; no partial collection is ever returned.
    pub fn collection(&self, default_uri: &str) -> Result<Collection, NifError> {
        let collections = self.aggregate_by_type(vocab::NIF_CONTEXT_COLLECTION);
        let contexts = self.aggregate_by_type(vocab::NIF_CONTEXT);
        debug(&self.config, || {
            format!(
                "collection: found {} collections, {} contexts",
                collections.len(),
                contexts.len()
            )
        });

        if let Some((uri, predicates)) = collections.into_iter().next() {
            let mut collection = Collection::new(uri);
            if let Some(profile) = predicates
                .get(vocab::DCTERMS_CONFORMS_TO)
                .and_then(|v| v.last())
                .and_then(|t| t.as_iri())
            {
                collection.conforms_to = profile.to_string();
            }
            if let Some(context_uris) = predicates.get(vocab::NIF_HAS_CONTEXT) {
                for term in context_uris {
                    let Some(context_uri) = term.as_iri() else {
                        continue;
                    };
                    collection.add_context(self.context(context_uri)?);
                }
            }
            Ok(collection)
        } else {
            let mut collection = Collection::new(default_uri);
            for (uri, _) in contexts {
                collection.add_context(self.context(&uri)?);
            }
            Ok(collection)
        }
    }

    /// Reconstruct a single context by identifier.
    /// Fails with [`NifError::MalformedContext`] when the graph holds no Context-typed
    /// subject under this URI.
    pub fn context(&self, uri: &str) -> Result<Context, NifError> {
        let context_type = Term::iri(vocab::NIF_CONTEXT);
        let is_context = self
            .query(
                TriplePattern::new()
                    .with_subject(uri)
                    .with_predicate(vocab::RDF_TYPE)
                    .with_object(&context_type),
            )
            .next()
            .is_some();
        if !is_context {
            return Err(NifError::MalformedContext(uri.to_string()));
        }

        let mut context = Context::new(uri, "");
        for statement in self.query(TriplePattern::new().with_subject(uri)) {
            match (statement.predicate.as_str(), &statement.object) {
                (vocab::NIF_IS_STRING, Term::Literal(literal)) => {
                    context.text = literal.lexical();
                }
                (vocab::NIF_SOURCE_URL, Term::Iri(source)) => {
                    context.source_uri = Some(source.clone());
                }
                (vocab::DC_CREATOR, Term::Literal(literal)) => {
                    context.author = Some(literal.lexical());
                }
                (vocab::DCTERMS_CREATED, Term::Literal(Literal::DateTime(created))) => {
                    context.created = Some(*created);
                }
                (vocab::DCTERMS_CONFORMS_TO, Term::Iri(profile)) => {
                    context.conforms_to = Some(profile.clone());
                }
                _ => {}
            }
        }

        //span subjects anchored to this context, in first-seen order
        let context_ref = Term::iri(uri);
        let mut span_uris: Vec<&str> = Vec::new();
        for statement in self.query(
            TriplePattern::new()
                .with_predicate(vocab::NIF_REFERENCE_CONTEXT)
                .with_object(&context_ref),
        ) {
            if !span_uris.contains(&statement.subject.as_str()) {
                span_uris.push(statement.subject.as_str());
            }
        }
        for span_uri in span_uris {
            if let Some(span) = self.span(span_uri) {
                context.spans.push(span);
            }
        }
        Ok(context)
    }

    /// Reconstruct one span annotation; returns None when the subject carries no
    /// offset pair (foreign data this crate does not model).
    fn span(&self, uri: &str) -> Option<crate::context::SpanAnnotation> {
        let mut begin: Option<usize> = None;
        let mut end: Option<usize> = None;
        let mut label = String::new();
        let mut anchor = String::new();
        let mut olia_links = smallvec::SmallVec::new();
        for statement in self.query(TriplePattern::new().with_subject(uri)) {
            match (statement.predicate.as_str(), &statement.object) {
                (vocab::NIF_BEGIN_INDEX, Term::Literal(literal)) => {
                    begin = literal.lexical().parse().ok();
                }
                (vocab::NIF_END_INDEX, Term::Literal(literal)) => {
                    end = literal.lexical().parse().ok();
                }
                (vocab::RDFS_LABEL, Term::Literal(literal)) => {
                    label = literal.lexical();
                }
                (vocab::NIF_ANCHOR_OF, Term::Literal(literal)) => {
                    anchor = literal.lexical();
                }
                (vocab::NIF_OLIA_LINK, Term::Iri(link)) => {
                    olia_links.push(link.clone());
                }
                _ => {}
            }
        }
        Some(crate::context::SpanAnnotation {
            uri: uri.to_string(),
            range: OffsetRange::new(begin?, end?),
            label,
            anchor_of: anchor,
            olia_links,
        })
    }

    /// Group statements whose subject is typed as `type_uri` into a
    /// `subject -> predicate -> values` aggregation, subjects in first-seen order.
    /// The has-context link, the olia-link predicate and any object in the OLIA
    /// namespace accumulate into lists (first-seen order); every other predicate keeps
    /// only its last-seen value, reflecting functional use.
    pub(crate) fn aggregate_by_type(
        &self,
        type_uri: &str,
    ) -> Vec<(String, HashMap<String, Vec<Term>>)> {
        let type_term = Term::iri(type_uri);
        let mut subjects: Vec<&str> = Vec::new();
        for statement in self.query(
            TriplePattern::new()
                .with_predicate(vocab::RDF_TYPE)
                .with_object(&type_term),
        ) {
            if !subjects.contains(&statement.subject.as_str()) {
                subjects.push(statement.subject.as_str());
            }
        }

        let mut result = Vec::with_capacity(subjects.len());
        for subject in subjects {
            let mut predicates: HashMap<String, Vec<Term>> = HashMap::new();
            for statement in self.query(TriplePattern::new().with_subject(subject)) {
                let multivalued = statement.predicate == vocab::NIF_HAS_CONTEXT
                    || statement.predicate == vocab::NIF_OLIA_LINK
                    || statement
                        .object
                        .as_iri()
                        .map(|uri| uri.starts_with(vocab::OLIA))
                        .unwrap_or(false);
                let values = predicates.entry(statement.predicate.clone()).or_default();
                if multivalued {
                    values.push(statement.object.clone());
                } else {
                    values.clear();
                    values.push(statement.object.clone());
                }
            }
            result.push((subject.to_string(), predicates));
        }
        result
    }
}

/// Best-effort generic parse of statement text: sniff the content shape (hextuples
/// lines start with '['), try that parser first, fall back to the other, and fail with
/// [`NifError::UnrecognizedFormat`] when neither accepts the content.
fn generic_parse(data: &str, source: &str) -> Result<Vec<Statement>, NifError> {
    let looks_like_hext = data
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim_start().starts_with('['))
        .unwrap_or(false);
    let (first, second): (
        fn(&str) -> Result<Vec<Statement>, NifError>,
        fn(&str) -> Result<Vec<Statement>, NifError>,
    ) = if looks_like_hext {
        (hext::parse_hext_str, turtle::parse_turtle_str)
    } else {
        (turtle::parse_turtle_str, hext::parse_hext_str)
    };
    first(data)
        .or_else(|_| second(data))
        .map_err(|_| NifError::UnrecognizedFormat(source.to_string()))
}
