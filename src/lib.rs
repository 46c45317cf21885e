/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! ## Introduction
//!
//! This library models linguistic annotation data (tokens, sentences, structural spans
//! and their linguistic links) as a graph of interlinked, offset-anchored text
//! contexts, and converts between two representations: a structured in-memory
//! annotation document (as produced by an NLP pipeline) and a flat, URI-addressed
//! statement graph (subject–predicate–object triples) that serializes to and parses
//! from multiple textual encodings.
//!
//! **What can you do with this library?**
//!
//! * Convert annotation documents into NIF collections of offset-anchored contexts,
//!   with deterministic identifiers minted from content and character offsets
//!   ([`Converter`], [`UriScheme`]).
//! * Keep statements in an in-memory graph with triple-pattern querying and additive,
//!   idempotent ingestion ([`NifGraph`]).
//! * Parse statements from turtle, from the line-oriented hextuples encoding, from zip
//!   archives mixing both (staged and committed atomically), and from the native
//!   annotation XML via an injected document parser.
//! * Reconstruct the typed [`Collection`]/[`Context`] model from any statement set,
//!   including graphs produced by other NIF tooling.
//! * Project context metadata into a tabular catalog for inspection (`csv` feature).
//!
//! The conversion core is synchronous and pure: converting and reconstructing never
//! block and share no state, so independent conversions can run in parallel; only file
//! and archive reading touch I/O.

mod collection;
mod config;
mod context;
mod convert;
mod document;
mod error;
mod file;
mod graph;
mod hext;
mod statement;
mod turtle;
mod types;
mod uri;
mod vocab;

#[cfg(feature = "csv")]
mod table;

// Our internal crate structure is not very relevant to the outside world,
// expose all structs and traits in the root namespace, and be explicit about it:

pub use collection::Collection;
pub use config::{Config, Configurable};
pub use context::{Context, SpanAnnotation};
pub use convert::Converter;
pub use document::{AnnotationDocument, DocumentParser, DocumentSpan, GenericDocument};
pub use error::NifError;
pub use file::{sniff_format, SourceFormat};
pub use graph::{NifGraph, DEFAULT_BASE_URI, DEFAULT_PREFIX};
pub use statement::{Literal, Statement, Term, TriplePattern};
#[cfg(feature = "csv")]
pub use table::Table;
pub use types::{OffsetRange, Type, TypeInfo};
pub use uri::UriScheme;
pub use vocab::Namespaces;
pub use vocab::{
    DC, DCTERMS, DCTERMS_CONFORMS_TO, DCTERMS_CREATED, DC_CREATOR, ITSRDF, NIF, NIF_ANCHOR_OF,
    NIF_BEGIN_INDEX, NIF_CONTEXT, NIF_CONTEXT_COLLECTION, NIF_END_INDEX, NIF_HAS_CONTEXT,
    NIF_IS_STRING, NIF_OLIA_LINK, NIF_PHRASE, NIF_PROFILE, NIF_REFERENCE_CONTEXT, NIF_SOURCE_URL,
    OLIA, RDF, RDFS, RDFS_LABEL, RDF_TYPE, XSD, XSD_DATETIME, XSD_NON_NEGATIVE_INTEGER, XSD_STRING,
};
