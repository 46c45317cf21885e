/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! The seam towards the annotation-document producer (an NLP pipeline). The XML field
//! layout and its parsing are external collaborators: this crate only consumes documents
//! through the [`AnnotationDocument`] trait and, for file-based ingestion of the native
//! annotation XML, through an injected [`DocumentParser`].

use chrono::{DateTime, FixedOffset};
use smallvec::SmallVec;
use std::io::BufRead;

use crate::error::NifError;
use crate::types::OffsetRange;

/// One offset-tagged span as exposed by an annotation document. Offsets are half-open
/// character ranges in the original text and are carried verbatim into the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSpan {
    pub range: OffsetRange,
    pub label: String,
    /// Linguistic annotation links (URIs into the OLiA ontology), usually zero or one
    pub olia_links: SmallVec<[String; 1]>,
}

impl DocumentSpan {
    pub fn new(range: impl Into<OffsetRange>, label: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            label: label.into(),
            olia_links: SmallVec::new(),
        }
    }

    pub fn with_olia_link(mut self, uri: impl Into<String>) -> Self {
        self.olia_links.push(uri.into());
        self
    }
}

/// A structured annotation document as produced by an NLP pipeline. The converter walks
/// this interface; it never sees the document's native serialisation.
pub trait AnnotationDocument {
    /// The declared source-document URI. Mandatory for conversion: it seeds the whole
    /// identifier tree.
    fn source_uri(&self) -> Option<&str>;

    /// The raw text of the document
    fn text(&self) -> &str;

    fn author(&self) -> Option<&str> {
        None
    }

    fn created(&self) -> Option<DateTime<FixedOffset>> {
        None
    }

    /// The offset-tagged spans of the document, in document order
    fn spans(&self) -> &[DocumentSpan];
}

/// A plain in-memory annotation document, the default implementation of
/// [`AnnotationDocument`]. Useful when the producing pipeline lives in the same process,
/// and in tests.
#[derive(Debug, Clone, Default)]
pub struct GenericDocument {
    source_uri: Option<String>,
    text: String,
    author: Option<String>,
    created: Option<DateTime<FixedOffset>>,
    spans: Vec<DocumentSpan>,
}

impl GenericDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_source_uri(mut self, uri: impl Into<String>) -> Self {
        self.source_uri = Some(uri.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_created(mut self, created: DateTime<FixedOffset>) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_span(mut self, span: DocumentSpan) -> Self {
        self.spans.push(span);
        self
    }
}

impl AnnotationDocument for GenericDocument {
    fn source_uri(&self) -> Option<&str> {
        self.source_uri.as_deref()
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    fn created(&self) -> Option<DateTime<FixedOffset>> {
        self.created
    }

    fn spans(&self) -> &[DocumentSpan] {
        &self.spans
    }
}

/// Parses the native annotation-XML encoding into an [`AnnotationDocument`]. The actual
/// XML parser is an external dependency; register an implementation on the graph
/// ([`crate::NifGraph::with_document_parser`]) to enable `.naf.xml` ingestion.
pub trait DocumentParser {
    fn parse_document(
        &self,
        reader: &mut dyn BufRead,
    ) -> Result<Box<dyn AnnotationDocument>, NifError>;
}
