/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! A [`Context`] is the unit of one contiguous text span (typically one source document):
//! its raw text, source metadata, and the span annotations anchored to character offsets
//! within the text. Contexts are immutable once constructed; they are created either by
//! the converter (from an annotation document) or by reconstruction from a graph.

use chrono::{DateTime, FixedOffset};
use sealed::sealed;
use smallvec::SmallVec;

use crate::statement::{Statement, Term};
use crate::types::*;
use crate::vocab;

/// An annotation tied to a half-open character offset range within a context's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanAnnotation {
    /// The span's own identifier, minted from the document URI plus the offset range
    pub(crate) uri: String,

    /// Half-open character range in the context's text, verbatim from the source
    pub(crate) range: OffsetRange,

    /// Free-form annotation label
    pub(crate) label: String,

    /// The substring of the context text covered by the range
    pub(crate) anchor_of: String,

    /// Linguistic annotation links (URIs into the OLiA ontology)
    pub(crate) olia_links: SmallVec<[String; 1]>,
}

impl SpanAnnotation {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn range(&self) -> OffsetRange {
        self.range
    }

    pub fn begin(&self) -> usize {
        self.range.begin
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The substring of the context text covered by this span
    pub fn anchor_of(&self) -> &str {
        &self.anchor_of
    }

    pub fn olia_links(&self) -> impl Iterator<Item = &str> {
        self.olia_links.iter().map(|x| x.as_str())
    }

    /// All statements describing this span, anchored to the given context
    pub(crate) fn triples<'a>(
        &'a self,
        context_uri: &'a str,
    ) -> impl Iterator<Item = Statement> + 'a {
        std::iter::once(Statement::new(
            &self.uri,
            vocab::RDF_TYPE,
            Term::iri(vocab::NIF_PHRASE),
        ))
        .chain(std::iter::once(Statement::new(
            &self.uri,
            vocab::NIF_REFERENCE_CONTEXT,
            Term::iri(context_uri),
        )))
        .chain(std::iter::once(Statement::new(
            &self.uri,
            vocab::NIF_BEGIN_INDEX,
            Term::literal(self.range.begin),
        )))
        .chain(std::iter::once(Statement::new(
            &self.uri,
            vocab::NIF_END_INDEX,
            Term::literal(self.range.end),
        )))
        .chain(std::iter::once(Statement::new(
            &self.uri,
            vocab::NIF_ANCHOR_OF,
            Term::literal(self.anchor_of.as_str()),
        )))
        .chain(std::iter::once(Statement::new(
            &self.uri,
            vocab::RDFS_LABEL,
            Term::literal(self.label.as_str()),
        )))
        .chain(
            self.olia_links
                .iter()
                .map(move |link| Statement::new(&self.uri, vocab::NIF_OLIA_LINK, Term::iri(link))),
        )
    }
}

/// Extract the substring covered by a half-open character (codepoint) range.
/// Returns None when the range exceeds the text.
pub(crate) fn anchor_of(text: &str, range: &OffsetRange) -> Option<String> {
    if range.end < range.begin {
        return None;
    }
    let mut chars = text.char_indices();
    let begin_byte = if range.begin == 0 {
        0
    } else {
        chars.nth(range.begin - 1).map(|(i, c)| i + c.len_utf8())?
    };
    let end_byte = if range.end == range.begin {
        begin_byte
    } else {
        let mut chars = text[begin_byte..].char_indices();
        let (i, c) = chars.nth(range.end - range.begin - 1)?;
        begin_byte + i + c.len_utf8()
    };
    Some(text[begin_byte..end_byte].to_string())
}

/// One anchored unit of source text plus its span annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// The context's identifier
    pub(crate) uri: String,

    /// Back-reference to the owning collection (by URI only, for convenience; the
    /// collection owns the context, not the other way around)
    pub(crate) collection: Option<String>,

    /// The declared source-document URI
    pub(crate) source_uri: Option<String>,

    /// The raw text of the context
    pub(crate) text: String,

    pub(crate) author: Option<String>,
    pub(crate) created: Option<DateTime<FixedOffset>>,

    /// Conformance profile of the representation scheme in use
    pub(crate) conforms_to: Option<String>,

    /// Span annotations anchored to character offsets within the text, in source order
    pub(crate) spans: Vec<SpanAnnotation>,
}

impl Context {
    pub(crate) fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            collection: None,
            source_uri: None,
            text: text.into(),
            author: None,
            created: None,
            conforms_to: None,
            spans: Vec::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The raw text of this context
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The URI of the collection this context belongs to, if any
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn source_uri(&self) -> Option<&str> {
        self.source_uri.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn created(&self) -> Option<DateTime<FixedOffset>> {
        self.created
    }

    pub fn conforms_to(&self) -> Option<&str> {
        self.conforms_to.as_deref()
    }

    /// The span annotations of this context, in source order
    pub fn spans(&self) -> impl Iterator<Item = &SpanAnnotation> {
        self.spans.iter()
    }

    /// The substring of this context's text covered by the given range, or None when the
    /// range exceeds the text.
    pub fn anchor_of(&self, range: impl Into<OffsetRange>) -> Option<String> {
        anchor_of(&self.text, &range.into())
    }

    /// All statements describing this context and its spans. The sequence is finite and
    /// restartable: each call re-walks the model.
    pub fn triples(&self) -> impl Iterator<Item = Statement> + '_ {
        std::iter::once(Statement::new(
            &self.uri,
            vocab::RDF_TYPE,
            Term::iri(vocab::NIF_CONTEXT),
        ))
        .chain(std::iter::once(Statement::new(
            &self.uri,
            vocab::NIF_IS_STRING,
            Term::literal(self.text.as_str()),
        )))
        .chain(
            self.source_uri
                .iter()
                .map(|uri| Statement::new(&self.uri, vocab::NIF_SOURCE_URL, Term::iri(uri))),
        )
        .chain(
            self.author
                .iter()
                .map(|author| {
                    Statement::new(&self.uri, vocab::DC_CREATOR, Term::literal(author.as_str()))
                }),
        )
        .chain(self.created.iter().map(|created| {
            Statement::new(&self.uri, vocab::DCTERMS_CREATED, Term::literal(*created))
        }))
        .chain(self.conforms_to.iter().map(|profile| {
            Statement::new(&self.uri, vocab::DCTERMS_CONFORMS_TO, Term::iri(profile))
        }))
        .chain(self.spans.iter().flat_map(move |span| span.triples(&self.uri)))
    }
}

#[sealed]
impl TypeInfo for Context {
    fn typeinfo() -> Type {
        Type::Context
    }
}

#[sealed]
impl TypeInfo for SpanAnnotation {
    fn typeinfo() -> Type {
        Type::SpanAnnotation
    }
}
