/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! The annotation-to-graph converter: walks a structured [`AnnotationDocument`] and
//! builds the [`Collection`]/[`Context`] tree whose `triples()` is the flattened
//! statement set. A pure transform: the input document is never mutated and every
//! invocation allocates a fresh tree.

use crate::collection::Collection;
use crate::context::{anchor_of, Context, SpanAnnotation};
use crate::document::AnnotationDocument;
use crate::error::NifError;
use crate::uri::UriScheme;
use crate::vocab::{self, Namespaces};

/// Converts annotation documents into collections. Carries the naming parameters and
/// the URI scheme; one converter can be reused across any number of documents.
#[derive(Debug, Clone)]
pub struct Converter {
    collection_name: String,
    context_name: Option<String>,
    base_prefix: String,
    scheme: UriScheme,
}

impl Converter {
    /// A converter minting identifiers under `base_uri`, with the given prefix bound to
    /// it for serialisation.
    pub fn new(base_uri: impl Into<String>, base_prefix: impl Into<String>) -> Self {
        Self {
            collection_name: "collection".to_string(),
            context_name: None,
            base_prefix: base_prefix.into(),
            scheme: UriScheme::new(base_uri),
        }
    }

    /// Name of the collection the converted contexts are grouped under; the collection
    /// URI is `<base>/<name>`. Defaults to "collection".
    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    /// Override the context name. When unset (the default), the context identifier is
    /// minted deterministically from the document's source URI.
    pub fn with_context_name(mut self, name: impl Into<String>) -> Self {
        self.context_name = Some(name.into());
        self
    }

    pub fn scheme(&self) -> &UriScheme {
        &self.scheme
    }

    /// The prefix bindings for graphs built from this converter's output: the default
    /// vocabulary table plus the base prefix.
    pub fn namespaces(&self) -> Namespaces {
        let mut namespaces = Namespaces::default();
        namespaces.bind(
            self.base_prefix.as_str(),
            format!("{}/", self.scheme.base()),
        );
        namespaces
    }

    /// Convert a document into a collection holding one context. The context identifier
    /// derives from the document's declared source URI; span offsets are carried
    /// verbatim (half-open character ranges in the original text, no renumbering).
    ///
    /// Fails with [`NifError::MissingSourceUri`] when the document carries no source
    /// URI, since that URI seeds the whole identifier tree.
    pub fn convert(&self, document: &dyn AnnotationDocument) -> Result<Collection, NifError> {
        let source_uri = document
            .source_uri()
            .ok_or(NifError::MissingSourceUri("converting a document"))?;

        let context_uri = match &self.context_name {
            Some(name) => format!("{}/{}", self.scheme.base(), name),
            None => self.scheme.document_uri(source_uri),
        };

        let text = document.text();
        let mut context = Context::new(context_uri, text);
        context.source_uri = Some(source_uri.to_string());
        context.author = document.author().map(|x| x.to_string());
        context.created = document.created();
        context.conforms_to = Some(vocab::NIF_PROFILE.to_string());

        for span in document.spans() {
            context.spans.push(SpanAnnotation {
                uri: self.scheme.span_uri(source_uri, &span.range),
                range: span.range,
                label: span.label.clone(),
                anchor_of: anchor_of(text, &span.range).unwrap_or_default(),
                olia_links: span.olia_links.clone(),
            });
        }

        let collection_uri = format!("{}/{}", self.scheme.base(), self.collection_name);
        let mut collection = Collection::new(collection_uri);
        collection.add_context(context);
        Ok(collection)
    }
}
