/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! A [`Collection`] is a named grouping of contexts plus provenance metadata. It owns its
//! contexts; context identifiers within a collection are unique and insertion order
//! carries no meaning (contexts are addressed by identifier, not position).

use sealed::sealed;

use crate::context::Context;
use crate::statement::{Statement, Term};
use crate::types::*;
use crate::vocab;

#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// The collection-level identifier
    pub(crate) uri: String,

    /// Conformance profile of the representation scheme in use
    pub(crate) conforms_to: String,

    pub(crate) contexts: Vec<Context>,
}

impl Collection {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            conforms_to: vocab::NIF_PROFILE.to_string(),
            contexts: Vec::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn conforms_to(&self) -> &str {
        &self.conforms_to
    }

    /// Add a context to the collection, setting its back-reference. A context with the
    /// same identifier replaces the existing one (identifiers are unique per collection).
    pub fn add_context(&mut self, mut context: Context) -> &mut Self {
        context.collection = Some(self.uri.clone());
        if let Some(existing) = self.contexts.iter_mut().find(|c| c.uri == context.uri) {
            *existing = context;
        } else {
            self.contexts.push(context);
        }
        self
    }

    /// Builder-pattern variant of [`Self::add_context`]
    pub fn with_context(mut self, context: Context) -> Self {
        self.add_context(context);
        self
    }

    /// Get a context by identifier
    pub fn context(&self, uri: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.uri == uri)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.contexts.iter()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// The full flattened statement set describing this collection and all its contexts.
    /// The sequence is finite and restartable: each call re-walks the model, there is no
    /// hidden iterator state.
    pub fn triples(&self) -> impl Iterator<Item = Statement> + '_ {
        std::iter::once(Statement::new(
            &self.uri,
            vocab::RDF_TYPE,
            Term::iri(vocab::NIF_CONTEXT_COLLECTION),
        ))
        .chain(std::iter::once(Statement::new(
            &self.uri,
            vocab::DCTERMS_CONFORMS_TO,
            Term::iri(&self.conforms_to),
        )))
        .chain(self.contexts.iter().map(move |context| {
            Statement::new(&self.uri, vocab::NIF_HAS_CONTEXT, Term::iri(&context.uri))
        }))
        .chain(self.contexts.iter().flat_map(|context| context.triples()))
    }
}

#[sealed]
impl TypeInfo for Collection {
    fn typeinfo() -> Type {
        Type::Collection
    }
}
