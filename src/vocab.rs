/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! The fixed NIF vocabulary: namespace URIs and the predicate identifiers the wire format uses
//! verbatim. These are part of the interoperability contract; any graph produced by this crate
//! can be consumed by other NIF tooling and vice versa.
//!
//! Prefix bindings are not global state but live in an explicit [`Namespaces`] table that is
//! passed to serialisation; a default table binds the core prefixes.

/// NIF core namespace (version 2.1)
pub const NIF: &str = "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#";
/// OLiA, the Ontologies of Linguistic Annotation, used for linguistic links
pub const OLIA: &str = "http://purl.org/olia/olia.owl#";
/// ITS 2.0 / RDF ontology
pub const ITSRDF: &str = "http://www.w3.org/2005/11/its/rdf#";
/// Dublin Core elements
pub const DC: &str = "http://purl.org/dc/elements/1.1/";
/// Dublin Core terms
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// The conformance profile written on every collection this crate produces
pub const NIF_PROFILE: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core/version-2.1";

// type markers
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const NIF_CONTEXT_COLLECTION: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#ContextCollection";
pub const NIF_CONTEXT: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#Context";
pub const NIF_PHRASE: &str = "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#Phrase";

// link predicates
pub const NIF_HAS_CONTEXT: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#hasContext";
pub const NIF_REFERENCE_CONTEXT: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#referenceContext";
pub const NIF_OLIA_LINK: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#oliaLink";

// offset-anchored span predicates
pub const NIF_IS_STRING: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#isString";
pub const NIF_BEGIN_INDEX: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#beginIndex";
pub const NIF_END_INDEX: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#endIndex";
pub const NIF_ANCHOR_OF: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#anchorOf";
pub const NIF_SOURCE_URL: &str =
    "http://persistence.uni-leipzig.de/nlp2rdf/ontologies/nif-core#sourceUrl";

// provenance and labels
pub const DCTERMS_CONFORMS_TO: &str = "http://purl.org/dc/terms/conformsTo";
pub const DCTERMS_CREATED: &str = "http://purl.org/dc/terms/created";
pub const DC_CREATOR: &str = "http://purl.org/dc/elements/1.1/creator";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

// literal datatypes
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
pub const XSD_NON_NEGATIVE_INTEGER: &str =
    "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";

/// A prefix-to-namespace binding table, passed explicitly to serialisation and lookup
/// rather than living as process-wide state. Later bindings for the same prefix
/// override earlier ones.
#[derive(Debug, Clone)]
pub struct Namespaces {
    bindings: Vec<(String, String)>,
}

impl Default for Namespaces {
    /// The default table binds the core NIF vocabulary prefixes
    fn default() -> Self {
        let mut namespaces = Self {
            bindings: Vec::new(),
        };
        namespaces.bind("rdf", RDF);
        namespaces.bind("rdfs", RDFS);
        namespaces.bind("xsd", XSD);
        namespaces.bind("itsrdf", ITSRDF);
        namespaces.bind("dcterms", DCTERMS);
        namespaces.bind("dc", DC);
        namespaces.bind("nif", NIF);
        namespaces.bind("olia", OLIA);
        namespaces
    }
}

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a prefix to a namespace URI. Rebinding an existing prefix replaces it.
    pub fn bind(&mut self, prefix: impl Into<String>, uri: impl Into<String>) -> &mut Self {
        let prefix = prefix.into();
        let uri = uri.into();
        if let Some(binding) = self.bindings.iter_mut().find(|(p, _)| *p == prefix) {
            binding.1 = uri;
        } else {
            self.bindings.push((prefix, uri));
        }
        self
    }

    /// Look up the namespace URI bound to a prefix
    pub fn expand_prefix(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Compact a full URI to a `prefix:localname` pair if a binding covers it.
    /// The longest matching namespace wins.
    pub fn compact<'a>(&self, uri: &'a str) -> Option<(&str, &'a str)> {
        let mut best: Option<(&str, &'a str)> = None;
        for (prefix, ns) in self.bindings.iter() {
            if let Some(local) = uri.strip_prefix(ns.as_str()) {
                //the local part must be a simple name for the qname to be valid turtle
                if !local.is_empty()
                    && local
                        .chars()
                        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
                    && best.map(|(_, l)| local.len() < l.len()).unwrap_or(true)
                {
                    best = Some((prefix.as_str(), local));
                }
            }
        }
        best
    }

    /// Iterate over all (prefix, namespace) bindings
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}
