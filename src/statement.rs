/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! This module defines the atomic unit of the wire graph: the [`Statement`]
//! (subject–predicate–object triple), the [`Term`] that may occur in object
//! position, and the typed [`Literal`] values.

use chrono::{DateTime, FixedOffset};
use sealed::sealed;
use std::fmt;

use crate::types::*;
use crate::vocab;

/// A typed literal value as it occurs in object position of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    String(String),
    DateTime(DateTime<FixedOffset>),
    NonNegativeInt(usize),
    /// A literal with a datatype this crate does not interpret; the lexical form is
    /// preserved verbatim so foreign statements survive a round-trip.
    Typed(String, String),
}

impl Literal {
    /// Construct a literal from a lexical form plus datatype URI, interpreting the
    /// datatypes this crate knows about and falling back to [`Literal::Typed`].
    pub fn from_lexical(value: &str, datatype: &str) -> Self {
        match datatype {
            vocab::XSD_STRING => Self::String(value.to_string()),
            vocab::XSD_DATETIME => match DateTime::parse_from_rfc3339(value) {
                Ok(dt) => Self::DateTime(dt),
                Err(_) => Self::Typed(value.to_string(), datatype.to_string()),
            },
            vocab::XSD_NON_NEGATIVE_INTEGER => match value.parse::<usize>() {
                Ok(n) => Self::NonNegativeInt(n),
                Err(_) => Self::Typed(value.to_string(), datatype.to_string()),
            },
            _ => Self::Typed(value.to_string(), datatype.to_string()),
        }
    }

    /// The datatype URI of this literal
    pub fn datatype(&self) -> &str {
        match self {
            Self::String(_) => vocab::XSD_STRING,
            Self::DateTime(_) => vocab::XSD_DATETIME,
            Self::NonNegativeInt(_) => vocab::XSD_NON_NEGATIVE_INTEGER,
            Self::Typed(_, datatype) => datatype.as_str(),
        }
    }

    /// The lexical form of this literal
    pub fn lexical(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::DateTime(dt) => dt.to_rfc3339(),
            Self::NonNegativeInt(n) => n.to_string(),
            Self::Typed(s, _) => s.clone(),
        }
    }
}

impl From<&str> for Literal {
    fn from(item: &str) -> Self {
        Self::String(item.to_string())
    }
}

impl From<String> for Literal {
    fn from(item: String) -> Self {
        Self::String(item)
    }
}

impl From<usize> for Literal {
    fn from(item: usize) -> Self {
        Self::NonNegativeInt(item)
    }
}

impl From<DateTime<FixedOffset>> for Literal {
    fn from(item: DateTime<FixedOffset>) -> Self {
        Self::DateTime(item)
    }
}

/// A term in object position: either another identifier (URI) or a typed literal.
/// Subjects and predicates are always identifiers and are kept as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(uri: impl Into<String>) -> Self {
        Self::Iri(uri.into())
    }

    pub fn literal(literal: impl Into<Literal>) -> Self {
        Self::Literal(literal.into())
    }

    /// Returns the URI if this term is an identifier
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(uri) => Some(uri.as_str()),
            Self::Literal(_) => None,
        }
    }

    /// Returns the literal if this term is one
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Iri(_) => None,
            Self::Literal(literal) => Some(literal),
        }
    }
}

// These PartialEq implementations allow for more direct comparisons

impl PartialEq<str> for Term {
    fn eq(&self, other: &str) -> bool {
        match self {
            Self::Iri(uri) => uri == other,
            Self::Literal(Literal::String(s)) => s == other,
            _ => false,
        }
    }
}

impl PartialEq<Term> for str {
    fn eq(&self, other: &Term) -> bool {
        other == self
    }
}

/// The atomic triple: {subject identifier, predicate identifier, object value}.
/// A statement set forms a directed labeled multigraph and is the canonical wire
/// form of the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Statement {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: Term,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Statement {
    /// Renders the statement in an N-Triples-like form, mainly for debugging
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.object {
            Term::Iri(uri) => write!(f, "<{}> <{}> <{}> .", self.subject, self.predicate, uri),
            Term::Literal(literal) => write!(
                f,
                "<{}> <{}> \"{}\"^^<{}> .",
                self.subject,
                self.predicate,
                literal.lexical(),
                literal.datatype()
            ),
        }
    }
}

#[sealed]
impl TypeInfo for Statement {
    fn typeinfo() -> Type {
        Type::Statement
    }
}

/// A triple pattern for querying a graph: each position either constrains the
/// statement or is a wildcard (`None`).
#[derive(Debug, Clone, Default)]
pub struct TriplePattern<'a> {
    pub subject: Option<&'a str>,
    pub predicate: Option<&'a str>,
    pub object: Option<&'a Term>,
}

impl<'a> TriplePattern<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: &'a str) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: &'a str) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: &'a Term) -> Self {
        self.object = Some(object);
        self
    }

    /// Does the pattern match the given statement?
    pub fn matches(&self, statement: &Statement) -> bool {
        self.subject.map(|s| s == statement.subject).unwrap_or(true)
            && self
                .predicate
                .map(|p| p == statement.predicate)
                .unwrap_or(true)
            && self.object.map(|o| *o == statement.object).unwrap_or(true)
    }
}
