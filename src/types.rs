use sealed::sealed;
use std::fmt;

use crate::config::Config;

/// A half-open character offset range within a context's text.
/// Units are unicode codepoints (not bytes!) and are 0-indexed;
/// `end` is exclusive, so the range (0,5) covers five codepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetRange {
    pub begin: usize,
    pub end: usize,
}

impl OffsetRange {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }
}

impl From<(usize, usize)> for OffsetRange {
    fn from((begin, end): (usize, usize)) -> Self {
        Self { begin, end }
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// Enumerates the structural types of the model, used for introspection in
/// error messages and serialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Collection,
    Context,
    SpanAnnotation,
    Statement,
    Graph,
    Config,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Collection => write!(f, "Collection"),
            Self::Context => write!(f, "Context"),
            Self::SpanAnnotation => write!(f, "SpanAnnotation"),
            Self::Statement => write!(f, "Statement"),
            Self::Graph => write!(f, "NifGraph"),
            Self::Config => write!(f, "Config"),
        }
    }
}

/// This trait is used for introspection on the structural type.
/// It is a sealed trait, not implementable outside this crate.
#[sealed(pub(crate))] //<-- this ensures nobody outside this crate can implement the trait
pub trait TypeInfo {
    fn typeinfo() -> Type;
}

/// Print a debug message to standard error output, only when debug mode is
/// enabled in the configuration. The message is constructed lazily.
pub(crate) fn debug<F>(config: &Config, message: F)
where
    F: FnOnce() -> String,
{
    if config.debug() {
        eprintln!("[nifgraph debug] {}", message());
    }
}
