/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! The generic structured-triple text encoding: a Turtle subset. Supported syntax:
//! `@prefix`/`PREFIX` and `@base`/`BASE` directives, IRIs, prefixed names, blank node
//! labels, the `a` keyword, string literals (short and long form, with escapes),
//! numeric and boolean literals, `^^` datatypes, language tags, predicate (`;`) and
//! object (`,`) lists, and comments. Anonymous blank nodes `[...]` and RDF collections
//! `(...)` are not supported and fail with a syntax error.
//!
//! The serializer writes one predicate list per subject, compacting IRIs against a
//! [`Namespaces`] table.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::NifError;
use crate::statement::{Literal, Statement, Term};
use crate::vocab::{self, Namespaces};

// ----------------------------------- lexer -----------------------------------

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Iri(String),
    /// prefix (possibly empty) and local part of a prefixed name
    PrefixedName(String, String),
    BlankNode(String),
    StringLit(String),
    /// bare numeric literal, lexical form preserved
    Numeric(String),
    Boolean(bool),
    A,
    KwPrefix,
    KwBase,
    KwSparqlPrefix,
    KwSparqlBase,
    LangTag(String),
    CaretCaret,
    Dot,
    Semicolon,
    Comma,
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    line: usize,
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    input: &'a str,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            input,
            line: 1,
        }
    }

    fn error(&self, msg: impl Into<String>) -> NifError {
        NifError::SyntaxError(self.line, msg.into())
    }

    fn tokenize(mut self) -> Result<Vec<Token>, NifError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let line = self.line;
            let Some(&(_, c)) = self.chars.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line,
                });
                return Ok(tokens);
            };
            let kind = match c {
                '<' => self.lex_iri()?,
                '"' | '\'' => self.lex_string(c)?,
                '.' => {
                    self.chars.next();
                    TokenKind::Dot
                }
                ';' => {
                    self.chars.next();
                    TokenKind::Semicolon
                }
                ',' => {
                    self.chars.next();
                    TokenKind::Comma
                }
                '^' => {
                    self.chars.next();
                    match self.chars.next() {
                        Some((_, '^')) => TokenKind::CaretCaret,
                        _ => return Err(self.error("expected '^^'")),
                    }
                }
                '@' => self.lex_at_word()?,
                '[' | ']' | '(' | ')' => {
                    return Err(self.error(format!(
                        "'{}' is not supported (anonymous blank nodes and collections)",
                        c
                    )))
                }
                _ => self.lex_name()?,
            };
            tokens.push(Token { kind, line });
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' {
                self.line += 1;
                self.chars.next();
            } else if c.is_whitespace() {
                self.chars.next();
            } else if c == '#' {
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.chars.next();
                }
            } else {
                break;
            }
        }
    }

    fn lex_iri(&mut self) -> Result<TokenKind, NifError> {
        self.chars.next(); //consume '<'
        let mut iri = String::new();
        loop {
            match self.chars.next() {
                Some((_, '>')) => return Ok(TokenKind::Iri(iri)),
                Some((_, '\n')) | None => return Err(self.error("unterminated IRI")),
                Some((_, c)) => iri.push(c),
            }
        }
    }

    /// Lex a short or long (triple-quoted) string literal
    fn lex_string(&mut self, quote: char) -> Result<TokenKind, NifError> {
        self.chars.next(); //consume opening quote
        let long = if self.peek_char() == Some(quote) {
            self.chars.next();
            if self.peek_char() == Some(quote) {
                self.chars.next();
                true
            } else {
                //two quotes in a row: the empty short string
                return Ok(TokenKind::StringLit(String::new()));
            }
        } else {
            false
        };
        let mut value = String::new();
        loop {
            match self.chars.next() {
                None => return Err(self.error("unterminated string literal")),
                Some((_, '\\')) => value.push(self.lex_escape()?),
                Some((_, c)) if c == quote => {
                    if !long {
                        return Ok(TokenKind::StringLit(value));
                    }
                    //long strings end at three consecutive quotes
                    if self.peek_char() == Some(quote) {
                        self.chars.next();
                        if self.peek_char() == Some(quote) {
                            self.chars.next();
                            return Ok(TokenKind::StringLit(value));
                        }
                        value.push(quote);
                        value.push(quote);
                    } else {
                        value.push(quote);
                    }
                }
                Some((_, '\n')) if !long => return Err(self.error("unterminated string literal")),
                Some((_, c)) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    value.push(c);
                }
            }
        }
    }

    fn lex_escape(&mut self) -> Result<char, NifError> {
        match self.chars.next() {
            Some((_, 't')) => Ok('\t'),
            Some((_, 'n')) => Ok('\n'),
            Some((_, 'r')) => Ok('\r'),
            Some((_, '"')) => Ok('"'),
            Some((_, '\'')) => Ok('\''),
            Some((_, '\\')) => Ok('\\'),
            Some((_, 'u')) => self.lex_unicode_escape(4),
            Some((_, 'U')) => self.lex_unicode_escape(8),
            _ => Err(self.error("invalid escape sequence")),
        }
    }

    fn lex_unicode_escape(&mut self, digits: usize) -> Result<char, NifError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let Some((_, c)) = self.chars.next() else {
                return Err(self.error("truncated unicode escape"));
            };
            let Some(digit) = c.to_digit(16) else {
                return Err(self.error("invalid unicode escape"));
            };
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode codepoint"))
    }

    fn lex_at_word(&mut self) -> Result<TokenKind, NifError> {
        self.chars.next(); //consume '@'
        let word = self.take_while(|c| c.is_alphanumeric() || c == '-');
        match word.as_str() {
            "prefix" => Ok(TokenKind::KwPrefix),
            "base" => Ok(TokenKind::KwBase),
            _ if !word.is_empty() => Ok(TokenKind::LangTag(word)),
            _ => Err(self.error("expected directive or language tag after '@'")),
        }
    }

    /// Lex a bare name: a prefixed name, keyword, number or boolean.
    fn lex_name(&mut self) -> Result<TokenKind, NifError> {
        let word = self.take_name();
        if word.is_empty() {
            let c = self.peek_char().unwrap_or('?');
            return Err(self.error(format!("unexpected character '{}'", c)));
        }
        match word.as_str() {
            "a" => return Ok(TokenKind::A),
            "true" => return Ok(TokenKind::Boolean(true)),
            "false" => return Ok(TokenKind::Boolean(false)),
            "PREFIX" => return Ok(TokenKind::KwSparqlPrefix),
            "BASE" => return Ok(TokenKind::KwSparqlBase),
            _ => {}
        }
        if word
            .chars()
            .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == '.' || c == 'e' || c == 'E')
            && word.chars().any(|c| c.is_ascii_digit())
        {
            return Ok(TokenKind::Numeric(word));
        }
        if let Some(label) = word.strip_prefix("_:") {
            return Ok(TokenKind::BlankNode(label.to_string()));
        }
        match word.split_once(':') {
            Some((prefix, local)) => Ok(TokenKind::PrefixedName(
                prefix.to_string(),
                local.to_string(),
            )),
            None => Err(self.error(format!("expected a prefixed name, found '{}'", word))),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if predicate(c) {
                out.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        out
    }

    /// Take a name token. A '.' is part of the name only when followed by a name
    /// character, so the statement-terminating dot is never swallowed.
    fn take_name(&mut self) -> String {
        let mut out = String::new();
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, ';' | ',' | '"' | '\'' | '<' | '^' | '#' | '[' | ']' | '(' | ')')
            {
                break;
            }
            if c == '.' {
                let next = self.input[i + 1..].chars().next();
                if !next.map(|n| n.is_alphanumeric() || n == '_').unwrap_or(false) {
                    break;
                }
            }
            out.push(c);
            self.chars.next();
        }
        out
    }
}

// ----------------------------------- parser -----------------------------------

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    prefixes: HashMap<String, String>,
    base: Option<String>,
    statements: Vec<Statement>,
}

impl Parser {
    fn new(input: &str) -> Result<Self, NifError> {
        Ok(Self {
            tokens: Lexer::new(input).tokenize()?,
            pos: 0,
            prefixes: HashMap::new(),
            base: None,
            statements: Vec::new(),
        })
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, msg: impl Into<String>) -> NifError {
        NifError::SyntaxError(self.current().line, msg.into())
    }

    fn expect_dot(&mut self) -> Result<(), NifError> {
        match self.advance().kind {
            TokenKind::Dot => Ok(()),
            other => Err(self.error_here(format!("expected '.', found {:?}", other))),
        }
    }

    fn parse(mut self) -> Result<Vec<Statement>, NifError> {
        while !matches!(self.current().kind, TokenKind::Eof) {
            match self.current().kind {
                TokenKind::KwPrefix | TokenKind::KwSparqlPrefix => self.parse_prefix()?,
                TokenKind::KwBase | TokenKind::KwSparqlBase => self.parse_base()?,
                _ => self.parse_triples()?,
            }
        }
        Ok(self.statements)
    }

    fn parse_prefix(&mut self) -> Result<(), NifError> {
        let sparql_style = matches!(self.current().kind, TokenKind::KwSparqlPrefix);
        self.advance();
        let prefix = match self.advance().kind {
            TokenKind::PrefixedName(prefix, local) if local.is_empty() => prefix,
            other => {
                return Err(self.error_here(format!("expected prefix name, found {:?}", other)))
            }
        };
        let namespace = match self.advance().kind {
            TokenKind::Iri(iri) => self.resolve_iri(&iri),
            other => {
                return Err(self.error_here(format!(
                    "expected IRI for prefix namespace, found {:?}",
                    other
                )))
            }
        };
        self.prefixes.insert(prefix, namespace);
        if !sparql_style {
            self.expect_dot()?;
        }
        Ok(())
    }

    fn parse_base(&mut self) -> Result<(), NifError> {
        let sparql_style = matches!(self.current().kind, TokenKind::KwSparqlBase);
        self.advance();
        match self.advance().kind {
            TokenKind::Iri(iri) => self.base = Some(iri),
            other => return Err(self.error_here(format!("expected IRI for base, found {:?}", other))),
        }
        if !sparql_style {
            self.expect_dot()?;
        }
        Ok(())
    }

    fn parse_triples(&mut self) -> Result<(), NifError> {
        let subject = self.parse_identifier("subject")?;
        loop {
            let predicate = match self.current().kind {
                TokenKind::A => {
                    self.advance();
                    vocab::RDF_TYPE.to_string()
                }
                _ => self.parse_identifier("predicate")?,
            };
            loop {
                let object = self.parse_object()?;
                self.statements
                    .push(Statement::new(subject.clone(), predicate.clone(), object));
                if matches!(self.current().kind, TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            if matches!(self.current().kind, TokenKind::Semicolon) {
                self.advance();
                //a dangling semicolon before the dot is valid turtle
                if matches!(self.current().kind, TokenKind::Dot) {
                    break;
                }
            } else {
                break;
            }
        }
        self.expect_dot()
    }

    /// Parse a term that must be an identifier (subject or predicate position)
    fn parse_identifier(&mut self, position: &str) -> Result<String, NifError> {
        match self.advance().kind {
            TokenKind::Iri(iri) => Ok(self.resolve_iri(&iri)),
            TokenKind::PrefixedName(prefix, local) => self.expand(&prefix, &local),
            TokenKind::BlankNode(label) => Ok(format!("_:{}", label)),
            other => Err(self.error_here(format!(
                "expected an identifier in {} position, found {:?}",
                position, other
            ))),
        }
    }

    fn parse_object(&mut self) -> Result<Term, NifError> {
        match self.advance().kind {
            TokenKind::Iri(iri) => Ok(Term::Iri(self.resolve_iri(&iri))),
            TokenKind::PrefixedName(prefix, local) => {
                Ok(Term::Iri(self.expand(&prefix, &local)?))
            }
            TokenKind::BlankNode(label) => Ok(Term::Iri(format!("_:{}", label))),
            TokenKind::StringLit(value) => {
                //optional language tag or datatype
                match self.current().kind.clone() {
                    TokenKind::LangTag(_) => {
                        //language tags are accepted but not modelled; the value is kept
                        self.advance();
                        Ok(Term::literal(value))
                    }
                    TokenKind::CaretCaret => {
                        self.advance();
                        let datatype = self.parse_identifier("datatype")?;
                        Ok(Term::Literal(Literal::from_lexical(&value, &datatype)))
                    }
                    _ => Ok(Term::literal(value)),
                }
            }
            TokenKind::Numeric(lexical) => {
                let datatype = if lexical.contains('.') || lexical.contains('e') || lexical.contains('E') {
                    format!("{}decimal", vocab::XSD)
                } else {
                    format!("{}integer", vocab::XSD)
                };
                Ok(Term::Literal(Literal::from_lexical(&lexical, &datatype)))
            }
            TokenKind::Boolean(value) => Ok(Term::Literal(Literal::Typed(
                value.to_string(),
                format!("{}boolean", vocab::XSD),
            ))),
            other => Err(self.error_here(format!("expected an object term, found {:?}", other))),
        }
    }

    fn expand(&self, prefix: &str, local: &str) -> Result<String, NifError> {
        match self.prefixes.get(prefix) {
            Some(namespace) => Ok(format!("{}{}", namespace, local)),
            None => Err(NifError::SyntaxError(
                self.current().line,
                format!("undefined prefix '{}:'", prefix),
            )),
        }
    }

    fn resolve_iri(&self, iri: &str) -> String {
        //relative IRI resolution against @base; only straightforward concatenation,
        //no path normalisation
        if iri.contains("://") || iri.starts_with("urn:") || self.base.is_none() {
            iri.to_string()
        } else {
            format!("{}{}", self.base.as_deref().unwrap_or(""), iri)
        }
    }
}

/// Parse a turtle document into statements.
pub(crate) fn parse_turtle_str(data: &str) -> Result<Vec<Statement>, NifError> {
    Parser::new(data)?.parse()
}

// --------------------------------- serializer ---------------------------------

fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn render_iri(uri: &str, namespaces: &Namespaces) -> String {
    match namespaces.compact(uri) {
        Some((prefix, local)) => format!("{}:{}", prefix, local),
        None => format!("<{}>", uri),
    }
}

fn render_term(term: &Term, namespaces: &Namespaces) -> String {
    match term {
        Term::Iri(uri) => render_iri(uri, namespaces),
        Term::Literal(literal) => match literal {
            Literal::String(s) => format!("\"{}\"", escape_string(s)),
            _ => format!(
                "\"{}\"^^{}",
                escape_string(&literal.lexical()),
                render_iri(literal.datatype(), namespaces)
            ),
        },
    }
}

/// Serialize statements as turtle, grouping consecutive statements that share a subject
/// into one predicate list. Prefix bindings from the namespace table are declared up
/// front and used for compaction.
pub(crate) fn write_turtle<'a, W, I>(
    writer: &mut W,
    statements: I,
    namespaces: &Namespaces,
) -> Result<(), NifError>
where
    W: std::io::Write,
    I: Iterator<Item = &'a Statement>,
{
    let io_err =
        |e| NifError::IoError(e, "<turtle output>".to_string(), "Writing turtle failed");
    for (prefix, uri) in namespaces.iter() {
        writeln!(writer, "@prefix {}: <{}> .", prefix, uri).map_err(io_err)?;
    }
    writeln!(writer).map_err(io_err)?;

    //group by subject, preserving first-seen subject order
    let mut subjects: Vec<&str> = Vec::new();
    let mut by_subject: HashMap<&str, Vec<&Statement>> = HashMap::new();
    for statement in statements {
        let entry = by_subject.entry(statement.subject.as_str()).or_default();
        if entry.is_empty() {
            subjects.push(statement.subject.as_str());
        }
        entry.push(statement);
    }

    for subject in subjects {
        let group = &by_subject[subject];
        writeln!(writer, "{}", render_iri(subject, namespaces)).map_err(io_err)?;
        for (i, statement) in group.iter().enumerate() {
            let predicate = if statement.predicate == vocab::RDF_TYPE {
                "a".to_string()
            } else {
                render_iri(&statement.predicate, namespaces)
            };
            let terminator = if i + 1 == group.len() { " ." } else { " ;" };
            writeln!(
                writer,
                "    {} {}{}",
                predicate,
                render_term(&statement.object, namespaces),
                terminator
            )
            .map_err(io_err)?;
        }
        writeln!(writer).map_err(io_err)?;
    }
    Ok(())
}
