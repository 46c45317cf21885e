/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! The line-oriented flat-triple encoding: Hextuples. Every line is one JSON array of
//! six strings `[subject, predicate, value, datatype, language, graph]`, where the
//! datatype slot holds the marker `"globalId"` when the value is an identifier rather
//! than a literal. Parsed with `serde_json`, one line at a time.

use serde_json::Value;

use crate::error::NifError;
use crate::statement::{Literal, Statement, Term};

/// The datatype marker hextuples uses for identifier (non-literal) values
const GLOBAL_ID: &str = "globalId";

/// Parse a hextuples document into statements. Empty lines are skipped; any
/// malformed line fails the whole parse with a [`NifError::SyntaxError`] carrying
/// the line number.
pub(crate) fn parse_hext_str(data: &str) -> Result<Vec<Statement>, NifError> {
    let mut statements = Vec::new();
    for (index, line) in data.lines().enumerate() {
        let lineno = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .map_err(|e| NifError::SyntaxError(lineno, format!("invalid JSON: {}", e)))?;
        let fields = value
            .as_array()
            .ok_or_else(|| NifError::SyntaxError(lineno, "expected a JSON array".to_string()))?;
        if fields.len() != 6 {
            return Err(NifError::SyntaxError(
                lineno,
                format!("expected 6 fields, found {}", fields.len()),
            ));
        }
        let mut strings = Vec::with_capacity(6);
        for field in fields {
            strings.push(field.as_str().ok_or_else(|| {
                NifError::SyntaxError(lineno, "all hextuple fields must be strings".to_string())
            })?);
        }
        let (subject, predicate, value, datatype) =
            (strings[0], strings[1], strings[2], strings[3]);
        let object = if datatype == GLOBAL_ID {
            Term::iri(value)
        } else {
            Term::Literal(Literal::from_lexical(value, datatype))
        };
        statements.push(Statement::new(subject, predicate, object));
    }
    Ok(statements)
}

/// Serialize statements as a hextuples document, one line per statement.
pub(crate) fn write_hext<'a, W, I>(writer: &mut W, statements: I) -> Result<(), NifError>
where
    W: std::io::Write,
    I: Iterator<Item = &'a Statement>,
{
    for statement in statements {
        let (value, datatype) = match &statement.object {
            Term::Iri(uri) => (uri.clone(), GLOBAL_ID.to_string()),
            Term::Literal(literal) => (literal.lexical(), literal.datatype().to_string()),
        };
        let row = [
            statement.subject.as_str(),
            statement.predicate.as_str(),
            value.as_str(),
            datatype.as_str(),
            "",
            "",
        ];
        let line = serde_json::to_string(&row)
            .map_err(|e| NifError::SerializationError(format!("writing hextuples: {}", e)))?;
        writeln!(writer, "{}", line).map_err(|e| {
            NifError::IoError(e, "<hext output>".to_string(), "Writing hextuples failed")
        })?;
    }
    Ok(())
}
