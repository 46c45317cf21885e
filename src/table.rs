/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! Tabular reporting view over a graph: one row per context, one column per Dublin Core
//! metadata predicate, for inspection purposes. A thin projection built on the store's
//! query capability, not part of the conversion core.

use std::collections::BTreeSet;

use crate::error::NifError;
use crate::graph::NifGraph;
use crate::statement::Term;
use crate::vocab;

/// A simple row set: column names plus one row of cells per context. Cells are empty
/// strings where a context lacks the predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Context URIs, one per row, in first-seen order
    pub index: Vec<String>,
    /// Column names (compacted predicate names), sorted by name
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Serialize the table as CSV, with a leading `index` column holding the context URI
    pub fn to_csv_writer<W>(&self, writer: W) -> Result<(), NifError>
    where
        W: std::io::Write,
    {
        let mut writer = csv::Writer::from_writer(writer);
        let mut header = vec!["index".to_string()];
        header.extend(self.columns.iter().cloned());
        writer
            .write_record(&header)
            .map_err(|e| NifError::SerializationError(format!("Failure serializing CSV: {}", e)))?;
        for (uri, row) in self.index.iter().zip(self.rows.iter()) {
            let mut record = vec![uri.clone()];
            record.extend(row.iter().cloned());
            writer.write_record(&record).map_err(|e| {
                NifError::SerializationError(format!("Failure serializing CSV: {}", e))
            })?;
        }
        writer
            .flush()
            .map_err(|e| NifError::IoError(e, "<csv output>".to_string(), "Writing CSV failed"))
    }

    pub fn to_csv_string(&self) -> Result<String, NifError> {
        let mut buffer = Vec::new();
        self.to_csv_writer(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|_| NifError::SerializationError("CSV output was not UTF-8".to_string()))
    }
}

impl NifGraph {
    /// Build the catalog: one row per Context-typed subject with its Dublin Core
    /// metadata, columns sorted by name, plus a collection-wide conformance-profile
    /// column replicated on every row.
    pub fn catalog(&self) -> Table {
        //the collection-level conformance profiles, joined when there are several
        let mut conforms_to: Vec<String> = Vec::new();
        for (_, predicates) in self.aggregate_by_type(vocab::NIF_CONTEXT_COLLECTION) {
            if let Some(values) = predicates.get(vocab::DCTERMS_CONFORMS_TO) {
                for term in values {
                    if let Some(uri) = term.as_iri() {
                        if !conforms_to.iter().any(|x| x == uri) {
                            conforms_to.push(uri.to_string());
                        }
                    }
                }
            }
        }
        let conforms_to = conforms_to.join(", ");

        let contexts = self.aggregate_by_type(vocab::NIF_CONTEXT);

        //collect the dc/dcterms column set over all contexts
        let mut column_set: BTreeSet<String> = BTreeSet::new();
        for (_, predicates) in contexts.iter() {
            for predicate in predicates.keys() {
                if predicate.starts_with(vocab::DC) || predicate.starts_with(vocab::DCTERMS) {
                    column_set.insert(self.column_name(predicate));
                }
            }
        }
        let conforms_to_column = self.column_name(vocab::DCTERMS_CONFORMS_TO);
        column_set.insert(conforms_to_column.clone());
        let columns: Vec<String> = column_set.into_iter().collect();

        let mut index = Vec::with_capacity(contexts.len());
        let mut rows = Vec::with_capacity(contexts.len());
        for (uri, predicates) in contexts.iter() {
            let mut row = Vec::with_capacity(columns.len());
            for column in columns.iter() {
                if *column == conforms_to_column {
                    row.push(conforms_to.clone());
                    continue;
                }
                let cell = predicates
                    .iter()
                    .find(|(predicate, _)| self.column_name(predicate) == *column)
                    .and_then(|(_, values)| values.last())
                    .map(|term| match term {
                        Term::Iri(uri) => uri.clone(),
                        Term::Literal(literal) => literal.lexical(),
                    })
                    .unwrap_or_default();
                row.push(cell);
            }
            index.push(uri.clone());
            rows.push(row);
        }

        Table {
            index,
            columns,
            rows,
        }
    }

    /// Compact a predicate URI to a qname column name where a prefix binding covers it
    fn column_name(&self, predicate: &str) -> String {
        match self.namespaces().compact(predicate) {
            Some((prefix, local)) => format!("{}:{}", prefix, local),
            None => predicate.to_string(),
        }
    }
}
