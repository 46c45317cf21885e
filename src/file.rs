/*
    nifgraph: NIF (NLP Interchange Format) annotation graphs for Rust

    Licensed under the GNU General Public License v3
*/

//! This module contains some common helper functions for dealing with file I/O,
//! and the filename-based format sniffing used to dispatch parsing.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::NifError;
use crate::types::debug;

/// A source encoding recognised by the parser dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// The native annotation XML, handled by an external document parser and then converted
    AnnotationXml,
    /// A zip archive whose members are dispatched individually
    Archive,
    /// The line-oriented flat-triple encoding (hextuples, one JSON array per line)
    Hextuples,
    /// The generic structured-triple text encoding (turtle)
    Turtle,
    /// Not recognised by suffix; a best-effort generic parse is attempted
    Unknown,
}

/// Ordered list of (filename predicate, format) matchers. First match wins, so the
/// compound `.naf.xml` suffix must precede any plain `.xml` entry added later.
const FORMAT_MATCHERS: &[(&str, SourceFormat)] = &[
    ("naf.xml", SourceFormat::AnnotationXml),
    ("zip", SourceFormat::Archive),
    ("hext", SourceFormat::Hextuples),
    ("ttl", SourceFormat::Turtle),
];

/// Determine the source format of a file purely from its filename suffix.
/// Matching is case-insensitive. Unrecognised suffixes yield [`SourceFormat::Unknown`],
/// for which a best-effort generic parse is attempted.
pub fn sniff_format(filename: &str) -> SourceFormat {
    let lower = filename.to_lowercase();
    for (suffix, format) in FORMAT_MATCHERS {
        if lower.ends_with(suffix) {
            return *format;
        }
    }
    SourceFormat::Unknown
}

/// Get a file for reading or writing, this resolves relative files more intelligently
pub(crate) fn get_filepath(filename: &str, workdir: Option<&Path>) -> Result<PathBuf, NifError> {
    if filename == "-" {
        //designates stdin or stdout
        return Ok(filename.into());
    }
    if filename.starts_with("https://") || filename.starts_with("http://") {
        return Err(NifError::OtherError("Loading URLs is not supported"));
    }
    let path = if filename.starts_with("file://") {
        //strip the file:// prefix
        PathBuf::from(&filename[7..])
    } else {
        PathBuf::from(filename)
    };
    if path.is_absolute() {
        Ok(path)
    } else {
        //check whether we can find one in our workdir first
        if let Some(workdir) = workdir {
            let path = workdir.join(&path);
            if path.is_file() {
                //should also work with symlinks
                return Ok(path);
            }
        }

        //final fallback is simply relative to the current working directory,
        //we don't test for existence here
        Ok(path)
    }
}

/// Auxiliary function to help open files
pub(crate) fn open_file(filename: &str, config: &Config) -> Result<File, NifError> {
    let found_filename = get_filepath(filename, config.workdir())?;
    debug(config, || format!("open_file: {:?}", found_filename));
    File::open(found_filename.as_path()).map_err(|e| {
        NifError::IoError(
            e,
            found_filename.to_string_lossy().into_owned(),
            "Opening file for reading failed",
        )
    })
}

/// Auxiliary function to help open files
pub(crate) fn create_file(filename: &str, config: &Config) -> Result<File, NifError> {
    let found_filename = get_filepath(filename, config.workdir())?;
    debug(config, || format!("create_file: {:?}", found_filename));
    File::create(found_filename.as_path()).map_err(|e| {
        NifError::IoError(
            e,
            found_filename.to_string_lossy().into_owned(),
            "Opening file for writing failed",
        )
    })
}

/// Auxiliary function to help open files
pub(crate) fn open_file_reader(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn BufRead>, NifError> {
    if filename == "-" {
        //read from stdin
        Ok(Box::new(BufReader::new(std::io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(open_file(filename, config)?)))
    }
}

/// Auxiliary function to help open files
pub(crate) fn open_file_writer(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn Write>, NifError> {
    if filename == "-" {
        Ok(Box::new(std::io::stdout()))
    } else {
        Ok(Box::new(BufWriter::new(create_file(filename, config)?)))
    }
}
