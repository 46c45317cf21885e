use std::fmt;

// ------------------------------ ERROR DEFINITIONS & IMPLEMENTATIONS -------------------------------------------------------------

#[derive(Debug)]
pub enum NifError {
    /// The input document carries no resolvable source-document URI. The source URI seeds the
    /// whole identifier tree, so conversion can not proceed without one. Not retried.
    MissingSourceUri(&'static str),

    /// No registered parser accepted the content of the given file or archive member.
    UnrecognizedFormat(String),

    /// A referenced context URI has no matching Context-typed subject in the graph.
    MalformedContext(String),

    /// A syntax error in a turtle or hextuples source; carries the line number (1-indexed)
    /// and a message.
    SyntaxError(usize, String),

    /// Wraps an I/O error; carries the filename and a context message.
    IoError(std::io::Error, String, &'static str),

    /// Wraps a JSON deserialisation error; carries the filename (or source description) and a
    /// context message.
    JsonError(serde_path_to_error::Error<serde_json::Error>, String, &'static str),

    /// Wraps an error from the zip archive reader; carries the archive filename and a context
    /// message.
    ArchiveError(zip::result::ZipError, String, &'static str),

    /// An error during serialisation.
    SerializationError(String),

    OtherError(&'static str),
}

impl From<&NifError> for String {
    /// Returns the error message as a String
    fn from(error: &NifError) -> String {
        match error {
            NifError::MissingSourceUri(msg) => {
                format!("MissingSourceUri: Document has no source URI ({})", msg)
            }
            NifError::UnrecognizedFormat(source) => {
                format!("UnrecognizedFormat: No parser accepts: {}", source)
            }
            NifError::MalformedContext(uri) => {
                format!("MalformedContext: No such context in graph: {}", uri)
            }
            NifError::SyntaxError(line, msg) => {
                format!("SyntaxError: line {}: {}", line, msg)
            }
            NifError::IoError(err, file, msg) => format!("IoError: {} [{}] ({})", err, file, msg),
            NifError::JsonError(err, file, msg) => {
                format!("JsonError: {} [{}] ({})", err, file, msg)
            }
            NifError::ArchiveError(err, file, msg) => {
                format!("ArchiveError: {} [{}] ({})", err, file, msg)
            }
            NifError::SerializationError(msg) => format!("SerializationError: {}", msg),
            NifError::OtherError(msg) => format!("OtherError: {}", msg),
        }
    }
}

impl fmt::Display for NifError {
    /// Formats the error message for printing
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let errmsg: String = String::from(self);
        write!(f, "[NifError] {}", errmsg)
    }
}

impl std::error::Error for NifError {}
