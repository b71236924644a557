use thiserror::Error;

/// Result type for javamodel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types surfaced by the parser, the project façade and the classpath layer.
///
/// Unresolvable type names are not errors; they stay unresolved on the
/// affected `TypeReference`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Lexical error at line {line}, column {column}: {message}")]
    Lexical {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Line and column for errors raised while reading source text
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Parse { line, column, .. } | Error::Lexical { line, column, .. } => {
                Some((*line, *column))
            }
            _ => None,
        }
    }
}
