use super::span::Location;
use crate::error::Error;
use thiserror::Error;

/// Fatal error raised while lexing or parsing one compilation unit.
///
/// Every variant carries the position at which parsing stopped; callers must
/// discard whatever the builder received before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Unexpected token encountered
    #[error("Parse error at {location}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        location: Location,
    },

    /// Unexpected end of input
    #[error("Parse error at {location}: unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput {
        expected: String,
        location: Location,
    },

    /// Grammatically well-formed tokens in an illegal arrangement
    #[error("Parse error at {location}: {message}")]
    InvalidSyntax {
        message: String,
        location: Location,
    },

    /// Lexical error
    #[error("Lexical error at {location}: {message}")]
    Lexical {
        message: String,
        location: Location,
    },
}

/// Result type for parsing operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

impl ParseError {
    pub fn unexpected_token(expected: &str, found: &str, location: Location) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            location,
        }
    }

    pub fn unexpected_end_of_input(expected: &str, location: Location) -> Self {
        ParseError::UnexpectedEndOfInput {
            expected: expected.to_string(),
            location,
        }
    }

    pub fn invalid_syntax(message: impl Into<String>, location: Location) -> Self {
        ParseError::InvalidSyntax {
            message: message.into(),
            location,
        }
    }

    pub fn lexical(message: impl Into<String>, location: Location) -> Self {
        ParseError::Lexical {
            message: message.into(),
            location,
        }
    }

    /// Human readable description without the position prefix
    pub fn message(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, found, .. } => {
                format!("expected {}, found {}", expected, found)
            }
            ParseError::UnexpectedEndOfInput { expected, .. } => {
                format!("unexpected end of input, expected {}", expected)
            }
            ParseError::InvalidSyntax { message, .. } | ParseError::Lexical { message, .. } => {
                message.clone()
            }
        }
    }

    pub fn location(&self) -> Location {
        match self {
            ParseError::UnexpectedToken { location, .. }
            | ParseError::UnexpectedEndOfInput { location, .. }
            | ParseError::InvalidSyntax { location, .. }
            | ParseError::Lexical { location, .. } => *location,
        }
    }

    pub fn line(&self) -> usize {
        self.location().line
    }

    pub fn column(&self) -> usize {
        self.location().column
    }
}

impl From<ParseError> for Error {
    fn from(parse_error: ParseError) -> Self {
        let location = parse_error.location();
        match parse_error {
            ParseError::Lexical { message, .. } => Error::Lexical {
                line: location.line,
                column: location.column,
                message,
            },
            other => Error::Parse {
                line: location.line,
                column: location.column,
                message: other.message(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = ParseError::unexpected_token("';'", "'}'", Location::new(3, 14, 40));
        assert_eq!(err.to_string(), "Parse error at 3:14: expected ';', found '}'");
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), 14);
        assert_eq!(err.message(), "expected ';', found '}'");
    }

    #[test]
    fn converts_into_crate_error() {
        let err: Error = ParseError::lexical("unterminated comment", Location::new(2, 1, 10)).into();
        assert!(matches!(err, Error::Lexical { line: 2, column: 1, .. }));
    }
}
