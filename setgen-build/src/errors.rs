use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::syntax::Position;

/// Malformed Go source, with the 1-based position where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn at(pos: Position, message: impl Into<String>) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
            message: message.into(),
        }
    }
}

/// A type expression the printer has no canonical form for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported type expression: {kind}")]
pub struct UnsupportedTypeError {
    pub kind: &'static str,
}

/// Rendering the companion file model failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("`{0}` is not a valid Go identifier")]
    InvalidIdentifier(String),

    #[error("invalid import path {0:?}")]
    InvalidImportPath(String),

    #[error("nothing to render")]
    Empty,
}

/// Rendered text could not be brought into canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonicalizeError {
    #[error("generated source does not parse: {0}")]
    Parse(#[from] ParseError),

    #[error("generated source contains {what} at {line}:{column}")]
    Unexpected {
        what: &'static str,
        line: usize,
        column: usize,
    },

    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),
}

/// Everything that can stop one source file from producing its companion.
///
/// Each variant is fatal for its file only; the generator records it and
/// moves on to the next file.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}:{source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("field {owner}.{field}: {source}")]
    UnsupportedType {
        owner: String,
        field: String,
        #[source]
        source: UnsupportedTypeError,
    },

    #[error("failed to render setters: {0}")]
    Render(#[from] RenderError),

    #[error("failed to canonicalize setters: {0}")]
    Canonicalize(#[from] CanonicalizeError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    /// Short stable label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Parse { .. } => "parse",
            Self::UnsupportedType { .. } => "unsupported-type",
            Self::Render(_) => "render",
            Self::Canonicalize(_) => "canonicalize",
            Self::Write { .. } => "write",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = GenerateError::Parse {
            path: PathBuf::from("models/user.go"),
            source: ParseError {
                line: 3,
                column: 7,
                message: "expected type, found `}`".to_string(),
            },
        };
        assert_eq!(err.to_string(), "failed to parse models/user.go:3:7: expected type, found `}`");
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_unsupported_type_display() {
        let err = GenerateError::UnsupportedType {
            owner: "user".to_string(),
            field: "CreatedAt".to_string(),
            source: UnsupportedTypeError { kind: "function type" },
        };
        assert_eq!(
            err.to_string(),
            "field user.CreatedAt: unsupported type expression: function type"
        );
        assert_eq!(err.kind(), "unsupported-type");
    }
}
