/// Error types for mesh parsing and loading
use std::path::PathBuf;

/// Errors raised while parsing or validating a mesh.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("unsupported file format: {}", extension.as_deref().unwrap_or("<none>"))]
    UnsupportedFormat { extension: Option<String> },

    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("line {line}: {reason} in {content:?}")]
    Parse {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("empty model: no vertices found")]
    EmptyModel,

    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: i64,
        vertex_count: usize,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshError {
    pub(crate) fn parse(line: usize, content: &str, reason: impl Into<String>) -> Self {
        MeshError::Parse {
            line,
            content: content.trim_end().to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> LoadErrorKind {
        match self {
            MeshError::UnsupportedFormat { .. } => LoadErrorKind::UnsupportedFormat,
            MeshError::UnsupportedEncoding(_) => LoadErrorKind::UnsupportedEncoding,
            MeshError::Parse { .. } => LoadErrorKind::Parse,
            MeshError::EmptyModel => LoadErrorKind::EmptyModel,
            MeshError::IndexOutOfRange { .. } => LoadErrorKind::IndexOutOfRange,
            MeshError::Io(_) => LoadErrorKind::Io,
        }
    }
}

/// Discriminant of a [`MeshError`], for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    UnsupportedFormat,
    UnsupportedEncoding,
    Parse,
    EmptyModel,
    IndexOutOfRange,
    Io,
}

/// The uniform failure returned by [`crate::load_mesh`].
#[derive(Debug, thiserror::Error)]
#[error("load failed: {source}")]
pub struct LoadError {
    pub path: Option<PathBuf>,
    #[source]
    pub source: MeshError,
}

impl LoadError {
    pub fn new(path: Option<PathBuf>, source: MeshError) -> Self {
        Self { path, source }
    }

    pub fn kind(&self) -> LoadErrorKind {
        self.source.kind()
    }
}

pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_message_is_uniform() {
        let err = LoadError::new(None, MeshError::EmptyModel);
        assert_eq!(err.to_string(), "load failed: empty model: no vertices found");
        assert_eq!(err.kind(), LoadErrorKind::EmptyModel);
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = MeshError::parse(7, "v 1 x 3\n", "invalid number");
        assert_eq!(err.to_string(), "line 7: invalid number in \"v 1 x 3\"");
    }

    #[test]
    fn test_unsupported_format_without_extension() {
        let err = MeshError::UnsupportedFormat { extension: None };
        assert_eq!(err.to_string(), "unsupported file format: <none>");
    }
}
