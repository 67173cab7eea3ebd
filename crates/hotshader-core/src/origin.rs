//! Where a shader's composite source comes from.

use std::path::{Path, PathBuf};

/// How to fetch a shader's source text (again).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Backed by a file on disk. Can be reloaded.
    FromFile(PathBuf),
    /// Supplied in memory with a caller-chosen diagnostic id. Never reloaded.
    FromLiteral { text: String, id: String },
}

impl SourceOrigin {
    /// Diagnostic id used in log lines: the path for files, the caller's id
    /// for literals.
    pub fn diagnostic_id(&self) -> String {
        match self {
            SourceOrigin::FromFile(path) => path.display().to_string(),
            SourceOrigin::FromLiteral { id, .. } => id.clone(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceOrigin::FromFile(path) => Some(path),
            SourceOrigin::FromLiteral { .. } => None,
        }
    }

    pub fn is_reloadable(&self) -> bool {
        matches!(self, SourceOrigin::FromFile(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_id() {
        let file = SourceOrigin::FromFile(PathBuf::from("shaders/sprite.glsl"));
        assert_eq!(file.diagnostic_id(), "shaders/sprite.glsl");
        assert!(file.is_reloadable());

        let literal = SourceOrigin::FromLiteral {
            text: "VERTEX".to_string(),
            id: "my shader".to_string(),
        };
        assert_eq!(literal.diagnostic_id(), "my shader");
        assert!(!literal.is_reloadable());
        assert_eq!(literal.path(), None);
    }
}
