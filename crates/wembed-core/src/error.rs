//! Error types for the embed pipeline
//!
//! Covers the three phases of a run:
//! - Reading the artifact and the target document
//! - Substituting (and counting) marker lines
//! - Writing the target document back

use crate::config::MatchPolicy;
use std::io;
use std::path::PathBuf;

/// File operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    /// Reading a file
    Read,
    /// Writing a file
    Write,
}

impl std::fmt::Display for IoOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => f.write_str("reading"),
            Self::Write => f.write_str("writing"),
        }
    }
}

/// Errors raised while embedding, checking or extracting a payload
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// Binary artifact does not exist
    #[error("artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// Target document does not exist
    #[error("target document not found: {}", path.display())]
    TargetNotFound { path: PathBuf },

    /// Any other IO failure
    #[error("io error {op} {}: {source}", path.display())]
    Io {
        path: PathBuf,
        op: IoOp,
        #[source]
        source: io::Error,
    },

    /// Target document is not valid UTF-8
    #[error("target document is not valid utf-8: {}", path.display())]
    InvalidUtf8 { path: PathBuf },

    /// Replacement count rejected by the match policy
    #[error("expected {policy} marker(s) in {}, found {found}", path.display())]
    MarkerCount {
        path: PathBuf,
        policy: MatchPolicy,
        found: usize,
    },

    /// Marker tag cannot be used to build a pattern
    #[error("invalid marker tag: {0}")]
    InvalidTag(String),

    /// Embedded payload is not valid base64
    #[error("payload on line {line} is not valid base64: {source}")]
    Decode {
        line: usize,
        #[source]
        source: base64::DecodeError,
    },

    /// Requested payload index is out of range
    #[error("no payload at index {index} ({found} marker(s) present)")]
    NoPayload { index: usize, found: usize },

    /// Configuration file unreadable or malformed
    #[error("config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl EmbedError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, op: IoOp, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            op,
            source,
        }
    }

    /// Map a failed artifact read, keeping not-found distinct
    pub fn artifact_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::ArtifactNotFound { path }
        } else {
            Self::io_error(path, IoOp::Read, source)
        }
    }

    /// Map a failed target read, keeping not-found and bad encoding distinct
    pub fn target_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::TargetNotFound { path },
            io::ErrorKind::InvalidData => Self::InvalidUtf8 { path },
            _ => Self::io_error(path, IoOp::Read, source),
        }
    }

    /// Create config error for path
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True when the failure is a missing input file
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ArtifactNotFound { .. } | Self::TargetNotFound { .. }
        )
    }
}

/// Result type alias for embed operations
pub type EmbedResult<T> = Result<T, EmbedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_not_found_display() {
        let err = EmbedError::artifact_read(
            "rust/pkg/mod.wasm",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "artifact not found: rust/pkg/mod.wasm");
    }

    #[test]
    fn target_read_maps_invalid_data() {
        let err = EmbedError::target_read("js/wasm.js", io::Error::from(io::ErrorKind::InvalidData));
        assert!(matches!(err, EmbedError::InvalidUtf8 { .. }));
    }

    #[test]
    fn permission_denied_is_io() {
        let err = EmbedError::target_read(
            "js/wasm.js",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, EmbedError::Io { op: IoOp::Read, .. }));
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("io error reading js/wasm.js"));
    }

    #[test]
    fn marker_count_display() {
        let err = EmbedError::MarkerCount {
            path: PathBuf::from("js/wasm.js"),
            policy: MatchPolicy::ExactlyOne,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "expected exactly one marker(s) in js/wasm.js, found 2"
        );
    }
}
