use std::path::PathBuf;

use thiserror::Error;

/// Why an import was aborted.
///
/// Per-texture download problems never show up here; they are reported in
/// [`crate::materialize::AssetOutcome`] and leave the import successful.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("request for {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("request for {path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("invalid shader json: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("shader json has no object at top level")]
    NotAnObject,

    #[error("shadertoy api error: {0}")]
    Remote(String),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize project: {0}")]
    Serialize(String),
}

impl ImportError {
    /// Stable machine-readable code, one per variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Status { .. } => "HTTP_STATUS_ERROR",
            Self::Decode(_) | Self::NotAnObject => "PARSE_ERROR",
            Self::Remote(_) => "REMOTE_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Serialize(_) => "SERIALIZE_ERROR",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_and_not_an_object_share_parse_code() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ImportError::from(err).code(), "PARSE_ERROR");
        assert_eq!(ImportError::NotAnObject.code(), "PARSE_ERROR");
    }

    #[test]
    fn status_message_mentions_code() {
        let err = ImportError::Status {
            path: "/api/v1/shaders/x".to_string(),
            status: 404,
        };
        assert!(format!("{err}").contains("HTTP 404"));
    }
}
