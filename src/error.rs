use std::path::PathBuf;

use thiserror::Error;

/// Everything the treemap pipeline can fail with.
///
/// Cloneable so a failed load can travel inside a UI message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreemapError {
    /// Malformed input tree: bad JSON, non-numeric or negative leaf value.
    #[error("invalid data at '{at}': {reason}")]
    InvalidData { at: String, reason: String },

    /// Target rectangle with a non-positive (or non-finite) side.
    #[error("invalid layout bounds {width}x{height}: both sides must be positive")]
    InvalidLayoutBounds { width: f64, height: f64 },

    /// Dataset file could not be read. Never retried.
    #[error("failed to fetch dataset {}: {reason}", .location.display())]
    Fetch { location: PathBuf, reason: String },

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TreemapError {
    pub fn invalid_data(at: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            at: at.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = TreemapError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = TreemapError::invalid_data("root/Games/Tetris", "negative value -3");
        assert_eq!(
            err.to_string(),
            "invalid data at 'root/Games/Tetris': negative value -3"
        );

        let err = TreemapError::InvalidLayoutBounds {
            width: 0.0,
            height: 400.0,
        };
        assert!(err.to_string().contains("0x400"));

        let err = TreemapError::Fetch {
            location: PathBuf::from("data/movies.json"),
            reason: "not found".into(),
        };
        assert!(err.to_string().contains("data/movies.json"));
    }
}
