use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading metadata, building the feed or scanning audio files.
///
/// Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0}")]
    Structure(String),

    #[error("Missing podcast.{field}")]
    MissingPodcastField { field: &'static str },

    #[error("Episode '{id}' missing field: {field}")]
    MissingEpisodeField { id: String, field: &'static str },

    #[error("{path} must be a string, found {found}")]
    MalformedField { path: String, found: &'static str },

    #[error("Episode '{id}' has invalid date: {value}")]
    InvalidDate { id: String, value: String },

    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot render feed: {0}")]
    Render(String),

    #[error("{} not found. Create it and add your audio files.", .0.display())]
    AudioDirNotFound(PathBuf),

    #[error("No audio files found in {}", .0.display())]
    NoAudioFiles(PathBuf),

    #[error("Cannot list audio files: {0}")]
    Walk(#[from] walkdir::Error),
}

impl PublishError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PublishError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
