use std::path::PathBuf;

pub const DEFAULT_METADATA_PATH: &str = "input/metadata.yaml";
pub const DEFAULT_FEED_PATH: &str = "output/feed.xml";
pub const DEFAULT_AUDIO_DIR: &str = "input/audio";
pub const DEFAULT_LOG_SPEC: &str = "info";

/// Paths for one feed build.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub metadata: PathBuf,
    pub output: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            metadata: PathBuf::from(DEFAULT_METADATA_PATH),
            output: PathBuf::from(DEFAULT_FEED_PATH),
        }
    }
}

/// Paths for one scanner run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub audio_dir: PathBuf,
    pub metadata: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            audio_dir: PathBuf::from(DEFAULT_AUDIO_DIR),
            metadata: PathBuf::from(DEFAULT_METADATA_PATH),
        }
    }
}
