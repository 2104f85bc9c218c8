//! Builds an RSS 2.0 podcast feed from a YAML metadata document, and keeps
//! that document in sync with a directory of audio files.

pub mod config;
pub mod date;
pub mod error;
pub mod feed;
pub mod metadata;
pub mod model;
pub mod scanner;
pub mod util;
pub mod xml;

use chrono::Utc;
use config::FeedConfig;
pub use error::PublishError;
pub use feed::{build_feed, FeedDocument};
pub use metadata::Metadata;
pub use model::{Episode, PodcastInfo};

pub type Result<T> = std::result::Result<T, PublishError>;

/// Loads the metadata, builds the feed and writes it. Returns the item count.
///
/// The output file is only touched once the whole feed has been built.
pub fn publish(config: &FeedConfig) -> Result<usize> {
    let metadata = Metadata::load(&config.metadata)?;
    let feed = build_feed(&metadata, Utc::now())?;
    let count = feed.items.len();
    xml::write_file(&feed.into_rss(), &config.output)?;
    Ok(count)
}
