//! RSS 2.0 feed builder.
//!
//! Validation stops at the first invalid field. Nothing is returned unless the
//! whole document is valid, so callers never see a partial feed.

use crate::date;
use crate::error::PublishError;
use crate::metadata::Metadata;
use crate::model::{text_field, Episode, PodcastInfo};
use crate::xml::Element;
use crate::Result;
use chrono::{DateTime, Utc};
use serde_yaml::{Mapping, Value};

pub const GENERATOR: &str = "static-podcast-publisher";
pub const RSS_VERSION: &str = "2.0";
pub const ENCLOSURE_TYPE: &str = "audio/mpeg";
/// Audio files are served from this directory below `base_url`.
pub const AUDIO_SEGMENT: &str = "audio";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedDocument {
    pub channel: Vec<Element>,
    pub items: Vec<Element>,
}

impl FeedDocument {
    /// Wraps the channel metadata and items in `<rss><channel>`.
    pub fn into_rss(self) -> Element {
        let mut channel = Element::new("channel");
        channel.children = self.channel;
        channel.children.extend(self.items);

        let mut rss = Element::new("rss").attr("version", RSS_VERSION);
        rss.push(channel);
        rss
    }
}

pub fn enclosure_url(base_url: &str, file: &str) -> String {
    format!("{}/{}/{}", base_url, AUDIO_SEGMENT, file)
}

fn channel_elements(podcast: &PodcastInfo, built_at: &DateTime<Utc>) -> Vec<Element> {
    vec![
        Element::with_text("title", podcast.title.as_str()),
        Element::with_text("link", podcast.base_url.as_str()),
        Element::with_text("description", podcast.description.as_str()),
        Element::with_text("language", podcast.language.as_str()),
        Element::with_text("lastBuildDate", date::format_rfc822(built_at)),
        Element::with_text("generator", GENERATOR),
    ]
}

fn item_element(episode: &Episode, pub_date: String, base_url: &str) -> Element {
    let mut item = Element::new("item");
    item.push(Element::with_text("title", episode.title.as_str()));
    item.push(Element::with_text("description", episode.description.as_str()));
    item.push(Element::with_text("pubDate", pub_date));
    item.push(Element::with_text("guid", episode.id.as_str()).attr("isPermaLink", "false"));
    item.push(
        Element::new("enclosure")
            .attr("url", enclosure_url(base_url, &episode.file))
            .attr("type", ENCLOSURE_TYPE)
            .attr("length", "0"),
    );
    item
}

/// Raw `pub_date` used for ordering; anything unusable sorts as "".
fn sort_key(entry: &Value) -> String {
    entry
        .as_mapping()
        .and_then(|m| text_field(m, "pub_date").ok().flatten())
        .unwrap_or_default()
}

/// Episodes sorted by raw `pub_date` descending.
///
/// The comparison is lexical, so dates must be zero-padded ISO-8601 strings
/// in a single offset (e.g. `2024-01-01T00:00:00Z`) for the order to be
/// chronological. Ties keep input order.
fn sorted_episodes(episodes: &[Value]) -> Vec<(usize, &Value)> {
    let mut keyed: Vec<(String, usize, &Value)> = episodes
        .iter()
        .enumerate()
        .map(|(i, e)| (sort_key(e), i, e))
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, i, e)| (i, e)).collect()
}

fn podcast_section(metadata: &Metadata) -> Result<&Mapping> {
    metadata
        .podcast()
        .and_then(Value::as_mapping)
        .ok_or_else(|| PublishError::Structure("'podcast' must be a mapping".to_string()))
}

fn episodes_section(metadata: &Metadata) -> Result<&[Value]> {
    match metadata.episodes() {
        None => Ok(&[][..]),
        Some(Value::Sequence(seq)) => Ok(seq.as_slice()),
        Some(_) => Err(PublishError::Structure("'episodes' must be a list".to_string())),
    }
}

/// Validates `metadata` and builds the feed stamped with `built_at`.
pub fn build_feed(metadata: &Metadata, built_at: DateTime<Utc>) -> Result<FeedDocument> {
    let podcast_map = podcast_section(metadata)?;
    let episodes = episodes_section(metadata)?;

    let podcast = PodcastInfo::from_mapping(podcast_map)?;
    let channel = channel_elements(&podcast, &built_at);

    let mut items = Vec::with_capacity(episodes.len());
    for (position, entry) in sorted_episodes(episodes) {
        let map = entry.as_mapping().ok_or_else(|| {
            PublishError::Structure(format!("episode #{} must be a mapping", position + 1))
        })?;
        let episode = Episode::from_mapping(map)?;
        let pub_date = date::to_rfc822(&episode.pub_date, &episode.id)?;
        items.push(item_element(&episode, pub_date, &podcast.base_url));
    }
    log::debug!("built feed with {} items", items.len());

    Ok(FeedDocument { channel, items })
}
