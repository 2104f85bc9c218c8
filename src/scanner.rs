//! Discovers audio files and appends stub episodes for the new ones.
//!
//! Each run loads the metadata document, appends the stubs after the last
//! episode and writes it back. Existing keys and episode records are never
//! modified.

use crate::config::ScanConfig;
use crate::date;
use crate::error::PublishError;
use crate::metadata::{write_source, Metadata, EPISODES_KEY, PODCAST_KEY};
use crate::model::{text_field, Episode, PodcastInfo};
use crate::Result;
use chrono::{DateTime, Utc};
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Extensions (lowercase) picked up by the scanner. Enclosures are always
/// published as `audio/mpeg`, so only MP3 files qualify.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanReport {
    pub found: usize,
    pub added: Vec<String>,
    pub created: bool,
}

fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// File names of audio files directly inside `dir`, sorted by name.
pub fn list_audio_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(PublishError::AudioDirNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        // path().is_file() follows symlinks; a dangling link is skipped
        if !is_audio(entry.path()) || !entry.path().is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => files.push(name.to_string()),
            None => log::warn!("skipping non UTF-8 file name {:?}", entry.file_name()),
        }
    }

    if files.is_empty() {
        return Err(PublishError::NoAudioFiles(dir.to_path_buf()));
    }
    Ok(files)
}

/// Placeholder episode for a newly found file, id taken from the file stem.
pub fn stub_episode(file_name: &str, now: &DateTime<Utc>) -> Episode {
    let id = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string();
    Episode {
        title: format!("TODO: {}", id),
        description: "TODO: Add description".to_string(),
        file: file_name.to_string(),
        pub_date: date::format_iso8601(now),
        id,
    }
}

/// Appends a stub for every file not already referenced by an episode.
/// Returns the added stubs.
pub fn merge_new_episodes(
    metadata: &mut Metadata,
    files: &[String],
    now: &DateTime<Utc>,
) -> Result<Vec<Episode>> {
    let root = metadata.root_mut();
    if !root.contains_key(PODCAST_KEY) {
        root.insert(
            PODCAST_KEY.into(),
            serde_yaml::to_value(PodcastInfo::placeholder())?,
        );
    }

    if matches!(root.get(EPISODES_KEY), None | Some(Value::Null)) {
        root.insert(EPISODES_KEY.into(), Value::Sequence(Vec::new()));
    }
    let episodes = match root.get_mut(EPISODES_KEY) {
        Some(Value::Sequence(seq)) => seq,
        _ => {
            return Err(PublishError::Structure(
                "'episodes' must be a list".to_string(),
            ))
        }
    };

    let known: HashSet<String> = episodes
        .iter()
        .filter_map(Value::as_mapping)
        .filter_map(|m| text_field(m, "file").ok().flatten())
        .collect();

    let mut added = Vec::new();
    for file in files.iter().filter(|f| !known.contains(f.as_str())) {
        let stub = stub_episode(file, now);
        log::info!("new episode {} from {}", stub.id, file);
        episodes.push(serde_yaml::to_value(&stub)?);
        added.push(stub);
    }
    Ok(added)
}

/// Scans `config.audio_dir` and updates the metadata document.
///
/// The document is only written when at least one stub was added. New stubs
/// are appended to the existing text so hand edits and comments survive.
pub fn scan(config: &ScanConfig) -> Result<ScanReport> {
    let files = list_audio_files(&config.audio_dir)?;
    log::info!("Found {} audio files in {}", files.len(), config.audio_dir.display());

    let created = !config.metadata.exists();
    let source = if created {
        Metadata::placeholder_source()?
    } else {
        Metadata::read_source(&config.metadata)?
    };
    let mut metadata = Metadata::from_slice(source.as_bytes())?;

    let stubs = merge_new_episodes(&mut metadata, &files, &Utc::now())?;
    if stubs.is_empty() {
        log::info!("No new episodes, {} left unchanged", config.metadata.display());
    } else {
        let text = metadata.appended_source(&source, &stubs)?;
        write_source(&config.metadata, &text)?;
    }

    Ok(ScanReport {
        found: files.len(),
        added: stubs.into_iter().map(|s| s.id).collect(),
        created,
    })
}
