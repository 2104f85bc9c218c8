//! Loading and saving of the YAML metadata document.
//!
//! The loader only checks syntax and that the top level is a mapping. Field
//! validation belongs to the feed builder.

use crate::error::PublishError;
use crate::model::{Episode, PodcastInfo};
use crate::Result;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const PODCAST_KEY: &str = "podcast";
pub const EPISODES_KEY: &str = "episodes";

const DEFAULT_ITEM_INDENT: &str = "  ";
const PUB_DATE_NOTE: &str = "  # TODO: Set actual date";

/// Raw metadata record, keys kept in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    root: Mapping,
}

impl Metadata {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        match serde_yaml::from_slice::<Value>(bytes)? {
            Value::Mapping(root) => Ok(Metadata { root }),
            _ => Err(PublishError::Structure(
                "metadata document must be a mapping".to_string(),
            )),
        }
    }

    /// Reads the document text, mapping a missing file to `NotFound`.
    pub fn read_source(path: &Path) -> Result<String> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PublishError::NotFound(path.to_path_buf()),
            _ => PublishError::io("read", path, e),
        })?;
        log::debug!("read {} bytes from {}", text.len(), path.display());
        Ok(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_slice(Self::read_source(path)?.as_bytes())
    }

    /// Text of a fresh document: a placeholder podcast section and an empty
    /// `episodes:` block.
    pub fn placeholder_source() -> Result<String> {
        let mut root = Mapping::new();
        root.insert(
            PODCAST_KEY.into(),
            serde_yaml::to_value(PodcastInfo::placeholder())?,
        );
        Ok(format!("{}\n{}:\n", serde_yaml::to_string(&root)?, EPISODES_KEY))
    }

    pub fn podcast(&self) -> Option<&Value> {
        self.root.get(PODCAST_KEY)
    }

    pub fn episodes(&self) -> Option<&Value> {
        self.root.get(EPISODES_KEY)
    }

    pub(crate) fn root_mut(&mut self) -> &mut Mapping {
        &mut self.root
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// Writes the whole document back, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_source(path, &self.to_yaml()?)
    }

    /// Text of this document given the `source` it was loaded from and the
    /// `stubs` merged into it since.
    ///
    /// When `episodes` is the last block in `source`, the stubs are appended
    /// after it and everything before is kept byte for byte. Any other
    /// layout, or an append that does not parse back to this document, falls
    /// back to a full rewrite.
    pub fn appended_source(&self, source: &str, stubs: &[Episode]) -> Result<String> {
        if let Some(text) = append_to_episodes(source, stubs)? {
            match Metadata::from_slice(text.as_bytes()) {
                Ok(reparsed) if reparsed == *self => return Ok(text),
                _ => log::debug!("appended episodes do not parse back, rewriting document"),
            }
        }
        log::warn!("metadata layout cannot be appended to, rewriting it in full");
        self.to_yaml()
    }
}

pub fn write_source(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PublishError::io("create directory", parent, e))?;
    }
    fs::write(path, text).map_err(|e| PublishError::io("write", path, e))?;
    log::debug!("saved metadata to {}", path.display());
    Ok(())
}

/// Column-zero content line, i.e. a top-level key.
fn is_top_level(line: &str) -> bool {
    !line.is_empty() && !line.starts_with(|c: char| c.is_whitespace() || c == '#' || c == '-')
}

/// `episodes:` with no inline value (a trailing comment is allowed).
fn is_episodes_header(line: &str) -> bool {
    line.strip_prefix(EPISODES_KEY)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(|rest| {
            let rest = rest.trim();
            rest.is_empty() || rest.starts_with('#')
        })
        .unwrap_or(false)
}

/// Indentation of a block sequence item line.
fn item_indent(line: &str) -> Option<&str> {
    let body = line.trim_start_matches(' ');
    if body == "-" || body.starts_with("- ") {
        Some(&line[..line.len() - body.len()])
    } else {
        None
    }
}

/// Renders `stubs` as block sequence items under `indent`.
fn render_items(indent: &str, stubs: &[Episode]) -> Result<String> {
    let mut out = String::new();
    for stub in stubs {
        let body = serde_yaml::to_string(stub)?;
        for (n, line) in body.lines().enumerate() {
            out.push_str(indent);
            out.push_str(if n == 0 { "- " } else { "  " });
            out.push_str(line);
            if line.starts_with("pub_date:") {
                out.push_str(PUB_DATE_NOTE);
            }
            out.push('\n');
        }
    }
    Ok(out)
}

fn append_to_episodes(source: &str, stubs: &[Episode]) -> Result<Option<String>> {
    let lines: Vec<&str> = source.lines().collect();
    if lines.iter().any(|l| l.starts_with("---") || l.starts_with("...")) {
        return Ok(None);
    }
    let header = match lines.iter().rposition(|l| is_top_level(l)) {
        Some(i) if is_episodes_header(lines[i]) => i,
        _ => return Ok(None),
    };

    let first_item = lines[header + 1..].iter().find(|l| {
        let t = l.trim_start();
        !t.is_empty() && !t.starts_with('#')
    });
    let indent = match first_item {
        Some(line) => match item_indent(line) {
            Some(indent) => indent,
            None => return Ok(None),
        },
        None => DEFAULT_ITEM_INDENT,
    };

    let mut text = source.to_string();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&render_items(indent, stubs)?);
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mapping() {
        let meta = Metadata::from_slice(b"podcast:\n  title: T\nepisodes: []\n").expect("parse");
        assert!(meta.podcast().map(Value::is_mapping).unwrap_or(false));
        assert!(meta.episodes().map(Value::is_sequence).unwrap_or(false));
    }

    #[test]
    fn top_level_must_be_mapping() {
        match Metadata::from_slice(b"- a\n- b\n") {
            Err(PublishError::Structure(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bad_syntax_is_parse_error() {
        match Metadata::from_slice(b"podcast: [unclosed\n") {
            Err(PublishError::Parse(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metadata.yaml");
        match Metadata::load(&path) {
            Err(PublishError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn save_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("metadata.yaml");
        let meta = Metadata::from_slice(b"owner: someone\npodcast:\n  title: T\n").expect("parse");
        meta.save(&path).expect("save");
        let again = Metadata::load(&path).expect("reload");
        assert_eq!(meta, again);
        assert!(again.to_yaml().expect("yaml").starts_with("owner: someone\n"));
    }

    #[test]
    fn placeholder_document() {
        let meta = Metadata::from_slice(Metadata::placeholder_source().expect("placeholder").as_bytes())
            .expect("parse placeholder");
        let podcast = meta.podcast().and_then(Value::as_mapping).expect("podcast");
        assert_eq!(
            podcast.get("language").and_then(Value::as_str),
            Some("en-us")
        );
        assert_eq!(meta.episodes(), Some(&Value::Null));
    }

    fn stub(id: &str) -> Episode {
        Episode {
            id: id.to_string(),
            title: format!("TODO: {}", id),
            description: "TODO: Add description".to_string(),
            file: format!("{}.mp3", id),
            pub_date: "2025-01-02T03:04:05Z".to_string(),
        }
    }

    fn merged(source: &str, stubs: &[Episode]) -> Metadata {
        let mut meta = Metadata::from_slice(source.as_bytes()).expect("source");
        let root = meta.root_mut();
        if matches!(root.get(EPISODES_KEY), None | Some(Value::Null)) {
            root.insert(EPISODES_KEY.into(), Value::Sequence(Vec::new()));
        }
        if let Some(Value::Sequence(seq)) = root.get_mut(EPISODES_KEY) {
            for s in stubs {
                seq.push(serde_yaml::to_value(s).expect("stub value"));
            }
        }
        meta
    }

    #[test]
    fn append_keeps_hand_edited_text() {
        let source = "# my show\npodcast:\n  title: \"Show\"   # final name\n\nepisodes:\n  - id: \"a\"\n    title: \"Episode A\"\n    file: \"a.mp3\"\n    pub_date: \"2024-01-01T00:00:00Z\"  # TODO: Set actual date\n\n";
        let stubs = vec![stub("c")];
        let meta = merged(source, &stubs);
        let text = meta.appended_source(source, &stubs).expect("append");

        assert!(text.starts_with(source));
        let tail = &text[source.len()..];
        assert!(tail.starts_with("  - id: c\n"));
        assert!(tail.contains("    file: c.mp3\n"));
        assert!(tail.contains("# TODO: Set actual date\n"));
        assert_eq!(Metadata::from_slice(text.as_bytes()).expect("reparse"), meta);
    }

    #[test]
    fn append_under_empty_header() {
        let source = Metadata::placeholder_source().expect("placeholder");
        let stubs = vec![stub("a"), stub("b")];
        let meta = merged(&source, &stubs);
        let text = meta.appended_source(&source, &stubs).expect("append");
        assert!(text.starts_with(&source));
        assert!(text.ends_with("\n"));
        let episodes = Metadata::from_slice(text.as_bytes())
            .expect("reparse")
            .episodes()
            .and_then(Value::as_sequence)
            .map(Vec::len);
        assert_eq!(episodes, Some(2));
    }

    #[test]
    fn other_layouts_are_rewritten() {
        let trailing_key = "episodes:\n  - id: a\n    file: a.mp3\nowner: me # keep\n";
        let flow = "episodes: [{id: a, file: a.mp3}]\n";
        for source in &[trailing_key, flow] {
            let stubs = vec![stub("c")];
            let meta = merged(source, &stubs);
            let text = meta.appended_source(source, &stubs).expect("rewrite");
            assert!(!text.starts_with(*source));
            assert_eq!(Metadata::from_slice(text.as_bytes()).expect("reparse"), meta);
        }
    }
}
