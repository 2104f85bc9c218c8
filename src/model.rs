use crate::error::PublishError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Placeholder used in messages when an episode has no usable id.
pub const UNKNOWN_ID: &str = "?";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PodcastInfo {
    pub title: String,
    pub description: String,
    pub language: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub description: String,
    pub file: String,
    pub pub_date: String,
}

impl PodcastInfo {
    /// Placeholder section written by the scanner into a fresh document.
    pub fn placeholder() -> Self {
        PodcastInfo {
            title: "TODO: Your Podcast Title".to_string(),
            description: "TODO: Your podcast description".to_string(),
            language: "en-us".to_string(),
            base_url: "TODO: https://your-bucket.example.com/podcast-folder".to_string(),
        }
    }

    /// Extracts the required fields in order title, base_url, description, language.
    pub fn from_mapping(map: &Mapping) -> Result<Self, PublishError> {
        let req = |field: &'static str| -> Result<String, PublishError> {
            match text_field(map, field) {
                Ok(Some(v)) => Ok(v),
                Ok(None) => Err(PublishError::MissingPodcastField { field }),
                Err(found) => Err(PublishError::MalformedField {
                    path: format!("podcast.{}", field),
                    found,
                }),
            }
        };

        let title = req("title")?;
        let base_url = strip_trailing_slashes(&req("base_url")?).to_string();
        let description = req("description")?;
        let language = req("language")?;

        Ok(PodcastInfo {
            title,
            description,
            language,
            base_url,
        })
    }
}

impl Episode {
    /// Extracts the required fields in order id, title, description, file, pub_date.
    pub fn from_mapping(map: &Mapping) -> Result<Self, PublishError> {
        let id_hint = match text_field(map, "id") {
            Ok(Some(id)) => id,
            _ => UNKNOWN_ID.to_string(),
        };
        let req = |field: &'static str| -> Result<String, PublishError> {
            match text_field(map, field) {
                Ok(Some(v)) => Ok(v),
                Ok(None) => Err(PublishError::MissingEpisodeField {
                    id: id_hint.clone(),
                    field,
                }),
                Err(found) => Err(PublishError::MalformedField {
                    path: format!("episode '{}' field {}", id_hint, field),
                    found,
                }),
            }
        };

        Ok(Episode {
            id: req("id")?,
            title: req("title")?,
            description: req("description")?,
            file: req("file")?,
            pub_date: req("pub_date")?,
        })
    }
}

/// Reads a scalar field as text.
///
/// Absent, null and empty values are `Ok(None)`; sequences and mappings are
/// rejected with the name of what was found.
pub fn text_field(map: &Mapping, field: &str) -> Result<Option<String>, &'static str> {
    let text = match map.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Sequence(_)) => return Err("a list"),
        Some(Value::Mapping(_)) => return Err("a mapping"),
        Some(Value::Tagged(_)) => return Err("a tagged value"),
    };
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

pub fn strip_trailing_slashes(url: &str) -> &str {
    url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).expect("test yaml")
    }

    #[test]
    fn podcast_fields_and_slashes() {
        let map = mapping(
            "title: T\ndescription: D\nlanguage: en\nbase_url: https://x.example.com/pod//\n",
        );
        let info = PodcastInfo::from_mapping(&map).expect("valid podcast");
        assert_eq!(info.base_url, "https://x.example.com/pod");
        assert_eq!(info.language, "en");
    }

    #[test]
    fn podcast_title_checked_before_language() {
        let map = mapping("description: D\nbase_url: u\n");
        match PodcastInfo::from_mapping(&map) {
            Err(PublishError::MissingPodcastField { field }) => assert_eq!(field, "title"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn podcast_title_before_base_url() {
        let map = mapping("description: D\nlanguage: en\n");
        match PodcastInfo::from_mapping(&map) {
            Err(PublishError::MissingPodcastField { field }) => assert_eq!(field, "title"),
            other => panic!("unexpected {:?}", other),
        }
        let map = mapping("title: T\nlanguage: en\n");
        match PodcastInfo::from_mapping(&map) {
            Err(PublishError::MissingPodcastField { field }) => assert_eq!(field, "base_url"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn episode_fields_checked_in_order() {
        let cases = [
            ("id: e\ndescription: D\npub_date: '2024-01-01'\n", "title"),
            ("id: e\ntitle: T\npub_date: '2024-01-01'\n", "description"),
            ("id: e\ntitle: T\ndescription: D\n", "file"),
            ("id: e\ntitle: T\ndescription: D\nfile: e.mp3\n", "pub_date"),
        ];
        for (yaml, expected) in &cases {
            match Episode::from_mapping(&mapping(yaml)) {
                Err(PublishError::MissingEpisodeField { id, field }) => {
                    assert_eq!(id, "e");
                    assert_eq!(field, *expected);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let map = mapping("title: T\ndescription: D\nlanguage: ''\nbase_url: u\n");
        match PodcastInfo::from_mapping(&map) {
            Err(PublishError::MissingPodcastField { field }) => assert_eq!(field, "language"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn episode_missing_field_uses_id() {
        let map = mapping("id: ep3\ntitle: T\ndescription: D\npub_date: '2024-01-01'\n");
        match Episode::from_mapping(&map) {
            Err(PublishError::MissingEpisodeField { id, field }) => {
                assert_eq!(id, "ep3");
                assert_eq!(field, "file");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn episode_without_id_uses_placeholder() {
        let map = mapping("title: T\n");
        match Episode::from_mapping(&map) {
            Err(PublishError::MissingEpisodeField { id, field }) => {
                assert_eq!(id, UNKNOWN_ID);
                assert_eq!(field, "id");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn scalars_are_text_collections_are_not() {
        let map = mapping("id: 42\ntags: [a, b]\n");
        assert_eq!(text_field(&map, "id"), Ok(Some("42".to_string())));
        assert_eq!(text_field(&map, "tags"), Err("a list"));
        assert_eq!(text_field(&map, "missing"), Ok(None));
    }
}
