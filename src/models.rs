//! Data models and structures
//!
//! Defines the shared inbound records (chat histories and their categories)
//! and the gateway configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// One logged interaction attached to a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatHistory {
    pub source: String,
    pub content: String,
}

/// Category a [`ChatHistory`] record is filed under when building prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSource {
    Kris,
    Scientist,
    Other,
}

impl ChatSource {
    pub fn from_source(source: &str) -> Self {
        match source {
            "KRIS" => ChatSource::Kris,
            "AI Scientist" => ChatSource::Scientist,
            _ => ChatSource::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChatSource::Kris => "KRIS conversations",
            ChatSource::Scientist => "AI Scientist conversations",
            ChatSource::Other => "Other interactions",
        }
    }
}

/// Chat history content joined per [`ChatSource`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryBuckets {
    pub kris: String,
    pub scientist: String,
    pub other: String,
}

impl HistoryBuckets {
    pub fn group(histories: &[ChatHistory]) -> Self {
        let mut buckets = Self::default();
        for history in histories {
            let bucket = match ChatSource::from_source(&history.source) {
                ChatSource::Kris => &mut buckets.kris,
                ChatSource::Scientist => &mut buckets.scientist,
                ChatSource::Other => &mut buckets.other,
            };
            if !bucket.is_empty() {
                bucket.push('\n');
            }
            bucket.push_str(&history.content);
        }
        buckets
    }

    pub fn get(&self, source: ChatSource) -> &str {
        match source {
            ChatSource::Kris => &self.kris,
            ChatSource::Scientist => &self.scientist,
            ChatSource::Other => &self.other,
        }
    }

    /// Render every bucket under its own label, in a fixed order.
    pub fn render(&self) -> String {
        [ChatSource::Kris, ChatSource::Scientist, ChatSource::Other]
            .iter()
            .map(|source| {
                let content = self.get(*source);
                let body = if content.is_empty() { "(none)" } else { content };
                format!("{}:\n{}", source.label(), body)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub image_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            image_base_url: "https://image.pollinations.ai".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secret = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("Invalid PORT '{}'", raw)))?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            openai_api_key: secret(OPENAI_API_KEY_VAR),
            openai_model: lookup("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            gemini_api_key: secret(GEMINI_API_KEY_VAR),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            image_base_url: lookup("IMAGE_BASE_URL").unwrap_or(defaults.image_base_url),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn history(source: &str, content: &str) -> ChatHistory {
        ChatHistory {
            source: source.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_chat_source_matches_exact_tags() {
        assert_eq!(ChatSource::from_source("KRIS"), ChatSource::Kris);
        assert_eq!(ChatSource::from_source("AI Scientist"), ChatSource::Scientist);
        assert_eq!(ChatSource::from_source("kris"), ChatSource::Other);
        assert_eq!(ChatSource::from_source(""), ChatSource::Other);
    }

    #[test]
    fn test_group_histories_by_source() {
        let buckets = HistoryBuckets::group(&[
            history("KRIS", "a"),
            history("AI Scientist", "b"),
            history("Other", "c"),
            history("KRIS", "d"),
        ]);

        assert_eq!(buckets.kris, "a\nd");
        assert_eq!(buckets.scientist, "b");
        assert_eq!(buckets.other, "c");
    }

    #[test]
    fn test_render_places_content_under_labels() {
        let rendered = HistoryBuckets::group(&[
            history("KRIS", "a"),
            history("AI Scientist", "b"),
            history("Other", "c"),
        ])
        .render();

        assert_eq!(
            rendered,
            "KRIS conversations:\na\n\nAI Scientist conversations:\nb\n\nOther interactions:\nc"
        );
    }

    #[test]
    fn test_render_marks_empty_buckets() {
        let rendered = HistoryBuckets::group(&[]).render();
        assert!(rendered.contains("KRIS conversations:\n(none)"));
    }

    #[test]
    fn test_config_from_lookup_uses_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.openai_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_config_from_lookup_reads_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9000"),
            ("OPENAI_API_KEY", "sk-test"),
            ("GEMINI_API_KEY", "   "),
            ("OPENAI_MODEL", "gpt-test"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.openai_model, "gpt-test");
    }

    #[test]
    fn test_config_rejects_invalid_port() {
        let err = Config::from_lookup(|key| (key == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
