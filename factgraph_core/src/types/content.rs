//! Content records: a named piece of collected input data

use serde::{Deserialize, Serialize};

/// Body of a content record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Content {
    /// Unfiltered content, stored exactly as collected
    Raw(String),
    /// Line-oriented content, possibly reduced by filters
    Lines(Vec<String>),
}

impl Content {
    /// Split text into lines with trailing whitespace removed
    pub fn from_text(text: &str) -> Self {
        Content::Lines(text.lines().map(|l| l.trim_end().to_string()).collect())
    }

    /// Line view of the content. Raw content is split on demand.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Content::Raw(text) => text.lines().collect(),
            Content::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }

    /// Text view of the content. Lines are joined with `\n`.
    pub fn text(&self) -> String {
        match self {
            Content::Raw(text) => text.clone(),
            Content::Lines(lines) => lines.join("\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::Raw(text) => text.is_empty(),
            Content::Lines(lines) => lines.is_empty(),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Content::Raw(_))
    }
}

/// Host facts carried alongside content so parsers can consult them
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostMetadata {
    pub hostname: String,
    pub release: String,
    pub version: Vec<String>,
    pub machine_id: String,
}

/// A path plus content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub path: String,
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<HostMetadata>,
}

impl ContentRecord {
    /// Create a record; the path is normalised to begin with `/`
    pub fn new(path: impl Into<String>, content: Content) -> Self {
        Self {
            path: normalize_path(path.into()),
            content,
            host: None,
        }
    }

    /// Record holding line content split from `text`
    pub fn from_text(path: impl Into<String>, text: &str) -> Self {
        Self::new(path, Content::from_text(text))
    }

    /// Record holding `text` unmodified
    pub fn raw(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(path, Content::Raw(text.into()))
    }

    pub fn with_host(mut self, host: HostMetadata) -> Self {
        self.host = Some(host);
        self
    }

    pub fn lines(&self) -> Vec<&str> {
        self.content.lines()
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    /// File name portion of the path
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Ensure a path begins with the path separator
pub fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}
