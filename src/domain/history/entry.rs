//! History entry value objects

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::error::EntryIdParseError;

/// Label used when rendering or searching image entries
pub const IMAGE_LABEL: &str = "[image]";

/// Compute the SHA-256 of raw bytes, hex-encoded
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Unique, strictly increasing entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = EntryIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| EntryIdParseError {
                input: s.to_string(),
            })
    }
}

/// Deduplication key of an entry.
///
/// Text: `"text:" + content`. Image: hex content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn for_text(content: &str) -> Self {
        Self(format!("text:{}", content))
    }

    pub fn for_image(hash: &str) -> Self {
        Self(hash.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of clipboard content an entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Text,
    Image,
}

impl EntryKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One clipboard sample as read by the sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sample {
    /// Text content, kept as copied (not trimmed)
    Text(String),
    /// Encoded (PNG) image bytes
    Image(Vec<u8>),
}

impl Sample {
    /// Build a text sample. Returns `None` for whitespace-only text.
    pub fn text(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self::Text(content))
        }
    }

    /// Build an image sample. Returns `None` for an empty image.
    pub fn image(bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() {
            None
        } else {
            Some(Self::Image(bytes))
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Text(_) => EntryKind::Text,
            Self::Image(_) => EntryKind::Image,
        }
    }

    /// Compute the deduplication key for this sample
    pub fn signature(&self) -> Signature {
        match self {
            Self::Text(content) => Signature::for_text(content),
            Self::Image(bytes) => Signature::for_image(&content_hash(bytes)),
        }
    }
}

/// Stored content of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryPayload {
    Text {
        content: String,
    },
    Image {
        hash: String,
        /// Blob-store-relative file name
        location: String,
    },
}

/// One retained clipboard snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(flatten)]
    pub payload: EntryPayload,
    pub signature: Signature,
    pub captured_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(
        id: EntryId,
        payload: EntryPayload,
        signature: Signature,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            payload,
            signature,
            captured_at,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self.payload {
            EntryPayload::Text { .. } => EntryKind::Text,
            EntryPayload::Image { .. } => EntryKind::Image,
        }
    }

    /// Text content, if this is a text entry
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            EntryPayload::Text { content } => Some(content),
            EntryPayload::Image { .. } => None,
        }
    }

    /// Blob location, if this is an image entry
    pub fn blob_location(&self) -> Option<&str> {
        match &self.payload {
            EntryPayload::Image { location, .. } => Some(location),
            EntryPayload::Text { .. } => None,
        }
    }

    /// Single-line preview, truncated to `max_chars` characters
    pub fn preview(&self, max_chars: usize) -> String {
        match &self.payload {
            EntryPayload::Text { content } => {
                let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
                if flat.chars().count() > max_chars {
                    let cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
                    format!("{}…", cut)
                } else {
                    flat
                }
            }
            EntryPayload::Image { location, .. } => format!("{} {}", IMAGE_LABEL, location),
        }
    }
}
