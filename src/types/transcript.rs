use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::message::{Message, RawMessage};

/// Chat name used when the export doesn't carry one
pub const UNKNOWN_CHAT: &str = "Unknown chat";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid transcript JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Deserialize)]
struct RawTranscript {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    messages: Vec<serde_json::Value>,
}

/// A loaded chat: its name and the full, chronological message list.
///
/// The message list is shared (`Arc`) with every view and export derived from
/// it; a new load builds a new `Transcript` rather than mutating this one.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub name: String,
    pub messages: Arc<[Message]>,
    /// Distinct named senders, counted once at construction
    participants: usize,
}

impl Transcript {
    pub fn new(name: impl Into<String>, messages: Vec<Message>) -> Self {
        let participants = messages
            .iter()
            .filter(|m| !m.sender.is_empty())
            .map(|m| m.sender.as_str())
            .collect::<HashSet<_>>()
            .len();
        Self {
            name: name.into(),
            messages: messages.into(),
            participants,
        }
    }

    /// Empty transcript shown before anything is loaded
    pub fn empty() -> Self {
        Self::new(UNKNOWN_CHAT, Vec::new())
    }

    /// Parse an export document.
    ///
    /// Records that are not JSON objects are skipped with a warning; every
    /// other record normalises, whatever fields it is missing.
    pub fn from_json_str(json: &str, self_id: Option<&str>) -> Result<Self> {
        let raw: RawTranscript = serde_json::from_str(json)?;

        let mut messages = Vec::with_capacity(raw.messages.len());
        for (index, value) in raw.messages.into_iter().enumerate() {
            match serde_json::from_value::<RawMessage>(value) {
                Ok(record) => messages.push(Message::normalize(&record, self_id)),
                Err(e) => log::warn!("Skipping message #{}: {}", index, e),
            }
        }

        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CHAT.to_string());

        log::info!("Loaded transcript {:?}: {} messages", name, messages.len());
        Ok(Self::new(name, messages))
    }

    /// Read and parse an export file
    pub fn load(path: &Path, self_id: Option<&str>) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, self_id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of distinct named senders
    pub fn participant_count(&self) -> usize {
        self.participants
    }
}
