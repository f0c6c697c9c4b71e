use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use super::timestamp::{date_label, parse_timestamp, time_label};

/// Suffix appended to bodies cut by [`truncate_for_display`]
pub const ELLIPSIS: &str = "...";

/// Emoji shown for stickers that don't carry one
const DEFAULT_STICKER_EMOJI: &str = "🎭";

// ============================================================================
// Raw export shape
// ============================================================================

/// One message record as it appears in the export.
///
/// Every field is optional and string fields accept numbers too, so a single
/// odd record never fails the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub from_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub actor: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub actor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: Option<String>,
    #[serde(default)]
    pub text: RawText,
    #[serde(default)]
    pub photo: Option<serde_json::Value>,
    #[serde(default)]
    pub file: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sticker_emoji: Option<String>,
}

/// Message body: either a plain string or a list of formatted fragments
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Plain(String),
    Fragments(Vec<RawFragment>),
    Other(serde_json::Value),
}

impl Default for RawText {
    fn default() -> Self {
        RawText::Plain(String::new())
    }
}

/// One element of a fragment-array body.
///
/// Entity objects carry `type`, `href`, etc. alongside `text`; only the text
/// matters for rendering.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawFragment {
    Plain(String),
    Entity {
        #[serde(default)]
        text: String,
    },
    Other(serde_json::Value),
}

impl RawText {
    /// Flatten to plain text, concatenating only fragment text payloads
    pub fn flatten(&self) -> String {
        match self {
            RawText::Plain(s) => s.clone(),
            RawText::Fragments(fragments) => fragments
                .iter()
                .map(|fragment| match fragment {
                    RawFragment::Plain(s) => Cow::Borrowed(s.as_str()),
                    RawFragment::Entity { text } => Cow::Borrowed(text.as_str()),
                    RawFragment::Other(value) => Cow::Owned(scalar_to_string(value)),
                })
                .collect(),
            RawText::Other(value) => scalar_to_string(value),
        }
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Accept strings, numbers and booleans as text; anything else becomes `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(v @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => {
            Some(scalar_to_string(&v))
        }
        _ => None,
    })
}

// ============================================================================
// Normalised model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Service,
}

/// What kind of attachment a message carries, for placeholder labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaDescriptor {
    Photo,
    Sticker { emoji: Option<String> },
    VideoMessage,
    VideoFile,
    AudioFile { file_name: Option<String> },
    VoiceMessage,
    Animation,
    File { file_name: Option<String> },
}

impl MediaDescriptor {
    /// Classify the attachment of a raw record, if any
    pub fn classify(raw: &RawMessage) -> Option<Self> {
        if raw.photo.is_some() {
            return Some(Self::Photo);
        }
        let descriptor = match raw.media_type.as_deref() {
            Some("sticker") => Self::Sticker {
                emoji: raw.sticker_emoji.clone(),
            },
            Some("video_message") => Self::VideoMessage,
            Some("video_file") => Self::VideoFile,
            Some("audio_file") => Self::AudioFile {
                file_name: raw.file_name.clone(),
            },
            Some("voice_message") => Self::VoiceMessage,
            Some("animation") => Self::Animation,
            _ if raw.file.is_some() => Self::File {
                file_name: raw.file_name.clone(),
            },
            _ => return None,
        };
        Some(descriptor)
    }

    /// Placeholder text shown in place of an empty body
    pub fn label(&self) -> String {
        match self {
            Self::Photo => "📷 Photo".to_string(),
            Self::Sticker { emoji } => {
                let emoji = emoji
                    .as_deref()
                    .filter(|e| !e.is_empty())
                    .unwrap_or(DEFAULT_STICKER_EMOJI);
                format!("{} Sticker", emoji)
            }
            Self::VideoMessage => "🎥 Video message".to_string(),
            Self::VideoFile => "🎥 Video".to_string(),
            Self::AudioFile { file_name } => {
                format!("🎵 {}", non_empty_or(file_name.as_deref(), "Audio file"))
            }
            Self::VoiceMessage => "🎤 Voice message".to_string(),
            Self::Animation => "🎬 GIF animation".to_string(),
            Self::File { file_name } => {
                format!("📎 {}", non_empty_or(file_name.as_deref(), "File"))
            }
        }
    }
}

fn non_empty_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(fallback)
}

/// Label used when a blank message has no recognisable attachment either
pub const GENERIC_PLACEHOLDER: &str = "Message";

/// Display text for a service action, falling back to the raw action string
pub fn action_text(action: &str) -> &str {
    match action {
        "joined_telegram" => "joined Telegram",
        "left_chat" => "left the chat",
        "joined_chat" => "joined the chat",
        "created_chat" => "created the chat",
        "invite_members" => "added members",
        "remove_members" => "removed members",
        "edit_group_title" => "changed the group name",
        "edit_group_photo" => "changed the group photo",
        "pin_message" => "pinned a message",
        "phone_call" => "made a call",
        "migrate_to_supergroup" => "upgraded the group",
        other => other,
    }
}

/// Whether `sender_id` belongs to the configured self-identifier.
///
/// Exact-substring match; an empty or missing self-identifier matches nobody.
pub fn is_own_sender(sender_id: &str, self_id: Option<&str>) -> bool {
    match self_id {
        Some(id) if !id.is_empty() => sender_id.contains(id),
        _ => false,
    }
}

/// Cut `text` to `budget` characters plus [`ELLIPSIS`].
///
/// Counts Unicode scalar values, never bytes. A budget of zero disables
/// truncation.
pub fn truncate_for_display(text: &str, budget: usize) -> Cow<'_, str> {
    if budget == 0 {
        return Cow::Borrowed(text);
    }
    match text.char_indices().nth(budget) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], ELLIPSIS)),
        None => Cow::Borrowed(text),
    }
}

/// One normalised transcript entry
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub timestamp: Option<NaiveDateTime>,
    pub sender: String,
    pub sender_id: String,
    /// Full, untruncated body text
    pub body: String,
    pub media: Option<MediaDescriptor>,
    pub file_name: Option<String>,
    pub action: Option<String>,
    pub actor: Option<String>,
    /// Fixed at ingestion from `sender_id`
    pub is_own: bool,
}

impl Message {
    /// Normalise a raw record. Never fails: missing or malformed fields fall
    /// back to empty strings and the unknown-date sentinel.
    pub fn normalize(raw: &RawMessage, self_id: Option<&str>) -> Self {
        let kind = match raw.kind.as_deref() {
            Some("service") => MessageKind::Service,
            _ => MessageKind::Text,
        };

        let sender_id = raw
            .from_id
            .clone()
            .or_else(|| raw.actor_id.clone())
            .unwrap_or_default();

        let timestamp = raw.date.as_deref().and_then(parse_timestamp);
        if timestamp.is_none() && raw.date.is_some() {
            log::debug!("Unparsable timestamp {:?}, using sentinel", raw.date);
        }

        let is_own = is_own_sender(&sender_id, self_id);

        Self {
            kind,
            timestamp,
            sender: raw.from.clone().unwrap_or_default(),
            sender_id,
            body: raw.text.flatten(),
            media: MediaDescriptor::classify(raw),
            file_name: raw.file_name.clone(),
            action: raw.action.clone(),
            actor: raw.actor.clone(),
            is_own,
        }
    }

    pub fn is_service(&self) -> bool {
        self.kind == MessageKind::Service
    }

    /// Placeholder label derived from the attachment
    pub fn media_label(&self) -> String {
        self.media
            .as_ref()
            .map(MediaDescriptor::label)
            .unwrap_or_else(|| GENERIC_PLACEHOLDER.to_string())
    }

    /// Body as rendered: placeholder for blank bodies, then truncated
    pub fn display_text(&self, budget: usize) -> String {
        if self.body.trim().is_empty() {
            truncate_for_display(&self.media_label(), budget).into_owned()
        } else {
            truncate_for_display(&self.body, budget).into_owned()
        }
    }

    pub fn date_label(&self) -> String {
        date_label(self.timestamp.as_ref())
    }

    pub fn time_label(&self) -> String {
        time_label(self.timestamp.as_ref())
    }

    /// `actor action • HH:MM` line for service messages
    pub fn service_line(&self) -> String {
        let actor = self.actor.as_deref().unwrap_or_default();
        let action = action_text(self.action.as_deref().unwrap_or_default());
        format!("{} {} • {}", actor, action, self.time_label())
            .trim_start()
            .to_string()
    }

    /// Whether the (already lower-cased) query occurs in body, sender or file name
    pub fn matches(&self, query_lower: &str) -> bool {
        self.body.to_lowercase().contains(query_lower)
            || self.sender.to_lowercase().contains(query_lower)
            || self
                .file_name
                .as_deref()
                .is_some_and(|f| f.to_lowercase().contains(query_lower))
    }
}
