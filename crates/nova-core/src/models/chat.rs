//! Chat transcript models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::journal::Journal;
use crate::repository::Slot;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum InteractionMode {
    Text,
    #[default]
    Voice,
}

impl InteractionMode {
    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::Text => InteractionMode::Voice,
            InteractionMode::Voice => InteractionMode::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A web source cited by an assistant reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

impl Source {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(with = "crate::models::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }
}

/// Archived transcript shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatLog {
    pub user_name: String,
    pub messages: Vec<Message>,
    #[serde(with = "crate::models::timestamp")]
    pub timestamp: DateTime<Utc>,
    pub summary: Option<String>,
}

pub type ChatArchive = Journal<ChatLog>;

impl Slot for ChatArchive {
    const KEY: &'static str = "nova_all_chats";
}
