use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorRole {
    Bot,
    User,
}

/// One side of the conversation. Two of these exist per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub avatar: String,
    pub name: String,
    pub role: AuthorRole,
}

/// A single transcript entry
#[derive(Debug, Clone)]
pub struct Message {
    pub created_at: DateTime<Local>,
    pub author: Arc<Author>,
    pub text: String,
}

impl Message {
    pub fn new(author: Arc<Author>, text: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            created_at,
            author,
            text: text.into(),
        }
    }

    pub fn role(&self) -> AuthorRole {
        self.author.role
    }
}

/// Progress reported by a scheduled bot reply
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    /// The simulated thinking delay elapsed, the bot starts "typing"
    TypingStarted,

    /// The typing placeholder advanced
    Dots(String),

    /// The canned reply is ready to be appended
    Reply(Message),
}
