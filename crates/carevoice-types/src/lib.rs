//! Shared conversation types for the carevoice workspace.
//!
//! The voice pipeline that drives a session lives outside this workspace;
//! what crosses the boundary into our code is the chat history the language
//! model is about to see. This crate defines that history and nothing else,
//! so both the search and agent crates can depend on it without pulling in
//! any I/O.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message in the chat history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and retrieved context for the model.
    System,
    /// Transcribed speech from the end user.
    User,
    /// Replies generated by the model.
    Assistant,
}

impl Role {
    /// Returns the wire label for this role.
    pub fn label(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single entry in the chat history.
///
/// Messages are immutable once constructed; the history only ever appends
/// new ones or drops old ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered conversation history owned by one voice session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    messages: Vec<ChatMessage>,
}

impl ChatContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns `self`, for building seeded contexts.
    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Concatenates the content of every message, in order, with `separator`.
    pub fn joined_content(&self, separator: &str) -> String {
        self.messages
            .iter()
            .map(ChatMessage::content)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Keeps only the `max` most recent messages, preserving their order.
    ///
    /// Returns the number of messages dropped from the front.
    pub fn retain_recent(&mut self, max: usize) -> usize {
        let excess = self.messages.len().saturating_sub(max);
        if excess > 0 {
            self.messages.drain(..excess);
        }
        excess
    }
}

impl FromIterator<ChatMessage> for ChatContext {
    fn from_iter<I: IntoIterator<Item = ChatMessage>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}
