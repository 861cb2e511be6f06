//! UI-agnostic view state
//!
//! Everything the chat view shows lives in [`ViewState`]. State only changes
//! through [`reduce`], a pure `(state, event) -> state` function, so the whole
//! view can be exercised without a terminal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::labels::Label;

/// Greeting the conversation starts with.
pub const GREETING: &str =
    "Hello! I can help you manage your emails and schedule. What would you like to know?";

/// Fixed assistant reply appended after every user message.
pub const CANNED_REPLY: &str = "Here's a summary of your emails from February 14th:\n\n\
1. Meeting with Marketing Team (10:00 AM)\n\
2. Project Deadline Reminder from John\n\
3. Client Proposal Review Request\n\
4. Team Lunch Invitation\n\n\
Would you like me to add any of these events to your calendar?";

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Append-only message log, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    messages: Vec<ChatMessage>,
}

#[allow(clippy::len_without_is_empty)]
impl ConversationState {
    /// A conversation holding only the assistant greeting.
    pub fn seeded() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Append the user's text and the canned reply.
    ///
    /// Returns `false` without touching anything when `text` trims to empty.
    pub fn submit(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.messages.push(ChatMessage::user(text));
        self.messages.push(ChatMessage::assistant(CANNED_REPLY));
        true
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Result of the one-time label fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LabelState {
    #[default]
    Loading,
    Loaded(Vec<Label>),
    Failed(String),
}

impl LabelState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LabelState::Loading)
    }

    pub fn labels(&self) -> Option<&[Label]> {
        match self {
            LabelState::Loaded(labels) => Some(labels),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LabelState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Everything the chat view renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub conversation: ConversationState,
    pub labels: LabelState,
    pub input: String,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Inputs to [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The input buffer was edited.
    InputChanged(String),
    /// Submit the current input buffer.
    Submit,
    /// An example prompt was picked; its text replaces the input.
    SelectPrompt(String),
    LabelsLoaded(Vec<Label>),
    LabelsFailed(String),
}

/// Apply one event to the view state.
pub fn reduce(mut state: ViewState, event: ViewEvent) -> ViewState {
    match event {
        ViewEvent::InputChanged(text) | ViewEvent::SelectPrompt(text) => {
            state.input = text;
        }
        ViewEvent::Submit => {
            if state.conversation.submit(&state.input) {
                debug!(messages = state.conversation.len(), "message submitted");
                state.input.clear();
            }
        }
        ViewEvent::LabelsLoaded(labels) => {
            if state.labels.is_loading() {
                debug!(count = labels.len(), "labels loaded");
                state.labels = LabelState::Loaded(labels);
            }
        }
        ViewEvent::LabelsFailed(message) => {
            if state.labels.is_loading() {
                debug!(%message, "labels failed");
                state.labels = LabelState::Failed(message);
            }
        }
    }
    state
}
