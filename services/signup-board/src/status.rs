//! Transient status message shown after a signup attempt

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual state of a visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Error,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Success => write!(f, "success"),
            StatusKind::Error => write!(f, "error"),
        }
    }
}

/// What the status area currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusMessage {
    #[default]
    Hidden,
    Visible { kind: StatusKind, text: String },
}

impl StatusMessage {
    pub fn is_visible(&self) -> bool {
        matches!(self, StatusMessage::Visible { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            StatusMessage::Hidden => None,
            StatusMessage::Visible { text, .. } => Some(text),
        }
    }

    pub fn kind(&self) -> Option<StatusKind> {
        match self {
            StatusMessage::Hidden => None,
            StatusMessage::Visible { kind, .. } => Some(*kind),
        }
    }
}

/// The status area. Every `show` bumps the generation; a scheduled hide only
/// applies if no newer message has been shown since it was scheduled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusArea {
    pub message: StatusMessage,
    pub generation: u64,
}

impl StatusArea {
    /// Show a message, returning the generation a later hide must match
    pub fn show(&mut self, kind: StatusKind, text: impl Into<String>) -> u64 {
        self.message = StatusMessage::Visible {
            kind,
            text: text.into(),
        };
        self.generation += 1;
        self.generation
    }

    /// Hide the message if it is still the one shown at `generation`
    pub fn hide_if_current(&mut self, generation: u64) -> bool {
        if self.generation != generation || !self.message.is_visible() {
            return false;
        }
        self.message = StatusMessage::Hidden;
        true
    }
}
