//! Timed status message for the bottom line.

use std::time::{Duration, Instant};

/// The most recent status message and when it was set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    set_at: Option<Instant>,
}

impl StatusMessage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the message and restart its clock.
    pub fn set(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.set_at = Some(now);
    }

    /// The current text, regardless of age.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text if it is non-empty and younger than `timeout` at `now`.
    #[must_use]
    pub fn visible(&self, now: Instant, timeout: Duration) -> Option<&str> {
        let set_at = self.set_at?;
        let fresh = now.saturating_duration_since(set_at) < timeout;
        (fresh && !self.text.is_empty()).then_some(self.text.as_str())
    }
}
