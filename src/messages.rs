use crate::constants::MESSAGE_TTL;
use std::time::{Duration, Instant};

/// The visible error and success text of a session. An error clears itself
/// `ttl` after it was posted; a newer error restarts the clock. Success text
/// stays until the next add or clear.
#[derive(Debug, Clone)]
pub struct MessageBoard {
    error: Option<(String, Instant)>,
    success: Option<String>,
    ttl: Duration,
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self::new(MESSAGE_TTL)
    }
}

impl MessageBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            error: None,
            success: None,
            ttl,
        }
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.show_error_at(text, Instant::now());
    }

    pub fn show_error_at(&mut self, text: impl Into<String>, now: Instant) {
        self.error = Some((text.into(), now));
    }

    pub fn show_success(&mut self, text: impl Into<String>) {
        self.success = Some(text.into());
    }

    pub fn current_error(&self) -> Option<&str> {
        self.current_error_at(Instant::now())
    }

    pub fn current_error_at(&self, now: Instant) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|(_, posted)| now.saturating_duration_since(*posted) < self.ttl)
            .map(|(text, _)| text.as_str())
    }

    pub fn current_success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn clear(&mut self) {
        self.error = None;
        self.success = None;
    }
}
