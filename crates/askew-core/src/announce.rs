#![forbid(unsafe_code)]

//! Screen-reader announcements.
//!
//! An [`Announcer`] holds the live status text. Announcing replaces the text
//! and returns a token; the owning control schedules a clear for its window
//! and calls [`Announcer::expire`] with that token. A stale token (the text was
//! superseded meanwhile) leaves the newer text in place.

use std::fmt;

use web_time::Duration;

/// Default time an announcement stays visible.
pub const DEFAULT_ANNOUNCEMENT_WINDOW: Duration = Duration::from_millis(1_000);

/// Live status-text holder with an optional listener.
pub struct Announcer {
    current: String,
    token: u64,
    window: Duration,
    listener: Option<Box<dyn FnMut(&str)>>,
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOUNCEMENT_WINDOW)
    }
}

impl fmt::Debug for Announcer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Announcer")
            .field("current", &self.current)
            .field("token", &self.token)
            .field("window", &self.window)
            .finish()
    }
}

impl Announcer {
    /// Announcer whose messages live for `window`.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            current: String::new(),
            token: 0,
            window,
            listener: None,
        }
    }

    /// Forward every new message to `listener`.
    pub fn on_announce(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Change how long later messages stay up. The listener is kept.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// How long messages stay up.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Currently visible text; empty when nothing is announced.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Replace the visible text and return the token that clears it.
    pub fn announce(&mut self, message: impl Into<String>) -> u64 {
        self.current = message.into();
        self.token += 1;
        tracing::debug!(message = %self.current, token = self.token, "announce");
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.current);
        }
        self.token
    }

    /// Clear the text if `token` still names the visible message.
    ///
    /// Returns `true` when the text was cleared. The listener hears the
    /// clear as an empty message.
    pub fn expire(&mut self, token: u64) -> bool {
        if token != self.token || self.current.is_empty() {
            return false;
        }
        self.current.clear();
        tracing::trace!(token, "announcement expired");
        if let Some(listener) = self.listener.as_mut() {
            listener("");
        }
        true
    }

    /// Clear unconditionally.
    pub fn clear(&mut self) {
        self.current.clear();
    }
}
