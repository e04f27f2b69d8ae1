//! Harness configuration.
//!
//! Every timeout, settle delay, and retry bound the scenarios use lives
//! here, with the defaults the live deployment was tuned against. Settle
//! delays exist because the application applies mutations asynchronously
//! with no observable completion signal; waits that do have a signal
//! (modal attach, option visibility) poll with a deadline instead.

use std::time::Duration;

/// Default origin of the deployed Kanban application
pub const DEFAULT_BASE_URL: &str = "https://kanban-566d8.firebaseapp.com/";

/// Fixture scan attempts while the DOM is still populating
pub const DEFAULT_FIXTURE_ATTEMPTS: u32 = 3;

/// Candidate cards tried before giving up on finding an eligible modal
pub const DEFAULT_CANDIDATE_ATTEMPTS: u32 = 10;

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Origin of the board under test
    pub base_url: String,
    /// Run the browser headless
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,

    /// Wait bound for column headings after navigation
    pub board_ready_timeout_ms: u64,
    /// Wait bound for the modal overlay and content marker to attach
    pub modal_open_timeout_ms: u64,
    /// Wait bound for dropdown options to become visible
    pub option_visible_timeout_ms: u64,
    /// Wait bound for the modal overlay to detach (non-fatal)
    pub modal_close_timeout_ms: u64,

    /// Settle after navigation and readiness
    pub page_settle_ms: u64,
    /// Settle after the modal attaches, before interacting with it
    pub modal_settle_ms: u64,
    /// Settle after toggling a subtask checkbox
    pub toggle_settle_ms: u64,
    /// Longer settle after re-clicking a checkbox that did not latch
    pub toggle_retry_settle_ms: u64,
    /// Settle after choosing a status option
    pub status_settle_ms: u64,
    /// Settle for the board to re-render after the modal closes
    pub rerender_settle_ms: u64,
    /// Grace delay when the overlay never detached
    pub close_grace_ms: u64,

    /// Fixture scan attempts (bounded retries over a populating DOM)
    pub fixture_attempts: u32,
    /// Base backoff between fixture scan attempts; grows linearly
    pub fixture_backoff_ms: u64,
    /// Candidate cards tried before failing the eligibility check
    pub candidate_attempts: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            chromium_path: None,
            viewport_width: 1280,
            viewport_height: 800,
            board_ready_timeout_ms: 10_000,
            modal_open_timeout_ms: 5_000,
            option_visible_timeout_ms: 3_000,
            modal_close_timeout_ms: 3_000,
            page_settle_ms: 1_000,
            modal_settle_ms: 500,
            toggle_settle_ms: 2_000,
            toggle_retry_settle_ms: 5_000,
            status_settle_ms: 1_500,
            rerender_settle_ms: 2_000,
            close_grace_ms: 500,
            fixture_attempts: DEFAULT_FIXTURE_ATTEMPTS,
            fixture_backoff_ms: 2_000,
            candidate_attempts: DEFAULT_CANDIDATE_ATTEMPTS,
        }
    }
}

impl HarnessConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay settings from the environment.
    ///
    /// Recognized variables: `TABLERO_BASE_URL`, `TABLERO_HEADFUL` (any
    /// value disables headless), `CHROMIUM_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TABLERO_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if std::env::var("TABLERO_HEADFUL").is_ok() {
            config.headless = false;
        }
        if let Ok(path) = std::env::var("CHROMIUM_PATH") {
            if !path.is_empty() {
                config.chromium_path = Some(path);
            }
        }
        config
    }

    /// Set the board origin
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the fixture scan bound
    #[must_use]
    pub const fn with_fixture_attempts(mut self, attempts: u32) -> Self {
        self.fixture_attempts = attempts;
        self
    }

    /// Set the candidate-card bound
    #[must_use]
    pub const fn with_candidate_attempts(mut self, attempts: u32) -> Self {
        self.candidate_attempts = attempts;
        self
    }

    /// Board-ready wait bound as a Duration
    #[must_use]
    pub const fn board_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.board_ready_timeout_ms)
    }

    /// Modal-open wait bound as a Duration
    #[must_use]
    pub const fn modal_open_timeout(&self) -> Duration {
        Duration::from_millis(self.modal_open_timeout_ms)
    }

    /// Option-visible wait bound as a Duration
    #[must_use]
    pub const fn option_visible_timeout(&self) -> Duration {
        Duration::from_millis(self.option_visible_timeout_ms)
    }

    /// Modal-close wait bound as a Duration
    #[must_use]
    pub const fn modal_close_timeout(&self) -> Duration {
        Duration::from_millis(self.modal_close_timeout_ms)
    }
}
