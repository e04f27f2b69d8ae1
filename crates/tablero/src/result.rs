//! Result and error types for Tablero.
//!
//! The taxonomy separates failures that must surface to the test runner
//! (required element missing, timed-out required waits, postcondition
//! mismatches) from conditions that are absorbed into control flow.
//! "No fixture on the live board" is deliberately NOT an error here; it is
//! [`crate::scenario::ScenarioOutcome::Skipped`].

use thiserror::Error;

/// Result type for Tablero operations
pub type TableroResult<T> = Result<T, TableroError>;

/// Errors that can occur while driving the board
#[derive(Debug, Error)]
pub enum TableroError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// JavaScript evaluation error
    #[error("Evaluation failed: {message}")]
    Eval {
        /// Error message
        message: String,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// A mandatory locator never resolved. Fatal for the scenario.
    #[error("Required element missing at step '{step}' after {attempts} attempt(s)")]
    RequiredElementMissing {
        /// Step of the UI transaction that needed the element
        step: String,
        /// How many attempts were made before giving up
        attempts: u32,
    },

    /// A bounded wait elapsed
    #[error("Timed out after {ms}ms waiting for {waiting_for}")]
    Timeout {
        /// Description of the awaited condition
        waiting_for: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Interaction driver called out of order
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// Outcome verification failed
    #[error("Postcondition mismatch in {check}: expected {expected}, got {actual}")]
    PostconditionMismatch {
        /// Which assertion failed
        check: String,
        /// Expected value
        expected: String,
        /// Actual value
        actual: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableroError {
    /// Whether the error is one the runner should report as a scenario
    /// failure. Everything else is recovered locally (retry, skip, advance
    /// to the next candidate).
    #[must_use]
    pub const fn is_fatal_for_scenario(&self) -> bool {
        matches!(
            self,
            Self::RequiredElementMissing { .. }
                | Self::Timeout { .. }
                | Self::PostconditionMismatch { .. }
        )
    }
}
