//! The board page session.
//!
//! [`BoardPage`] wraps one CDP page and is the only thing that touches the
//! live DOM. Reads come back as JSON snapshots (never element handles, which
//! a re-render would invalidate); interactions resolve a locator to a
//! viewport point at click time and dispatch trusted mouse events.

use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as CdpPage;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::board::{BoardSnapshot, ModalSnapshot};
use crate::browser::Browser;
use crate::config::HarnessConfig;
use crate::locator;
use crate::result::{TableroError, TableroResult};
use crate::wait::WaitOptions;

/// A point in viewport CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// Wire form of a center-point locator result. Locators report absence
/// with `found: false` instead of null so the CDP value channel always
/// carries a JSON object.
#[derive(Debug, Deserialize)]
struct PointProbe {
    found: bool,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

/// Wire form of the modal snapshot locator
#[derive(Debug, Deserialize)]
struct ModalProbe {
    present: bool,
    #[serde(default)]
    subtasks: Vec<crate::board::SubtaskState>,
}

/// One page of the live Kanban board
#[derive(Debug)]
pub struct BoardPage {
    page: CdpPage,
    config: HarnessConfig,
}

impl BoardPage {
    /// Open a page and navigate to the board, waiting until columns render.
    ///
    /// Readiness is: navigation committed, load event fired, column
    /// headings attached, then one page settle delay for late card loads.
    pub async fn open(browser: &Browser, config: &HarnessConfig) -> TableroResult<Self> {
        let page = browser.new_page().await?;
        let board = Self {
            page,
            config: config.clone(),
        };
        board.goto_board().await?;
        Ok(board)
    }

    /// Wrap an existing CDP page without navigating
    #[must_use]
    pub fn from_page(page: CdpPage, config: HarnessConfig) -> Self {
        Self { page, config }
    }

    /// The active harness config
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Navigate (or re-navigate) to the board and wait for readiness
    pub async fn goto_board(&self) -> TableroResult<()> {
        let url = self.config.base_url.clone();
        debug!(url = %url, "navigating to board");

        self.page
            .goto(url.as_str())
            .await
            .map_err(|e| TableroError::Navigation {
                url: url.clone(),
                message: e.to_string(),
            })?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| TableroError::Navigation {
                url,
                message: e.to_string(),
            })?;

        self.wait_until(
            "column headings",
            &locator::board_ready(),
            WaitOptions::timeout(self.config.board_ready_timeout()),
        )
        .await?;

        // Cards may keep streaming in after the headings attach.
        self.settle(Duration::from_millis(self.config.page_settle_ms))
            .await;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Evaluation
    // -----------------------------------------------------------------

    /// Evaluate a JS expression and deserialize its JSON result
    pub async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> TableroResult<T> {
        let result = self
            .page
            .evaluate(expr)
            .await
            .map_err(|e| TableroError::Eval {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| TableroError::Eval {
            message: e.to_string(),
        })
    }

    /// Snapshot the board (columns, cards, summaries) in one DOM pass
    pub async fn snapshot(&self) -> TableroResult<BoardSnapshot> {
        self.eval(&locator::board_snapshot()).await
    }

    /// Snapshot the open modal, or `None` when no modal is attached
    pub async fn modal(&self) -> TableroResult<Option<ModalSnapshot>> {
        let probe: ModalProbe = self.eval(&locator::modal_snapshot()).await?;
        Ok(probe.present.then_some(ModalSnapshot {
            subtasks: probe.subtasks,
        }))
    }

    // -----------------------------------------------------------------
    // Waits
    // -----------------------------------------------------------------

    /// Poll a boolean expression until it holds. Required wait: exceeding
    /// the bound raises [`TableroError::Timeout`].
    pub async fn wait_until(
        &self,
        waiting_for: &str,
        expr: &str,
        options: WaitOptions,
    ) -> TableroResult<()> {
        let deadline = Instant::now() + options.timeout_duration();
        loop {
            if self.eval::<bool>(expr).await.unwrap_or(false) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(TableroError::Timeout {
                    waiting_for: waiting_for.to_string(),
                    ms: options.timeout_ms,
                });
            }
            tokio::time::sleep(options.poll_interval()).await;
        }
    }

    /// Optional probe: evaluation errors and absent elements collapse to
    /// `false` instead of aborting the scenario.
    pub async fn probe(&self, expr: &str) -> bool {
        self.eval::<bool>(expr).await.unwrap_or(false)
    }

    /// Fixed settle delay. Substitutes for the completion signal the
    /// application does not emit; keep bounded and prefer
    /// [`Self::wait_until`] wherever a DOM signal exists.
    pub async fn settle(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }

    // -----------------------------------------------------------------
    // Interaction
    // -----------------------------------------------------------------

    /// Resolve a center-point locator; `None` when the element is absent
    /// or has no box.
    pub async fn resolve_point(&self, expr: &str) -> TableroResult<Option<Point>> {
        let probe: PointProbe = self.eval(expr).await?;
        Ok(probe.found.then_some(Point {
            x: probe.x,
            y: probe.y,
        }))
    }

    /// Click the element a locator resolves to. Required step: an
    /// unresolvable locator raises [`TableroError::RequiredElementMissing`]
    /// naming the step.
    pub async fn click(&self, expr: &str, step: &str) -> TableroResult<()> {
        self.click_with_attempts(expr, step, 1).await
    }

    /// Like [`Self::click`], embedding the caller's attempt count in the
    /// failure (candidate loops report how many fixtures they tried).
    pub async fn click_with_attempts(
        &self,
        expr: &str,
        step: &str,
        attempts: u32,
    ) -> TableroResult<()> {
        let point = self.resolve_point(expr).await?.ok_or_else(|| {
            TableroError::RequiredElementMissing {
                step: step.to_string(),
                attempts,
            }
        })?;
        debug!(step, x = point.x, y = point.y, "clicking");
        self.click_point(point).await
    }

    /// Dispatch a primary-button click at a viewport point
    pub async fn click_point(&self, point: Point) -> TableroResult<()> {
        let pressed = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MousePressed)
            .x(point.x)
            .y(point.y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(|e| TableroError::Input {
                message: e.to_string(),
            })?;
        self.page
            .execute(pressed)
            .await
            .map_err(|e| TableroError::Input {
                message: e.to_string(),
            })?;

        let released = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseReleased)
            .x(point.x)
            .y(point.y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(|e| TableroError::Input {
                message: e.to_string(),
            })?;
        self.page
            .execute(released)
            .await
            .map_err(|e| TableroError::Input {
                message: e.to_string(),
            })?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Artifacts
    // -----------------------------------------------------------------

    /// Capture a PNG of the page, for failure artifacts
    pub async fn screenshot(&self) -> TableroResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let response =
            self.page
                .execute(params)
                .await
                .map_err(|e| TableroError::Screenshot {
                    message: e.to_string(),
                })?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&response.data)
            .map_err(|e| TableroError::Screenshot {
                message: e.to_string(),
            })
    }

    /// Capture a screenshot to a file, logging rather than failing when the
    /// capture itself errors (the original failure matters more).
    pub async fn screenshot_to(&self, path: &std::path::Path) {
        match self.screenshot().await {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(path, bytes) {
                    warn!(path = %path.display(), error = %e, "failed to write screenshot");
                }
            }
            Err(e) => warn!(error = %e, "failed to capture screenshot"),
        }
    }
}
