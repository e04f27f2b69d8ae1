//! Interaction driver: the guarded modal transaction.
//!
//! Driving the card edit modal is a small state machine:
//!
//! ```text
//! Closed -> Opening -> Open -> Mutating -> ... -> Closing -> Closed
//! ```
//!
//! `Opening` clicks the card and waits for the overlay plus content marker
//! to attach (fatal on timeout). In `Open` the caller runs precondition
//! probes and mutations; each mutation passes through `Mutating` and back.
//! `Closing` dismisses by clicking outside the modal and waits for the
//! overlay to detach, which is allowed to fail (the board is re-verified by
//! key afterwards anyway). Locator failures on required steps are fatal;
//! visibility probes are not and only steer control flow.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::board::SubtaskState;
use crate::fixture::CardFixture;
use crate::locator;
use crate::page::BoardPage;
use crate::result::{TableroError, TableroResult};
use crate::wait::WaitOptions;

/// Settle after opening the status dropdown, before reading options
const OPTION_RENDER_SETTLE: Duration = Duration::from_millis(300);

/// Settle after opening the three-dots menu
const MENU_SETTLE: Duration = Duration::from_millis(400);

/// Settle after the confirmation dialog renders
const CONFIRM_SETTLE: Duration = Duration::from_millis(500);

/// Offset into the overlay for the dismissal click, clear of the modal box
const OVERLAY_CLICK_OFFSET: u32 = 10;

/// Modal transaction states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    /// No modal on screen
    Closed,
    /// Card clicked, waiting for the overlay and content marker
    Opening,
    /// Modal interactable
    Open,
    /// A mutation is in flight
    Mutating,
    /// Dismissal clicked, waiting for the overlay to detach
    Closing,
}

impl ModalState {
    /// Guard an operation against being called in the wrong state
    pub fn ensure(self, expected: Self, operation: &str) -> TableroResult<()> {
        if self == expected {
            Ok(())
        } else {
            Err(TableroError::InvalidState {
                message: format!("{operation} requires {expected:?} state, driver is {self:?}"),
            })
        }
    }
}

impl std::fmt::Display for ModalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Drives one card modal through open, mutate, and close
#[derive(Debug)]
pub struct ModalDriver<'a> {
    page: &'a BoardPage,
    state: ModalState,
}

impl<'a> ModalDriver<'a> {
    /// Create a driver over a page with no modal open
    #[must_use]
    pub const fn new(page: &'a BoardPage) -> Self {
        Self {
            page,
            state: ModalState::Closed,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ModalState {
        self.state
    }

    /// Click the fixture's card and wait for the modal to attach.
    ///
    /// Fatal when the overlay or its content marker never appears within
    /// the modal-open bound.
    pub async fn open(&mut self, fixture: &CardFixture) -> TableroResult<()> {
        self.open_with_attempts(fixture, 1).await
    }

    /// Like [`Self::open`], embedding the caller's attempt count in a
    /// missing-card failure (candidate loops report how many fixtures
    /// they tried).
    pub async fn open_with_attempts(
        &mut self,
        fixture: &CardFixture,
        attempts: u32,
    ) -> TableroResult<()> {
        self.state.ensure(ModalState::Closed, "open")?;
        self.state = ModalState::Opening;

        debug!(card = %fixture.card_title, "opening card modal");
        self.page
            .click_with_attempts(
                &locator::card_center(fixture.column_index, fixture.card_index),
                &format!("card '{}'", fixture.card_title),
                attempts,
            )
            .await?;

        let config = self.page.config();
        self.page
            .wait_until(
                "modal overlay and content",
                &locator::modal_open(),
                WaitOptions::timeout(config.modal_open_timeout()),
            )
            .await?;
        self.page
            .settle(Duration::from_millis(config.modal_settle_ms))
            .await;

        self.state = ModalState::Open;
        Ok(())
    }

    /// Precondition probe: at least one visible, labeled, unchecked
    /// checkbox scoped to the modal. Never fatal; `false` tells the caller
    /// to abandon this fixture and advance to the next candidate.
    pub async fn has_unchecked_subtask(&self) -> bool {
        if self.state != ModalState::Open {
            return false;
        }
        match self.page.modal().await {
            Ok(Some(modal)) => modal.has_unchecked(),
            Ok(None) | Err(_) => false,
        }
    }

    /// Toggle the first eligible checkbox, exactly once.
    ///
    /// The application latches the toggle asynchronously, so a settle delay
    /// follows the click; if the box still reads unchecked the click is
    /// repeated once with a longer settle. Returns the mutated subtask's
    /// state (for the strikethrough check).
    pub async fn complete_first_subtask(&mut self) -> TableroResult<SubtaskState> {
        self.state.ensure(ModalState::Open, "complete_first_subtask")?;
        self.state = ModalState::Mutating;
        let result = self.toggle_first_eligible().await;
        self.state = ModalState::Open;
        result
    }

    async fn toggle_first_eligible(&self) -> TableroResult<SubtaskState> {
        let config = self.page.config();
        let modal = self.page.modal().await?.unwrap_or_default();
        let Some(index) = modal.first_eligible() else {
            return Err(TableroError::RequiredElementMissing {
                step: "first eligible subtask checkbox".to_string(),
                attempts: 1,
            });
        };
        let label = modal.subtasks[index].label.clone();

        // The click target is addressed by label text; an index into the
        // full row list would not survive rows already checked ahead of it.
        debug!(subtask = %label, "toggling subtask");
        self.page
            .click(
                &locator::subtask_label_center(&label),
                &format!("subtask checkbox '{label}'"),
            )
            .await?;
        self.page
            .settle(Duration::from_millis(config.toggle_settle_ms))
            .await;

        if !self.page.probe(&locator::subtask_checked(&label)).await {
            // The click landed but did not latch; click once more and wait
            // out the slower save path.
            warn!(subtask = %label, "toggle did not latch, clicking again");
            self.page
                .click(
                    &locator::subtask_label_center(&label),
                    &format!("subtask checkbox '{label}' (retry)"),
                )
                .await?;
            self.page
                .settle(Duration::from_millis(config.toggle_retry_settle_ms))
                .await;
        }

        let after = self.page.modal().await?.unwrap_or_default();
        after
            .subtasks
            .into_iter()
            .find(|s| s.label == label)
            .ok_or_else(|| TableroError::RequiredElementMissing {
                step: format!("subtask '{label}' after toggle"),
                attempts: 1,
            })
    }

    /// Open the "Current Status" dropdown and choose the named column.
    pub async fn select_status(&mut self, column_name: &str) -> TableroResult<()> {
        self.state.ensure(ModalState::Open, "select_status")?;
        self.state = ModalState::Mutating;
        let result = self.select_status_inner(column_name).await;
        self.state = ModalState::Open;
        result
    }

    async fn select_status_inner(&self, column_name: &str) -> TableroResult<()> {
        let config = self.page.config();

        info!(status = %column_name, "changing card status");
        self.page
            .click(&locator::status_dropdown_center(), "status dropdown")
            .await?;

        // Options render through focus-driven CSS, so attachment is not
        // enough; wait until one is actually visible.
        self.page
            .wait_until(
                "status dropdown options",
                &locator::status_options_visible(),
                WaitOptions::timeout(config.option_visible_timeout()),
            )
            .await?;
        self.page.settle(OPTION_RENDER_SETTLE).await;

        self.page
            .click(
                &locator::status_option_center(column_name),
                &format!("status option '{column_name}'"),
            )
            .await?;
        self.page
            .settle(Duration::from_millis(config.status_settle_ms))
            .await;
        Ok(())
    }

    /// Delete the open card through the options menu and confirmation
    /// dialog. The modal tears itself down afterwards.
    pub async fn delete_task(&mut self) -> TableroResult<()> {
        self.state.ensure(ModalState::Open, "delete_task")?;
        self.state = ModalState::Mutating;
        let result = self.delete_task_inner().await;
        match &result {
            Ok(()) => self.state = ModalState::Closed,
            Err(_) => self.state = ModalState::Open,
        }
        result
    }

    async fn delete_task_inner(&self) -> TableroResult<()> {
        let config = self.page.config();

        info!("deleting card through options menu");
        self.page
            .click(&locator::menu_button_center(), "options menu")
            .await?;
        self.page.settle(MENU_SETTLE).await;

        self.page
            .click(&locator::delete_option_center(), "Delete Task option")
            .await?;

        self.page
            .wait_until(
                "delete confirmation dialog",
                &locator::confirm_dialog_visible(),
                WaitOptions::timeout(config.option_visible_timeout()),
            )
            .await?;
        self.page.settle(CONFIRM_SETTLE).await;

        self.page
            .click(&locator::confirm_delete_center(), "Delete confirmation button")
            .await?;

        self.await_detach().await;
        Ok(())
    }

    /// Dismiss the modal by clicking outside its bounds.
    ///
    /// The overlay click and the detach wait are both non-fatal: the
    /// scenario re-verifies the board by key either way.
    pub async fn close(&mut self) -> TableroResult<()> {
        self.state.ensure(ModalState::Open, "close")?;
        self.state = ModalState::Closing;

        let expr = locator::overlay_point(OVERLAY_CLICK_OFFSET, OVERLAY_CLICK_OFFSET);
        match self.page.resolve_point(&expr).await {
            Ok(Some(point)) => self.page.click_point(point).await?,
            Ok(None) => debug!("overlay already gone before dismissal click"),
            Err(e) => warn!(error = %e, "overlay dismissal probe failed"),
        }

        self.await_detach().await;
        self.state = ModalState::Closed;
        Ok(())
    }

    /// Wait for the overlay to detach; timing out only costs a grace delay.
    async fn await_detach(&self) {
        let config = self.page.config();
        let wait = self
            .page
            .wait_until(
                "modal overlay detach",
                &locator::modal_closed(),
                WaitOptions::timeout(config.modal_close_timeout()),
            )
            .await;
        if wait.is_err() {
            warn!("modal overlay did not detach in time, proceeding");
        }
        self.page
            .settle(Duration::from_millis(config.close_grace_ms))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ModalSnapshot;

    fn row(label: &str, checked: bool) -> SubtaskState {
        SubtaskState {
            label: label.to_string(),
            checked,
            visible: true,
            label_classes: String::new(),
            text_decoration: String::new(),
        }
    }

    #[test]
    fn toggle_targets_first_unchecked_row_when_earlier_rows_are_checked() {
        // A card showing "1 of 3 substasks" opens with its first row
        // already checked; the click must resolve to the first unchecked
        // row's label, not to an index shifted by the checked row.
        let modal = ModalSnapshot {
            subtasks: vec![row("done already", true), row("open", false), row("later", false)],
        };
        let index = modal.first_eligible().unwrap();
        assert_eq!(index, 1);

        let label = &modal.subtasks[index].label;
        let click = locator::subtask_label_center(label);
        assert!(click.contains(r#""open""#));
        assert!(!click.contains("done already"));
        // The latch read-back resolves through the same key.
        assert!(locator::subtask_checked(label).contains(r#""open""#));
    }

    #[test]
    fn ensure_accepts_matching_state() {
        assert!(ModalState::Open.ensure(ModalState::Open, "op").is_ok());
        assert!(ModalState::Closed.ensure(ModalState::Closed, "op").is_ok());
    }

    #[test]
    fn ensure_rejects_out_of_order_operation() {
        let err = ModalState::Closed
            .ensure(ModalState::Open, "select_status")
            .unwrap_err();
        match err {
            TableroError::InvalidState { message } => {
                assert!(message.contains("select_status"));
                assert!(message.contains("Open"));
                assert!(message.contains("Closed"));
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn invalid_state_is_not_scenario_fatal() {
        // Misuse is a harness bug, surfaced as an error but not part of
        // the pass/fail taxonomy the runner reports on.
        let err = ModalState::Closing
            .ensure(ModalState::Open, "close")
            .unwrap_err();
        assert!(!err.is_fatal_for_scenario());
    }

    #[test]
    fn state_display_matches_debug() {
        assert_eq!(ModalState::Mutating.to_string(), "Mutating");
        assert_eq!(ModalState::Opening.to_string(), "Opening");
    }
}
