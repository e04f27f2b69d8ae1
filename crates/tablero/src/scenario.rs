//! The end-to-end scenarios: one guarded UI transaction each.
//!
//! A scenario is conditionally applicable: when the live board does not
//! present a card satisfying the precondition, it reports
//! [`ScenarioOutcome::Skipped`] rather than failing — the data did not
//! offer a testable case. Everything that does fail carries the step name
//! or the expected/actual pair.

use tracing::{debug, info};

use crate::driver::ModalDriver;
use crate::fixture::{
    any_card, find_fixture, incomplete_outside_first_column, select_fixture, Candidate,
};
use crate::page::BoardPage;
use crate::result::{TableroError, TableroResult};
use crate::verify;
use std::time::Duration;

/// How a scenario ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// The transaction ran and every postcondition held
    Completed,
    /// The precondition was not met by the live data
    Skipped {
        /// Why the scenario did not apply
        reason: String,
    },
}

impl ScenarioOutcome {
    /// Build a skip outcome
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Whether the transaction ran to completion
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Edit a card: complete one subtask, move the card to the first column,
/// and verify the subtask delta, strikethrough, and membership change.
pub async fn edit_card(page: &BoardPage) -> TableroResult<ScenarioOutcome> {
    let config = page.config().clone();

    let board = page.snapshot().await?;
    if board.column_count() < 2 {
        return Err(TableroError::RequiredElementMissing {
            step: "second board column".to_string(),
            attempts: 1,
        });
    }
    let first_column = board.columns[0].name().to_string();
    let source_columns = board.column_count();

    // Precondition: a card with incomplete subtasks outside the first
    // column. Absence is a skip, not a failure.
    let Some(mut fixture) = find_fixture(page, incomplete_outside_first_column).await? else {
        return Ok(ScenarioOutcome::skipped(
            "no card with incomplete subtasks outside the first column",
        ));
    };

    // The card summary can disagree with the modal (all boxes checked, or
    // not yet rendered); abandon such fixtures and advance, bounded.
    let mut driver = ModalDriver::new(page);
    let mut tried: Vec<String> = Vec::new();
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        driver.open_with_attempts(&fixture, attempts).await?;
        if driver.has_unchecked_subtask().await {
            break;
        }

        debug!(card = %fixture.card_title, "modal has no unchecked subtasks, advancing");
        tried.push(fixture.card_title.clone());
        driver.close().await?;

        if attempts >= config.candidate_attempts {
            return Err(TableroError::RequiredElementMissing {
                step: "card with unchecked subtasks in modal".to_string(),
                attempts,
            });
        }

        let rescan = page.snapshot().await?;
        let next = select_fixture(&rescan, |c: &Candidate<'_>| {
            incomplete_outside_first_column(c) && !tried.iter().any(|t| t == &c.card.title)
        });
        fixture = next.ok_or(TableroError::RequiredElementMissing {
            step: "card with unchecked subtasks in modal".to_string(),
            attempts,
        })?;
    }

    let before = fixture
        .subtasks
        .ok_or_else(|| TableroError::RequiredElementMissing {
            step: "subtask summary on fixture card".to_string(),
            attempts,
        })?;
    info!(
        card = %fixture.card_title,
        from = %fixture.column_name,
        to = %first_column,
        before = %before,
        "editing card"
    );

    let toggled = driver.complete_first_subtask().await?;
    driver.select_status(&first_column).await?;
    verify::assert_struck_through(&toggled)?;
    driver.close().await?;

    // The board regenerates after the modal closes; give it time, then
    // re-acquire everything by key.
    page.settle(Duration::from_millis(config.rerender_settle_ms))
        .await;
    let after = page.snapshot().await?;

    verify::assert_column_count(&after, source_columns)?;
    verify::assert_card_moved(&after, &fixture.card_title, &fixture.column_name, &first_column)?;
    verify::assert_subtask_progress(&after, &fixture.card_title, &first_column, before)?;

    info!(card = %fixture.card_title, "edit scenario completed");
    Ok(ScenarioOutcome::Completed)
}

/// Delete a card through the options menu and verify it vanished
/// board-wide with exactly one column shrinking by one.
pub async fn delete_card(page: &BoardPage) -> TableroResult<ScenarioOutcome> {
    let config = page.config().clone();

    // Any visible card will do, but an entirely empty board is a failure
    // here rather than a skip: the deployment always seeds cards.
    let Some(fixture) = find_fixture(page, any_card).await? else {
        return Err(TableroError::RequiredElementMissing {
            step: "column with at least one card".to_string(),
            attempts: config.fixture_attempts,
        });
    };

    let before = page.snapshot().await?;
    let column_count = before.column_count();
    let previous_cards = before
        .column_by_name(&fixture.column_name)
        .map_or(0, |c| c.cards.len());
    info!(
        card = %fixture.card_title,
        column = %fixture.column_name,
        cards = previous_cards,
        "deleting card"
    );

    let mut driver = ModalDriver::new(page);
    driver.open(&fixture).await?;
    driver.delete_task().await?;

    page.settle(Duration::from_millis(config.rerender_settle_ms))
        .await;
    let after = page.snapshot().await?;

    verify::assert_column_count(&after, column_count)?;
    verify::assert_card_deleted(
        &after,
        &fixture.card_title,
        &fixture.column_name,
        previous_cards,
    )?;

    info!(card = %fixture.card_title, "delete scenario completed");
    Ok(ScenarioOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_carries_reason() {
        let outcome = ScenarioOutcome::skipped("board empty");
        assert!(!outcome.is_completed());
        match outcome {
            ScenarioOutcome::Skipped { reason } => assert_eq!(reason, "board empty"),
            ScenarioOutcome::Completed => panic!("expected skip"),
        }
    }

    #[test]
    fn completed_is_completed() {
        assert!(ScenarioOutcome::Completed.is_completed());
    }
}
