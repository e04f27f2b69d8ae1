//! Fixture selection: find a card on the live board that satisfies a
//! scenario's precondition.
//!
//! The board is populated asynchronously, so discovery is a bounded-attempts
//! loop: scan all columns in document order (column index ascending, then
//! card index ascending), skip cards that are not visible yet, and return
//! the first match. When the scan comes up empty the loop backs off with an
//! increasing delay and re-snapshots, up to the configured bound. Exhaustion
//! is not a failure: the caller treats "no fixture" as a skip condition,
//! because the live data simply did not present a testable case.

use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::board::{BoardSnapshot, CardSnapshot, ColumnSnapshot, SubtaskSummary};
use crate::page::BoardPage;
use crate::result::TableroResult;
use crate::wait::Backoff;

/// A candidate (column, card) pair offered to a predicate
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The whole board, for cross-column checks
    pub board: &'a BoardSnapshot,
    /// Column position in document order
    pub column_index: usize,
    /// The candidate's column
    pub column: &'a ColumnSnapshot,
    /// Card position within the column
    pub card_index: usize,
    /// The candidate card
    pub card: &'a CardSnapshot,
}

/// A card selected to satisfy a scenario precondition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFixture {
    /// Column position in document order
    pub column_index: usize,
    /// Column name (count suffix stripped), the stable re-acquisition key
    pub column_name: String,
    /// Card position within the column at selection time
    pub card_index: usize,
    /// Card title, the stable re-acquisition key
    pub card_title: String,
    /// Subtask progress at selection time, when the card renders one
    pub subtasks: Option<SubtaskSummary>,
}

/// Scan a snapshot for the first visible card satisfying the predicate.
///
/// Ties break by document order. Invisible cards never reach the predicate.
pub fn select_fixture<F>(board: &BoardSnapshot, predicate: F) -> Option<CardFixture>
where
    F: Fn(&Candidate<'_>) -> bool,
{
    for (column_index, column) in board.columns.iter().enumerate() {
        for (card_index, card) in column.cards.iter().enumerate() {
            if !card.visible {
                continue;
            }
            let candidate = Candidate {
                board,
                column_index,
                column,
                card_index,
                card,
            };
            if predicate(&candidate) {
                return Some(CardFixture {
                    column_index,
                    column_name: column.name().to_string(),
                    card_index,
                    card_title: card.title.clone(),
                    subtasks: card.subtasks(),
                });
            }
        }
    }
    None
}

/// Predicate: card has incomplete subtasks and sits outside the first
/// column.
///
/// The column check is double: index > 0, and the column name differs from
/// the first column's name case-insensitively. The name comparison guards
/// against the board rendering the same lane twice while loading.
#[must_use]
pub fn incomplete_outside_first_column(candidate: &Candidate<'_>) -> bool {
    if candidate.column_index == 0 {
        return false;
    }
    let Some(summary) = candidate.card.subtasks() else {
        return false;
    };
    if !summary.has_incomplete() {
        return false;
    }
    match candidate.board.columns.first() {
        Some(first) => !candidate
            .column
            .name()
            .eq_ignore_ascii_case(first.name()),
        None => false,
    }
}

/// Predicate: any visible card. Selects the first column holding one.
#[must_use]
pub fn any_card(_candidate: &Candidate<'_>) -> bool {
    true
}

/// Find a fixture against the live page, retrying while the DOM populates.
///
/// Returns `Ok(None)` after exhausting the configured attempts; the board
/// state is summarized at warn level so a skipped scenario is explainable
/// from the log.
pub async fn find_fixture<F>(page: &BoardPage, predicate: F) -> TableroResult<Option<CardFixture>>
where
    F: Fn(&Candidate<'_>) -> bool,
{
    let config = page.config();
    let backoff = Backoff::new(
        Duration::from_millis(config.fixture_backoff_ms),
        config.fixture_attempts,
    );

    let mut attempt = 0u32;
    let mut last_board = BoardSnapshot::default();
    for delay in backoff {
        attempt += 1;
        if !delay.is_zero() {
            debug!(attempt, delay_ms = delay.as_millis() as u64, "board not ready, backing off");
            page.settle(delay).await;
        }

        let board = page.snapshot().await?;
        if let Some(fixture) = select_fixture(&board, &predicate) {
            info!(
                column = %fixture.column_name,
                card = %fixture.card_title,
                attempt,
                "fixture selected"
            );
            return Ok(Some(fixture));
        }
        last_board = board;
    }

    warn!(
        attempts = attempt,
        "no fixture matched; board state: {}",
        scan_summary(&last_board)
    );
    Ok(None)
}

/// One-line per-column description of the board, for skip diagnostics
#[must_use]
pub fn scan_summary(board: &BoardSnapshot) -> String {
    let mut out = String::new();
    for (i, column) in board.columns.iter().enumerate() {
        let with_subtasks = column
            .cards
            .iter()
            .filter(|c| c.subtasks().is_some())
            .count();
        let incomplete = column
            .cards
            .iter()
            .filter(|c| c.subtasks().is_some_and(|s| s.has_incomplete()))
            .count();
        if i > 0 {
            out.push_str("; ");
        }
        let _ = write!(
            out,
            "{} ({} cards, {} with subtasks, {} incomplete)",
            column.name(),
            column.cards.len(),
            with_subtasks,
            incomplete
        );
    }
    if out.is_empty() {
        out.push_str("no columns rendered");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CardSnapshot;

    fn card(title: &str, subtask_text: &str, visible: bool) -> CardSnapshot {
        CardSnapshot {
            title: title.to_string(),
            subtask_text: subtask_text.to_string(),
            visible,
        }
    }

    fn column(heading: &str, cards: Vec<CardSnapshot>) -> ColumnSnapshot {
        ColumnSnapshot {
            heading: heading.to_string(),
            cards,
        }
    }

    fn sample_board() -> BoardSnapshot {
        BoardSnapshot {
            columns: vec![
                column(
                    "Todo (2)",
                    vec![
                        card("In first column", "0 of 3 substasks", true),
                        card("Also first", "", true),
                    ],
                ),
                column(
                    "Doing (3)",
                    vec![
                        card("All done", "3 of 3 substasks", true),
                        card("Hidden", "0 of 2 substasks", false),
                        card("Design review", "1 of 3 substasks", true),
                    ],
                ),
                column(
                    "Done (1)",
                    vec![card("Another incomplete", "0 of 1 substasks", true)],
                ),
            ],
        }
    }

    #[test]
    fn selects_first_match_in_document_order() {
        let board = sample_board();
        let fixture = select_fixture(&board, incomplete_outside_first_column).unwrap();
        assert_eq!(fixture.card_title, "Design review");
        assert_eq!(fixture.column_name, "Doing");
        assert_eq!(fixture.column_index, 1);
        assert_eq!(fixture.card_index, 2);
        let summary = fixture.subtasks.unwrap();
        assert_eq!((summary.completed, summary.total), (1, 3));
    }

    #[test]
    fn skips_first_column_even_with_incomplete_cards() {
        let board = BoardSnapshot {
            columns: vec![column(
                "Todo",
                vec![card("Only card", "0 of 2 substasks", true)],
            )],
        };
        assert!(select_fixture(&board, incomplete_outside_first_column).is_none());
    }

    #[test]
    fn skips_invisible_cards_before_predicate() {
        let board = BoardSnapshot {
            columns: vec![
                column("Todo", vec![]),
                column("Doing", vec![card("Hidden", "0 of 2 substasks", false)]),
            ],
        };
        assert!(select_fixture(&board, incomplete_outside_first_column).is_none());
        // any_card also skips it
        assert!(select_fixture(&board, any_card).is_none());
    }

    #[test]
    fn rejects_duplicate_of_first_column_by_name() {
        // Same lane rendered twice while loading: index says non-first,
        // name says first.
        let board = BoardSnapshot {
            columns: vec![
                column("Todo (1)", vec![card("A", "", true)]),
                column("TODO", vec![card("B", "1 of 2 substasks", true)]),
                column("Doing", vec![card("C", "1 of 2 substasks", true)]),
            ],
        };
        let fixture = select_fixture(&board, incomplete_outside_first_column).unwrap();
        assert_eq!(fixture.card_title, "C");
    }

    #[test]
    fn completed_cards_do_not_match() {
        let board = BoardSnapshot {
            columns: vec![
                column("Todo", vec![]),
                column("Doing", vec![card("All done", "2 of 2 substasks", true)]),
            ],
        };
        assert!(select_fixture(&board, incomplete_outside_first_column).is_none());
    }

    #[test]
    fn any_card_takes_first_column_with_cards() {
        let board = BoardSnapshot {
            columns: vec![
                column("Empty", vec![]),
                column("Doing (2)", vec![card("First", "", true), card("Second", "", true)]),
            ],
        };
        let fixture = select_fixture(&board, any_card).unwrap();
        assert_eq!(fixture.column_name, "Doing");
        assert_eq!(fixture.card_title, "First");
        assert_eq!(fixture.card_index, 0);
    }

    #[test]
    fn scan_summary_describes_each_column() {
        let summary = scan_summary(&sample_board());
        assert!(summary.contains("Todo (2 cards, 1 with subtasks, 1 incomplete)"));
        assert!(summary.contains("Doing (3 cards, 3 with subtasks, 2 incomplete)"));
        assert!(summary.contains("Done (1 cards, 1 with subtasks, 1 incomplete)"));
    }

    #[test]
    fn scan_summary_handles_empty_board() {
        assert_eq!(
            scan_summary(&BoardSnapshot::default()),
            "no columns rendered"
        );
    }
}
