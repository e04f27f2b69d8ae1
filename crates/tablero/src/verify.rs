//! Outcome verification over re-acquired board state.
//!
//! Every function here takes a fresh [`BoardSnapshot`] captured after the
//! mutation and the modal close. Entities are re-acquired by stable key
//! (column name, card title) because the rendered tree is regenerated on
//! mutation; a handle captured before an awaited boundary must never reach
//! these checks. Failures carry expected vs. actual values.

use crate::board::{BoardSnapshot, ColumnSnapshot, SubtaskState, SubtaskSummary};
use crate::result::{TableroError, TableroResult};

fn mismatch(check: &str, expected: impl ToString, actual: impl ToString) -> TableroError {
    TableroError::PostconditionMismatch {
        check: check.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

fn require_column<'a>(
    board: &'a BoardSnapshot,
    name: &str,
    check: &str,
) -> TableroResult<&'a ColumnSnapshot> {
    board
        .column_by_name(name)
        .ok_or_else(|| mismatch(check, format!("column '{name}' present"), "column absent"))
}

/// The titled card sits in the destination column and nowhere in the
/// source column. Membership across columns is mutually exclusive.
pub fn assert_card_moved(
    board: &BoardSnapshot,
    title: &str,
    source_column: &str,
    dest_column: &str,
) -> TableroResult<()> {
    let dest = require_column(board, dest_column, "card membership (destination)")?;
    if dest.card(title).is_none() {
        return Err(mismatch(
            "card membership (destination)",
            format!("'{title}' in '{dest_column}'"),
            format!("titles: {:?}", dest.card_titles()),
        ));
    }

    let source = require_column(board, source_column, "card membership (source)")?;
    if source.card(title).is_some() {
        return Err(mismatch(
            "card membership (source)",
            format!("'{title}' absent from '{source_column}'"),
            format!("'{title}' still present"),
        ));
    }
    Ok(())
}

/// Exactly one more subtask reads complete on the card; the total is
/// unchanged.
pub fn assert_subtask_progress(
    board: &BoardSnapshot,
    title: &str,
    column_name: &str,
    before: SubtaskSummary,
) -> TableroResult<()> {
    let column = require_column(board, column_name, "subtask delta")?;
    let card = column.card(title).ok_or_else(|| {
        mismatch(
            "subtask delta",
            format!("'{title}' in '{column_name}'"),
            "card absent",
        )
    })?;
    let after = card.subtasks().ok_or_else(|| {
        mismatch(
            "subtask delta",
            "a subtask summary",
            format!("unparseable text {:?}", card.subtask_text),
        )
    })?;

    let expected = SubtaskSummary {
        completed: before.completed + 1,
        total: before.total,
    };
    if after != expected {
        return Err(mismatch("subtask delta", expected, after));
    }
    Ok(())
}

/// The mutated subtask renders complete: strikethrough via class name or
/// computed style, either signal suffices.
pub fn assert_struck_through(subtask: &SubtaskState) -> TableroResult<()> {
    if subtask.is_struck_through() {
        return Ok(());
    }
    Err(mismatch(
        "subtask strikethrough",
        "line-through in class or computed style",
        format!(
            "classes {:?}, text-decoration {:?}",
            subtask.label_classes, subtask.text_decoration
        ),
    ))
}

/// The titled card is gone board-wide and its column shrank by exactly
/// one; when the header advertises a count it agrees with the card list.
pub fn assert_card_deleted(
    board: &BoardSnapshot,
    title: &str,
    column_name: &str,
    previous_count: usize,
) -> TableroResult<()> {
    if board.all_titles().contains(&title) {
        let holder = board.column_of(title).map_or("?", |c| c.name());
        return Err(mismatch(
            "deletion (board-wide)",
            format!("'{title}' absent from the board"),
            format!("'{title}' still in '{holder}'"),
        ));
    }

    let column = require_column(board, column_name, "deletion (column count)")?;
    let expected = previous_count.saturating_sub(1);
    if column.cards.len() != expected {
        return Err(mismatch(
            "deletion (column count)",
            format!("{expected} cards in '{column_name}'"),
            format!("{} cards", column.cards.len()),
        ));
    }

    if let Some(header) = column.header_count() {
        if header as usize != column.cards.len() {
            return Err(mismatch(
                "deletion (header count)",
                format!("header count {}", column.cards.len()),
                format!("header count {header}"),
            ));
        }
    }
    Ok(())
}

/// The number of columns did not change across the mutation
pub fn assert_column_count(board: &BoardSnapshot, expected: usize) -> TableroResult<()> {
    if board.column_count() != expected {
        return Err(mismatch(
            "column count",
            expected,
            board.column_count(),
        ));
    }
    Ok(())
}

/// Re-acquisition consistency: every header that advertises a count
/// matches the number of visible cards rendered under it.
pub fn assert_header_counts(board: &BoardSnapshot) -> TableroResult<()> {
    for column in &board.columns {
        if let Some(header) = column.header_count() {
            let visible = column.cards.iter().filter(|c| c.visible).count();
            if header as usize != visible {
                return Err(mismatch(
                    "header count consistency",
                    format!("'{}' header {} == {} visible cards", column.name(), header, visible),
                    format!("header {header}, visible {visible}"),
                ));
            }
        }
    }
    Ok(())
}
