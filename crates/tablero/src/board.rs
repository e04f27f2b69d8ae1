//! Transient projections of the rendered board.
//!
//! The board, its columns, cards, and subtasks exist only in the live DOM;
//! these types are snapshots deserialized from a single JavaScript pass.
//! Nothing here holds an element handle: after any awaited mutation the
//! rendered tree may be regenerated, so entities are re-acquired by stable
//! key (column name, card title) from a fresh snapshot.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Subtask progress as rendered on a card.
///
/// The live application renders the summary as `"<completed> of <total>
/// substasks"`. The nonstandard spelling is an exact-match contract with
/// the deployed system, not a typo to fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskSummary {
    /// Completed subtask count
    pub completed: u32,
    /// Total subtask count
    pub total: u32,
}

fn summary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s+of\s+(\d+)\s+substasks").expect("summary pattern is valid")
    })
}

fn header_count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((\d+)\)").expect("header count pattern is valid"))
}

impl SubtaskSummary {
    /// Parse a card's subtask summary text.
    ///
    /// Returns `None` when the text does not carry the summary, including
    /// when it uses the standard "subtasks" spelling.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let caps = summary_regex().captures(text)?;
        let completed = caps.get(1)?.as_str().parse().ok()?;
        let total = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { completed, total })
    }

    /// Whether at least one subtask remains incomplete
    #[must_use]
    pub const fn has_incomplete(&self) -> bool {
        self.total > 0 && self.completed < self.total
    }
}

impl std::fmt::Display for SubtaskSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {} substasks", self.completed, self.total)
    }
}

/// One card as rendered in a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    /// Card title (unique enough for lookup)
    pub title: String,
    /// Raw subtask summary text ("1 of 3 substasks"), empty when absent
    #[serde(default)]
    pub subtask_text: String,
    /// Whether the card had a non-empty bounding box when snapshotted
    #[serde(default)]
    pub visible: bool,
}

impl CardSnapshot {
    /// Parsed subtask progress, when the card renders a summary
    #[must_use]
    pub fn subtasks(&self) -> Option<SubtaskSummary> {
        SubtaskSummary::parse(&self.subtask_text)
    }
}

/// One column as rendered on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    /// Full heading text, e.g. "Doing (4)"
    pub heading: String,
    /// Cards in document order
    #[serde(default)]
    pub cards: Vec<CardSnapshot>,
}

impl ColumnSnapshot {
    /// Column name with any parenthesized count stripped
    #[must_use]
    pub fn name(&self) -> &str {
        self.heading
            .split('(')
            .next()
            .unwrap_or(&self.heading)
            .trim()
    }

    /// The count the header advertises, when present
    #[must_use]
    pub fn header_count(&self) -> Option<u32> {
        let caps = header_count_regex().captures(&self.heading)?;
        caps.get(1)?.as_str().parse().ok()
    }

    /// Titles of all cards in this column
    #[must_use]
    pub fn card_titles(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.title.as_str()).collect()
    }

    /// Look up a card by title
    #[must_use]
    pub fn card(&self, title: &str) -> Option<&CardSnapshot> {
        self.cards.iter().find(|c| c.title == title)
    }
}

/// The full board: ordered columns, nothing persisted
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Columns in document order
    pub columns: Vec<ColumnSnapshot>,
}

impl BoardSnapshot {
    /// Number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Re-acquire a column by name (case-insensitive), the stable key that
    /// survives re-renders
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnSnapshot> {
        self.columns
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Every card title on the board, in document order
    #[must_use]
    pub fn all_titles(&self) -> Vec<&str> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter().map(|card| card.title.as_str()))
            .collect()
    }

    /// Which column (by name) currently holds the titled card
    #[must_use]
    pub fn column_of(&self, title: &str) -> Option<&ColumnSnapshot> {
        self.columns.iter().find(|c| c.card(title).is_some())
    }
}

/// One checkbox row inside the card modal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskState {
    /// Label text next to the checkbox
    pub label: String,
    /// Checked state
    pub checked: bool,
    /// Visible and not class-hidden
    pub visible: bool,
    /// Raw class attribute of the label's text span
    #[serde(default)]
    pub label_classes: String,
    /// Computed text-decoration-line of the label's text span
    #[serde(default)]
    pub text_decoration: String,
}

impl SubtaskState {
    /// Eligible for the one-toggle mutation: visible, labeled, unchecked
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.visible && !self.checked && !self.label.is_empty()
    }

    /// Strikethrough check through two independent signals; either passes.
    #[must_use]
    pub fn is_struck_through(&self) -> bool {
        self.label_classes.contains("line-through")
            || self.text_decoration.to_lowercase().contains("line-through")
    }
}

/// The card edit modal, scoped to its content container
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModalSnapshot {
    /// Checkbox rows in document order
    #[serde(default)]
    pub subtasks: Vec<SubtaskState>,
}

impl ModalSnapshot {
    /// Index of the first toggleable subtask
    #[must_use]
    pub fn first_eligible(&self) -> Option<usize> {
        self.subtasks.iter().position(|s| s.is_eligible())
    }

    /// Whether the precondition for the toggle mutation holds
    #[must_use]
    pub fn has_unchecked(&self) -> bool {
        self.first_eligible().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn card(title: &str, subtask_text: &str) -> CardSnapshot {
        CardSnapshot {
            title: title.to_string(),
            subtask_text: subtask_text.to_string(),
            visible: true,
        }
    }

    #[test]
    fn parses_subtask_summary() {
        let summary = SubtaskSummary::parse("2 of 3 substasks").unwrap();
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.total, 3);
        assert!(summary.has_incomplete());
    }

    #[test]
    fn summary_tolerates_surrounding_text_and_case() {
        assert!(SubtaskSummary::parse("  1 of 5 SUBSTASKS  ").is_some());
        assert!(SubtaskSummary::parse("Done: 0 of 0 substasks").is_some());
    }

    #[test]
    fn standard_spelling_is_rejected() {
        // The live system misspells "substasks"; matching the corrected
        // spelling would break the exact-match contract.
        assert!(SubtaskSummary::parse("2 of 3 subtasks").is_none());
    }

    #[test]
    fn complete_summary_has_no_incomplete() {
        let summary = SubtaskSummary::parse("3 of 3 substasks").unwrap();
        assert!(!summary.has_incomplete());
        let empty = SubtaskSummary::parse("0 of 0 substasks").unwrap();
        assert!(!empty.has_incomplete());
    }

    #[test]
    fn summary_display_round_trips() {
        let summary = SubtaskSummary {
            completed: 1,
            total: 4,
        };
        assert_eq!(SubtaskSummary::parse(&summary.to_string()), Some(summary));
    }

    #[test]
    fn column_name_strips_count_suffix() {
        let column = ColumnSnapshot {
            heading: "Doing (4)".to_string(),
            cards: vec![],
        };
        assert_eq!(column.name(), "Doing");
        assert_eq!(column.header_count(), Some(4));
    }

    #[test]
    fn column_without_count_has_no_header_count() {
        let column = ColumnSnapshot {
            heading: "Todo".to_string(),
            cards: vec![],
        };
        assert_eq!(column.name(), "Todo");
        assert_eq!(column.header_count(), None);
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let board = BoardSnapshot {
            columns: vec![ColumnSnapshot {
                heading: "Doing (2)".to_string(),
                cards: vec![card("A", "")],
            }],
        };
        assert!(board.column_by_name("doing").is_some());
        assert!(board.column_by_name("DOING").is_some());
        assert!(board.column_by_name("Done").is_none());
    }

    #[test]
    fn column_of_finds_holder() {
        let board = BoardSnapshot {
            columns: vec![
                ColumnSnapshot {
                    heading: "Todo".to_string(),
                    cards: vec![card("Design review", "1 of 3 substasks")],
                },
                ColumnSnapshot {
                    heading: "Doing".to_string(),
                    cards: vec![card("Fix bug", "")],
                },
            ],
        };
        assert_eq!(board.column_of("Fix bug").unwrap().name(), "Doing");
        assert!(board.column_of("Missing").is_none());
        assert_eq!(board.all_titles(), vec!["Design review", "Fix bug"]);
    }

    #[test]
    fn eligible_subtask_requires_visible_unchecked_labeled() {
        let eligible = SubtaskState {
            label: "Write tests".to_string(),
            checked: false,
            visible: true,
            label_classes: String::new(),
            text_decoration: String::new(),
        };
        assert!(eligible.is_eligible());

        let checked = SubtaskState {
            checked: true,
            ..eligible.clone()
        };
        assert!(!checked.is_eligible());

        let hidden = SubtaskState {
            visible: false,
            ..eligible.clone()
        };
        assert!(!hidden.is_eligible());

        let unlabeled = SubtaskState {
            label: String::new(),
            ..eligible
        };
        assert!(!unlabeled.is_eligible());
    }

    #[test]
    fn strikethrough_passes_on_either_signal() {
        let by_class = SubtaskState {
            label: "x".to_string(),
            checked: true,
            visible: true,
            label_classes: "text-sm line-through".to_string(),
            text_decoration: "none".to_string(),
        };
        assert!(by_class.is_struck_through());

        let by_style = SubtaskState {
            label_classes: "text-sm".to_string(),
            text_decoration: "Line-Through".to_string(),
            ..by_class.clone()
        };
        assert!(by_style.is_struck_through());

        let neither = SubtaskState {
            label_classes: "text-sm".to_string(),
            text_decoration: "none".to_string(),
            ..by_class
        };
        assert!(!neither.is_struck_through());
    }

    #[test]
    fn modal_first_eligible_is_document_order() {
        let modal = ModalSnapshot {
            subtasks: vec![
                SubtaskState {
                    label: "done".to_string(),
                    checked: true,
                    visible: true,
                    label_classes: String::new(),
                    text_decoration: String::new(),
                },
                SubtaskState {
                    label: "open".to_string(),
                    checked: false,
                    visible: true,
                    label_classes: String::new(),
                    text_decoration: String::new(),
                },
            ],
        };
        assert_eq!(modal.first_eligible(), Some(1));
        assert!(modal.has_unchecked());
    }

    #[test]
    fn snapshot_deserializes_from_dom_json() {
        let json = r#"{
            "columns": [
                {
                    "heading": "Doing (2)",
                    "cards": [
                        {"title": "Fix bug", "subtask_text": "0 of 2 substasks", "visible": true},
                        {"title": "Ship it", "subtask_text": "", "visible": false}
                    ]
                }
            ]
        }"#;
        let board: BoardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(board.column_count(), 1);
        let column = &board.columns[0];
        assert_eq!(column.header_count(), Some(2));
        assert_eq!(column.cards[0].subtasks().unwrap().total, 2);
        assert!(!column.cards[1].visible);
    }

    proptest! {
        #[test]
        fn summary_parse_never_panics(text in ".{0,64}") {
            let _ = SubtaskSummary::parse(&text);
        }

        #[test]
        fn summary_parses_generated_counts(completed in 0u32..1000, total in 0u32..1000) {
            let text = format!("{completed} of {total} substasks");
            let parsed = SubtaskSummary::parse(&text).unwrap();
            prop_assert_eq!(parsed.completed, completed);
            prop_assert_eq!(parsed.total, total);
        }

        #[test]
        fn header_count_never_panics(heading in ".{0,64}") {
            let column = ColumnSnapshot { heading, cards: vec![] };
            let _ = column.header_count();
            let _ = column.name();
        }
    }
}
