//! Tablero: browser E2E harness for a live Kanban board.
//!
//! Tablero (Spanish: "board") drives a deployed Kanban web application
//! end-to-end over the Chrome DevTools Protocol: it locates test fixtures
//! on the live board, performs guarded multi-step UI transactions (toggle
//! a subtask, move a card through the status dropdown, delete through the
//! options menu), and re-verifies outcomes against the asynchronously
//! re-rendered DOM.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   TABLERO Architecture                    │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌───────────┐   ┌──────────┐              │
//! │  │ Fixture  │──►│Interaction│──►│ Outcome  │              │
//! │  │ Selector │   │  Driver   │   │ Verifier │              │
//! │  └────┬─────┘   └─────┬─────┘   └────┬─────┘              │
//! │       └───────────────┼──────────────┘                    │
//! │                 ┌─────▼─────┐   ┌────────────┐            │
//! │                 │  Element  │──►│  Headless  │            │
//! │                 │  Locator  │   │  Browser   │            │
//! │                 └───────────┘   └────────────┘            │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The board, columns, cards, and subtasks are transient DOM projections:
//! reads come back as JSON snapshots and entities are re-acquired by
//! stable key (column name, card title) after every mutation, never held
//! as element handles across an awaited boundary.

#![warn(missing_docs)]

pub mod board;
pub mod browser;
pub mod config;
pub mod driver;
pub mod fixture;
pub mod locator;
pub mod page;
pub mod result;
pub mod scenario;
pub mod verify;
pub mod wait;

pub use board::{BoardSnapshot, CardSnapshot, ColumnSnapshot, ModalSnapshot, SubtaskState, SubtaskSummary};
pub use browser::Browser;
pub use config::HarnessConfig;
pub use driver::{ModalDriver, ModalState};
pub use fixture::{find_fixture, select_fixture, Candidate, CardFixture};
pub use page::{BoardPage, Point};
pub use result::{TableroError, TableroResult};
pub use scenario::{delete_card, edit_card, ScenarioOutcome};
pub use wait::{Backoff, WaitOptions};
