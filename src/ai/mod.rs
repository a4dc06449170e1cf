//! Computer players.
//!
//! - `evaluator`: rule-based card scoring
//! - `heuristics`: bidding estimate, adjutant choice, discards
//! - `strategy`: heuristic or search, per decision
//! - `turn`: [`process_ai_turn`], one AI action per call
//!
//! Every entry point takes an explicit [`AIConfig`].

pub mod config;
pub mod evaluator;
pub mod heuristics;
pub mod strategy;
pub mod turn;

pub use config::{AIConfig, Difficulty};
pub use evaluator::{score_card, select_best_card, Role};
pub use heuristics::{
    candidate_declarations, choose_adjutant_card, choose_discards, expected_face_cards,
    heuristic_bid,
};
pub use strategy::{choose_strategy, select_bid, select_card, Strategy};
pub use turn::{is_ai_turn, process_ai_turn};
