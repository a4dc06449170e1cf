//! # napoleon
//!
//! Rules engine and computer players for Napoleon, a four-player
//! trick-taking game in which one declarer (the Napoleon) and a secretly
//! named adjutant try to capture a declared number of face cards.
//!
//! ## Design Principles
//!
//! 1. **Pure transitions**: every engine operation takes `&GameState` and
//!    returns a new state or a [`GameError`]. Nothing is mutated in place.
//!
//! 2. **Cheap clones**: hands and trick history are `im` structures, so
//!    search can copy whole states per playout.
//!
//! 3. **Externally driven AI**: the engine never calls the AI. A caller steps
//!    AI seats with [`process_ai_turn`] and may persist between steps.
//!
//! ## Modules
//!
//! - `core`: cards, seats, state, RNG and errors
//! - `rules`: named cards, trick resolution, bidding, phase transitions,
//!   scoring
//! - `sim`: in-place play, terminal detection, determinization
//! - `mcts`: determinized Monte Carlo card and bid search
//! - `ai`: card evaluator, phase heuristics, strategy selection, AI turns

pub mod ai;
pub mod core;
pub mod mcts;
pub mod rules;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, GameError, GameRng, GameRngState, GameState, NapoleonDeclaration, Phase,
    PlayedCard, Player, PlayerId, PlayerMap, Rank, SnapshotError, Suit, Trick,
};

pub use crate::rules::{
    calculate_game_result, close_trick_result, declare, exchange_cards, get_game_progress,
    initialize_ai_game, initialize_game, is_game_decided, pass, play_card, redeal, set_adjutant,
    validate_consistency, DecisionReason, GameDecision, GameProgress, GameResult,
};

pub use crate::ai::{is_ai_turn, process_ai_turn, AIConfig, Difficulty};

pub use crate::mcts::{BidSearch, CardSearch, SearchConfig, SearchStats};
