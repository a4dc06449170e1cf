//! Napoleon rules.
//!
//! - `special`: named cards and trick-winner resolution
//! - `bidding`: declaration validity and bidding turn order
//! - `engine`: the phase state machine
//! - `outcome`: scoring, early decision and consistency checks
//!
//! The rules never call into the AI; AI seats are driven from outside via
//! [`crate::ai::process_ai_turn`].

pub mod bidding;
pub mod engine;
pub mod outcome;
pub mod special;

pub use bidding::{
    is_valid_declaration, legal_declarations, minimum_next_declaration, next_declarer,
    should_redeal, MinimumDeclaration, MAX_TARGET, MIN_TARGET,
};
pub use engine::{
    close_trick_result, declare, exchange_cards, initialize_ai_game, initialize_game, pass,
    play_card, redeal, set_adjutant, DISCARD_COUNT,
};
pub use outcome::{
    calculate_game_result, get_game_progress, is_game_decided, validate_consistency,
    DecisionReason, GameDecision, GameProgress, GameResult, FACE_CARDS_PER_TRICK_CEILING,
};
pub use special::{card_strength, resolve_trick_winner, HEART_QUEEN, MIGHTY};
