//! Determinized Monte Carlo search.
//!
//! ## Overview
//!
//! Hidden hands are handled by sampling: each search draws worlds consistent
//! with what the searching seat can see (see [`crate::sim::determinize`]) and
//! plays them out.
//!
//! - **Card search**: flat Monte Carlo over the legal plays, with UCB1
//!   allocating playouts per world and statistics merged across worlds
//! - **Bid search**: each candidate declaration is simulated in the same
//!   sampled worlds and the best clears a win-rate threshold or the seat passes
//! - **Parallel**: worlds run in rayon batches; time limit and cancellation
//!   are checked between batches
//! - **Configurable Policies**: selection (UCB1, uniform) and rollout
//!   (random, heuristic-biased)
//!
//! ## Usage
//!
//! ```rust
//! use napoleon::core::PlayerId;
//! use napoleon::mcts::{CardSearch, SearchConfig};
//! use napoleon::rules::initialize_game;
//!
//! let state = initialize_game(["A", "B", "C", "D"], 7);
//! let mut search = CardSearch::new(SearchConfig::fast());
//!
//! // No card decision during bidding.
//! assert_eq!(search.search(&state, PlayerId::new(0)), None);
//! ```

pub mod bid_search;
pub mod config;
pub mod policy;
pub mod search;
pub mod stats;

pub use bid_search::{BidCandidate, BidDecision, BidSearch};
pub use config::SearchConfig;
pub use policy::{HeuristicRollout, RandomRollout, RolloutPolicy, SelectionPolicy, Uniform, UCB1};
pub use search::CardSearch;
pub use stats::{ArmStats, SearchStats};
