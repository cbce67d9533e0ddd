//! dlgo-search: a Go rules engine paired with game-tree search agents.
//!
//! The engine tracks stone strings and their liberties, resolves captures,
//! rejects suicide and positional-superko violations, and detects the end of
//! the game. On top of it sit three search agents: plain minimax,
//! depth-limited minimax with a heuristic evaluator, and alpha-beta.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, komi, and score sentinels
//! - [`types`] - Players and points
//! - [`board`] - Moves, stone strings, and the capture rule
//! - [`game`] - Game history, legality, and termination
//! - [`scoring`] - Area scoring at the end of a game
//! - [`zobrist`] - Position hash codes
//! - [`eval`] - Position evaluators
//! - [`agent`] - The agent interface and a random agent
//! - [`minimax`], [`depth_prune`], [`alpha_beta`] - Search agents
//! - [`coords`] - Human-readable coordinates
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use dlgo_search::agent::Agent;
//! use dlgo_search::alpha_beta::AlphaBetaAgent;
//! use dlgo_search::board::Move;
//! use dlgo_search::coords::parse_point;
//! use dlgo_search::eval::capture_diff;
//! use dlgo_search::game::GameState;
//!
//! // Create a new game and play a move
//! let game = GameState::new_game(5);
//! let game = game.apply_move(Move::Play(parse_point("C3").unwrap()));
//!
//! // Search two plies deep for the reply
//! let mut bot = AlphaBetaAgent::new(1, capture_diff);
//! let reply = bot.select_move(&game);
//! assert!(game.is_valid_move(reply));
//! ```

pub mod agent;
pub mod alpha_beta;
pub mod board;
pub mod constants;
pub mod coords;
pub mod depth_prune;
pub mod eval;
pub mod game;
pub mod gtp;
pub mod minimax;
pub mod scoring;
pub mod types;
pub mod zobrist;
