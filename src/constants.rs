//! Constants for board dimensions, scoring, and search parameters.
//!
//! Board size is chosen at runtime (see [`GameState::new_game`]), so this
//! module only fixes the limits and defaults the rest of the engine relies on.
//!
//! [`GameState::new_game`]: crate::game::GameState::new_game

// =============================================================================
// Board Geometry
// =============================================================================

/// Largest supported board dimension (rows or columns).
///
/// Bounded by the column lettering scheme and by the size of the Zobrist table.
pub const MAX_BOARD_SIZE: usize = 19;

/// Default board size for the command-line drivers.
///
/// Brute-force search is only practical on very small boards.
pub const DEFAULT_BOARD_SIZE: usize = 5;

/// Column letters used for human-readable coordinates. `I` is skipped.
pub const COLS: &str = "ABCDEFGHJKLMNOPQRST";

// =============================================================================
// Scoring
// =============================================================================

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f32 = 7.5;

// =============================================================================
// Search Parameters
// =============================================================================

/// Score of a terminal state won by the player to move.
pub const MAX_SCORE: i64 = 999_999;

/// Score of a terminal state lost by the player to move.
pub const MIN_SCORE: i64 = -999_999;

/// Score of a terminal state that ended in a draw.
pub const DRAW_SCORE: i64 = 0;

/// Default search depth for the depth-limited agents.
pub const DEFAULT_DEPTH: u32 = 2;
