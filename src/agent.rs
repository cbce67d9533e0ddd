//! The agent interface and the simple agents built on it.
//!
//! Every agent, search-based or not, answers [`Agent::select_move`] so a
//! driver can swap them freely.

use std::sync::Arc;

use tracing::debug;

use crate::board::{Board, Move};
use crate::game::GameState;
use crate::types::{Player, Point};

/// Anything that can choose a move.
pub trait Agent {
    /// Choose a move for the player to move in `game_state`.
    fn select_move(&mut self, game_state: &Arc<GameState>) -> Move;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn select_move(&mut self, game_state: &Arc<GameState>) -> Move {
        (**self).select_move(game_state)
    }
}

/// The best score found at the root of a search, with every move reaching it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRanking {
    pub best_score: i64,
    /// Moves tied at `best_score`, in move generation order
    pub best_moves: Vec<Move>,
}

impl MoveRanking {
    /// Fold one more root candidate into the ranking.
    ///
    /// Returns `true` if the candidate strictly improved the best score.
    pub fn offer(&mut self, mv: Move, score: i64) -> bool {
        if self.best_moves.is_empty() || score > self.best_score {
            self.best_moves.clear();
            self.best_moves.push(mv);
            self.best_score = score;
            true
        } else {
            if score == self.best_score {
                self.best_moves.push(mv);
            }
            false
        }
    }
}

impl Default for MoveRanking {
    fn default() -> Self {
        MoveRanking {
            best_score: crate::constants::MIN_SCORE,
            best_moves: Vec::new(),
        }
    }
}

/// Pick uniformly among `moves`.
///
/// # Panics
/// Panics if `moves` is empty.
pub fn choose_uniform(rng: &mut fastrand::Rng, moves: &[Move]) -> Move {
    assert!(!moves.is_empty(), "no candidate moves to choose from");
    moves[rng.usize(..moves.len())]
}

/// Fail fast when a search is started on a finished game.
pub(crate) fn assert_in_progress(game_state: &GameState) {
    assert!(
        !game_state.is_over(),
        "select_move called on a finished game"
    );
}

/// Whether `point` looks like an eye of `color`.
///
/// The point must be empty with every on-board orthogonal neighbor of
/// `color`. On the edge or in a corner all on-board diagonals must be
/// `color` too; in the middle three of four diagonals are enough.
pub fn is_point_an_eye(board: &Board, point: Point, color: Player) -> bool {
    if board.get_player_at(point).is_some() {
        return false;
    }
    for neighbor in point.neighbors() {
        if board.is_on_grid(neighbor) && board.get_player_at(neighbor) != Some(color) {
            return false;
        }
    }

    let mut friendly_corners = 0;
    let mut off_board_corners = 0;
    for corner in point.corners() {
        if !board.is_on_grid(corner) {
            off_board_corners += 1;
        } else if board.get_player_at(corner) == Some(color) {
            friendly_corners += 1;
        }
    }

    if off_board_corners > 0 {
        off_board_corners + friendly_corners == 4
    } else {
        friendly_corners >= 3
    }
}

/// Plays a random legal move that does not fill one of its own eyes,
/// passing when none is left.
pub struct RandomBot {
    rng: fastrand::Rng,
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomBot {
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    pub fn with_rng(rng: fastrand::Rng) -> Self {
        RandomBot { rng }
    }
}

impl Agent for RandomBot {
    fn select_move(&mut self, game_state: &Arc<GameState>) -> Move {
        assert_in_progress(game_state);
        let player = game_state.next_player();
        let board = game_state.board();
        let candidates: Vec<Move> = board
            .points()
            .filter(|&p| !is_point_an_eye(board, p, player))
            .map(Move::Play)
            .filter(|&mv| game_state.is_valid_move(mv))
            .collect();
        let mv = if candidates.is_empty() {
            Move::Pass
        } else {
            choose_uniform(&mut self.rng, &candidates)
        };
        debug!(%player, ?mv, candidates = candidates.len(), "random move");
        mv
    }
}
