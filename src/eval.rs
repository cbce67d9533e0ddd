//! Position evaluation for the depth-limited search agents.
//!
//! Every score is from the point of view of the player to move in the state
//! being scored; a parent negates its child's score.

use crate::constants::{DRAW_SCORE, MAX_SCORE, MIN_SCORE};
use crate::game::GameState;
use crate::types::Player;

/// Signature shared by all evaluators.
pub type EvalFn = fn(&GameState) -> i64;

/// Stone count difference, positive when the player to move has more stones.
pub fn capture_diff(game_state: &GameState) -> i64 {
    let board = game_state.board();
    let mut black_stones = 0i64;
    let mut white_stones = 0i64;
    for point in board.points() {
        match board.get_player_at(point) {
            Some(Player::Black) => black_stones += 1,
            Some(Player::White) => white_stones += 1,
            None => {}
        }
    }
    let diff = black_stones - white_stones;
    match game_state.next_player() {
        Player::Black => diff,
        Player::White => -diff,
    }
}

/// Score of a finished game for the player to move.
pub fn terminal_score(game_state: &GameState) -> i64 {
    match game_state.winner() {
        Some(winner) if winner == game_state.next_player() => MAX_SCORE,
        Some(_) => MIN_SCORE,
        None => DRAW_SCORE,
    }
}
