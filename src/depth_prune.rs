//! Depth-limited minimax with a heuristic evaluator.
//!
//! The tree is explored exhaustively down to `max_depth` plies below the root
//! candidates; positions at the depth limit are scored with the evaluator and
//! finished games with the win/loss sentinels.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::agent::{Agent, MoveRanking, assert_in_progress, choose_uniform};
use crate::board::Move;
use crate::constants::MIN_SCORE;
use crate::eval::terminal_score;
use crate::game::GameState;

/// Best score the player to move can reach within `max_depth` plies.
pub fn best_result<E>(game_state: &Arc<GameState>, max_depth: u32, eval_fn: &E) -> i64
where
    E: Fn(&GameState) -> i64,
{
    if game_state.is_over() {
        return terminal_score(game_state);
    }
    if max_depth == 0 {
        return eval_fn(game_state);
    }

    let mut best_so_far = MIN_SCORE;
    for candidate in game_state.legal_moves() {
        let next_state = game_state.apply_move(candidate);
        let opponent_best_result = best_result(&next_state, max_depth - 1, eval_fn);
        best_so_far = best_so_far.max(-opponent_best_result);
    }
    best_so_far
}

/// Agent running [`best_result`] under every legal move.
pub struct DepthPrunedAgent<E> {
    max_depth: u32,
    eval_fn: E,
    rng: fastrand::Rng,
}

impl<E> DepthPrunedAgent<E>
where
    E: Fn(&GameState) -> i64,
{
    pub fn new(max_depth: u32, eval_fn: E) -> Self {
        Self::with_rng(max_depth, eval_fn, fastrand::Rng::new())
    }

    pub fn with_rng(max_depth: u32, eval_fn: E, rng: fastrand::Rng) -> Self {
        DepthPrunedAgent {
            max_depth,
            eval_fn,
            rng,
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Score every legal move and keep the best ones.
    ///
    /// # Panics
    /// Panics if the game is already over.
    pub fn rank_moves(&self, game_state: &Arc<GameState>) -> MoveRanking {
        assert_in_progress(game_state);
        let mut ranking = MoveRanking::default();
        for possible_move in game_state.legal_moves() {
            let next_state = game_state.apply_move(possible_move);
            let our_best_outcome = -best_result(&next_state, self.max_depth, &self.eval_fn);
            trace!(?possible_move, score = our_best_outcome, "candidate");
            ranking.offer(possible_move, our_best_outcome);
        }
        ranking
    }
}

impl<E> Agent for DepthPrunedAgent<E>
where
    E: Fn(&GameState) -> i64,
{
    #[instrument(skip_all, fields(player = %game_state.next_player(), depth = self.max_depth))]
    fn select_move(&mut self, game_state: &Arc<GameState>) -> Move {
        let ranking = self.rank_moves(game_state);
        let mv = choose_uniform(&mut self.rng, &ranking.best_moves);
        debug!(
            score = ranking.best_score,
            ties = ranking.best_moves.len(),
            ?mv,
            "depth-pruned move"
        );
        mv
    }
}
