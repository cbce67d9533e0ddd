//! Alpha-beta search.
//!
//! Same scores as [`depth_prune`](crate::depth_prune), but each color carries
//! the best score it is already guaranteed somewhere in the tree. A node stops
//! exploring as soon as its result would leave the opponent worse off than the
//! opponent's guarantee, since the opponent will never let play reach it.
//!
//! Cutoffs use strict comparisons. A move whose score ties the current best
//! at the root is therefore always scored exactly, and the set of best moves
//! is the same as the one found without pruning.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::agent::{Agent, MoveRanking, assert_in_progress, choose_uniform};
use crate::board::Move;
use crate::constants::MIN_SCORE;
use crate::eval::terminal_score;
use crate::game::GameState;
use crate::types::Player;

/// Best score each color is guaranteed so far along the current search path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub best_black: i64,
    pub best_white: i64,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            best_black: MIN_SCORE,
            best_white: MIN_SCORE,
        }
    }
}

impl Bounds {
    #[inline]
    pub fn get(&self, player: Player) -> i64 {
        match player {
            Player::Black => self.best_black,
            Player::White => self.best_white,
        }
    }

    /// Raise `player`'s guarantee to `score` if it is higher.
    #[inline]
    pub fn raise(&mut self, player: Player, score: i64) {
        let best = match player {
            Player::Black => &mut self.best_black,
            Player::White => &mut self.best_white,
        };
        if score > *best {
            *best = score;
        }
    }
}

/// Best score for the player to move within `max_depth` plies, given the
/// guarantees in `bounds`.
///
/// Exact whenever the true score lies between the mover's guarantee and the
/// negated opponent guarantee (inclusive); otherwise a bound on the same side
/// of the window as the true score.
pub fn alpha_beta_result<E>(
    game_state: &Arc<GameState>,
    max_depth: u32,
    mut bounds: Bounds,
    eval_fn: &E,
) -> i64
where
    E: Fn(&GameState) -> i64,
{
    if game_state.is_over() {
        return terminal_score(game_state);
    }
    if max_depth == 0 {
        return eval_fn(game_state);
    }

    let player = game_state.next_player();
    let mut best_so_far = MIN_SCORE;
    for candidate in game_state.legal_moves() {
        let next_state = game_state.apply_move(candidate);
        let opponent_best_result = alpha_beta_result(&next_state, max_depth - 1, bounds, eval_fn);
        let our_result = -opponent_best_result;

        if our_result > best_so_far {
            best_so_far = our_result;
        }
        bounds.raise(player, best_so_far);
        let outcome_for_opponent = -best_so_far;
        if outcome_for_opponent < bounds.get(player.other()) {
            return best_so_far;
        }
    }
    best_so_far
}

/// Agent running [`alpha_beta_result`] under every legal move.
pub struct AlphaBetaAgent<E> {
    max_depth: u32,
    eval_fn: E,
    rng: fastrand::Rng,
}

impl<E> AlphaBetaAgent<E>
where
    E: Fn(&GameState) -> i64,
{
    pub fn new(max_depth: u32, eval_fn: E) -> Self {
        Self::with_rng(max_depth, eval_fn, fastrand::Rng::new())
    }

    pub fn with_rng(max_depth: u32, eval_fn: E, rng: fastrand::Rng) -> Self {
        AlphaBetaAgent {
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
    /// Moves that cannot beat the current best may come back with an upper
    /// bound instead of their exact score; they never enter the ranking.
    ///
    /// # Panics
    /// Panics if the game is already over.
    pub fn rank_moves(&self, game_state: &Arc<GameState>) -> MoveRanking {
        assert_in_progress(game_state);
        let player = game_state.next_player();
        let mut bounds = Bounds::default();
        let mut ranking = MoveRanking::default();
        for possible_move in game_state.legal_moves() {
            let next_state = game_state.apply_move(possible_move);
            let opponent_best_outcome =
                alpha_beta_result(&next_state, self.max_depth, bounds, &self.eval_fn);
            let our_best_outcome = -opponent_best_outcome;
            trace!(?possible_move, score = our_best_outcome, "candidate");
            if ranking.offer(possible_move, our_best_outcome) {
                bounds.raise(player, our_best_outcome);
            }
        }
        ranking
    }
}

impl<E> Agent for AlphaBetaAgent<E>
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
            "alpha-beta move"
        );
        mv
    }
}
