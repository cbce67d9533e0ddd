//! Plain minimax over win/draw/loss outcomes.
//!
//! Searches all the way to the end of the game with no depth limit and no
//! pruning, so it is only usable on tiny boards.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::agent::{Agent, assert_in_progress, choose_uniform};
use crate::board::Move;
use crate::game::GameState;

/// Outcome of a game for one player. Ordered `Loss < Draw < Win`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum GameOutcome {
    Loss,
    Draw,
    Win,
}

impl GameOutcome {
    /// The same outcome seen by the other player.
    pub fn reverse(self) -> GameOutcome {
        match self {
            GameOutcome::Win => GameOutcome::Loss,
            GameOutcome::Loss => GameOutcome::Win,
            GameOutcome::Draw => GameOutcome::Draw,
        }
    }
}

/// Best achievable outcome for the player to move, assuming perfect play
/// from both sides.
pub fn best_result(game_state: &Arc<GameState>) -> GameOutcome {
    if game_state.is_over() {
        return match game_state.winner() {
            Some(winner) if winner == game_state.next_player() => GameOutcome::Win,
            Some(_) => GameOutcome::Loss,
            None => GameOutcome::Draw,
        };
    }

    let mut best_so_far = GameOutcome::Loss;
    for candidate in game_state.legal_moves() {
        let next_state = game_state.apply_move(candidate);
        let our_result = best_result(&next_state).reverse();
        if our_result > best_so_far {
            best_so_far = our_result;
        }
    }
    best_so_far
}

/// Moves of the root position split by their perfect-play outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutcomeBuckets {
    pub winning: Vec<Move>,
    pub drawing: Vec<Move>,
    pub losing: Vec<Move>,
}

impl OutcomeBuckets {
    /// The best non-empty bucket with its outcome.
    pub fn best(&self) -> Option<(GameOutcome, &[Move])> {
        [
            (GameOutcome::Win, &self.winning),
            (GameOutcome::Draw, &self.drawing),
            (GameOutcome::Loss, &self.losing),
        ]
        .into_iter()
        .find(|(_, moves)| !moves.is_empty())
        .map(|(outcome, moves)| (outcome, moves.as_slice()))
    }
}

/// Agent that solves the game exactly.
pub struct MinimaxAgent {
    rng: fastrand::Rng,
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl MinimaxAgent {
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    pub fn with_rng(rng: fastrand::Rng) -> Self {
        MinimaxAgent { rng }
    }

    /// Classify every legal move of `game_state` by its outcome.
    pub fn classify_moves(&self, game_state: &Arc<GameState>) -> OutcomeBuckets {
        assert_in_progress(game_state);
        let mut buckets = OutcomeBuckets::default();
        for possible_move in game_state.legal_moves() {
            let next_state = game_state.apply_move(possible_move);
            match best_result(&next_state).reverse() {
                GameOutcome::Win => buckets.winning.push(possible_move),
                GameOutcome::Draw => buckets.drawing.push(possible_move),
                GameOutcome::Loss => buckets.losing.push(possible_move),
            }
        }
        buckets
    }
}

impl Agent for MinimaxAgent {
    #[instrument(skip_all, fields(player = %game_state.next_player()))]
    fn select_move(&mut self, game_state: &Arc<GameState>) -> Move {
        let buckets = self.classify_moves(game_state);
        let (outcome, moves) = buckets
            .best()
            .expect("pass is always legal in a game in progress");
        let mv = choose_uniform(&mut self.rng, moves);
        debug!(?outcome, ties = moves.len(), ?mv, "minimax move");
        mv
    }
}
