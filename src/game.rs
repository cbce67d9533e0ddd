//! Game state history, move legality, and game termination.
//!
//! A [`GameState`] is an immutable snapshot: the board, the player to move,
//! the move that produced it, and a shared pointer to the state before it.
//! Applying a move never mutates a state; it returns a new one chained to
//! the old. The chain is what the superko check walks.

use std::sync::Arc;

use crate::board::{Board, Move};
use crate::constants::DEFAULT_KOMI;
use crate::scoring::{GameResult, compute_game_result};
use crate::types::{Player, Point};

/// A snapshot of the game between two moves.
#[derive(Debug)]
pub struct GameState {
    board: Arc<Board>,
    next_player: Player,
    previous_state: Option<Arc<GameState>>,
    last_move: Option<Move>,
    komi: f32,
}

impl GameState {
    /// Start a new game on an empty `board_size` x `board_size` board.
    /// Black moves first.
    pub fn new_game(board_size: usize) -> Arc<GameState> {
        Self::new_game_with_komi(board_size, DEFAULT_KOMI)
    }

    /// Start a new game with the given komi.
    pub fn new_game_with_komi(board_size: usize, komi: f32) -> Arc<GameState> {
        Arc::new(GameState {
            board: Arc::new(Board::new(board_size, board_size)),
            next_player: Player::Black,
            previous_state: None,
            last_move: None,
            komi,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn next_player(&self) -> Player {
        self.next_player
    }

    pub fn previous_state(&self) -> Option<&Arc<GameState>> {
        self.previous_state.as_ref()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    /// The player to move together with the board, as compared by the
    /// superko rule.
    pub fn situation(&self) -> (Player, &Board) {
        (self.next_player, &self.board)
    }

    /// Apply `mv` for the player to move and return the resulting state.
    ///
    /// Only a `Play` copies the board; passes and resignations share it with
    /// the previous state.
    pub fn apply_move(self: &Arc<Self>, mv: Move) -> Arc<GameState> {
        let board = match mv {
            Move::Play(point) => {
                let mut next_board = Board::clone(&self.board);
                next_board.place_stone(self.next_player, point);
                Arc::new(next_board)
            }
            Move::Pass | Move::Resign => Arc::clone(&self.board),
        };
        Arc::new(GameState {
            board,
            next_player: self.next_player.other(),
            previous_state: Some(Arc::clone(self)),
            last_move: Some(mv),
            komi: self.komi,
        })
    }

    /// The same game, with every state in the history carrying `komi`.
    ///
    /// Boards are shared with the existing chain, so the superko history is
    /// unchanged.
    pub fn with_komi(&self, komi: f32) -> Arc<GameState> {
        let mut history: Vec<&GameState> = vec![self];
        let mut state = self;
        while let Some(previous) = state.previous_state.as_deref() {
            history.push(previous);
            state = previous;
        }

        let mut rebuilt: Option<Arc<GameState>> = None;
        for state in history.into_iter().rev() {
            rebuilt = Some(Arc::new(GameState {
                board: Arc::clone(&state.board),
                next_player: state.next_player,
                previous_state: rebuilt,
                last_move: state.last_move,
                komi,
            }));
        }
        rebuilt.expect("history always holds the current state")
    }

    /// Whether the game has ended: the last move was a resignation, or the
    /// last two moves were both passes.
    pub fn is_over(&self) -> bool {
        let (Some(last_move), Some(previous)) = (self.last_move, &self.previous_state) else {
            return false;
        };
        match last_move {
            Move::Resign => true,
            Move::Pass => previous.last_move.is_some_and(|m| m.is_pass()),
            Move::Play(_) => false,
        }
    }

    /// Board after `player` places a stone at `point` on a scratch copy.
    fn board_after(&self, player: Player, point: Point) -> Board {
        let mut next_board = Board::clone(&self.board);
        next_board.place_stone(player, point);
        next_board
    }

    /// Whether playing `mv` would leave the new stone's string without
    /// liberties. Non-play moves are never self-capture.
    pub fn is_move_self_capture(&self, player: Player, mv: Move) -> bool {
        let Move::Play(point) = mv else {
            return false;
        };
        is_self_capture(&self.board_after(player, point), point)
    }

    /// Whether playing `mv` would recreate an earlier (player to move, board)
    /// situation anywhere in the game's history (positional superko).
    pub fn does_move_violate_ko(&self, player: Player, mv: Move) -> bool {
        let Move::Play(point) = mv else {
            return false;
        };
        self.repeats_situation(player.other(), &self.board_after(player, point))
    }

    /// Walk the history from the previous state backwards looking for
    /// `(next_player, board)`. Hashes are compared before full boards.
    fn repeats_situation(&self, next_player: Player, board: &Board) -> bool {
        let hash = board.zobrist_hash();
        let mut past_state = self.previous_state.as_deref();
        while let Some(state) = past_state {
            if state.next_player == next_player
                && state.board.zobrist_hash() == hash
                && *state.board == *board
            {
                return true;
            }
            past_state = state.previous_state.as_deref();
        }
        false
    }

    /// Whether `mv` is legal for the player to move.
    pub fn is_valid_move(&self, mv: Move) -> bool {
        if self.is_over() {
            return false;
        }
        let Move::Play(point) = mv else {
            return true;
        };
        if !self.board.is_on_grid(point) || self.board.get_player_at(point).is_some() {
            return false;
        }
        let next_board = self.board_after(self.next_player, point);
        !is_self_capture(&next_board, point)
            && !self.repeats_situation(self.next_player.other(), &next_board)
    }

    /// Every legal `Play` in row-major order, followed by `Pass`.
    ///
    /// Empty once the game is over. Resignation is never offered.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        let mut moves: Vec<Move> = self
            .board
            .points()
            .map(Move::Play)
            .filter(|&mv| self.is_valid_move(mv))
            .collect();
        moves.push(Move::Pass);
        moves
    }

    /// Area-scoring result of the current board with this game's komi.
    pub fn game_result(&self) -> GameResult {
        compute_game_result(self)
    }

    /// The winner of a finished game, or `None` if the game is not over or
    /// ended in a draw. A resignation is won by the player who did not resign.
    pub fn winner(&self) -> Option<Player> {
        if !self.is_over() {
            return None;
        }
        if self.last_move == Some(Move::Resign) {
            return Some(self.next_player);
        }
        self.game_result().winner()
    }
}

/// Whether the string at `point` has been left without liberties.
fn is_self_capture(board: &Board, point: Point) -> bool {
    board
        .get_go_string(point)
        .is_some_and(|string| string.is_captured())
}

/// Unlink the history iteratively so that dropping a long game does not
/// recurse once per move.
impl Drop for GameState {
    fn drop(&mut self) {
        let mut previous = self.previous_state.take();
        while let Some(state) = previous {
            match Arc::try_unwrap(state) {
                Ok(mut state) => previous = state.previous_state.take(),
                Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(row: i32, col: i32) -> Move {
        Move::Play(Point::new(row, col))
    }

    #[test]
    fn test_new_game() {
        let game = GameState::new_game(9);
        assert_eq!(game.next_player(), Player::Black);
        assert!(game.previous_state().is_none());
        assert!(game.last_move().is_none());
        assert!(!game.is_over());
        assert_eq!(game.komi(), DEFAULT_KOMI);
    }

    #[test]
    fn test_apply_move_leaves_original_untouched() {
        let game = GameState::new_game(5);
        let next = game.apply_move(play(3, 3));
        assert_eq!(game.board().get_player_at(Point::new(3, 3)), None);
        assert_eq!(next.board().get_player_at(Point::new(3, 3)), Some(Player::Black));
        assert_eq!(next.next_player(), Player::White);
        assert_eq!(next.last_move(), Some(play(3, 3)));
        assert!(Arc::ptr_eq(next.previous_state().unwrap(), &game));
    }

    #[test]
    fn test_with_komi_keeps_history() {
        let game = GameState::new_game(3)
            .apply_move(play(2, 2))
            .apply_move(Move::Pass);
        let rekomied = game.with_komi(0.5);

        assert_eq!(rekomied.komi(), 0.5);
        assert_eq!(rekomied.last_move(), Some(Move::Pass));
        assert_eq!(rekomied.next_player(), Player::Black);
        assert!(Arc::ptr_eq(&rekomied.board, &game.board));

        let first = rekomied.previous_state().unwrap();
        assert_eq!(first.komi(), 0.5);
        assert_eq!(first.last_move(), Some(play(2, 2)));
        let root = first.previous_state().unwrap();
        assert_eq!(root.komi(), 0.5);
        assert!(root.previous_state().is_none());

        // The original chain is untouched
        assert_eq!(game.komi(), DEFAULT_KOMI);
    }

    #[test]
    fn test_pass_shares_board() {
        let game = GameState::new_game(5).apply_move(play(1, 1));
        let passed = game.apply_move(Move::Pass);
        assert!(Arc::ptr_eq(&game.board, &passed.board));
    }

    #[test]
    fn test_is_over() {
        let game = GameState::new_game(5);
        let one_pass = game.apply_move(Move::Pass);
        assert!(!one_pass.is_over());
        let two_passes = one_pass.apply_move(Move::Pass);
        assert!(two_passes.is_over());

        let pass_then_play = one_pass.apply_move(play(2, 2));
        assert!(!pass_then_play.is_over());

        let resigned = game.apply_move(Move::Resign);
        assert!(resigned.is_over());
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let game = GameState::new_game(3)
            .apply_move(Move::Pass)
            .apply_move(Move::Pass);
        assert!(!game.is_valid_move(Move::Pass));
        assert!(!game.is_valid_move(play(1, 1)));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_resign_winner_is_opponent() {
        let game = GameState::new_game(5).apply_move(Move::Resign);
        assert_eq!(game.winner(), Some(Player::White));
    }

    #[test]
    fn test_winner_none_while_playing() {
        let game = GameState::new_game(5).apply_move(play(3, 3));
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_legal_moves_on_empty_board() {
        let game = GameState::new_game(3);
        let moves = game.legal_moves();
        assert_eq!(moves.len(), 10);
        assert_eq!(moves[0], play(1, 1));
        assert_eq!(moves.last(), Some(&Move::Pass));
        assert!(!moves.contains(&Move::Resign));
    }

    #[test]
    fn test_off_grid_play_is_invalid() {
        let game = GameState::new_game(3);
        assert!(!game.is_valid_move(play(4, 1)));
        assert!(!game.is_valid_move(play(0, 0)));
    }

    #[test]
    fn test_long_history_drops() {
        let mut game = GameState::new_game(2);
        for _ in 0..100_000 {
            game = game.apply_move(Move::Resign);
        }
        drop(game);
    }
}
