//! Integration tests for the search agents.
//!
//! The central check is differential: alpha-beta must find exactly the same
//! best score and the same set of best moves as the unpruned depth-limited
//! search, on many small random positions.

use std::cell::Cell;
use std::collections::HashSet;
use std::sync::Arc;

use dlgo_search::agent::{Agent, RandomBot};
use dlgo_search::alpha_beta::AlphaBetaAgent;
use dlgo_search::board::Move;
use dlgo_search::constants::{MAX_SCORE, MIN_SCORE};
use dlgo_search::coords::parse_move;
use dlgo_search::depth_prune::DepthPrunedAgent;
use dlgo_search::eval::capture_diff;
use dlgo_search::game::GameState;
use dlgo_search::minimax::{GameOutcome, MinimaxAgent, best_result};

// =============================================================================
// Helper functions
// =============================================================================

/// Play a random game prefix of up to `max_moves` moves, stopping before the
/// game would end.
fn random_position(rng: &mut fastrand::Rng, size: usize, max_moves: usize) -> Arc<GameState> {
    let mut game = GameState::new_game(size);
    for _ in 0..rng.usize(..=max_moves) {
        let moves = game.legal_moves();
        let mv = moves[rng.usize(..moves.len())];
        let next = game.apply_move(mv);
        if next.is_over() {
            break;
        }
        game = next;
    }
    game
}

fn setup_game(size: usize, moves: &[&str]) -> Arc<GameState> {
    let mut game = GameState::new_game(size);
    for s in moves {
        let mv = parse_move(s).unwrap();
        assert!(game.is_valid_move(mv), "illegal move {s} in setup");
        game = game.apply_move(mv);
    }
    game
}

fn seeded(seed: u64) -> fastrand::Rng {
    fastrand::Rng::with_seed(seed)
}

// =============================================================================
// Alpha-beta vs depth-pruned
// =============================================================================

#[test]
fn test_alpha_beta_matches_depth_pruned_on_random_positions() {
    let mut rng = seeded(0xA1FA);
    for case in 0..40 {
        let game = random_position(&mut rng, 3, 8);
        for depth in 0..=2 {
            let plain = DepthPrunedAgent::with_rng(depth, capture_diff, seeded(1)).rank_moves(&game);
            let pruned = AlphaBetaAgent::with_rng(depth, capture_diff, seeded(1)).rank_moves(&game);
            assert_eq!(
                plain, pruned,
                "case {case}, depth {depth}, position:\n{}",
                game.board()
            );
        }
    }
}

#[test]
fn test_alpha_beta_matches_depth_pruned_on_larger_board() {
    let mut rng = seeded(44);
    for case in 0..8 {
        let game = random_position(&mut rng, 4, 12);
        let plain = DepthPrunedAgent::with_rng(1, capture_diff, seeded(2)).rank_moves(&game);
        let pruned = AlphaBetaAgent::with_rng(1, capture_diff, seeded(2)).rank_moves(&game);
        assert_eq!(plain, pruned, "case {case}:\n{}", game.board());
    }
}

#[test]
fn test_alpha_beta_matches_with_terminal_states_in_reach() {
    // After a pass, every branch can end the game, so sentinels mix with
    // heuristic scores
    let mut rng = seeded(7);
    for _ in 0..10 {
        let game = random_position(&mut rng, 3, 6);
        let game = game.apply_move(Move::Pass);
        if game.is_over() {
            continue;
        }
        for depth in 0..=2 {
            let plain = DepthPrunedAgent::with_rng(depth, capture_diff, seeded(3)).rank_moves(&game);
            let pruned = AlphaBetaAgent::with_rng(depth, capture_diff, seeded(3)).rank_moves(&game);
            assert_eq!(plain, pruned);
        }
    }
}

#[test]
fn test_alpha_beta_evaluates_fewer_positions() {
    let game = GameState::new_game(3);

    let plain_calls = Cell::new(0usize);
    let counting = |state: &GameState| {
        plain_calls.set(plain_calls.get() + 1);
        capture_diff(state)
    };
    let plain = DepthPrunedAgent::with_rng(1, counting, seeded(4)).rank_moves(&game);

    let pruned_calls = Cell::new(0usize);
    let counting = |state: &GameState| {
        pruned_calls.set(pruned_calls.get() + 1);
        capture_diff(state)
    };
    let pruned = AlphaBetaAgent::with_rng(1, counting, seeded(4)).rank_moves(&game);

    assert_eq!(plain, pruned);
    assert!(
        pruned_calls.get() < plain_calls.get(),
        "alpha-beta evaluated {} positions, plain search {}",
        pruned_calls.get(),
        plain_calls.get()
    );
}

// =============================================================================
// Tie-breaking and agent contract
// =============================================================================

#[test]
fn test_ties_are_broken_randomly() {
    let game = GameState::new_game(3);
    let ranking = AlphaBetaAgent::with_rng(1, capture_diff, seeded(0)).rank_moves(&game);
    assert_eq!(ranking.best_moves.len(), 9);

    let mut chosen = HashSet::new();
    let mut agent = AlphaBetaAgent::with_rng(1, capture_diff, seeded(99));
    for _ in 0..60 {
        let mv = agent.select_move(&game);
        assert!(ranking.best_moves.contains(&mv));
        chosen.insert(mv);
    }
    assert!(chosen.len() > 1, "always picked {chosen:?}");
}

#[test]
fn test_search_never_mutates_caller_state() {
    let game = setup_game(3, &["B2", "A1", "pass"]);
    let before = game.board().clone();
    let mut agents: Vec<Box<dyn Agent>> = vec![
        Box::new(DepthPrunedAgent::with_rng(2, capture_diff, seeded(5))),
        Box::new(AlphaBetaAgent::with_rng(2, capture_diff, seeded(5))),
        Box::new(RandomBot::with_rng(seeded(5))),
    ];
    for agent in &mut agents {
        let mv = agent.select_move(&game);
        assert!(game.is_valid_move(mv));
        assert_eq!(game.board(), &before);
        assert_eq!(game.last_move(), Some(Move::Pass));
    }
}

#[test]
fn test_search_agents_never_resign() {
    let mut rng = seeded(12);
    for _ in 0..10 {
        let game = random_position(&mut rng, 3, 10);
        let ranking = DepthPrunedAgent::with_rng(1, capture_diff, seeded(6)).rank_moves(&game);
        assert!(!ranking.best_moves.contains(&Move::Resign));
        assert!(ranking.best_score >= MIN_SCORE && ranking.best_score <= MAX_SCORE);
    }
}

#[test]
fn test_capture_is_preferred() {
    // White C3 in atari at D3; capturing wins a stone
    let game = setup_game(5, &["C2", "C3", "C4", "pass", "B3", "pass"]);
    let mut agent = AlphaBetaAgent::with_rng(0, capture_diff, seeded(8));
    let ranking = agent.rank_moves(&game);
    assert_eq!(ranking.best_moves, vec![parse_move("D3").unwrap()]);
    assert_eq!(agent.select_move(&game), parse_move("D3").unwrap());
}

#[test]
fn test_self_play_makes_only_legal_moves() {
    let mut black = AlphaBetaAgent::with_rng(1, capture_diff, seeded(20));
    let mut white = RandomBot::with_rng(seeded(21));
    let mut game = GameState::new_game(3);
    for ply in 0..60 {
        if game.is_over() {
            break;
        }
        let mv = if ply % 2 == 0 {
            black.select_move(&game)
        } else {
            white.select_move(&game)
        };
        assert!(game.is_valid_move(mv), "ply {ply}: {mv:?}");
        game = game.apply_move(mv);
    }
}

// =============================================================================
// Plain minimax
// =============================================================================

#[test]
fn test_minimax_one_point_board() {
    let game = GameState::new_game_with_komi(1, 0.0);
    assert_eq!(best_result(&game), GameOutcome::Draw);
    let mut agent = MinimaxAgent::with_rng(seeded(1));
    assert_eq!(agent.select_move(&game), Move::Pass);
}

#[test]
fn test_minimax_sees_komi_loss() {
    let game = GameState::new_game(1);
    assert_eq!(best_result(&game), GameOutcome::Loss);
    let after_pass = game.apply_move(Move::Pass);
    assert_eq!(best_result(&after_pass), GameOutcome::Win);
}

#[test]
fn test_minimax_prefers_the_winning_play() {
    // Black A1 A2 against White B2. Capturing at B1 wins, because White's
    // recapture at B2 would repeat an earlier position. Passing lets White
    // end the game ahead on komi.
    let moves = [
        "pass", "B2", "A2", "pass", "A1", "B1", "A1", "A2", "A1", "pass", "A2", "B2",
    ];
    let mut game = GameState::new_game_with_komi(2, 3.5);
    for s in moves {
        let mv = parse_move(s).unwrap();
        assert!(game.is_valid_move(mv), "illegal move {s} in setup");
        game = game.apply_move(mv);
    }
    let capture = parse_move("B1").unwrap();
    assert_eq!(game.legal_moves(), vec![capture, Move::Pass]);

    assert_eq!(best_result(&game.apply_move(capture)).reverse(), GameOutcome::Win);
    assert_eq!(best_result(&game.apply_move(Move::Pass)).reverse(), GameOutcome::Loss);
    assert_eq!(best_result(&game), GameOutcome::Win);

    let mut agent = MinimaxAgent::with_rng(seeded(3));
    for _ in 0..5 {
        assert_eq!(agent.select_move(&game), capture);
    }
}
