//! Area scoring at the end of a game.
//!
//! Stones count for their owner. An empty region counts as territory when
//! every stone bordering it has the same color; otherwise it is dame. No
//! attempt is made to find dead stones.

use std::collections::HashMap;
use std::fmt;

use crate::board::Board;
use crate::game::GameState;
use crate::types::{Player, Point};

/// What a point counts as at the end of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointStatus {
    Stone(Player),
    Territory(Player),
    Dame,
}

/// Point counts for both players.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Territory {
    pub num_black_territory: usize,
    pub num_white_territory: usize,
    pub num_black_stones: usize,
    pub num_white_stones: usize,
    pub num_dame: usize,
    pub dame_points: Vec<Point>,
}

impl Territory {
    fn from_status(status: &HashMap<Point, PointStatus>) -> Self {
        let mut t = Territory::default();
        for (&point, &s) in status {
            match s {
                PointStatus::Stone(Player::Black) => t.num_black_stones += 1,
                PointStatus::Stone(Player::White) => t.num_white_stones += 1,
                PointStatus::Territory(Player::Black) => t.num_black_territory += 1,
                PointStatus::Territory(Player::White) => t.num_white_territory += 1,
                PointStatus::Dame => {
                    t.num_dame += 1;
                    t.dame_points.push(point);
                }
            }
        }
        t.dame_points.sort_by_key(|p| (p.row, p.col));
        t
    }
}

/// Final score: area for Black, area for White, and komi.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GameResult {
    pub b: usize,
    pub w: usize,
    pub komi: f32,
}

impl GameResult {
    /// Black wins with strictly more than White plus komi, White with strictly
    /// more than Black. An exact tie is a draw (`None`).
    pub fn winner(&self) -> Option<Player> {
        let black = self.b as f32;
        let white = self.w as f32 + self.komi;
        if black > white {
            Some(Player::Black)
        } else if black < white {
            Some(Player::White)
        } else {
            None
        }
    }

    pub fn winning_margin(&self) -> f32 {
        (self.b as f32 - (self.w as f32 + self.komi)).abs()
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner() {
            Some(Player::Black) => write!(f, "B+{:.1}", self.winning_margin()),
            Some(Player::White) => write!(f, "W+{:.1}", self.winning_margin()),
            None => write!(f, "Draw"),
        }
    }
}

/// Classify every point of the board as stone, territory, or dame.
pub fn evaluate_territory(board: &Board) -> Territory {
    let mut status: HashMap<Point, PointStatus> = HashMap::new();
    for point in board.points() {
        if status.contains_key(&point) {
            continue;
        }
        match board.get_player_at(point) {
            Some(player) => {
                status.insert(point, PointStatus::Stone(player));
            }
            None => {
                let (region, borders) = collect_region(board, point);
                let fill = match borders[..] {
                    [only] => PointStatus::Territory(only),
                    _ => PointStatus::Dame,
                };
                for p in region {
                    status.insert(p, fill);
                }
            }
        }
    }
    Territory::from_status(&status)
}

/// Flood-fill the empty region containing `start`.
///
/// Returns the points of the region and the distinct colors bordering it.
fn collect_region(board: &Board, start: Point) -> (Vec<Point>, Vec<Player>) {
    let mut region = Vec::new();
    let mut borders = Vec::with_capacity(2);
    let mut visited = vec![false; board.num_rows() * board.num_cols()];
    let idx = |p: Point| (p.row as usize - 1) * board.num_cols() + (p.col as usize - 1);
    let mut stack = vec![start];

    while let Some(pt) = stack.pop() {
        if visited[idx(pt)] {
            continue;
        }
        visited[idx(pt)] = true;
        region.push(pt);
        for n in pt.neighbors() {
            if !board.is_on_grid(n) {
                continue;
            }
            match board.get_player_at(n) {
                None if !visited[idx(n)] => stack.push(n),
                None => {}
                Some(color) => {
                    if !borders.contains(&color) {
                        borders.push(color);
                    }
                }
            }
        }
    }
    (region, borders)
}

/// Score the board of `game_state` with its komi.
pub fn compute_game_result(game_state: &GameState) -> GameResult {
    let territory = evaluate_territory(game_state.board());
    GameResult {
        b: territory.num_black_territory + territory.num_black_stones,
        w: territory.num_white_territory + territory.num_white_stones,
        komi: game_state.komi(),
    }
}
