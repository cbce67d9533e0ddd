//! Board representation, stone strings, and the capture rule.
//!
//! Connected stones of one color form a [`GoString`]. Strings live in an arena
//! owned by the [`Board`]; every occupied grid cell stores the [`StringId`] of
//! the string it belongs to. Merging and capturing rebind handles in the grid
//! instead of sharing mutable string objects between cells.

use std::collections::HashSet;
use std::fmt;

use tracing::trace;

use crate::constants::{COLS, MAX_BOARD_SIZE};
use crate::types::{Player, Point};
use crate::zobrist::{self, EMPTY_BOARD};

/// A move: play a stone, pass, or resign.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Play(Point),
    Pass,
    Resign,
}

impl Move {
    /// Build a move from its loose parts.
    ///
    /// # Panics
    /// Panics unless exactly one of `point`, `is_pass`, `is_resign` is set.
    pub fn from_parts(point: Option<Point>, is_pass: bool, is_resign: bool) -> Move {
        let set = point.is_some() as u8 + is_pass as u8 + is_resign as u8;
        assert_eq!(set, 1, "a move must be exactly one of play, pass, resign");
        match point {
            Some(p) => Move::Play(p),
            None if is_pass => Move::Pass,
            None => Move::Resign,
        }
    }

    #[inline]
    pub fn is_play(&self) -> bool {
        matches!(self, Move::Play(_))
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass)
    }

    #[inline]
    pub fn is_resign(&self) -> bool {
        matches!(self, Move::Resign)
    }

    /// The target point of a `Play`, if any.
    #[inline]
    pub fn point(&self) -> Option<Point> {
        match self {
            Move::Play(p) => Some(*p),
            _ => None,
        }
    }
}

/// A connected set of same-color stones and its liberties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoString {
    color: Player,
    stones: HashSet<Point>,
    liberties: HashSet<Point>,
}

impl GoString {
    pub fn new(color: Player, stones: HashSet<Point>, liberties: HashSet<Point>) -> Self {
        GoString {
            color,
            stones,
            liberties,
        }
    }

    pub fn color(&self) -> Player {
        self.color
    }

    pub fn stones(&self) -> &HashSet<Point> {
        &self.stones
    }

    pub fn liberties(&self) -> &HashSet<Point> {
        &self.liberties
    }

    #[inline]
    pub fn num_liberties(&self) -> usize {
        self.liberties.len()
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.liberties.is_empty()
    }

    pub fn add_liberty(&mut self, point: Point) {
        self.liberties.insert(point);
    }

    pub fn remove_liberty(&mut self, point: Point) {
        self.liberties.remove(&point);
    }

    /// Combine two strings of the same color.
    ///
    /// Stones are the union of both stone sets; liberties are the union of both
    /// liberty sets minus the combined stones.
    pub fn merged_with(mut self, other: GoString) -> GoString {
        assert_eq!(self.color, other.color, "cannot merge strings of different colors");
        self.stones.extend(other.stones);
        self.liberties.extend(other.liberties);
        let stones = &self.stones;
        self.liberties.retain(|p| !stones.contains(p));
        self
    }
}

/// Handle of a string in the board's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StringId(u32);

/// A Go board of `num_rows` x `num_cols` points.
///
/// Cloning a board yields a fully independent copy: strings are owned by the
/// arena, so nothing is aliased with the source.
#[derive(Clone, Debug)]
pub struct Board {
    num_rows: usize,
    num_cols: usize,
    /// Row-major cells, each holding the handle of its string
    grid: Vec<Option<StringId>>,
    /// String arena; `None` marks a free slot
    strings: Vec<Option<GoString>>,
    /// Free arena slots available for reuse
    free: Vec<StringId>,
    /// Zobrist hash of all stones on the board
    hash: u64,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Panics
    /// Panics if either dimension is zero or exceeds [`MAX_BOARD_SIZE`].
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&num_rows) && (1..=MAX_BOARD_SIZE).contains(&num_cols),
            "board dimensions must be within 1..={MAX_BOARD_SIZE}, got {num_rows}x{num_cols}"
        );
        Board {
            num_rows,
            num_cols,
            grid: vec![None; num_rows * num_cols],
            strings: Vec::new(),
            free: Vec::new(),
            hash: EMPTY_BOARD,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Zobrist hash of the stones currently on the board.
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    fn idx(&self, point: Point) -> usize {
        (point.row as usize - 1) * self.num_cols + (point.col as usize - 1)
    }

    /// All points of the board in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (1..=self.num_rows as i32)
            .flat_map(move |row| (1..=self.num_cols as i32).map(move |col| Point::new(row, col)))
    }

    #[inline]
    pub fn is_on_grid(&self, point: Point) -> bool {
        point.row >= 1
            && point.col >= 1
            && point.row as usize <= self.num_rows
            && point.col as usize <= self.num_cols
    }

    /// Handle of the string occupying `point`, or `None` if empty or off-grid.
    pub fn string_id_at(&self, point: Point) -> Option<StringId> {
        if !self.is_on_grid(point) {
            return None;
        }
        self.grid[self.idx(point)]
    }

    /// The color of the stone at `point`, or `None` if empty or off-grid.
    pub fn get_player_at(&self, point: Point) -> Option<Player> {
        self.get_go_string(point).map(GoString::color)
    }

    /// The string occupying `point`, or `None` if empty or off-grid.
    pub fn get_go_string(&self, point: Point) -> Option<&GoString> {
        self.string_id_at(point).map(|id| self.string(id))
    }

    /// Number of strings alive on the board.
    pub fn num_strings(&self) -> usize {
        self.strings.iter().filter(|s| s.is_some()).count()
    }

    #[inline]
    fn string(&self, id: StringId) -> &GoString {
        self.strings[id.0 as usize]
            .as_ref()
            .expect("grid refers to a freed string")
    }

    #[inline]
    fn string_mut(&mut self, id: StringId) -> &mut GoString {
        self.strings[id.0 as usize]
            .as_mut()
            .expect("grid refers to a freed string")
    }

    fn alloc(&mut self, string: GoString) -> StringId {
        match self.free.pop() {
            Some(id) => {
                self.strings[id.0 as usize] = Some(string);
                id
            }
            None => {
                self.strings.push(Some(string));
                StringId((self.strings.len() - 1) as u32)
            }
        }
    }

    fn release(&mut self, id: StringId) -> GoString {
        let string = self.strings[id.0 as usize]
            .take()
            .expect("released a freed string");
        self.free.push(id);
        string
    }

    /// Place a stone of `player` at `point` and resolve captures.
    ///
    /// The stone joins every adjacent friendly string; every adjacent enemy
    /// string loses `point` as a liberty and is removed if it has none left.
    /// A self-capturing stone is left on the board with zero liberties; callers
    /// are expected to reject such moves beforehand.
    ///
    /// # Panics
    /// Panics if `point` is off the grid or already occupied.
    pub fn place_stone(&mut self, player: Player, point: Point) {
        assert!(self.is_on_grid(point), "point {point:?} is off the grid");
        assert!(
            self.grid[self.idx(point)].is_none(),
            "point {point:?} is already occupied"
        );

        let mut adjacent_same: Vec<StringId> = Vec::with_capacity(4);
        let mut adjacent_opposite: Vec<StringId> = Vec::with_capacity(4);
        let mut liberties = HashSet::new();

        for neighbor in point.neighbors() {
            if !self.is_on_grid(neighbor) {
                continue;
            }
            match self.grid[self.idx(neighbor)] {
                None => {
                    liberties.insert(neighbor);
                }
                Some(id) if self.string(id).color == player => {
                    if !adjacent_same.contains(&id) {
                        adjacent_same.push(id);
                    }
                }
                Some(id) => {
                    if !adjacent_opposite.contains(&id) {
                        adjacent_opposite.push(id);
                    }
                }
            }
        }

        let mut new_string = GoString::new(player, HashSet::from([point]), liberties);
        for id in adjacent_same {
            let same = self.release(id);
            new_string = new_string.merged_with(same);
        }
        let stones: Vec<Point> = new_string.stones.iter().copied().collect();
        let new_id = self.alloc(new_string);
        for stone in stones {
            let i = self.idx(stone);
            self.grid[i] = Some(new_id);
        }
        self.hash ^= zobrist::hash_code(point, player);

        for &id in &adjacent_opposite {
            self.string_mut(id).remove_liberty(point);
        }
        for id in adjacent_opposite {
            if self.string(id).is_captured() {
                self.remove_string(id);
            }
        }
    }

    /// Remove a captured string and return its points as liberties to the
    /// strings around it.
    fn remove_string(&mut self, id: StringId) {
        let string = self.release(id);
        trace!(
            color = %string.color,
            stones = string.stones.len(),
            "capturing string"
        );
        for &stone in &string.stones {
            let i = self.idx(stone);
            self.grid[i] = None;
            self.hash ^= zobrist::hash_code(stone, string.color);
        }
        for &stone in &string.stones {
            for neighbor in stone.neighbors() {
                if let Some(nid) = self.string_id_at(neighbor) {
                    self.string_mut(nid).add_liberty(stone);
                }
            }
        }
    }
}

/// Boards are equal when they have the same dimensions and the same stone at
/// every point. Arena layout does not matter.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.num_rows == other.num_rows
            && self.num_cols == other.num_cols
            && self.hash == other.hash
            && self
                .points()
                .all(|p| self.get_player_at(p) == other.get_player_at(p))
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=self.num_rows as i32).rev() {
            write!(f, "{row:>2} ")?;
            for col in 1..=self.num_cols as i32 {
                let ch = match self.get_player_at(Point::new(row, col)) {
                    Some(Player::Black) => 'x',
                    Some(Player::White) => 'o',
                    None => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   {}", &COLS[..self.num_cols])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Point {
        Point::new(row, col)
    }

    #[test]
    fn test_single_stone_liberties() {
        let mut board = Board::new(9, 9);
        board.place_stone(Player::Black, p(5, 5));
        let s = board.get_go_string(p(5, 5)).unwrap();
        assert_eq!(s.num_liberties(), 4);
        assert_eq!(s.color(), Player::Black);

        board.place_stone(Player::Black, p(1, 1));
        assert_eq!(board.get_go_string(p(1, 1)).unwrap().num_liberties(), 2);
    }

    #[test]
    fn test_adjacent_enemy_loses_liberty() {
        let mut board = Board::new(5, 5);
        board.place_stone(Player::Black, p(3, 3));
        board.place_stone(Player::White, p(3, 4));
        let black = board.get_go_string(p(3, 3)).unwrap();
        assert_eq!(black.num_liberties(), 3);
        assert!(!black.liberties().contains(&p(3, 4)));
    }

    #[test]
    fn test_merge_shares_one_handle() {
        let mut board = Board::new(5, 5);
        board.place_stone(Player::Black, p(2, 2));
        board.place_stone(Player::Black, p(2, 4));
        board.place_stone(Player::Black, p(2, 3));
        let id = board.string_id_at(p(2, 2));
        assert_eq!(id, board.string_id_at(p(2, 3)));
        assert_eq!(id, board.string_id_at(p(2, 4)));
        assert_eq!(board.num_strings(), 1);
        assert_eq!(board.get_go_string(p(2, 3)).unwrap().stones().len(), 3);
    }

    #[test]
    fn test_capture_in_corner() {
        let mut board = Board::new(5, 5);
        board.place_stone(Player::White, p(1, 1));
        board.place_stone(Player::Black, p(1, 2));
        board.place_stone(Player::Black, p(2, 1));
        assert_eq!(board.get_player_at(p(1, 1)), None);
        for stone in [p(1, 2), p(2, 1)] {
            let s = board.get_go_string(stone).unwrap();
            assert!(s.liberties().contains(&p(1, 1)));
        }
    }

    #[test]
    fn test_arena_slots_are_reused() {
        let mut board = Board::new(3, 3);
        board.place_stone(Player::White, p(1, 1));
        board.place_stone(Player::Black, p(1, 2));
        board.place_stone(Player::Black, p(2, 1));
        let slots = board.strings.len();
        board.place_stone(Player::White, p(3, 3));
        assert_eq!(board.strings.len(), slots);
    }

    #[test]
    fn test_hash_tracks_contents() {
        let mut a = Board::new(3, 3);
        let mut b = Board::new(3, 3);
        a.place_stone(Player::Black, p(1, 1));
        a.place_stone(Player::Black, p(2, 2));
        b.place_stone(Player::Black, p(2, 2));
        b.place_stone(Player::Black, p(1, 1));
        assert_eq!(a.zobrist_hash(), b.zobrist_hash());
        assert_eq!(a, b);
    }

    #[test]
    fn test_capture_restores_empty_hash() {
        let mut board = Board::new(2, 2);
        board.place_stone(Player::White, p(1, 1));
        let before = board.zobrist_hash();
        board.place_stone(Player::Black, p(1, 2));
        board.place_stone(Player::Black, p(2, 1));
        assert_eq!(
            board.zobrist_hash(),
            before
                ^ zobrist::hash_code(p(1, 1), Player::White)
                ^ zobrist::hash_code(p(1, 2), Player::Black)
                ^ zobrist::hash_code(p(2, 1), Player::Black)
        );
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_place_on_occupied_panics() {
        let mut board = Board::new(5, 5);
        board.place_stone(Player::Black, p(3, 3));
        board.place_stone(Player::White, p(3, 3));
    }

    #[test]
    #[should_panic(expected = "off the grid")]
    fn test_place_off_grid_panics() {
        let mut board = Board::new(5, 5);
        board.place_stone(Player::Black, p(6, 1));
    }

    #[test]
    #[should_panic(expected = "exactly one")]
    fn test_move_with_two_parts_panics() {
        Move::from_parts(Some(p(1, 1)), true, false);
    }

    #[test]
    fn test_move_from_parts() {
        assert_eq!(Move::from_parts(Some(p(2, 3)), false, false), Move::Play(p(2, 3)));
        assert_eq!(Move::from_parts(None, true, false), Move::Pass);
        assert_eq!(Move::from_parts(None, false, true), Move::Resign);
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(3, 3);
        board.place_stone(Player::Black, p(1, 1));
        board.place_stone(Player::White, p(3, 3));
        let s = board.to_string();
        assert_eq!(s, " 3 ..o\n 2 ...\n 1 x..\n   ABC\n");
    }
}
