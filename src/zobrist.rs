//! Zobrist hash codes for board positions.
//!
//! Every (point, stone color) pair gets a random 64-bit code. A board's hash is
//! the XOR of the codes of all its stones, so placing or removing a stone is a
//! single XOR. The table is built once from a fixed seed, which keeps hashes
//! identical across runs.

use std::sync::OnceLock;

use crate::constants::MAX_BOARD_SIZE;
use crate::types::{Player, Point};

/// Fixed seed for the code table.
const ZOBRIST_SEED: u64 = 0x5EED_600D_CAFE_F00D;

const TABLE_SIZE: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE;

struct ZobristTable {
    black: [u64; TABLE_SIZE],
    white: [u64; TABLE_SIZE],
}

static TABLE: OnceLock<ZobristTable> = OnceLock::new();

fn table() -> &'static ZobristTable {
    TABLE.get_or_init(|| {
        let mut rng = fastrand::Rng::with_seed(ZOBRIST_SEED);
        let mut black = [0u64; TABLE_SIZE];
        let mut white = [0u64; TABLE_SIZE];
        for i in 0..TABLE_SIZE {
            black[i] = rng.u64(..);
            white[i] = rng.u64(..);
        }
        ZobristTable { black, white }
    })
}

/// Hash of an empty board.
pub const EMPTY_BOARD: u64 = 0;

/// Code for a stone of `player` at `point`.
///
/// `point` must be within the largest supported board.
#[inline]
pub fn hash_code(point: Point, player: Player) -> u64 {
    debug_assert!(point.row >= 1 && point.row as usize <= MAX_BOARD_SIZE);
    debug_assert!(point.col >= 1 && point.col as usize <= MAX_BOARD_SIZE);
    let idx = (point.row as usize - 1) * MAX_BOARD_SIZE + (point.col as usize - 1);
    let t = table();
    match player {
        Player::Black => t.black[idx],
        Player::White => t.white[idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let p = Point::new(4, 7);
        assert_eq!(hash_code(p, Player::Black), hash_code(p, Player::Black));
    }

    #[test]
    fn test_codes_differ_by_color_and_point() {
        let p = Point::new(1, 1);
        let q = Point::new(1, 2);
        assert_ne!(hash_code(p, Player::Black), hash_code(p, Player::White));
        assert_ne!(hash_code(p, Player::Black), hash_code(q, Player::Black));
    }

    #[test]
    fn test_xor_is_reversible() {
        let p = Point::new(19, 19);
        let h = EMPTY_BOARD ^ hash_code(p, Player::White);
        assert_eq!(h ^ hash_code(p, Player::White), EMPTY_BOARD);
    }
}
