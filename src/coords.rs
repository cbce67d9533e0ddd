//! Human-readable coordinates.
//!
//! Columns are lettered `A` to `T` skipping `I`; rows are numbered from 1 at
//! the bottom of the board. `C3` is row 3, column 3.

use thiserror::Error;

use crate::board::Move;
use crate::constants::COLS;
use crate::types::{Player, Point};

/// Why a coordinate string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("empty coordinate")]
    Empty,
    #[error("unknown column '{0}'")]
    BadColumn(char),
    #[error("invalid row in '{0}'")]
    BadRow(String),
}

/// Parse a coordinate such as `D4` (case-insensitive).
///
/// The result is not checked against any board size.
pub fn parse_point(s: &str) -> Result<Point, CoordError> {
    let s = s.trim();
    let mut chars = s.chars();
    let first = chars.next().ok_or(CoordError::Empty)?;
    let col_char = first.to_ascii_uppercase();
    let col = COLS
        .find(col_char)
        .ok_or(CoordError::BadColumn(first))?;
    let row: i32 = chars
        .as_str()
        .parse()
        .map_err(|_| CoordError::BadRow(s.to_string()))?;
    if row < 1 {
        return Err(CoordError::BadRow(s.to_string()));
    }
    Ok(Point::new(row, col as i32 + 1))
}

/// Parse a move: `pass`, `resign`, or a coordinate.
pub fn parse_move(s: &str) -> Result<Move, CoordError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("pass") {
        Ok(Move::Pass)
    } else if s.eq_ignore_ascii_case("resign") {
        Ok(Move::Resign)
    } else {
        parse_point(s).map(Move::Play)
    }
}

/// Format a point as a coordinate such as `D4`.
///
/// # Panics
/// Panics if the column is outside the lettered range.
pub fn format_point(point: Point) -> String {
    assert!(
        point.col >= 1 && point.col as usize <= COLS.len(),
        "column {} has no letter",
        point.col
    );
    let col = COLS.as_bytes()[point.col as usize - 1] as char;
    format!("{col}{}", point.row)
}

/// Format a move as GTP does: a coordinate, `pass`, or `resign`.
pub fn format_vertex(mv: Move) -> String {
    match mv {
        Move::Play(point) => format_point(point),
        Move::Pass => "pass".into(),
        Move::Resign => "resign".into(),
    }
}

/// Describe a move for the console, e.g. `Black C3` or `White passes`.
pub fn format_move(player: Player, mv: Move) -> String {
    match mv {
        Move::Play(point) => format!("{player} {}", format_point(point)),
        Move::Pass => format!("{player} passes"),
        Move::Resign => format!("{player} resigns"),
    }
}
