//! # Board and Game Rules
//!
//! Five-in-a-row on a fixed 11x11 grid. Players alternate placing stones on
//! empty cells; the first to line up five of their color horizontally,
//! vertically, or diagonally wins. A position with no remaining candidate
//! cell and no completed line is a draw.
//!
//! The win scan here is the single source of truth for "did that placement
//! finish the game": the search tree, the rollout policy, and the auto-play
//! runner all go through [`Board::check_win`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: usize = 11;

/// Number of contiguous same-color stones needed to win.
pub const LINE_SIZE: usize = 5;

/// Stone color, doubling as the player tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// The color that moves after this one.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "X"),
            Player::White => write!(f, "O"),
        }
    }
}

/// A (row, column) placement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move(pub usize, pub usize);

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err("Expected format: r,c".to_string());
        }
        let r = parts[0].parse::<usize>().map_err(|e| e.to_string())?;
        let c = parts[1].parse::<usize>().map_err(|e| e.to_string())?;
        if r >= BOARD_SIZE || c >= BOARD_SIZE {
            return Err(format!("Coordinates must be below {}", BOARD_SIZE));
        }
        Ok(Move(r, c))
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Draw,
}

/// Attempted to place a stone on an occupied cell.
///
/// Legal play never produces this: every caller draws moves from the
/// candidate set, which contains only empty cells. Seeing it means the
/// move bookkeeping is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cell {0} is already occupied")]
pub struct OccupiedCell(pub Move);

/// The 11x11 grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Player>; BOARD_SIZE * BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Board {
            cells: [None; BOARD_SIZE * BOARD_SIZE],
        }
    }

    /// The stone at (r, c), if any.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> Option<Player> {
        self.cells[r * BOARD_SIZE + c]
    }

    /// Places a stone for `player`. Occupied cells are rejected, never
    /// overwritten.
    pub fn place(&mut self, mv: Move, player: Player) -> Result<(), OccupiedCell> {
        let idx = mv.0 * BOARD_SIZE + mv.1;
        if self.cells[idx].is_some() {
            return Err(OccupiedCell(mv));
        }
        self.cells[idx] = Some(player);
        Ok(())
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Checks whether the stone at (r, c) completes a five-in-a-row line.
    ///
    /// Each of the four axes through the placed stone is scanned in both
    /// directions; the two contiguous counts plus the stone itself must
    /// reach [`LINE_SIZE`]. Returns the winner's color on success.
    pub fn check_win(&self, r: usize, c: usize) -> Option<Player> {
        let piece = self.get(r, c)?;
        // Axes as pairs of opposing directions: vertical, horizontal,
        // main diagonal, anti diagonal.
        const AXES: [[(isize, isize); 2]; 4] = [
            [(-1, 0), (1, 0)],
            [(0, -1), (0, 1)],
            [(-1, -1), (1, 1)],
            [(-1, 1), (1, -1)],
        ];
        for [ahead, behind] in AXES {
            let total = 1
                + self.continuous_count(r, c, ahead.0, ahead.1)
                + self.continuous_count(r, c, behind.0, behind.1);
            if total >= LINE_SIZE {
                return Some(piece);
            }
        }
        None
    }

    /// Counts stones matching the color at (r, c) outward along (dr, dc),
    /// excluding (r, c) itself.
    fn continuous_count(&self, r: usize, c: usize, dr: isize, dc: isize) -> usize {
        let Some(piece) = self.get(r, c) else {
            return 0;
        };
        let mut result = 0;
        let mut i = 1;
        loop {
            let nr = r as isize + dr * i;
            let nc = c as isize + dc * i;
            let in_bounds = (0..BOARD_SIZE as isize).contains(&nr)
                && (0..BOARD_SIZE as isize).contains(&nc);
            if !in_bounds || self.get(nr as usize, nc as usize) != Some(piece) {
                break;
            }
            result += 1;
            i += 1;
        }
        result
    }

    /// The heuristic search frontier: empty cells inside the bounding box of
    /// all occupied cells, grown by one cell in each direction and clamped to
    /// the board edge, in row-major order.
    ///
    /// An empty board yields the single center cell. An empty result on an
    /// occupied board means no reasonable move remains; such positions are
    /// treated as drawn.
    pub fn candidate_moves(&self) -> Vec<Move> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                if self.get(r, c).is_some() {
                    bounds = Some(match bounds {
                        None => (r, r, c, c),
                        Some((min_r, max_r, min_c, max_c)) => {
                            (min_r.min(r), max_r.max(r), min_c.min(c), max_c.max(c))
                        }
                    });
                }
            }
        }
        let Some((min_r, max_r, min_c, max_c)) = bounds else {
            return vec![Move(BOARD_SIZE / 2, BOARD_SIZE / 2)];
        };
        let min_r = min_r.saturating_sub(1);
        let max_r = (max_r + 1).min(BOARD_SIZE - 1);
        let min_c = min_c.saturating_sub(1);
        let max_c = (max_c + 1).min(BOARD_SIZE - 1);
        let mut options = Vec::new();
        for r in min_r..=max_r {
            for c in min_c..=max_c {
                if self.get(r, c).is_none() {
                    options.push(Move(r, c));
                }
            }
        }
        options
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                match self.get(r, c) {
                    Some(player) => write!(f, "{} ", player)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fills the whole board with a 2x2-period pattern whose longest run on
    /// any axis is two stones.
    pub(crate) fn full_board_without_a_line() -> Board {
        let mut board = Board::new();
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                let player = if (c + 2 * (r % 2)) % 4 < 2 {
                    Player::Black
                } else {
                    Player::White
                };
                board.place(Move(r, c), player).unwrap();
            }
        }
        board
    }

    fn place_line(board: &mut Board, start: (usize, usize), step: (isize, isize), n: usize) {
        for i in 0..n {
            let r = (start.0 as isize + step.0 * i as isize) as usize;
            let c = (start.1 as isize + step.1 * i as isize) as usize;
            board.place(Move(r, c), Player::Black).unwrap();
        }
    }

    #[test]
    fn test_win_on_each_axis() {
        for step in [(0isize, 1isize), (1, 0), (1, 1), (1, -1)] {
            let mut board = Board::new();
            let start = if step.1 < 0 { (3, 8) } else { (3, 3) };
            place_line(&mut board, start, step, 5);
            // The scan is anchored at the middle stone, so both directions
            // must contribute.
            let mid = (
                (start.0 as isize + step.0 * 2) as usize,
                (start.1 as isize + step.1 * 2) as usize,
            );
            assert_eq!(board.check_win(mid.0, mid.1), Some(Player::Black));
        }
    }

    #[test]
    fn test_four_in_a_row_is_not_a_win() {
        let mut board = Board::new();
        place_line(&mut board, (5, 3), (0, 1), 4);
        for c in 3..7 {
            assert_eq!(board.check_win(5, c), None);
        }
    }

    #[test]
    fn test_opponent_stone_breaks_the_line() {
        let mut board = Board::new();
        place_line(&mut board, (5, 3), (0, 1), 2);
        board.place(Move(5, 5), Player::White).unwrap();
        place_line(&mut board, (5, 6), (0, 1), 2);
        for c in [3, 4, 6, 7] {
            assert_eq!(board.check_win(5, c), None);
        }
    }

    #[test]
    fn test_six_in_a_row_still_wins() {
        let mut board = Board::new();
        place_line(&mut board, (2, 2), (1, 1), 6);
        assert_eq!(board.check_win(4, 4), Some(Player::Black));
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut board = Board::new();
        board.place(Move(5, 5), Player::Black).unwrap();
        assert_eq!(
            board.place(Move(5, 5), Player::White),
            Err(OccupiedCell(Move(5, 5)))
        );
        // The original stone survives the rejected placement.
        assert_eq!(board.get(5, 5), Some(Player::Black));
    }

    #[test]
    fn test_empty_board_candidates_are_the_center() {
        let board = Board::new();
        assert_eq!(board.candidate_moves(), vec![Move(5, 5)]);
    }

    #[test]
    fn test_candidates_surround_the_occupied_box() {
        let mut board = Board::new();
        board.place(Move(5, 5), Player::Black).unwrap();
        let options = board.candidate_moves();
        // 3x3 box around the lone stone, minus the stone itself.
        assert_eq!(options.len(), 8);
        for mv in options {
            assert!((4..=6).contains(&mv.0) && (4..=6).contains(&mv.1));
            assert!(board.get(mv.0, mv.1).is_none());
        }
    }

    #[test]
    fn test_candidate_box_clamps_at_the_edge() {
        let mut board = Board::new();
        board.place(Move(0, 0), Player::Black).unwrap();
        let options = board.candidate_moves();
        assert_eq!(options.len(), 3);
        assert!(options.contains(&Move(0, 1)));
        assert!(options.contains(&Move(1, 0)));
        assert!(options.contains(&Move(1, 1)));
    }

    #[test]
    fn test_full_board_has_no_winner_and_no_candidates() {
        let board = full_board_without_a_line();
        assert!(board.is_full());
        assert!(board.candidate_moves().is_empty());
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                assert_eq!(board.check_win(r, c), None, "false win at ({r},{c})");
            }
        }
    }

    #[test]
    fn test_move_round_trips_through_from_str() {
        assert_eq!("5,7".parse::<Move>(), Ok(Move(5, 7)));
        assert_eq!(" 0 , 10 ".parse::<Move>(), Ok(Move(0, 10)));
        assert!("11,0".parse::<Move>().is_err());
        assert!("3".parse::<Move>().is_err());
    }
}
