//! Board representation for tic-tac-toe.
//!
//! A [`Position`] is the nine cells of the board in row-major order. Positions
//! are plain values: every tree node owns its own copy, and a child's position
//! is always its parent's position plus exactly one mark.

use std::fmt;

use crate::{IllegalMove, MCTSError, Result};

/// Number of cells on the board
pub const CELLS: usize = 9;

/// The eight winning lines: rows, then columns, then both diagonals
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A player's mark. `X` always opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the other player's mark
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Placing `mark` on `cell`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Board index (0-8, row-major)
    pub cell: usize,
    /// The mark being placed
    pub mark: Mark,
}

impl Move {
    pub fn new(cell: usize, mark: Mark) -> Self {
        Move { cell, mark }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.mark, self.cell)
    }
}

/// Occupancy of the nine board cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    cells: [Option<Mark>; CELLS],
}

impl Position {
    /// The empty starting board
    pub fn empty() -> Self {
        Position {
            cells: [None; CELLS],
        }
    }

    /// Builds a position from raw cell contents
    pub fn from_cells(cells: [Option<Mark>; CELLS]) -> Self {
        Position { cells }
    }

    /// Returns the raw cell contents
    pub fn cells(&self) -> &[Option<Mark>; CELLS] {
        &self.cells
    }

    /// Returns the mark on `cell`, or `None` if it is empty or off the board
    pub fn get(&self, cell: usize) -> Option<Mark> {
        self.cells.get(cell).copied().flatten()
    }

    /// Returns true if `cell` is on the board and unmarked
    pub fn is_empty_cell(&self, cell: usize) -> bool {
        cell < CELLS && self.cells[cell].is_none()
    }

    /// Checks that `cell` is on the board and still empty
    pub fn check_playable(&self, cell: usize) -> Result<()> {
        if cell >= CELLS {
            return Err(MCTSError::IllegalMove(IllegalMove::OutOfRange(cell)));
        }
        if self.cells[cell].is_some() {
            return Err(MCTSError::IllegalMove(IllegalMove::Occupied(cell)));
        }
        Ok(())
    }

    /// Returns the indices of the empty cells in ascending order
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELLS).filter(|&i| self.is_empty_cell(i)).collect()
    }

    /// Counts the cells holding `mark`
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| **c == Some(mark)).count()
    }

    /// Returns true if no empty cell remains
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Returns a copy of this position with `mv` applied.
    ///
    /// The target cell must be empty; the tree builder only ever generates
    /// moves onto empty cells.
    pub fn with_move(&self, mv: Move) -> Position {
        debug_assert!(self.cells[mv.cell].is_none(), "cell {} already taken", mv.cell);
        let mut next = *self;
        next.cells[mv.cell] = Some(mv.mark);
        next
    }

    /// Returns the mark that completed a line, if any.
    ///
    /// `None` means either a draw or a game still in progress; combine with
    /// [`Position::is_terminal`] to tell them apart.
    pub fn winner(&self) -> Option<Mark> {
        WINNING_LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.cells[a]?;
            if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) {
                Some(mark)
            } else {
                None
            }
        })
    }

    /// A position is terminal once somebody has won or the board is full
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Infers which mark made the most recent move from the mark counts.
    ///
    /// On a board with equal counts (including the empty board) this is `O`,
    /// so that `X` moves next.
    pub fn last_mover(&self) -> Result<Mark> {
        let xs = self.count(Mark::X);
        let os = self.count(Mark::O);
        if xs == os {
            Ok(Mark::O)
        } else if xs == os + 1 {
            Ok(Mark::X)
        } else {
            Err(MCTSError::InvalidPosition(format!(
                "{} X marks and {} O marks cannot arise from alternating play",
                xs, os
            )))
        }
    }

    /// Renders the board showing each empty cell's index instead of a blank
    pub fn render_with_indices(&self) -> String {
        self.render(|i| char::from_digit(i as u32, 10).unwrap_or(' '))
    }

    fn render(&self, empty: impl Fn(usize) -> char) -> String {
        let symbol = |i: usize| match self.cells[i] {
            Some(Mark::X) => 'X',
            Some(Mark::O) => 'O',
            None => empty(i),
        };
        let rows: Vec<String> = (0..3)
            .map(|r| {
                format!(
                    "{}|{}|{}",
                    symbol(r * 3),
                    symbol(r * 3 + 1),
                    symbol(r * 3 + 2)
                )
            })
            .collect();
        rows.join("\n-----\n")
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(|_| ' '))
    }
}
