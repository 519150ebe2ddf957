use serde::{Deserialize, Serialize};

use super::Player;

pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 7;

/// What a disc is made of. Bombs clear their neighbourhood on landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiscKind {
    #[default]
    Normal,
    Bomb,
}

/// A settled disc. Owner, final rotation and kind live together so they are
/// always set and cleared as one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub player: Player,
    pub rotation: f32,
    pub kind: DiscKind,
}

impl Disc {
    pub fn new(player: Player, rotation: f32, kind: DiscKind) -> Self {
        Disc {
            player,
            rotation,
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Disc),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn player(&self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(disc) => Some(disc.player),
        }
    }

    pub fn disc(&self) -> Option<&Disc> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(disc) => Some(disc),
        }
    }
}

/// A board coordinate. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        self.index(row, col).is_some()
    }

    /// Step from `pos` by a signed offset, staying on the board.
    pub fn offset(&self, pos: Position, dr: isize, dc: isize) -> Option<Position> {
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        self.in_bounds(row, col).then_some(Position { row, col })
    }

    /// Get the cell at a specific position, `None` when off the board
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Owner of the disc at a position, if any
    pub fn occupant(&self, row: usize, col: usize) -> Option<Player> {
        self.get(row, col).and_then(|cell| cell.player())
    }

    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Cell::Empty))
    }

    /// Put a disc into an empty cell. Returns false (and leaves the board
    /// alone) when the cell is off the board or already taken.
    pub fn place(&mut self, pos: Position, disc: Disc) -> bool {
        match self.index(pos.row, pos.col) {
            Some(i) if self.cells[i].is_empty() => {
                self.cells[i] = Cell::Occupied(disc);
                true
            }
            _ => false,
        }
    }

    /// Empty a cell, returning the disc that was there.
    pub fn clear(&mut self, pos: Position) -> Option<Disc> {
        let i = self.index(pos.row, pos.col)?;
        match std::mem::take(&mut self.cells[i]) {
            Cell::Empty => None,
            Cell::Occupied(disc) => Some(disc),
        }
    }

    /// Move a disc from one cell into another empty cell.
    pub(crate) fn move_disc(&mut self, from: Position, to: Position) -> bool {
        if !self.is_empty_at(to.row, to.col) {
            return false;
        }
        match self.clear(from) {
            Some(disc) => self.place(to, disc),
            None => false,
        }
    }

    pub fn is_valid_column(&self, col: usize) -> bool {
        col < self.cols
    }

    /// Check if a column is full. Columns off the board count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if !self.is_valid_column(col) || self.rows == 0 {
            return true;
        }
        !self.is_empty_at(0, col)
    }

    /// Lowest empty row in a column, where a dropped disc would come to rest
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if !self.is_valid_column(col) {
            return None;
        }
        (0..self.rows).rev().find(|&row| self.is_empty_at(row, col))
    }

    /// True when a disc at this position would rest on the floor or another disc.
    pub fn is_supported(&self, row: usize, col: usize) -> bool {
        row + 1 >= self.rows || !self.is_empty_at(row + 1, col)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Cells in row-major order, top row first.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}
