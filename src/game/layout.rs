//! Screen geometry: maps a viewport onto board cells and back.

use serde::{Deserialize, Serialize};

use super::{Player, Position};

/// Drawable area in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(700.0, 800.0)
    }
}

/// A point in screen units, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    viewport: Viewport,
    rows: usize,
    cols: usize,
    cell_size: f32,
}

impl Layout {
    /// Fit a `rows × cols` board into the viewport, leaving a row of
    /// headroom above and below it.
    pub fn new(viewport: Viewport, rows: usize, cols: usize) -> Self {
        let cell_size = (viewport.width / cols.max(1) as f32)
            .min(viewport.height / (rows + 2) as f32)
            .max(0.0);
        Layout {
            viewport,
            rows,
            cols,
            cell_size,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn disc_radius(&self) -> f32 {
        self.cell_size * 0.4
    }

    pub fn board_start_x(&self) -> f32 {
        (self.viewport.width - self.cell_size * self.cols as f32) / 2.0
    }

    pub fn board_start_y(&self) -> f32 {
        self.viewport.height - self.cell_size * self.rows as f32 - self.cell_size / 2.0
    }

    /// Center of a board cell on screen
    pub fn cell_center(&self, pos: Position) -> Point {
        Point::new(
            self.board_start_x() + pos.col as f32 * self.cell_size + self.cell_size / 2.0,
            self.board_start_y() + pos.row as f32 * self.cell_size + self.cell_size / 2.0,
        )
    }

    /// Column under a horizontal screen coordinate, `None` when outside the board
    pub fn column_at(&self, x: f32) -> Option<usize> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let col = ((x - self.board_start_x()) / self.cell_size).floor();
        (col >= 0.0 && (col as usize) < self.cols).then_some(col as usize)
    }

    /// Where a player's undropped disc waits: orange on the right, blue on the left.
    pub fn home_x(&self, player: Player) -> f32 {
        match player {
            Player::One => self.viewport.width * 0.75,
            Player::Two => self.viewport.width * 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size_fits_tightest_dimension() {
        let layout = Layout::new(Viewport::new(700.0, 800.0), 6, 7);
        assert_eq!(layout.cell_size(), 100.0);
        assert!((layout.disc_radius() - 40.0).abs() < 1e-4);

        let wide = Layout::new(Viewport::new(2000.0, 400.0), 6, 7);
        assert_eq!(wide.cell_size(), 50.0);
    }

    #[test]
    fn test_board_origin_centers_horizontally() {
        let layout = Layout::new(Viewport::new(900.0, 800.0), 6, 7);
        assert_eq!(layout.board_start_x(), 100.0);
        assert_eq!(layout.board_start_y(), 800.0 - 600.0 - 50.0);
    }

    #[test]
    fn test_cell_center_and_column_agree() {
        let layout = Layout::new(Viewport::default(), 6, 7);
        for col in 0..7 {
            let center = layout.cell_center(Position::new(5, col));
            assert_eq!(layout.column_at(center.x), Some(col));
        }
        assert_eq!(layout.cell_center(Position::new(5, 0)).y, 700.0);
    }

    #[test]
    fn test_column_outside_board() {
        let layout = Layout::new(Viewport::new(900.0, 800.0), 6, 7);
        assert_eq!(layout.column_at(50.0), None);
        assert_eq!(layout.column_at(850.0), None);
    }

    #[test]
    fn test_home_positions() {
        let layout = Layout::new(Viewport::new(800.0, 800.0), 6, 7);
        assert_eq!(layout.home_x(Player::One), 600.0);
        assert_eq!(layout.home_x(Player::Two), 200.0);
    }
}
