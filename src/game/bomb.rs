//! Bomb landings: blast clearing, column gravity and the explosion effect.

use serde::{Deserialize, Serialize};

use super::layout::{Layout, Point};
use super::{Board, Player, Position};

/// Growth and size of the explosion effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    /// Radius gained per millisecond, in screen units.
    pub growth_per_ms: f32,
    pub max_radius: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        ExplosionConfig {
            growth_per_ms: 0.2,
            max_radius: 80.0,
        }
    }
}

/// A disc that gravity pulled down after a blast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub from: Position,
    pub to: Position,
    /// Screen center of `to`, for renderers replaying the fall.
    pub target: Point,
}

/// Clear every occupied cell in the 3×3 block centred on `center`.
///
/// Off-board neighbours are skipped. Returns the cleared cells.
pub fn blast(board: &mut Board, center: Position) -> Vec<Position> {
    let mut cleared = Vec::new();
    for dr in -1..=1 {
        for dc in -1..=1 {
            let Some(pos) = board.offset(center, dr, dc) else {
                continue;
            };
            if board.clear(pos).is_some() {
                cleared.push(pos);
            }
        }
    }
    cleared
}

/// Let floating discs fall, column by column, to close every gap.
///
/// The board is updated in place; the returned movements describe what moved.
pub fn compact(board: &mut Board, layout: &Layout) -> Vec<Movement> {
    let mut movements = Vec::new();

    for col in 0..board.cols() {
        // Lowest empty slot seen so far in this column.
        let mut empty_row: Option<usize> = None;

        for row in (0..board.rows()).rev() {
            match empty_row {
                None if board.is_empty_at(row, col) => empty_row = Some(row),
                Some(slot) if !board.is_empty_at(row, col) => {
                    let from = Position::new(row, col);
                    let to = Position::new(slot, col);
                    if board.move_disc(from, to) {
                        movements.push(Movement {
                            from,
                            to,
                            target: layout.cell_center(to),
                        });
                    }
                    // Everything between `slot` and `row` is empty now.
                    empty_row = Some(slot - 1);
                }
                _ => {}
            }
        }
    }

    movements
}

/// Expanding, fading ring drawn where a bomb went off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Point,
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: f32,
    pub player: Player,
}

impl Explosion {
    pub fn new(center: Point, player: Player, config: &ExplosionConfig) -> Self {
        Explosion {
            center,
            radius: 0.0,
            max_radius: config.max_radius,
            alpha: 1.0,
            player,
        }
    }

    /// Grow by `dt_ms`. Returns false once the ring has reached full size.
    pub fn update(&mut self, dt_ms: f32, config: &ExplosionConfig) -> bool {
        self.radius += dt_ms * config.growth_per_ms;
        self.alpha = (1.0 - self.radius / self.max_radius).max(0.0);
        self.radius < self.max_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::layout::Viewport;
    use crate::game::{Disc, DiscKind};
    use proptest::prelude::*;

    fn put(board: &mut Board, row: usize, col: usize, player: Player, kind: DiscKind) {
        assert!(board.place(Position::new(row, col), Disc::new(player, row as f32, kind)));
    }

    fn layout() -> Layout {
        Layout::new(Viewport::default(), 6, 7)
    }

    fn assert_compacted(board: &Board) {
        for col in 0..board.cols() {
            for row in 0..board.rows() - 1 {
                if !board.is_empty_at(row, col) {
                    assert!(!board.is_empty_at(row + 1, col), "floating disc at ({row}, {col})");
                }
            }
        }
    }

    #[test]
    fn test_bomb_scenario_clears_and_compacts() {
        let mut board = Board::default();
        put(&mut board, 5, 2, Player::One, DiscKind::Normal);
        put(&mut board, 5, 4, Player::Two, DiscKind::Normal);
        put(&mut board, 5, 3, Player::One, DiscKind::Normal);
        put(&mut board, 4, 3, Player::Two, DiscKind::Bomb);
        put(&mut board, 3, 3, Player::One, DiscKind::Normal);
        put(&mut board, 4, 2, Player::Two, DiscKind::Normal);
        put(&mut board, 3, 2, Player::One, DiscKind::Normal);
        put(&mut board, 2, 3, Player::Two, DiscKind::Normal);

        let mut cleared = blast(&mut board, Position::new(4, 3));
        cleared.sort();
        assert_eq!(
            cleared,
            vec![
                Position::new(3, 2),
                Position::new(3, 3),
                Position::new(4, 2),
                Position::new(4, 3),
                Position::new(5, 2),
                Position::new(5, 3),
                Position::new(5, 4),
            ]
        );

        let moves = compact(&mut board, &layout());
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].from, Position::new(2, 3));
        assert_eq!(moves[0].to, Position::new(5, 3));
        assert_eq!(moves[0].target, layout().cell_center(Position::new(5, 3)));
        assert_eq!(board.occupant(5, 3), Some(Player::Two));
        assert_compacted(&board);
    }

    #[test]
    fn test_blast_at_bottom_row_scenario() {
        let mut board = Board::default();
        put(&mut board, 5, 3, Player::One, DiscKind::Bomb);
        put(&mut board, 5, 2, Player::Two, DiscKind::Normal);
        put(&mut board, 5, 4, Player::Two, DiscKind::Normal);
        put(&mut board, 4, 3, Player::Two, DiscKind::Normal);
        put(&mut board, 3, 3, Player::One, DiscKind::Normal);
        put(&mut board, 4, 2, Player::One, DiscKind::Normal);
        put(&mut board, 3, 2, Player::Two, DiscKind::Normal);

        let cleared = blast(&mut board, Position::new(5, 3));
        assert_eq!(cleared.len(), 5);
        assert!(board.is_empty_at(5, 3));
        // (3, 3) and (3, 2) sit outside the 3×3 block.
        assert_eq!(board.occupant(3, 3), Some(Player::One));
        assert_eq!(board.occupant(3, 2), Some(Player::Two));

        let moves = compact(&mut board, &layout());
        assert_eq!(moves.len(), 2);
        assert_eq!(board.occupant(5, 3), Some(Player::One));
        assert_eq!(board.occupant(5, 2), Some(Player::Two));
        // Metadata travels with the disc.
        let moved = board.get(5, 2).and_then(|c| c.disc().copied()).unwrap();
        assert_eq!(moved.rotation, 3.0);
        assert_compacted(&board);
    }

    #[test]
    fn test_blast_in_corner_skips_off_board_cells() {
        let mut board = Board::default();
        put(&mut board, 5, 0, Player::One, DiscKind::Bomb);
        put(&mut board, 5, 1, Player::Two, DiscKind::Normal);
        let cleared = blast(&mut board, Position::new(5, 0));
        assert_eq!(cleared.len(), 2);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_compact_moves_stack_as_a_unit() {
        let mut board = Board::default();
        put(&mut board, 2, 0, Player::One, DiscKind::Normal);
        put(&mut board, 1, 0, Player::Two, DiscKind::Bomb);
        let moves = compact(&mut board, &layout());
        assert_eq!(moves.len(), 2);
        assert_eq!(board.occupant(5, 0), Some(Player::One));
        assert_eq!(board.occupant(4, 0), Some(Player::Two));
        assert_eq!(
            board.get(4, 0).and_then(|c| c.disc().map(|d| d.kind)),
            Some(DiscKind::Bomb)
        );
    }

    #[test]
    fn test_compact_on_settled_board_is_a_no_op() {
        let mut board = Board::default();
        put(&mut board, 5, 0, Player::One, DiscKind::Normal);
        put(&mut board, 4, 0, Player::Two, DiscKind::Normal);
        let before = board.clone();
        assert!(compact(&mut board, &layout()).is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_explosion_grows_fades_and_expires() {
        let config = ExplosionConfig::default();
        let mut explosion = Explosion::new(Point::new(10.0, 10.0), Player::One, &config);
        assert!(explosion.update(100.0, &config));
        assert!((explosion.radius - 20.0).abs() < 1e-4);
        assert!((explosion.alpha - 0.75).abs() < 1e-4);
        assert!(!explosion.update(300.0, &config));
        assert_eq!(explosion.alpha, 0.0);
    }

    fn board_from(cells: &[u8]) -> Board {
        let mut board = Board::default();
        for (i, v) in cells.iter().enumerate() {
            let player = match v {
                1 => Player::One,
                2 => Player::Two,
                _ => continue,
            };
            board.place(Position::new(i / 7, i % 7), Disc::new(player, i as f32, DiscKind::Normal));
        }
        board
    }

    proptest! {
        #[test]
        fn prop_blast_is_local(
            cells in proptest::collection::vec(0u8..3, 42),
            row in 0usize..6,
            col in 0usize..7,
        ) {
            let before = board_from(&cells);
            let mut after = before.clone();
            let cleared = blast(&mut after, Position::new(row, col));
            for r in 0usize..6 {
                for c in 0usize..7 {
                    let near = r.abs_diff(row) <= 1 && c.abs_diff(col) <= 1;
                    let was_occupied = !before.is_empty_at(r, c);
                    if near {
                        prop_assert!(after.is_empty_at(r, c));
                        prop_assert_eq!(cleared.contains(&Position::new(r, c)), was_occupied);
                    } else {
                        prop_assert_eq!(after.get(r, c), before.get(r, c));
                    }
                }
            }
        }

        #[test]
        fn prop_compact_leaves_no_gaps(cells in proptest::collection::vec(0u8..3, 42)) {
            let mut board = board_from(&cells);
            let count = board.occupied_count();
            let column_order: Vec<Vec<f32>> = (0..7)
                .map(|c| {
                    (0..6)
                        .rev()
                        .filter_map(|r| board.get(r, c).and_then(|cell| cell.disc().map(|d| d.rotation)))
                        .collect()
                })
                .collect();

            compact(&mut board, &layout());

            prop_assert_eq!(board.occupied_count(), count);
            for c in 0..7 {
                for r in 0..5 {
                    if !board.is_empty_at(r, c) {
                        prop_assert!(!board.is_empty_at(r + 1, c));
                    }
                }
                // Relative order within a column is preserved.
                let order: Vec<f32> = (0..6)
                    .rev()
                    .filter_map(|r| board.get(r, c).and_then(|cell| cell.disc().map(|d| d.rotation)))
                    .collect();
                prop_assert_eq!(&order, &column_order[c]);
            }
        }
    }
}
