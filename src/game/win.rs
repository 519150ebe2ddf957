use super::{Board, Player, Position};

/// Run length needed to win.
pub const CONNECT: usize = 4;

/// Scan axes in check order: horizontal, vertical, diagonal down-right,
/// diagonal down-left. Each is walked in its positive then negative sense.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Check whether the disc just placed at `pos` completes a run for `player`.
///
/// Returns the cells of the first axis that reaches [`CONNECT`]: the placed
/// cell followed by every matching cell counted along that axis (up to three
/// each way, so longer runs can yield more than four cells).
pub fn check_win(board: &Board, pos: Position, player: Player) -> Option<Vec<Position>> {
    if board.occupant(pos.row, pos.col) != Some(player) {
        return None;
    }

    for (dr, dc) in AXES {
        let mut run = vec![pos];
        for sign in [1, -1] {
            run.extend(walk(board, pos, player, dr * sign, dc * sign));
        }
        if run.len() >= CONNECT {
            return Some(run);
        }
    }

    None
}

/// Matching cells stepping away from `pos`, stopping at an edge or a foreign cell.
fn walk(board: &Board, pos: Position, player: Player, dr: isize, dc: isize) -> Vec<Position> {
    let mut cells = Vec::with_capacity(CONNECT - 1);
    let mut cursor = pos;
    for _ in 1..CONNECT {
        match board.offset(cursor, dr, dc) {
            Some(next) if board.occupant(next.row, next.col) == Some(player) => {
                cells.push(next);
                cursor = next;
            }
            _ => break,
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Disc, DiscKind};
    use proptest::prelude::*;

    fn put(board: &mut Board, row: usize, col: usize, player: Player) {
        assert!(board.place(Position::new(row, col), Disc::new(player, 0.0, DiscKind::Normal)));
    }

    fn sorted(mut cells: Vec<Position>) -> Vec<Position> {
        cells.sort();
        cells
    }

    #[test]
    fn test_vertical_win_scenario() {
        let mut board = Board::default();
        for row in [5, 4, 3, 2] {
            put(&mut board, row, 3, Player::One);
        }
        let win = check_win(&board, Position::new(2, 3), Player::One).unwrap();
        let expected = vec![
            Position::new(5, 3),
            Position::new(4, 3),
            Position::new(3, 3),
            Position::new(2, 3),
        ];
        assert_eq!(sorted(win), sorted(expected));
    }

    #[test]
    fn test_horizontal_win_from_middle() {
        let mut board = Board::default();
        for col in 0..4 {
            put(&mut board, 5, col, Player::Two);
        }
        let win = check_win(&board, Position::new(5, 2), Player::Two).unwrap();
        assert_eq!(win[0], Position::new(5, 2));
        assert_eq!(win.len(), 4);
    }

    #[test]
    fn test_long_run_reports_every_counted_cell() {
        let mut board = Board::default();
        for col in 0..7 {
            put(&mut board, 5, col, Player::One);
        }
        // Three each way from the centre.
        let win = check_win(&board, Position::new(5, 3), Player::One).unwrap();
        assert_eq!(win.len(), 7);
    }

    #[test]
    fn test_diagonal_wins() {
        let mut board = Board::default();
        for i in 0..4 {
            put(&mut board, 5 - i, i, Player::One);
        }
        assert!(check_win(&board, Position::new(3, 2), Player::One).is_some());

        let mut board = Board::default();
        for i in 0..4 {
            put(&mut board, 2 + i, 3 + i, Player::Two);
        }
        assert!(check_win(&board, Position::new(2, 3), Player::Two).is_some());
    }

    #[test]
    fn test_first_axis_wins_without_merging() {
        let mut board = Board::default();
        // Horizontal and vertical both complete through (5, 3).
        for col in 0..4 {
            put(&mut board, 5, col, Player::One);
        }
        for row in 2..5 {
            put(&mut board, row, 3, Player::One);
        }
        let win = check_win(&board, Position::new(5, 3), Player::One).unwrap();
        assert!(win.iter().all(|p| p.row == 5));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::default();
        for col in 0..3 {
            put(&mut board, 5, col, Player::One);
        }
        put(&mut board, 5, 3, Player::Two);
        assert!(check_win(&board, Position::new(5, 1), Player::One).is_none());
    }

    #[test]
    fn test_wrong_player_or_empty_cell_never_wins() {
        let mut board = Board::default();
        for col in 0..4 {
            put(&mut board, 5, col, Player::One);
        }
        assert!(check_win(&board, Position::new(5, 0), Player::Two).is_none());
        assert!(check_win(&board, Position::new(0, 0), Player::One).is_none());
        assert!(check_win(&board, Position::new(9, 9), Player::One).is_none());
    }

    /// Brute force: is there a run of four through `pos` on any axis?
    fn has_run_through(board: &Board, pos: Position, player: Player) -> bool {
        AXES.iter().any(|&(dr, dc)| {
            (0..CONNECT as isize).any(|start| {
                (0..CONNECT as isize).all(|k| {
                    let step = k - start;
                    board
                        .offset(pos, dr * step, dc * step)
                        .is_some_and(|p| board.occupant(p.row, p.col) == Some(player))
                })
            })
        })
    }

    proptest! {
        #[test]
        fn prop_check_win_matches_brute_force(
            cells in proptest::collection::vec(0u8..3, 42),
            row in 0usize..6,
            col in 0usize..7,
        ) {
            let mut board = Board::default();
            for (i, v) in cells.iter().enumerate() {
                let player = match v {
                    1 => Player::One,
                    2 => Player::Two,
                    _ => continue,
                };
                board.place(Position::new(i / 7, i % 7), Disc::new(player, 0.0, DiscKind::Normal));
            }
            let pos = Position::new(row, col);
            let Some(player) = board.occupant(row, col) else {
                return Ok(());
            };
            let result = check_win(&board, pos, player);
            prop_assert_eq!(result.is_some(), has_run_through(&board, pos, player));
            if let Some(run) = result {
                prop_assert!(run.contains(&pos));
                for p in run {
                    prop_assert_eq!(board.occupant(p.row, p.col), Some(player));
                }
            }
        }
    }
}
