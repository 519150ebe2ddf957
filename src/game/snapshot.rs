use serde::Serialize;

use super::animation::AnimatingDisc;
use super::bomb::{Explosion, Movement};
use super::controller::{ActiveDisc, GameController, GameOutcome, Phase, PreviewDisc};
use super::layout::{Point, Viewport};
use super::{Cell, Player, Position};

/// Everything a renderer needs for one frame, detached from the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    /// Thumb-up progress on the landing screen, `[0, 1]`.
    pub landing_progress: f32,
    pub viewport: Viewport,
    pub board_origin: Point,
    pub cell_size: f32,
    pub rows: usize,
    pub cols: usize,
    /// Row-major, top row first. Empty on the landing screen.
    pub cells: Vec<Cell>,
    pub current_player: Player,
    /// Hidden once the game is over or while a bomb is going off.
    pub active: Option<ActiveDisc>,
    pub preview: Option<PreviewDisc>,
    pub falling: Vec<AnimatingDisc>,
    pub explosions: Vec<Explosion>,
    pub movements: Vec<Movement>,
    pub outcome: Option<GameOutcome>,
    pub winning: Vec<Position>,
    pub countdown_secs: Option<u32>,
    pub bombs: [u32; 2],
    pub bomb_selected: bool,
    pub input_suspended: bool,
}

impl GameSnapshot {
    pub fn capture(controller: &GameController) -> Self {
        let layout = controller.layout();
        let rows = controller.config().board.rows;
        let cols = controller.config().board.cols;
        let mut snapshot = GameSnapshot {
            phase: controller.phase(),
            landing_progress: controller.landing_progress(),
            viewport: layout.viewport(),
            board_origin: Point::new(layout.board_start_x(), layout.board_start_y()),
            cell_size: layout.cell_size(),
            rows,
            cols,
            cells: Vec::new(),
            current_player: Player::One,
            active: None,
            preview: None,
            falling: Vec::new(),
            explosions: Vec::new(),
            movements: Vec::new(),
            outcome: None,
            winning: Vec::new(),
            countdown_secs: controller.countdown_secs(),
            bombs: [0; 2],
            bomb_selected: false,
            input_suspended: false,
        };

        let Some(round) = controller.round() else {
            return snapshot;
        };
        let interactive = !round.is_over() && !round.input_suspended();
        snapshot.cells = round.board().cells().to_vec();
        snapshot.current_player = round.current_player();
        snapshot.active = interactive.then(|| *round.active_disc());
        snapshot.preview = if interactive { round.preview().copied() } else { None };
        snapshot.falling = round.falling().to_vec();
        snapshot.explosions = round.explosions().to_vec();
        snapshot.movements = round.movements().to_vec();
        snapshot.outcome = round.outcome();
        snapshot.winning = round.winning_positions().to_vec();
        snapshot.bombs = [round.bombs(Player::One), round.bombs(Player::Two)];
        snapshot.bomb_selected = round.bomb_selected();
        snapshot.input_suspended = round.input_suspended();
        snapshot
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    pub fn is_winning(&self, row: usize, col: usize) -> bool {
        self.winning.contains(&Position::new(row, col))
    }

    pub fn bombs_for(&self, player: Player) -> u32 {
        self.bombs[player.index()]
    }
}
