//! Turn and game flow: landing screen, play, game over, back to landing.
//!
//! The controller is the only writer of board and turn state. Everything
//! happens inside [`GameController::tick`] or the input entry points it calls,
//! so there is never more than one mutation in flight.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::animation::{AnimatingDisc, DropState};
use super::bomb::{self, Explosion, Movement};
use super::layout::{Layout, Point, Viewport};
use super::snapshot::GameSnapshot;
use super::win::check_win;
use super::{Board, DiscKind, GameEvent, Player, Position};
use crate::config::GameConfig;
use crate::error::MoveError;
use crate::input::{tracked, Gesture, GestureFrame, ToggleDebounce};

/// Durations that gate the flow of a game, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long a thumb-up must be held on the landing screen.
    pub thumb_hold_ms: u64,
    /// How long the result stays up before returning to the landing screen.
    pub win_display_ms: u64,
    /// Delay between a bomb blast and the column collapse.
    pub bomb_gravity_delay_ms: u64,
    /// Delay between a bomb blast and input being accepted again.
    pub bomb_resume_ms: u64,
    /// Samples older than this count as tracking lost.
    pub tracking_freshness_ms: u64,
    pub toggle_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            thumb_hold_ms: 2000,
            win_display_ms: 10_000,
            bomb_gravity_delay_ms: 1000,
            bomb_resume_ms: 2000,
            tracking_freshness_ms: 500,
            toggle_debounce_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Bomb charges each player starts a game with.
    pub starting_bombs: u32,
    /// A grab must land within this many disc radii of the waiting disc.
    pub grab_radius_factor: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            starting_bombs: 1,
            grab_radius_factor: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Landing,
    Playing,
}

/// The disc the current player can grab and drop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveDisc {
    pub position: Point,
    pub radius: f32,
    pub player: Player,
    pub kind: DiscKind,
    pub grabbed: bool,
}

/// Where the held disc would land if released now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewDisc {
    pub position: Point,
    pub cell: Position,
    pub radius: f32,
    pub player: Player,
    pub kind: DiscKind,
}

/// Timer running after a bomb lands; input stays locked until it ends.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BombSequence {
    elapsed_ms: f32,
    gravity_applied: bool,
}

/// Everything that belongs to one game. Built fresh for every game so
/// nothing leaks from the previous one.
#[derive(Debug, Clone)]
pub struct Round {
    board: Board,
    current: Player,
    active: ActiveDisc,
    preview: Option<PreviewDisc>,
    falling: Vec<AnimatingDisc>,
    explosions: Vec<Explosion>,
    outcome: Option<GameOutcome>,
    winning: Vec<Position>,
    win_timer_ms: f32,
    bombs: [u32; 2],
    bomb_selected: bool,
    bomb_sequence: Option<BombSequence>,
    movements: Vec<Movement>,
}

impl Round {
    fn new(config: &GameConfig, layout: &Layout) -> Self {
        let first = Player::One;
        Round {
            board: Board::new(config.board.rows, config.board.cols),
            current: first,
            active: ActiveDisc {
                position: Point::new(layout.home_x(first), layout.cell_size() / 2.0),
                radius: layout.disc_radius(),
                player: first,
                kind: DiscKind::Normal,
                grabbed: false,
            },
            preview: None,
            falling: Vec::new(),
            explosions: Vec::new(),
            outcome: None,
            winning: Vec::new(),
            win_timer_ms: 0.0,
            bombs: [config.rules.starting_bombs; 2],
            bomb_selected: false,
            bomb_sequence: None,
            movements: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn active_disc(&self) -> &ActiveDisc {
        &self.active
    }

    pub fn preview(&self) -> Option<&PreviewDisc> {
        self.preview.as_ref()
    }

    pub fn falling(&self) -> &[AnimatingDisc] {
        &self.falling
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winning_positions(&self) -> &[Position] {
        &self.winning
    }

    pub fn win_timer_ms(&self) -> f32 {
        self.win_timer_ms
    }

    pub fn bombs(&self, player: Player) -> u32 {
        self.bombs[player.index()]
    }

    pub fn bomb_selected(&self) -> bool {
        self.bomb_selected
    }

    /// True while a bomb's aftermath is playing out and gestures are ignored.
    pub fn input_suspended(&self) -> bool {
        self.bomb_sequence.is_some()
    }

    /// Moves from the most recent column collapse.
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Lowest free cell in a column, skipping cells already claimed by a falling disc.
    fn landing_cell(&self, col: usize) -> Option<Position> {
        if !self.board.is_valid_column(col) {
            return None;
        }
        (0..self.board.rows())
            .rev()
            .map(|row| Position::new(row, col))
            .find(|&pos| {
                self.board.is_empty_at(pos.row, pos.col)
                    && !self.falling.iter().any(|disc| disc.cell == pos)
            })
    }

    /// The cell is free and has a disc beneath it, or one on its way there.
    fn can_rest_at(&self, pos: Position) -> bool {
        if !self.board.is_empty_at(pos.row, pos.col) {
            return false;
        }
        let below = Position::new(pos.row + 1, pos.col);
        self.board.is_supported(pos.row, pos.col)
            || self.falling.iter().any(|disc| disc.cell == below)
    }

    fn check_accepting_input(&self) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if self.input_suspended() {
            return Err(MoveError::InputSuspended);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum GameState {
    Landing { thumb_hold_ms: f32 },
    Playing(Box<Round>),
}

pub struct GameController {
    config: GameConfig,
    layout: Layout,
    state: GameState,
    rng: StdRng,
    debounce: ToggleDebounce,
    last_tick_ms: Option<u64>,
}

impl GameController {
    /// Create a controller on the landing screen, seeding disc spin from the OS.
    pub fn new(config: GameConfig, viewport: Viewport) -> Self {
        Self::with_rng(config, viewport, StdRng::from_os_rng())
    }

    /// Create a controller with a reproducible spin sequence.
    pub fn with_seed(config: GameConfig, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(config, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, viewport: Viewport, rng: StdRng) -> Self {
        let layout = Layout::new(viewport, config.board.rows, config.board.cols);
        let debounce = ToggleDebounce::new(config.timing.toggle_debounce_ms);
        GameController {
            config,
            layout,
            state: GameState::Landing { thumb_hold_ms: 0.0 },
            rng,
            debounce,
            last_tick_ms: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            GameState::Landing { .. } => Phase::Landing,
            GameState::Playing(_) => Phase::Playing,
        }
    }

    /// The game in progress, if any.
    pub fn round(&self) -> Option<&Round> {
        match &self.state {
            GameState::Playing(round) => Some(round.as_ref()),
            GameState::Landing { .. } => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn round_mut(&mut self) -> Option<&mut Round> {
        match &mut self.state {
            GameState::Playing(round) => Some(round.as_mut()),
            GameState::Landing { .. } => None,
        }
    }

    fn playing(&mut self) -> Result<&mut Round, MoveError> {
        match &mut self.state {
            GameState::Playing(round) => Ok(round.as_mut()),
            GameState::Landing { .. } => Err(MoveError::NotPlaying),
        }
    }

    /// Thumb-up progress on the landing screen, in `[0, 1]`.
    pub fn landing_progress(&self) -> f32 {
        match self.state {
            GameState::Landing { thumb_hold_ms } => {
                let required = self.config.timing.thumb_hold_ms.max(1) as f32;
                (thumb_hold_ms / required).min(1.0)
            }
            GameState::Playing(_) => 1.0,
        }
    }

    /// Whole seconds left on the game-over display.
    pub fn countdown_secs(&self) -> Option<u32> {
        let round = self.round()?;
        if round.outcome.is_none() {
            return None;
        }
        let left = self.config.timing.win_display_ms as f32 - round.win_timer_ms;
        Some((left / 1000.0).ceil().max(0.0) as u32)
    }

    /// Begin a fresh game, whatever the current phase.
    pub fn start_game(&mut self) -> GameEvent {
        self.state = GameState::Playing(Box::new(Round::new(&self.config, &self.layout)));
        info!("game started");
        GameEvent::GameStarted
    }

    /// Throw away the current game and go back to the landing screen.
    pub fn return_to_landing(&mut self) {
        self.state = GameState::Landing { thumb_hold_ms: 0.0 };
    }

    /// Adopt a new viewport. A game in progress restarts from scratch.
    pub fn resize(&mut self, viewport: Viewport) {
        self.layout = Layout::new(viewport, self.config.board.rows, self.config.board.cols);
        if let GameState::Playing(_) = self.state {
            info!(width = viewport.width, height = viewport.height, "viewport changed, restarting game");
            self.state = GameState::Playing(Box::new(Round::new(&self.config, &self.layout)));
        }
    }

    /// Advance one frame.
    ///
    /// `frame` is the most recent recognizer output, which may be stale or
    /// missing; either counts as tracking lost.
    pub fn tick(&mut self, now_ms: u64, frame: Option<&GestureFrame>) -> Vec<GameEvent> {
        let dt = self
            .last_tick_ms
            .map_or(0, |last| now_ms.saturating_sub(last)) as f32;
        self.last_tick_ms = Some(now_ms);

        let frame = tracked(frame, now_ms, self.config.timing.tracking_freshness_ms);
        let mut events = Vec::new();

        match self.state {
            GameState::Landing { .. } => self.tick_landing(dt, frame, &mut events),
            GameState::Playing(_) => self.tick_playing(now_ms, dt, frame, &mut events),
        }

        for event in &events {
            trace!(?event, "game event");
        }
        events
    }

    fn tick_landing(&mut self, dt: f32, frame: Option<&GestureFrame>, events: &mut Vec<GameEvent>) {
        let GameState::Landing { thumb_hold_ms } = &mut self.state else {
            return;
        };
        if frame.and_then(GestureFrame::primary_gesture) == Some(Gesture::ThumbUp) {
            *thumb_hold_ms += dt;
            if *thumb_hold_ms >= self.config.timing.thumb_hold_ms as f32 {
                events.push(self.start_game());
            }
        } else {
            *thumb_hold_ms = 0.0;
        }
    }

    fn tick_playing(
        &mut self,
        now_ms: u64,
        dt: f32,
        frame: Option<&GestureFrame>,
        events: &mut Vec<GameEvent>,
    ) {
        self.advance_effects(dt, events);
        self.advance_falling(events);

        let accepting = self
            .round()
            .is_some_and(|round| round.check_accepting_input().is_ok());
        if accepting {
            self.process_gestures(now_ms, frame, events);
        }

        let display_ms = self.config.timing.win_display_ms as f32;
        let expired = match self.playing() {
            Ok(round) if round.outcome.is_some() => {
                round.win_timer_ms += dt;
                round.win_timer_ms >= display_ms
            }
            _ => false,
        };
        if expired {
            info!("result display finished, back to landing");
            self.return_to_landing();
            events.push(GameEvent::ReturnedToLanding);
        }
    }

    /// Explosions and the post-bomb timer.
    fn advance_effects(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let GameState::Playing(round) = &mut self.state else {
            return;
        };
        let explosion_config = &self.config.explosion;
        round
            .explosions
            .retain_mut(|explosion| explosion.update(dt, explosion_config));

        let Some(mut sequence) = round.bomb_sequence else {
            return;
        };
        sequence.elapsed_ms += dt;
        if !sequence.gravity_applied
            && sequence.elapsed_ms >= self.config.timing.bomb_gravity_delay_ms as f32
        {
            let movements = bomb::compact(&mut round.board, &self.layout);
            debug!(moved = movements.len(), "columns collapsed after blast");
            round.movements = movements.clone();
            sequence.gravity_applied = true;
            events.push(GameEvent::GravityApplied { movements });
        }
        if sequence.elapsed_ms >= self.config.timing.bomb_resume_ms as f32 {
            round.bomb_sequence = None;
            events.push(GameEvent::InputResumed);
        } else {
            round.bomb_sequence = Some(sequence);
        }
    }

    /// Step every falling disc and commit the ones that arrived.
    fn advance_falling(&mut self, events: &mut Vec<GameEvent>) {
        let GameState::Playing(round) = &mut self.state else {
            return;
        };
        // Walk backwards so removal never skips a disc.
        let mut i = round.falling.len();
        while i > 0 {
            i -= 1;
            if round.falling[i].step(&self.config.physics) == DropState::Settled {
                let disc = round.falling.remove(i);
                settle_disc(round, disc, &self.config, &self.layout, events);
            }
        }

        if round.outcome.is_none() && round.falling.is_empty() && round.board.is_full() {
            info!("board full, game drawn");
            round.outcome = Some(GameOutcome::Draw);
            events.push(GameEvent::GameDrawn);
        }
    }

    fn process_gestures(
        &mut self,
        now_ms: u64,
        frame: Option<&GestureFrame>,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(frame) = frame else {
            if let Ok(round) = self.playing() {
                if round.active.grabbed {
                    debug!("tracking lost, releasing held disc");
                    round.active.grabbed = false;
                    round.preview = None;
                }
            }
            return;
        };

        for hand in &frame.hands {
            let toggle = self.debounce.observe(now_ms, hand.gesture);
            if let Some(gesture) = hand.gesture {
                let result = match gesture {
                    Gesture::ClosedFist => self.grab(hand.palm).map(Some),
                    Gesture::OpenPalm => {
                        let column = self.layout.column_at(hand.palm.x);
                        self.release(column).map(Some)
                    }
                    Gesture::Victory if toggle => self.toggle_bomb().map(Some),
                    Gesture::Victory | Gesture::ThumbUp => Ok(None),
                };
                match result {
                    Ok(Some(event)) => events.push(event),
                    Ok(None) => {}
                    Err(err) => trace!(?gesture, %err, "gesture ignored"),
                }
            }

            let grabbed = self.round().is_some_and(|round| round.active.grabbed);
            if grabbed {
                let _ = self.move_hand(hand.palm);
            }
        }
    }

    /// Close the hand at `palm`. Picks up the waiting disc if it is within reach.
    pub fn grab(&mut self, palm: Point) -> Result<GameEvent, MoveError> {
        let reach = self.config.rules.grab_radius_factor;
        let round = self.playing()?;
        round.check_accepting_input()?;
        if round.active.grabbed {
            return Err(MoveError::AlreadyGrabbed);
        }
        if palm.distance(round.active.position) >= round.active.radius * reach {
            return Err(MoveError::OutOfReach);
        }
        round.active.grabbed = true;
        debug!(player = round.current.name(), "disc grabbed");
        Ok(GameEvent::DiscGrabbed {
            player: round.current,
        })
    }

    /// Follow the hand with the held disc and refresh the landing preview.
    pub fn move_hand(&mut self, palm: Point) -> Result<(), MoveError> {
        let column = self.layout.column_at(palm.x);
        let cell_size = self.layout.cell_size();
        let layout = self.layout;
        let round = self.playing()?;
        if !round.active.grabbed {
            return Err(MoveError::NotGrabbed);
        }
        // The disc stays above the board while carried.
        round.active.position = Point::new(palm.x, palm.y.min(cell_size));
        round.preview = column.and_then(|col| round.landing_cell(col)).map(|cell| PreviewDisc {
            position: layout.cell_center(cell),
            cell,
            radius: round.active.radius,
            player: round.current,
            kind: round.active.kind,
        });
        Ok(())
    }

    /// Open the hand over `column`. Drops the held disc if the column has room;
    /// otherwise the disc is just let go.
    pub fn release(&mut self, column: Option<usize>) -> Result<GameEvent, MoveError> {
        let layout = self.layout;
        let GameState::Playing(round) = &mut self.state else {
            return Err(MoveError::NotPlaying);
        };
        round.check_accepting_input()?;
        if !round.active.grabbed {
            return Err(MoveError::NotGrabbed);
        }
        round.active.grabbed = false;
        round.preview = None;

        let col = column.ok_or(MoveError::InvalidColumn)?;
        if !round.board.is_valid_column(col) {
            return Err(MoveError::InvalidColumn);
        }
        let cell = round.landing_cell(col).ok_or(MoveError::ColumnFull)?;

        let player = round.current;
        let kind = round.active.kind;
        let disc = AnimatingDisc::new(
            round.active.position,
            cell,
            layout.cell_center(cell),
            layout.disc_radius(),
            player,
            kind,
            &self.config.physics,
            &mut self.rng,
        );
        round.falling.push(disc);

        if kind == DiscKind::Bomb {
            let charges = &mut round.bombs[player.index()];
            *charges = charges.saturating_sub(1);
        }
        debug!(player = player.name(), ?cell, ?kind, "disc dropped");

        // Hand over to the other player.
        let next = player.other();
        round.current = next;
        round.bomb_selected = false;
        round.active = ActiveDisc {
            position: Point::new(layout.home_x(next), layout.disc_radius() + 5.0),
            radius: layout.disc_radius(),
            player: next,
            kind: DiscKind::Normal,
            grabbed: false,
        };

        Ok(GameEvent::DiscDropped {
            player,
            target: cell,
            kind,
        })
    }

    /// Flip the waiting disc between normal and bomb.
    pub fn toggle_bomb(&mut self) -> Result<GameEvent, MoveError> {
        let round = self.playing()?;
        round.check_accepting_input()?;
        if round.active.grabbed {
            return Err(MoveError::AlreadyGrabbed);
        }
        if round.bombs(round.current) == 0 {
            return Err(MoveError::NoBombs);
        }
        round.bomb_selected = !round.bomb_selected;
        round.active.kind = if round.bomb_selected {
            DiscKind::Bomb
        } else {
            DiscKind::Normal
        };
        if let Some(preview) = round.preview.as_mut() {
            preview.kind = round.active.kind;
        }
        Ok(GameEvent::BombToggled {
            player: round.current,
            armed: round.bomb_selected,
        })
    }

    /// Read-only view for renderers.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}

/// Commit a disc that reached its cell, then run the blast or the win check.
fn settle_disc(
    round: &mut Round,
    mut disc: AnimatingDisc,
    config: &GameConfig,
    layout: &Layout,
    events: &mut Vec<GameEvent>,
) {
    let settled = disc.settle();
    let target = disc.cell;

    // A blast can reshape the column while a disc is in the air; if the
    // planned cell no longer works, land on whatever the column offers now.
    let cell = if round.can_rest_at(target) {
        Some(target)
    } else {
        round
            .board
            .landing_row(target.col)
            .map(|row| Position::new(row, target.col))
    };
    let Some(cell) = cell else {
        warn!(?target, "column filled while disc was falling, disc discarded");
        return;
    };
    if cell != target {
        warn!(?target, ?cell, "landing cell changed while disc was falling");
    }

    round.board.place(cell, settled);
    debug!(player = settled.player.name(), ?cell, kind = ?settled.kind, "disc settled");
    events.push(GameEvent::DiscSettled {
        player: settled.player,
        position: cell,
        kind: settled.kind,
    });

    match settled.kind {
        DiscKind::Bomb => {
            let cleared = bomb::blast(&mut round.board, cell);
            info!(?cell, cleared = cleared.len(), "bomb exploded");
            round.explosions.push(Explosion::new(
                layout.cell_center(cell),
                settled.player,
                &config.explosion,
            ));
            round.movements.clear();
            round.bomb_sequence = Some(BombSequence {
                elapsed_ms: 0.0,
                gravity_applied: false,
            });
            events.push(GameEvent::BombExploded {
                player: settled.player,
                position: cell,
                cleared,
            });
        }
        DiscKind::Normal => {
            if round.outcome.is_some() {
                return;
            }
            if let Some(positions) = check_win(&round.board, cell, settled.player) {
                info!(winner = settled.player.name(), "game won");
                round.outcome = Some(GameOutcome::Winner(settled.player));
                round.winning = positions.clone();
                round.active.grabbed = false;
                round.preview = None;
                events.push(GameEvent::GameWon {
                    player: settled.player,
                    positions,
                });
            }
        }
    }
}
