use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, layout::Rect, Terminal};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::hand::SimulatedHand;
use crate::config::AppConfig;
use crate::game::layout::{Point, Viewport};
use crate::game::{GameController, GameEvent, SoundCue};

/// Terminal front-end settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Frame interval for the redraw and tick loop.
    pub frame_ms: u64,
    /// Screen units per terminal column.
    pub units_per_column: f32,
    /// Screen units per terminal row. Twice the column figure keeps circles round.
    pub units_per_row: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            frame_ms: 16,
            units_per_column: 10.0,
            units_per_row: 20.0,
        }
    }
}

pub struct App {
    controller: GameController,
    config: UiConfig,
    hand: SimulatedHand,
    last_cue: Option<SoundCue>,
    message: Option<String>,
    should_quit: bool,
}

impl App {
    /// `area` is the full terminal; the game viewport is derived from it.
    pub fn new(config: &AppConfig, area: Rect, seed: Option<u64>) -> Self {
        let viewport = viewport_for(area, &config.ui);
        let controller = match seed {
            Some(seed) => GameController::with_seed(config.game.clone(), viewport, seed),
            None => GameController::new(config.game.clone(), viewport),
        };
        let hand = SimulatedHand::new(Point::new(viewport.width / 2.0, viewport.height / 2.0));
        App {
            controller,
            config: config.ui.clone(),
            hand,
            last_cue: None,
            message: None,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn hand(&self) -> &SimulatedHand {
        &self.hand
    }

    pub fn last_cue(&self) -> Option<SoundCue> {
        self.last_cue
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let started = Instant::now();
        let frame = Duration::from_millis(self.config.frame_ms);
        loop {
            let now_ms = started.elapsed().as_millis() as u64;
            self.step(now_ms);

            terminal
                .draw(|f| self.render(f))
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

            if self.should_quit {
                break;
            }

            self.handle_events(frame)?;
        }
        Ok(())
    }

    /// Sample the hand, advance the game one frame and react to what happened.
    pub fn step(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let frame = self.hand.sample(now_ms);
        let events = self.controller.tick(now_ms, frame.as_ref());
        for event in &events {
            if let Some(cue) = event.sound_cue() {
                info!(cue = cue.name(), "sound");
                self.last_cue = Some(cue);
            }
            match event {
                GameEvent::GameStarted => {
                    self.message = Some("Game on! Grab your disc with a fist.".to_string());
                }
                GameEvent::GameWon { player, .. } => {
                    self.message = Some(format!("{} wins!", player.name()));
                }
                GameEvent::GameDrawn => {
                    self.message = Some("It's a draw!".to_string());
                }
                GameEvent::ReturnedToLanding => {
                    self.message = None;
                    self.last_cue = None;
                }
                _ => {}
            }
        }
        events
    }

    /// Handle terminal events
    fn handle_events(&mut self, timeout: Duration) -> io::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Event::Resize(width, height) => self.resize(Rect::new(0, 0, width, height)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        let layout = *self.controller.layout();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('g') => {
                // Jump to the waiting disc.
                if let Some(round) = self.controller.round() {
                    self.hand.palm = round.active_disc().position;
                }
            }
            code => {
                let step = layout.cell_size() / 2.0;
                self.hand.handle_key(code, step.max(1.0), layout.viewport());
            }
        }
    }

    /// The terminal changed size; the game in progress starts over.
    pub fn resize(&mut self, area: Rect) {
        let viewport = viewport_for(area, &self.config);
        self.controller.resize(viewport);
        self.hand.palm.x = self.hand.palm.x.min(viewport.width);
        self.hand.palm.y = self.hand.palm.y.min(viewport.height);
        self.message = None;
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let snapshot = self.controller.snapshot();
        super::game_view::render(frame, &snapshot, &self.hand, self.last_cue, &self.message);
    }
}

/// Screen units covered by the canvas for a terminal of `area`.
pub fn viewport_for(area: Rect, config: &UiConfig) -> Viewport {
    let canvas = super::game_view::canvas_area(area);
    Viewport::new(
        canvas.width as f32 * config.units_per_column,
        canvas.height as f32 * config.units_per_row,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Phase, Player};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn new_app() -> App {
        App::new(&AppConfig::default(), Rect::new(0, 0, 80, 50), Some(3))
    }

    /// Tick on a 16ms clock for `duration` ms; returns the next clock reading.
    fn run_for(app: &mut App, from: u64, duration: u64) -> (u64, Vec<GameEvent>) {
        let mut now = from;
        let mut events = Vec::new();
        while now < from + duration {
            events.extend(app.step(now));
            now += 16;
        }
        (now, events)
    }

    #[test]
    fn test_viewport_follows_terminal_size() {
        let config = UiConfig::default();
        let small = viewport_for(Rect::new(0, 0, 40, 30), &config);
        let large = viewport_for(Rect::new(0, 0, 120, 60), &config);
        assert!(large.width > small.width);
        assert!(large.height > small.height);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = new_app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());

        let mut app = new_app();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_thumb_up_starts_game() {
        let mut app = new_app();
        app.handle_key(key(KeyCode::Char('t')));
        let (_, events) = run_for(&mut app, 0, 2100);
        assert!(events.contains(&GameEvent::GameStarted));
        assert_eq!(app.controller().phase(), Phase::Playing);
        assert_eq!(app.last_cue(), Some(SoundCue::GameStarted));
        assert!(app.message().is_some());
    }

    #[test]
    fn test_keyboard_drop() {
        let mut app = new_app();
        app.handle_key(key(KeyCode::Char('t')));
        let (now, _) = run_for(&mut app, 0, 2100);

        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Char('f')));
        let (now, events) = run_for(&mut app, now, 48);
        assert!(events.contains(&GameEvent::DiscGrabbed { player: Player::One }));

        app.handle_key(key(KeyCode::Char(' ')));
        let (_, events) = run_for(&mut app, now, 16);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::DiscDropped { player: Player::One, .. })));
        let round = app.controller().round().unwrap();
        assert_eq!(round.current_player(), Player::Two);
        assert_eq!(round.falling().len(), 1);
    }

    #[test]
    fn test_resize_restarts_round() {
        let mut app = new_app();
        app.handle_key(key(KeyCode::Char('t')));
        let (now, _) = run_for(&mut app, 0, 2100);
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Char('f')));
        let _ = run_for(&mut app, now, 32);
        assert!(app.controller().round().unwrap().active_disc().grabbed);

        app.resize(Rect::new(0, 0, 100, 60));
        assert_eq!(app.controller().phase(), Phase::Playing);
        assert!(!app.controller().round().unwrap().active_disc().grabbed);
    }

    #[test]
    fn test_hidden_hand_stalls_landing() {
        let mut app = new_app();
        app.handle_key(key(KeyCode::Char('t')));
        app.handle_key(key(KeyCode::Char('h')));
        let _ = run_for(&mut app, 0, 3000);
        assert_eq!(app.controller().phase(), Phase::Landing);
        assert_eq!(app.controller().landing_progress(), 0.0);
    }
}
