//! A canned gesture stream, for headless runs and tests.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use super::{Gesture, GestureFrame};
use crate::game::layout::{Layout, Point};
use crate::game::{Player, Position, TimingConfig};

/// One tick of scripted input: the clock reading and the sample, if a hand is visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedTick {
    pub now_ms: u64,
    #[serde(default)]
    pub frame: Option<GestureFrame>,
}

/// Builds a tick-by-tick gesture script on a fixed frame clock.
#[derive(Debug, Clone)]
pub struct GestureScript {
    frame_ms: u64,
    now_ms: u64,
    ticks: Vec<ScriptedTick>,
}

impl GestureScript {
    pub fn new(frame_ms: u64) -> Self {
        GestureScript {
            frame_ms: frame_ms.max(1),
            now_ms: 0,
            ticks: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn push(&mut self, frame: Option<GestureFrame>) {
        self.ticks.push(ScriptedTick {
            now_ms: self.now_ms,
            frame,
        });
        self.now_ms += self.frame_ms;
    }

    /// Show one hand at `palm` making `gesture` for at least `duration_ms`.
    pub fn hold(&mut self, gesture: Option<Gesture>, palm: Point, duration_ms: u64) -> &mut Self {
        let frames = duration_ms.div_ceil(self.frame_ms).max(1);
        for _ in 0..frames {
            let frame = GestureFrame::single(self.now_ms, palm, gesture);
            self.push(Some(frame));
        }
        self
    }

    /// A single frame with the hand at `palm`.
    pub fn tap(&mut self, gesture: Option<Gesture>, palm: Point) -> &mut Self {
        self.hold(gesture, palm, self.frame_ms)
    }

    /// No hand in view for `duration_ms`.
    pub fn lose_tracking(&mut self, duration_ms: u64) -> &mut Self {
        let frames = duration_ms.div_ceil(self.frame_ms).max(1);
        for _ in 0..frames {
            self.push(None);
        }
        self
    }

    /// Grab the disc waiting at `home`, carry it over `column_x` and let go.
    pub fn drop_disc(&mut self, home: Point, column_x: f32) -> &mut Self {
        let over = Point::new(column_x, home.y);
        self.tap(Some(Gesture::ClosedFist), home)
            .tap(Some(Gesture::ClosedFist), over)
            .tap(Some(Gesture::OpenPalm), over)
    }

    pub fn build(&self) -> Vec<ScriptedTick> {
        self.ticks.clone()
    }
}

/// Allowance for a disc to fall from above the board to the bottom row.
const FALL_ALLOWANCE_MS: u64 = 1500;

/// A short scripted game: Orange wins along the bottom row after Blue spends
/// its bomb in the far column. Ends while the result is still on screen.
pub fn demo_game(layout: &Layout, timing: &TimingConfig, frame_ms: u64) -> Vec<ScriptedTick> {
    let home = |player: Player| Point::new(layout.home_x(player), layout.cell_size() / 2.0);
    let column_x = |col: usize| layout.cell_center(Position::new(0, col)).x;
    let last_col = layout.cols().saturating_sub(1);

    let mut script = GestureScript::new(frame_ms);
    script.hold(
        Some(Gesture::ThumbUp),
        home(Player::One),
        timing.thumb_hold_ms + frame_ms,
    );

    script
        .drop_disc(home(Player::One), column_x(0))
        .lose_tracking(200);
    script
        .tap(Some(Gesture::Victory), home(Player::Two))
        .drop_disc(home(Player::Two), column_x(last_col))
        .hold(None, home(Player::One), FALL_ALLOWANCE_MS + timing.bomb_resume_ms);

    for (orange, blue) in [(1, 0), (2, 1)] {
        script
            .drop_disc(home(Player::One), column_x(orange))
            .drop_disc(home(Player::Two), column_x(blue));
    }
    script
        .drop_disc(home(Player::One), column_x(3))
        .hold(None, home(Player::Two), FALL_ALLOWANCE_MS + 1000);

    script.build()
}

/// Read a recording with one JSON [`ScriptedTick`] per line. Blank lines are skipped.
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<ScriptedTick>, serde_json::Error> {
    let mut ticks = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(serde_json::Error::io)?;
        if line.trim().is_empty() {
            continue;
        }
        ticks.push(serde_json::from_str(&line)?);
    }
    Ok(ticks)
}
