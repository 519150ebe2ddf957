use crossterm::event::KeyCode;

use crate::game::layout::{Point, Viewport};
use crate::input::{Gesture, GestureFrame};

/// Keyboard stand-in for the hand tracker.
///
/// The gesture is sticky: it is reported every frame until another gesture
/// key is pressed, the same way a real hand keeps its pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedHand {
    pub palm: Point,
    pub gesture: Option<Gesture>,
    pub visible: bool,
}

impl SimulatedHand {
    pub fn new(palm: Point) -> Self {
        SimulatedHand {
            palm,
            gesture: None,
            visible: true,
        }
    }

    /// Apply a key press. Returns false if the key is not a hand control.
    pub fn handle_key(&mut self, code: KeyCode, step: f32, viewport: Viewport) -> bool {
        match code {
            KeyCode::Left => self.palm.x -= step,
            KeyCode::Right => self.palm.x += step,
            KeyCode::Up => self.palm.y -= step,
            KeyCode::Down => self.palm.y += step,
            KeyCode::Char('f') => self.gesture = Some(Gesture::ClosedFist),
            KeyCode::Char(' ') => self.gesture = Some(Gesture::OpenPalm),
            KeyCode::Char('v') => self.gesture = Some(Gesture::Victory),
            KeyCode::Char('t') => self.gesture = Some(Gesture::ThumbUp),
            KeyCode::Char('n') => self.gesture = None,
            KeyCode::Char('h') => self.visible = !self.visible,
            _ => return false,
        }
        self.palm.x = self.palm.x.clamp(0.0, viewport.width);
        self.palm.y = self.palm.y.clamp(0.0, viewport.height);
        true
    }

    /// What the tracker would report right now; nothing while the hand is hidden.
    pub fn sample(&self, now_ms: u64) -> Option<GestureFrame> {
        self.visible
            .then(|| GestureFrame::single(now_ms, self.palm, self.gesture))
    }

    pub fn label(&self) -> &'static str {
        if !self.visible {
            return "hidden";
        }
        match self.gesture {
            Some(Gesture::ClosedFist) => "fist",
            Some(Gesture::OpenPalm) => "open palm",
            Some(Gesture::Victory) => "victory",
            Some(Gesture::ThumbUp) => "thumb up",
            None => "no gesture",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_keys_are_sticky() {
        let mut hand = SimulatedHand::new(Point::new(100.0, 100.0));
        let viewport = Viewport::default();
        assert!(hand.handle_key(KeyCode::Char('f'), 10.0, viewport));
        assert_eq!(hand.gesture, Some(Gesture::ClosedFist));
        assert!(hand.handle_key(KeyCode::Left, 10.0, viewport));
        assert_eq!(hand.gesture, Some(Gesture::ClosedFist));
        assert_eq!(hand.palm, Point::new(90.0, 100.0));
    }

    #[test]
    fn test_movement_is_clamped_to_viewport() {
        let mut hand = SimulatedHand::new(Point::new(5.0, 795.0));
        let viewport = Viewport::default();
        hand.handle_key(KeyCode::Left, 50.0, viewport);
        hand.handle_key(KeyCode::Down, 50.0, viewport);
        assert_eq!(hand.palm, Point::new(0.0, 800.0));
    }

    #[test]
    fn test_hidden_hand_reports_nothing() {
        let mut hand = SimulatedHand::new(Point::new(1.0, 1.0));
        assert!(hand.sample(10).is_some());
        hand.handle_key(KeyCode::Char('h'), 1.0, Viewport::default());
        assert!(hand.sample(10).is_none());
        assert_eq!(hand.label(), "hidden");
    }

    #[test]
    fn test_sample_carries_gesture_and_time() {
        let mut hand = SimulatedHand::new(Point::new(1.0, 2.0));
        hand.handle_key(KeyCode::Char('t'), 1.0, Viewport::default());
        let frame = hand.sample(42).unwrap();
        assert_eq!(frame.timestamp_ms, 42);
        assert_eq!(frame.primary_gesture(), Some(Gesture::ThumbUp));
    }

    #[test]
    fn test_unknown_key_is_not_consumed() {
        let mut hand = SimulatedHand::new(Point::default());
        assert!(!hand.handle_key(KeyCode::Char('x'), 1.0, Viewport::default()));
    }
}
