use serde::{Deserialize, Serialize};

use crate::game::layout::Point;

/// Hand shapes the recognizer can classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gesture {
    ClosedFist,
    OpenPalm,
    Victory,
    ThumbUp,
}

impl Gesture {
    /// Parse a recognizer category name. Unknown labels and "None" map to `None`.
    pub fn from_label(label: &str) -> Option<Gesture> {
        match label {
            "Closed_Fist" => Some(Gesture::ClosedFist),
            "Open_Palm" => Some(Gesture::OpenPalm),
            "Victory" | "Peace" => Some(Gesture::Victory),
            "Thumb_Up" => Some(Gesture::ThumbUp),
            _ => None,
        }
    }
}

/// One detected hand: palm position in screen units and its gesture, if classified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandSample {
    pub palm: Point,
    #[serde(default)]
    pub gesture: Option<Gesture>,
}

impl HandSample {
    pub fn new(palm: Point, gesture: Option<Gesture>) -> Self {
        HandSample { palm, gesture }
    }
}

/// Latest output of the gesture recognizer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureFrame {
    /// When the sample was taken, on the same clock as the frame tick.
    pub timestamp_ms: u64,
    #[serde(default)]
    pub hands: Vec<HandSample>,
}

impl GestureFrame {
    pub fn new(timestamp_ms: u64, hands: Vec<HandSample>) -> Self {
        GestureFrame {
            timestamp_ms,
            hands,
        }
    }

    pub fn single(timestamp_ms: u64, palm: Point, gesture: Option<Gesture>) -> Self {
        GestureFrame::new(timestamp_ms, vec![HandSample::new(palm, gesture)])
    }

    /// Gesture of the first detected hand.
    pub fn primary_gesture(&self) -> Option<Gesture> {
        self.hands.first().and_then(|hand| hand.gesture)
    }

    pub fn is_fresh(&self, now_ms: u64, window_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp_ms) <= window_ms
    }
}

/// Return the frame only if a hand is tracked: present, non-empty and fresh.
pub fn tracked(frame: Option<&GestureFrame>, now_ms: u64, window_ms: u64) -> Option<&GestureFrame> {
    frame.filter(|f| !f.hands.is_empty() && f.is_fresh(now_ms, window_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Gesture::from_label("Closed_Fist"), Some(Gesture::ClosedFist));
        assert_eq!(Gesture::from_label("Open_Palm"), Some(Gesture::OpenPalm));
        assert_eq!(Gesture::from_label("Peace"), Some(Gesture::Victory));
        assert_eq!(Gesture::from_label("Victory"), Some(Gesture::Victory));
        assert_eq!(Gesture::from_label("Thumb_Up"), Some(Gesture::ThumbUp));
        assert_eq!(Gesture::from_label("None"), None);
        assert_eq!(Gesture::from_label("Pointing_Up"), None);
    }

    #[test]
    fn test_tracking_requires_fresh_non_empty_frame() {
        let frame = GestureFrame::single(1_000, Point::new(0.0, 0.0), None);
        assert!(tracked(Some(&frame), 1_400, 500).is_some());
        assert!(tracked(Some(&frame), 1_500, 500).is_some());
        assert!(tracked(Some(&frame), 1_501, 500).is_none());
        assert!(tracked(None, 1_000, 500).is_none());

        let empty = GestureFrame::new(1_000, Vec::new());
        assert!(tracked(Some(&empty), 1_000, 500).is_none());
    }

    #[test]
    fn test_frame_parses_from_json() {
        let json = r#"{"timestamp_ms": 40, "hands": [{"palm": {"x": 1.0, "y": 2.0}, "gesture": "OpenPalm"}]}"#;
        let frame: GestureFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.primary_gesture(), Some(Gesture::OpenPalm));
        assert_eq!(frame.hands[0].palm, Point::new(1.0, 2.0));
    }
}
