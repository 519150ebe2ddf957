use super::Gesture;

/// Gate for the victory-sign bomb toggle.
///
/// A toggle fires only when more than `window_ms` has passed since the last
/// one *and* the previously seen label was something other than victory,
/// so holding the sign never re-fires. A tracked hand with no recognised
/// gesture counts as a label of its own.
#[derive(Debug, Clone)]
pub struct ToggleDebounce {
    window_ms: u64,
    last_fired_ms: Option<u64>,
    last_gesture: Option<Gesture>,
}

impl ToggleDebounce {
    pub fn new(window_ms: u64) -> Self {
        ToggleDebounce {
            window_ms,
            last_fired_ms: None,
            last_gesture: None,
        }
    }

    /// Feed the label of a tracked hand. Returns true when it should toggle the bomb.
    pub fn observe(&mut self, now_ms: u64, gesture: Option<Gesture>) -> bool {
        let fire = gesture == Some(Gesture::Victory)
            && self.last_gesture != Some(Gesture::Victory)
            && self
                .last_fired_ms
                .map_or(true, |last| now_ms.saturating_sub(last) > self.window_ms);
        if fire {
            self.last_fired_ms = Some(now_ms);
        }
        self.last_gesture = gesture;
        fire
    }
}
