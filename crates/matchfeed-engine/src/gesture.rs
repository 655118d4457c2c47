use serde::{Deserialize, Serialize};

/// Fraction of the viewport a released drag must cover to count as a swipe
pub const SWIPE_THRESHOLD_RATIO: f64 = 0.2;

/// Maximum gap between two taps of a double tap
pub const DOUBLE_TAP_DELAY_MS: u64 = 250;

/// Vertical swipe on the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Swipe {
    /// Finger moved up: next card
    Up,
    /// Finger moved down: previous card
    Down,
}

impl Swipe {
    /// Classify a released vertical drag. `dy` is positive downwards.
    pub fn from_drag(dy: f64, viewport_height: f64) -> Option<Self> {
        if !dy.is_finite() || dy.abs() <= viewport_height * SWIPE_THRESHOLD_RATIO {
            return None;
        }
        if dy > 0.0 { Some(Swipe::Down) } else { Some(Swipe::Up) }
    }

    /// Parse the compact `u`/`d` notation used by replay scripts
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'u' => Some(Swipe::Up),
            'd' => Some(Swipe::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tap {
    Single,
    Double,
}

/// Pairs taps into double taps by timestamp.
///
/// A tap that completes a double tap is consumed, so a third quick tap
/// starts a new pair instead of forming another double with the second.
#[derive(Debug, Clone, Default)]
pub struct TapDetector {
    last_tap_ms: Option<u64>,
}

impl TapDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tap completing a double tap is consumed on purpose: three quick
    /// taps yield one double tap, not two.
    pub fn tap(&mut self, at_ms: u64) -> Tap {
        match self.last_tap_ms {
            Some(last) if at_ms.saturating_sub(last) < DOUBLE_TAP_DELAY_MS => {
                self.last_tap_ms = None;
                Tap::Double
            }
            _ => {
                self.last_tap_ms = Some(at_ms);
                Tap::Single
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_tap_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_threshold() {
        assert_eq!(Swipe::from_drag(150.0, 1000.0), None);
        assert_eq!(Swipe::from_drag(200.0, 1000.0), None);
        assert_eq!(Swipe::from_drag(201.0, 1000.0), Some(Swipe::Down));
        assert_eq!(Swipe::from_drag(-450.0, 1000.0), Some(Swipe::Up));
        assert_eq!(Swipe::from_drag(f64::NAN, 1000.0), None);
    }

    #[test]
    fn test_double_tap_window() {
        let mut detector = TapDetector::new();
        assert_eq!(detector.tap(1_000), Tap::Single);
        assert_eq!(detector.tap(1_200), Tap::Double);
        assert_eq!(detector.tap(1_300), Tap::Single);
        assert_eq!(detector.tap(1_600), Tap::Single);
        assert_eq!(detector.tap(1_849), Tap::Double);
    }
}
