//! Fingertip points and swipe classification.

// ════════════════════════════════════════════════════════════════════════════
// Point
// ════════════════════════════════════════════════════════════════════════════

/// A position in frame pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Map a normalised landmark (0.0–1.0 on both axes) into a
    /// `width × height` frame.  Coordinates are truncated to whole pixels.
    pub fn from_normalized(nx: f32, ny: f32, width: usize, height: usize) -> Self {
        Point {
            x: (nx * width as f32).trunc(),
            y: (ny * height as f32).trunc(),
        }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureTracker
// ════════════════════════════════════════════════════════════════════════════

/// Thresholds for [`GestureTracker`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Minimum inter-frame displacement (pixels) that counts as a swipe.
    /// The comparison is strict: a move of exactly this length is not a swipe.
    pub swipe_threshold: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig { swipe_threshold: 40.0 }
    }
}

/// Classifies each frame as swipe / not-swipe from the fingertip movement
/// since the previous frame.
///
/// The tracker always remembers exactly the previous frame's reading.  An
/// absent reading clears the baseline, so the first present reading after a
/// gap never registers as a swipe.
#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    config:   TrackerConfig,
    previous: Option<Point>,
}

impl GestureTracker {
    pub fn new(config: TrackerConfig) -> Self {
        GestureTracker { config, previous: None }
    }

    /// Feed this frame's reading; returns `true` if it is a swipe frame.
    pub fn update(&mut self, current: Option<Point>) -> bool {
        let swipe = match (self.previous, current) {
            (Some(prev), Some(cur)) => prev.distance(&cur) > self.config.swipe_threshold,
            _ => false,
        };
        self.previous = current;
        swipe
    }

    /// Reading passed to the most recent [`update`](Self::update).
    pub fn previous(&self) -> Option<Point> { self.previous }

    pub fn config(&self) -> &TrackerConfig { &self.config }

    /// Forget the baseline; the next reading cannot be a swipe.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Option<Point> { Some(Point::new(x, y)) }

    #[test]
    fn first_reading_is_never_a_swipe() {
        let mut t = GestureTracker::default();
        assert!(!t.update(p(0.0, 0.0)));
    }

    #[test]
    fn small_move_is_not_a_swipe() {
        let mut t = GestureTracker::default();
        t.update(p(100.0, 100.0));
        assert!(!t.update(p(120.0, 110.0)));
    }

    #[test]
    fn move_of_exactly_threshold_is_not_a_swipe() {
        let mut t = GestureTracker::default();
        t.update(p(100.0, 100.0));
        assert!(!t.update(p(140.0, 100.0)));
    }

    #[test]
    fn move_past_threshold_is_a_swipe() {
        let mut t = GestureTracker::default();
        t.update(p(100.0, 100.0));
        assert!(t.update(p(141.0, 100.0)));
    }

    #[test]
    fn threshold_sweep_both_sides() {
        for d in 0..=80 {
            let mut t = GestureTracker::default();
            t.update(p(200.0, 200.0));
            let swipe = t.update(p(200.0, 200.0 + d as f32));
            assert_eq!(swipe, d > 40, "displacement {}", d);
        }
    }

    #[test]
    fn absent_reading_resets_baseline() {
        let mut t = GestureTracker::default();
        t.update(p(0.0, 0.0));
        assert!(!t.update(None));
        assert_eq!(t.previous(), None);
        // Far away from the last present point, but there is no baseline.
        assert!(!t.update(p(500.0, 400.0)));
    }

    #[test]
    fn two_absent_readings_never_swipe() {
        let mut t = GestureTracker::default();
        assert!(!t.update(None));
        assert!(!t.update(None));
    }

    #[test]
    fn baseline_moves_every_frame() {
        let mut t = GestureTracker::default();
        t.update(p(0.0, 0.0));
        assert!(t.update(p(50.0, 0.0)));
        // Compared against (50, 0), not the first point.
        assert!(!t.update(p(60.0, 0.0)));
        assert_eq!(t.previous(), p(60.0, 0.0));
    }

    #[test]
    fn custom_threshold() {
        let mut t = GestureTracker::new(TrackerConfig { swipe_threshold: 5.0 });
        assert_eq!(t.config().swipe_threshold, 5.0);
        t.update(p(0.0, 0.0));
        assert!(t.update(p(6.0, 0.0)));
    }

    #[test]
    fn reset_clears_baseline() {
        let mut t = GestureTracker::default();
        t.update(p(0.0, 0.0));
        t.reset();
        assert!(!t.update(p(300.0, 0.0)));
    }

    #[test]
    fn from_normalized_truncates_to_pixels() {
        let pt = Point::from_normalized(0.5, 0.999, 640, 480);
        assert_eq!(pt, Point::new(320.0, 479.0));
    }
}
