//! Headless driver: feeds a recorded fingertip trace through a
//! [`GestureTracker`] and a [`FruitField`].
//!
//! Trace format, one tick per line:
//!
//! ```text
//! # t      x     y
//! 0.000  320   240
//! 0.016  380   240
//! 0.033  -              # hand not detected this frame
//! ```
//!
//! Blank lines and `#` comments are skipped.  Every number must be finite
//! and timestamps must not decrease.

use std::io::BufRead;

use log::trace;
use snafu::{ensure, ResultExt, Snafu};

use crate::field::{FruitField, SliceEvent, SpawnSource};
use crate::gesture::{GestureTracker, Point};

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Snafu)]
pub enum ReplayError {
    #[snafu(display("line {}: expected `<t> <x> <y>` or `<t> -`, got {:?}", line, text))]
    Malformed { line: usize, text: String },

    #[snafu(display("line {}: invalid number {:?}: {}", line, text, source))]
    BadNumber {
        line:   usize,
        text:   String,
        source: std::num::ParseFloatError,
    },

    #[snafu(display("line {}: {:?} is not a finite number", line, text))]
    NonFinite { line: usize, text: String },

    #[snafu(display("line {}: timestamp {} is earlier than {}", line, t, previous))]
    TimeWentBackwards { line: usize, t: f64, previous: f64 },

    #[snafu(display("could not read trace: {}", source))]
    Read { source: std::io::Error },
}

// ════════════════════════════════════════════════════════════════════════════
// TraceLine
// ════════════════════════════════════════════════════════════════════════════

/// One parsed tick of a trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceLine {
    pub t:       f64,
    pub reading: Option<Point>,
}

impl TraceLine {
    /// Parse one line; `Ok(None)` for blank lines and comments.
    /// `line` is the 1-based line number used in error messages.
    pub fn parse(line: usize, text: &str) -> Result<Option<TraceLine>, ReplayError> {
        let body = text.split('#').next().unwrap_or("").trim();
        if body.is_empty() { return Ok(None); }

        let fields: Vec<&str> = body.split_whitespace().collect();
        let number = |tok: &str| -> Result<f64, ReplayError> {
            let v = tok.parse::<f64>().context(BadNumberSnafu { line, text: tok })?;
            ensure!(v.is_finite(), NonFiniteSnafu { line, text: tok });
            Ok(v)
        };
        let coord = |tok: &str| -> Result<f32, ReplayError> {
            let v = number(tok)? as f32;
            ensure!(v.is_finite(), NonFiniteSnafu { line, text: tok });
            Ok(v)
        };

        match fields.as_slice() {
            [t, "-"] => Ok(Some(TraceLine { t: number(*t)?, reading: None })),
            [t, x, y] => Ok(Some(TraceLine {
                t:       number(*t)?,
                reading: Some(Point::new(coord(*x)?, coord(*y)?)),
            })),
            _ => MalformedSnafu { line, text: body }.fail(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySummary
// ════════════════════════════════════════════════════════════════════════════

/// Totals for one replay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplaySummary {
    pub ticks:     usize,
    pub swipes:    usize,
    pub spawned:   u64,
    pub sliced:    u64,
    /// Fruits that fell off-screen.
    pub expired:   u64,
    /// Fruits still falling when the trace ended.
    pub remaining: u64,
    /// `(tick index, event)` for every slice, in order.
    pub slices:    Vec<(usize, SliceEvent)>,
}

// ════════════════════════════════════════════════════════════════════════════
// Replay
// ════════════════════════════════════════════════════════════════════════════

pub struct Replay<S> {
    tracker: GestureTracker,
    field:   FruitField<S>,
    last_t:  Option<f64>,
    summary: ReplaySummary,
}

impl<S: SpawnSource> Replay<S> {
    pub fn new(tracker: GestureTracker, field: FruitField<S>) -> Self {
        Replay { tracker, field, last_t: None, summary: ReplaySummary::default() }
    }

    /// Run one tick.  `line` is only used for error reporting.
    pub fn step(&mut self, line: usize, tick: TraceLine) -> Result<Vec<SliceEvent>, ReplayError> {
        if let Some(previous) = self.last_t {
            ensure!(tick.t >= previous, TimeWentBackwardsSnafu { line, t: tick.t, previous });
        }
        self.last_t = Some(tick.t);

        let swipe  = self.tracker.update(tick.reading);
        let events = self.field.tick(tick.t, swipe, tick.reading);
        trace!("tick {} t={} swipe={} fruits={}", self.summary.ticks, tick.t, swipe, self.field.len());

        let index = self.summary.ticks;
        self.summary.ticks += 1;
        if swipe { self.summary.swipes += 1; }
        self.summary.slices.extend(events.iter().map(|e| (index, *e)));
        Ok(events)
    }

    /// Replay every line of `reader` and return the totals.
    pub fn run<R: BufRead>(mut self, reader: R) -> Result<ReplaySummary, ReplayError> {
        for (i, text) in reader.lines().enumerate() {
            let text = text.context(ReadSnafu)?;
            if let Some(tick) = TraceLine::parse(i + 1, &text)? {
                self.step(i + 1, tick)?;
            }
        }
        Ok(self.finish())
    }

    pub fn field(&self) -> &FruitField<S> { &self.field }

    /// Close the books: derive spawn/expiry totals from the field.
    pub fn finish(mut self) -> ReplaySummary {
        self.summary.spawned   = self.field.spawned();
        self.summary.sliced    = self.summary.slices.len() as u64;
        self.summary.remaining = self.field.len() as u64;
        self.summary.expired   = self.summary.spawned - self.summary.sliced - self.summary.remaining;
        self.summary
    }
}

/// First tick in a summary at which a slice happened, if any.
pub fn first_slice_tick(summary: &ReplaySummary) -> Option<usize> {
    summary.slices.first().map(|(tick, _)| *tick)
}

/// Convenience: the fruit ids sliced in `summary`, in order.
pub fn sliced_ids(summary: &ReplaySummary) -> Vec<u64> {
    summary.slices.iter().map(|(_, e)| e.fruit_id).collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldConfig, FixedSpawn};

    fn replay(xs: &[i32]) -> Replay<FixedSpawn> {
        Replay::new(
            GestureTracker::default(),
            FruitField::new(FieldConfig::default(), FixedSpawn::new(xs.iter().copied())),
        )
    }

    #[test]
    fn parse_present_and_absent() {
        assert_eq!(
            TraceLine::parse(1, "0.5 10 20").unwrap(),
            Some(TraceLine { t: 0.5, reading: Some(Point::new(10.0, 20.0)) })
        );
        assert_eq!(
            TraceLine::parse(2, "  1.0   -  # lost").unwrap(),
            Some(TraceLine { t: 1.0, reading: None })
        );
    }

    #[test]
    fn parse_skips_blank_and_comment() {
        assert_eq!(TraceLine::parse(1, "").unwrap(), None);
        assert_eq!(TraceLine::parse(2, "   # header").unwrap(), None);
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        let err = TraceLine::parse(7, "0.1 2").unwrap_err();
        assert!(matches!(err, ReplayError::Malformed { line: 7, .. }));
    }

    #[test]
    fn parse_rejects_bad_number() {
        let err = TraceLine::parse(3, "0.1 abc 4").unwrap_err();
        match err {
            ReplayError::BadNumber { line, text, .. } => {
                assert_eq!(line, 3);
                assert_eq!(text, "abc");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn parse_rejects_non_finite_values() {
        for (text, bad) in [("NaN 10 10", "NaN"), ("0.1 inf 4", "inf"), ("0.1 4 -inf", "-inf"),
                            ("inf -", "inf"), ("0.1 1e300 4", "1e300")] {
            match TraceLine::parse(5, text).unwrap_err() {
                ReplayError::NonFinite { line, text } => {
                    assert_eq!(line, 5);
                    assert_eq!(text, bad);
                }
                other => panic!("{:?}: unexpected error: {}", text, other),
            }
        }
    }

    #[test]
    fn nan_timestamp_stops_the_run() {
        let err = replay(&[100]).run("NaN 10 10\n0.0 10 10\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::NonFinite { line: 1, .. }));
    }

    #[test]
    fn step_exposes_the_field() {
        let mut r = replay(&[100]);
        r.step(1, TraceLine { t: 0.0, reading: None }).unwrap();
        assert_eq!(r.field().len(), 1);
        assert_eq!(r.field().fruits()[0].position, Point::new(100.0, 5.0));
        r.step(2, TraceLine { t: 0.01, reading: None }).unwrap();
        assert_eq!(r.field().fruits()[0].position.y, 10.0);
        assert_eq!(r.finish().spawned, 1);
    }

    #[test]
    fn backwards_time_is_rejected() {
        let trace = "1.0 10 10\n0.5 10 10\n";
        let err = replay(&[100]).run(trace.as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::TimeWentBackwards { line: 2, .. }));
    }

    #[test]
    fn swipe_through_falling_fruit() {
        // Fruit at x=100 reaches y=200 on the 40th tick (index 39).
        let mut trace = String::from("# idle hand far away\n");
        for i in 0..39 {
            trace.push_str(&format!("{:.3} 500 400\n", i as f64 * 0.01));
        }
        // Jump across the screen onto the fruit.
        trace.push_str("0.390 105 205\n");

        let summary = replay(&[100]).run(trace.as_bytes()).unwrap();
        assert_eq!(summary.ticks, 40);
        assert_eq!(summary.swipes, 1);
        assert_eq!(summary.sliced, 1);
        assert_eq!(first_slice_tick(&summary), Some(39));
        assert_eq!(sliced_ids(&summary), vec![0]);
        assert_eq!(summary.remaining, 0);
        assert_eq!(summary.expired, 0);
    }

    #[test]
    fn gap_before_jump_prevents_slice() {
        let mut trace = String::new();
        for i in 0..38 {
            trace.push_str(&format!("{:.3} 500 400\n", i as f64 * 0.01));
        }
        trace.push_str("0.380 -\n");
        trace.push_str("0.390 105 210\n");

        let summary = replay(&[100]).run(trace.as_bytes()).unwrap();
        assert_eq!(summary.swipes, 0);
        assert_eq!(summary.sliced, 0);
        assert_eq!(summary.remaining, 1);
    }

    #[test]
    fn unattended_fruits_expire() {
        let mut trace = String::new();
        for i in 0..200 {
            trace.push_str(&format!("{:.3} -\n", i as f64 * 0.01));
        }
        let summary = replay(&[100, 200]).run(trace.as_bytes()).unwrap();
        // Spawns at t=0 and t=1.51; the first one falls off after 97 ticks.
        assert_eq!(summary.spawned, 2);
        assert_eq!(summary.expired, 1);
        assert_eq!(summary.remaining, 1);
    }
}
