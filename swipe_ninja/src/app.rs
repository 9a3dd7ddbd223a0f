//! Top-level game loop.
//!
//! `AppState` owns the `GestureTracker`, the `FruitField` and the slice
//! markers.  Each frame it takes the latest fingertip reading, runs one
//! tick, and hands the result to the visualizer and the sound effects.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use fruit_field::{
    FieldConfig, FruitField, GestureTracker, Point, RngSpawn, SliceEvent, SpawnSource,
    TrackerConfig,
};
use log::{debug, info, LevelFilter};

use crate::error::{Error, Result};
use crate::gesture::{HandFrame, SimFingertipSource, SimInput};
use crate::markers::SliceMarkers;
use crate::sfx::SliceSound;
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Playfield size in pixels.
    pub width:   usize,
    pub height:  usize,
    pub field:   FieldConfig,
    pub tracker: TrackerConfig,
    /// Mirror the fingertip horizontally, like a selfie camera.
    pub mirror:  bool,
    /// Fixed seed for spawn positions; entropy when `None`.
    pub seed:    Option<u64>,
    pub muted:   bool,
    /// Frames a "SLICED!" label stays on screen.
    pub marker_frames: u32,
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// Defaults for a `width × height` playfield.
    pub fn for_frame(width: usize, height: usize) -> Self {
        AppConfig {
            width,
            height,
            field:         FieldConfig::for_frame(width, height),
            tracker:       TrackerConfig::default(),
            mirror:        true,
            seed:          None,
            muted:         false,
            marker_frames: 20,
            log_level:     LevelFilter::Info,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::for_frame(640, 480)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState<S = RngSpawn> {
    tracker:   GestureTracker,
    field:     FruitField<S>,
    markers:   SliceMarkers,

    // ── last tick, for rendering ─────────────────────────────────────────
    fingertip: Option<Point>,
    swipe:     bool,
    status:    String,
}

impl AppState<RngSpawn> {
    pub fn new(cfg: &AppConfig) -> Self {
        let spawner = match cfg.seed {
            Some(seed) => RngSpawn::seeded(seed),
            None       => RngSpawn::from_entropy(),
        };
        AppState::with_spawner(cfg, spawner)
    }
}

impl<S: SpawnSource> AppState<S> {
    pub fn with_spawner(cfg: &AppConfig, spawner: S) -> Self {
        AppState {
            tracker:   GestureTracker::new(cfg.tracker),
            field:     FruitField::new(cfg.field, spawner),
            markers:   SliceMarkers::new(cfg.marker_frames),
            fingertip: None,
            swipe:     false,
            status:    "Ready - hold the left mouse button and swipe through the fruit".to_string(),
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    /// Run one tick at `now` seconds with this frame's fingertip reading.
    pub fn step(&mut self, now: f64, reading: Option<Point>) -> Vec<SliceEvent> {
        self.markers.tick();

        let swipe  = self.tracker.update(reading);
        let events = self.field.tick(now, swipe, reading);
        self.markers.push_events(&events);

        self.fingertip = reading;
        self.swipe     = swipe;

        if !events.is_empty() {
            let last = events[events.len() - 1].position;
            self.status = format!("SLICED x{} at ({:.0}, {:.0})", events.len(), last.x, last.y);
        } else if reading.is_none() {
            self.status = format!("no hand   fruits: {}", self.field.len());
        } else if swipe {
            self.status = format!("swipe   fruits: {}", self.field.len());
        }
        events
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn field(&self)     -> &FruitField<S>  { &self.field }
    pub fn markers(&self)   -> &SliceMarkers   { &self.markers }
    pub fn fingertip(&self) -> Option<Point>   { self.fingertip }
    pub fn is_swipe(&self)  -> bool            { self.swipe }
    pub fn status(&self)    -> &str            { &self.status }
}

// ════════════════════════════════════════════════════════════════════════════
// Fingertip readings
// ════════════════════════════════════════════════════════════════════════════

/// Where the loop gets its fingertip readings.
pub enum Tracking {
    /// Mouse pointer, translated on the loop thread.
    Sim(SimFingertipSource),
    /// Hardware tracker running on its own thread.
    Device(Receiver<HandFrame>),
}

impl Tracking {
    /// This frame's reading, given the window input and last frame's
    /// reading.  `Ok(None)` means the user asked to quit.
    pub fn next_reading(&self, input: SimInput, current: Option<Point>) -> Result<Option<Option<Point>>> {
        match self {
            Tracking::Sim(sim) => Ok(sim.translate(input).map(|frame| frame.fingertip)),
            Tracking::Device(rx) => {
                if input == SimInput::Quit { return Ok(None); }
                latest_reading(rx, current).map(Some)
            }
        }
    }
}

/// Pull everything the source sent since last frame and keep the newest
/// reading.  With nothing new, the previous reading carries over.
pub fn latest_reading(rx: &Receiver<HandFrame>, current: Option<Point>) -> Result<Option<Point>> {
    let mut latest = current;
    loop {
        match rx.try_recv() {
            Ok(frame)                       => latest = frame.fingertip,
            Err(TryRecvError::Empty)        => return Ok(latest),
            Err(TryRecvError::Disconnected) => return Err(Error::SourceDisconnected),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the
/// visualizer, the fingertip source (mouse simulation by default, hardware
/// with `--features leap`), and drives the tick/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<()> {
    // ── Fingertip source ──────────────────────────────────────────────────
    #[cfg(feature = "leap")]
    let tracking = Tracking::Device(crate::gesture::spawn_fingertip_source(
        crate::gesture::LeapFingertipSource {
            width: cfg.width, height: cfg.height, mirror: cfg.mirror,
        },
    ));
    #[cfg(not(feature = "leap"))]
    let tracking = Tracking::Sim(SimFingertipSource {
        width: cfg.width, height: cfg.height, mirror: cfg.mirror,
    });

    // ── Window, sound, state ──────────────────────────────────────────────
    let mut vis   = Visualizer::new(cfg.width, cfg.height)?;
    let mut sound = SliceSound::open(cfg.muted);
    let mut app   = AppState::new(&cfg);

    info!("playfield {}x{}, spawn every {}s, swipe threshold {}px",
          cfg.width, cfg.height, cfg.field.spawn_interval, cfg.tracker.swipe_threshold);

    // ── Main loop ─────────────────────────────────────────────────────────
    let start = Instant::now();
    let mut reading = None;
    let mut ticks: u64 = 0;
    let mut sliced: u64 = 0;

    // 1. Poll window input, 2. this frame's fingertip reading
    while let Some(next) = tracking.next_reading(vis.poll_input(), reading)? {
        reading = next;

        // 3. Tick
        let now = Instant::now();
        let events = app.step(now.duration_since(start).as_secs_f64(), reading);
        for ev in &events {
            debug!("slice at ({}, {})", ev.position.x, ev.position.y);
            sound.pop(ev.position.x, cfg.width, now);
        }
        sound.tick(now);
        ticks  += 1;
        sliced += events.len() as u64;

        // 4. Render
        vis.render(
            app.field().fruits(),
            app.markers(),
            app.fingertip(),
            app.is_swipe(),
            app.status(),
        );
    }

    info!("stopped after {} frames ({} slices)", ticks, sliced);
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
