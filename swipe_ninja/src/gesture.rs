//! Fingertip sources — LeapMotion hardware or mouse simulation.
//!
//! Hardware trackers run on their own thread and deliver [`HandFrame`]s
//! over a `mpsc` channel.  The mouse simulation is translated in place on
//! the game loop thread.  Either way the loop only sees [`HandFrame`]s.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use fruit_field::Point;
use log::error;

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// One tracking reading.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandFrame {
    /// Index fingertip in playfield pixels; `None` when no hand is tracked.
    pub fingertip: Option<Point>,
}

// ════════════════════════════════════════════════════════════════════════════
// FingertipSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandFrame`]s over a channel.
///
/// `run` returns when the receiver hangs up or the source runs dry;
/// dropping the sender is how the game loop learns there are no more frames.
pub trait FingertipSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<HandFrame>);
}

/// Spawn a fingertip source on its own thread and return the receiving end.
pub fn spawn_fingertip_source<F: FingertipSource>(source: F) -> Receiver<HandFrame> {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("fingertip".into())
        .spawn(move || Box::new(source).run(tx));
    if let Err(e) = spawned {
        // `tx` went down with the closure, so the loop sees a disconnect.
        error!("could not start fingertip source: {}", e);
    }
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapFingertipSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Fingertip source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// The distal tip of the index finger of the first tracked hand is mapped
/// from a fixed interaction box above the device into the playfield:
/// left/right spans the width, and raising the hand moves the point up.
#[cfg(feature = "leap")]
pub struct LeapFingertipSource {
    pub width:  usize,
    pub height: usize,
    pub mirror: bool,
}

#[cfg(feature = "leap")]
impl FingertipSource for LeapFingertipSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        use leaprs::*;

        // Interaction box, millimetres above the device.
        const X_SPAN:  (f32, f32) = (-200.0, 200.0);
        const Y_SPAN:  (f32, f32) = (100.0, 450.0);

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => { error!("failed to create LeapC connection: {:?}", e); return; }
        };
        if let Err(e) = connection.open() {
            error!("failed to open LeapMotion device: {:?}", e);
            return;
        }
        log::info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let fingertip = frame.hands().next().and_then(|hand| {
                    let fingers: Vec<_> = hand.digits().collect();
                    let tip = fingers.get(1)?.distal().next_joint();
                    let nx = (tip.x - X_SPAN.0) / (X_SPAN.1 - X_SPAN.0);
                    let ny = 1.0 - (tip.y - Y_SPAN.0) / (Y_SPAN.1 - Y_SPAN.0);
                    if !(0.0..=1.0).contains(&nx) || !(0.0..=1.0).contains(&ny) {
                        return None;
                    }
                    let nx = if self.mirror { 1.0 - nx } else { nx };
                    Some(Point::from_normalized(nx, ny, self.width, self.height))
                });
                if tx.send(HandFrame { fingertip }).is_err() { return; }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimFingertipSource — mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position in window pixels this frame, and whether the left
    /// button is held.  `None` when the pointer is outside the window.
    Pointer { pos: Option<(f32, f32)>, pressed: bool },
    Quit,
}

/// Mouse stand-in for a hand tracker.
///
/// Holding the left mouse button stands in for "a hand is in view"; the
/// pointer is the fingertip.  Releasing the button, or leaving the window,
/// is an absent reading.  Translation runs on the game loop thread, so each
/// frame's tick sees that frame's pointer.
#[derive(Clone, Copy, Debug)]
pub struct SimFingertipSource {
    pub width:  usize,
    pub height: usize,
    /// Flip horizontally, as a selfie camera image would be.
    pub mirror: bool,
}

impl SimFingertipSource {
    /// Translate one input event; `None` means stop.
    pub fn translate(&self, input: SimInput) -> Option<HandFrame> {
        match input {
            SimInput::Quit => None,
            SimInput::Pointer { pos, pressed } => {
                let fingertip = pos
                    .filter(|_| pressed)
                    .filter(|&(x, y)| {
                        x >= 0.0 && y >= 0.0
                            && x < self.width as f32 && y < self.height as f32
                    })
                    .map(|(x, y)| {
                        let x = if self.mirror { self.width as f32 - 1.0 - x } else { x };
                        Point::new(x.trunc(), y.trunc())
                    });
                Some(HandFrame { fingertip })
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
