//! Slice sound effects over MIDI.
//!
//! Every slice plays a short note on the first available MIDI output.  The
//! pitch climbs a pentatonic scale from left to right across the playfield,
//! so a sweep that pops several fruits plays a little run.
//!
//! Everything happens on the game-loop thread: `pop` sends note-on
//! immediately and schedules the note-off; `tick` sends the ones that are due.

use std::time::{Duration, Instant};

use log::{info, warn};

/// GM program 13, Xylophone.
const PROGRAM:    u8 = 13;
const CHANNEL:    u8 = 0;
const VELOCITY:   u8 = 110;
const ROOT_NOTE:  u8 = 60;
const NOTE_LEN:   Duration = Duration::from_millis(140);
/// Pentatonic major, two octaves.
const SCALE: [u8; 10] = [0, 2, 4, 7, 9, 12, 14, 16, 19, 21];

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / null (for testing)
// ════════════════════════════════════════════════════════════════════════════

pub(crate) trait MidiOut {
    fn program_change(&mut self, channel: u8, program: u8);
    fn note_on(&mut self,  channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
}

// ── midir backend ─────────────────────────────────────────────────────────

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn program_change(&mut self, channel: u8, program: u8) {
        let _ = self.conn.send(&[0xC0 | (channel & 0x0F), program]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        let _ = self.conn.send(&[0x90 | (channel & 0x0F), note, velocity]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        let _ = self.conn.send(&[0x80 | (channel & 0x0F), note, 0]);
    }
}

// ── null backend (muted, or no MIDI port available) ───────────────────────

struct NullOut;
impl MidiOut for NullOut {
    fn program_change(&mut self, _ch: u8, _p: u8)   {}
    fn note_on(&mut self, _ch: u8, _n: u8, _v: u8)  {}
    fn note_off(&mut self, _ch: u8, _n: u8)          {}
}

// ════════════════════════════════════════════════════════════════════════════
// open_midi_output — enumerate ports and pick first available
// ════════════════════════════════════════════════════════════════════════════

/// Try to open a MIDI output port, preferring a software synth.
/// Falls back to `NullOut` with a warning if none found.
fn open_midi_output() -> Box<dyn MidiOut> {
    let midi_out = match midir::MidiOutput::new("swipe_ninja") {
        Ok(m)  => m,
        Err(e) => {
            warn!("MIDI init error: {} — slices will be silent", e);
            return Box::new(NullOut);
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        warn!("no MIDI output ports found — slices will be silent");
        warn!("start a synthesiser such as `fluidsynth` or `timidity -iA` for sound");
        return Box::new(NullOut);
    }

    let port_idx = ports.iter()
        .position(|p| {
            midi_out.port_name(p).map(|n| {
                let n = n.to_lowercase();
                n.contains("fluid") || n.contains("timidity") ||
                n.contains("microsoft") || n.contains("synth")
            }).unwrap_or(false)
        })
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out.port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());
    info!("opening MIDI port: {}", name);

    match midi_out.connect(port, "swipe-ninja-sfx") {
        Ok(conn) => Box::new(MidirOut { conn }),
        Err(e) => {
            warn!("failed to connect to {}: {} — slices will be silent", name, e);
            Box::new(NullOut)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SliceSound
// ════════════════════════════════════════════════════════════════════════════

pub struct SliceSound {
    out:     Box<dyn MidiOut>,
    /// `(note, when to release it)`
    pending: Vec<(u8, Instant)>,
}

impl SliceSound {
    /// Open the MIDI output, or a silent one when `muted`.
    pub fn open(muted: bool) -> Self {
        let out: Box<dyn MidiOut> = if muted { Box::new(NullOut) } else { open_midi_output() };
        SliceSound::with_output(out)
    }

    pub(crate) fn with_output(mut out: Box<dyn MidiOut>) -> Self {
        out.program_change(CHANNEL, PROGRAM);
        SliceSound { out, pending: Vec::new() }
    }

    /// Play the pop for a fruit sliced at horizontal position `x`.
    pub fn pop(&mut self, x: f32, width: usize, now: Instant) {
        let note = note_for_x(x, width);
        self.out.note_on(CHANNEL, note, VELOCITY);
        self.pending.push((note, now + NOTE_LEN));
    }

    /// Release every note whose time is up.
    pub fn tick(&mut self, now: Instant) {
        let out = &mut self.out;
        self.pending.retain(|&(note, due)| {
            if due <= now {
                out.note_off(CHANNEL, note);
                false
            } else {
                true
            }
        });
    }

    pub fn sounding(&self) -> usize { self.pending.len() }
}

impl Drop for SliceSound {
    fn drop(&mut self) {
        for (note, _) in self.pending.drain(..) {
            self.out.note_off(CHANNEL, note);
        }
    }
}

/// Map `x` in `0..width` onto the scale.
fn note_for_x(x: f32, width: usize) -> u8 {
    let frac = (x / width.max(1) as f32).clamp(0.0, 0.999);
    let step = (frac * SCALE.len() as f32) as usize;
    ROOT_NOTE + SCALE[step.min(SCALE.len() - 1)]
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
