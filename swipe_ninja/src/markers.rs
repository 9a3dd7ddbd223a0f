//! Transient "SLICED!" labels shown where fruits were popped.

use fruit_field::{Point, SliceEvent};

/// Most markers kept alive at once; older ones are dropped first.
const MAX_MARKERS: usize = 32;

// ════════════════════════════════════════════════════════════════════════════
// SliceMarker
// ════════════════════════════════════════════════════════════════════════════

/// One on-screen label.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceMarker {
    pub position:  Point,
    /// Frames left before the label disappears.
    pub remaining: u32,
    /// Frames the label lives in total.
    pub lifetime:  u32,
}

impl SliceMarker {
    pub fn new(position: Point, lifetime: u32) -> Self {
        SliceMarker { position, remaining: lifetime, lifetime }
    }

    pub fn tick(&mut self) { self.remaining = self.remaining.saturating_sub(1); }
    pub fn done(&self) -> bool { self.remaining == 0 }

    /// 1.0 when fresh, approaching 0.0 as it expires.
    pub fn fade(&self) -> f32 {
        if self.lifetime == 0 { return 0.0; }
        self.remaining as f32 / self.lifetime as f32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SliceMarkers
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct SliceMarkers {
    pub entries: Vec<SliceMarker>,
    lifetime:    u32,
}

impl SliceMarkers {
    pub fn new(lifetime: u32) -> Self {
        SliceMarkers { entries: Vec::new(), lifetime }
    }

    pub fn push_events(&mut self, events: &[SliceEvent]) {
        if self.lifetime == 0 { return; }
        for ev in events {
            self.entries.push(SliceMarker::new(ev.position, self.lifetime));
        }
        if self.entries.len() > MAX_MARKERS {
            let excess = self.entries.len() - MAX_MARKERS;
            self.entries.drain(..excess);
        }
    }

    /// Age every marker by one frame and drop the expired ones.
    pub fn tick(&mut self) {
        for m in &mut self.entries { m.tick(); }
        self.entries.retain(|m| !m.done());
    }
}
