//! The fruit field: timed spawning, constant-velocity fall, off-screen
//! expiry and swipe slicing.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::gesture::Point;

// ════════════════════════════════════════════════════════════════════════════
// FieldConfig
// ════════════════════════════════════════════════════════════════════════════

/// Horizontal margin kept free of spawns on either side of the frame.
const SPAWN_MARGIN: i32 = 50;

/// Field parameters, fixed for the lifetime of a [`FruitField`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    /// Seconds that must elapse (strictly) between two spawns.
    pub spawn_interval: f64,
    /// Pixels added to each fruit's `y` per tick.
    pub fall_velocity: f32,
    /// Half-width of the slice box and the drawn circle radius.
    pub radius: f32,
    /// Inclusive band for the spawn `x` coordinate.
    pub spawn_x_range: (i32, i32),
    /// A fruit whose `y` exceeds this is off-screen.
    pub visible_height: f32,
}

impl FieldConfig {
    /// Defaults sized for a `width × height` frame: spawns keep a 50 px
    /// margin on either side and fruits expire below the bottom edge.
    pub fn for_frame(width: usize, height: usize) -> Self {
        let w = width as i32;
        let spawn_x_range = if w >= 2 * SPAWN_MARGIN {
            (SPAWN_MARGIN, w - SPAWN_MARGIN)
        } else {
            (w / 2, w / 2)
        };
        FieldConfig {
            spawn_interval: 1.5,
            fall_velocity:  5.0,
            radius:         30.0,
            spawn_x_range,
            visible_height: height as f32,
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig::for_frame(640, 480)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SpawnSource — injectable randomness
// ════════════════════════════════════════════════════════════════════════════

/// Chooses the `x` coordinate of each new fruit.
pub trait SpawnSource {
    /// Return an integer in `lo..=hi` (callers guarantee `lo <= hi`).
    fn spawn_x(&mut self, lo: i32, hi: i32) -> i32;
}

/// Uniform spawn positions from any [`rand::Rng`].
#[derive(Clone, Debug)]
pub struct RngSpawn<R = StdRng> {
    rng: R,
}

impl RngSpawn<StdRng> {
    pub fn from_entropy() -> Self {
        RngSpawn::new(StdRng::from_entropy())
    }

    /// Reproducible spawn sequence.
    pub fn seeded(seed: u64) -> Self {
        RngSpawn::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RngSpawn<R> {
    pub fn new(rng: R) -> Self {
        RngSpawn { rng }
    }
}

impl<R: Rng> SpawnSource for RngSpawn<R> {
    fn spawn_x(&mut self, lo: i32, hi: i32) -> i32 {
        self.rng.gen_range(lo..=hi)
    }
}

/// Scripted spawn positions, cycled in order and clamped into the band.
/// An empty script always spawns at the left edge of the band.
#[derive(Clone, Debug, Default)]
pub struct FixedSpawn {
    xs:   Vec<i32>,
    next: usize,
}

impl FixedSpawn {
    pub fn new<I: IntoIterator<Item = i32>>(xs: I) -> Self {
        FixedSpawn { xs: xs.into_iter().collect(), next: 0 }
    }
}

impl SpawnSource for FixedSpawn {
    fn spawn_x(&mut self, lo: i32, hi: i32) -> i32 {
        if self.xs.is_empty() { return lo; }
        let x = self.xs[self.next % self.xs.len()];
        self.next += 1;
        x.clamp(lo, hi)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fruit / SliceEvent
// ════════════════════════════════════════════════════════════════════════════

/// A falling circle.
#[derive(Clone, Debug, PartialEq)]
pub struct Fruit {
    /// Spawn sequence number, unique within one field.
    pub id:       u64,
    pub position: Point,
    /// Pixels per tick, downward.
    pub velocity: f32,
    pub radius:   f32,
    pub alive:    bool,
}

impl Fruit {
    fn fall(&mut self) {
        self.position.y += self.velocity;
    }

    /// Axis-aligned box test against `p`, strict on both axes.
    ///
    /// This is deliberately not a circle test: a point near a box corner
    /// (outside the drawn circle) still slices.
    pub fn box_contains(&self, p: &Point) -> bool {
        (self.position.x - p.x).abs() < self.radius
            && (self.position.y - p.y).abs() < self.radius
    }
}

/// A fruit was sliced this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceEvent {
    pub fruit_id: u64,
    /// Where the fruit was when it was hit.
    pub position: Point,
}

// ════════════════════════════════════════════════════════════════════════════
// FruitField
// ════════════════════════════════════════════════════════════════════════════

/// Owns every live fruit.
///
/// After each [`tick`](Self::tick) the field holds only live fruits, in
/// spawn order.  A fruit leaves the field exactly once, either by falling
/// past `visible_height` or by being sliced.
#[derive(Debug)]
pub struct FruitField<S = RngSpawn> {
    config:     FieldConfig,
    fruits:     Vec<Fruit>,
    last_spawn: Option<f64>,
    next_id:    u64,
    spawner:    S,
}

impl<S: SpawnSource> FruitField<S> {
    pub fn new(config: FieldConfig, spawner: S) -> Self {
        FruitField {
            config,
            fruits:     Vec::new(),
            last_spawn: None,
            next_id:    0,
            spawner,
        }
    }

    /// Advance the field by one frame.
    ///
    /// `now` is a monotonic timestamp in seconds.  The first tick always
    /// spawns; afterwards at most one fruit spawns per tick, once more than
    /// `spawn_interval` has passed since the previous spawn.
    pub fn tick(&mut self, now: f64, is_swipe: bool, swipe_point: Option<Point>) -> Vec<SliceEvent> {
        self.maybe_spawn(now);

        let bottom = self.config.visible_height;
        for fruit in self.fruits.iter_mut().filter(|f| f.alive) {
            fruit.fall();
            if fruit.position.y > bottom {
                fruit.alive = false;
                debug!("fruit {} expired at y={}", fruit.id, fruit.position.y);
            }
        }

        let mut events = Vec::new();
        if let (true, Some(p)) = (is_swipe, swipe_point) {
            for fruit in self.fruits.iter_mut().filter(|f| f.alive) {
                if fruit.box_contains(&p) {
                    fruit.alive = false;
                    debug!("fruit {} sliced at ({}, {})", fruit.id, fruit.position.x, fruit.position.y);
                    events.push(SliceEvent { fruit_id: fruit.id, position: fruit.position });
                }
            }
        }

        self.fruits.retain(|f| f.alive);
        events
    }

    fn maybe_spawn(&mut self, now: f64) {
        let due = match self.last_spawn {
            None       => true,
            Some(last) => now - last > self.config.spawn_interval,
        };
        if !due { return; }

        let (a, b) = self.config.spawn_x_range;
        let x = self.spawner.spawn_x(a.min(b), a.max(b));
        let fruit = Fruit {
            id:       self.next_id,
            position: Point::new(x as f32, 0.0),
            velocity: self.config.fall_velocity,
            radius:   self.config.radius,
            alive:    true,
        };
        debug!("fruit {} spawned at x={} (t={:.3})", fruit.id, x, now);
        self.next_id += 1;
        self.fruits.push(fruit);
        self.last_spawn = Some(now);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn fruits(&self)  -> &[Fruit]      { &self.fruits }
    pub fn len(&self)     -> usize         { self.fruits.len() }
    pub fn is_empty(&self) -> bool         { self.fruits.is_empty() }
    pub fn config(&self)  -> &FieldConfig  { &self.config }
    /// Number of fruits spawned since construction.  Ids keep counting
    /// across [`clear`](Self::clear), so this is also the next id.
    pub fn spawned(&self) -> u64           { self.next_id }

    /// Drop every fruit; the next tick spawns immediately.
    pub fn clear(&mut self) {
        self.fruits.clear();
        self.last_spawn = None;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fixed(xs: &[i32]) -> FruitField<FixedSpawn> {
        FruitField::new(FieldConfig::default(), FixedSpawn::new(xs.iter().copied()))
    }

    /// Tick without swipes (and without new spawns) until the oldest fruit
    /// sits at `y` — the next tick moves it to `y + 5` before slicing.
    fn fall_until(field: &mut FruitField<FixedSpawn>, t0: f64, y: f32) -> f64 {
        let mut t = t0;
        while field.fruits()[0].position.y < y {
            t += 0.001;
            field.tick(t, false, None);
        }
        assert_eq!(field.fruits()[0].position.y, y);
        t
    }

    #[test]
    fn default_config_matches_640x480() {
        let c = FieldConfig::default();
        assert_eq!(c.spawn_interval, 1.5);
        assert_eq!(c.fall_velocity, 5.0);
        assert_eq!(c.radius, 30.0);
        assert_eq!(c.spawn_x_range, (50, 590));
        assert_eq!(c.visible_height, 480.0);
    }

    #[test]
    fn narrow_frame_collapses_spawn_band() {
        let c = FieldConfig::for_frame(60, 100);
        assert_eq!(c.spawn_x_range, (30, 30));
    }

    #[test]
    fn first_tick_spawns_and_advances() {
        let mut f = fixed(&[100]);
        assert!(f.tick(0.0, false, None).is_empty());
        assert_eq!(f.len(), 1);
        // Spawned at y = 0, then moved once in the same tick.
        assert_eq!(f.fruits()[0].position, Point::new(100.0, 5.0));
    }

    #[test]
    fn no_spawn_before_interval() {
        let mut f = fixed(&[100, 200]);
        f.tick(0.0, false, None);
        f.tick(1.0, false, None);
        f.tick(1.5, false, None); // not strictly greater
        assert_eq!(f.len(), 1);
        f.tick(1.51, false, None);
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn at_most_one_spawn_per_tick() {
        let mut f = fixed(&[100]);
        f.tick(0.0, false, None);
        f.tick(100.0, false, None);
        assert_eq!(f.len(), 2);
        assert_eq!(f.spawned(), 2);
        // Interval restarts from the late spawn, no catch-up.
        f.tick(101.0, false, None);
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn spawn_x_within_band_for_any_config() {
        for (width, seed) in [(640usize, 1u64), (1280, 2), (100, 3), (101, 4), (40, 5)] {
            let cfg = FieldConfig { spawn_interval: 0.0, ..FieldConfig::for_frame(width, 480) };
            let (lo, hi) = cfg.spawn_x_range;
            let mut f = FruitField::new(cfg, RngSpawn::seeded(seed));
            assert_eq!(f.config(), &cfg);
            for i in 0..200 {
                f.tick(i as f64, false, None);
                let newest = f.fruits().last().unwrap();
                let x = newest.position.x as i32;
                assert!(lo <= x && x <= hi, "x={} outside [{}, {}]", x, lo, hi);
            }
        }
    }

    #[test]
    fn seeded_spawns_are_reproducible() {
        let cfg = FieldConfig { spawn_interval: 0.0, ..FieldConfig::default() };
        let mut a = FruitField::new(cfg, RngSpawn::seeded(42));
        let mut b = FruitField::new(cfg, RngSpawn::new(StdRng::seed_from_u64(42)));
        for i in 0..50 {
            a.tick(i as f64, false, None);
            b.tick(i as f64, false, None);
        }
        let xs = |f: &FruitField| f.fruits().iter().map(|fr| fr.position.x).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
    }

    #[test]
    fn fixed_spawn_clamps_into_band() {
        let mut f = fixed(&[-500, 5000]);
        f.tick(0.0, false, None);
        f.tick(2.0, false, None);
        assert_eq!(f.fruits()[0].position.x, 50.0);
        assert_eq!(f.fruits()[1].position.x, 590.0);
    }

    #[test]
    fn y_grows_by_velocity_every_tick() {
        let mut f = fixed(&[300]);
        f.tick(0.0, false, None);
        let mut last = f.fruits()[0].position.y;
        for i in 1..50 {
            f.tick(i as f64 * 0.01, false, None);
            let y = f.fruits()[0].position.y;
            assert_eq!(y - last, 5.0);
            last = y;
        }
    }

    #[test]
    fn scenario_expiry_without_slices() {
        let mut f = fixed(&[100, 400]);
        assert!(f.tick(0.0, false, None).is_empty());
        assert!(f.tick(1.6, false, None).is_empty());
        assert_eq!(f.len(), 2);
        assert_eq!(f.fruits()[0].position.y, 10.0);

        let mut t = 1.6;
        for i in 1..=97 {
            t += 0.01;
            assert!(f.tick(t, false, None).is_empty());
            if i == 94 {
                // y == 480 is still on-screen
                assert_eq!(f.fruits()[0].id, 0);
                assert_eq!(f.fruits()[0].position.y, 480.0);
            }
            if i == 95 {
                assert!(f.fruits().iter().all(|fr| fr.id != 0));
            }
        }
        assert!(f.fruits().iter().all(|fr| fr.id != 0));
    }

    #[test]
    fn scenario_box_hit() {
        let mut f = fixed(&[100]);
        f.tick(0.0, false, None);
        let t = fall_until(&mut f, 0.0, 195.0);

        let events = f.tick(t + 0.001, true, Some(Point::new(105.0, 205.0)));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].position, Point::new(100.0, 200.0));
        assert!(f.is_empty());
    }

    #[test]
    fn scenario_box_miss() {
        let mut f = fixed(&[100]);
        f.tick(0.0, false, None);
        let t = fall_until(&mut f, 0.0, 195.0);

        let events = f.tick(t + 0.001, true, Some(Point::new(140.0, 200.0)));
        assert!(events.is_empty());
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn box_edge_is_exclusive() {
        let mut f = fixed(&[100]);
        f.tick(0.0, false, None);
        let t = fall_until(&mut f, 0.0, 195.0);
        // |100 - 130| == 30, not < 30
        assert!(f.tick(t + 0.001, true, Some(Point::new(130.0, 200.0))).is_empty());
    }

    #[test]
    fn box_corner_hits_outside_circle() {
        let mut f = fixed(&[100]);
        f.tick(0.0, false, None);
        let t = fall_until(&mut f, 0.0, 195.0);
        // ~35 px away, beyond the radius, but inside the box.
        let events = f.tick(t + 0.001, true, Some(Point::new(125.0, 225.0)));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn no_slice_without_swipe_flag() {
        let mut f = fixed(&[100]);
        f.tick(0.0, false, None);
        let t = fall_until(&mut f, 0.0, 195.0);
        assert!(f.tick(t + 0.001, false, Some(Point::new(100.0, 200.0))).is_empty());
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn no_slice_without_point() {
        let mut f = fixed(&[100]);
        f.tick(0.0, false, None);
        assert!(f.tick(0.01, true, None).is_empty());
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn scenario_two_fruits_one_swipe() {
        let mut f = fixed(&[100, 110]);
        f.tick(0.0, false, None);
        f.tick(1.6, false, None);
        assert_eq!(f.len(), 2);
        let t = fall_until(&mut f, 1.6, 195.0);

        let events = f.tick(t + 0.001, true, Some(Point::new(105.0, 200.0)));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].fruit_id, 0);
        assert_eq!(events[1].fruit_id, 1);
        assert_eq!(events[0].position, Point::new(100.0, 200.0));
        assert_eq!(events[1].position, Point::new(110.0, 195.0));
        assert!(f.is_empty());
    }

    #[test]
    fn fruit_past_bottom_cannot_be_sliced() {
        let mut f = fixed(&[100]);
        f.tick(0.0, false, None);
        let t = fall_until(&mut f, 0.0, 480.0);
        // Moves to 485 and expires before the slice test runs.
        let events = f.tick(t + 0.001, true, Some(Point::new(100.0, 485.0)));
        assert!(events.is_empty());
        assert!(f.fruits().iter().all(|fr| fr.id != 0));
    }

    #[test]
    fn every_fruit_leaves_exactly_once() {
        let cfg = FieldConfig { spawn_interval: 0.05, ..FieldConfig::default() };
        let mut f = FruitField::new(cfg, RngSpawn::seeded(7));
        let mut gone: HashSet<u64> = HashSet::new();
        let mut sliced: HashSet<u64> = HashSet::new();
        let mut prev: HashSet<u64> = HashSet::new();

        for i in 0..2000 {
            let t = i as f64 * 0.016;
            let swipe = i % 3 == 0;
            let point = Point::new(((i * 37) % 640) as f32, ((i * 53) % 480) as f32);
            for ev in f.tick(t, swipe, Some(point)) {
                assert!(sliced.insert(ev.fruit_id), "fruit {} sliced twice", ev.fruit_id);
            }
            let now: HashSet<u64> = f.fruits().iter().map(|fr| fr.id).collect();
            assert!(f.fruits().iter().all(|fr| fr.alive));
            for id in &now {
                assert!(!gone.contains(id), "fruit {} seen after removal", id);
            }
            for id in prev.difference(&now) {
                assert!(gone.insert(*id));
            }
            prev = now;
        }
        assert!(!sliced.is_empty());
        assert!(sliced.len() < gone.len(), "some fruits should also expire");
    }

    #[test]
    fn clear_resets_spawn_timing() {
        let mut f = fixed(&[100]);
        f.tick(0.0, false, None);
        f.clear();
        assert!(f.is_empty());
        f.tick(0.1, false, None);
        assert_eq!(f.len(), 1);
        assert_eq!(f.fruits()[0].id, 1);
        assert_eq!(f.spawned(), 2);
    }

    #[test]
    fn ids_stay_unique_across_clear() {
        let mut f = fixed(&[100]);
        let mut seen = HashSet::new();
        let mut t = 0.0;
        for _ in 0..3 {
            f.tick(t, false, None);
            t = fall_until(&mut f, t, 200.0) + 0.001;
            let events = f.tick(t, true, Some(Point::new(105.0, 205.0)));
            assert_eq!(events.len(), 1);
            assert!(seen.insert(events[0].fruit_id), "id {} reused", events[0].fruit_id);
            f.clear();
            t += 0.001;
        }
        assert_eq!(seen.len(), 3);
    }
}
