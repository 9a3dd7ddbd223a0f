//! # fruit_field
//!
//! The game logic behind a swipe-to-slice toy: a tracked fingertip is fed
//! in once per frame, fast movements are classified as **swipes**, and a
//! field of falling **fruits** is spawned, advanced, expired and sliced.
//!
//! Nothing here touches a window, a camera or a clock.  Callers supply one
//! optional fingertip [`Point`] and one monotonic timestamp per tick:
//!
//! ```rust
//! use fruit_field::{FieldConfig, FixedSpawn, FruitField, GestureTracker, Point};
//!
//! let mut tracker = GestureTracker::default();
//! let mut field   = FruitField::new(FieldConfig::default(), FixedSpawn::new([100]));
//!
//! // Tick 0 spawns a fruit at x = 100.
//! let reading = Some(Point::new(300.0, 300.0));
//! let swipe   = tracker.update(reading);
//! let sliced  = field.tick(0.0, swipe, reading);
//!
//! assert!(!swipe);
//! assert!(sliced.is_empty());
//! assert_eq!(field.len(), 1);
//! ```
//!
//! ## Per-tick order
//!
//! | Step | Component | Effect |
//! |---|---|---|
//! | 1 | [`GestureTracker::update`] | swipe flag from inter-frame displacement |
//! | 2 | [`FruitField::tick`] | spawn → fall → slice → purge |
//! | 3 | caller | render fruits and [`SliceEvent`]s |

pub mod gesture;
pub mod field;
pub mod replay;

pub use gesture::{GestureTracker, Point, TrackerConfig};
pub use field::{
    FieldConfig, FixedSpawn, Fruit, FruitField, RngSpawn, SliceEvent, SpawnSource,
};
pub use replay::{Replay, ReplayError, ReplaySummary, TraceLine};
