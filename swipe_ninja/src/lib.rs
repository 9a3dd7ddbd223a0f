//! # swipe_ninja
//!
//! Falling fruits on a software-rendered playfield, popped by fast
//! fingertip movements.  The game logic lives in [`fruit_field`]; this
//! crate supplies the fingertip, the window and the sound.
//!
//! ## Frame loop
//!
//! | Step | Where |
//! |---|---|
//! | Poll window | [`visualizer::Visualizer::poll_input`] |
//! | This frame's fingertip reading | [`app::Tracking::next_reading`] |
//! | Swipe + fruit tick | [`app::AppState::step`] |
//! | Pop sound per slice | [`sfx::SliceSound`] |
//! | Draw | [`visualizer::Visualizer::render`] |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse is the fingertip while the
//!   left button is held.
//! * `leap` — **Hardware mode**: index fingertip from a LeapMotion
//!   controller via LeapC.
//!
//! ### Controls
//!
//! | Input | Effect |
//! |---|---|
//! | Hold left mouse | Hand in view (sim mode) |
//! | Fast drag | Swipe |
//! | `Q` / close window | Quit |

pub mod error;
pub mod logging;
pub mod gesture;
pub mod markers;
pub mod sfx;
pub mod visualizer;
pub mod app;
pub mod cli;

pub use error::{Error, Result};
