//! # Neon Clock Core Library
//!
//! This library provides the data structures and algorithms behind the neon clock
//! display: a full-screen, always-on clock that shows the time and date of one fixed
//! timezone with its text auto-sized to fill the screen.
//!
//! ## Design Philosophy
//!
//! ### Two Cooperating Pieces
//! - **Ticker** ([`ticker`]): produces a fresh [`ClockSnapshot`] at the start of every
//!   minute. The delay to the next tick is recomputed from the wall clock on every
//!   iteration, so sleep inaccuracy never accumulates into drift.
//! - **Auto-fit sizer** ([`fit`]): bisects over font sizes against a text measurer
//!   until it converges on the largest size that still fits strictly inside a [`FitBox`].
//!
//! ### Data Flow
//! 1. **Tick**: wall clock → zoned time → `ClockSnapshot` → published to the display
//! 2. **Render pass**: snapshot + surface box → font sizes → [`display::Frame`]
//! 3. **Draw**: frame + [`style::NeonStyle`] → terminal or RGB frame buffer
//!
//! ### Lifecycle
//! The ticker only runs while the display is active. Going inactive cancels the
//! loop outright; reactivating starts a new loop that immediately publishes a fresh
//! snapshot instead of resuming stale state.
//!
//! ## Core Types
//! - [`ClockSnapshot`]: one immutable (time, date) pair
//! - [`FitBox`]: the pixel rectangle text must render within

use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod display;
pub mod fit;
pub mod framebuffer;
pub mod measure;
pub mod renderer;
pub mod style;
pub mod ticker;

/// The formatted time and date for one rendered instant.
///
/// Snapshots are derived purely from an instant and the configured zone and are
/// never mutated: each tick produces a new one that replaces the previous value
/// wholesale.
///
/// # Example
/// ```
/// use neon_clock_lib::ClockSnapshot;
///
/// let snapshot = ClockSnapshot {
///     time_text: "12:34".to_string(),
///     date_text: "2026年 10月 16日（金）".to_string(),
/// };
///
/// assert_eq!(snapshot.time_text.len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    /// Time of day as `HH:mm`
    pub time_text: String,
    /// Long date with day of week
    pub date_text: String,
}

/// The maximum pixel rectangle text must render within.
///
/// Changes only when the display surface resizes. Whether the height is
/// actually enforced is decided by the [`fit::AutoFit`] searching against it.
///
/// # Example
/// ```
/// use neon_clock_lib::FitBox;
///
/// let surface = FitBox::new(1080.0, 2400.0);
/// let target = surface.scaled(0.94, 0.72);
///
/// assert!((target.max_width_px - 1015.2).abs() < 1e-3);
/// assert!((target.max_height_px - 1728.0).abs() < 1e-3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitBox {
    /// Available width in pixels
    pub max_width_px: f32,
    /// Available height in pixels
    pub max_height_px: f32,
}

impl FitBox {
    pub fn new(max_width_px: f32, max_height_px: f32) -> Self {
        Self {
            max_width_px,
            max_height_px,
        }
    }

    /// Shrink the box by independent width and height ratios.
    pub fn scaled(&self, width_ratio: f32, height_ratio: f32) -> Self {
        Self {
            max_width_px: self.max_width_px * width_ratio,
            max_height_px: self.max_height_px * height_ratio,
        }
    }
}
