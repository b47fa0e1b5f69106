//! # Clock Display Component
//!
//! Ties the ticker and the sizer together. [`ClockDisplay`] owns the snapshot
//! holder, the running ticker handle (if any), the current surface and the
//! measurer. Each call to [`ClockDisplay::render_pass`] reads the latest snapshot
//! synchronously and lays out one [`Frame`].
//!
//! ## Layout
//! Both lines sit in one column centred on the surface below a fixed top padding,
//! date above time with a fixed gap between them:
//!
//! ```text
//!  ┌──────────────────────────┐
//!  │        top_padding       │
//!  │                          │
//!  │   2026年 10月 16日（金）   │  date: width target only
//!  │       line_spacing       │
//!  │   ██  ██ ▪ ██  ██        │  time: width and height targets
//!  │                          │
//!  └──────────────────────────┘
//! ```

use crate::config::Config;
use crate::fit::{AutoFit, FitError, FitMemo};
use crate::measure::{TextBounds, TextMeasurer};
use crate::style::TextStyle;
use crate::ticker::{current_snapshot, ClockError, DateStyle, SnapshotCell, Ticker, TickerHandle, WallClock};
use crate::{ClockSnapshot, FitBox};
use chrono_tz::Tz;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Visibility state reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Inactive,
}

/// One line of text with its size and top-left position.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedText {
    pub text: String,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
    pub bounds: TextBounds,
}

/// Everything a renderer needs for one pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub surface: FitBox,
    pub date: PlacedText,
    pub time: PlacedText,
}

/// Geometry knobs for [`layout_frame`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub width_ratio: f32,
    pub height_ratio: f32,
    pub top_padding: f32,
    pub line_spacing: f32,
}

impl From<&Config> for LayoutParams {
    fn from(config: &Config) -> Self {
        Self {
            width_ratio: config.display.width_ratio,
            height_ratio: config.display.height_ratio,
            top_padding: config.display.top_padding as f32,
            line_spacing: config.display.line_spacing as f32,
        }
    }
}

/// Targets derived from the surface: the time must fit both dimensions, the date
/// only the width.
pub fn fit_targets(surface: FitBox, params: &LayoutParams) -> FitBox {
    surface.scaled(params.width_ratio, params.height_ratio)
}

fn place(text: &str, font_size: f32, bounds: TextBounds, surface: FitBox, y: f32) -> PlacedText {
    PlacedText {
        text: text.to_string(),
        font_size,
        x: ((surface.max_width_px - bounds.width) / 2.0).round(),
        y: y.round(),
        bounds,
    }
}

/// Position both lines given already-computed font sizes.
pub fn layout_frame<M: TextMeasurer + ?Sized>(
    snapshot: &ClockSnapshot,
    sizes: (f32, f32),
    surface: FitBox,
    params: &LayoutParams,
    template: &TextStyle,
    measurer: &M,
) -> Result<Frame, FitError> {
    let (time_size, date_size) = sizes;
    let measure = |text: &str, size: f32| {
        measurer
            .measure(text, &template.at_size(size))
            .map_err(|source| FitError::Measure {
                text: text.to_string(),
                source,
            })
    };
    let time_bounds = measure(&snapshot.time_text, time_size)?;
    let date_bounds = measure(&snapshot.date_text, date_size)?;

    let column = date_bounds.height + params.line_spacing + time_bounds.height;
    let available = surface.max_height_px - params.top_padding;
    let top = params.top_padding + (available - column) / 2.0;

    Ok(Frame {
        surface,
        date: place(&snapshot.date_text, date_size, date_bounds, surface, top),
        time: place(
            &snapshot.time_text,
            time_size,
            time_bounds,
            surface,
            top + date_bounds.height + params.line_spacing,
        ),
    })
}

/// The top-level clock component.
pub struct ClockDisplay<M> {
    clock: Arc<dyn WallClock>,
    zone: Tz,
    date_style: DateStyle,
    template: TextStyle,
    params: LayoutParams,
    surface: FitBox,
    measurer: M,
    snapshots: SnapshotCell,
    ticker: Option<TickerHandle>,
    time_memo: FitMemo,
    date_memo: FitMemo,
}

impl<M: TextMeasurer> ClockDisplay<M> {
    /// Build a display from configuration.
    ///
    /// Resolves the zone up front so an invalid identifier fails here rather
    /// than on the first render pass.
    pub fn new(config: &Config, clock: Arc<dyn WallClock>, measurer: M) -> Result<Self, ClockError> {
        let zone = config.clock.zone()?;
        let date_style = config.clock.date_style;
        let initial = current_snapshot(clock.now(), &zone, date_style);
        Ok(Self {
            clock,
            zone,
            date_style,
            template: config.style.template(),
            params: LayoutParams::from(config),
            surface: config.display.surface(),
            measurer,
            snapshots: SnapshotCell::new(initial),
            ticker: None,
            time_memo: FitMemo::default(),
            date_memo: FitMemo::default(),
        })
    }

    /// Start or cancel the tick loop.
    ///
    /// Going active while already ticking is a no-op. Going inactive waits for the
    /// loop to finish so no tick lands after this returns.
    pub async fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        match lifecycle {
            Lifecycle::Active => {
                if self.ticker.is_none() {
                    info!("display active, starting ticker");
                    let ticker = Ticker::new(
                        self.clock.clone(),
                        self.zone,
                        self.date_style,
                        self.snapshots.clone(),
                    );
                    self.ticker = Some(ticker.spawn());
                }
            }
            Lifecycle::Inactive => {
                if let Some(handle) = self.ticker.take() {
                    info!("display inactive, cancelling ticker");
                    handle.cancel().await;
                }
            }
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn resize(&mut self, surface: FitBox) {
        if surface != self.surface {
            debug!(width = surface.max_width_px, height = surface.max_height_px, "surface resized");
            self.surface = surface;
        }
    }

    pub fn surface(&self) -> FitBox {
        self.surface
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        self.snapshots.current()
    }

    /// Receiver woken on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ClockSnapshot> {
        self.snapshots.subscribe()
    }

    /// Compute font sizes for the current snapshot and lay out one frame.
    pub fn render_pass(&mut self) -> Result<Frame, FitError> {
        let snapshot = self.snapshots.current();
        let target = fit_targets(self.surface, &self.params);

        let time_size = self.time_memo.get_or_fit(
            &AutoFit::TIME,
            &snapshot.time_text,
            &self.template,
            target,
            &self.measurer,
        )?;
        let date_size = self.date_memo.get_or_fit(
            &AutoFit::DATE,
            &snapshot.date_text,
            &self.template,
            target,
            &self.measurer,
        )?;

        layout_frame(
            &snapshot,
            (time_size, date_size),
            self.surface,
            &self.params,
            &self.template,
            &self.measurer,
        )
    }
}
