//! # Auto-Fit Text Sizing
//!
//! Finds the largest font size at which a string still renders strictly inside a
//! [`FitBox`]. The search is a fixed-length bisection over a bounded size range:
//!
//! 1. Measure the text at the midpoint of `[low, high]`
//! 2. If it fits, the midpoint becomes the new `low` (a confirmed-feasible size)
//! 3. Otherwise it becomes the new `high`
//! 4. After [`FIT_ITERATIONS`] steps, return `low`
//!
//! `low` only ever moves to sizes that were measured to fit, so the result honours
//! the box whenever the range's lower bound does. The gap to the true maximum is at
//! most `(high - low) / 2^20`, far below a visible pixel.
//!
//! Two configurations are used by the display:
//! - [`AutoFit::TIME`]: `[10, 800]`, bounded by width and height
//! - [`AutoFit::DATE`]: `[5, 300]`, bounded by width only

use crate::measure::{MeasureError, TextBounds, TextMeasurer};
use crate::style::TextStyle;
use crate::FitBox;
use thiserror::Error;
use tracing::debug;

/// Number of bisection steps per search.
pub const FIT_ITERATIONS: u32 = 20;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// The measurement oracle failed; the render pass cannot continue
    #[error("measuring {text:?} failed: {source}")]
    Measure {
        text: String,
        #[source]
        source: MeasureError,
    },
}

/// Which box dimensions a search has to respect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitConstraint {
    Width,
    WidthAndHeight,
}

impl FitConstraint {
    pub fn fits(&self, bounds: TextBounds, target: FitBox) -> bool {
        let width_ok = bounds.width < target.max_width_px;
        match self {
            FitConstraint::Width => width_ok,
            FitConstraint::WidthAndHeight => width_ok && bounds.height < target.max_height_px,
        }
    }
}

/// A bounded bisection search configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoFit {
    pub low: f32,
    pub high: f32,
    pub constraint: FitConstraint,
}

impl AutoFit {
    /// Sizing for the time of day: fills both the width and height targets.
    pub const TIME: AutoFit = AutoFit {
        low: 10.0,
        high: 800.0,
        constraint: FitConstraint::WidthAndHeight,
    };

    /// Sizing for the date line: only the width target matters.
    pub const DATE: AutoFit = AutoFit {
        low: 5.0,
        high: 300.0,
        constraint: FitConstraint::Width,
    };

    /// Largest tested size at which `text` fits inside `target`.
    ///
    /// Empty text has nothing to fit and returns the lower bound without
    /// consulting the measurer. If even the lower bound overflows, the lower
    /// bound is still returned; callers pick a range suited to their surface.
    pub fn fit_size<M: TextMeasurer + ?Sized>(
        &self,
        text: &str,
        template: &TextStyle,
        target: FitBox,
        measurer: &M,
    ) -> Result<f32, FitError> {
        if text.is_empty() {
            return Ok(self.low);
        }

        let mut low = self.low;
        let mut high = self.high;
        for _ in 0..FIT_ITERATIONS {
            let mid = (low + high) / 2.0;
            let bounds = measurer
                .measure(text, &template.at_size(mid))
                .map_err(|source| FitError::Measure {
                    text: text.to_string(),
                    source,
                })?;
            if self.constraint.fits(bounds, target) {
                low = mid;
            } else {
                high = mid;
            }
        }

        if low == self.low {
            debug!(
                text,
                width = target.max_width_px,
                height = target.max_height_px,
                "no tested size fits, using lower bound"
            );
        }
        Ok(low)
    }
}

/// Free-function form of [`AutoFit::fit_size`].
pub fn fit_size<M: TextMeasurer + ?Sized>(
    fit: &AutoFit,
    text: &str,
    template: &TextStyle,
    target: FitBox,
    measurer: &M,
) -> Result<f32, FitError> {
    fit.fit_size(text, template, target, measurer)
}

/// Remembers the last `(text, box) -> size` answer of one search.
///
/// The display recomputes sizes on every render pass, but the inputs only change
/// once a minute or on resize, so one slot per search is enough.
#[derive(Debug, Default)]
pub struct FitMemo {
    last: Option<(String, FitBox, f32)>,
}

impl FitMemo {
    pub fn get_or_fit<M: TextMeasurer + ?Sized>(
        &mut self,
        fit: &AutoFit,
        text: &str,
        template: &TextStyle,
        target: FitBox,
        measurer: &M,
    ) -> Result<f32, FitError> {
        if let Some((last_text, last_box, size)) = &self.last {
            if last_text == text && *last_box == target {
                return Ok(*size);
            }
        }
        let size = fit.fit_size(text, template, target, measurer)?;
        self.last = Some((text.to_string(), target, size));
        Ok(size)
    }
}
