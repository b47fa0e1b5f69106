//! # Auto-Fit Sizing Properties
//!
//! Verifies the fit invariant over wide ranges of boxes and strings, plus the
//! monotonicity and determinism of the bisection.

use neon_clock_lib::fit::AutoFit;
use neon_clock_lib::measure::{HeuristicMeasurer, MonoMetricsMeasurer, TextMeasurer};
use neon_clock_lib::style::TextStyle;
use neon_clock_lib::FitBox;
use proptest::prelude::*;

fn measured_width<M: TextMeasurer>(measurer: &M, text: &str, size: f32) -> f32 {
    measurer
        .measure(text, &TextStyle::default().at_size(size))
        .unwrap()
        .width
}

/// The reference case: a 1000×400 box and "12:34".
#[test]
fn time_fills_reference_box() {
    let measurer = MonoMetricsMeasurer::default();
    let target = FitBox::new(1000.0, 400.0);
    let size = AutoFit::TIME
        .fit_size("12:34", &TextStyle::default(), target, &measurer)
        .unwrap();

    let bounds = measurer
        .measure("12:34", &TextStyle::default().at_size(size))
        .unwrap();
    assert!(bounds.width < 1000.0, "overflowed width: {}", bounds.width);
    assert!(bounds.height < 400.0, "overflowed height: {}", bounds.height);
    // Converged close to the edge, far above the lower bound
    assert!(bounds.width > 990.0, "did not fill the box: {}", bounds.width);
}

/// No overflow for any box width between 100 and 4000 pixels.
#[test]
fn sweep_never_overflows() {
    let mono = MonoMetricsMeasurer::default();
    let heuristic = HeuristicMeasurer::default();
    let template = TextStyle::default();

    for width in (100..=4000).step_by(25) {
        let target = FitBox::new(width as f32, width as f32 * 0.4);

        for (name, measurer) in [("mono", &mono as &dyn TextMeasurer), ("heuristic", &heuristic)] {
            let size = AutoFit::TIME.fit_size("12:34", &template, target, measurer).unwrap();
            let bounds = measurer.measure("12:34", &template.at_size(size)).unwrap();
            assert!(
                bounds.width < target.max_width_px && bounds.height < target.max_height_px,
                "{name}: {}x{} overflows {}x{} at size {size}",
                bounds.width,
                bounds.height,
                target.max_width_px,
                target.max_height_px
            );

            let date_size = AutoFit::DATE
                .fit_size("2026年 10月 16日（金）", &template, target, measurer)
                .unwrap();
            assert!(measured_width(&measurer, "2026年 10月 16日（金）", date_size) < target.max_width_px);
        }
    }
}

/// The date line shares the time's width target but may exceed its height.
#[test]
fn date_is_bounded_by_width_only() {
    let measurer = MonoMetricsMeasurer::default();
    let target = FitBox::new(2000.0, 10.0);
    let size = AutoFit::DATE
        .fit_size("Friday, 16 October 2026", &TextStyle::default(), target, &measurer)
        .unwrap();
    assert!(size > 10.0);
    assert!(measured_width(&measurer, "Friday, 16 October 2026", size) < 2000.0);
}

proptest! {
    /// Whatever the box, the chosen size fits strictly inside it.
    #[test]
    fn time_size_always_fits(
        text in "[0-2][0-9]:[0-5][0-9]",
        width in 100.0f32..4000.0,
        height in 20.0f32..4000.0,
    ) {
        let measurer = MonoMetricsMeasurer::default();
        let target = FitBox::new(width, height);
        let size = AutoFit::TIME.fit_size(&text, &TextStyle::default(), target, &measurer).unwrap();
        let bounds = measurer.measure(&text, &TextStyle::default().at_size(size)).unwrap();
        prop_assert!(bounds.width < width);
        prop_assert!(bounds.height < height);
    }

    /// A wider box never yields a smaller size.
    #[test]
    fn wider_box_never_shrinks_text(
        text in "[0-9 :年月日]{1,16}",
        width in 100.0f32..3000.0,
        extra in 0.0f32..1000.0,
    ) {
        let measurer = HeuristicMeasurer::default();
        let narrow = FitBox::new(width, 500.0);
        let wide = FitBox::new(width + extra, 500.0);
        let template = TextStyle::default();

        let a = AutoFit::DATE.fit_size(&text, &template, narrow, &measurer).unwrap();
        let b = AutoFit::DATE.fit_size(&text, &template, wide, &measurer).unwrap();
        prop_assert!(b >= a, "{b} < {a}");
    }

    /// Identical inputs give identical sizes.
    #[test]
    fn fit_is_deterministic(
        text in "[0-9:]{1,8}",
        width in 50.0f32..4000.0,
        height in 10.0f32..4000.0,
    ) {
        let measurer = MonoMetricsMeasurer::default();
        let target = FitBox::new(width, height);
        let template = TextStyle::default();
        let first = AutoFit::TIME.fit_size(&text, &template, target, &measurer).unwrap();
        let second = AutoFit::TIME.fit_size(&text, &template, target, &measurer).unwrap();
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }
}
