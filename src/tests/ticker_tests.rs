//! # Ticker Scheduling Tests
//!
//! Covers the minute-boundary delay, the one-minute step between consecutive
//! snapshots (including DST transitions) and the running loop under tokio's
//! paused clock.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use neon_clock_lib::ticker::{
    current_snapshot, parse_zone, schedule_next_tick, DateStyle, SnapshotCell, Ticker, WallClock,
};
use neon_clock_lib::ClockSnapshot;
use std::sync::Arc;
use std::time::Duration;

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_milli_opt(h, mi, s, ms)
        .unwrap()
        .and_utc()
}

fn minutes_of_day(time_text: &str) -> u32 {
    let (h, m) = time_text.split_once(':').unwrap();
    h.parse::<u32>().unwrap() * 60 + m.parse::<u32>().unwrap()
}

/// The timer wheel rounds deadlines up to whole milliseconds.
fn assert_near(actual: Duration, expected: Duration) {
    assert!(
        actual >= expected && actual < expected + Duration::from_millis(5),
        "expected ~{expected:?}, got {actual:?}"
    );
}

/// Wall clock that advances with tokio's (possibly paused) clock.
struct TokioClock {
    base: DateTime<Utc>,
    start: tokio::time::Instant,
}

impl TokioClock {
    fn starting_at(base: DateTime<Utc>) -> Self {
        Self {
            base,
            start: tokio::time::Instant::now(),
        }
    }
}

impl WallClock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = tokio::time::Instant::now() - self.start;
        self.base + ChronoDuration::from_std(elapsed).unwrap()
    }
}

#[test]
fn delay_at_45_seconds_is_15000_ms() {
    let delay = schedule_next_tick(&utc(2026, 10, 16, 8, 0, 45, 0));
    assert_eq!(delay.as_millis(), 15_000);
}

#[test]
fn delay_near_boundary_is_floored_to_100_ms() {
    let delay = schedule_next_tick(&utc(2026, 10, 16, 8, 0, 59, 950));
    assert_eq!(delay.as_millis(), 100);
}

#[test]
fn late_wakeup_is_corrected_on_next_tick() {
    // Woke 250ms after the boundary: the next sleep is shortened accordingly
    let delay = schedule_next_tick(&utc(2026, 10, 16, 8, 1, 0, 250));
    assert_eq!(delay.as_millis(), 59_750);
}

#[test]
fn consecutive_snapshots_are_one_minute_apart() {
    let zone = parse_zone("Asia/Tokyo").unwrap();
    let mut instant = utc(2026, 10, 16, 14, 57, 13, 420);

    for _ in 0..10 {
        let before = current_snapshot(instant, &zone, DateStyle::Japanese);
        let delay = schedule_next_tick(&instant.with_timezone(&zone));
        instant += ChronoDuration::from_std(delay).unwrap();
        let after = current_snapshot(instant, &zone, DateStyle::Japanese);

        let step = (minutes_of_day(&after.time_text) + 1440 - minutes_of_day(&before.time_text)) % 1440;
        assert_eq!(step, 1, "{} -> {}", before.time_text, after.time_text);
    }
}

#[test]
fn midnight_rolls_the_date() {
    let zone = parse_zone("Asia/Tokyo").unwrap();
    // 23:59 in Tokyo
    let before = current_snapshot(utc(2026, 10, 16, 14, 59, 30, 0), &zone, DateStyle::Japanese);
    let after = current_snapshot(utc(2026, 10, 16, 15, 0, 0, 0), &zone, DateStyle::Japanese);
    assert_eq!(before.time_text, "23:59");
    assert_eq!(before.date_text, "2026年 10月 16日（金）");
    assert_eq!(after.time_text, "00:00");
    assert_eq!(after.date_text, "2026年 10月 17日（土）");
}

#[test]
fn spring_forward_skips_an_hour() {
    let zone = parse_zone("Europe/Berlin").unwrap();
    let before = current_snapshot(utc(2026, 3, 29, 0, 59, 0, 0), &zone, DateStyle::English);
    let after = current_snapshot(utc(2026, 3, 29, 1, 0, 0, 0), &zone, DateStyle::English);
    assert_eq!(before.time_text, "01:59");
    assert_eq!(after.time_text, "03:00");
}

#[test]
fn fall_back_repeats_an_hour() {
    let zone = parse_zone("Europe/Berlin").unwrap();
    let before = current_snapshot(utc(2026, 10, 25, 0, 59, 0, 0), &zone, DateStyle::English);
    let after = current_snapshot(utc(2026, 10, 25, 1, 0, 0, 0), &zone, DateStyle::English);
    assert_eq!(before.time_text, "02:59");
    assert_eq!(after.time_text, "02:00");
    assert_eq!(after.date_text, "Sunday, 25 October 2026");
}

#[tokio::test(start_paused = true)]
async fn loop_ticks_on_minute_boundaries() {
    let zone = parse_zone("UTC").unwrap();
    let clock = Arc::new(TokioClock::starting_at(utc(2026, 10, 16, 12, 0, 45, 0)));
    let cell = SnapshotCell::new(ClockSnapshot {
        time_text: String::new(),
        date_text: String::new(),
    });
    let mut rx = cell.subscribe();
    let started = tokio::time::Instant::now();
    let handle = Ticker::new(clock, zone, DateStyle::English, cell).spawn();

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().time_text, "12:00");

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().time_text, "12:01");
    assert_near(started.elapsed(), Duration::from_secs(15));

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().time_text, "12:02");
    assert_near(started.elapsed(), Duration::from_secs(75));

    handle.cancel().await;
}

#[tokio::test(start_paused = true)]
async fn restart_publishes_fresh_snapshot() {
    let zone = parse_zone("UTC").unwrap();
    let clock = Arc::new(TokioClock::starting_at(utc(2026, 10, 16, 12, 0, 30, 0)));
    let cell = SnapshotCell::new(ClockSnapshot {
        time_text: String::new(),
        date_text: String::new(),
    });
    let mut rx = cell.subscribe();

    let first = Ticker::new(clock.clone(), zone, DateStyle::English, cell.clone()).spawn();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().time_text, "12:00");
    first.cancel().await;

    // Stay inactive across several minute boundaries
    tokio::time::sleep(Duration::from_secs(200)).await;
    assert!(!rx.has_changed().unwrap());

    let second = Ticker::new(clock, zone, DateStyle::English, cell).spawn();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().time_text, "12:03");
    second.cancel().await;
}
