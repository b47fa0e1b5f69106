//! # Minute-Aligned Clock Ticker
//!
//! Keeps the published [`ClockSnapshot`] current. Each iteration of the loop reads
//! the wall clock, publishes a new snapshot and sleeps until the next minute
//! boundary. The sleep length is recomputed from the wall clock every time rather
//! than accumulated, so a late wake-up corrects itself on the following tick.
//!
//! ## Lifecycle
//! A loop is spawned with [`Ticker::spawn`] and returns a [`TickerHandle`].
//! Cancelling the handle (or dropping it) ends the loop at its next wake-up or
//! immediately if it is sleeping. There is no pause: a new loop is spawned on
//! reactivation and publishes a fresh snapshot before its first sleep.

use crate::ClockSnapshot;
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Lower bound for the inter-tick sleep, in milliseconds.
///
/// Guards against zero or negative delays when the wake-up lands a few
/// milliseconds past the boundary.
pub const MIN_TICK_DELAY_MS: i64 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Timezone identifier not found in the tz database
    #[error("invalid timezone identifier: {0:?}")]
    InvalidZone(String),
}

/// Resolve an IANA zone name such as `Asia/Tokyo`.
pub fn parse_zone(name: &str) -> Result<Tz, ClockError> {
    name.parse::<Tz>()
        .map_err(|_| ClockError::InvalidZone(name.to_string()))
}

/// Source of the current instant.
pub trait WallClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// How the date line is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `2026年 10月 16日（金）`
    #[default]
    Japanese,
    /// `Friday, 16 October 2026`
    English,
}

const JAPANESE_WEEKDAYS: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

fn japanese_weekday(weekday: Weekday) -> &'static str {
    JAPANESE_WEEKDAYS[weekday.num_days_from_monday() as usize]
}

impl DateStyle {
    pub fn format<T: TimeZone>(&self, time: &DateTime<T>) -> String
    where
        T::Offset: std::fmt::Display,
    {
        match self {
            DateStyle::Japanese => format!(
                "{}年 {}月 {}日（{}）",
                time.year(),
                time.month(),
                time.day(),
                japanese_weekday(time.weekday())
            ),
            DateStyle::English => time.format("%A, %-d %B %Y").to_string(),
        }
    }
}

/// Format `now` in `zone`: time as `HH:mm`, date per `date_style`.
pub fn current_snapshot(now: DateTime<Utc>, zone: &Tz, date_style: DateStyle) -> ClockSnapshot {
    let local = now.with_timezone(zone);
    ClockSnapshot {
        time_text: local.format("%H:%M").to_string(),
        date_text: date_style.format(&local),
    }
}

/// Time left until the next minute boundary, never less than
/// [`MIN_TICK_DELAY_MS`].
///
/// `(60 - second) * 1000 - millis`. A leap second (nanoseconds past one billion)
/// counts as second 60.
pub fn schedule_next_tick<T: Timelike>(now: &T) -> Duration {
    let nanos = now.nanosecond();
    let second = i64::from(now.second()) + i64::from(nanos / 1_000_000_000);
    let millis = i64::from(nanos % 1_000_000_000 / 1_000_000);
    let delay = (60 - second) * 1000 - millis;
    Duration::from_millis(delay.max(MIN_TICK_DELAY_MS) as u64)
}

/// Holder for the latest snapshot.
///
/// Every update replaces the whole value, so readers never observe a time from
/// one tick paired with a date from another.
#[derive(Clone, Debug)]
pub struct SnapshotCell {
    tx: Arc<watch::Sender<ClockSnapshot>>,
}

impl SnapshotCell {
    pub fn new(initial: ClockSnapshot) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn publish(&self, snapshot: ClockSnapshot) {
        self.tx.send_replace(snapshot);
    }

    pub fn current(&self) -> ClockSnapshot {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<ClockSnapshot> {
        self.tx.subscribe()
    }
}

/// Everything a tick loop needs. Cheap to clone.
#[derive(Clone)]
pub struct Ticker {
    clock: Arc<dyn WallClock>,
    zone: Tz,
    date_style: DateStyle,
    cell: SnapshotCell,
}

impl Ticker {
    pub fn new(clock: Arc<dyn WallClock>, zone: Tz, date_style: DateStyle, cell: SnapshotCell) -> Self {
        Self {
            clock,
            zone,
            date_style,
            cell,
        }
    }

    /// Compute and publish one snapshot, returning the delay until the next one.
    pub fn tick(&self) -> Duration {
        let now = self.clock.now();
        let snapshot = current_snapshot(now, &self.zone, self.date_style);
        let delay = schedule_next_tick(&now.with_timezone(&self.zone));
        debug!(time = %snapshot.time_text, delay_ms = delay.as_millis() as u64, "tick");
        self.cell.publish(snapshot);
        delay
    }

    /// Start the loop on the current tokio runtime.
    pub fn spawn(self) -> TickerHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let join = tokio::spawn(self.run(cancel_rx));
        TickerHandle {
            cancel: cancel_tx,
            join,
        }
    }

    async fn run(self, mut cancel: watch::Receiver<bool>) {
        info!(zone = self.zone.name(), "ticker started");
        loop {
            if *cancel.borrow() {
                break;
            }
            let delay = self.tick();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = cancel.changed() => {
                    // A dropped handle counts as cancellation
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
            }
        }
        info!("ticker stopped");
    }
}

/// Owned handle to a running tick loop.
#[derive(Debug)]
pub struct TickerHandle {
    cancel: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TickerHandle {
    /// Signal the loop to stop and wait for it to exit.
    pub async fn cancel(self) {
        self.cancel.send_replace(true);
        if let Err(err) = self.join.await {
            debug!(%err, "ticker task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
