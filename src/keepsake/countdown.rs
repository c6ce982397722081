//! Local datetimes and countdown arithmetic.
//!
//! Datetimes come from `<input type="datetime-local">` and carry no zone, so
//! they are compared on a naive local timeline: milliseconds since 1970-01-01T00:00
//! in the same (unspecified) local zone as `now`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};

use crate::error::FxError;

use super::records::{Counter, CounterMode, Event};

/// Events that started less than this long ago still count as upcoming.
pub const EVENT_GRACE_MS: i64 = 60_000;

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const INPUT_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// A zone-less `YYYY-MM-DDTHH:MM` datetime, minute precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalDateTime(NaiveDateTime);

impl LocalDateTime {
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Milliseconds on the naive local timeline.
    pub fn local_ms(&self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }
}

impl FromStr for LocalDateTime {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = NaiveDateTime::parse_from_str(s, INPUT_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, INPUT_FORMAT_SECONDS))
            .map_err(|_| FxError::InvalidDateTime(s.to_string()))?;
        // seconds, if present, are dropped
        let dt = dt
            .with_second(0)
            .ok_or_else(|| FxError::InvalidDateTime(s.to_string()))?;
        Ok(Self(dt))
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(INPUT_FORMAT))
    }
}

pub fn pad2(n: u64) -> String {
    format!("{n:02}")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MsParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl fmt::Display for MsParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}:{}:{}",
            self.days,
            pad2(self.hours),
            pad2(self.minutes),
            pad2(self.seconds)
        )
    }
}

/// Split a duration into whole days/hours/minutes/seconds. Negative is zero.
pub fn ms_parts(ms: i64) -> MsParts {
    let total = (ms.max(0) / 1000) as u64;
    MsParts {
        days: total / 86_400,
        hours: (total % 86_400) / 3600,
        minutes: (total % 3600) / 60,
        seconds: total % 60,
    }
}

/// Signed time a counter displays at `now_local_ms`: elapsed for `since`,
/// remaining for `until`.
pub fn counter_ms(counter: &Counter, now_local_ms: i64) -> Result<i64, FxError> {
    let target = counter.target_local.parse::<LocalDateTime>()?.local_ms();
    Ok(match counter.mode {
        CounterMode::Since => now_local_ms - target,
        CounterMode::Until => target - now_local_ms,
    })
}

/// Earliest event not more than a minute in the past. Unparseable event
/// times are skipped.
pub fn next_upcoming_event(events: &[Event], now_local_ms: i64) -> Option<&Event> {
    events
        .iter()
        .filter_map(|ev| match ev.event_local.parse::<LocalDateTime>() {
            Ok(at) => Some((at.local_ms(), ev)),
            Err(err) => {
                log::warn!("keepsake: skipping event {:?}: {err}", ev.title);
                None
            }
        })
        .filter(|(at, _)| at - now_local_ms > -EVENT_GRACE_MS)
        .min_by_key(|(at, _)| *at)
        .map(|(_, ev)| ev)
}
