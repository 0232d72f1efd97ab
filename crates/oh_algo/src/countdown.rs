//! crates/oh_algo/src/countdown.rs
//! Event countdowns and venue-local date labels. The caller supplies `now`.

use core::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use thiserror::Error;

const MAX_OFFSET_HOURS: i32 = 23;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CountdownError {
    #[error("unrecognised UTC offset '{0}' (try UTC, +05:30, -0700 or UTC-7)")]
    BadOffset(String),
}

/// Parse an operator-typed offset: `UTC`, `GMT`, `Z`, `+05:30`, `-0700`, `UTC-7`.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, CountdownError> {
    let bad = || CountdownError::BadOffset(s.to_string());
    let t = s.trim();
    let upper = t.to_ascii_uppercase();
    if matches!(upper.as_str(), "UTC" | "GMT" | "Z") {
        return FixedOffset::east_opt(0).ok_or_else(bad);
    }
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);

    let (sign, body) = match rest.as_bytes().first() {
        Some(b'+') => (1, &rest[1..]),
        Some(b'-') => (-1, &rest[1..]),
        _ => return Err(bad()),
    };
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return Err(bad());
    }

    let (h, m) = match body.split_once(':') {
        Some((h, m)) if (1..=2).contains(&h.len()) && m.len() == 2 => (h, m),
        Some(_) => return Err(bad()),
        None if body.len() <= 2 => (body, "0"),
        None if body.len() == 4 => body.split_at(2),
        None => return Err(bad()),
    };
    let hours: i32 = h.parse().map_err(|_| bad())?;
    let minutes: i32 = m.parse().map_err(|_| bad())?;
    if hours > MAX_OFFSET_HOURS || minutes >= 60 {
        return Err(bad());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(bad)
}

/// Time left until an event, broken into display units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    /// `target` is at or before `now`; all units are zero.
    pub elapsed: bool,
}

impl Countdown {
    pub fn until(now: DateTime<Utc>, target: DateTime<Utc>) -> Self {
        let left = (target - now).num_seconds();
        if left <= 0 {
            return Self { days: 0, hours: 0, minutes: 0, seconds: 0, elapsed: true };
        }
        // Each remainder is < 60 or < 24, so the narrowing casts are exact.
        Self {
            days: left / 86_400,
            hours: (left % 86_400 / 3_600) as u8,
            minutes: (left % 3_600 / 60) as u8,
            seconds: (left % 60) as u8,
            elapsed: false,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * 86_400 + i64::from(self.hours) * 3_600 + i64::from(self.minutes) * 60 + i64::from(self.seconds)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {:02}h {:02}m {:02}s", self.days, self.hours, self.minutes, self.seconds)
    }
}

/// `"Sat, Oct 12, 2024 09:00 (UTC-07:00)"`.
pub fn format_local(target: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = target.with_timezone(&offset);
    format!("{} (UTC{})", local.format("%a, %b %-d, %Y %H:%M"), offset_label(offset))
}

/// `"+05:30"`, `"-07:00"`, `"+00:00"`.
pub fn offset_label(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    format!("{sign}{:02}:{:02}", abs / 3600, abs % 3600 / 60)
}
