//! crates/oh_algo/src/hours.rs
//! Volunteer time tracking: per-user, per-local-day totals.
//!
//! Days are calendar days in one operator-chosen UTC offset (the venue's), so a
//! shift from 22:00 to 01:30 counts 2h on the first day and 1.5h on the next.
//! Totals are integer seconds; rounding happens only in `hours_tenths`.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use oh_core::ids::UserId;

const SECONDS_PER_HOUR: i64 = 3_600;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub user_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HoursIssue {
    #[error("entry {index} ({user_id}): ends before it starts; skipped")]
    NegativeSpan {
        index: usize,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub seconds: i64,
}

impl DayTotal {
    pub fn hours_tenths(&self) -> i64 {
        hours_tenths(self.seconds)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserHours {
    pub user_id: UserId,
    pub total_seconds: i64,
    pub days: Vec<DayTotal>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HoursSummary {
    pub users: Vec<UserHours>,
    pub total_seconds: i64,
    pub issues: Vec<HoursIssue>,
}

/// Whole seconds → tenths of an hour, half-up (`5400` → `15`, i.e. 1.5h).
#[inline]
pub fn hours_tenths(seconds: i64) -> i64 {
    (seconds * 10 + SECONDS_PER_HOUR / 2).div_euclid(SECONDS_PER_HOUR)
}

/// Group entries by user and local day in `offset`, splitting at local midnight.
pub fn aggregate_hours(entries: &[TimeEntry], offset: FixedOffset) -> HoursSummary {
    let mut per_user: BTreeMap<&UserId, BTreeMap<NaiveDate, i64>> = BTreeMap::new();
    let mut issues = Vec::new();

    for (index, e) in entries.iter().enumerate() {
        if e.end < e.start {
            issues.push(HoursIssue::NegativeSpan {
                index,
                user_id: e.user_id.clone(),
                start: e.start,
                end: e.end,
            });
            continue;
        }
        let days = per_user.entry(&e.user_id).or_default();
        for (date, secs) in split_by_local_day(e.start, e.end, offset) {
            *days.entry(date).or_insert(0) += secs;
        }
    }

    let users: Vec<UserHours> = per_user
        .into_iter()
        .map(|(user_id, days)| {
            let days: Vec<DayTotal> = days
                .into_iter()
                .map(|(date, seconds)| DayTotal { date, seconds })
                .collect();
            UserHours {
                user_id: user_id.clone(),
                total_seconds: days.iter().map(|d| d.seconds).sum(),
                days,
            }
        })
        .collect();

    HoursSummary {
        total_seconds: users.iter().map(|u| u.total_seconds).sum(),
        users,
        issues,
    }
}

fn split_by_local_day(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<(NaiveDate, i64)> {
    let end = end.with_timezone(&offset);
    let mut cursor = start.with_timezone(&offset);
    let mut pieces = Vec::new();
    while cursor < end {
        let date = cursor.date_naive();
        let midnight = date
            .succ_opt()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|n| offset.from_local_datetime(&n).single());
        let piece_end = match midnight {
            Some(m) if m < end => m,
            _ => end,
        };
        pieces.push((date, (piece_end - cursor).num_seconds()));
        cursor = piece_end;
    }
    pieces
}
