// crates/oh_pipeline/src/reports.rs
//
// Serializable report documents for hours, teams and countdowns. These wrap
// the algorithm outputs with the presentation numbers operators read (tenths of
// an hour, counts, venue-local labels) so the CLI can emit them as-is.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use oh_algo::hours::hours_tenths;
use oh_algo::{aggregate_hours, format_local, group_teams, offset_label, Countdown, HoursIssue, NonprofitGroup, Team};
use oh_core::ids::UserId;
use oh_io::loader::{TeamsDoc, TimeEntries};

// ---------------- Hours ----------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoursReport {
    pub utc_offset: String,
    pub total_seconds: i64,
    pub total_hours_tenths: i64,
    pub users: Vec<UserHoursRow>,
    pub issues: Vec<HoursIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserHoursRow {
    pub user_id: UserId,
    pub total_seconds: i64,
    pub total_hours_tenths: i64,
    pub days: Vec<DayRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub seconds: i64,
    pub hours_tenths: i64,
}

pub fn hours_report(doc: &TimeEntries, offset: FixedOffset) -> HoursReport {
    let summary = aggregate_hours(&doc.entries, offset);
    for issue in &summary.issues {
        warn!("{issue}");
    }
    info!(users = summary.users.len(), total_seconds = summary.total_seconds, "hours aggregated");

    HoursReport {
        utc_offset: offset_label(offset),
        total_seconds: summary.total_seconds,
        total_hours_tenths: hours_tenths(summary.total_seconds),
        users: summary
            .users
            .into_iter()
            .map(|u| UserHoursRow {
                total_hours_tenths: hours_tenths(u.total_seconds),
                total_seconds: u.total_seconds,
                days: u
                    .days
                    .iter()
                    .map(|d| DayRow { date: d.date, seconds: d.seconds, hours_tenths: d.hours_tenths() })
                    .collect(),
                user_id: u.user_id,
            })
            .collect(),
        issues: summary.issues,
    }
}

// ---------------- Teams ----------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamsReport {
    pub counts: TeamCounts,
    pub groups: Vec<NonprofitGroup>,
    pub unassigned: Vec<Team>,
    pub dangling: Vec<Team>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamCounts {
    pub nonprofits: usize,
    pub teams: usize,
    pub assigned: usize,
    pub unassigned: usize,
    pub dangling: usize,
}

pub fn teams_report(doc: &TeamsDoc) -> TeamsReport {
    let a = group_teams(&doc.nonprofits, &doc.teams);
    let counts = TeamCounts {
        nonprofits: a.groups.len(),
        teams: doc.teams.len(),
        assigned: a.assigned_count(),
        unassigned: a.unassigned.len(),
        dangling: a.dangling.len(),
    };
    if counts.dangling > 0 {
        warn!(dangling = counts.dangling, "teams point at unknown nonprofits");
    }
    info!(nonprofits = counts.nonprofits, teams = counts.teams, "teams grouped");
    TeamsReport { counts, groups: a.groups, unassigned: a.unassigned, dangling: a.dangling }
}

// ---------------- Countdown ----------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownReport {
    pub target: DateTime<Utc>,
    pub target_local: String,
    pub remaining: String,
    pub countdown: Countdown,
}

pub fn countdown_report(now: DateTime<Utc>, target: DateTime<Utc>, offset: FixedOffset) -> CountdownReport {
    let countdown = Countdown::until(now, target);
    CountdownReport {
        target,
        target_local: format_local(target, offset),
        remaining: countdown.to_string(),
        countdown,
    }
}
