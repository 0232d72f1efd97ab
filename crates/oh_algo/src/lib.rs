// crates/oh_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Pure algorithms over already-fetched admin data. No I/O, no clocks: callers
//! pass `now` where time matters.

// ----------------------------- Bulk paste import ------------------------------------

pub mod import {
    pub mod mapping;
    pub mod paste;
    pub mod scan;
    pub mod volunteers;

    pub use mapping::{FieldMap, FieldRule, FieldValue, HeaderMapping, RawRecord, RecordTransform, StaticValue, TransformedRecord};
    pub use paste::{import_volunteers, parse_bulk_paste, ImportOutcome, MalformedInput};
    pub use scan::{scan_rows, unquote_cell, DropReason, DroppedRow, RawRow, ScanOutput};
    pub use volunteers::{VolunteerKind, VolunteerKindError, JUDGE_MAPPING, MENTOR_MAPPING};
}

// ----------------------------- Reporting helpers ------------------------------------

pub mod countdown;
pub mod hours;
pub mod teams;

pub use countdown::{format_local, offset_label, parse_utc_offset, Countdown, CountdownError};
pub use hours::{aggregate_hours, DayTotal, HoursIssue, HoursSummary, TimeEntry, UserHours};
pub use teams::{group_teams, Nonprofit, NonprofitGroup, Team, TeamAssignment};
