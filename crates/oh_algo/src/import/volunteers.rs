//! Volunteer sign-up sheets (mentor, judge) and their column tables.
//!
//! Headers are the question texts of the sign-up forms, as they appear in the
//! response spreadsheet's first row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::mapping::{FieldMap, FieldRule, HeaderMapping, StaticValue};

const IN_PERSON: &str = "Are you joining us in-person at ASU Tempe?";
const CODE_OF_CONDUCT: &str = "Do you agree to our code of conduct?";

const MENTOR_COLUMNS: &[FieldMap] = &[
    FieldMap::text("Timestamp", "timestamp"),
    FieldMap::text("Email Address", "email"),
    FieldMap::text("Your Name", "name"),
    FieldMap::text("Your LinkedIn Profile", "linkedinProfile"),
    FieldMap::text("What company are you working for?", "company"),
    FieldMap::text("What is your area of expertise?", "expertise"),
    FieldMap::text("Which days and times are you available?", "availability"),
    FieldMap::flag(IN_PERSON, "isInPerson", FieldRule::YesFlag),
    FieldMap::text("Shirt size", "shirtSize"),
    FieldMap::text("Anything else you want us to know?", "notes"),
    FieldMap::flag(CODE_OF_CONDUCT, "agreedToCodeOfConduct", FieldRule::AgreeFlag),
];

const JUDGE_COLUMNS: &[FieldMap] = &[
    FieldMap::text("Timestamp", "timestamp"),
    FieldMap::text("Email Address", "email"),
    FieldMap::text("Your Name", "name"),
    FieldMap::text("Your title", "title"),
    FieldMap::text("Company", "companyName"),
    FieldMap::text("Your LinkedIn Profile", "linkedinProfile"),
    FieldMap::text("Short bio", "biography"),
    FieldMap::text("Photo of you", "photoUrl"),
    FieldMap::text("Which days are you available to judge?", "availability"),
    FieldMap::flag(IN_PERSON, "isInPerson", FieldRule::YesFlag),
    FieldMap::flag(CODE_OF_CONDUCT, "agreedToCodeOfConduct", FieldRule::AgreeFlag),
];

pub static MENTOR_MAPPING: HeaderMapping = HeaderMapping {
    name: "mentor",
    columns: MENTOR_COLUMNS,
    defaults: &[("linkedinProfile", StaticValue::Text(""))],
    forced: &[("isSelected", StaticValue::Bool(false))],
};

pub static JUDGE_MAPPING: HeaderMapping = HeaderMapping {
    name: "judge",
    columns: JUDGE_COLUMNS,
    defaults: &[("linkedinProfile", StaticValue::Text(""))],
    forced: &[("isSelected", StaticValue::Bool(false))],
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolunteerKind {
    Mentor,
    Judge,
}

impl VolunteerKind {
    pub fn mapping(self) -> &'static HeaderMapping {
        match self {
            VolunteerKind::Mentor => &MENTOR_MAPPING,
            VolunteerKind::Judge => &JUDGE_MAPPING,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            VolunteerKind::Mentor => "mentor",
            VolunteerKind::Judge => "judge",
        }
    }
}

impl fmt::Display for VolunteerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VolunteerKindError {
    #[error("unknown volunteer kind '{0}' (expected mentor or judge)")]
    Unknown(String),
}

impl FromStr for VolunteerKind {
    type Err = VolunteerKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mentor" | "mentors" => Ok(VolunteerKind::Mentor),
            "judge" | "judges" => Ok(VolunteerKind::Judge),
            other => Err(VolunteerKindError::Unknown(other.to_string())),
        }
    }
}
