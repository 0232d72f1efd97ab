//! Loader: read local inputs (giveaway entries, time entries, teams, paste text),
//! validate JSON documents via Draft 2020-12 schemas and return typed values.
//! No network I/O; every read is capped at `MAX_INPUT_BYTES`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use oh_algo::{Nonprofit, Team, TimeEntry};
use oh_core::draw::Weighted;
use oh_core::ids::UserId;

use crate::schema::{self, SchemaKind};
use crate::{looks_like_url, IoError};

/// Hard cap for any single input file (16 MiB).
pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

const UTF8_BOM: char = '\u{feff}';

// ----------------------------- Wire-facing types -----------------------------

/// One giveaway participant. Fields other than `user_id`, `name` and `entries`
/// are kept verbatim in `payload` and travel into the draw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiveawayEntry {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raffle tickets earned.
    pub entries: u32,
    #[serde(flatten)]
    pub payload: BTreeMap<String, Value>,
}

impl Weighted for GiveawayEntry {
    #[inline]
    fn weight(&self) -> u64 {
        u64::from(self.entries)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiveawayEntries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giveaway_id: Option<String>,
    /// Order is significant: the draw replays only against the same order.
    pub entries: Vec<GiveawayEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntries {
    pub entries: Vec<TimeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamsDoc {
    pub nonprofits: Vec<Nonprofit>,
    pub teams: Vec<Team>,
}

// ----------------------------- Targeted loaders -----------------------------

pub fn load_giveaway_entries(path: &Path) -> Result<GiveawayEntries, IoError> {
    load_validated(path, SchemaKind::GiveawayEntries)
}

pub fn load_time_entries(path: &Path) -> Result<TimeEntries, IoError> {
    load_validated(path, SchemaKind::TimeEntries)
}

pub fn load_teams(path: &Path) -> Result<TeamsDoc, IoError> {
    load_validated(path, SchemaKind::Teams)
}

/// Pasted spreadsheet text from a file, or stdin when `path` is `-`.
pub fn read_paste_text(path: &Path) -> Result<String, IoError> {
    if path.as_os_str() == "-" {
        return read_paste_from(std::io::stdin().lock(), "<stdin>");
    }
    let f = open_checked(path)?;
    read_paste_from(f, &path.display().to_string())
}

/// Read paste text from any reader, enforcing the size cap and dropping a UTF-8 BOM.
pub fn read_paste_from<R: Read>(reader: R, label: &str) -> Result<String, IoError> {
    let bytes = read_capped(reader, label)?;
    let text = String::from_utf8(bytes).map_err(|e| IoError::Read(format!("{label}: not UTF-8 ({e})")))?;
    Ok(match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

// ----------------------------- Helpers -----------------------------

fn load_validated<T>(path: &Path, kind: SchemaKind) -> Result<T, IoError>
where
    T: for<'de> Deserialize<'de>,
{
    let v = read_json_value_with_limits(path)?;
    schema::validate_value(kind, &v)?;
    serde_json::from_value(v).map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })
}

/// Read and parse a JSON file, enforcing the offline policy and size cap.
pub fn read_json_value_with_limits(path: &Path) -> Result<Value, IoError> {
    let f = open_checked(path)?;
    let bytes = read_capped(f, &path.display().to_string())?;
    let text = std::str::from_utf8(&bytes).map_err(|e| IoError::Read(format!("{}: not UTF-8 ({e})", path.display())))?;
    serde_json::from_str(text.trim_start_matches(UTF8_BOM)).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{}: {e}", path.display()),
    })
}

fn open_checked(path: &Path) -> Result<File, IoError> {
    if looks_like_url(&path.to_string_lossy()) {
        return Err(IoError::Path(format!("must be a local file path (no URLs): {}", path.display())));
    }
    let f = File::open(path).map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;
    let md = f.metadata().map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;
    if md.is_dir() {
        return Err(IoError::Read(format!("{}: is a directory", path.display())));
    }
    if md.len() > MAX_INPUT_BYTES {
        return Err(limit_err(path.display(), md.len()));
    }
    Ok(f)
}

fn read_capped<R: Read>(reader: R, label: &str) -> Result<Vec<u8>, IoError> {
    let mut buf = Vec::new();
    // One byte past the cap tells "exactly at the limit" from "over it".
    reader
        .take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Read(format!("{label}: {e}")))?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(limit_err(label, buf.len() as u64));
    }
    Ok(buf)
}

fn limit_err(label: impl std::fmt::Display, size: u64) -> IoError {
    IoError::Limit(format!("{label}: {size} bytes exceeds {MAX_INPUT_BYTES}"))
}
