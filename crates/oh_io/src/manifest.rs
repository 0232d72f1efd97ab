// crates/oh_io/src/manifest.rs
//
// Job manifest for `ohack run`: one JSON file naming the inputs of up to four jobs
// (draw, import, hours, teams). Every job is optional, but at least one must be set.
//
// - Offline only: any path with a scheme is rejected.
// - Relative paths resolve against the manifest's own directory.
// - Unknown fields are rejected (typos should fail loudly, not be ignored).
// - `expect_entries_sha256` pins the canonical digest of the entries list; checked
//   by the pipeline after loading.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use oh_algo::import::VolunteerKind;
use oh_algo::parse_utc_offset;
use oh_core::draw::{SEED_MAX, SEED_MIN};
use oh_core::ids::{is_valid_sha256, Sha256};
use oh_core::DrawScheme;

use crate::loader::read_json_value_with_limits;
use crate::{looks_like_url, IoError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Free-form label, echoed in logs only.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub draw: Option<DrawJob>,
    #[serde(default)]
    pub import: Option<ImportJob>,
    #[serde(default)]
    pub hours: Option<HoursJob>,
    #[serde(default)]
    pub teams: Option<TeamsJob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawJob {
    pub entries_path: String,
    pub seed: i64,
    /// `lcg` (default), `lcg-browser` or `chacha20`.
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub expect_entries_sha256: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportJob {
    pub paste_path: String,
    pub kind: VolunteerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoursJob {
    pub entries_path: String,
    /// Defaults to UTC.
    #[serde(default)]
    pub utc_offset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamsJob {
    pub teams_path: String,
}

// ---------- resolved form ----------

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedManifest {
    pub id: Option<String>,
    pub draw: Option<ResolvedDraw>,
    pub import: Option<ResolvedImport>,
    pub hours: Option<ResolvedHours>,
    pub teams: Option<ResolvedTeams>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDraw {
    pub entries_path: PathBuf,
    pub seed: i64,
    pub scheme: DrawScheme,
    pub expect_entries_sha256: Option<Sha256>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImport {
    pub paste_path: PathBuf,
    pub kind: VolunteerKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHours {
    pub entries_path: PathBuf,
    pub offset: FixedOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTeams {
    pub teams_path: PathBuf,
}

// ---------- entry points ----------

/// Parse a manifest file (no validation beyond JSON shape).
pub fn load_manifest(path: &Path) -> Result<Manifest, IoError> {
    let v = read_json_value_with_limits(path)?;
    serde_json::from_value(v).map_err(|e| IoError::Manifest(format!("{}: {e}", path.display())))
}

/// Load → validate → resolve. The usual way in.
pub fn load_and_resolve(path: &Path) -> Result<ResolvedManifest, IoError> {
    let man = load_manifest(path)?;
    validate_manifest(&man)?;
    resolve_paths(path, &man)
}

/// Shape and offline checks. No filesystem access.
pub fn validate_manifest(man: &Manifest) -> Result<(), IoError> {
    if man.draw.is_none() && man.import.is_none() && man.hours.is_none() && man.teams.is_none() {
        return Err(IoError::Manifest("no jobs: set at least one of draw, import, hours, teams".into()));
    }
    if let Some(d) = &man.draw {
        path_check("draw.entries_path", &d.entries_path)?;
        if !(SEED_MIN..=SEED_MAX).contains(&d.seed) {
            return Err(IoError::Manifest(format!(
                "draw.seed {} outside [{SEED_MIN}, {SEED_MAX}]",
                d.seed
            )));
        }
        if let Some(s) = &d.scheme {
            parse_scheme(s)?;
        }
        if let Some(h) = &d.expect_entries_sha256 {
            if !is_valid_sha256(h) {
                return Err(IoError::Manifest(format!(
                    "draw.expect_entries_sha256 must be 64 lowercase hex: {h}"
                )));
            }
        }
    }
    if let Some(i) = &man.import {
        path_check("import.paste_path", &i.paste_path)?;
    }
    if let Some(h) = &man.hours {
        path_check("hours.entries_path", &h.entries_path)?;
        if let Some(o) = &h.utc_offset {
            parse_utc_offset(o).map_err(|e| IoError::Manifest(format!("hours.utc_offset: {e}")))?;
        }
    }
    if let Some(t) = &man.teams {
        path_check("teams.teams_path", &t.teams_path)?;
    }
    Ok(())
}

/// Resolve paths against the manifest's directory and check every input is a file.
pub fn resolve_paths(manifest_path: &Path, man: &Manifest) -> Result<ResolvedManifest, IoError> {
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    let draw = match &man.draw {
        Some(d) => Some(ResolvedDraw {
            entries_path: existing_file("draw.entries_path", base, &d.entries_path)?,
            seed: d.seed,
            scheme: d.scheme.as_deref().map(parse_scheme).transpose()?.unwrap_or_default(),
            expect_entries_sha256: d
                .expect_entries_sha256
                .as_deref()
                .map(|h| h.parse::<Sha256>().map_err(|e| IoError::Manifest(format!("draw.expect_entries_sha256: {e}"))))
                .transpose()?,
        }),
        None => None,
    };
    let import = match &man.import {
        Some(i) => Some(ResolvedImport {
            paste_path: existing_file("import.paste_path", base, &i.paste_path)?,
            kind: i.kind,
        }),
        None => None,
    };
    let hours = match &man.hours {
        Some(h) => Some(ResolvedHours {
            entries_path: existing_file("hours.entries_path", base, &h.entries_path)?,
            offset: match &h.utc_offset {
                Some(o) => parse_utc_offset(o).map_err(|e| IoError::Manifest(format!("hours.utc_offset: {e}")))?,
                None => FixedOffset::east_opt(0).ok_or_else(|| IoError::Manifest("UTC offset".into()))?,
            },
        }),
        None => None,
    };
    let teams = match &man.teams {
        Some(t) => Some(ResolvedTeams { teams_path: existing_file("teams.teams_path", base, &t.teams_path)? }),
        None => None,
    };

    Ok(ResolvedManifest { id: man.id.clone(), draw, import, hours, teams })
}

// ---------- helpers ----------

fn parse_scheme(s: &str) -> Result<DrawScheme, IoError> {
    s.parse()
        .map_err(|_| IoError::Manifest(format!("draw.scheme '{s}' (expected lcg, lcg-browser or chacha20)")))
}

fn path_check(label: &str, p: &str) -> Result<(), IoError> {
    if p.trim().is_empty() {
        return Err(IoError::Manifest(format!("{label} must not be empty")));
    }
    if looks_like_url(p) {
        return Err(IoError::Path(format!("{label} must be a local file path (no URLs): {p}")));
    }
    Ok(())
}

fn existing_file(label: &str, base: &Path, rel: &str) -> Result<PathBuf, IoError> {
    let p = Path::new(rel);
    let joined = if p.is_absolute() { p.to_path_buf() } else { base.join(p) };
    let md = fs::metadata(&joined).map_err(|e| IoError::Read(format!("{label} {}: {e}", joined.display())))?;
    if !md.is_file() {
        return Err(IoError::Read(format!("{label} {}: not a file", joined.display())));
    }
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oh_core::LcgArithmetic;

    fn setup(manifest: &str, files: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            let p = dir.path().join(f);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, "{}").unwrap();
        }
        let mp = dir.path().join("job.json");
        fs::write(&mp, manifest).unwrap();
        (dir, mp)
    }

    #[test]
    fn relative_paths_resolve_next_to_manifest() {
        let (dir, mp) = setup(
            r#"{"draw":{"entries_path":"in/entries.json","seed":-7,"scheme":"lcg-browser"},
                "hours":{"entries_path":"in/hours.json","utc_offset":"UTC-7"}}"#,
            &["in/entries.json", "in/hours.json"],
        );
        let r = load_and_resolve(&mp).unwrap();
        let d = r.draw.unwrap();
        assert_eq!(d.entries_path, dir.path().join("in/entries.json"));
        assert_eq!(d.seed, -7);
        assert_eq!(d.scheme, DrawScheme::Lcg(LcgArithmetic::Browser));
        assert_eq!(r.hours.unwrap().offset.local_minus_utc(), -7 * 3600);
        assert!(r.import.is_none() && r.teams.is_none());
    }

    #[test]
    fn scheme_defaults_to_exact_lcg() {
        let (_dir, mp) = setup(r#"{"draw":{"entries_path":"e.json","seed":1}}"#, &["e.json"]);
        assert_eq!(load_and_resolve(&mp).unwrap().draw.unwrap().scheme, DrawScheme::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let (_dir, mp) = setup(r#"{"draw":{"entries_path":"e.json","seed":1,"sede":2}}"#, &["e.json"]);
        assert!(matches!(load_manifest(&mp), Err(IoError::Manifest(_))));
    }

    #[test]
    fn empty_manifest_has_no_jobs() {
        let (_dir, mp) = setup("{}", &[]);
        assert!(matches!(load_and_resolve(&mp), Err(IoError::Manifest(_))));
    }

    #[test]
    fn validation_catches_bad_values() {
        let base = Manifest { id: None, draw: None, import: None, hours: None, teams: None };
        let draw = |seed: i64, scheme: Option<&str>, sha: Option<&str>| Manifest {
            draw: Some(DrawJob {
                entries_path: "e.json".into(),
                seed,
                scheme: scheme.map(Into::into),
                expect_entries_sha256: sha.map(Into::into),
            }),
            ..base.clone()
        };
        assert!(validate_manifest(&draw(1, None, None)).is_ok());
        assert!(validate_manifest(&draw(1 << 32, None, None)).is_err());
        assert!(validate_manifest(&draw(1, Some("mersenne"), None)).is_err());
        assert!(validate_manifest(&draw(1, None, Some("ABC"))).is_err());

        let url = Manifest {
            teams: Some(TeamsJob { teams_path: "https://example.org/t.json".into() }),
            ..base.clone()
        };
        assert!(matches!(validate_manifest(&url), Err(IoError::Path(_))));

        let offset = Manifest {
            hours: Some(HoursJob { entries_path: "h.json".into(), utc_offset: Some("Mars".into()) }),
            ..base
        };
        assert!(validate_manifest(&offset).is_err());
    }

    #[test]
    fn missing_inputs_fail_resolution() {
        let (_dir, mp) = setup(r#"{"teams":{"teams_path":"nope.json"}}"#, &[]);
        assert!(matches!(load_and_resolve(&mp), Err(IoError::Read(_))));
    }

    #[test]
    fn import_kind_uses_snake_case() {
        let (_dir, mp) = setup(r#"{"import":{"paste_path":"p.tsv","kind":"judge"}}"#, &["p.tsv"]);
        assert_eq!(load_and_resolve(&mp).unwrap().import.unwrap().kind, VolunteerKind::Judge);
    }
}
