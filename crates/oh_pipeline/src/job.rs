//! Manifest-driven runs: execute every job a resolved manifest names, in a fixed
//! order (draw, import, hours, teams), and collect the documents.

use serde::Serialize;
use tracing::{info, info_span};

use oh_io::loader::{load_giveaway_entries, load_teams, load_time_entries, read_paste_text};
use oh_io::manifest::ResolvedManifest;
use oh_io::IoError;

use crate::draw::{entries_digest, run_draw, DrawRecord};
use crate::import::{run_import, ImportReport};
use crate::reports::{hours_report, teams_report, HoursReport, TeamsReport};
use crate::PipelineResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobOutputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw: Option<DrawRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<ImportReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<HoursReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<TeamsReport>,
}

pub fn run_manifest(man: &ResolvedManifest) -> PipelineResult<JobOutputs> {
    let _span = info_span!("run", id = man.id.as_deref().unwrap_or("-")).entered();
    let mut out = JobOutputs::default();

    if let Some(d) = &man.draw {
        let entries = load_giveaway_entries(&d.entries_path)?;
        if let Some(expected) = &d.expect_entries_sha256 {
            let got = entries_digest(&entries)?;
            if &got != expected {
                return Err(IoError::Expect(format!(
                    "entries sha256 {got} differs from pinned {expected}"
                ))
                .into());
            }
        }
        out.draw = Some(run_draw(&entries, d.seed, d.scheme)?);
    }
    if let Some(i) = &man.import {
        let text = read_paste_text(&i.paste_path)?;
        out.import = Some(run_import(&text, i.kind));
    }
    if let Some(h) = &man.hours {
        out.hours = Some(hours_report(&load_time_entries(&h.entries_path)?, h.offset));
    }
    if let Some(t) = &man.teams {
        out.teams = Some(teams_report(&load_teams(&t.teams_path)?));
    }

    info!(
        draw = out.draw.is_some(),
        import = out.import.is_some(),
        hours = out.hours.is_some(),
        teams = out.teams.is_some(),
        "manifest run complete"
    );
    Ok(out)
}
