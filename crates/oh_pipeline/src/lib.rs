//! oh_pipeline: deterministic orchestration (load → compute → record).
//! JSON, schemas and hashing come from `oh_io`; the algorithms from `oh_core` and `oh_algo`.
//! Nothing here reads a clock: callers pass `now` where time matters.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

use oh_core::DrawError;
use oh_io::IoError;

pub mod draw;
pub mod import;
pub mod job;
pub mod reports;

pub use draw::{entries_digest, run_draw, verify_draw, DrawRecord};
pub use import::{run_import, ImportReport, ImportSummary, IssueLine};
pub use job::{run_manifest, JobOutputs};
pub use reports::{countdown_report, hours_report, teams_report, CountdownReport, HoursReport, TeamsReport};

/// Engine identity recorded alongside every draw. Not part of the draw id, so a
/// record made by one release still verifies under the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMeta {
    pub name: String,
    pub version: String,
}

impl EngineMeta {
    pub fn current() -> Self {
        Self { name: env!("CARGO_PKG_NAME").to_string(), version: env!("CARGO_PKG_VERSION").to_string() }
    }
}

/// Single error surface for the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error("draw failed: {0}")]
    Draw(#[from] DrawError),

    /// Audit replay disagrees with the record, or a pinned digest does not match.
    #[error("verification failed: {0}")]
    Verify(String),

    /// Structurally valid input the pipeline still cannot use (bad seed text, unknown scheme).
    #[error("invalid input: {0}")]
    Input(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
