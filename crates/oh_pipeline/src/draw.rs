// crates/oh_pipeline/src/draw.rs
//
// Giveaway draw records and audit replay.
//
// The record id is `DRAW:` + SHA-256 of the canonical record body (every field
// except `id` and `engine`). Same entries (same order) + seed + scheme ⇒ same id.
// An auditor holding the entries file and the record can rerun the draw and get
// the same winner; `verify_draw` does exactly that and reports the first mismatch.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use oh_core::draw::{select_winner, SEED_MAX, SEED_MIN};
use oh_core::ids::{DrawId, Sha256};
use oh_core::DrawScheme;
use oh_io::hasher;
use oh_io::loader::{GiveawayEntries, GiveawayEntry};

use crate::{EngineMeta, PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub id: DrawId,
    pub engine: EngineMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giveaway_id: Option<String>,
    pub seed: i64,
    /// `lcg`, `lcg-browser` or `chacha20`.
    pub scheme: String,
    /// Canonical digest of the entries list, in draw order.
    pub entries_sha256: Sha256,
    pub entrant_count: usize,
    pub eligible_entrants: usize,
    pub pool_size: u64,
    pub rng_steps: u64,
    pub winner_index: usize,
    pub winner: GiveawayEntry,
}

/// Fields covered by the id.
#[derive(Serialize)]
struct RecordBody<'a> {
    giveaway_id: &'a Option<String>,
    seed: i64,
    scheme: &'a str,
    entries_sha256: &'a Sha256,
    entrant_count: usize,
    eligible_entrants: usize,
    pool_size: u64,
    rng_steps: u64,
    winner_index: usize,
    winner: &'a GiveawayEntry,
}

impl DrawRecord {
    fn body(&self) -> RecordBody<'_> {
        RecordBody {
            giveaway_id: &self.giveaway_id,
            seed: self.seed,
            scheme: &self.scheme,
            entries_sha256: &self.entries_sha256,
            entrant_count: self.entrant_count,
            eligible_entrants: self.eligible_entrants,
            pool_size: self.pool_size,
            rng_steps: self.rng_steps,
            winner_index: self.winner_index,
            winner: &self.winner,
        }
    }

    /// Id recomputed from the record's own contents.
    pub fn computed_id(&self) -> PipelineResult<DrawId> {
        Ok(hasher::draw_id(&self.body())?)
    }
}

/// Canonical digest of the entries list (what `expect_entries_sha256` pins).
pub fn entries_digest(entries: &GiveawayEntries) -> PipelineResult<Sha256> {
    Ok(hasher::sha256_canonical(&entries.entries)?)
}

/// Run one draw and build its record.
pub fn run_draw(entries: &GiveawayEntries, seed: i64, scheme: DrawScheme) -> PipelineResult<DrawRecord> {
    let entries_sha256 = entries_digest(entries)?;
    debug!(entrants = entries.entries.len(), %entries_sha256, "entries digested");

    let outcome = select_winner(&entries.entries, seed, scheme)?;
    let winner = entries
        .entries
        .get(outcome.winner_index)
        .cloned()
        .ok_or_else(|| PipelineError::Input(format!("winner index {} out of range", outcome.winner_index)))?;

    let mut record = DrawRecord {
        // Placeholder until the body is hashed below.
        id: DrawId::from_digest(&entries_sha256),
        engine: EngineMeta::current(),
        giveaway_id: entries.giveaway_id.clone(),
        seed,
        scheme: scheme.to_string(),
        entries_sha256,
        entrant_count: entries.entries.len(),
        eligible_entrants: outcome.eligible_entrants,
        pool_size: outcome.pool_size,
        rng_steps: outcome.rng_steps,
        winner_index: outcome.winner_index,
        winner,
    };
    record.id = record.computed_id()?;

    info!(
        id = %record.id,
        seed,
        %scheme,
        pool = record.pool_size,
        winner = %record.winner.user_id,
        "draw complete"
    );
    Ok(record)
}

/// Audit replay: check the record against itself and against `entries`, then
/// rerun the draw. Returns the replayed record when everything matches.
pub fn verify_draw(record: &DrawRecord, entries: &GiveawayEntries) -> PipelineResult<DrawRecord> {
    let own = record.computed_id()?;
    if own != record.id {
        return Err(PipelineError::Verify(format!(
            "record id {} does not match its contents ({own})",
            record.id
        )));
    }
    if !(SEED_MIN..=SEED_MAX).contains(&record.seed) {
        return Err(PipelineError::Verify(format!(
            "seed {} outside [{SEED_MIN}, {SEED_MAX}]",
            record.seed
        )));
    }

    let digest = entries_digest(entries)?;
    if digest != record.entries_sha256 {
        return Err(PipelineError::Verify(format!(
            "entries digest {digest} differs from recorded {}",
            record.entries_sha256
        )));
    }

    let scheme: DrawScheme = record
        .scheme
        .parse()
        .map_err(|_| PipelineError::Verify(format!("unknown scheme '{}' in record", record.scheme)))?;

    let replay = run_draw(entries, record.seed, scheme)?;
    if replay.winner_index != record.winner_index {
        return Err(PipelineError::Verify(format!(
            "replay picked entry {} ({}), record says {} ({})",
            replay.winner_index, replay.winner.user_id, record.winner_index, record.winner.user_id
        )));
    }
    if replay.id != record.id {
        return Err(PipelineError::Verify(format!(
            "replay id {} differs from record {}",
            replay.id, record.id
        )));
    }
    info!(id = %record.id, "draw verified");
    Ok(replay)
}
