// crates/oh_cli/src/main.rs
//
// `ohack`: exit codes, typed error mapping, logging setup and subcommand dispatch.
// Every subcommand loads through oh_io, computes through oh_pipeline and emits one JSON document.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad arguments, schema or manifest problems.
    pub const VALIDATION: i32 = 2;
    /// Audit replay or pinned digest mismatch.
    pub const SELF_VERIFY: i32 = 3;
    pub const IO: i32 = 4;
    /// The draw itself cannot proceed (empty pool, pool too large).
    pub const DOMAIN: i32 = 5;
}

use std::path::Path;
use std::process::ExitCode;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate, Cli, CliError, Command};
use oh_io::{canonical_json, loader, manifest, IoError};
use oh_pipeline::{
    countdown_report, hours_report, run_draw, run_import, run_manifest, teams_report, verify_draw, DrawRecord,
    PipelineError,
};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    SelfVerify(String),
    Io(String),
    Domain(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) | MainError::SelfVerify(m) | MainError::Io(m) | MainError::Domain(m) => {
                f.write_str(m)
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = match parse_and_validate() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ohack: error: {e}");
            let rc = match e {
                CliError::NotFound(_) => exitcodes::IO,
                CliError::NonLocalPath(_) => exitcodes::VALIDATION,
            };
            return ExitCode::from(rc as u8);
        }
    };
    init_tracing(&cli);

    let rc = match run_once(&cli) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            error!("{e}");
            eprintln!("ohack: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// Logs go to stderr so stdout stays a clean JSON document.
fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("OHACK_LOG").unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_once(cli: &Cli) -> Result<(), MainError> {
    debug!(cmd = ?cli.cmd, "dispatch");
    let out = cli.out.as_deref();
    match &cli.cmd {
        Command::Draw { entries, seed, scheme } => {
            let doc = loader::load_giveaway_entries(entries).map_err(map_io_err)?;
            let record = run_draw(&doc, *seed, *scheme).map_err(map_pipeline_err)?;
            emit(&record, out, cli.quiet)
        }
        Command::Verify { record, entries } => {
            let raw = loader::read_json_value_with_limits(record).map_err(map_io_err)?;
            let rec: DrawRecord = serde_json::from_value(raw)
                .map_err(|e| MainError::Validation(format!("draw record {}: {e}", record.display())))?;
            let doc = loader::load_giveaway_entries(entries).map_err(map_io_err)?;
            let replay = verify_draw(&rec, &doc).map_err(map_pipeline_err)?;
            let summary = json!({
                "verified": true,
                "id": replay.id,
                "scheme": replay.scheme,
                "seed": replay.seed,
                "winner_index": replay.winner_index,
                "winner_user_id": replay.winner.user_id,
            });
            emit(&summary, out, cli.quiet)
        }
        Command::Import { paste, kind } => {
            let text = loader::read_paste_text(paste).map_err(map_io_err)?;
            emit(&run_import(&text, *kind), out, cli.quiet)
        }
        Command::Hours { entries, utc_offset } => {
            let doc = loader::load_time_entries(entries).map_err(map_io_err)?;
            emit(&hours_report(&doc, *utc_offset), out, cli.quiet)
        }
        Command::Teams { teams } => {
            let doc = loader::load_teams(teams).map_err(map_io_err)?;
            emit(&teams_report(&doc), out, cli.quiet)
        }
        Command::Countdown { target, now, utc_offset } => {
            let now = now.unwrap_or_else(Utc::now);
            emit(&countdown_report(now, *target, *utc_offset), out, cli.quiet)
        }
        Command::Run { manifest: path } => {
            let man = manifest::load_and_resolve(path).map_err(map_io_err)?;
            let outputs = run_manifest(&man).map_err(map_pipeline_err)?;
            emit(&outputs, out, cli.quiet)
        }
    }
}

/// Canonical bytes to `--out`, or pretty JSON on stdout.
fn emit<T: Serialize>(doc: &T, out: Option<&Path>, quiet: bool) -> Result<(), MainError> {
    match out {
        Some(path) => {
            canonical_json::write_canonical_file(path, doc).map_err(map_io_err)?;
            if !quiet {
                eprintln!("wrote {}", path.display());
            }
            Ok(())
        }
        None => {
            let text = serde_json::to_string_pretty(doc).map_err(|e| MainError::Io(format!("serialize: {e}")))?;
            println!("{text}");
            Ok(())
        }
    }
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::SelfVerify(_) => SELF_VERIFY,
        MainError::Io(_) => IO,
        MainError::Domain(_) => DOMAIN,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Schema { pointer, msg } => MainError::Validation(format!("schema {pointer}: {msg}")),
        IoError::Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        IoError::Manifest(m) => MainError::Validation(format!("manifest: {m}")),
        IoError::Expect(m) => MainError::SelfVerify(format!("expect: {m}")),

        IoError::Read(m) => MainError::Io(format!("read: {m}")),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        IoError::Limit(m) => MainError::Io(format!("limit: {m}")),
        IoError::Hash(m) => MainError::Io(format!("hash: {m}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        PipelineError::Draw(d) => MainError::Domain(format!("draw: {d}")),
        PipelineError::Verify(m) => MainError::SelfVerify(format!("verify: {m}")),
        PipelineError::Input(m) => MainError::Validation(format!("input: {m}")),
    }
}
