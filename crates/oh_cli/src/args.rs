// crates/oh_cli/src/args.rs
//
// Offline CLI surface: clap types, value parsers and path checks.
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - Input files must exist locally; `--paste -` reads stdin
// - Seeds are decimal text in the 32-bit window (signed or unsigned)
// - `--out <file>` writes canonical JSON; otherwise pretty JSON goes to stdout

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, FixedOffset, Utc};
use clap::{ArgAction, Parser, Subcommand};

use oh_algo::import::VolunteerKind;
use oh_algo::parse_utc_offset;
use oh_core::DrawScheme;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "ohack",
    version,
    disable_help_subcommand = true,
    about = "Offline, deterministic admin tools for Opportunity Hack (giveaway draws, volunteer imports, reports)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,

    /// Write canonical JSON to this file instead of pretty JSON on stdout.
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Only errors on stderr.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// More log output (-v info, -vv debug, -vvv trace). `OHACK_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Draw a giveaway winner and print the draw record.
    Draw {
        /// Giveaway entries JSON.
        #[arg(long)]
        entries: PathBuf,
        /// Decimal seed, e.g. 12345 or -7.
        #[arg(long, allow_hyphen_values = true, value_parser = parse_seed_arg)]
        seed: i64,
        /// lcg (default), lcg-browser or chacha20.
        #[arg(long, default_value = "lcg", value_parser = parse_scheme_arg)]
        scheme: DrawScheme,
    },
    /// Replay a recorded draw against its entries and confirm the winner.
    Verify {
        /// Draw record JSON written by `ohack draw`.
        #[arg(long)]
        record: PathBuf,
        #[arg(long)]
        entries: PathBuf,
    },
    /// Import a tab-separated paste of mentors or judges.
    Import {
        /// Paste text file, or `-` for stdin.
        #[arg(long)]
        paste: PathBuf,
        #[arg(long, value_parser = parse_kind_arg)]
        kind: VolunteerKind,
    },
    /// Volunteer hours per user and venue-local day.
    Hours {
        /// Time entries JSON.
        #[arg(long)]
        entries: PathBuf,
        #[arg(long, default_value = "UTC", allow_hyphen_values = true, value_parser = parse_offset_arg)]
        utc_offset: FixedOffset,
    },
    /// Group teams under the nonprofits they work for.
    Teams {
        /// Nonprofits + teams JSON.
        #[arg(long)]
        teams: PathBuf,
    },
    /// Time left until an event, with its venue-local label.
    Countdown {
        /// RFC 3339 instant, e.g. 2024-10-12T16:00:00Z.
        #[arg(long, value_parser = parse_instant_arg)]
        target: DateTime<Utc>,
        /// Reference instant (defaults to the system clock).
        #[arg(long, value_parser = parse_instant_arg)]
        now: Option<DateTime<Utc>>,
        #[arg(long, default_value = "UTC", allow_hyphen_values = true, value_parser = parse_offset_arg)]
        utc_offset: FixedOffset,
    },
    /// Run every job named in a manifest.
    Run {
        #[arg(long)]
        manifest: PathBuf,
    },
}

/// Errors from post-parse checks. Messages are short and stable for scripts.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

// ---------------- value parsers ----------------

pub fn parse_seed_arg(s: &str) -> Result<i64, String> {
    oh_core::draw::parse_seed(s).map_err(|e| e.to_string())
}

fn parse_scheme_arg(s: &str) -> Result<DrawScheme, String> {
    s.parse::<DrawScheme>()
        .map_err(|_| format!("unknown scheme '{s}' (expected lcg, lcg-browser or chacha20)"))
}

fn parse_kind_arg(s: &str) -> Result<VolunteerKind, String> {
    s.parse::<VolunteerKind>().map_err(|e| e.to_string())
}

fn parse_offset_arg(s: &str) -> Result<FixedOffset, String> {
    parse_utc_offset(s).map_err(|e| e.to_string())
}

fn parse_instant_arg(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 instant: {e}"))
}

// ---------------- path checks ----------------

/// Parse argv, reject networked paths, check inputs exist, and absolutize them.
pub fn parse_and_validate() -> Result<Cli, CliError> {
    validate(Cli::parse())
}

pub fn validate(mut cli: Cli) -> Result<Cli, CliError> {
    if let Some(out) = &cli.out {
        ensure_local_path(out)?;
    }
    for (label, p) in input_paths_mut(&mut cli.cmd) {
        if label == "--paste" && p.as_os_str() == "-" {
            continue;
        }
        ensure_local_exists(p, label)?;
        *p = normalize_path(p);
    }
    cli.out = cli.out.take().map(|p| normalize_path(&p));
    Ok(cli)
}

fn input_paths_mut(cmd: &mut Command) -> Vec<(&'static str, &mut PathBuf)> {
    match cmd {
        Command::Draw { entries, .. } | Command::Hours { entries, .. } => vec![("--entries", entries)],
        Command::Verify { record, entries } => vec![("--record", record), ("--entries", entries)],
        Command::Import { paste, .. } => vec![("--paste", paste)],
        Command::Teams { teams } => vec![("--teams", teams)],
        Command::Run { manifest } => vec![("--manifest", manifest)],
        Command::Countdown { .. } => Vec::new(),
    }
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Local (no scheme) and an existing regular file.
fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort absolute path; falls back to joining onto the CWD when the file does not exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oh_core::LcgArithmetic;

    fn parse(argv: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ohack").chain(argv.iter().copied()))
    }

    #[test]
    fn draw_flags_parse() {
        let cli = parse(&["draw", "--entries", "e.json", "--seed", "-7", "--scheme", "lcg-browser"]).unwrap();
        match cli.cmd {
            Command::Draw { seed, scheme, .. } => {
                assert_eq!(seed, -7);
                assert_eq!(scheme, DrawScheme::Lcg(LcgArithmetic::Browser));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn default_scheme_is_exact_lcg() {
        let cli = parse(&["draw", "--entries", "e.json", "--seed", "12345"]).unwrap();
        assert!(matches!(cli.cmd, Command::Draw { scheme: DrawScheme::Lcg(LcgArithmetic::Exact), .. }));
    }

    #[test]
    fn seeds_outside_32_bits_are_rejected() {
        assert!(parse(&["draw", "--entries", "e.json", "--seed", "4294967296"]).is_err());
        assert!(parse(&["draw", "--entries", "e.json", "--seed", "12.5"]).is_err());
        assert!(parse_seed_arg("4294967295").is_ok());
        assert!(parse_seed_arg("-2147483648").is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["hours", "--entries", "h.json", "--utc-offset", "-07:00", "-vv", "--out", "r.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.out.as_deref(), Some(Path::new("r.json")));
        match cli.cmd {
            Command::Hours { utc_offset, .. } => assert_eq!(utc_offset.local_minus_utc(), -25_200),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_kind_and_instant_are_usage_errors() {
        assert!(parse(&["import", "--paste", "-", "--kind", "sponsor"]).is_err());
        assert!(parse(&["countdown", "--target", "next tuesday"]).is_err());
        assert!(parse_kind_arg("sponsor").unwrap_err().contains("expected mentor or judge"));
    }

    #[test]
    fn validate_rejects_urls_and_missing_files() {
        let cli = parse(&["teams", "--teams", "https://example.org/t.json"]).unwrap();
        assert!(matches!(validate(cli), Err(CliError::NonLocalPath(_))));

        let cli = parse(&["teams", "--teams", "does/not/exist.json"]).unwrap();
        assert!(matches!(validate(cli), Err(CliError::NotFound(_))));

        let cli = parse(&["import", "--paste", "-", "--kind", "judge"]).unwrap();
        assert!(validate(cli).is_ok());
    }

    #[test]
    fn normalize_path_returns_absolute() {
        assert!(normalize_path(Path::new("does/not/exist.txt")).is_absolute());
    }
}
