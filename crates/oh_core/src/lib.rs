//! oh_core: ids, deterministic RNGs and weighted winner selection.
//!
//! This crate is **I/O-free**. It defines the stable types used across the
//! workspace (`oh_algo`, `oh_io`, `oh_pipeline`, `oh_cli`).
//!
//! - Token ids: `UserId`, `TeamId`, `NonprofitId`; digest ids: `Sha256`, `DrawId`
//! - Seedable RNGs: the audit LCG (replayable giveaway draws) and ChaCha20
//! - Weighted draw over an expansion pool (`draw::select_winner`)
//! - Stable ordering helpers
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod determinism;
pub mod draw;
pub mod errors;
pub mod ids;
pub mod rng;

pub use draw::{select_winner, DrawError, DrawOutcome, DrawScheme, Weighted};
pub use errors::CoreError;
pub use rng::{AuditLcg, LcgArithmetic, TieRng};
