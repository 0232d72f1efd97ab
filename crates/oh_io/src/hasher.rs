//! crates/oh_io/src/hasher.rs
//!
//! SHA-256 digests and draw ids.
//!
//! - Use `sha256_canonical(..)` for JSON values/structs (goes through canonical_json).
//! - Use `sha256_hex(..)` or `sha256_file(..)` for raw bytes/files.
//! - Hex is always lowercase.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256 as Sha256Hasher};

use oh_core::ids::{DrawId, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::{IoError, IoResult};

const STREAM_BUF: usize = 64 * 1024;

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256Hasher::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of `value`.
pub fn sha256_canonical<T: Serialize + ?Sized>(value: &T) -> IoResult<Sha256> {
    let bytes = to_canonical_bytes(value)?;
    typed(sha256_hex(&bytes))
}

/// SHA-256 over a file's raw bytes (streamed).
pub fn sha256_file(path: &Path) -> IoResult<Sha256> {
    let f = File::open(path).map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;
    let mut r = BufReader::new(f);
    let mut hasher = Sha256Hasher::new();
    let mut buf = vec![0u8; STREAM_BUF];
    loop {
        let n = r
            .read(&mut buf)
            .map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    typed(hex::encode(hasher.finalize()))
}

/// `DRAW:<hex>` over the canonical bytes of a draw record body.
pub fn draw_id<T: Serialize + ?Sized>(body: &T) -> IoResult<DrawId> {
    Ok(DrawId::from_digest(&sha256_canonical(body)?))
}

fn typed(hex: String) -> IoResult<Sha256> {
    Sha256::try_from(hex).map_err(|e| IoError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_encoding_is_lowercase() {
        assert_eq!(sha256_hex(b"abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn canonical_hash_ignores_key_order() {
        #[derive(Serialize)]
        struct T {
            b: u32,
            a: u32,
        }
        let h1 = sha256_canonical(&T { b: 2, a: 1 }).unwrap();
        let h2 = sha256_canonical(&json!({"a":1,"b":2})).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.as_str(), sha256_hex(br#"{"a":1,"b":2}"#));
    }

    #[test]
    fn draw_ids_carry_the_prefix() {
        let id = draw_id(&json!({"seed": 7})).unwrap();
        assert!(id.as_str().starts_with("DRAW:"));
        assert_eq!(id.digest_hex(), sha256_hex(br#"{"seed":7}"#));
    }

    #[test]
    fn file_hash_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("x.txt");
        std::fs::write(&p, b"abc").unwrap();
        assert_eq!(sha256_file(&p).unwrap().as_str(), sha256_hex(b"abc"));
        assert!(matches!(sha256_file(&dir.path().join("missing")), Err(IoError::Read(_))));
    }
}
