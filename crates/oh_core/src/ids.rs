//! crates/oh_core/src/ids.rs
//! Record tokens (user/team/nonprofit) and digest ids (sha256, draw).
//! ASCII-only, strict shapes; no I/O.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const HEX64_LEN: usize = 64;
const TOKEN_MAX_LEN: usize = 128;

/// Prefix carried by every draw record id.
pub const DRAW_ID_PREFIX: &str = "DRAW:";

/// Lowercase hex, exactly 64 characters.
#[inline]
pub fn is_valid_sha256(s: &str) -> bool {
    s.len() == HEX64_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Record token: 1..=128 visible ASCII characters (no whitespace, no control bytes).
///
/// Backend ids arrive in several shapes (UUIDs, `oauth2|slack|T1-U2`, numeric
/// strings), so the charset is deliberately wide.
#[inline]
pub fn is_valid_token(s: &str) -> bool {
    (1..=TOKEN_MAX_LEN).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_graphic())
}

macro_rules! string_newtype {
    ($(#[$m:meta])* $name:ident, $check:expr, $err:expr) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if ($check)(s) { Ok(Self(String::from(s))) } else { Err($err) }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                if ($check)(value.as_str()) { Ok(Self(value)) } else { Err($err) }
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(value: $name) -> String { value.0 }
        }
    };
}

string_newtype!(
    /// Volunteer / participant identity as issued by the auth provider.
    UserId, is_valid_token, CoreError::InvalidToken
);
string_newtype!(
    /// Hackathon team identifier.
    TeamId, is_valid_token, CoreError::InvalidToken
);
string_newtype!(
    /// Nonprofit identifier.
    NonprofitId, is_valid_token, CoreError::InvalidToken
);
string_newtype!(
    /// Generic 64-hex lowercase SHA-256 digest.
    Sha256, is_valid_sha256, CoreError::InvalidHex
);
string_newtype!(
    /// `"DRAW:" + 64-hex` (lowercase).
    DrawId,
    |s: &str| s.strip_prefix(DRAW_ID_PREFIX).map_or(false, is_valid_sha256),
    CoreError::InvalidId
);

impl DrawId {
    /// Build from a digest already known to be well-formed.
    pub fn from_digest(digest: &Sha256) -> Self {
        let mut s = String::with_capacity(DRAW_ID_PREFIX.len() + HEX64_LEN);
        s.push_str(DRAW_ID_PREFIX);
        s.push_str(digest.as_str());
        Self(s)
    }

    /// The 64-hex part without the prefix.
    pub fn digest_hex(&self) -> &str {
        &self.0[DRAW_ID_PREFIX.len()..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn tokens_accept_provider_shapes() {
        assert!("oauth2|slack|T1A2B3-U9Z8".parse::<UserId>().is_ok());
        assert!("6f1c2a7e-8b0d-4c1e-9f3a-2d5e6b7c8d9e".parse::<TeamId>().is_ok());
        assert!("".parse::<NonprofitId>().is_err());
        assert!("has space".parse::<UserId>().is_err());
    }

    #[test]
    fn draw_id_shape() {
        let digest: Sha256 = HEX.parse().unwrap();
        let id = DrawId::from_digest(&digest);
        assert_eq!(id.as_str(), format!("DRAW:{HEX}"));
        assert_eq!(id.digest_hex(), HEX);
        assert_eq!(id.as_str().parse::<DrawId>().unwrap(), id);
        assert_eq!(HEX.parse::<DrawId>(), Err(CoreError::InvalidId));
        assert_eq!("DRAW:ABC".parse::<DrawId>(), Err(CoreError::InvalidId));
    }

    #[test]
    fn sha256_rejects_uppercase() {
        assert!(HEX.to_uppercase().parse::<Sha256>().is_err());
    }
}
