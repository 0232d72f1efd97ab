//! Minimal error set for core-domain validation & parsing.

use core::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoreError {
    InvalidId,
    InvalidToken,
    InvalidHex,
    /// Seed text is not an optionally signed run of decimal digits.
    SeedSyntax,
    /// Seed parsed but lies outside the 32-bit signed/unsigned window.
    SeedOutOfRange,
    UnknownScheme,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidId => write!(f, "invalid id"),
            CoreError::InvalidToken => write!(f, "invalid token"),
            CoreError::InvalidHex => write!(f, "invalid hex"),
            CoreError::SeedSyntax => write!(f, "seed must be a decimal integer"),
            CoreError::SeedOutOfRange => write!(f, "seed must fit in 32 bits (signed or unsigned)"),
            CoreError::UnknownScheme => write!(f, "unknown draw scheme"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}
