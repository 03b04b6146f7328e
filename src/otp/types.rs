//! Value types shared across the second-factor engine.

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Algorithm
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hash function driving the HMAC step.
///
/// RFC 6238 permits SHA-256 and SHA-512 alongside the RFC 4226 baseline.
/// SHA-1 stays the default: it is the one algorithm every authenticator
/// app interoperates with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri_name())
    }
}

impl Algorithm {
    /// Parse from a case-insensitive name as it appears in key URIs and
    /// authenticator exports.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SHA1" | "SHA-1" | "HMACSHA1" | "HMAC-SHA1" => Some(Self::Sha1),
            "SHA256" | "SHA-256" | "HMACSHA256" | "HMAC-SHA256" => Some(Self::Sha256),
            "SHA512" | "SHA-512" | "HMACSHA512" | "HMAC-SHA512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Name used in `otpauth://` query parameters.
    pub fn uri_name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Code parameters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-account code parameters.
///
/// The defaults are what mainstream authenticator apps assume when a key
/// URI omits the corresponding query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpParams {
    pub algorithm: Algorithm,
    /// Code width in decimal digits, 6 or 8.
    pub digits: u8,
    /// Time-step length in seconds.
    pub period: u32,
}

impl Default for TotpParams {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Sha1,
            digits: 6,
            period: 30,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification window
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Clock-skew tolerance for verification: how many adjacent time steps
/// are accepted on each side of the current one.
///
/// `(1, 1)` accepts the previous, current, and next code — the standard
/// conservative setting (±30 s at the default period). Widening the
/// window enlarges the guessing surface; narrowing it causes false
/// rejections on drifting client clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationWindow {
    /// Steps accepted behind the current counter.
    pub steps_before: u32,
    /// Steps accepted ahead of the current counter.
    pub steps_after: u32,
}

impl VerificationWindow {
    pub const fn new(steps_before: u32, steps_after: u32) -> Self {
        Self {
            steps_before,
            steps_after,
        }
    }

    /// Accept only the current step.
    pub const fn exact() -> Self {
        Self::new(0, 0)
    }
}

impl Default for VerificationWindow {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  One-time code
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A generated one-time code: fixed-width decimal, left-zero-padded.
///
/// Ephemeral — only meaningful within the verification window of the
/// counter it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub(crate) fn new(value: u32, digits: u8) -> Self {
        Self(format!("{value:0width$}", width = usize::from(digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OtpCode> for String {
    fn from(code: OtpCode) -> String {
        code.0
    }
}
