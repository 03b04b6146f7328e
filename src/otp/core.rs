//! One-time-code engine — RFC 4226 (HOTP) computation, RFC 6238 (TOTP)
//! time steps, and windowed verification.
//!
//! Everything here is a pure function of its explicit inputs: the clock
//! is always a parameter, so concurrent callers share nothing and tests
//! pin time exactly.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::otp::error::{OtpError, Result};
use crate::otp::secret::Secret;
use crate::otp::types::{Algorithm, OtpCode, TotpParams, VerificationWindow};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOTP (RFC 4226)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute an HOTP code for the given key and counter.
///
/// The counter is serialized as an 8-byte big-endian integer, HMAC'd with
/// the key, dynamically truncated per RFC 4226 §5.3, and reduced to
/// `digits` decimal places. Fails only for unsupported digit counts.
pub fn hotp(key: &[u8], counter: u64, digits: u8, algorithm: Algorithm) -> Result<OtpCode> {
    if digits != 6 && digits != 8 {
        return Err(OtpError::InvalidParameter(format!(
            "unsupported digit count {digits}, expected 6 or 8"
        )));
    }
    let digest = keyed_digest(key, &counter.to_be_bytes(), algorithm);

    // Dynamic truncation: the low nibble of the last byte picks the
    // 4-byte read offset; the sign bit is masked off.
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let value = u32::from_be_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]) & 0x7fff_ffff;

    Ok(OtpCode::new(value % 10u32.pow(u32::from(digits)), digits))
}

/// HMAC over `message`, keyed by `key`, with the selected hash.
fn keyed_digest(key: &[u8], message: &[u8], algorithm: Algorithm) -> Vec<u8> {
    match algorithm {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time steps (RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The time-step counter for a unix timestamp. `period` must be non-zero.
pub fn time_step_at(unix_seconds: u64, period: u32) -> u64 {
    unix_seconds / u64::from(period)
}

/// Seconds until the code for this timestamp expires.
pub fn seconds_remaining_at(unix_seconds: u64, period: u32) -> u32 {
    let p = u64::from(period);
    (p - (unix_seconds % p)) as u32
}

/// Current unix time, for callers at the process edge. The engine
/// functions never read the clock themselves.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Compute the TOTP code for an explicit timestamp.
pub fn totp_at(key: &[u8], params: &TotpParams, unix_seconds: u64) -> Result<OtpCode> {
    if params.period == 0 {
        return Err(OtpError::InvalidParameter("period must be positive".into()));
    }
    hotp(
        key,
        time_step_at(unix_seconds, params.period),
        params.digits,
        params.algorithm,
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Check a submitted code against the secret within a clock-skew window.
///
/// This is a total function: malformed input, unsupported parameters, and
/// absent matches all collapse to `false`. There is no error path a
/// caller (or an attacker watching one) could distinguish from a wrong
/// code.
///
/// Candidate counters are probed in order of increasing distance from the
/// current step (`0, -1, +1, -2, +2, …`), bounded by the window on each
/// side; each comparison runs over every byte regardless of mismatches.
pub fn verify_at(
    secret: &Secret,
    submitted: &str,
    window: VerificationWindow,
    params: &TotpParams,
    unix_seconds: u64,
) -> bool {
    let submitted = submitted.trim();
    if submitted.len() != usize::from(params.digits)
        || !submitted.bytes().all(|b| b.is_ascii_digit())
    {
        log::debug!("rejected malformed one-time code submission");
        return false;
    }
    if params.period == 0 {
        return false;
    }

    let base_step = time_step_at(unix_seconds, params.period);
    for offset in window_offsets(window) {
        // Offsets that would take the counter below zero have no code.
        let Some(counter) = step_with_offset(base_step, offset) else {
            continue;
        };
        let Ok(expected) = hotp(secret.as_bytes(), counter, params.digits, params.algorithm)
        else {
            return false;
        };
        if constant_time_eq(expected.as_str().as_bytes(), submitted.as_bytes()) {
            log::debug!("one-time code accepted at step offset {offset}");
            return true;
        }
    }

    log::debug!("one-time code rejected, no match within window");
    false
}

/// Offsets ordered by increasing `|d|`, past before future on ties.
fn window_offsets(window: VerificationWindow) -> Vec<i64> {
    let before = i64::from(window.steps_before);
    let after = i64::from(window.steps_after);
    let mut offsets = Vec::with_capacity((before + after + 1) as usize);
    offsets.push(0);
    for d in 1..=before.max(after) {
        if d <= before {
            offsets.push(-d);
        }
        if d <= after {
            offsets.push(d);
        }
    }
    offsets
}

fn step_with_offset(base: u64, offset: i64) -> Option<u64> {
    if offset >= 0 {
        base.checked_add(offset as u64)
    } else {
        base.checked_sub(offset.unsigned_abs())
    }
}

/// Compare every byte regardless of earlier mismatches.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
