//! Shared-secret material and its generation.

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::otp::base32;
use crate::otp::error::{OtpError, Result};

/// Minimum accepted secret length: 128 bits (RFC 4226 §4 R6).
pub const MIN_SECRET_BYTES: usize = 16;

/// Recommended secret length: 160 bits, the HMAC-SHA1 output width.
pub const DEFAULT_SECRET_BYTES: usize = 20;

/// Raw shared-secret bytes for one enrolled factor.
///
/// Opaque once issued: the credential store persists it, verification
/// reads it, nothing else looks inside. The buffer is wiped on drop and
/// the `Debug` form shows only the length. There are deliberately no
/// `serde` impls — the secret must not ride along accidental
/// serialization paths.
#[derive(Clone)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Wrap raw bytes handed back by the credential store.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Generate a fresh secret from the system entropy source.
    ///
    /// Fails with `InvalidParameter` below the 16-byte entropy floor.
    /// An entropy-source failure is fatal and propagates as
    /// [`OtpError::Entropy`].
    pub fn generate(length_bytes: usize) -> Result<Self> {
        Self::generate_with(&mut OsRng, length_bytes)
    }

    /// Generate from a caller-supplied secure source.
    ///
    /// The `CryptoRng` bound keeps non-cryptographic generators out at
    /// compile time; a seeded `StdRng` satisfies it for deterministic
    /// tests.
    pub fn generate_with<R>(rng: &mut R, length_bytes: usize) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        if length_bytes < MIN_SECRET_BYTES {
            return Err(OtpError::InvalidParameter(format!(
                "secret length {length_bytes} is below the {MIN_SECRET_BYTES}-byte floor"
            )));
        }
        let mut buf = vec![0u8; length_bytes];
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| OtpError::Entropy(e.to_string()))?;
        Ok(Self(buf))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Base32 view — the on-wire form for key URIs and manual entry.
    pub fn to_base32(&self) -> String {
        base32::encode(&self.0)
    }

    /// Rebuild from the Base32 form. The round trip is exact.
    pub fn from_base32(encoded: &str) -> Result<Self> {
        base32::decode(encoded).map(Self)
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // ── Generation ───────────────────────────────────────────────

    #[test]
    fn generate_default_length() {
        let secret = Secret::generate(DEFAULT_SECRET_BYTES).unwrap();
        assert_eq!(secret.len(), 20);
    }

    #[test]
    fn generate_rejects_below_floor() {
        let err = Secret::generate(8).unwrap_err();
        assert!(matches!(err, OtpError::InvalidParameter(_)));
    }

    #[test]
    fn generate_accepts_floor_exactly() {
        let secret = Secret::generate(MIN_SECRET_BYTES).unwrap();
        assert_eq!(secret.len(), 16);
    }

    #[test]
    fn injected_source_is_deterministic() {
        let a = Secret::generate_with(&mut StdRng::seed_from_u64(7), 20).unwrap();
        let b = Secret::generate_with(&mut StdRng::seed_from_u64(7), 20).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());

        let c = Secret::generate_with(&mut StdRng::seed_from_u64(8), 20).unwrap();
        assert_ne!(a.as_bytes(), c.as_bytes());
    }

    // ── Encoding views ───────────────────────────────────────────

    #[test]
    fn base32_view_roundtrips() {
        let secret = Secret::from_bytes(b"12345678901234567890".to_vec());
        let encoded = secret.to_base32();
        assert_eq!(encoded, "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");
        let back = Secret::from_base32(&encoded).unwrap();
        assert_eq!(back.as_bytes(), secret.as_bytes());
    }

    #[test]
    fn from_base32_rejects_garbage() {
        assert!(Secret::from_base32("!!!not-base32!!!").is_err());
    }

    // ── Hygiene ──────────────────────────────────────────────────

    #[test]
    fn debug_redacts_bytes() {
        let secret = Secret::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(format!("{secret:?}"), "Secret(4 bytes)");
    }
}
