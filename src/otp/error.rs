//! Error taxonomy for the second-factor engine.

use thiserror::Error;

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, OtpError>;

/// Errors surfaced to callers.
///
/// All variants except [`OtpError::Entropy`] are recoverable configuration
/// errors: they only arise from caller-supplied input, never from internally
/// generated data. An entropy failure is fatal — a credential must not be
/// issued without randomness guarantees, so it propagates instead of being
/// retried against a weaker source.
///
/// Verification deliberately has no error path at all; see
/// [`core::verify_at`](crate::otp::core::verify_at).
#[derive(Debug, Error)]
pub enum OtpError {
    /// Input is not valid unpadded RFC 4648 Base32.
    #[error("invalid base32 encoding: {0}")]
    InvalidEncoding(String),

    /// Issuer or account label violates key-URI label constraints.
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// Digits, period, or secret length out of the supported range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The entropy source failed while generating a secret.
    #[error("entropy source failure: {0}")]
    Entropy(String),

    /// Input is not a well-formed `otpauth://` key URI.
    #[error("invalid otpauth URI: {0}")]
    InvalidUri(String),

    /// The external QR encoder rejected the payload.
    #[error("QR encoding failed: {0}")]
    QrEncode(String),
}
