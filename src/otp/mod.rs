//! Second-factor engine: sub-modules.

pub mod base32;
pub mod core;
pub mod enroll;
pub mod error;
pub mod qr;
pub mod secret;
pub mod types;
pub mod uri;

// Re-export the working surface for convenience.
pub use self::core::{hotp, seconds_remaining_at, time_step_at, totp_at, unix_now, verify_at};
pub use self::enroll::{enroll, enroll_with, Enrollment};
pub use self::error::{OtpError, Result};
pub use self::secret::{Secret, DEFAULT_SECRET_BYTES, MIN_SECRET_BYTES};
pub use self::types::{Algorithm, OtpCode, TotpParams, VerificationWindow};
pub use self::uri::KeyUri;
