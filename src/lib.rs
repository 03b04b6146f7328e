//! # totp-factor — TOTP second-factor core
//!
//! One-time-password engine for second-factor authentication:
//!
//! - **RFC 4226 / 6238** – HOTP and TOTP code computation with SHA-1,
//!   SHA-256, SHA-512
//! - **Secret generation** – cryptographically random shared secrets with
//!   an injectable entropy source
//! - **RFC 4648 Base32** – strict, unpadded codec for the on-wire secret
//!   form
//! - **otpauth:// key URIs** – builder and parser for the format
//!   authenticator apps enroll from
//! - **Windowed verification** – clock-skew tolerance with constant-time
//!   comparison, fail-closed on malformed input
//! - **QR support** – render enrollment URIs to PNG or data URIs
//!
//! The crate is a pure engine: no credential storage, no sessions, no
//! transport. Secrets enter and leave as opaque values, and the clock is
//! always an explicit parameter.
//!
//! ```
//! use totp_factor::otp::{self, TotpParams, VerificationWindow};
//!
//! // Enrollment: hand `secret` to the credential store, show the URI's
//! // QR code and the Base32 string to the user.
//! let enrollment = otp::enroll("MyApp", "alice@example.com")?;
//!
//! // Later: verify a submitted code against the stored secret.
//! let ok = otp::verify_at(
//!     &enrollment.secret,
//!     "287082",
//!     VerificationWindow::default(),
//!     &TotpParams::default(),
//!     otp::unix_now(),
//! );
//! # let _ = ok;
//! # Ok::<(), totp_factor::otp::OtpError>(())
//! ```

pub mod otp;
