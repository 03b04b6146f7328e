//! Enrollment: mint a secret and its presentation forms in one step.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::otp::error::Result;
use crate::otp::secret::{Secret, DEFAULT_SECRET_BYTES};
use crate::otp::types::TotpParams;
use crate::otp::uri::KeyUri;

/// Everything one enrollment produces.
///
/// `secret` goes to the credential store; `secret_b32` and `otpauth_uri`
/// go to the enrollment UI (manual-entry string and QR payload). The UI
/// never needs the raw bytes, and the struct as a whole is deliberately
/// not serializable — the secret leaves through the store hand-off only.
#[derive(Debug)]
pub struct Enrollment {
    pub secret: Secret,
    pub secret_b32: String,
    pub otpauth_uri: String,
}

/// Enroll with the defaults: a 20-byte secret from the system entropy
/// source, SHA-1, 6 digits, 30-second period.
pub fn enroll(issuer: &str, account: &str) -> Result<Enrollment> {
    enroll_with(
        &mut OsRng,
        issuer,
        account,
        &TotpParams::default(),
        DEFAULT_SECRET_BYTES,
    )
}

/// Enroll with an explicit entropy source, code parameters, and secret
/// length.
pub fn enroll_with<R>(
    rng: &mut R,
    issuer: &str,
    account: &str,
    params: &TotpParams,
    secret_len: usize,
) -> Result<Enrollment>
where
    R: RngCore + CryptoRng,
{
    let secret = Secret::generate_with(rng, secret_len)?;
    let secret_b32 = secret.to_base32();
    let otpauth_uri = KeyUri::new(issuer, account, &secret_b32)?
        .with_algorithm(params.algorithm)
        .with_digits(params.digits)?
        .with_period(params.period)?
        .render();

    // The secret itself is never logged.
    log::debug!("issued totp enrollment for {issuer}:{account}");

    Ok(Enrollment {
        secret,
        secret_b32,
        otpauth_uri,
    })
}
