//! `otpauth://` key URIs per the Google Authenticator key-URI format:
//! <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>
//!
//! Rendered form (all parameters always present):
//! `otpauth://totp/ISSUER:ACCOUNT?secret=BASE32&issuer=ISSUER&algorithm=SHA1&digits=6&period=30`

use serde::{Deserialize, Serialize};
use url::Url;

use crate::otp::error::{OtpError, Result};
use crate::otp::types::Algorithm;

pub const DEFAULT_DIGITS: u8 = 6;
pub const DEFAULT_PERIOD: u32 = 30;

/// Value object for one enrollment URI.
///
/// Construction validates the labels, so a `KeyUri` that exists renders
/// to an unambiguous URI: `:` separates issuer from account exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyUri {
    pub issuer: String,
    pub account: String,
    pub secret_b32: String,
    pub algorithm: Algorithm,
    pub digits: u8,
    pub period: u32,
}

impl KeyUri {
    /// Build with the interoperable defaults (SHA-1, 6 digits, 30 s).
    ///
    /// Both labels must be non-empty and free of `:`, the label
    /// separator; violations fail with `InvalidLabel`, issuer checked
    /// first.
    pub fn new(issuer: &str, account: &str, secret_b32: &str) -> Result<Self> {
        validate_label("issuer", issuer)?;
        validate_label("account", account)?;
        Ok(Self {
            issuer: issuer.to_owned(),
            account: account.to_owned(),
            secret_b32: secret_b32.to_owned(),
            algorithm: Algorithm::default(),
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
        })
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the code width; only 6 and 8 are accepted.
    pub fn with_digits(mut self, digits: u8) -> Result<Self> {
        if digits != 6 && digits != 8 {
            return Err(OtpError::InvalidParameter(format!(
                "unsupported digit count {digits}, expected 6 or 8"
            )));
        }
        self.digits = digits;
        Ok(self)
    }

    /// Set the time-step length; must be positive.
    pub fn with_period(mut self, period: u32) -> Result<Self> {
        if period == 0 {
            return Err(OtpError::InvalidParameter("period must be positive".into()));
        }
        self.period = period;
        Ok(self)
    }

    /// Render the exact wire format authenticator apps consume.
    ///
    /// Reserved characters in the labels are percent-encoded; `@` is a
    /// valid path/query character and stays literal.
    pub fn render(&self) -> String {
        let issuer = percent_encode(&self.issuer);
        format!(
            "otpauth://totp/{issuer}:{account}?secret={secret}&issuer={issuer}&algorithm={algorithm}&digits={digits}&period={period}",
            account = percent_encode(&self.account),
            secret = self.secret_b32,
            algorithm = self.algorithm.uri_name(),
            digits = self.digits,
            period = self.period,
        )
    }

    /// Parse a key URI back into its parts.
    ///
    /// Only `totp` URIs are accepted. Structural problems fail with
    /// `InvalidUri`; out-of-range digits/period fail with
    /// `InvalidParameter`; label violations with `InvalidLabel`.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input)
            .map_err(|e| OtpError::InvalidUri(format!("not a URI: {e}")))?;

        if url.scheme() != "otpauth" {
            return Err(OtpError::InvalidUri(format!(
                "expected scheme 'otpauth', got '{}'",
                url.scheme()
            )));
        }
        match url.host_str() {
            Some("totp") => {}
            Some("hotp") => {
                return Err(OtpError::InvalidUri(
                    "counter-based 'hotp' URIs are not supported".into(),
                ))
            }
            other => {
                return Err(OtpError::InvalidUri(format!("unknown OTP type {other:?}")))
            }
        }

        // Label path: "ISSUER:ACCOUNT" or bare "ACCOUNT". Split before
        // decoding so an encoded colon stays inside its label (and is
        // then rejected by validation, same as at build time).
        let path = url.path().trim_start_matches('/');
        let (path_issuer, account_raw) = match path.split_once(':') {
            Some((issuer, account)) => (Some(percent_decode(issuer)), percent_decode(account)),
            None => (None, percent_decode(path)),
        };

        let mut secret = None;
        let mut param_issuer = None;
        let mut algorithm = Algorithm::default();
        let mut digits = DEFAULT_DIGITS;
        let mut period = DEFAULT_PERIOD;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "secret" => secret = Some(value.to_string()),
                "issuer" => param_issuer = Some(value.to_string()),
                "algorithm" => {
                    algorithm = Algorithm::from_str_loose(&value).ok_or_else(|| {
                        OtpError::InvalidUri(format!("unknown algorithm '{value}'"))
                    })?;
                }
                "digits" => {
                    digits = value
                        .parse()
                        .map_err(|_| OtpError::InvalidUri(format!("bad digits '{value}'")))?;
                }
                "period" => {
                    period = value
                        .parse()
                        .map_err(|_| OtpError::InvalidUri(format!("bad period '{value}'")))?;
                }
                _ => {} // unknown parameters are ignored
            }
        }

        let secret =
            secret.ok_or_else(|| OtpError::InvalidUri("missing 'secret' parameter".into()))?;
        let issuer = param_issuer
            .or(path_issuer)
            .ok_or_else(|| OtpError::InvalidUri("missing issuer".into()))?;

        Self::new(&issuer, &account_raw, &secret)?
            .with_algorithm(algorithm)
            .with_digits(digits)?
            .with_period(period)
    }
}

fn validate_label(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(OtpError::InvalidLabel(format!("{field} must not be empty")));
    }
    if value.contains(':') {
        return Err(OtpError::InvalidLabel(format!(
            "{field} must not contain ':', the label separator"
        )));
    }
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Percent-encoding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// RFC 3986 unreserved characters plus `@` stay literal; everything else
/// is escaped. `@` is a pchar and a query character, and the de facto
/// label format writes e-mail accounts unescaped.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'@' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn percent_decode(s: &str) -> String {
    let raw = s.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%'
            && i + 2 < raw.len()
            && raw[i + 1].is_ascii_hexdigit()
            && raw[i + 2].is_ascii_hexdigit()
        {
            // Both hex digits are ASCII, so the slice is char-aligned.
            if let Ok(value) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                bytes.push(value);
                i += 3;
                continue;
            }
        }
        bytes.push(raw[i]);
        i += 1;
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Rendering ────────────────────────────────────────────────

    #[test]
    fn renders_exact_wire_format() {
        let uri = KeyUri::new("MyApp", "alice@example.com", "JBSWY3DPEHPK3PXP")
            .unwrap()
            .render();
        assert!(uri.starts_with("otpauth://totp/MyApp:alice@example.com?secret=JBSWY3DPEHPK3PXP"));
        assert!(uri.contains("issuer=MyApp"));
        assert!(uri.contains("algorithm=SHA1"));
        assert!(uri.contains("digits=6&period=30"));
    }

    #[test]
    fn renders_all_parameters_always() {
        let uri = KeyUri::new("Acme", "bob", "AAAA").unwrap().render();
        assert_eq!(
            uri,
            "otpauth://totp/Acme:bob?secret=AAAA&issuer=Acme&algorithm=SHA1&digits=6&period=30"
        );
    }

    #[test]
    fn renders_non_default_parameters() {
        let uri = KeyUri::new("Acme", "bob", "AAAA")
            .unwrap()
            .with_algorithm(Algorithm::Sha256)
            .with_digits(8)
            .unwrap()
            .with_period(60)
            .unwrap()
            .render();
        assert!(uri.contains("algorithm=SHA256"));
        assert!(uri.contains("digits=8"));
        assert!(uri.contains("period=60"));
    }

    #[test]
    fn percent_encodes_reserved_label_characters() {
        let uri = KeyUri::new("My Corp", "alice smith", "AAAA").unwrap().render();
        assert!(uri.starts_with("otpauth://totp/My%20Corp:alice%20smith?"));
        assert!(uri.contains("issuer=My%20Corp"));
    }

    #[test]
    fn at_sign_stays_literal() {
        let uri = KeyUri::new("MyApp", "alice@example.com", "AAAA").unwrap().render();
        assert!(uri.contains("MyApp:alice@example.com"));
        assert!(!uri.contains("%40"));
    }

    // ── Validation ───────────────────────────────────────────────

    #[test]
    fn rejects_label_separator_in_issuer() {
        let err = KeyUri::new("My:App", "alice", "AAAA").unwrap_err();
        assert!(matches!(err, OtpError::InvalidLabel(_)));
    }

    #[test]
    fn rejects_label_separator_in_account() {
        let err = KeyUri::new("MyApp", "al:ice", "AAAA").unwrap_err();
        assert!(matches!(err, OtpError::InvalidLabel(_)));
    }

    #[test]
    fn rejects_empty_labels_issuer_first() {
        let err = KeyUri::new("", "", "AAAA").unwrap_err();
        assert!(err.to_string().contains("issuer"));
        let err = KeyUri::new("MyApp", "", "AAAA").unwrap_err();
        assert!(err.to_string().contains("account"));
    }

    #[test]
    fn rejects_unsupported_digits() {
        let err = KeyUri::new("A", "b", "AAAA").unwrap().with_digits(7).unwrap_err();
        assert!(matches!(err, OtpError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_zero_period() {
        let err = KeyUri::new("A", "b", "AAAA").unwrap().with_period(0).unwrap_err();
        assert!(matches!(err, OtpError::InvalidParameter(_)));
    }

    // ── Parsing ──────────────────────────────────────────────────

    #[test]
    fn parses_rendered_uri_back() {
        let original = KeyUri::new("MyApp", "alice@example.com", "JBSWY3DPEHPK3PXP")
            .unwrap()
            .with_algorithm(Algorithm::Sha256)
            .with_digits(8)
            .unwrap()
            .with_period(60)
            .unwrap();
        let parsed = KeyUri::parse(&original.render()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn parses_minimal_uri_with_defaults() {
        let parsed =
            KeyUri::parse("otpauth://totp/Example:alice?secret=JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(parsed.issuer, "Example");
        assert_eq!(parsed.account, "alice");
        assert_eq!(parsed.algorithm, Algorithm::Sha1);
        assert_eq!(parsed.digits, 6);
        assert_eq!(parsed.period, 30);
    }

    #[test]
    fn parse_prefers_query_issuer_over_path() {
        let parsed =
            KeyUri::parse("otpauth://totp/PathCorp:alice?secret=AAAA&issuer=QueryCorp").unwrap();
        assert_eq!(parsed.issuer, "QueryCorp");
    }

    #[test]
    fn parse_decodes_percent_escapes() {
        let parsed =
            KeyUri::parse("otpauth://totp/My%20Corp:alice%20smith?secret=AAAA").unwrap();
        assert_eq!(parsed.issuer, "My Corp");
        assert_eq!(parsed.account, "alice smith");
    }

    #[test]
    fn parse_rejects_foreign_scheme() {
        assert!(KeyUri::parse("https://example.com/").is_err());
    }

    #[test]
    fn parse_rejects_hotp() {
        let err = KeyUri::parse("otpauth://hotp/A:b?secret=AAAA&counter=1").unwrap_err();
        assert!(matches!(err, OtpError::InvalidUri(_)));
    }

    #[test]
    fn parse_rejects_missing_secret() {
        assert!(KeyUri::parse("otpauth://totp/A:b?issuer=A").is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_parameters() {
        assert!(KeyUri::parse("otpauth://totp/A:b?secret=AAAA&digits=7").is_err());
        assert!(KeyUri::parse("otpauth://totp/A:b?secret=AAAA&period=0").is_err());
        assert!(KeyUri::parse("otpauth://totp/A:b?secret=AAAA&algorithm=MD5").is_err());
    }

    #[test]
    fn parse_rejects_second_label_separator() {
        // "A:b:c" leaves ':' inside the account label.
        let err = KeyUri::parse("otpauth://totp/A:b:c?secret=AAAA").unwrap_err();
        assert!(matches!(err, OtpError::InvalidLabel(_)));
    }

    #[test]
    fn parse_rejects_encoded_colon_in_label() {
        let err = KeyUri::parse("otpauth://totp/A%3AB:c?secret=AAAA").unwrap_err();
        assert!(matches!(err, OtpError::InvalidLabel(_)));
    }

    // ── Serde ────────────────────────────────────────────────────

    #[test]
    fn keyuri_serde_roundtrip() {
        let uri = KeyUri::new("MyApp", "alice", "AAAA").unwrap();
        let json = serde_json::to_string(&uri).unwrap();
        let back: KeyUri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uri);
    }

    // ── Encoding helpers ─────────────────────────────────────────

    #[test]
    fn percent_encode_basics() {
        assert_eq!(percent_encode("hello"), "hello");
        assert_eq!(percent_encode("hello world"), "hello%20world");
        assert_eq!(percent_encode("a@b"), "a@b");
        assert_eq!(percent_encode("a/b"), "a%2Fb");
    }

    #[test]
    fn percent_decode_basics() {
        assert_eq!(percent_decode("hello%20world"), "hello world");
        assert_eq!(percent_decode("a%40b"), "a@b");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}
