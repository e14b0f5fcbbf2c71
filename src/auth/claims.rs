//! Access-token claims and the unverified expiry probe used by the refresh fast path.

// crates.io
use jsonwebtoken::{DecodingKey, Validation};
// self
use crate::_prelude::*;

/// `mode` claim value carried by access tokens (refresh tokens use a different mode).
pub const ACCESS_MODE: &str = "access";

/// Claims of a verified access token.
///
/// Subject fields are optional at the wire level so a token that verifies but lacks them is
/// reported as an invalid subject rather than an invalid token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
	/// Token mode; must equal [`ACCESS_MODE`] for the token to be accepted.
	#[serde(default)]
	pub mode: Option<String>,
	/// Subject type, used as the key into the caller's schema set.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Raw, unvalidated subject attributes.
	#[serde(default)]
	pub properties: serde_json::Value,
	/// Standard `sub` claim.
	#[serde(default)]
	pub sub: Option<String>,
	/// Standard `iss` claim.
	#[serde(default)]
	pub iss: Option<String>,
	/// Standard `exp` claim (seconds since the Unix epoch).
	#[serde(default)]
	pub exp: Option<i64>,
}
impl TokenPayload {
	/// Returns `true` when the token is an access token.
	pub fn is_access(&self) -> bool {
		self.mode.as_deref() == Some(ACCESS_MODE)
	}
}

#[derive(Deserialize)]
struct ExpiryClaims {
	#[serde(default)]
	exp: Option<i64>,
}

/// Reads the `exp` claim without checking the signature or any other claim.
///
/// Only suitable for deciding whether a refresh is worth a round trip; never for trusting the
/// token.
pub fn decode_expiry_unverified(token: &str) -> Result<Option<i64>, jsonwebtoken::errors::Error> {
	let mut validation = Validation::default();

	validation.insecure_disable_signature_validation();
	validation.validate_exp = false;
	validation.validate_nbf = false;
	validation.validate_aud = false;
	validation.required_spec_claims.clear();

	let data =
		jsonwebtoken::decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;

	Ok(data.claims.exp)
}

/// Returns `true` when `exp` lies strictly beyond `now + skew`.
pub fn expires_after(exp: Option<i64>, now: OffsetDateTime, skew: Duration) -> bool {
	match exp {
		Some(exp) => exp > (now + skew).unix_timestamp(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	use time::macros;
	// self
	use super::*;

	fn unsigned(payload: &str) -> String {
		let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
		let body = URL_SAFE_NO_PAD.encode(payload);

		format!("{header}.{body}.c2lnbmF0dXJl")
	}

	#[test]
	fn expiry_is_read_without_a_key() {
		let token = unsigned(r#"{"exp":1700000000,"mode":"access"}"#);

		assert_eq!(
			decode_expiry_unverified(&token).expect("Unsigned token should decode."),
			Some(1_700_000_000)
		);
		assert_eq!(
			decode_expiry_unverified(&unsigned(r#"{"mode":"access"}"#))
				.expect("Token without exp should decode."),
			None
		);
	}

	#[test]
	fn garbage_does_not_decode() {
		assert!(decode_expiry_unverified("not-a-jwt").is_err());
		assert!(decode_expiry_unverified("a.b.c").is_err());
	}

	#[test]
	fn skew_window_is_exclusive() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let skew = Duration::seconds(30);
		let edge = (now + skew).unix_timestamp();

		assert!(expires_after(Some(edge + 1), now, skew));
		assert!(!expires_after(Some(edge), now, skew));
		assert!(!expires_after(Some(now.unix_timestamp() - 5), now, skew));
		assert!(!expires_after(None, now, skew));
	}

	#[test]
	fn payload_mode_gate() {
		let payload: TokenPayload = serde_json::from_str(
			r#"{"mode":"access","type":"user","properties":{"id":"u-1"},"exp":1}"#,
		)
		.expect("Payload should deserialize.");

		assert!(payload.is_access());
		assert_eq!(payload.kind.as_deref(), Some("user"));

		let payload: TokenPayload =
			serde_json::from_str(r#"{"mode":"refresh"}"#).expect("Payload should deserialize.");

		assert!(!payload.is_access());
		assert!(payload.properties.is_null());
	}
}
