//! Access/refresh token pair returned by the code and refresh grants.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Tokens issued by the token endpoint.
///
/// The client never stores these; callers persist them and thread the refresh token back into
/// [`Client::refresh`](crate::flows::Client::refresh) or
/// [`VerifyOptions::refresh`](crate::flows::VerifyOptions::refresh).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
	/// Bearer access token.
	pub access: TokenSecret,
	/// Refresh token; carried forward when the issuer does not rotate it.
	pub refresh: TokenSecret,
	/// Lifetime advertised via `expires_in`, when the issuer sent a positive value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<Duration>,
}
impl Tokens {
	/// Creates a pair without an advertised lifetime.
	pub fn new(access: impl Into<TokenSecret>, refresh: impl Into<TokenSecret>) -> Self {
		Self { access: access.into(), refresh: refresh.into(), expires_in: None }
	}
}
impl Debug for Tokens {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Tokens")
			.field("access", &"<redacted>")
			.field("refresh", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_hides_both_secrets() {
		let tokens = Tokens::new("access-value", "refresh-value");
		let rendered = format!("{tokens:?}");

		assert!(!rendered.contains("access-value"));
		assert!(!rendered.contains("refresh-value"));
		assert_eq!(tokens.access.expose(), "access-value");
	}
}
