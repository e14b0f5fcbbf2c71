// self
use crate::_prelude::*;

/// Subset of the RFC 8414 authorization server metadata used by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerMetadata {
	/// Location of the issuer's JSON Web Key Set.
	pub jwks_uri: Url,
	/// Token endpoint advertised by the issuer.
	pub token_endpoint: Url,
	/// Authorization endpoint advertised by the issuer.
	pub authorization_endpoint: Url,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn unknown_fields_are_ignored() {
		let metadata: IssuerMetadata = serde_json::from_str(
			r#"{
				"issuer": "https://auth.example.com",
				"jwks_uri": "https://auth.example.com/.well-known/jwks.json",
				"token_endpoint": "https://auth.example.com/token",
				"authorization_endpoint": "https://auth.example.com/authorize",
				"response_types_supported": ["code", "token"]
			}"#,
		)
		.expect("Metadata document should deserialize.");

		assert_eq!(metadata.jwks_uri.path(), "/.well-known/jwks.json");
	}

	#[test]
	fn missing_jwks_uri_is_rejected() {
		let document = json!({
			"token_endpoint": "https://a.example/token",
			"authorization_endpoint": "https://a.example/authorize",
		});
		let err = serde_json::from_value::<IssuerMetadata>(document)
			.expect_err("Metadata without jwks_uri must fail.");

		assert!(err.to_string().contains("jwks_uri"));
	}
}
