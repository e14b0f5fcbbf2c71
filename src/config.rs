//! Client configuration: client identifier, issuer resolution, and derived endpoints.
//!
//! The issuer is resolved from the builder first and falls back to the
//! [`ISSUER_ENV`] environment variable. Endpoints are derived once at build time so the
//! challenge builder never fails on URL construction.

// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable consulted when no issuer is configured explicitly.
pub const ISSUER_ENV: &str = "OAUTH2_ISSUER";

const AUTHORIZE_PATH: &str = "authorize";
const TOKEN_PATH: &str = "token";
const METADATA_PATH: &str = ".well-known/oauth-authorization-server";

/// Endpoint set derived from the issuer base URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IssuerEndpoints {
	/// `{issuer}/authorize`.
	pub authorization: Url,
	/// `{issuer}/token`.
	pub token: Url,
	/// `{issuer}/.well-known/oauth-authorization-server`.
	pub metadata: Url,
}
impl IssuerEndpoints {
	fn derive(issuer: &str) -> Result<Self, ConfigError> {
		let join = |path: &str| {
			Url::parse(&format!("{issuer}/{path}"))
				.map_err(|source| ConfigError::InvalidIssuer { source })
		};

		Ok(Self {
			authorization: join(AUTHORIZE_PATH)?,
			token: join(TOKEN_PATH)?,
			metadata: join(METADATA_PATH)?,
		})
	}
}

/// Immutable client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClientConfig", into = "RawClientConfig")]
pub struct ClientConfig {
	client_id: String,
	issuer: String,
	endpoints: IssuerEndpoints,
}
impl ClientConfig {
	/// Creates a new builder seeded with the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(client_id)
	}

	/// Builds a configuration whose issuer comes from [`ISSUER_ENV`].
	pub fn from_env(client_id: impl Into<String>) -> Result<Self, ConfigError> {
		Self::builder(client_id).build()
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Issuer base URL without a trailing slash; also the cache key and expected `iss` claim.
	pub fn issuer(&self) -> &str {
		&self.issuer
	}

	/// Endpoints derived from the issuer.
	pub fn endpoints(&self) -> &IssuerEndpoints {
		&self.endpoints
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Explicit issuer; takes precedence over the environment.
	pub issuer: Option<String>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided client identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), issuer: None }
	}

	/// Sets the issuer explicitly.
	pub fn issuer(mut self, issuer: impl AsRef<str>) -> Self {
		self.issuer = Some(issuer.as_ref().to_owned());

		self
	}

	/// Consumes the builder, falling back to [`ISSUER_ENV`] when no issuer was set.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		self.build_with(|name| std::env::var(name).ok())
	}

	pub(crate) fn build_with<F>(self, env: F) -> Result<ClientConfig, ConfigError>
	where
		F: FnOnce(&str) -> Option<String>,
	{
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::EmptyClientId);
		}

		let raw = self
			.issuer
			.or_else(|| env(ISSUER_ENV))
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingIssuer { variable: ISSUER_ENV })?;
		let parsed =
			Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidIssuer { source })?;
		let issuer = parsed.as_str().trim_end_matches('/').to_owned();
		let endpoints = IssuerEndpoints::derive(&issuer)?;

		Ok(ClientConfig { client_id: self.client_id, issuer, endpoints })
	}
}

#[derive(Serialize, Deserialize)]
struct RawClientConfig {
	client_id: String,
	#[serde(default)]
	issuer: Option<String>,
}
impl TryFrom<RawClientConfig> for ClientConfig {
	type Error = ConfigError;

	fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
		let builder = ClientConfigBuilder { client_id: raw.client_id, issuer: raw.issuer };

		builder.build()
	}
}
impl From<ClientConfig> for RawClientConfig {
	fn from(config: ClientConfig) -> Self {
		Self { client_id: config.client_id, issuer: Some(config.issuer) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn no_env(_: &str) -> Option<String> {
		None
	}

	#[test]
	fn explicit_issuer_derives_endpoints() {
		let config = ClientConfig::builder("web")
			.issuer("https://auth.example.com/")
			.build_with(no_env)
			.expect("Explicit issuer should build.");

		assert_eq!(config.issuer(), "https://auth.example.com");
		assert_eq!(config.endpoints().authorization.as_str(), "https://auth.example.com/authorize");
		assert_eq!(config.endpoints().token.as_str(), "https://auth.example.com/token");
		assert_eq!(
			config.endpoints().metadata.as_str(),
			"https://auth.example.com/.well-known/oauth-authorization-server"
		);
	}

	#[test]
	fn issuer_paths_are_preserved() {
		let config = ClientConfig::builder("web")
			.issuer("https://example.com/tenants/acme")
			.build_with(no_env)
			.expect("Issuer with a path should build.");

		assert_eq!(config.endpoints().token.as_str(), "https://example.com/tenants/acme/token");
	}

	#[test]
	fn environment_is_the_fallback() {
		let config = ClientConfig::builder("web")
			.build_with(|name| {
				assert_eq!(name, ISSUER_ENV);

				Some("https://env.example.com".into())
			})
			.expect("Environment issuer should build.");

		assert_eq!(config.issuer(), "https://env.example.com");

		let config = ClientConfig::builder("web")
			.issuer("https://explicit.example.com")
			.build_with(|_| Some("https://env.example.com".into()))
			.expect("Explicit issuer should win over the environment.");

		assert_eq!(config.issuer(), "https://explicit.example.com");
	}

	#[test]
	fn missing_or_invalid_issuer_is_fatal() {
		let err = ClientConfig::builder("web")
			.build_with(no_env)
			.expect_err("Missing issuer must fail construction.");

		assert!(matches!(err, ConfigError::MissingIssuer { variable: ISSUER_ENV }));

		let err = ClientConfig::builder("web")
			.issuer("not a url")
			.build_with(no_env)
			.expect_err("Unparsable issuer must fail construction.");

		assert!(matches!(err, ConfigError::InvalidIssuer { .. }));

		let err = ClientConfig::builder(" ")
			.issuer("https://auth.example.com")
			.build_with(no_env)
			.expect_err("Blank client identifier must fail construction.");

		assert!(matches!(err, ConfigError::EmptyClientId));
	}

	#[test]
	fn deserializes_from_json() {
		let config: ClientConfig =
			serde_json::from_str(r#"{"client_id":"web","issuer":"https://auth.example.com"}"#)
				.expect("Config should deserialize.");

		assert_eq!(config.client_id(), "web");
		assert_eq!(config.endpoints().token.as_str(), "https://auth.example.com/token");
	}
}
