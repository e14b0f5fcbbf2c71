//! OAuth 2.0 subject client: state + PKCE authorization challenges, code and refresh grants, and
//! JWKS-backed bearer verification that refreshes an expired token once, transparently.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod issuer;
pub mod oauth;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	use jsonwebtoken::{Algorithm, EncodingKey, Header};
	use serde_json::json;
	// self
	#[cfg(feature = "reqwest")]
	use crate::{
		config::ClientConfig, flows::Client, http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
	};

	/// Shared secret behind the `oct` key published by [`TestSigner::jwks`].
	pub const TEST_SIGNING_SECRET: &[u8] = b"subject-client-test-signing-key-0123";
	/// Key identifier used by [`TestSigner::new`].
	pub const TEST_KEY_ID: &str = "test-key";

	/// Client type alias used by reqwest-backed integration tests.
	#[cfg(feature = "reqwest")]
	pub type ReqwestTestClient = Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Client`] for `issuer` backed by the reqwest transport used across
	/// integration tests.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_client(issuer: &str, client_id: &str) -> ReqwestTestClient {
		let config = ClientConfig::builder(client_id)
			.issuer(issuer)
			.build()
			.expect("Test client configuration should build.");

		Client::with_http_client(
			config,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}

	/// Mints HS256 tokens that verify against the `oct` JWKS it publishes.
	#[derive(Clone, Debug)]
	pub struct TestSigner {
		issuer: String,
		kid: String,
	}
	impl TestSigner {
		/// Creates a signer for `issuer` using [`TEST_KEY_ID`].
		pub fn new(issuer: impl Into<String>) -> Self {
			Self { issuer: issuer.into(), kid: TEST_KEY_ID.into() }
		}

		/// Replaces the key identifier placed in token headers and the JWKS.
		pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
			self.kid = kid.into();

			self
		}

		/// Key identifier in use.
		pub fn kid(&self) -> &str {
			&self.kid
		}

		/// JWKS document publishing the signing key.
		pub fn jwks(&self) -> serde_json::Value {
			json!({
				"keys": [{
					"kty": "oct",
					"kid": self.kid,
					"alg": "HS256",
					"use": "sig",
					"k": URL_SAFE_NO_PAD.encode(TEST_SIGNING_SECRET),
				}]
			})
		}

		/// Signs arbitrary claims.
		pub fn sign(&self, claims: &serde_json::Value) -> String {
			let mut header = Header::new(Algorithm::HS256);

			header.kid = Some(self.kid.clone());

			jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(TEST_SIGNING_SECRET))
				.expect("Test token should sign.")
		}

		/// Signs an access token for a subject of `kind` expiring `expires_in` from now.
		pub fn access_token(
			&self,
			kind: &str,
			properties: serde_json::Value,
			expires_in: Duration,
		) -> String {
			let now = OffsetDateTime::now_utc();

			self.sign(&json!({
				"mode": "access",
				"type": kind,
				"properties": properties,
				"sub": format!("{kind}:test"),
				"iss": self.issuer,
				"iat": now.unix_timestamp(),
				"exp": (now + expires_in).unix_timestamp(),
			}))
		}
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
