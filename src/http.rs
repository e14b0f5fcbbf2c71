//! Transport primitives for issuer discovery, JWKS retrieval, and token grants.
//!
//! The module exposes [`IssuerHttpClient`], the client's only dependency on an HTTP stack,
//! together with the request builders used by every flow. Requests and responses use the
//! `http` types re-exported by the `oauth2` crate so custom transports stay independent of
//! reqwest.

// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method,
		header::{ACCEPT, CONTENT_TYPE, HeaderValue},
	},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Boxed future returned by [`IssuerHttpClient::execute`].
pub type HttpFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

const MIME_JSON: &str = "application/json";
const MIME_FORM: &str = "application/x-www-form-urlencoded";

/// Abstraction over HTTP transports able to reach the issuer.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back many client
/// clones, and the futures they return must be `Send` so client operations can hop executors.
/// Timeouts and retries are the transport's business; the client performs exactly one call per
/// request it builds.
pub trait IssuerHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes a single request and returns the raw response, whatever its status.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints return results directly instead of delegating to another URI, so any custom
/// [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] should disable redirect
/// following.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl IssuerHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Builds a `GET` request that expects a JSON document.
pub(crate) fn get_json(url: &Url) -> Result<HttpRequest, ConfigError> {
	oauth2::http::Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(ACCEPT, HeaderValue::from_static(MIME_JSON))
		.body(Vec::new())
		.map_err(ConfigError::from)
}

/// Builds a form-encoded `POST` request; fields keep their insertion order.
pub(crate) fn post_form(url: &Url, fields: &[(&str, &str)]) -> Result<HttpRequest, ConfigError> {
	let body = url::form_urlencoded::Serializer::new(String::new())
		.extend_pairs(fields.iter().copied())
		.finish();

	oauth2::http::Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(ACCEPT, HeaderValue::from_static(MIME_JSON))
		.header(CONTENT_TYPE, HeaderValue::from_static(MIME_FORM))
		.body(body.into_bytes())
		.map_err(ConfigError::from)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn form_requests_encode_fields_in_order() {
		let url = Url::parse("https://auth.example.com/token").expect("Token URL should parse.");
		let request = post_form(
			&url,
			&[("grant_type", "refresh_token"), ("refresh_token", "a b&c"), ("code_verifier", "")],
		)
		.expect("Form request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(
			request.headers().get(CONTENT_TYPE).map(|value| value.as_bytes()),
			Some(MIME_FORM.as_bytes())
		);
		assert_eq!(
			String::from_utf8_lossy(request.body()),
			"grant_type=refresh_token&refresh_token=a+b%26c&code_verifier="
		);
	}

	#[test]
	fn json_requests_are_bodiless_gets() {
		let url = Url::parse("https://auth.example.com/.well-known/jwks.json")
			.expect("JWKS URL should parse.");
		let request = get_json(&url).expect("GET request should build.");

		assert_eq!(request.method(), Method::GET);
		assert_eq!(request.uri(), "https://auth.example.com/.well-known/jwks.json");
		assert!(request.body().is_empty());
	}
}
