//! Wire-level glue between the transport and the flows.
//!
//! [`TransportErrorMapper`] turns transport failures into client [`Error`] values. Every issuer
//! call performs a single request and decodes the JSON body with `serde_path_to_error`, so parse
//! faults carry the failing field path.

pub use oauth2;

// crates.io
use oauth2::{HttpClientError, HttpRequest};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, Tokens},
	error::{ConfigError, ResponseError, TransportError},
	http::IssuerHttpClient,
};

/// Issuer endpoints the client talks to, used to label faults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssuerEndpoint {
	/// Well-known authorization server metadata.
	Metadata,
	/// JWKS document advertised by the metadata.
	Jwks,
	/// Token endpoint used by the code and refresh grants.
	Token,
}
impl IssuerEndpoint {
	/// Returns a stable label suitable for messages and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			IssuerEndpoint::Metadata => "metadata",
			IssuerEndpoint::Jwks => "jwks",
			IssuerEndpoint::Token => "token",
		}
	}
}
impl Display for IssuerEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a client error.
	fn map_transport_error(&self, endpoint: IssuerEndpoint, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: IssuerEndpoint,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) =>
				if inner.is_builder() {
					ConfigError::from(*inner).into()
				} else {
					TransportError::network(endpoint.as_str(), *inner).into()
				},
			other => map_generic_transport_error(endpoint, other),
		}
	}
}

/// Maps the transport-independent [`HttpClientError`] variants.
///
/// Custom mappers can delegate to this helper for everything except their own transport
/// variant.
pub fn map_generic_transport_error<E>(endpoint: IssuerEndpoint, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) =>
			TransportError::network(endpoint.as_str(), *inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) =>
			TransportError::Other { endpoint: endpoint.as_str(), message }.into(),
		other => TransportError::Other { endpoint: endpoint.as_str(), message: other.to_string() }
			.into(),
	}
}

/// JSON response whose body has been parsed but not yet shaped.
#[derive(Debug)]
pub(crate) struct JsonResponse {
	pub(crate) endpoint: IssuerEndpoint,
	pub(crate) status: u16,
	pub(crate) body: serde_json::Value,
}
impl JsonResponse {
	pub(crate) fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Fails with [`ResponseError::Status`] on non-success responses.
	pub(crate) fn require_success(self) -> Result<Self> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(ResponseError::Status { endpoint: self.endpoint.as_str(), status: self.status }
				.into())
		}
	}

	/// Shapes the parsed body into `T`, reporting the failing path on mismatch.
	pub(crate) fn into_typed<T>(self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let JsonResponse { endpoint, status, body } = self;

		serde_path_to_error::deserialize(body).map_err(|source| {
			ResponseError::Parse { endpoint: endpoint.as_str(), source, status }.into()
		})
	}
}

/// Performs one request and parses the body as JSON, whatever the status.
pub(crate) async fn call_json<C, M>(
	http_client: &C,
	mapper: &M,
	endpoint: IssuerEndpoint,
	request: HttpRequest,
) -> Result<JsonResponse>
where
	C: ?Sized + IssuerHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let response = http_client
		.execute(request)
		.await
		.map_err(|err| mapper.map_transport_error(endpoint, err))?;
	let status = response.status().as_u16();
	let mut de = serde_json::Deserializer::from_slice(response.body());
	let body = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| ResponseError::Parse { endpoint: endpoint.as_str(), source, status })?;

	Ok(JsonResponse { endpoint, status, body })
}

/// Successful token endpoint payload.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenEndpointResponse {
	access_token: String,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
}
impl TokenEndpointResponse {
	/// Maps the payload into [`Tokens`], carrying `fallback_refresh` forward when the issuer
	/// did not rotate the refresh token.
	pub(crate) fn into_tokens(self, fallback_refresh: Option<&str>) -> Result<Tokens> {
		let refresh = match (self.refresh_token, fallback_refresh) {
			(Some(rotated), _) => rotated,
			(None, Some(previous)) => previous.to_owned(),
			(None, None) => return Err(ResponseError::MissingRefreshToken.into()),
		};

		Ok(Tokens {
			access: TokenSecret::new(self.access_token),
			refresh: TokenSecret::new(refresh),
			expires_in: self.expires_in.filter(|secs| *secs > 0).map(Duration::seconds),
		})
	}
}
