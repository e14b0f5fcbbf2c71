//! Client error types: infrastructure faults and protocol-level rejections.
//!
//! Public operations return `Result<Outcome<T>>`. The outer [`Error`] carries faults that the
//! caller cannot branch on meaningfully (network, malformed responses, configuration), while
//! the inner [`Outcome`] carries the tagged [`ClientError`] rejections issued by the protocol.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Tagged protocol result: either the value or a named [`ClientError`].
pub type Outcome<T> = std::result::Result<T, ClientError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Infrastructure fault propagated out of client operations.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Issuer responded with something the client could not interpret.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Protocol-level rejections returned as values rather than faults.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ClientError {
	/// Token endpoint rejected an authorization code exchange.
	#[error("Issuer rejected the authorization code (HTTP {status}).")]
	InvalidAuthorizationCode {
		/// HTTP status returned by the token endpoint.
		status: u16,
	},
	/// Token endpoint rejected a refresh token.
	#[error("Issuer rejected the refresh token (HTTP {status}).")]
	InvalidRefreshToken {
		/// HTTP status returned by the token endpoint.
		status: u16,
	},
	/// Access token is malformed or failed verification.
	#[error("Access token is invalid: {reason}.")]
	InvalidAccessToken {
		/// Verification failure summary.
		reason: String,
	},
	/// Access token verified but its subject was rejected.
	#[error("Access token subject is invalid: {reason}.")]
	InvalidSubject {
		/// Subject validation failure summary.
		reason: String,
	},
}
impl ClientError {
	pub(crate) fn invalid_access_token(reason: impl Display) -> Self {
		Self::InvalidAccessToken { reason: reason.to_string() }
	}

	pub(crate) fn invalid_subject(reason: impl Display) -> Self {
		Self::InvalidSubject { reason: reason.to_string() }
	}
}

/// Configuration and validation failures raised while building or using a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Client identifier was empty.
	#[error("Client identifier cannot be empty.")]
	EmptyClientId,
	/// Neither an explicit issuer nor the environment fallback was provided.
	#[error("Issuer is not configured; set it explicitly or via `{variable}`.")]
	MissingIssuer {
		/// Environment variable consulted as a fallback.
		variable: &'static str,
	},
	/// Issuer URL cannot be parsed.
	#[error("Issuer URL is invalid.")]
	InvalidIssuer {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Issuer responses that could not be interpreted.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Endpoint answered with a non-success status where no protocol rejection applies.
	#[error("The {endpoint} endpoint returned HTTP {status}.")]
	Status {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
	},
	/// Endpoint responded with malformed JSON or an unexpected shape.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	Parse {
		/// Endpoint label.
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// Code exchange succeeded without issuing a refresh token.
	#[error("The token endpoint response is missing refresh_token.")]
	MissingRefreshToken,
	/// JWKS document held no key usable for verification.
	#[error("The JWKS document does not contain any usable verification key.")]
	EmptyKeySet,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the issuer.")]
	Io(#[from] std::io::Error),
	/// HTTP client failed without a structured error.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Other {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn client_errors_render_reasons() {
		let err = ClientError::invalid_access_token("token expired");

		assert_eq!(err.to_string(), "Access token is invalid: token expired.");
		assert_eq!(
			ClientError::InvalidRefreshToken { status: 400 }.to_string(),
			"Issuer rejected the refresh token (HTTP 400)."
		);
	}

	#[test]
	fn missing_issuer_names_the_fallback_variable() {
		let err = Error::from(ConfigError::MissingIssuer { variable: "OAUTH2_ISSUER" });

		assert!(err.to_string().contains("OAUTH2_ISSUER"));
	}
}
