//! Authorization code exchange.

// self
use crate::{
	_prelude::*,
	auth::Tokens,
	error::{ClientError, Outcome},
	flows::Client,
	http::{self, IssuerHttpClient},
	oauth::{IssuerEndpoint, TokenEndpointResponse, TransportErrorMapper},
	obs::{self, Operation, OperationOutcome, OperationSpan},
};

impl<C, M> Client<C, M>
where
	C: ?Sized + IssuerHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges an authorization code for tokens.
	///
	/// `verifier` is the PKCE verifier from the [`Challenge`](crate::flows::Challenge); an empty
	/// `code_verifier` is sent when none is given. The response body is parsed as JSON before
	/// the status is inspected, so a non-JSON body is a fault even on error statuses. A
	/// non-success status yields [`ClientError::InvalidAuthorizationCode`].
	///
	/// [`Tokens::refresh`] is mandatory: a successful response without a `refresh_token` fails
	/// with [`ResponseError::MissingRefreshToken`] and its access token is discarded.
	///
	/// [`ResponseError::MissingRefreshToken`]: crate::error::ResponseError::MissingRefreshToken
	pub async fn exchange(
		&self,
		code: &str,
		redirect_uri: &Url,
		verifier: Option<&str>,
	) -> Result<Outcome<Tokens>> {
		const OPERATION: Operation = Operation::Exchange;

		let span = OperationSpan::new(OPERATION, "exchange");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = http::post_form(
					&self.config.endpoints().token,
					&[
						("code", code),
						("redirect_uri", redirect_uri.as_str()),
						("grant_type", "authorization_code"),
						("client_id", self.config.client_id()),
						("code_verifier", verifier.unwrap_or_default()),
					],
				)?;
				let response = self.call_issuer(IssuerEndpoint::Token, request).await?;

				if !response.is_success() {
					return Ok(Err(ClientError::InvalidAuthorizationCode {
						status: response.status,
					}));
				}

				let tokens = response.into_typed::<TokenEndpointResponse>()?.into_tokens(None)?;

				Ok(Ok(tokens))
			})
			.await;

		obs::record_operation_outcome(OPERATION, OperationOutcome::of(&result));

		result
	}
}
