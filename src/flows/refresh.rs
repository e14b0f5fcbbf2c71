//! Refresh token grant with an expiry-based fast path.
//!
//! [`Client::refresh`] accepts the refresh token plus, optionally, the access token it would
//! replace. When that access token still has more than [`REFRESH_SKEW`] left, the call returns
//! `Ok(Ok(None))` without contacting the issuer. Otherwise it performs one
//! `grant_type=refresh_token` call; issuers that do not rotate refresh tokens get the presented
//! one carried forward into the returned [`Tokens`].

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{self, Tokens},
	error::{ClientError, Outcome},
	flows::Client,
	http::{self, IssuerHttpClient},
	oauth::{IssuerEndpoint, TokenEndpointResponse, TransportErrorMapper},
	obs::{self, Operation, OperationOutcome, OperationSpan},
};

/// Remaining lifetime above which the fast path keeps the current access token.
pub const REFRESH_SKEW: Duration = Duration::seconds(30);

/// Optional inputs for [`Client::refresh`].
#[derive(Clone, Debug, Default)]
pub struct RefreshOptions {
	/// Current access token, consulted by the fast path.
	pub access: Option<String>,
}
impl RefreshOptions {
	/// Supplies the current access token so a still-fresh one short-circuits the grant.
	pub fn with_access(mut self, access: impl Into<String>) -> Self {
		self.access = Some(access.into());

		self
	}
}

impl<C, M> Client<C, M>
where
	C: ?Sized + IssuerHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Refreshes tokens unless the supplied access token is still fresh.
	///
	/// Returns `Ok(Ok(None))` when `options.access` expires more than [`REFRESH_SKEW`] from now,
	/// `Ok(Ok(Some(tokens)))` after a successful grant,
	/// [`ClientError::InvalidAccessToken`] when `options.access` cannot be decoded, and
	/// [`ClientError::InvalidRefreshToken`] when the issuer rejects the grant.
	///
	/// The fast path reads `exp` without verifying the signature. A forged token with a distant
	/// `exp` only suppresses this refresh; it is never accepted as proof of identity, which is
	/// what [`Client::verify`] is for.
	pub async fn refresh(
		&self,
		refresh_token: &str,
		options: RefreshOptions,
	) -> Result<Outcome<Option<Tokens>>> {
		const OPERATION: Operation = Operation::Refresh;

		let span = OperationSpan::new(OPERATION, "refresh");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.refresh_metrics.record_attempt();

				if let Some(access) = options.access.as_deref() {
					let exp = match auth::decode_expiry_unverified(access) {
						Ok(exp) => exp,
						Err(err) => {
							self.refresh_metrics.record_rejection();

							return Ok(Err(ClientError::invalid_access_token(err)));
						},
					};

					if auth::expires_after(exp, OffsetDateTime::now_utc(), REFRESH_SKEW) {
						self.refresh_metrics.record_skipped();

						return Ok(Ok(None));
					}
				}

				Ok(self.refresh_grant(refresh_token).await?.map(Some))
			})
			.await;

		obs::record_operation_outcome(OPERATION, OperationOutcome::of(&result));

		result
	}

	/// Performs one `grant_type=refresh_token` call and records its outcome.
	pub(crate) async fn refresh_grant(&self, refresh_token: &str) -> Result<Outcome<Tokens>> {
		let result = self.request_refresh(refresh_token).await;

		match &result {
			Ok(Ok(_)) => self.refresh_metrics.record_rotation(),
			Ok(Err(_)) => self.refresh_metrics.record_rejection(),
			Err(_) => self.refresh_metrics.record_failure(),
		}

		result
	}

	async fn request_refresh(&self, refresh_token: &str) -> Result<Outcome<Tokens>> {
		let request = http::post_form(
			&self.config.endpoints().token,
			&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
		)?;
		let response = self.call_issuer(IssuerEndpoint::Token, request).await?;

		if !response.is_success() {
			return Ok(Err(ClientError::InvalidRefreshToken { status: response.status }));
		}

		let tokens =
			response.into_typed::<TokenEndpointResponse>()?.into_tokens(Some(refresh_token))?;

		Ok(Ok(tokens))
	}
}
