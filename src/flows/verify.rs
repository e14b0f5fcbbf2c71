//! Bearer token verification with one transparent refresh on expiry.
//!
//! [`Client::verify`] checks the token against the issuer's key set, then validates its subject
//! against the caller's [`SubjectSchemas`]. An expired token is the only failure that can trigger
//! a refresh, and only when a refresh token was supplied; the rotated [`Tokens`] are returned
//! with the subject so the caller can persist them.

// self
use crate::{
	_prelude::*,
	auth::{Subject, SubjectRejection, SubjectSchemas, TokenPayload, Tokens},
	error::{ClientError, Outcome},
	flows::Client,
	http::IssuerHttpClient,
	issuer::VerifyExpectations,
	oauth::TransportErrorMapper,
	obs::{self, Operation, OperationOutcome, OperationSpan},
};

/// Refresh grants a single [`Client::verify`] call may perform.
pub const MAX_REFRESH_ATTEMPTS: usize = 1;

/// Optional inputs for [`Client::verify`].
#[derive(Clone, Debug, Default)]
pub struct VerifyOptions {
	/// Refresh token used once if the access token has expired.
	pub refresh: Option<String>,
	/// Expected `iss` claim; defaults to the configured issuer.
	pub issuer: Option<String>,
	/// Expected `aud` claim; the audience is not checked when absent.
	pub audience: Option<String>,
}
impl VerifyOptions {
	/// Enables refresh-on-expiry with `refresh`.
	pub fn with_refresh(mut self, refresh: impl Into<String>) -> Self {
		self.refresh = Some(refresh.into());

		self
	}

	/// Overrides the expected issuer.
	pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
		self.issuer = Some(issuer.into());

		self
	}

	/// Requires the `aud` claim to contain `audience`.
	pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
		self.audience = Some(audience.into());

		self
	}
}

/// Successful verification.
#[derive(Clone, Debug)]
pub struct Verified {
	/// Validated subject.
	pub subject: Subject,
	/// Rotated tokens when verification had to refresh; the caller must persist them.
	pub tokens: Option<Tokens>,
}

impl<C, M> Client<C, M>
where
	C: ?Sized + IssuerHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Verifies `access_token` and returns its validated subject.
	///
	/// Key set resolution failures are faults (outer `Err`). Every verification failure maps to
	/// [`ClientError::InvalidAccessToken`], except expiry with `options.refresh` present, which
	/// performs one refresh grant and re-verifies the new access token. A rejected refresh is
	/// returned as [`ClientError::InvalidRefreshToken`]. Subjects whose mode, type, or
	/// properties do not pass `schemas` yield [`ClientError::InvalidSubject`].
	pub async fn verify(
		&self,
		schemas: &SubjectSchemas,
		access_token: &str,
		options: VerifyOptions,
	) -> Result<Outcome<Verified>> {
		const OPERATION: Operation = Operation::Verify;

		let span = OperationSpan::new(OPERATION, "verify");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result =
			span.instrument(self.verify_with_refresh(schemas, access_token, &options)).await;

		obs::record_operation_outcome(OPERATION, OperationOutcome::of(&result));

		result
	}

	async fn verify_with_refresh(
		&self,
		schemas: &SubjectSchemas,
		access_token: &str,
		options: &VerifyOptions,
	) -> Result<Outcome<Verified>> {
		let keys = self.key_set().await?;
		let expectations = VerifyExpectations {
			issuer: options.issuer.as_deref().unwrap_or(self.config.issuer()),
			audience: options.audience.as_deref(),
		};
		let mut token = access_token.to_owned();
		let mut rotated = None::<Tokens>;
		let mut refreshes = 0;

		loop {
			let rejection = match keys.verify::<TokenPayload>(&token, &expectations) {
				Ok(payload) =>
					return Ok(subject_of(schemas, payload)
						.map(|subject| Verified { subject, tokens: rotated })),
				Err(rejection) => rejection,
			};
			let refresh_token = match options.refresh.as_deref() {
				Some(refresh_token) if rejection.is_expired() && refreshes < MAX_REFRESH_ATTEMPTS =>
					refresh_token,
				_ => return Ok(Err(ClientError::invalid_access_token(rejection))),
			};

			refreshes += 1;
			self.refresh_metrics.record_attempt();

			let tokens = match self.refresh_grant(refresh_token).await? {
				Ok(tokens) => tokens,
				Err(err) => return Ok(Err(err)),
			};

			token = tokens.access.expose().to_owned();
			rotated = Some(tokens);
		}
	}
}

fn subject_of(schemas: &SubjectSchemas, payload: TokenPayload) -> Outcome<Subject> {
	if !payload.is_access() {
		return Err(ClientError::invalid_subject(SubjectRejection::NotAccess(payload.mode)));
	}

	let kind =
		payload.kind.ok_or_else(|| ClientError::invalid_subject(SubjectRejection::MissingType))?;
	let properties =
		schemas.validate(&kind, &payload.properties).map_err(ClientError::invalid_subject)?;

	Ok(Subject { kind, properties })
}
