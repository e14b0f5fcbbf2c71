// crates.io
use jsonwebtoken::{
	DecodingKey, Validation,
	errors::{Error as JwtError, ErrorKind as JwtErrorKind},
	jwk::{Jwk, PublicKeyUse},
};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ResponseError};

/// Verification keys derived from the issuer's JWKS document.
#[derive(Clone)]
pub struct KeySet {
	keys: Vec<VerificationKey>,
}
impl KeySet {
	/// Converts a raw JWKS document into a key set.
	///
	/// Keys that `jsonwebtoken` cannot use (unknown key types, encryption keys) are skipped; a
	/// document without a single usable key fails with [`ResponseError::EmptyKeySet`].
	pub fn from_document(document: JwksDocument) -> Result<Self, ResponseError> {
		let keys = document
			.keys
			.into_iter()
			.filter_map(|raw| serde_json::from_value::<Jwk>(raw).ok())
			.filter(|jwk| !matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)))
			.filter_map(|jwk| {
				DecodingKey::from_jwk(&jwk)
					.ok()
					.map(|key| VerificationKey { kid: jwk.common.key_id.clone(), key })
			})
			.collect::<Vec<_>>();

		if keys.is_empty() { Err(ResponseError::EmptyKeySet) } else { Ok(Self { keys }) }
	}

	/// Number of usable keys.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// Returns `true` when the set holds no key (never the case for a fetched set).
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Key identifiers present in the set, in document order.
	pub fn key_ids(&self) -> impl Iterator<Item = &str> {
		self.keys.iter().filter_map(|key| key.kid.as_deref())
	}

	/// Verifies `token`'s signature and standard claims, then decodes its claims as `T`.
	///
	/// The `kid` header selects the key when present; otherwise every key is tried in order.
	/// `exp` and `iss` are required, `iss` must match `expectations.issuer`, `aud` is checked
	/// only when an audience is expected, and no clock leeway is granted.
	pub fn verify<T>(
		&self,
		token: &str,
		expectations: &VerifyExpectations<'_>,
	) -> Result<T, TokenRejection>
	where
		T: DeserializeOwned,
	{
		let header = jsonwebtoken::decode_header(token).map_err(TokenRejection::Invalid)?;
		let validation = expectations.validation(header.alg);
		let candidates = match header.kid.as_deref() {
			Some(kid) => {
				let matching = self
					.keys
					.iter()
					.filter(|key| key.kid.as_deref() == Some(kid))
					.collect::<Vec<_>>();

				if matching.is_empty() {
					return Err(TokenRejection::UnknownKey(Some(kid.to_owned())));
				}

				matching
			},
			None => self.keys.iter().collect(),
		};
		let mut last_err = None;

		for candidate in candidates {
			match jsonwebtoken::decode::<T>(token, &candidate.key, &validation) {
				Ok(data) => return Ok(data.claims),
				Err(err) => match err.kind() {
					JwtErrorKind::ExpiredSignature => {
						let rejection =
							expired_or_invalid::<T>(token, &candidate.key, &validation, err);

						return Err(rejection);
					},
					JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
						last_err = Some(err);
					},
					_ => return Err(TokenRejection::Invalid(err)),
				},
			}
		}

		Err(last_err.map_or(TokenRejection::UnknownKey(None), TokenRejection::Invalid))
	}
}
impl Debug for KeySet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeySet").field("key_ids", &self.key_ids().collect::<Vec<_>>()).finish()
	}
}

/// `jsonwebtoken` reports `exp` before `iss` and `aud`, so an expired token is re-checked with
/// expiry ignored and only counts as expired when every other claim holds.
fn expired_or_invalid<T>(
	token: &str,
	key: &DecodingKey,
	validation: &Validation,
	expired: JwtError,
) -> TokenRejection
where
	T: DeserializeOwned,
{
	let mut lenient = validation.clone();

	lenient.validate_exp = false;

	match jsonwebtoken::decode::<T>(token, key, &lenient) {
		Ok(_) => TokenRejection::Expired,
		Err(err) if matches!(err.kind(), JwtErrorKind::ExpiredSignature) =>
			TokenRejection::Invalid(expired),
		Err(err) => TokenRejection::Invalid(err),
	}
}

#[derive(Clone)]
struct VerificationKey {
	kid: Option<String>,
	key: DecodingKey,
}

/// Raw JWKS document; individual keys are parsed leniently by [`KeySet::from_document`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JwksDocument {
	/// Raw JSON Web Keys.
	#[serde(default)]
	pub keys: Vec<serde_json::Value>,
}

/// Claim expectations applied while verifying a token.
#[derive(Clone, Copy, Debug)]
pub struct VerifyExpectations<'a> {
	/// Required `iss` claim.
	pub issuer: &'a str,
	/// Required `aud` claim, if any.
	pub audience: Option<&'a str>,
}
impl VerifyExpectations<'_> {
	fn validation(&self, alg: jsonwebtoken::Algorithm) -> Validation {
		let mut validation = Validation::new(alg);

		validation.leeway = 0;
		validation.set_required_spec_claims(&["exp", "iss"]);
		validation.set_issuer(&[self.issuer]);

		match self.audience {
			Some(audience) => validation.set_audience(&[audience]),
			None => validation.validate_aud = false,
		}

		validation
	}
}

/// Why a token failed verification.
#[derive(Debug)]
pub enum TokenRejection {
	/// Signature and claims were otherwise acceptable, but `exp` has passed.
	Expired,
	/// No key in the set matches the token's `kid` (or the set had no candidate).
	UnknownKey(Option<String>),
	/// Any other verification or decoding failure.
	Invalid(JwtError),
}
impl TokenRejection {
	/// Returns `true` for the expiry case, the only one that may trigger a refresh.
	pub fn is_expired(&self) -> bool {
		matches!(self, Self::Expired)
	}
}
impl Display for TokenRejection {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Expired => f.write_str("token has expired"),
			Self::UnknownKey(Some(kid)) => write!(f, "no verification key with kid `{kid}`"),
			Self::UnknownKey(None) => f.write_str("no verification key accepted the token"),
			Self::Invalid(err) => write!(f, "{err}"),
		}
	}
}
