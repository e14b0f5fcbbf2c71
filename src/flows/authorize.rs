//! Authorization request construction: fresh `state`, optional PKCE, and the authorize URL.
//!
//! Nothing here touches the network or the caches. The returned [`Challenge`] belongs to the
//! caller, who must keep it until the redirect comes back and compare the returned `state`.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	flows::Client,
	http::IssuerHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, Operation, OperationOutcome, OperationSpan},
};

const STATE_LEN: usize = 32;
const PKCE_VERIFIER_LEN: usize = 64;

/// OAuth 2.0 `response_type` values accepted by [`Client::authorize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
	/// Authorization code flow; the only response type that carries PKCE.
	Code,
	/// Implicit flow; PKCE is never attached.
	Token,
}
impl ResponseType {
	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResponseType::Code => "code",
			ResponseType::Token => "token",
		}
	}
}
impl Display for ResponseType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Supported PKCE challenge methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Optional knobs for [`Client::authorize`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizeOptions {
	/// Attach a PKCE challenge (ignored for [`ResponseType::Token`]).
	pub pkce: bool,
	/// Upstream identity provider hint forwarded as the `provider` query parameter.
	pub provider: Option<String>,
}
impl AuthorizeOptions {
	/// Requests a PKCE challenge.
	pub fn with_pkce(mut self) -> Self {
		self.pkce = true;

		self
	}

	/// Sets the `provider` hint.
	pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
		self.provider = Some(provider.into());

		self
	}
}

/// Values the caller must keep until the authorization redirect returns.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
	/// PKCE verifier to send with the code exchange, when PKCE was used.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub verifier: Option<String>,
}
impl Challenge {
	/// Returns `true` when the `state` echoed by the redirect matches this challenge.
	pub fn matches_state(&self, returned_state: &str) -> bool {
		returned_state == self.state
	}
}
impl Debug for Challenge {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Challenge")
			.field("state", &self.state)
			.field("verifier", &self.verifier.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

/// Result of [`Client::authorize`]: the challenge to keep and the URL to send the user to.
#[derive(Clone, Debug)]
pub struct AuthorizationChallenge {
	/// Caller-owned correlation values.
	pub challenge: Challenge,
	/// Fully-formed authorize URL.
	pub url: Url,
}

struct PkcePair {
	verifier: String,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	fn generate() -> Self {
		let verifier = random_string(PKCE_VERIFIER_LEN);
		let challenge = compute_pkce_challenge(&verifier);

		Self { verifier, challenge, method: PkceCodeChallengeMethod::S256 }
	}
}

impl<C, M> Client<C, M>
where
	C: ?Sized + IssuerHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds an authorization URL with a fresh `state`.
	///
	/// A PKCE verifier is generated only when `options.pkce` is set and `response_type` is
	/// [`ResponseType::Code`]; for [`ResponseType::Token`] the request is silently dropped.
	pub fn authorize(
		&self,
		redirect_uri: &Url,
		response_type: ResponseType,
		options: AuthorizeOptions,
	) -> AuthorizationChallenge {
		let pkce = (options.pkce && response_type == ResponseType::Code).then(PkcePair::generate);

		self.build_challenge(redirect_uri, response_type, options.provider.as_deref(), pkce)
	}

	/// Legacy PKCE helper returning `(verifier, url)`; always uses `response_type=code`.
	#[deprecated(note = "use `Client::authorize` with `ResponseType::Code` and PKCE enabled")]
	pub fn pkce(&self, redirect_uri: &Url, options: AuthorizeOptions) -> (String, Url) {
		let pkce = PkcePair::generate();
		let verifier = pkce.verifier.clone();
		let AuthorizationChallenge { url, .. } = self.build_challenge(
			redirect_uri,
			ResponseType::Code,
			options.provider.as_deref(),
			Some(pkce),
		);

		(verifier, url)
	}

	fn build_challenge(
		&self,
		redirect_uri: &Url,
		response_type: ResponseType,
		provider: Option<&str>,
		pkce: Option<PkcePair>,
	) -> AuthorizationChallenge {
		const OPERATION: Operation = Operation::Authorize;

		let _span = OperationSpan::new(OPERATION, "authorize").entered();

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let state = random_string(STATE_LEN);
		let url = build_authorize_url(
			&self.config,
			redirect_uri,
			response_type,
			&state,
			provider,
			pkce.as_ref(),
		);

		obs::record_operation_outcome(OPERATION, OperationOutcome::Success);

		AuthorizationChallenge {
			challenge: Challenge { state, verifier: pkce.map(|pair| pair.verifier) },
			url,
		}
	}
}

fn build_authorize_url(
	config: &ClientConfig,
	redirect_uri: &Url,
	response_type: ResponseType,
	state: &str,
	provider: Option<&str>,
	pkce: Option<&PkcePair>,
) -> Url {
	let mut url = config.endpoints().authorization.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("client_id", config.client_id());
	pairs.append_pair("redirect_uri", redirect_uri.as_str());
	pairs.append_pair("response_type", response_type.as_str());
	pairs.append_pair("state", state);

	if let Some(provider) = provider {
		pairs.append_pair("provider", provider);
	}
	if let Some(pkce) = pkce {
		pairs.append_pair("code_challenge_method", pkce.method.as_str());
		pairs.append_pair("code_challenge", &pkce.challenge);
	}

	drop(pairs);

	url
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

/// Derives the S256 code challenge for `verifier`.
pub fn compute_pkce_challenge(verifier: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(verifier.as_bytes());

	URL_SAFE_NO_PAD.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config() -> ClientConfig {
		ClientConfig::builder("web")
			.issuer("https://auth.example.com")
			.build()
			.expect("Test configuration should build.")
	}

	fn redirect() -> Url {
		Url::parse("https://app.example.com/callback").expect("Redirect fixture should parse.")
	}

	fn query(url: &Url) -> Vec<(String, String)> {
		url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
	}

	#[test]
	fn rfc7636_appendix_b_challenge() {
		assert_eq!(
			compute_pkce_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
			"E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
		);
	}

	#[test]
	fn authorize_url_keeps_parameter_order() {
		let pkce = PkcePair::generate();
		let url = build_authorize_url(
			&config(),
			&redirect(),
			ResponseType::Code,
			"state-1",
			Some("github"),
			Some(&pkce),
		);
		let keys = query(&url).into_iter().map(|(k, _)| k).collect::<Vec<_>>();

		assert_eq!(url.path(), "/authorize");
		assert_eq!(
			keys,
			[
				"client_id",
				"redirect_uri",
				"response_type",
				"state",
				"provider",
				"code_challenge_method",
				"code_challenge",
			]
		);
		assert!(query(&url).contains(&("code_challenge".into(), pkce.challenge.clone())));
	}

	#[test]
	fn optional_parameters_are_omitted() {
		let url =
			build_authorize_url(&config(), &redirect(), ResponseType::Token, "s", None, None);
		let pairs = query(&url);

		assert_eq!(pairs.len(), 4);
		assert!(pairs.contains(&("response_type".into(), "token".into())));
		assert!(
			pairs.contains(&("redirect_uri".into(), "https://app.example.com/callback".into()))
		);
	}

	#[test]
	fn generated_values_have_expected_shape() {
		let pkce = PkcePair::generate();

		assert_eq!(pkce.verifier.len(), PKCE_VERIFIER_LEN);
		assert!(pkce.verifier.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_eq!(pkce.challenge, compute_pkce_challenge(&pkce.verifier));
		assert_ne!(random_string(STATE_LEN), random_string(STATE_LEN));
	}

	#[test]
	fn challenge_persists_without_absent_verifier() {
		let challenge = Challenge { state: "abc".into(), verifier: None };
		let json = serde_json::to_string(&challenge).expect("Challenge should serialize.");

		assert_eq!(json, r#"{"state":"abc"}"#);
		assert!(challenge.matches_state("abc"));
		assert!(!challenge.matches_state("abd"));
	}
}
