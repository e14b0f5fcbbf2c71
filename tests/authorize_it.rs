#![cfg(all(feature = "reqwest", feature = "test"))]

mod support;

// crates.io
use oauth2_subject::{
	_preludet::*,
	flows::{AuthorizeOptions, ResponseType, compute_pkce_challenge},
};
// self
use support::*;

fn pairs(url: &Url) -> HashMap<String, String> {
	url.query_pairs().into_owned().collect()
}

#[test]
fn code_with_pkce_carries_a_derivable_challenge() {
	let client = build_reqwest_test_client("https://auth.example.com", CLIENT_ID);
	let issued = client.authorize(
		&redirect_uri(),
		ResponseType::Code,
		AuthorizeOptions::default().with_pkce(),
	);
	let query = pairs(&issued.url);
	let verifier =
		issued.challenge.verifier.as_deref().expect("PKCE verifier should be returned.");

	assert_eq!(issued.url.origin().ascii_serialization(), "https://auth.example.com");
	assert_eq!(issued.url.path(), "/authorize");
	assert_eq!(query.get("client_id").map(String::as_str), Some(CLIENT_ID));
	assert_eq!(
		query.get("redirect_uri").map(String::as_str),
		Some("https://app.example.com/callback")
	);
	assert_eq!(query.get("response_type").map(String::as_str), Some("code"));
	assert_eq!(query.get("state"), Some(&issued.challenge.state));
	assert_eq!(query.get("code_challenge_method").map(String::as_str), Some("S256"));
	assert_eq!(query.get("code_challenge"), Some(&compute_pkce_challenge(verifier)));
	assert!(!query.contains_key("provider"));
}

#[test]
fn token_response_type_never_carries_pkce() {
	let client = build_reqwest_test_client("https://auth.example.com", CLIENT_ID);
	let issued = client.authorize(
		&redirect_uri(),
		ResponseType::Token,
		AuthorizeOptions::default().with_pkce().with_provider("github"),
	);
	let query = pairs(&issued.url);

	assert!(issued.challenge.verifier.is_none());
	assert!(!query.contains_key("code_challenge"));
	assert!(!query.contains_key("code_challenge_method"));
	assert_eq!(query.get("response_type").map(String::as_str), Some("token"));
	assert_eq!(query.get("provider").map(String::as_str), Some("github"));
}

#[test]
fn code_without_pkce_has_no_verifier() {
	let client = build_reqwest_test_client("https://auth.example.com", CLIENT_ID);
	let issued = client.authorize(&redirect_uri(), ResponseType::Code, AuthorizeOptions::default());

	assert!(issued.challenge.verifier.is_none());
	assert!(!pairs(&issued.url).contains_key("code_challenge"));
}

#[test]
fn state_is_fresh_on_every_call() {
	let client = build_reqwest_test_client("https://auth.example.com", CLIENT_ID);
	let first = client.authorize(&redirect_uri(), ResponseType::Code, AuthorizeOptions::default());
	let second = client.authorize(&redirect_uri(), ResponseType::Code, AuthorizeOptions::default());

	assert_eq!(first.challenge.state.len(), 32);
	assert_ne!(first.challenge.state, second.challenge.state);
}

#[test]
#[allow(deprecated)]
fn legacy_pkce_helper_forces_code_and_challenge() {
	let client = build_reqwest_test_client("https://auth.example.com/", CLIENT_ID);
	let (verifier, url) = client.pkce(&redirect_uri(), AuthorizeOptions::default());
	let query = pairs(&url);

	assert_eq!(verifier.len(), 64);
	assert_eq!(url.as_str().split('?').next(), Some("https://auth.example.com/authorize"));
	assert_eq!(query.get("response_type").map(String::as_str), Some("code"));
	assert_eq!(query.get("code_challenge"), Some(&compute_pkce_challenge(&verifier)));
}
