//! Issuer fixtures shared by the integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::{Mock, prelude::*};
use oauth2_subject::{_preludet::*, auth::SubjectSchemas};
use serde_json::json;

pub const CLIENT_ID: &str = "subject-web";
pub const METADATA_PATH: &str = "/.well-known/oauth-authorization-server";
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// User subject properties used across tests.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
	pub id: String,
	#[serde(default)]
	pub admin: bool,
}

pub fn user_schemas() -> SubjectSchemas {
	SubjectSchemas::new().with_type::<User>("user")
}

pub fn user_token(signer: &TestSigner, id: &str, expires_in: Duration) -> String {
	signer.access_token("user", json!({ "id": id }), expires_in)
}

pub fn redirect_uri() -> Url {
	Url::parse("https://app.example.com/callback").expect("Redirect URI fixture should parse.")
}

/// Builds a client whose issuer is the mock server.
pub fn build_client(server: &MockServer) -> ReqwestTestClient {
	build_reqwest_test_client(&server.base_url(), CLIENT_ID)
}

/// Serves the metadata document and `jwks`, returning both mocks for call-count assertions.
pub async fn mock_discovery<'a>(
	server: &'a MockServer,
	jwks: serde_json::Value,
) -> (Mock<'a>, Mock<'a>) {
	let metadata = json!({
		"issuer": server.base_url(),
		"jwks_uri": server.url(JWKS_PATH),
		"token_endpoint": server.url("/token"),
		"authorization_endpoint": server.url("/authorize"),
	});
	let metadata_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(METADATA_PATH);
			then.status(200).json_body(metadata);
		})
		.await;
	let jwks_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(JWKS_PATH);
			then.status(200).json_body(jwks);
		})
		.await;

	(metadata_mock, jwks_mock)
}
