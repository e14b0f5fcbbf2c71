#![cfg(all(feature = "reqwest", feature = "test"))]

mod support;

// crates.io
use httpmock::prelude::*;
use oauth2_subject::{_preludet::*, error::ClientError, flows::RefreshOptions};
use serde_json::json;
// self
use support::*;

const REFRESH_BODY: &str = "grant_type=refresh_token&refresh_token=refresh-1";

#[tokio::test]
async fn fresh_access_tokens_skip_the_network() {
	let server = MockServer::start_async().await;
	let signer = TestSigner::new(server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).json_body(json!({ "access_token": "unused" }));
		})
		.await;
	let client = build_client(&server);
	let access = user_token(&signer, "u-1", Duration::minutes(10));
	let outcome = client
		.refresh("refresh-1", RefreshOptions::default().with_access(access))
		.await
		.expect("Fast path should not fault.")
		.expect("Fast path should succeed.");

	assert!(outcome.is_none());
	mock.assert_calls_async(0).await;
	assert_eq!(client.refresh_metrics.skipped(), 1);
}

#[tokio::test]
async fn near_expiry_tokens_are_refreshed_once() {
	let server = MockServer::start_async().await;
	let signer = TestSigner::new(server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.body(REFRESH_BODY);
			then.status(200).json_body(json!({
				"access_token": "access-2",
				"refresh_token": "refresh-2",
				"expires_in": 900,
			}));
		})
		.await;
	let client = build_client(&server);
	let access = user_token(&signer, "u-1", Duration::seconds(10));
	let tokens = client
		.refresh("refresh-1", RefreshOptions::default().with_access(access))
		.await
		.expect("Refresh should not fault.")
		.expect("Refresh should succeed.")
		.expect("Near-expiry token should be replaced.");

	mock.assert_calls_async(1).await;

	assert_eq!(tokens.access.expose(), "access-2");
	assert_eq!(tokens.refresh.expose(), "refresh-2");
	assert_eq!(client.refresh_metrics.rotations(), 1);
}

#[tokio::test]
async fn without_an_access_token_the_grant_always_runs() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token").body(REFRESH_BODY);
			then.status(200).json_body(json!({ "access_token": "access-2" }));
		})
		.await;
	let tokens = build_client(&server)
		.refresh("refresh-1", RefreshOptions::default())
		.await
		.expect("Refresh should not fault.")
		.expect("Refresh should succeed.")
		.expect("Grant should return tokens.");

	mock.assert_calls_async(1).await;

	assert_eq!(tokens.access.expose(), "access-2");
	// Issuer did not rotate; the presented refresh token is carried forward.
	assert_eq!(tokens.refresh.expose(), "refresh-1");
}

#[tokio::test]
async fn undecodable_access_tokens_are_rejected_without_a_call() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).json_body(json!({ "access_token": "unused" }));
		})
		.await;
	let outcome = build_client(&server)
		.refresh("refresh-1", RefreshOptions::default().with_access("not-a-jwt"))
		.await
		.expect("Decode failure should not fault.");

	assert!(matches!(outcome, Err(ClientError::InvalidAccessToken { .. })));
	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn rejected_refresh_tokens_are_tagged_with_the_status() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(401).json_body(json!({ "error": "invalid_grant" }));
		})
		.await;

	let client = build_client(&server);
	let outcome = client
		.refresh("revoked", RefreshOptions::default())
		.await
		.expect("Rejected refresh should not fault.");

	assert!(matches!(outcome, Err(ClientError::InvalidRefreshToken { status: 401 })));
	assert_eq!(client.refresh_metrics.rejections(), 1);
	assert_eq!(client.refresh_metrics.attempts(), 1);
}
