//! Walks through building an authorization-code + PKCE request and persisting the challenge for
//! the redirect handler, which later passes the verifier to `Client::exchange`.

// std
use std::collections::HashMap;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_subject::{
	config::ClientConfig,
	flows::{AuthorizeOptions, Challenge, Client, ResponseType},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::builder("demo-client").issuer("https://auth.example.com").build()?;
	let client = Client::new(config);
	let redirect_uri = Url::parse("https://app.example.com/oauth/callback")?;
	let issued = client.authorize(
		&redirect_uri,
		ResponseType::Code,
		AuthorizeOptions::default().with_pkce().with_provider("github"),
	);

	println!("Send your user to {}.", &issued.url);

	// Persist the challenge (a cookie or session row in practice) keyed by `state`.
	let mut stash: HashMap<String, String> = HashMap::new();

	stash.insert(issued.challenge.state.clone(), serde_json::to_string(&issued.challenge)?);

	// Simulate the redirect handler receiving `?code=...&state=...`.
	let returned_state = issued.challenge.state.clone();

	match stash.remove(&returned_state) {
		Some(raw) => {
			let challenge: Challenge = serde_json::from_str(&raw)?;

			if !challenge.matches_state(&returned_state) {
				eprintln!("State `{returned_state}` does not match the stored challenge.");

				return Ok(());
			}

			println!(
				"Validated state; call Client::exchange(code, redirect_uri, {:?}) next.",
				challenge.verifier.as_ref().map(|_| "<verifier>")
			);
		},
		None => eprintln!("State `{returned_state}` was not recognized."),
	}

	Ok(())
}
