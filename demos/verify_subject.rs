//! Verifies a bearer token against the issuer named by `OAUTH2_ISSUER`, refreshing once if it
//! has expired.
//!
//! ```sh
//! OAUTH2_ISSUER=https://auth.example.com \
//!     cargo run --example verify_subject -- <access-token> [refresh-token]
//! ```

// crates.io
use color_eyre::{Result, eyre::eyre};
use serde::{Deserialize, Serialize};
// self
use oauth2_subject::{
	auth::SubjectSchemas,
	config::ClientConfig,
	flows::{Client, VerifyOptions},
};

#[derive(Debug, Serialize, Deserialize)]
struct User {
	id: String,
	#[serde(default)]
	email: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = std::env::args().skip(1);
	let access = args.next().ok_or_else(|| eyre!("usage: verify_subject <access> [refresh]"))?;
	let refresh = args.next();
	let client = Client::new(ClientConfig::from_env("demo-client")?);
	let schemas = SubjectSchemas::new().with_type::<User>("user");
	let mut options = VerifyOptions::default();

	if let Some(refresh) = refresh {
		options = options.with_refresh(refresh);
	}

	match client.verify(&schemas, &access, options).await? {
		Ok(verified) => {
			let user: User = verified.subject.properties_as()?;

			println!("Verified {} subject: {user:?}.", verified.subject.kind);

			if let Some(tokens) = verified.tokens {
				println!("Tokens were rotated; persist them: {tokens:?}.");
			}
		},
		Err(rejection) => eprintln!("Rejected: {rejection}"),
	}

	println!(
		"Refresh attempts: {}, rotations: {}.",
		client.refresh_metrics.attempts(),
		client.refresh_metrics.rotations()
	);

	Ok(())
}
