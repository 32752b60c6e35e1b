//! Walks through TripIt's out-of-band authorization with the default reqwest transport.
//!
//! Reads `TRIPIT_CONSUMER_KEY`/`TRIPIT_CONSUMER_SECRET` from the environment. When
//! `TRIPIT_OAUTH_TOKEN`/`TRIPIT_OAUTH_TOKEN_SECRET` are also set, the stored session is resumed
//! and only verified; otherwise the three legs run, pausing for the user to approve in a browser.

// std
use std::io::{self, BufRead, Write};
// crates.io
use color_eyre::Result;
// self
use tripit_oauth1::{config::BrokerConfig, flows::Broker, provider::ProviderDescriptor};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = BrokerConfig::from_env()?;
	let broker = Broker::from_config(ProviderDescriptor::tripit(), config)?;

	if !broker.is_authenticated() {
		let request_token = broker.acquire_request_token().await?;

		println!("Open this URL and approve access:");
		println!("{}", broker.authorization_url(&request_token.token));
		print!("Press Enter once you have approved the request token. ");
		io::stdout().flush()?;
		io::stdin().lock().read_line(&mut String::new())?;

		let access_token = broker.complete_authorization().await?;

		println!("TRIPIT_OAUTH_TOKEN={}", access_token.token);
		println!("TRIPIT_OAUTH_TOKEN_SECRET={}", access_token.secret());
	}

	match broker.verify_tokens().await {
		Ok(()) => println!("Access token verified against the TripIt API."),
		Err(e) if e.is_authorization_failure() => {
			broker.reset();

			println!("The access token was rejected; rerun without stored tokens to authorize again.");
		},
		Err(e) => return Err(e.into()),
	}

	Ok(())
}
