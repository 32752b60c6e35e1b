//! Broker configuration gathered from the process environment or any key lookup.

// std
use std::time::Duration;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenPair},
	error::ConfigError,
};

/// Consumer key issued by TripIt.
pub const ENV_CONSUMER_KEY: &str = "TRIPIT_CONSUMER_KEY";
/// Consumer secret issued by TripIt.
pub const ENV_CONSUMER_SECRET: &str = "TRIPIT_CONSUMER_SECRET";
/// Previously issued access token.
pub const ENV_OAUTH_TOKEN: &str = "TRIPIT_OAUTH_TOKEN";
/// Secret paired with [`ENV_OAUTH_TOKEN`].
pub const ENV_OAUTH_TOKEN_SECRET: &str = "TRIPIT_OAUTH_TOKEN_SECRET";
/// Request timeout in whole seconds.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "TRIPIT_HTTP_TIMEOUT_SECS";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpConfig {
	/// Per-request timeout.
	pub timeout: Duration,
	/// `User-Agent` sent with every request.
	pub user_agent: String,
}
impl Default for HttpConfig {
	fn default() -> Self {
		Self {
			timeout: DEFAULT_TIMEOUT,
			user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
		}
	}
}

/// Everything needed to construct a broker.
#[derive(Clone, Debug)]
pub struct BrokerConfig {
	/// Consumer credentials.
	pub credentials: Credentials,
	/// Access token to resume, when one was stored earlier.
	pub access_token: Option<TokenPair>,
	/// Transport settings.
	pub http: HttpConfig,
}
impl BrokerConfig {
	/// Creates a configuration with default transport settings and no stored access token.
	pub fn new(credentials: Credentials) -> Self {
		Self { credentials, access_token: None, http: HttpConfig::default() }
	}

	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the configuration through `lookup`, which maps a variable name to its value.
	///
	/// Blank values count as unset. The access-token pair must be supplied whole or not at all.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
		let consumer_key =
			read(ENV_CONSUMER_KEY).ok_or(ConfigError::MissingEnv { name: ENV_CONSUMER_KEY })?;
		let consumer_secret = read(ENV_CONSUMER_SECRET)
			.ok_or(ConfigError::MissingEnv { name: ENV_CONSUMER_SECRET })?;
		let credentials = Credentials::new(consumer_key, consumer_secret)?;
		let access_token =
			TokenPair::from_parts(read(ENV_OAUTH_TOKEN), read(ENV_OAUTH_TOKEN_SECRET))?;
		let mut http = HttpConfig::default();

		if let Some(raw) = read(ENV_HTTP_TIMEOUT_SECS) {
			let secs = raw
				.trim()
				.parse::<u64>()
				.ok()
				.filter(|secs| *secs > 0)
				.ok_or(ConfigError::InvalidEnv { name: ENV_HTTP_TIMEOUT_SECS, value: raw })?;

			http.timeout = Duration::from_secs(secs);
		}

		Ok(Self { credentials, access_token, http })
	}

	/// Attaches a stored access token.
	pub fn with_access_token(mut self, access_token: TokenPair) -> Self {
		self.access_token = Some(access_token);

		self
	}

	/// Overrides the transport settings.
	pub fn with_http(mut self, http: HttpConfig) -> Self {
		self.http = http;

		self
	}
}
