//! Consumer credentials identifying the calling application.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Consumer key and secret issued to the application by the provider.
///
/// Values are validated once at construction and never mutated afterwards, so an empty
/// key or secret fails fast before any network attempt.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCredentials")]
pub struct Credentials {
	consumer_key: String,
	consumer_secret: TokenSecret,
}
impl Credentials {
	/// Creates credentials after rejecting empty or whitespace-only values.
	pub fn new(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let consumer_key = consumer_key.into();
		let consumer_secret = TokenSecret::new(consumer_secret);

		if consumer_key.trim().is_empty() {
			return Err(ConfigError::EmptyCredential { field: "consumer key" });
		}
		if consumer_secret.is_blank() {
			return Err(ConfigError::EmptyCredential { field: "consumer secret" });
		}

		Ok(Self { consumer_key, consumer_secret })
	}

	/// Consumer key sent as `oauth_consumer_key`.
	pub fn consumer_key(&self) -> &str {
		&self.consumer_key
	}

	/// Consumer secret used as the first half of every signing key.
	pub fn consumer_secret(&self) -> &str {
		self.consumer_secret.expose()
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("consumer_key", &self.consumer_key)
			.field("consumer_secret", &self.consumer_secret)
			.finish()
	}
}
impl TryFrom<RawCredentials> for Credentials {
	type Error = ConfigError;

	fn try_from(raw: RawCredentials) -> Result<Self, Self::Error> {
		Self::new(raw.consumer_key, raw.consumer_secret.expose())
	}
}

#[derive(Deserialize)]
struct RawCredentials {
	consumer_key: String,
	consumer_secret: TokenSecret,
}
