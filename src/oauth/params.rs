//! Per-request `oauth_*` parameter sets and `Authorization` header serialization.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	oauth::{
		HMAC_SHA1, OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY,
		OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERSION,
		OAUTH_VERSION_KEY, OOB_CALLBACK, SigningContext, percent_encode,
	},
};

/// Nonce length used unless a provider quirk overrides it.
pub const DEFAULT_NONCE_LEN: usize = 32;

/// Ordered `oauth_*` parameters for a single request.
///
/// Always carries the consumer key, nonce, signature method, timestamp, and version;
/// `oauth_token` only when a token pair is active and `oauth_callback` only on the
/// request-token leg. `oauth_signature` is added last by [`OAuthParameterSet::signed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthParameterSet(BTreeMap<String, String>);
impl OAuthParameterSet {
	/// Starts a builder for the provided consumer key.
	pub fn builder(consumer_key: impl Into<String>) -> OAuthParameterSetBuilder {
		OAuthParameterSetBuilder::new(consumer_key)
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Returns `true` when `key` is present.
	pub fn contains(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Iterates the parameters in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Returns `true` once `oauth_signature` has been attached.
	pub fn is_signed(&self) -> bool {
		self.contains(OAUTH_SIGNATURE_KEY)
	}

	/// Signs `context` together with these parameters and attaches `oauth_signature`.
	///
	/// Any signature already present is replaced; it never participates in its own
	/// computation.
	pub fn signed(mut self, context: SigningContext) -> Self {
		self.0.remove(OAUTH_SIGNATURE_KEY);

		let signature = context
			.with_params(self.0.iter().map(|(key, value)| (key.clone(), value.clone())))
			.sign();

		self.0.insert(OAUTH_SIGNATURE_KEY.into(), signature);

		self
	}

	/// Serializes the parameters as `OAuth k1="v1", k2="v2"`, sorted by key.
	pub fn authorization_header(&self) -> String {
		let entries = self
			.0
			.iter()
			.map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
			.collect::<Vec<_>>();

		format!("OAuth {}", entries.join(", "))
	}
}

/// Builder for [`OAuthParameterSet`]; nonce and timestamp are generated unless pinned.
#[derive(Clone, Debug)]
pub struct OAuthParameterSetBuilder {
	consumer_key: String,
	token: Option<String>,
	request_token_leg: bool,
	nonce: Option<String>,
	timestamp: Option<i64>,
	nonce_len: usize,
}
impl OAuthParameterSetBuilder {
	/// Creates a builder for the provided consumer key.
	pub fn new(consumer_key: impl Into<String>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			token: None,
			request_token_leg: false,
			nonce: None,
			timestamp: None,
			nonce_len: DEFAULT_NONCE_LEN,
		}
	}

	/// Sets the active token; blank tokens are treated as absent.
	pub fn token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(token.into()).filter(|value| !value.trim().is_empty());

		self
	}

	/// Marks the set as belonging to the request-token leg, which adds `oauth_callback=oob`
	/// when no token is held.
	pub fn request_token_leg(mut self, request_token_leg: bool) -> Self {
		self.request_token_leg = request_token_leg;

		self
	}

	/// Pins the nonce instead of generating one.
	pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
		self.nonce = Some(nonce.into());

		self
	}

	/// Pins the timestamp (seconds since the Unix epoch) instead of reading the clock.
	pub fn timestamp(mut self, timestamp: i64) -> Self {
		self.timestamp = Some(timestamp);

		self
	}

	/// Overrides the generated nonce length.
	pub fn nonce_len(mut self, nonce_len: usize) -> Self {
		self.nonce_len = nonce_len;

		self
	}

	/// Finalizes the parameter set.
	pub fn build(self) -> OAuthParameterSet {
		let nonce = self.nonce.unwrap_or_else(|| generate_nonce(self.nonce_len));
		let timestamp =
			self.timestamp.unwrap_or_else(|| OffsetDateTime::now_utc().unix_timestamp());
		let mut params = BTreeMap::new();

		params.insert(OAUTH_CONSUMER_KEY.into(), self.consumer_key);
		params.insert(OAUTH_NONCE_KEY.into(), nonce);
		params.insert(OAUTH_SIGNATURE_METHOD_KEY.into(), HMAC_SHA1.into());
		params.insert(OAUTH_TIMESTAMP_KEY.into(), timestamp.to_string());
		params.insert(OAUTH_VERSION_KEY.into(), OAUTH_VERSION.into());

		match self.token {
			Some(token) => {
				params.insert(OAUTH_TOKEN_KEY.into(), token);
			},
			None if self.request_token_leg => {
				params.insert(OAUTH_CALLBACK_KEY.into(), OOB_CALLBACK.into());
			},
			None => {},
		}

		OAuthParameterSet(params)
	}
}

/// Generates an alphanumeric nonce of `len` characters.
pub fn generate_nonce(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;
	use crate::http::HttpMethod;

	fn request_token_url() -> Url {
		Url::parse("https://api.tripit.com/oauth/request_token").expect("Fixture URL should parse.")
	}

	#[test]
	fn request_token_leg_includes_callback_without_token() {
		let params = OAuthParameterSet::builder("key").request_token_leg(true).build();

		assert_eq!(params.get(OAUTH_CALLBACK_KEY), Some("oob"));
		assert!(!params.contains(OAUTH_TOKEN_KEY));
		assert_eq!(params.get(OAUTH_SIGNATURE_METHOD_KEY), Some("HMAC-SHA1"));
		assert_eq!(params.get(OAUTH_VERSION_KEY), Some("1.0"));
		assert_eq!(params.get(OAUTH_NONCE_KEY).map(str::len), Some(DEFAULT_NONCE_LEN));
		assert!(!params.is_signed());
	}

	#[test]
	fn token_suppresses_callback_and_blank_token_is_ignored() {
		let with_token = OAuthParameterSet::builder("key").token("RT1").request_token_leg(true).build();

		assert_eq!(with_token.get(OAUTH_TOKEN_KEY), Some("RT1"));
		assert!(!with_token.contains(OAUTH_CALLBACK_KEY));

		let blank = OAuthParameterSet::builder("key").token("  ").build();

		assert!(!blank.contains(OAUTH_TOKEN_KEY));
		assert!(!blank.contains(OAUTH_CALLBACK_KEY));
	}

	#[test]
	fn timestamp_tracks_wall_clock() {
		let before = OffsetDateTime::now_utc().unix_timestamp();
		let params = OAuthParameterSet::builder("key").build();
		let after = OffsetDateTime::now_utc().unix_timestamp();
		let stamped = params
			.get(OAUTH_TIMESTAMP_KEY)
			.and_then(|value| value.parse::<i64>().ok())
			.expect("Timestamp should be numeric.");

		assert!((before..=after).contains(&stamped));
	}

	#[test]
	fn nonces_are_alphanumeric_and_unique() {
		let nonces = (0..256).map(|_| generate_nonce(DEFAULT_NONCE_LEN)).collect::<HashSet<_>>();

		assert_eq!(nonces.len(), 256);
		assert!(nonces.iter().all(|nonce| nonce.chars().all(|c| c.is_ascii_alphanumeric())));
	}

	#[test]
	fn signed_set_matches_golden_header() {
		let params = OAuthParameterSet::builder("tripit-consumer-key")
			.request_token_leg(true)
			.nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
			.timestamp(1_318_622_958)
			.build()
			.signed(SigningContext::new(
				HttpMethod::Get,
				&request_token_url(),
				"tripit-consumer-secret",
			));

		assert!(params.is_signed());
		assert_eq!(
			params.authorization_header(),
			"OAuth oauth_callback=\"oob\", oauth_consumer_key=\"tripit-consumer-key\", \
			 oauth_nonce=\"kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg\", \
			 oauth_signature=\"4QZTz%2Balimz%2FOiISB1rYu%2FH44aA%3D\", \
			 oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1318622958\", \
			 oauth_version=\"1.0\""
		);
	}

	#[test]
	fn resigning_replaces_previous_signature() {
		let context =
			SigningContext::new(HttpMethod::Get, &request_token_url(), "tripit-consumer-secret");
		let params = OAuthParameterSet::builder("tripit-consumer-key")
			.request_token_leg(true)
			.nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
			.timestamp(1_318_622_958)
			.build();
		let once = params.clone().signed(context.clone());
		let twice = once.clone().signed(context);

		assert_eq!(once, twice);
	}

	#[test]
	fn header_values_keep_tilde_literal() {
		let params = OAuthParameterSet::builder("key~with space").nonce("n").timestamp(1).build();

		assert!(params.authorization_header().contains("oauth_consumer_key=\"key~with%20space\""));
	}
}
