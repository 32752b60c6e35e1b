//! HMAC-SHA1 signature computation over the OAuth 1.0a signature base string.
//!
//! The algorithm is byte-exact because the provider rejects any mismatch:
//!
//! 1. percent-encode every parameter key and value independently (RFC 3986);
//! 2. sort the encoded pairs by key, then by value;
//! 3. join them as `key=value` with `&` to form the parameter string;
//! 4. base string = `UPPER(method)&enc(url)&enc(parameter string)`;
//! 5. signing key = `enc(consumer_secret)&enc(token_secret)`, keeping the `&` when no token
//!    secret exists;
//! 6. signature = base64(HMAC-SHA1(signing key, base string)).
//!
//! `oauth_signature` itself never participates, and the URL is signed without its query
//! string; query parameters must be supplied as signing parameters instead.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	http::HttpMethod,
	oauth::{OAUTH_SIGNATURE_KEY, percent_encode},
};

type HmacSha1 = Hmac<Sha1>;

/// Everything that participates in one signature: method, base URL, parameters, and secrets.
#[derive(Clone)]
pub struct SigningContext {
	method: HttpMethod,
	url: Url,
	params: Vec<(String, String)>,
	consumer_secret: TokenSecret,
	token_secret: Option<TokenSecret>,
}
impl SigningContext {
	/// Creates a context for `url`, dropping its query string and fragment.
	pub fn new(method: HttpMethod, url: &Url, consumer_secret: &str) -> Self {
		Self {
			method,
			url: strip_query(url),
			params: Vec::new(),
			consumer_secret: TokenSecret::new(consumer_secret),
			token_secret: None,
		}
	}

	/// Sets the token secret appended to the signing key.
	pub fn with_token_secret(mut self, token_secret: &str) -> Self {
		self.token_secret = Some(TokenSecret::new(token_secret));

		self
	}

	/// Adds a single signing parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((key.into(), value.into()));

		self
	}

	/// Adds every pair yielded by `params`.
	pub fn with_params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.params.extend(params.into_iter().map(|(key, value)| (key.into(), value.into())));

		self
	}

	/// HTTP method being signed.
	pub fn method(&self) -> HttpMethod {
		self.method
	}

	/// Base URL (without query string) being signed.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Canonical base string for this context.
	pub fn signature_base_string(&self) -> String {
		signature_base_string(self.method.as_str(), self.url.as_str(), &self.params)
	}

	/// Signing key for this context.
	pub fn signing_key(&self) -> String {
		signing_key(
			self.consumer_secret.expose(),
			self.token_secret.as_ref().map(TokenSecret::expose),
		)
	}

	/// Computes the base64 HMAC-SHA1 signature.
	pub fn sign(&self) -> String {
		hmac_sha1_base64(&self.signing_key(), &self.signature_base_string())
	}
}
impl Debug for SigningContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SigningContext")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("params", &self.params)
			.field("token_secret_set", &self.token_secret.is_some())
			.finish()
	}
}

/// Computes the OAuth signature for the provided request material.
pub fn sign<K, V>(
	method: &str,
	url: &str,
	params: &[(K, V)],
	consumer_secret: &str,
	token_secret: Option<&str>,
) -> String
where
	K: AsRef<str>,
	V: AsRef<str>,
{
	hmac_sha1_base64(
		&signing_key(consumer_secret, token_secret),
		&signature_base_string(method, url, params),
	)
}

/// Builds `UPPER(method)&enc(url)&enc(normalized parameters)`.
pub fn signature_base_string<K, V>(method: &str, url: &str, params: &[(K, V)]) -> String
where
	K: AsRef<str>,
	V: AsRef<str>,
{
	format!(
		"{}&{}&{}",
		method.to_ascii_uppercase(),
		percent_encode(url),
		percent_encode(&normalized_parameters(params))
	)
}

/// Builds `enc(consumer_secret)&enc(token_secret)`; the separator is always present.
pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
	format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret.unwrap_or("")))
}

/// Encodes, sorts, and joins the signing parameters, skipping `oauth_signature`.
pub fn normalized_parameters<K, V>(params: &[(K, V)]) -> String
where
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut encoded = params
		.iter()
		.filter(|(key, _)| key.as_ref() != OAUTH_SIGNATURE_KEY)
		.map(|(key, value)| (percent_encode(key.as_ref()), percent_encode(value.as_ref())))
		.collect::<Vec<_>>();

	encoded.sort();

	encoded.into_iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("&")
}

fn hmac_sha1_base64(key: &str, message: &str) -> String {
	let mut mac = match HmacSha1::new_from_slice(key.as_bytes()) {
		Ok(mac) => mac,
		Err(_) => unreachable!("HMAC accepts keys of any length"),
	};

	mac.update(message.as_bytes());

	STANDARD.encode(mac.finalize().into_bytes())
}

fn strip_query(url: &Url) -> Url {
	let mut base = url.clone();

	base.set_query(None);
	base.set_fragment(None);

	base
}
