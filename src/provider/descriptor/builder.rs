// self
use crate::{
	_prelude::*,
	provider::{
		MIN_NONCE_LEN, ProviderDescriptor, ProviderEndpoints, ProviderQuirks,
		TRIPIT_VERIFICATION_ENDPOINT,
	},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// A required endpoint was not supplied.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Exchange endpoints must not carry their own query or fragment.
	#[error("The {endpoint} endpoint must not contain a query or fragment: {url}.")]
	UnexpectedQuery {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The verification endpoint must be a non-empty relative path.
	#[error("Verification endpoint must be a non-empty relative path.")]
	InvalidVerificationEndpoint,
	/// Nonces shorter than the minimum are rejected.
	#[error("Nonce length {len} is below the minimum of {min}.")]
	NonceTooShort {
		/// Requested length.
		len: usize,
		/// Minimum accepted length.
		min: usize,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Leg 1 endpoint.
	pub request_token_endpoint: Option<Url>,
	/// Leg 2 endpoint.
	pub authorize_endpoint: Option<Url>,
	/// Leg 3 endpoint.
	pub access_token_endpoint: Option<Url>,
	/// API base URL.
	pub api_base: Option<Url>,
	/// Token verification endpoint relative to the API base.
	pub verification_endpoint: String,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a builder with no endpoints and default quirks.
	pub fn new() -> Self {
		Self {
			request_token_endpoint: None,
			authorize_endpoint: None,
			access_token_endpoint: None,
			api_base: None,
			verification_endpoint: TRIPIT_VERIFICATION_ENDPOINT.into(),
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the request-token endpoint.
	pub fn request_token_endpoint(mut self, url: Url) -> Self {
		self.request_token_endpoint = Some(url);

		self
	}

	/// Sets the authorize endpoint.
	pub fn authorize_endpoint(mut self, url: Url) -> Self {
		self.authorize_endpoint = Some(url);

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token_endpoint = Some(url);

		self
	}

	/// Sets the API base URL.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Overrides the token verification endpoint.
	pub fn verification_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.verification_endpoint = endpoint.into();

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let missing = |endpoint| ProviderDescriptorError::MissingEndpoint { endpoint };
		let request_token = self.request_token_endpoint.ok_or(missing("request_token"))?;
		let authorize = self.authorize_endpoint.ok_or(missing("authorize"))?;
		let access_token = self.access_token_endpoint.ok_or(missing("access_token"))?;
		let api_base = self.api_base.ok_or(missing("api_base"))?;
		let descriptor = ProviderDescriptor {
			endpoints: ProviderEndpoints { request_token, authorize, access_token, api_base },
			verification_endpoint: self.verification_endpoint,
			quirks: self.quirks,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}
impl Default for ProviderDescriptorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		let endpoints = &self.endpoints;

		validate_endpoint("request_token", &endpoints.request_token)?;
		validate_endpoint("authorize", &endpoints.authorize)?;
		validate_endpoint("access_token", &endpoints.access_token)?;
		validate_endpoint("api_base", &endpoints.api_base)?;

		let verification = self.verification_endpoint.trim();

		if verification.trim_start_matches('/').is_empty() || Url::parse(verification).is_ok() {
			return Err(ProviderDescriptorError::InvalidVerificationEndpoint);
		}
		if self.quirks.nonce_len < MIN_NONCE_LEN {
			return Err(ProviderDescriptorError::NonceTooShort {
				len: self.quirks.nonce_len,
				min: MIN_NONCE_LEN,
			});
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() != "https" && !is_loopback(url) {
		return Err(ProviderDescriptorError::InsecureEndpoint {
			endpoint: name,
			url: url.to_string(),
		});
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ProviderDescriptorError::UnexpectedQuery {
			endpoint: name,
			url: url.to_string(),
		});
	}

	Ok(())
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(raw: &str) -> Url {
		Url::parse(raw).expect("Fixture URL should parse.")
	}

	fn complete(base: &str) -> ProviderDescriptorBuilder {
		ProviderDescriptor::builder()
			.request_token_endpoint(url(&format!("{base}/oauth/request_token")))
			.authorize_endpoint(url(&format!("{base}/oauth/authorize")))
			.access_token_endpoint(url(&format!("{base}/oauth/access_token")))
			.api_base(url(&format!("{base}/v1")))
	}

	#[test]
	fn builder_requires_every_endpoint() {
		let err = ProviderDescriptor::builder()
			.request_token_endpoint(url("https://api.tripit.com/oauth/request_token"))
			.build()
			.expect_err("Missing endpoints must be rejected.");

		assert_eq!(err, ProviderDescriptorError::MissingEndpoint { endpoint: "authorize" });
	}

	#[test]
	fn plain_http_is_only_allowed_on_loopback() {
		assert!(complete("http://127.0.0.1:8080").build().is_ok());
		assert!(complete("http://localhost:8080").build().is_ok());

		let err = complete("http://api.tripit.com").build().expect_err("Remote HTTP must fail.");

		assert!(matches!(
			err,
			ProviderDescriptorError::InsecureEndpoint { endpoint: "request_token", .. }
		));
	}

	#[test]
	fn endpoints_with_query_are_rejected() {
		let err = complete("https://api.tripit.com")
			.access_token_endpoint(url("https://api.tripit.com/oauth/access_token?x=1"))
			.build()
			.expect_err("Query strings on exchange endpoints must be rejected.");

		assert!(matches!(
			err,
			ProviderDescriptorError::UnexpectedQuery { endpoint: "access_token", .. }
		));
	}

	#[test]
	fn short_nonces_and_blank_verification_are_rejected() {
		let err = complete("https://api.tripit.com")
			.quirks(ProviderQuirks { nonce_len: 4, ..Default::default() })
			.build()
			.expect_err("Short nonces must be rejected.");

		assert_eq!(err, ProviderDescriptorError::NonceTooShort { len: 4, min: MIN_NONCE_LEN });

		let err = complete("https://api.tripit.com")
			.verification_endpoint("/")
			.build()
			.expect_err("Blank verification endpoints must be rejected.");

		assert_eq!(err, ProviderDescriptorError::InvalidVerificationEndpoint);
	}

	#[test]
	fn built_descriptor_matches_tripit_defaults() {
		let built = complete("https://api.tripit.com")
			.authorize_endpoint(url("https://www.tripit.com/oauth/authorize"))
			.build()
			.expect("Production endpoints should validate.");

		assert_eq!(built, ProviderDescriptor::tripit());
	}
}
