//! Provider descriptor data structures shared by all legs and the dispatcher.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Endpoint labels used in errors, spans, and metrics.
pub mod endpoint;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use endpoint::*;
pub use quirks::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// TripIt request-token endpoint.
pub const TRIPIT_REQUEST_TOKEN_URL: &str = "https://api.tripit.com/oauth/request_token";
/// TripIt user authorization page.
pub const TRIPIT_AUTHORIZE_URL: &str = "https://www.tripit.com/oauth/authorize";
/// TripIt access-token endpoint.
pub const TRIPIT_ACCESS_TOKEN_URL: &str = "https://api.tripit.com/oauth/access_token";
/// TripIt v1 API base.
pub const TRIPIT_API_BASE_URL: &str = "https://api.tripit.com/v1";
/// Cheap authenticated endpoint used to verify an access token.
pub const TRIPIT_VERIFICATION_ENDPOINT: &str = "list/trip";

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Leg 1: unauthorized request token.
	pub request_token: Url,
	/// Leg 2: page the user visits to approve the request token.
	pub authorize: Url,
	/// Leg 3: request-token to access-token exchange.
	pub access_token: Url,
	/// Base URL that signed API endpoints are joined onto.
	pub api_base: Url,
}

/// Immutable provider descriptor consumed by the broker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// API endpoint (relative to `api_base`) used by token verification.
	pub verification_endpoint: String,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new, empty builder.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new()
	}

	/// Production TripIt descriptor.
	pub fn tripit() -> Self {
		let parse = |raw: &str| Url::parse(raw).unwrap_or_else(|e| unreachable!("{raw}: {e}"));

		Self {
			endpoints: ProviderEndpoints {
				request_token: parse(TRIPIT_REQUEST_TOKEN_URL),
				authorize: parse(TRIPIT_AUTHORIZE_URL),
				access_token: parse(TRIPIT_ACCESS_TOKEN_URL),
				api_base: parse(TRIPIT_API_BASE_URL),
			},
			verification_endpoint: TRIPIT_VERIFICATION_ENDPOINT.into(),
			quirks: ProviderQuirks::default(),
		}
	}

	/// Resolves `endpoint` against the API base.
	///
	/// Leading slashes on `endpoint` and trailing slashes on the base are collapsed, so
	/// `list/trip` and `/list/trip` both resolve to `<api_base>/list/trip`. Absolute URLs are
	/// rejected because they would escape the provider. Endpoints carrying `?` or `#` are
	/// rejected too; query pairs belong in the signed parameter list.
	pub fn api_url(&self, endpoint: &str) -> Result<Url, ConfigError> {
		let invalid = |source| ConfigError::InvalidEndpoint { endpoint: endpoint.into(), source };

		if Url::parse(endpoint).is_ok() {
			return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
		}

		if endpoint.contains(['?', '#']) {
			return Err(ConfigError::EndpointWithQuery { endpoint: endpoint.into() });
		}

		let base = self.endpoints.api_base.as_str().trim_end_matches('/');
		let path = endpoint.trim_start_matches('/');

		Url::parse(&format!("{base}/{path}")).map_err(invalid)
	}

	/// URL for the given exchange endpoint; `None` for [`EndpointKind::Api`].
	pub fn endpoint(&self, kind: EndpointKind) -> Option<&Url> {
		match kind {
			EndpointKind::RequestToken => Some(&self.endpoints.request_token),
			EndpointKind::Authorize => Some(&self.endpoints.authorize),
			EndpointKind::AccessToken => Some(&self.endpoints.access_token),
			EndpointKind::Api => None,
		}
	}
}
