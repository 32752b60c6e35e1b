#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use tripit_oauth1::{
	_preludet::*,
	auth::{Credentials, TokenPair},
	flows::Broker,
	http::HttpMethod,
	provider::{
		DefaultProviderStrategy, EndpointKind, ProviderDescriptor, ProviderDescriptorBuilder,
		ProviderDescriptorError, ProviderErrorContext, ProviderErrorKind, ProviderQuirks,
		ProviderStrategy,
	},
};

fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse mock provider URL.")
}

fn builder(base: &str) -> ProviderDescriptorBuilder {
	ProviderDescriptor::builder()
		.request_token_endpoint(url(&format!("{base}/oauth/request_token")))
		.authorize_endpoint(url(&format!("{base}/oauth/authorize")))
		.access_token_endpoint(url(&format!("{base}/oauth/access_token")))
		.api_base(url(&format!("{base}/v1")))
}

#[test]
fn descriptor_rejects_insecure_remote_endpoints() {
	let err = builder("https://api.example.com")
		.authorize_endpoint(url("http://www.example.com/oauth/authorize"))
		.build()
		.expect_err("Descriptor builder should reject plain HTTP on remote hosts.");

	assert!(matches!(err, ProviderDescriptorError::InsecureEndpoint { endpoint: "authorize", .. }));
}

#[test]
fn descriptor_keeps_custom_quirks_and_verification_endpoint() {
	let quirks = ProviderQuirks { callback_in_query: false, nonce_len: 16 };
	let descriptor = builder("https://api.example.com")
		.verification_endpoint("get/profile")
		.quirks(quirks)
		.build()
		.expect("Descriptor builder should succeed for secure endpoints.");

	assert_eq!(descriptor.quirks, quirks);
	assert_eq!(descriptor.verification_endpoint, "get/profile");
	assert_eq!(
		descriptor.api_url("get/profile").expect("Endpoint should resolve.").as_str(),
		"https://api.example.com/v1/get/profile"
	);
}

#[test]
fn default_strategy_treats_auth_statuses_as_invalid_token() {
	let strategy = DefaultProviderStrategy;

	for status in [401, 403] {
		let ctx = ProviderErrorContext::new(EndpointKind::Api, status);

		assert_eq!(strategy.classify_api_error(&ctx), ProviderErrorKind::InvalidToken);
	}

	let ctx = ProviderErrorContext::new(EndpointKind::Api, 503).with_body_preview("maintenance");

	assert_eq!(strategy.classify_api_error(&ctx), ProviderErrorKind::Rejected);

	let ctx = ProviderErrorContext::new(EndpointKind::Api, 400).with_oauth_problem("token_rejected");

	assert_eq!(strategy.classify_api_error(&ctx), ProviderErrorKind::InvalidToken);
}

#[tokio::test]
async fn custom_strategy_controls_invalid_token_classification() {
	struct LenientStrategy;
	impl ProviderStrategy for LenientStrategy {
		fn classify_api_error(&self, _ctx: &ProviderErrorContext) -> ProviderErrorKind {
			ProviderErrorKind::Rejected
		}
	}

	let server = MockServer::start_async().await;
	let descriptor = builder(&server.base_url())
		.build()
		.expect("Loopback descriptor should build successfully.");
	let credentials = Credentials::new("ck", "cs").expect("Test credentials should be non-empty.");
	let broker: ReqwestTestBroker = Broker::with_http_client(
		descriptor,
		Arc::new(LenientStrategy),
		credentials,
		test_reqwest_http_client(),
	)
	.with_access_token(TokenPair::new("AT1", "ATS1"));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/list/trip");
			then.status(401).body("Unauthorized");
		})
		.await;
	let err = broker
		.dispatch(HttpMethod::Get, "list/trip", [("format", "json")])
		.await
		.expect_err("401 should still fail under a lenient strategy.");

	assert!(matches!(err, Error::Protocol(_)));
	assert!(broker.is_authenticated());

	mock.assert_async().await;
}
