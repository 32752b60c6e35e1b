//! Shared helpers for flow implementations (signing, token-response parsing, parameter hygiene).

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	error::{ProtocolError, TransportError},
	flows::Broker,
	http::{HttpMethod, HttpResponse, ProviderHttpClient, SignedRequest},
	oauth::{
		OAUTH_KEY_PREFIX, OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY, OAuthParameterSet,
		SigningContext,
	},
	provider::EndpointKind,
};

/// Inputs for one signed request.
#[derive(Clone, Debug)]
pub(crate) struct RequestPlan<'a> {
	pub method: HttpMethod,
	pub url: &'a Url,
	/// Token whose secret joins the signing key; also sent as `oauth_token`.
	pub token: Option<&'a TokenPair>,
	/// Adds `oauth_callback=oob` when no token is held.
	pub request_token_leg: bool,
	/// Query pairs that participate in the signature and are sent on the wire.
	pub params: Vec<(String, String)>,
	/// Query pairs sent on the wire without being signed a second time.
	pub unsigned_query: Vec<(String, String)>,
}

impl<C> Broker<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Builds a fresh parameter set, signs it, and packages the wire request.
	pub(crate) fn sign_request(&self, plan: RequestPlan<'_>) -> SignedRequest {
		let mut builder = OAuthParameterSet::builder(self.credentials.consumer_key())
			.nonce_len(self.descriptor.quirks.nonce_len)
			.request_token_leg(plan.request_token_leg);
		let mut context =
			SigningContext::new(plan.method, plan.url, self.credentials.consumer_secret())
				.with_params(plan.params.iter().cloned());

		if let Some(token) = plan.token {
			builder = builder.token(token.token.as_str());
			context = context.with_token_secret(token.secret());
		}

		let url = context.url().clone();
		let oauth = builder.build().signed(context);
		let mut query = plan.params;

		query.extend(plan.unsigned_query);

		SignedRequest {
			method: plan.method,
			url,
			query,
			authorization: oauth.authorization_header(),
		}
	}

	/// Executes a signed request on the configured transport.
	pub(crate) async fn send(&self, request: SignedRequest) -> Result<HttpResponse, TransportError> {
		self.http_client.execute(request).await
	}
}

/// Parses a URL-encoded token response (`oauth_token=..&oauth_token_secret=..`).
///
/// Non-2xx statuses, blank bodies, and bodies missing either key (or carrying a blank value
/// for one) are protocol errors carrying the status and raw body.
pub fn parse_token_response(
	endpoint: EndpointKind,
	response: &HttpResponse,
) -> Result<TokenPair, ProtocolError> {
	let status = response.status;

	if !response.is_success() {
		return Err(ProtocolError::UnexpectedStatus {
			endpoint,
			status,
			body: response.body.clone(),
		});
	}
	if response.is_blank() {
		return Err(ProtocolError::EmptyBody { endpoint, status });
	}

	let fields = url::form_urlencoded::parse(response.body.trim().as_bytes())
		.filter(|(_, value)| !value.trim().is_empty())
		.collect::<HashMap<_, _>>();
	let field = |key: &'static str| {
		fields.get(key).map(|value| value.to_string()).ok_or_else(|| ProtocolError::MissingKey {
			endpoint,
			key,
			status,
			body: response.body.clone(),
		})
	};
	let token = field(OAUTH_TOKEN_KEY)?;
	let token_secret = field(OAUTH_TOKEN_SECRET_KEY)?;

	Ok(TokenPair::new(token, token_secret))
}

/// Drops caller-supplied parameters that would collide with protocol parameters.
///
/// Every key with the `oauth_` prefix is removed, which is how the access-token leg guarantees
/// an `oauth_verifier` never reaches the wire.
pub fn filter_caller_params<I, K, V>(params: I) -> Vec<(String, String)>
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<String>,
{
	params
		.into_iter()
		.map(|(key, value)| (key.into(), value.into()))
		.filter(|(key, _)| !key.starts_with(OAUTH_KEY_PREFIX))
		.collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_token_pair_ignoring_extra_fields() {
		let response = HttpResponse::new(
			200,
			"oauth_token=RT1&oauth_token_secret=RTS1&oauth_callback_confirmed=true\n",
		);
		let pair = parse_token_response(EndpointKind::RequestToken, &response)
			.expect("Well-formed body should parse.");

		assert_eq!(pair, TokenPair::new("RT1", "RTS1"));
	}

	#[test]
	fn decodes_percent_encoded_values() {
		let response = HttpResponse::new(200, "oauth_token=a%2Bb&oauth_token_secret=c%3Dd");
		let pair = parse_token_response(EndpointKind::AccessToken, &response)
			.expect("Encoded body should parse.");

		assert_eq!(pair.token, "a+b");
		assert_eq!(pair.secret(), "c=d");
	}

	#[test]
	fn rejects_bad_status_blank_body_and_missing_keys() {
		let err = parse_token_response(EndpointKind::RequestToken, &HttpResponse::new(401, "nope"))
			.expect_err("Non-2xx must fail.");

		assert!(matches!(err, ProtocolError::UnexpectedStatus { status: 401, .. }));
		assert_eq!(err.body(), Some("nope"));

		let err = parse_token_response(EndpointKind::RequestToken, &HttpResponse::new(200, "  "))
			.expect_err("Blank body must fail.");

		assert!(matches!(err, ProtocolError::EmptyBody { status: 200, .. }));

		let err = parse_token_response(
			EndpointKind::AccessToken,
			&HttpResponse::new(200, "oauth_token=AT1&oauth_token_secret="),
		)
		.expect_err("Blank secret must fail.");

		assert!(matches!(
			err,
			ProtocolError::MissingKey {
				key: "oauth_token_secret",
				endpoint: EndpointKind::AccessToken,
				..
			}
		));
	}

	#[test]
	fn caller_params_lose_oauth_prefixed_keys() {
		let filtered = filter_caller_params([
			("oauth_verifier", "123"),
			("format", "json"),
			("oauth_token", "spoof"),
			("page_num", "2"),
		]);

		assert_eq!(
			filtered,
			vec![("format".to_string(), "json".to_string()), ("page_num".into(), "2".into())]
		);
	}
}
