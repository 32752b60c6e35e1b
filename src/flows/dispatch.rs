//! Signed API dispatcher gated on the authenticated stage.
//!
//! Every call builds a fresh parameter set from the held access token, signs it together with
//! the caller's query parameters, and returns the raw body. Calls made without an access token
//! fail with [`Error::NotAuthenticated`] before anything touches the transport. Non-2xx
//! responses go through [`ProviderStrategy`](crate::provider::ProviderStrategy) to decide
//! whether the token itself was rejected. Nothing is retried.

mod metrics;

pub use metrics::DispatchMetrics;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::ProtocolError,
	flows::{
		Broker,
		common::{self, RequestPlan},
	},
	http::{HttpMethod, HttpResponse, ProviderHttpClient},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{EndpointKind, ProviderErrorContext, ProviderErrorKind},
};

/// Query sent by [`Broker::verify_tokens`].
const VERIFY_QUERY: [(&str, &str); 1] = [("format", "json")];

impl<C> Broker<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Sends a signed request to `<api_base>/<endpoint>` and returns the raw body.
	///
	/// Query keys with the `oauth_` prefix are dropped before signing.
	pub async fn dispatch<I, K, V>(
		&self,
		method: HttpMethod,
		endpoint: &str,
		query: I,
	) -> Result<String>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.dispatch_response(method, endpoint, query).await.map(|response| response.body)
	}

	/// Like [`Broker::dispatch`], decoding the body as JSON.
	///
	/// Decoding failures report the path of the offending field.
	pub async fn dispatch_json<T, I, K, V>(
		&self,
		method: HttpMethod,
		endpoint: &str,
		query: I,
	) -> Result<T>
	where
		T: DeserializeOwned,
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let response = self.dispatch_response(method, endpoint, query).await?;
		let mut de = serde_json::Deserializer::from_str(&response.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| {
			ProtocolError::MalformedJson {
				endpoint: EndpointKind::Api,
				status: response.status,
				source,
			}
			.into()
		})
	}

	/// Issues a cheap authenticated call to check that the held access token still works.
	///
	/// A rejected token surfaces as [`Error::InvalidToken`]; the state is left as is so the
	/// caller decides when to [`reset`](Broker::reset).
	pub async fn verify_tokens(&self) -> Result<()> {
		let endpoint = self.descriptor.verification_endpoint.clone();

		self.dispatch_response(HttpMethod::Get, &endpoint, VERIFY_QUERY).await.map(|_| ())
	}

	async fn dispatch_response<I, K, V>(
		&self,
		method: HttpMethod,
		endpoint: &str,
		query: I,
	) -> Result<HttpResponse>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		const KIND: FlowKind = FlowKind::SignedRequest;

		let access_token = self.state.access_token().inspect_err(|_| {
			self.dispatch_metrics.record_rejected_locally();
		})?;
		let url = self.descriptor.api_url(endpoint).map_err(|e| {
			self.dispatch_metrics.record_rejected_locally();

			Error::from(e)
		})?;
		let params = common::filter_caller_params(query);
		let span = FlowSpan::new(KIND, "dispatch");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.dispatch_metrics.record_attempt();

		let result = span
			.instrument(async move {
				let request = self.sign_request(RequestPlan {
					method,
					url: &url,
					token: Some(&access_token),
					request_token_leg: false,
					params,
					unsigned_query: Vec::new(),
				});
				let response = self.send(request).await?;

				if response.is_success() {
					return Ok(response);
				}

				let ctx = ProviderErrorContext::from_response(EndpointKind::Api, &response);

				match self.strategy.classify_api_error(&ctx) {
					ProviderErrorKind::InvalidToken => {
						obs::record_token_rejected(response.status);

						Err(Error::InvalidToken { status: response.status, body: response.body })
					},
					ProviderErrorKind::Rejected => Err(ProtocolError::UnexpectedStatus {
						endpoint: EndpointKind::Api,
						status: response.status,
						body: response.body,
					}
					.into()),
				}
			})
			.await;

		match &result {
			Ok(_) => {
				self.dispatch_metrics.record_success();
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Err(_) => {
				self.dispatch_metrics.record_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}
}
