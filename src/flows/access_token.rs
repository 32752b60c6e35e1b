//! Leg 3: exchange the approved request token for an access token.
//!
//! The request carries `oauth_token=<request token>` and is signed with the consumer secret
//! plus the request-token secret. TripIt's out-of-band mode has no verifier, so none is ever
//! sent, even when a caller passes one as an extra parameter.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	flows::{
		Broker,
		common::{self, RequestPlan},
	},
	http::{HttpMethod, ProviderHttpClient},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::EndpointKind,
};

const EXCHANGE_ACTION: &str = "exchange the request token";

impl<C> Broker<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Exchanges the pending request token once the user reports approval.
	pub async fn complete_authorization(&self) -> Result<TokenPair> {
		let request_token = self.state.pending_request_token().ok_or_else(|| {
			Error::InvalidTransition { stage: self.state.stage(), action: EXCHANGE_ACTION }
		})?;

		self.exchange_for_access_token(&request_token).await
	}

	/// Exchanges `request_token` for an access token and moves the broker to `Authenticated`.
	///
	/// `request_token` must be the pair currently awaiting approval; anything else is refused
	/// locally. On failure the broker stays in `AwaitingUserAuthorization`.
	pub async fn exchange_for_access_token(&self, request_token: &TokenPair) -> Result<TokenPair> {
		self.exchange_for_access_token_with_params(request_token, Vec::<(String, String)>::new())
			.await
	}

	/// Same as [`Broker::exchange_for_access_token`] with extra signed query parameters.
	///
	/// Parameters whose key starts with `oauth_` (including `oauth_verifier`) are dropped.
	pub async fn exchange_for_access_token_with_params<I, K, V>(
		&self,
		request_token: &TokenPair,
		params: I,
	) -> Result<TokenPair>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		const KIND: FlowKind = FlowKind::AccessToken;

		let span = FlowSpan::new(KIND, "exchange_for_access_token");
		let params = common::filter_caller_params(params);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _exchange = self.exchange_guard.lock().await;

				self.state.ensure_awaiting(request_token, EXCHANGE_ACTION)?;

				let request = self.sign_request(RequestPlan {
					method: HttpMethod::Get,
					url: &self.descriptor.endpoints.access_token,
					token: Some(request_token),
					request_token_leg: false,
					params,
					unsigned_query: Vec::new(),
				});
				let response = self.send(request).await?;
				let access_token =
					common::parse_token_response(EndpointKind::AccessToken, &response)?;

				self.state.complete(request_token, access_token.clone())?;

				Ok(access_token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
