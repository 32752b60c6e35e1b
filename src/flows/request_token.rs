//! Leg 1: acquire an unauthorized request token.
//!
//! The request is a signed `GET` carrying `oauth_callback=oob` and no `oauth_token`. When the
//! provider quirk asks for it, the callback is repeated in the query string; it still enters the
//! signature base string only once.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	flows::{
		Broker,
		common::{self, RequestPlan},
	},
	http::{HttpMethod, ProviderHttpClient},
	oauth::{OAUTH_CALLBACK_KEY, OOB_CALLBACK},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::EndpointKind,
};

impl<C> Broker<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Requests a new request token and moves the broker to `AwaitingUserAuthorization`.
	///
	/// Only allowed from `Unauthenticated`; call [`Broker::abandon_authorization`] or
	/// [`Broker::reset`] first to start over. On failure the state is left unchanged.
	pub async fn acquire_request_token(&self) -> Result<TokenPair> {
		const KIND: FlowKind = FlowKind::RequestToken;

		let span = FlowSpan::new(KIND, "acquire_request_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _exchange = self.exchange_guard.lock().await;

				self.state.ensure_unauthenticated("request a new request token")?;

				let unsigned_query = if self.descriptor.quirks.callback_in_query {
					vec![(OAUTH_CALLBACK_KEY.to_owned(), OOB_CALLBACK.to_owned())]
				} else {
					Vec::new()
				};
				let request = self.sign_request(RequestPlan {
					method: HttpMethod::Get,
					url: &self.descriptor.endpoints.request_token,
					token: None,
					request_token_leg: true,
					params: Vec::new(),
					unsigned_query,
				});
				let response = self.send(request).await?;
				let request_token =
					common::parse_token_response(EndpointKind::RequestToken, &response)?;

				self.state.begin_user_authorization(request_token.clone())?;

				Ok(request_token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
