//! Leg 2: the URL a human visits to approve the request token.

// self
use crate::{
	_prelude::*,
	flows::Broker,
	http::ProviderHttpClient,
	oauth::{OAUTH_TOKEN_KEY, percent_encode},
};

impl<C> Broker<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Builds `<authorize>?oauth_token=<request_token>`.
	///
	/// Purely local. The broker cannot observe the approval; call
	/// [`Broker::complete_authorization`] once the user reports back.
	pub fn authorization_url(&self, request_token: &str) -> Url {
		let mut url = self.descriptor.endpoints.authorize.clone();
		let query = format!("{OAUTH_TOKEN_KEY}={}", percent_encode(request_token));

		url.set_query(Some(&query));

		url
	}
}
