//! Transport primitives for signed OAuth 1.0a calls.
//!
//! The broker never talks to an HTTP stack directly. Every leg of the exchange and every
//! dispatched API call is reduced to a [`SignedRequest`] (method, URL, query pairs, and the
//! precomputed `Authorization` header) and handed to a [`ProviderHttpClient`]. The transport
//! only has to put those bytes on the wire and return the status plus body as an
//! [`HttpResponse`]; classification of that response stays inside the broker.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
#[cfg(feature = "reqwest")] use crate::config::HttpConfig;
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ProviderHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// HTTP methods the broker can sign and dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Returns the uppercase method token used in the signature base string.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully signed request ready for the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Target URL without a query component.
	pub url: Url,
	/// Query pairs appended by the transport, already part of the signature.
	pub query: Vec<(String, String)>,
	/// Value of the `Authorization` header (`OAuth k="v", ...`).
	pub authorization: String,
}
impl SignedRequest {
	/// Returns the URL with `query` appended, exactly as it is sent.
	pub fn full_url(&self) -> Url {
		let mut url = self.url.clone();

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		url
	}
}

/// Status and body returned by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}
impl HttpResponse {
	/// Creates a response from raw parts.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` when the body is empty or whitespace only.
	pub fn is_blank(&self) -> bool {
		self.body.trim().is_empty()
	}
}

/// Abstraction over HTTP transports capable of executing signed OAuth 1.0a requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared
/// across broker clones, and the returned future must be `Send` so broker futures can
/// move between executor threads. Implementations should not follow redirects and must
/// not add or rewrite the `Authorization` header.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves to the provider's status and body.
	fn execute(&self, request: SignedRequest) -> HttpFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the timeout and user agent in `config`.
	///
	/// Redirects are disabled so token endpoints answer directly.
	pub fn from_config(config: &HttpConfig) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(config.timeout)
			.user_agent(config.user_agent.as_str())
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	fn execute(&self, request: SignedRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
				HttpMethod::Put => reqwest::Method::PUT,
				HttpMethod::Delete => reqwest::Method::DELETE,
			};
			let response = client
				.request(method, request.url)
				.query(&request.query)
				.header(reqwest::header::AUTHORIZATION, request.authorization)
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok(HttpResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn full_url_appends_encoded_query() {
		let request = SignedRequest {
			method: HttpMethod::Get,
			url: Url::parse("https://api.tripit.com/oauth/request_token")
				.expect("Fixture URL should parse."),
			query: vec![("oauth_callback".into(), "oob".into()), ("q".into(), "a b".into())],
			authorization: "OAuth".into(),
		};

		assert_eq!(
			request.full_url().as_str(),
			"https://api.tripit.com/oauth/request_token?oauth_callback=oob&q=a+b"
		);
	}

	#[test]
	fn response_classification_helpers() {
		assert!(HttpResponse::new(200, "a=b").is_success());
		assert!(HttpResponse::new(204, " \n").is_blank());
		assert!(!HttpResponse::new(302, "").is_success());
		assert!(!HttpResponse::new(500, "oops").is_blank());
	}

	#[test]
	fn methods_render_uppercase() {
		assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
		assert_eq!(
			serde_json::to_string(&HttpMethod::Post).expect("Method should serialize."),
			"\"POST\""
		);
	}
}
