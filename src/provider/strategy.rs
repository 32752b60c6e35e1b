//! Provider strategy hooks that classify signed-call failures.
//!
//! Implementations decide which non-2xx API responses mean the access token is no longer
//! usable, without tying the dispatcher to any particular HTTP client.

// self
use crate::{_prelude::*, http::HttpResponse, provider::EndpointKind};

/// Strategy hook that allows providers to classify API errors.
///
/// Implementors are required to be `Send + Sync`, and the hook uses crate-owned data
/// types so downstream crates never depend on reqwest-specific structures.
pub trait ProviderStrategy: Send + Sync {
	/// Maps a non-2xx API response into the broker taxonomy.
	fn classify_api_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// The access token was rejected, revoked, or expired; the caller must re-authorize.
	InvalidToken,
	/// Any other rejection; surfaced as an unexpected status.
	Rejected,
}

/// Context passed to provider strategies when classifying API errors.
///
/// Only primitive data is kept (status code, `oauth_problem`, body preview) so strategies
/// stay decoupled from any HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Endpoint that produced the response.
	pub endpoint: EndpointKind,
	/// HTTP status code returned by the provider.
	pub http_status: u16,
	/// OAuth 1.0a problem-reporting field (`oauth_problem`), when the body carries one.
	pub oauth_problem: Option<String>,
	/// Preview of the response body.
	pub body_preview: Option<String>,
}
impl ProviderErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a new context for a response with the provided status.
	pub fn new(endpoint: EndpointKind, http_status: u16) -> Self {
		Self { endpoint, http_status, oauth_problem: None, body_preview: None }
	}

	/// Builds a context from a full response, extracting `oauth_problem` and a body preview.
	pub fn from_response(endpoint: EndpointKind, response: &HttpResponse) -> Self {
		let mut ctx = Self::new(endpoint, response.status);

		if let Some(problem) = extract_oauth_problem(&response.body) {
			ctx = ctx.with_oauth_problem(problem);
		}
		if !response.is_blank() {
			ctx = ctx.with_body_preview(response.body.clone());
		}

		ctx
	}

	/// Adds the `oauth_problem` value returned by the provider.
	pub fn with_oauth_problem(mut self, problem: impl Into<String>) -> Self {
		self.oauth_problem = Some(problem.into());

		self
	}

	/// Adds a body preview, truncated to a bounded length.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}
}

/// Default strategy used for TripIt.
///
/// `oauth_problem=token_*` wins over everything else, then plain-text hints in the body,
/// and finally HTTP 401/403.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_api_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if ctx.oauth_problem.as_deref().is_some_and(is_token_problem)
			|| ctx.body_preview.as_deref().is_some_and(mentions_invalid_token)
		{
			return ProviderErrorKind::InvalidToken;
		}

		match ctx.http_status {
			401 | 403 => ProviderErrorKind::InvalidToken,
			_ => ProviderErrorKind::Rejected,
		}
	}
}

fn extract_oauth_problem(body: &str) -> Option<String> {
	url::form_urlencoded::parse(body.trim().as_bytes())
		.find(|(key, _)| key == "oauth_problem")
		.map(|(_, value)| value.into_owned())
		.filter(|value| !value.trim().is_empty())
}

fn is_token_problem(problem: &str) -> bool {
	problem.to_ascii_lowercase().starts_with("token_")
}

fn mentions_invalid_token(body: &str) -> bool {
	let lowered = body.to_ascii_lowercase();

	["token_rejected", "token_revoked", "token_expired", "invalid token"]
		.iter()
		.any(|needle| lowered.contains(needle))
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = body.chars().take(ProviderErrorContext::BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
