//! High-level flow orchestrators powered by the broker facade.
//!
//! The legs of the out-of-band exchange live in their own modules
//! ([`request_token`], [`authorize`], [`access_token`]) and the signed API dispatcher in
//! [`dispatch`]. All of them are inherent methods on [`Broker`], which owns the transport,
//! descriptor, credentials, and the shared authorization state.

pub mod access_token;
pub mod authorize;
pub mod common;
pub mod dispatch;
pub mod request_token;

pub use dispatch::DispatchMetrics;

// self
use crate::{
	_prelude::*,
	auth::{
		AuthorizationStage, AuthorizationState, AuthorizationStateMachine, Credentials, TokenPair,
	},
	http::ProviderHttpClient,
	provider::{ProviderDescriptor, ProviderStrategy},
};
#[cfg(feature = "reqwest")]
use crate::{config::BrokerConfig, http::ReqwestHttpClient, provider::DefaultProviderStrategy};

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport stack.
pub type ReqwestBroker = Broker<ReqwestHttpClient>;

/// Coordinates the OAuth 1.0a out-of-band flow and signed API calls for one credential set.
///
/// Clones share the same authorization state, exchange guard, and metrics, so a clone handed
/// to another task observes every transition made through the original.
pub struct Broker<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Provider descriptor that defines endpoints and quirks.
	pub descriptor: ProviderDescriptor,
	/// Strategy that classifies failed signed calls.
	pub strategy: Arc<dyn ProviderStrategy>,
	/// Consumer credentials used to sign every request.
	pub credentials: Credentials,
	/// Shared counters for signed API calls.
	pub dispatch_metrics: Arc<DispatchMetrics>,
	state: Arc<AuthorizationStateMachine>,
	exchange_guard: Arc<AsyncMutex<()>>,
}
impl<C> Broker<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates an unauthenticated broker that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		strategy: Arc<dyn ProviderStrategy>,
		credentials: Credentials,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			strategy,
			credentials,
			dispatch_metrics: Default::default(),
			state: Default::default(),
			exchange_guard: Default::default(),
		}
	}

	/// Starts the broker in the authenticated stage with a previously issued access token.
	pub fn with_access_token(self, access_token: TokenPair) -> Self {
		self.state.resume(access_token);

		self
	}

	/// Returns a copy of the current authorization state.
	pub fn state(&self) -> AuthorizationState {
		self.state.snapshot()
	}

	/// Returns the current stage label.
	pub fn stage(&self) -> AuthorizationStage {
		self.state.stage()
	}

	/// Returns `true` when an access token is held.
	pub fn is_authenticated(&self) -> bool {
		self.state.is_authenticated()
	}

	/// Returns the access token pair, if one is held.
	pub fn access_token(&self) -> Option<TokenPair> {
		self.state.access_token().ok()
	}

	/// Returns the request token pair waiting for user approval, if any.
	pub fn pending_request_token(&self) -> Option<TokenPair> {
		self.state.pending_request_token()
	}

	/// Drops whatever token is held and returns to `Unauthenticated`.
	///
	/// Callers use this after [`Error::InvalidToken`] before restarting the flow.
	pub fn reset(&self) -> AuthorizationStage {
		self.state.reset()
	}

	/// Abandons a pending user authorization, returning the discarded request token.
	///
	/// No remote call is made; the request token simply expires on the provider side.
	pub fn abandon_authorization(&self) -> Option<TokenPair> {
		self.state.abandon()
	}

	/// Injects an access token obtained earlier, replacing any current state.
	pub fn resume_session(&self, access_token: TokenPair) {
		self.state.resume(access_token);
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestHttpClient> {
	/// Creates a new broker for the provided descriptor and credentials.
	///
	/// The broker provisions its own reqwest-backed transport with the default timeout and
	/// user agent so callers do not need to pass HTTP handles explicitly.
	pub fn new(descriptor: ProviderDescriptor, credentials: Credentials) -> Result<Self> {
		Self::from_config(descriptor, BrokerConfig::new(credentials))
	}

	/// Creates a broker from a loaded configuration, resuming its access token when present.
	pub fn from_config(descriptor: ProviderDescriptor, config: BrokerConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config.http)?;
		let broker = Self::with_http_client(
			descriptor,
			Arc::new(DefaultProviderStrategy),
			config.credentials,
			http_client,
		);

		Ok(match config.access_token {
			Some(access_token) => broker.with_access_token(access_token),
			None => broker,
		})
	}
}
impl<C> Clone for Broker<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			descriptor: self.descriptor.clone(),
			strategy: Arc::clone(&self.strategy),
			credentials: self.credentials.clone(),
			dispatch_metrics: Arc::clone(&self.dispatch_metrics),
			state: Arc::clone(&self.state),
			exchange_guard: Arc::clone(&self.exchange_guard),
		}
	}
}
impl<C> Debug for Broker<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("descriptor", &self.descriptor)
			.field("consumer_key", &self.credentials.consumer_key())
			.field("stage", &self.state.stage())
			.finish()
	}
}
