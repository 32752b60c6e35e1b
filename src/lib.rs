//! OAuth 1.0a out-of-band broker for the TripIt API: deterministic HMAC-SHA1 request signing,
//! the three-legged request-token/authorize/access-token exchange, and a state-gated dispatcher
//! that signs every authenticated API call.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		flows::Broker,
		http::ReqwestHttpClient,
		provider::{DefaultProviderStrategy, ProviderDescriptor, ProviderStrategy},
	};

	/// Broker type alias used by reqwest-backed integration tests.
	pub type ReqwestTestBroker = Broker<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Broker`] backed by the default provider strategy and the reqwest
	/// transport used across integration tests.
	pub fn build_reqwest_test_broker(
		descriptor: ProviderDescriptor,
		consumer_key: &str,
		consumer_secret: &str,
	) -> ReqwestTestBroker {
		let credentials = Credentials::new(consumer_key, consumer_secret)
			.expect("Test credentials should be non-empty.");
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy);

		Broker::with_http_client(descriptor, strategy, credentials, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
