//! Broker-level error types shared across signing, token exchanges, and dispatch.

// self
use crate::{_prelude::*, auth::AuthorizationStage, provider::EndpointKind};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; raised before any network attempt.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered a token exchange or signed call with an unusable response.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),

	/// A signed call was attempted while the broker is not authenticated.
	#[error("Signed requests require an access token, but the broker is {stage}.")]
	NotAuthenticated {
		/// Stage the state machine was in when the call was refused.
		stage: AuthorizationStage,
	},
	/// A previously accepted access token was rejected by the provider.
	#[error("Access token was rejected by the provider (HTTP {status}).")]
	InvalidToken {
		/// HTTP status returned with the rejection.
		status: u16,
		/// Raw response body for diagnostics.
		body: String,
	},
	/// The requested operation is not allowed from the current authorization stage.
	#[error("Cannot {action} while the broker is {stage}.")]
	InvalidTransition {
		/// Stage the state machine was in.
		stage: AuthorizationStage,
		/// Operation that was refused.
		action: &'static str,
	},
}
impl Error {
	/// Returns `true` for authorization-class failures that require restarting the flow.
	pub fn is_authorization_failure(&self) -> bool {
		matches!(self, Self::InvalidToken { .. } | Self::NotAuthenticated { .. })
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A credential field was empty or whitespace.
	#[error("The {field} must not be empty.")]
	EmptyCredential {
		/// Name of the offending field.
		field: &'static str,
	},
	/// Only one half of an access-token pair was supplied.
	#[error("Access token and access token secret must be supplied together.")]
	IncompleteAccessToken,
	/// A required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// An environment variable holds a value that cannot be parsed.
	#[error("Environment variable `{name}` holds an invalid value: {value}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Raw value that failed to parse.
		value: String,
	},
	/// An API endpoint path could not be joined onto the API base URL.
	#[error("Endpoint `{endpoint}` cannot be joined onto the API base URL.")]
	InvalidEndpoint {
		/// Endpoint path supplied by the caller.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// An API endpoint carried a query string or fragment; query pairs must be passed as
	/// signed parameters.
	#[error("Endpoint `{endpoint}` must not carry a query string or fragment.")]
	EndpointWithQuery {
		/// Endpoint path supplied by the caller.
		endpoint: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Provider responses that violate the exchange contract.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Provider returned a non-2xx status.
	#[error("The {endpoint} endpoint returned HTTP {status}.")]
	UnexpectedStatus {
		/// Endpoint that produced the response.
		endpoint: EndpointKind,
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Provider returned a success status with an empty body.
	#[error("The {endpoint} endpoint returned an empty body.")]
	EmptyBody {
		/// Endpoint that produced the response.
		endpoint: EndpointKind,
		/// HTTP status code.
		status: u16,
	},
	/// Token response body is missing a required key.
	#[error("The {endpoint} response is missing `{key}`.")]
	MissingKey {
		/// Endpoint that produced the response.
		endpoint: EndpointKind,
		/// Missing key.
		key: &'static str,
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Response body could not be decoded as the requested JSON type.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	MalformedJson {
		/// Endpoint that produced the response.
		endpoint: EndpointKind,
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ProtocolError {
	/// Endpoint that produced the failing response.
	pub fn endpoint(&self) -> EndpointKind {
		match self {
			Self::UnexpectedStatus { endpoint, .. }
			| Self::EmptyBody { endpoint, .. }
			| Self::MissingKey { endpoint, .. }
			| Self::MalformedJson { endpoint, .. } => *endpoint,
		}
	}

	/// HTTP status attached to the failure.
	pub fn status(&self) -> u16 {
		match self {
			Self::UnexpectedStatus { status, .. }
			| Self::EmptyBody { status, .. }
			| Self::MissingKey { status, .. }
			| Self::MalformedJson { status, .. } => *status,
		}
	}

	/// Raw response body, when one was captured.
	pub fn body(&self) -> Option<&str> {
		match self {
			Self::UnexpectedStatus { body, .. } | Self::MissingKey { body, .. } =>
				Some(body.as_str()),
			Self::EmptyBody { .. } | Self::MalformedJson { .. } => None,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete within the configured timeout.
	#[error("Request to the provider timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn protocol_error_exposes_status_and_body() {
		let err = ProtocolError::MissingKey {
			endpoint: EndpointKind::RequestToken,
			key: "oauth_token",
			status: 200,
			body: "error=invalid_consumer".into(),
		};

		assert_eq!(err.endpoint(), EndpointKind::RequestToken);
		assert_eq!(err.status(), 200);
		assert_eq!(err.body(), Some("error=invalid_consumer"));
		assert_eq!(err.to_string(), "The request_token response is missing `oauth_token`.");
	}

	#[test]
	fn not_authenticated_reports_stage() {
		let err = Error::NotAuthenticated { stage: AuthorizationStage::AwaitingUserAuthorization };

		assert!(err.is_authorization_failure());
		assert_eq!(
			err.to_string(),
			"Signed requests require an access token, but the broker is awaiting_user_authorization."
		);
	}

	#[test]
	fn io_errors_convert_into_transport_errors() {
		let err: Error =
			TransportError::from(std::io::Error::other("connection reset by peer")).into();

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));
		assert!(!err.is_authorization_failure());
	}
}
