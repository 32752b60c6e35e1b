//! OAuth 1.0a signing primitives.
//!
//! `encode` implements the RFC 3986 percent-encoding shared by the signature base string and
//! the `Authorization` header, `signature` computes HMAC-SHA1 signatures over a
//! [`SigningContext`], and `params` assembles the per-request `oauth_*` parameter set.
//! Nothing here performs I/O; the flows in [`crate::flows`] feed the results to the transport.

pub mod encode;
pub mod params;
pub mod signature;

pub use encode::*;
pub use params::*;
pub use signature::*;

/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_consumer_key`.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_signature_method`.
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret` in token responses.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";

/// Callback value for the out-of-band flow.
pub const OOB_CALLBACK: &str = "oob";
/// Only signature method the provider accepts.
pub const HMAC_SHA1: &str = "HMAC-SHA1";
/// Protocol version sent as `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
