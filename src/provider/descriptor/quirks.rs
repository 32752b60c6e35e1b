// self
use crate::{_prelude::*, oauth::DEFAULT_NONCE_LEN};

/// Shortest nonce the builder accepts.
pub const MIN_NONCE_LEN: usize = 8;

/// Provider-specific quirks that influence how the legs are signed and sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Repeats `oauth_callback=oob` in the request-token query string in addition to the
	/// `Authorization` header. The parameter is signed once either way.
	pub callback_in_query: bool,
	/// Length of generated nonces.
	pub nonce_len: usize,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self { callback_in_query: true, nonce_len: DEFAULT_NONCE_LEN }
	}
}
