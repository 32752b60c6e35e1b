// self
use crate::_prelude::*;

/// Provider endpoint that produced a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
	/// Leg 1.
	RequestToken,
	/// Leg 2; built locally and never called by the broker.
	Authorize,
	/// Leg 3.
	AccessToken,
	/// Signed API call.
	Api,
}
impl EndpointKind {
	/// Returns a stable label suitable for error messages and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			EndpointKind::RequestToken => "request_token",
			EndpointKind::Authorize => "authorize",
			EndpointKind::AccessToken => "access_token",
			EndpointKind::Api => "api",
		}
	}
}
impl Display for EndpointKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
