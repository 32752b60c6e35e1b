//! Request- and access-token pairs issued by the provider.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Token plus token secret, as returned by the request-token and access-token legs.
///
/// The secret is only ever used as signing key material and never transmitted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Public token value sent as `oauth_token`.
	pub token: String,
	/// Secret half of the pair; callers must avoid logging it.
	pub token_secret: TokenSecret,
}
impl TokenPair {
	/// Creates a pair from its token and secret halves.
	pub fn new(token: impl Into<String>, token_secret: impl Into<String>) -> Self {
		Self { token: token.into(), token_secret: TokenSecret::new(token_secret) }
	}

	/// Builds a pair from optional halves, treating blank values as absent.
	///
	/// Returns `Ok(None)` when both halves are absent and
	/// [`ConfigError::IncompleteAccessToken`] when only one is present.
	pub fn from_parts(
		token: Option<String>,
		token_secret: Option<String>,
	) -> Result<Option<Self>, ConfigError> {
		let token = token.filter(|value| !value.trim().is_empty());
		let token_secret = token_secret.filter(|value| !value.trim().is_empty());

		match (token, token_secret) {
			(Some(token), Some(secret)) => Ok(Some(Self::new(token, secret))),
			(None, None) => Ok(None),
			_ => Err(ConfigError::IncompleteAccessToken),
		}
	}

	/// Returns the exposed secret for signing.
	pub fn secret(&self) -> &str {
		self.token_secret.expose()
	}
}
impl Debug for TokenPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenPair")
			.field("token", &self.token)
			.field("token_secret", &self.token_secret)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_redacts_secret_half() {
		let pair = TokenPair::new("RT1", "RTS1");
		let rendered = format!("{pair:?}");

		assert!(rendered.contains("RT1"));
		assert!(!rendered.contains("RTS1"));
		assert_eq!(pair.secret(), "RTS1");
	}

	#[test]
	fn from_parts_requires_both_halves() {
		assert_eq!(TokenPair::from_parts(None, None).expect("Absent pair is valid."), None);
		assert_eq!(
			TokenPair::from_parts(Some("AT1".into()), Some("ATS1".into()))
				.expect("Complete pair is valid."),
			Some(TokenPair::new("AT1", "ATS1"))
		);
		assert_eq!(
			TokenPair::from_parts(Some("  ".into()), None).expect("Blank values count as absent."),
			None
		);
		assert!(matches!(
			TokenPair::from_parts(Some("AT1".into()), None),
			Err(ConfigError::IncompleteAccessToken)
		));
	}
}
