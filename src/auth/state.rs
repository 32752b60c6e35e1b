//! Authorization state machine gating token exchanges and signed requests.
//!
//! ```text
//! Unauthenticated --(request token issued)--> AwaitingUserAuthorization
//! AwaitingUserAuthorization --(access token issued)--> Authenticated
//! AwaitingUserAuthorization --(abandon)--> Unauthenticated
//! Authenticated --(reset / rejected token)--> Unauthenticated
//! ```
//!
//! A stored access token may also be injected directly via
//! [`AuthorizationStateMachine::resume`], replacing whatever state was held.

// self
use crate::{_prelude::*, auth::TokenPair, obs};

/// Stage labels without the token material, used in errors and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStage {
	/// No token is held.
	Unauthenticated,
	/// A request token was issued and the user has not yet approved it.
	AwaitingUserAuthorization,
	/// An access token is held.
	Authenticated,
}
impl AuthorizationStage {
	/// Returns a stable label suitable for span fields and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthorizationStage::Unauthenticated => "unauthenticated",
			AuthorizationStage::AwaitingUserAuthorization => "awaiting_user_authorization",
			AuthorizationStage::Authenticated => "authenticated",
		}
	}
}
impl Display for AuthorizationStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Authorization state including the token pair owned by each stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthorizationState {
	/// No token is held.
	#[default]
	Unauthenticated,
	/// Holding the request token pair issued by the request-token leg.
	AwaitingUserAuthorization(TokenPair),
	/// Holding the access token pair used to sign API calls.
	Authenticated(TokenPair),
}
impl AuthorizationState {
	/// Returns the stage label for this state.
	pub fn stage(&self) -> AuthorizationStage {
		match self {
			Self::Unauthenticated => AuthorizationStage::Unauthenticated,
			Self::AwaitingUserAuthorization(_) => AuthorizationStage::AwaitingUserAuthorization,
			Self::Authenticated(_) => AuthorizationStage::Authenticated,
		}
	}
}

/// Thread-safe holder of the current [`AuthorizationState`].
///
/// Every transition is checked against the diagram in the module docs; refused
/// transitions surface as [`Error::InvalidTransition`] and leave the state untouched.
#[derive(Debug, Default)]
pub struct AuthorizationStateMachine(Mutex<AuthorizationState>);
impl AuthorizationStateMachine {
	/// Creates a machine that starts in the provided state.
	pub fn with_state(state: AuthorizationState) -> Self {
		Self(Mutex::new(state))
	}

	/// Returns a copy of the current state.
	pub fn snapshot(&self) -> AuthorizationState {
		self.0.lock().clone()
	}

	/// Returns the current stage label.
	pub fn stage(&self) -> AuthorizationStage {
		self.0.lock().stage()
	}

	/// Returns `true` when an access token is held.
	pub fn is_authenticated(&self) -> bool {
		matches!(*self.0.lock(), AuthorizationState::Authenticated(_))
	}

	/// Returns the access token pair, or [`Error::NotAuthenticated`] when none is held.
	pub fn access_token(&self) -> Result<TokenPair> {
		match &*self.0.lock() {
			AuthorizationState::Authenticated(pair) => Ok(pair.clone()),
			other => Err(Error::NotAuthenticated { stage: other.stage() }),
		}
	}

	/// Returns the pending request token pair, if the user has not approved it yet.
	pub fn pending_request_token(&self) -> Option<TokenPair> {
		match &*self.0.lock() {
			AuthorizationState::AwaitingUserAuthorization(pair) => Some(pair.clone()),
			_ => None,
		}
	}

	/// Checks that a new request token may be requested.
	pub fn ensure_unauthenticated(&self, action: &'static str) -> Result<()> {
		match self.stage() {
			AuthorizationStage::Unauthenticated => Ok(()),
			stage => Err(Error::InvalidTransition { stage, action }),
		}
	}

	/// Checks that `request_token` is the pair currently awaiting user approval.
	pub fn ensure_awaiting(&self, request_token: &TokenPair, action: &'static str) -> Result<()> {
		match &*self.0.lock() {
			AuthorizationState::AwaitingUserAuthorization(pending) if pending == request_token =>
				Ok(()),
			other => Err(Error::InvalidTransition { stage: other.stage(), action }),
		}
	}

	/// `Unauthenticated -> AwaitingUserAuthorization`.
	pub fn begin_user_authorization(&self, request_token: TokenPair) -> Result<()> {
		let mut state = self.0.lock();

		match &*state {
			AuthorizationState::Unauthenticated => {
				*state = AuthorizationState::AwaitingUserAuthorization(request_token);

				obs::record_transition(
					AuthorizationStage::Unauthenticated,
					AuthorizationStage::AwaitingUserAuthorization,
				);

				Ok(())
			},
			other => Err(Error::InvalidTransition {
				stage: other.stage(),
				action: "store a new request token",
			}),
		}
	}

	/// `AwaitingUserAuthorization -> Authenticated`, consuming the matching request token.
	pub fn complete(&self, request_token: &TokenPair, access_token: TokenPair) -> Result<()> {
		let mut state = self.0.lock();

		match &*state {
			AuthorizationState::AwaitingUserAuthorization(pending) if pending == request_token => {
				*state = AuthorizationState::Authenticated(access_token);

				obs::record_transition(
					AuthorizationStage::AwaitingUserAuthorization,
					AuthorizationStage::Authenticated,
				);

				Ok(())
			},
			other => Err(Error::InvalidTransition {
				stage: other.stage(),
				action: "complete authorization",
			}),
		}
	}

	/// `AwaitingUserAuthorization -> Unauthenticated`; returns the discarded request token.
	///
	/// Does nothing in any other state.
	pub fn abandon(&self) -> Option<TokenPair> {
		let mut state = self.0.lock();

		if !matches!(*state, AuthorizationState::AwaitingUserAuthorization(_)) {
			return None;
		}

		match std::mem::take(&mut *state) {
			AuthorizationState::AwaitingUserAuthorization(pair) => {
				obs::record_transition(
					AuthorizationStage::AwaitingUserAuthorization,
					AuthorizationStage::Unauthenticated,
				);

				Some(pair)
			},
			_ => None,
		}
	}

	/// Any state `-> Unauthenticated`; returns the stage that was left.
	pub fn reset(&self) -> AuthorizationStage {
		let previous = std::mem::take(&mut *self.0.lock()).stage();

		if previous != AuthorizationStage::Unauthenticated {
			obs::record_transition(previous, AuthorizationStage::Unauthenticated);
		}

		previous
	}

	/// Any state `-> Authenticated` using an access token obtained earlier.
	pub fn resume(&self, access_token: TokenPair) {
		let previous =
			std::mem::replace(&mut *self.0.lock(), AuthorizationState::Authenticated(access_token))
				.stage();

		obs::record_transition(previous, AuthorizationStage::Authenticated);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request_token() -> TokenPair {
		TokenPair::new("RT1", "RTS1")
	}

	#[test]
	fn full_lifecycle_follows_transitions() {
		let machine = AuthorizationStateMachine::default();

		assert_eq!(machine.stage(), AuthorizationStage::Unauthenticated);
		assert!(machine.ensure_unauthenticated("request a token").is_ok());

		machine.begin_user_authorization(request_token()).expect("Leg 1 transition should apply.");

		assert_eq!(machine.pending_request_token(), Some(request_token()));
		assert!(machine.ensure_awaiting(&request_token(), "exchange").is_ok());

		machine
			.complete(&request_token(), TokenPair::new("AT1", "ATS1"))
			.expect("Leg 3 transition should apply.");

		assert!(machine.is_authenticated());
		assert_eq!(machine.pending_request_token(), None);
		assert_eq!(
			machine.access_token().expect("Access token should be held."),
			TokenPair::new("AT1", "ATS1")
		);
		assert_eq!(machine.reset(), AuthorizationStage::Authenticated);
		assert_eq!(machine.snapshot(), AuthorizationState::Unauthenticated);
	}

	#[test]
	fn complete_rejects_foreign_request_token() {
		let machine = AuthorizationStateMachine::default();

		machine.begin_user_authorization(request_token()).expect("Leg 1 transition should apply.");

		let err = machine
			.complete(&TokenPair::new("RT2", "RTS2"), TokenPair::new("AT1", "ATS1"))
			.expect_err("A request token that is not pending must be refused.");

		assert!(matches!(
			err,
			Error::InvalidTransition { stage: AuthorizationStage::AwaitingUserAuthorization, .. }
		));
		assert_eq!(machine.pending_request_token(), Some(request_token()));
	}

	#[test]
	fn complete_requires_awaiting_stage() {
		let machine = AuthorizationStateMachine::default();
		let err = machine
			.complete(&request_token(), TokenPair::new("AT1", "ATS1"))
			.expect_err("Leg 3 from Unauthenticated must be refused.");

		assert!(matches!(
			err,
			Error::InvalidTransition { stage: AuthorizationStage::Unauthenticated, .. }
		));
	}

	#[test]
	fn begin_is_refused_once_a_token_is_held() {
		let machine = AuthorizationStateMachine::default();

		machine.begin_user_authorization(request_token()).expect("Leg 1 transition should apply.");

		assert!(machine.begin_user_authorization(TokenPair::new("RT2", "RTS2")).is_err());
		assert!(machine.ensure_unauthenticated("request a token").is_err());
	}

	#[test]
	fn abandon_only_discards_pending_request_tokens() {
		let machine = AuthorizationStateMachine::default();

		assert_eq!(machine.abandon(), None);

		machine.begin_user_authorization(request_token()).expect("Leg 1 transition should apply.");

		assert_eq!(machine.abandon(), Some(request_token()));
		assert_eq!(machine.stage(), AuthorizationStage::Unauthenticated);

		machine.resume(TokenPair::new("AT1", "ATS1"));

		assert_eq!(machine.abandon(), None);
		assert!(machine.is_authenticated());
	}

	#[test]
	fn access_token_reports_stage_when_missing() {
		let machine = AuthorizationStateMachine::default();

		machine.begin_user_authorization(request_token()).expect("Leg 1 transition should apply.");

		let err = machine.access_token().expect_err("No access token is held yet.");

		assert!(matches!(
			err,
			Error::NotAuthenticated { stage: AuthorizationStage::AwaitingUserAuthorization }
		));
	}
}
