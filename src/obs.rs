//! Optional observability helpers for broker flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `tripit_oauth1.flow` with the `flow` (leg or
//!   signed call) and `stage` (call site) fields, plus `debug` events for every authorization
//!   state transition.
//! - Enable `metrics` to increment the `tripit_oauth1_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod tracing;

pub use tracing::*;

// self
use crate::_prelude::*;

/// Network-facing operations observed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Leg 1: request token.
	RequestToken,
	/// Leg 3: access token.
	AccessToken,
	/// Signed API call made by the dispatcher.
	SignedRequest,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::RequestToken => "request_token",
			FlowKind::AccessToken => "access_token",
			FlowKind::SignedRequest => "signed_request",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a broker helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Increments `tripit_oauth1_flow_total{flow, outcome}` on the installed recorder.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"tripit_oauth1_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}
