// self
use crate::{_prelude::*, auth::AuthorizationStage, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by broker flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("tripit_oauth1.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a `debug` event for an authorization state transition.
pub fn record_transition(from: AuthorizationStage, to: AuthorizationStage) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(from = from.as_str(), to = to.as_str(), "authorization state changed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (from, to);
	}
}

/// Emits a `warn` event when the provider rejects an access token.
pub fn record_token_rejected(status: u16) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(status, "access token rejected by provider");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = status;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_transition_without_subscriber_is_noop() {
		record_transition(AuthorizationStage::Unauthenticated, AuthorizationStage::Authenticated);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(FlowKind::RequestToken, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
