// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for signed API calls.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	rejected_locally: AtomicU64,
}
impl DispatchMetrics {
	/// Returns the number of calls that reached the transport.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of calls answered with a 2xx status.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that failed after reaching the transport.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of calls refused before any I/O (no access token, bad endpoint).
	pub fn rejected_locally(&self) -> u64 {
		self.rejected_locally.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rejected_locally(&self) {
		self.rejected_locally.fetch_add(1, Ordering::Relaxed);
	}
}
