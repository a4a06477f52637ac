//! Sliding-window admission control for outbound API calls.

// self
use crate::_prelude::*;

/// Sliding-window throttle counting requests within a trailing period.
///
/// Admission is advisory backpressure, not blocking: a denied call must fail with
/// [`Error::RateLimitExceeded`](crate::error::Error::RateLimitExceeded) instead of
/// queuing a retry. The prune-check-record sequence runs under one lock so concurrent
/// callers can never both observe room and both record past the limit.
#[derive(Debug)]
pub struct RateLimiter {
	limit: usize,
	period: Duration,
	window: Mutex<VecDeque<OffsetDateTime>>,
}
impl RateLimiter {
	/// Default window capacity.
	pub const DEFAULT_LIMIT: usize = 180;
	/// Default window length.
	pub const DEFAULT_PERIOD: Duration = Duration::seconds(60);

	/// Creates a limiter admitting `limit` requests per `period`.
	pub fn new(limit: usize, period: Duration) -> Self {
		Self { limit, period, window: Mutex::new(VecDeque::with_capacity(limit)) }
	}

	/// Admits or denies a request at the current instant.
	pub fn allow_request(&self) -> bool {
		self.allow_request_at(OffsetDateTime::now_utc())
	}

	/// Admits or denies a request observed at `instant`.
	///
	/// Entries older than the trailing period are pruned first; a denial records
	/// nothing, so denied calls never shrink the window for later ones.
	pub fn allow_request_at(&self, instant: OffsetDateTime) -> bool {
		let mut window = self.window.lock();
		let horizon = instant - self.period;

		while window.front().is_some_and(|observed| *observed <= horizon) {
			window.pop_front();
		}

		if window.len() < self.limit {
			window.push_back(instant);

			true
		} else {
			false
		}
	}

	/// Window capacity.
	pub fn limit(&self) -> usize {
		self.limit
	}

	/// Window length.
	pub fn period(&self) -> Duration {
		self.period
	}
}
impl Default for RateLimiter {
	fn default() -> Self {
		Self::new(Self::DEFAULT_LIMIT, Self::DEFAULT_PERIOD)
	}
}
