//! Facade over the LOS collateral-management REST API—cached client-credentials
//! tokens, sliding-window throttling, and multipart upload / two-step download
//! orchestration behind uniform transfer results.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod rate_limit;
pub mod transfer;

pub(crate) mod api;

#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{config::FacadeConfig, rate_limit::RateLimiter, transfer::Bridge};

	/// Builds a bridge pointed at a mock server with fixture credentials.
	pub fn build_test_bridge(base_url: &str) -> Bridge {
		build_test_bridge_with_limit(base_url, RateLimiter::DEFAULT_LIMIT, 60)
	}

	/// Builds a bridge with a custom rate window for throttling tests.
	pub fn build_test_bridge_with_limit(base_url: &str, limit: usize, period_secs: u64) -> Bridge {
		let base = Url::parse(base_url).expect("Test base URL should parse.");
		let config = FacadeConfig::builder(base, "test-client", "test-secret")
			.rate_limit(limit, period_secs)
			.build()
			.expect("Test configuration should validate.");

		Bridge::new(config).expect("Test bridge should build.")
	}

	/// Builds a bridge with a short per-call timeout for streaming tests.
	pub fn build_test_bridge_with_timeout(base_url: &str, timeout_secs: u64) -> Bridge {
		let base = Url::parse(base_url).expect("Test base URL should parse.");
		let config = FacadeConfig::builder(base, "test-client", "test-secret")
			.timeout_secs(timeout_secs)
			.build()
			.expect("Test configuration should validate.");

		Bridge::new(config).expect("Test bridge should build.")
	}
}

mod _prelude {
	pub use std::{
		collections::VecDeque,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {collateral_bridge as _, httpmock as _, tempfile as _, tokio as _};
