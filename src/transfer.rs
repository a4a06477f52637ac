//! High-level transfer workflows composed over the executor, the throttle, and the
//! token manager.

pub mod request;
pub mod result;

mod download;
mod upload;

pub use request::*;
pub use result::*;

// self
use crate::{
	_prelude::*,
	auth::TokenManager,
	config::{ConfigError, FacadeConfig},
	http::RequestExecutor,
	rate_limit::RateLimiter,
};

/// Facade coordinating uploads and downloads against one upstream API.
///
/// One instance owns its HTTP client, cached token, and rate window; there is no
/// process-wide state, so hosts can run several bridges against different upstreams.
/// The instance is safe to share across tasks: token refresh is singleflighted and the
/// rate window is checked-and-recorded atomically.
pub struct Bridge {
	config: FacadeConfig,
	executor: RequestExecutor,
	token_manager: Arc<TokenManager>,
	rate_limiter: RateLimiter,
}
impl Bridge {
	/// Builds a bridge from a validated configuration.
	pub fn new(config: FacadeConfig) -> Result<Self, ConfigError> {
		config.validate()?;

		// The token manager keeps the sourceless executor clone, so its grant call can
		// never recurse into a token fetch.
		let plain_executor = RequestExecutor::new(&config)?;
		let token_manager = Arc::new(TokenManager::new(plain_executor.clone(), &config));
		let executor = plain_executor.with_bearer_source(token_manager.clone());
		let rate_limiter = RateLimiter::new(
			config.rate_limit.limit,
			Duration::seconds(config.rate_limit.period_secs as _),
		);

		Ok(Self { config, executor, token_manager, rate_limiter })
	}

	/// Returns the current bearer token, refreshing it if necessary.
	///
	/// Exposed for diagnostics only; the workflows inject the token themselves.
	pub async fn access_token(&self) -> Result<String> {
		Ok(self.token_manager.bearer_token().await?)
	}

	pub(crate) fn check_rate_limit(&self) -> Result<()> {
		if self.rate_limiter.allow_request() {
			Ok(())
		} else {
			Err(Error::RateLimitExceeded {
				limit: self.rate_limiter.limit(),
				period_secs: self.config.rate_limit.period_secs,
			})
		}
	}
}
impl Debug for Bridge {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Bridge")
			.field("base_url", &self.config.base_url.as_str())
			.field("client_id", &self.config.client_id)
			.field("rate_limit", &self.config.rate_limit)
			.finish()
	}
}
