//! Bridge configuration and its validating builder.

// self
use crate::{_prelude::*, auth::Secret, error::BoxError};

const DEFAULT_SCOPE: &str = "*";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while constructing or validating the bridge configuration.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL must be plain http(s).
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Rejected URL.
		url: String,
	},
	/// Base URL must be able to carry endpoint path segments.
	#[error("Base URL cannot serve as a base for endpoint paths: {url}.")]
	CannotBeABase {
		/// Rejected URL.
		url: String,
	},
	/// Client identifier is required for the client-credentials grant.
	#[error("Client id must not be empty.")]
	EmptyClientId,
	/// Client secret is required for the client-credentials grant.
	#[error("Client secret must not be empty.")]
	EmptyClientSecret,
	/// Scope string is sent verbatim with every grant and must be present.
	#[error("Scope must not be empty.")]
	EmptyScope,
	/// Per-call timeout must be a positive number of seconds.
	#[error("Request timeout must be positive.")]
	NonPositiveTimeout,
	/// The window must admit at least one request.
	#[error("Rate limit must admit at least one request.")]
	ZeroRateLimit,
	/// The window length must be a positive number of seconds.
	#[error("Rate limit period must be positive.")]
	NonPositivePeriod,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Sliding-window throttle settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
	/// Maximum requests admitted within the trailing period.
	pub limit: usize,
	/// Window length in seconds.
	pub period_secs: u64,
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self { limit: 180, period_secs: 60 }
	}
}

/// Validated, immutable bridge configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct FacadeConfig {
	/// Base URL every relative endpoint is resolved against.
	pub base_url: Url,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret; redacted in logs.
	pub client_secret: Secret,
	/// Scope string sent with every grant.
	#[serde(default = "default_scope")]
	pub scope: String,
	/// Connect and read timeout in seconds, applied to every call.
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
	/// Local throttle settings.
	#[serde(default)]
	pub rate_limit: RateLimitConfig,
}
impl FacadeConfig {
	/// Creates a new builder seeded with the connection essentials.
	pub fn builder(
		base_url: Url,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> FacadeConfigBuilder {
		FacadeConfigBuilder::new(base_url, client_id, client_secret)
	}

	/// Validates invariants for the configuration.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !matches!(self.base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { url: self.base_url.to_string() });
		}
		if self.base_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: self.base_url.to_string() });
		}
		if self.client_id.is_empty() {
			return Err(ConfigError::EmptyClientId);
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::EmptyClientSecret);
		}
		if self.scope.is_empty() {
			return Err(ConfigError::EmptyScope);
		}
		if self.timeout_secs == 0 {
			return Err(ConfigError::NonPositiveTimeout);
		}
		if self.rate_limit.limit == 0 {
			return Err(ConfigError::ZeroRateLimit);
		}
		if self.rate_limit.period_secs == 0 {
			return Err(ConfigError::NonPositivePeriod);
		}

		Ok(())
	}
}

fn default_scope() -> String {
	DEFAULT_SCOPE.into()
}

fn default_timeout_secs() -> u64 {
	DEFAULT_TIMEOUT_SECS
}

/// Builder for [`FacadeConfig`] values.
#[derive(Debug)]
pub struct FacadeConfigBuilder {
	base_url: Url,
	client_id: String,
	client_secret: Secret,
	scope: String,
	timeout_secs: u64,
	rate_limit: RateLimitConfig,
}
impl FacadeConfigBuilder {
	fn new(base_url: Url, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			base_url,
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
			scope: default_scope(),
			timeout_secs: default_timeout_secs(),
			rate_limit: RateLimitConfig::default(),
		}
	}

	/// Overrides the grant scope (defaults to `*`).
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Overrides the per-call timeout (defaults to 10 seconds).
	pub fn timeout_secs(mut self, secs: u64) -> Self {
		self.timeout_secs = secs;

		self
	}

	/// Overrides the throttle settings (defaults to 180 requests per 60 seconds).
	pub fn rate_limit(mut self, limit: usize, period_secs: u64) -> Self {
		self.rate_limit = RateLimitConfig { limit, period_secs };

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<FacadeConfig, ConfigError> {
		let config = FacadeConfig {
			base_url: self.base_url,
			client_id: self.client_id,
			client_secret: self.client_secret,
			scope: self.scope,
			timeout_secs: self.timeout_secs,
			rate_limit: self.rate_limit,
		};

		config.validate()?;

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn base_url() -> Url {
		Url::parse("https://api.example.com").expect("Fixture base URL should parse.")
	}

	#[test]
	fn builder_applies_defaults() {
		let config = FacadeConfig::builder(base_url(), "client", "secret")
			.build()
			.expect("Default configuration should validate.");

		assert_eq!(config.scope, "*");
		assert_eq!(config.timeout_secs, 10);
		assert_eq!(config.rate_limit, RateLimitConfig { limit: 180, period_secs: 60 });
	}

	#[test]
	fn builder_rejects_bad_inputs() {
		assert!(matches!(
			FacadeConfig::builder(base_url(), "", "secret").build(),
			Err(ConfigError::EmptyClientId),
		));
		assert!(matches!(
			FacadeConfig::builder(base_url(), "client", "").build(),
			Err(ConfigError::EmptyClientSecret),
		));
		assert!(matches!(
			FacadeConfig::builder(base_url(), "client", "secret").rate_limit(0, 60).build(),
			Err(ConfigError::ZeroRateLimit),
		));

		let ftp = Url::parse("ftp://api.example.com").expect("Fixture URL should parse.");

		assert!(matches!(
			FacadeConfig::builder(ftp, "client", "secret").build(),
			Err(ConfigError::UnsupportedScheme { .. }),
		));

		let mailto = Url::parse("mailto:ops@example.com").expect("Fixture URL should parse.");

		assert!(matches!(
			FacadeConfig::builder(mailto, "client", "secret").build(),
			Err(ConfigError::UnsupportedScheme { .. }),
		));
	}

	#[test]
	fn config_deserializes_with_defaults() {
		let config: FacadeConfig = serde_json::from_str(
			r#"{"base_url": "https://api.example.com", "client_id": "c", "client_secret": "s"}"#,
		)
		.expect("Minimal configuration should deserialize.");

		config.validate().expect("Deserialized configuration should validate.");

		assert_eq!(config.scope, "*");
		assert_eq!(config.rate_limit.limit, 180);
	}
}
