//! Bridge-level error taxonomy shared across the executor, the token manager, and the
//! transfer workflows.

// self
use crate::_prelude::*;

/// Bridge-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical bridge error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Input rejected before any network interaction.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Token grant failed or its response was malformed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Local sliding-window throttle denied the call.
	#[error("Local rate limit of {limit} requests per {period_secs}s exceeded.")]
	RateLimitExceeded {
		/// Configured window capacity.
		limit: usize,
		/// Configured window length in seconds.
		period_secs: u64,
	},
	/// Upstream API answered with a non-2xx status.
	#[error("Upstream API returned HTTP {status}.")]
	Http {
		/// HTTP status code returned by the upstream API.
		status: u16,
		/// Raw response body, kept for message extraction.
		body: String,
	},
	/// Transport-level failure (DNS, TCP, TLS, timeout).
	#[error("Network error occurred while calling the upstream API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Upstream response is missing an expected shape or key.
	#[error(transparent)]
	ResponseShape(#[from] ResponseShapeError),
	/// Local file read/write failure during a transfer.
	#[error("I/O error occurred during the transfer.")]
	Io(#[from] std::io::Error),
}
impl Error {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns the taxonomy label for this error.
	pub const fn kind(&self) -> ErrorKind {
		match self {
			Self::Validation(_) => ErrorKind::Validation,
			Self::Auth(_) => ErrorKind::Auth,
			Self::RateLimitExceeded { .. } => ErrorKind::RateLimit,
			Self::Http { .. } => ErrorKind::Http,
			Self::Network { .. } => ErrorKind::Network,
			Self::ResponseShape(_) => ErrorKind::ResponseShape,
			Self::Io(_) => ErrorKind::Io,
		}
	}
}
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Stable taxonomy labels carried by failure results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// Bad location id, actor id, or file path; never reached the network.
	Validation,
	/// Token grant failed or returned a malformed response.
	Auth,
	/// Local throttling denied the call.
	RateLimit,
	/// Non-2xx response from the upstream API.
	Http,
	/// Transport-level failure.
	Network,
	/// Response JSON missing expected keys.
	ResponseShape,
	/// Local file read/write failure.
	Io,
}
impl ErrorKind {
	/// Returns a stable label suitable for result payloads or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Validation => "validation",
			ErrorKind::Auth => "auth",
			ErrorKind::RateLimit => "rate_limit",
			ErrorKind::Http => "http",
			ErrorKind::Network => "network",
			ErrorKind::ResponseShape => "response_shape",
			ErrorKind::Io => "io",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Input validation failures detected before any network call.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// Location identifiers must be positive integers.
	#[error("Location id must be a positive integer, got {value}.")]
	InvalidLocationId {
		/// Rejected value.
		value: i64,
	},
	/// Actor identifiers must carry at least one non-whitespace character.
	#[error("The {field} field must be a non-empty string.")]
	EmptyField {
		/// Form field name that failed validation.
		field: &'static str,
	},
	/// Upload source path does not point at a readable file.
	#[error("Source file not found at {path}.")]
	FileNotFound {
		/// Rejected path.
		path: String,
	},
	/// Base URL cannot carry additional endpoint segments.
	#[error("Base URL `{base}` cannot be extended with endpoint path segments.")]
	InvalidBaseUrl {
		/// Offending base URL.
		base: String,
	},
}

/// Failures raised by the client-credentials token exchange.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint answered with a non-2xx status.
	#[error("Token endpoint rejected the client-credentials grant: {reason}.")]
	GrantRejected {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Reason extracted from the error envelope, or the raw body text.
		reason: String,
	},
	/// Transport failed before the token endpoint answered.
	#[error("Transport failure occurred while calling the token endpoint.")]
	Transport {
		/// Underlying transport error.
		#[source]
		source: BoxError,
	},
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Neither the nested nor the flat response shape supplied the field.
	#[error("Token endpoint response is missing the {field} field.")]
	MissingField {
		/// Missing field name.
		field: &'static str,
	},
	/// Token endpoint returned a zero or negative lifetime.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}

/// Upstream responses that decoded but lacked the expected shape.
#[derive(Debug, ThisError)]
pub enum ResponseShapeError {
	/// Request-for-download response was not JSON at all.
	#[error("Request-for-download response is not JSON-parsable.")]
	NotJson {
		/// Underlying decode failure.
		#[source]
		source: serde_json::Error,
	},
	/// Request-for-download response decoded to a non-object value.
	#[error("Request-for-download response is not a JSON object.")]
	NotAnObject,
	/// Ticket object carries no usable download URL.
	#[error("No download_url in the request-for-download response.")]
	MissingDownloadUrl,
	/// Ticket URL is present but not an absolute URL.
	#[error("The download_url is not a valid absolute URL.")]
	InvalidDownloadUrl {
		/// Underlying parse failure.
		#[source]
		source: url::ParseError,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_map_to_stable_labels() {
		let denied = Error::RateLimitExceeded { limit: 3, period_secs: 60 };

		assert_eq!(denied.kind(), ErrorKind::RateLimit);
		assert_eq!(denied.kind().as_str(), "rate_limit");

		let missing = Error::from(ResponseShapeError::MissingDownloadUrl);

		assert_eq!(missing.kind(), ErrorKind::ResponseShape);
		assert!(missing.to_string().contains("No download_url"));
	}
}
