//! Immutable access token values with expiry helpers.

// self
use crate::{_prelude::*, auth::Secret};

/// Immutable bearer token issued by the client-credentials grant.
///
/// The value and its expiry instant are set together at construction and the whole
/// record is replaced on refresh, so callers never observe a partially updated token.
#[derive(Clone)]
pub struct AccessToken {
	secret: Secret,
	/// Instant the grant response was observed.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from `issued_at` plus the granted `expires_in`.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Creates a token from the grant response fields.
	pub fn new(value: impl Into<String>, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		Self { secret: Secret::new(value), issued_at, expires_at: issued_at + expires_in }
	}

	/// Returns the bearer value. Callers must avoid logging it.
	pub fn expose(&self) -> &str {
		self.secret.expose()
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
