//! Cached client-credentials token manager with a singleflight refresh guard.
//!
//! [`TokenManager::bearer_token`] returns the cached value while it is valid and only
//! contacts the token endpoint when the cache is empty or expired. The refresh runs
//! under an async mutex with a re-check after acquisition, so concurrent callers racing
//! past an expired cache piggy-back on one grant request instead of stampeding the
//! endpoint.

// self
use crate::{
	_prelude::*,
	api,
	auth::{AccessToken, Secret},
	config::FacadeConfig,
	error::AuthError,
	http::{ApiRequest, BearerFuture, BearerSource, RequestExecutor, Target},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

const GRANT_TYPE: &str = "client_credentials";

/// Owns the cached bearer token and performs the client-credentials grant.
pub struct TokenManager {
	executor: RequestExecutor,
	client_id: String,
	client_secret: Secret,
	scope: String,
	cached: Mutex<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
}
impl TokenManager {
	/// Creates a manager backed by an executor with no bearer source attached.
	pub(crate) fn new(executor: RequestExecutor, config: &FacadeConfig) -> Self {
		Self {
			executor,
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
			scope: config.scope.clone(),
			cached: Mutex::new(None),
			refresh_guard: AsyncMutex::new(()),
		}
	}

	/// Returns a currently valid bearer value, refreshing it at most once under races.
	pub async fn bearer_token(&self) -> Result<String, AuthError> {
		if let Some(value) = self.cached_value_at(OffsetDateTime::now_utc()) {
			return Ok(value);
		}

		let _refresh = self.refresh_guard.lock().await;

		// Re-check under the guard: a concurrent caller may have refreshed while this
		// one waited for the lock.
		if let Some(value) = self.cached_value_at(OffsetDateTime::now_utc()) {
			return Ok(value);
		}

		const KIND: OperationKind = OperationKind::TokenGrant;

		let span = OperationSpan::new(KIND, "bearer_token");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.request_grant()).await;

		match result {
			Ok(token) => {
				obs::record_operation_outcome(KIND, OperationOutcome::Success);

				let value = token.expose().to_owned();

				*self.cached.lock() = Some(token);

				Ok(value)
			},
			Err(error) => {
				obs::record_operation_outcome(KIND, OperationOutcome::Failure);

				Err(error)
			},
		}
	}

	fn cached_value_at(&self, instant: OffsetDateTime) -> Option<String> {
		self.cached
			.lock()
			.as_ref()
			.filter(|token| !token.is_expired_at(instant))
			.map(|token| token.expose().to_owned())
	}

	async fn request_grant(&self) -> Result<AccessToken, AuthError> {
		let form = vec![
			("grant_type".into(), GRANT_TYPE.into()),
			("client_id".into(), self.client_id.clone()),
			("client_secret".into(), self.client_secret.expose().to_owned()),
			("scope".into(), self.scope.clone()),
		];
		// The grant_type form key marks this as the grant call, so the executor never
		// tries to inject a bearer header into it.
		let request = ApiRequest::post(Target::Relative(api::token_endpoint())).form(form);
		let response = self.executor.execute(request).await.map_err(|error| match error {
			Error::Http { status, body } =>
				AuthError::GrantRejected { status, reason: api::grant_rejection_reason(&body) },
			Error::Network { source } => AuthError::Transport { source },
			other => AuthError::Transport { source: Box::new(other) },
		})?;
		let deserializer = &mut serde_json::Deserializer::from_slice(&response.body);
		let value: serde_json::Value = serde_path_to_error::deserialize(deserializer)
			.map_err(|source| AuthError::ResponseParse { source })?;
		let grant = api::parse_token_grant(&value)?;

		if grant.expires_in <= 0 {
			return Err(AuthError::NonPositiveExpiresIn);
		}

		Ok(AccessToken::new(
			grant.access_token,
			OffsetDateTime::now_utc(),
			Duration::seconds(grant.expires_in),
		))
	}
}
impl BearerSource for TokenManager {
	fn bearer(&self) -> BearerFuture<'_> {
		Box::pin(async move { self.bearer_token().await.map_err(Error::from) })
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("client_id", &self.client_id)
			.field("scope", &self.scope)
			.field("token_cached", &self.cached.lock().is_some())
			.finish()
	}
}
