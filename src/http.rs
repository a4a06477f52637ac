//! Transport layer wrapping [`ReqwestClient`] behind the bridge's request/response types.
//!
//! The executor resolves relative endpoints against the configured base URL, passes
//! server-supplied absolute URLs through untouched (the second leg of a download may
//! point at a different host, e.g. object storage), injects the bearer token through a
//! [`BearerSource`], and normalizes failures into the crate taxonomy. The token grant
//! call is recognized by the `grant_type` form key and never receives a bearer header,
//! which keeps the executor and the token manager from recursing into each other.

// crates.io
use reqwest::{Method, Response};
// self
use crate::{
	_prelude::*,
	config::{ConfigError, FacadeConfig},
	error::ValidationError,
};

/// Boxed future returned by [`BearerSource::bearer`].
pub type BearerFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + 'a + Send>>;

/// Supplies the bearer value injected into authorized requests.
///
/// The trait is the executor's only knowledge of token management; the token manager
/// implements it, and its own grant call runs through an executor clone with no source
/// attached.
pub trait BearerSource
where
	Self: Send + Sync,
{
	/// Returns a currently valid bearer value, refreshing it if necessary.
	fn bearer(&self) -> BearerFuture<'_>;
}

/// Request target, either resolved against the base URL or passed through verbatim.
#[derive(Debug)]
pub enum Target {
	/// Endpoint path segments appended to the base URL (segments are percent-encoded).
	Relative(Vec<String>),
	/// Server-supplied absolute URL used as-is.
	Absolute(Url),
}

/// Request body variants the upstream API consumes.
pub enum Payload {
	/// No body.
	Empty,
	/// `application/x-www-form-urlencoded` key/value pairs.
	Form(Vec<(String, String)>),
	/// JSON document.
	Json(serde_json::Value),
	/// Multipart form carrying text fields and a file part.
	Multipart(reqwest::multipart::Form),
}
impl Debug for Payload {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Empty => f.write_str("Empty"),
			Self::Form(fields) => f.debug_tuple("Form").field(&fields.len()).finish(),
			Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
			Self::Multipart(_) => f.write_str("Multipart(..)"),
		}
	}
}

/// Outbound request description consumed by [`RequestExecutor::execute`].
#[derive(Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Request target.
	pub target: Target,
	/// Extra headers; an `Authorization` entry here suppresses bearer injection.
	pub headers: Vec<(String, String)>,
	/// Request body.
	pub payload: Payload,
}
impl ApiRequest {
	/// Creates a GET request for the target.
	pub fn get(target: Target) -> Self {
		Self { method: Method::GET, target, headers: Vec::new(), payload: Payload::Empty }
	}

	/// Creates a POST request for the target.
	pub fn post(target: Target) -> Self {
		Self { method: Method::POST, target, headers: Vec::new(), payload: Payload::Empty }
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Attaches a form-encoded body.
	pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
		self.payload = Payload::Form(fields);

		self
	}

	/// Attaches a JSON body.
	pub fn json(mut self, value: serde_json::Value) -> Self {
		self.payload = Payload::Json(value);

		self
	}

	/// Attaches a multipart body.
	pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
		self.payload = Payload::Multipart(form);

		self
	}

	fn has_authorization(&self) -> bool {
		self.headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("authorization"))
	}

	fn is_token_grant(&self) -> bool {
		matches!(&self.payload, Payload::Form(fields) if fields.iter().any(|(key, _)| key == "grant_type"))
	}
}

/// Buffered response returned by [`RequestExecutor::execute`].
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code (always 2xx; failures become [`Error::Http`]).
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns the body as lossily decoded text.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Executes outbound calls with fixed connect/read timeouts and normalized errors.
#[derive(Clone)]
pub struct RequestExecutor {
	client: ReqwestClient,
	base_url: Url,
	bearer_source: Option<Arc<dyn BearerSource>>,
}
impl RequestExecutor {
	/// Builds an executor from the validated configuration, with no bearer source.
	pub(crate) fn new(config: &FacadeConfig) -> Result<Self, ConfigError> {
		// The deadline covers connecting and reading between bytes, not the whole body;
		// a streaming download may outlive it as long as bytes keep arriving.
		let timeout = StdDuration::from_secs(config.timeout_secs);
		let client =
			ReqwestClient::builder().connect_timeout(timeout).read_timeout(timeout).build()?;

		Ok(Self { client, base_url: config.base_url.clone(), bearer_source: None })
	}

	/// Attaches the bearer source consulted for authorized requests.
	pub(crate) fn with_bearer_source(mut self, source: Arc<dyn BearerSource>) -> Self {
		self.bearer_source = Some(source);

		self
	}

	/// Executes the request and buffers the response body.
	pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
		let response = self.dispatch(request).await?;
		let status = response.status();
		let body = response.bytes().await?;

		if !status.is_success() {
			return Err(Error::Http {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		Ok(ApiResponse { status: status.as_u16(), body: body.to_vec() })
	}

	/// Executes the request and hands back the live response for chunked consumption.
	pub async fn execute_streaming(&self, request: ApiRequest) -> Result<Response> {
		let response = self.dispatch(request).await?;
		let status = response.status();

		if !status.is_success() {
			let body = response.bytes().await.unwrap_or_default();

			return Err(Error::Http {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		Ok(response)
	}

	async fn dispatch(&self, request: ApiRequest) -> Result<Response> {
		let url = self.resolve(&request.target)?;
		let inject_bearer = !request.has_authorization() && !request.is_token_grant();
		let mut builder = self.client.request(request.method, url);

		for (name, value) in &request.headers {
			builder = builder.header(name, value);
		}
		if inject_bearer && let Some(source) = &self.bearer_source {
			builder = builder.bearer_auth(source.bearer().await?);
		}

		builder = match request.payload {
			Payload::Empty => builder,
			Payload::Form(fields) => builder.form(&fields),
			Payload::Json(value) => builder.json(&value),
			Payload::Multipart(form) => builder.multipart(form),
		};

		Ok(builder.send().await?)
	}

	fn resolve(&self, target: &Target) -> Result<Url, ValidationError> {
		match target {
			Target::Relative(segments) => {
				let mut url = self.base_url.clone();

				url.path_segments_mut()
					.map_err(|()| ValidationError::InvalidBaseUrl {
						base: self.base_url.to_string(),
					})?
					.pop_if_empty()
					.extend(segments);

				Ok(url)
			},
			Target::Absolute(url) => Ok(url.clone()),
		}
	}
}
impl Debug for RequestExecutor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestExecutor")
			.field("base_url", &self.base_url.as_str())
			.field("bearer_source_set", &self.bearer_source.is_some())
			.finish()
	}
}
