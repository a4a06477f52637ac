//! Fixed wire contract of the upstream LOS collateral API: endpoint paths, response
//! envelopes, and the tolerant parsers the workflows rely on.
//!
//! Nothing here is owned by this crate; the shapes mirror what the upstream actually
//! returns, including its inconsistencies (token payloads nested under `data` or not,
//! error envelopes carrying `message` or `meta.reason`).

// self
use crate::{
	_prelude::*,
	error::{AuthError, ResponseShapeError},
};

/// Path segments of the client-credentials token endpoint.
pub(crate) fn token_endpoint() -> Vec<String> {
	segments(["v1", "los", "oauth", "token"])
}

/// Path segments of the multipart upload endpoint for a location/actor pair.
pub(crate) fn upload_endpoint(location_id: i64, uploaded_by: &str) -> Vec<String> {
	let mut path = segments(["v1", "los", "files", "upload", "locationId"]);

	path.push(location_id.to_string());
	path.push("uploadedBy".into());
	path.push(uploaded_by.into());

	path
}

/// Path segments of the request-for-download endpoint.
pub(crate) fn request_for_download_endpoint(
	location_id: i64,
	file_id: &str,
	requested_by: &str,
) -> Vec<String> {
	let mut path = segments(["v1", "los", "file", "request-for-download", "locationId"]);

	path.push(location_id.to_string());
	path.push("fileId".into());
	path.push(file_id.into());
	path.push("requestedBy".into());
	path.push(requested_by.into());

	path
}

fn segments<const N: usize>(parts: [&str; N]) -> Vec<String> {
	parts.iter().map(|part| (*part).to_owned()).collect()
}

/// Fields extracted from a successful token grant response.
#[derive(Clone, Debug)]
pub(crate) struct TokenGrant {
	pub access_token: String,
	pub expires_in: i64,
}

/// Extracts the grant fields, preferring the `data`-nested shape over the flat one.
///
/// The upstream has shipped both `{access_token, expires_in}` and
/// `{data: {access_token, expires_in}}` over time; neither yielding both fields is a
/// hard failure.
pub(crate) fn parse_token_grant(value: &serde_json::Value) -> Result<TokenGrant, AuthError> {
	match value.get("data") {
		Some(nested) => grant_fields(nested).or_else(|_| grant_fields(value)),
		None => grant_fields(value),
	}
}

fn grant_fields(section: &serde_json::Value) -> Result<TokenGrant, AuthError> {
	let access_token = section
		.get("access_token")
		.and_then(serde_json::Value::as_str)
		.ok_or(AuthError::MissingField { field: "access_token" })?
		.to_owned();
	let expires_in = section
		.get("expires_in")
		.and_then(serde_json::Value::as_i64)
		.ok_or(AuthError::MissingField { field: "expires_in" })?;

	Ok(TokenGrant { access_token, expires_in })
}

/// Pulls the short-lived download URL out of a request-for-download ticket.
pub(crate) fn extract_download_url(body: &[u8]) -> Result<Url, ResponseShapeError> {
	let value: serde_json::Value =
		serde_json::from_slice(body).map_err(|source| ResponseShapeError::NotJson { source })?;
	let ticket = value.as_object().ok_or(ResponseShapeError::NotAnObject)?;
	let raw = ticket
		.get("download_url")
		.and_then(serde_json::Value::as_str)
		.ok_or(ResponseShapeError::MissingDownloadUrl)?;

	Url::parse(raw).map_err(|source| ResponseShapeError::InvalidDownloadUrl { source })
}

/// Extracts a human-readable message from an error envelope, falling back to raw text.
pub(crate) fn error_message(body: &str) -> String {
	serde_json::from_str::<serde_json::Value>(body)
		.ok()
		.and_then(|value| Some(value.get("message")?.as_str()?.to_owned()))
		.unwrap_or_else(|| body.to_owned())
}

/// Extracts the grant rejection reason from a `{meta: {reason}}` envelope, falling back
/// to raw text.
pub(crate) fn grant_rejection_reason(body: &str) -> String {
	serde_json::from_str::<serde_json::Value>(body)
		.ok()
		.and_then(|value| Some(value.get("meta")?.get("reason")?.as_str()?.to_owned()))
		.unwrap_or_else(|| body.to_owned())
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn endpoint_paths_match_the_upstream_contract() {
		assert_eq!(token_endpoint().join("/"), "v1/los/oauth/token");
		assert_eq!(
			upload_endpoint(432078, "user@example.com").join("/"),
			"v1/los/files/upload/locationId/432078/uploadedBy/user@example.com",
		);
		assert_eq!(
			request_for_download_endpoint(432078, "file-7", "user@example.com").join("/"),
			"v1/los/file/request-for-download/locationId/432078/fileId/file-7/requestedBy/user@example.com",
		);
	}

	#[test]
	fn token_grant_accepts_both_shapes() {
		let flat = json!({"access_token": "flat-token", "expires_in": 3600});
		let nested = json!({"data": {"access_token": "nested-token", "expires_in": 900}});
		let flat_grant = parse_token_grant(&flat).expect("Flat grant shape should parse.");
		let nested_grant = parse_token_grant(&nested).expect("Nested grant shape should parse.");

		assert_eq!(flat_grant.access_token, "flat-token");
		assert_eq!(flat_grant.expires_in, 3600);
		assert_eq!(nested_grant.access_token, "nested-token");
		assert_eq!(nested_grant.expires_in, 900);
	}

	#[test]
	fn token_grant_falls_back_from_malformed_nesting() {
		let value = json!({"data": {"token_type": "bearer"}, "access_token": "t", "expires_in": 60});
		let grant = parse_token_grant(&value)
			.expect("Flat fields should be used when the nested shape is incomplete.");

		assert_eq!(grant.access_token, "t");
	}

	#[test]
	fn token_grant_rejects_missing_fields() {
		let missing_token = json!({"expires_in": 3600});
		let missing_expiry = json!({"data": {"access_token": "t"}});

		assert!(matches!(
			parse_token_grant(&missing_token),
			Err(AuthError::MissingField { field: "access_token" }),
		));
		assert!(matches!(
			parse_token_grant(&missing_expiry),
			Err(AuthError::MissingField { field: "access_token" }),
		));
	}

	#[test]
	fn download_ticket_shapes() {
		let ok = extract_download_url(br#"{"download_url": "https://blobs.example.com/f/7"}"#)
			.expect("Valid ticket should yield a URL.");

		assert_eq!(ok.as_str(), "https://blobs.example.com/f/7");
		assert!(matches!(
			extract_download_url(b"[1, 2, 3]"),
			Err(ResponseShapeError::NotAnObject),
		));
		assert!(matches!(
			extract_download_url(br#"{"status": "ok"}"#),
			Err(ResponseShapeError::MissingDownloadUrl),
		));
		assert!(matches!(extract_download_url(b"not json"), Err(ResponseShapeError::NotJson { .. })));
		assert!(matches!(
			extract_download_url(br#"{"download_url": "not a url"}"#),
			Err(ResponseShapeError::InvalidDownloadUrl { .. }),
		));
	}

	#[test]
	fn error_envelopes_fall_back_to_raw_text() {
		assert_eq!(error_message(r#"{"message": "quota exceeded"}"#), "quota exceeded");
		assert_eq!(error_message("plain failure"), "plain failure");
		assert_eq!(
			grant_rejection_reason(r#"{"meta": {"reason": "bad client"}}"#),
			"bad client",
		);
		assert_eq!(grant_rejection_reason(r#"{"error": "x"}"#), r#"{"error": "x"}"#);
	}
}
