//! Uniform transfer results handed across the facade boundary.
//!
//! Workflows never leak raw errors to the routing layer: every internal failure is
//! folded into [`TransferResult::Failure`] carrying the location, the taxonomy kind,
//! and a human-readable message, so callers handle all failure causes the same way.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, api, error::ErrorKind};

/// Delivery payload of a successful transfer.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Delivery {
	/// Upload accepted; carries the upstream `data` payload.
	Uploaded {
		/// Decoded (or synthesized) response data.
		data: serde_json::Value,
	},
	/// Download written to disk.
	#[serde(rename_all = "camelCase")]
	Saved {
		/// Upstream file identifier that was fetched.
		file_id: String,
		/// Destination the bytes were written to.
		save_path: PathBuf,
	},
}

/// Fully populated success payload.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSuccess {
	/// Location the transfer targeted.
	pub location_id: i64,
	/// What was delivered and where.
	pub delivery: Delivery,
	/// Human-readable confirmation.
	pub message: String,
}

/// Fully populated failure payload.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFailure {
	/// Location the transfer targeted.
	pub location_id: i64,
	/// Taxonomy label of the underlying error.
	pub kind: ErrorKind,
	/// Human-readable description of the failure.
	pub message: String,
}

/// Outcome of a single transfer; exactly one variant, never partially populated.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum TransferResult {
	/// The transfer completed.
	Success(TransferSuccess),
	/// The transfer terminated; for downloads the file at `save_path` must not be
	/// trusted.
	Failure(TransferFailure),
}
impl TransferResult {
	/// Returns `true` for the success variant.
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	/// Returns the success payload, if any.
	pub fn success(&self) -> Option<&TransferSuccess> {
		match self {
			Self::Success(success) => Some(success),
			Self::Failure(_) => None,
		}
	}

	/// Returns the failure payload, if any.
	pub fn failure(&self) -> Option<&TransferFailure> {
		match self {
			Self::Success(_) => None,
			Self::Failure(failure) => Some(failure),
		}
	}

	/// Folds an internal error into a uniform failure result.
	pub(crate) fn from_error(location_id: i64, error: &Error) -> Self {
		let message = match error {
			// Surface the upstream envelope's message field when there is one.
			Error::Http { status, body } =>
				format!("Upstream API returned HTTP {status}: {}.", api::error_message(body)),
			other => other.to_string(),
		};

		Self::Failure(TransferFailure { location_id, kind: error.kind(), message })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ResponseShapeError;

	#[test]
	fn http_failures_carry_the_envelope_message() {
		let error =
			Error::Http { status: 500, body: r#"{"message": "storage offline"}"#.to_owned() };
		let result = TransferResult::from_error(432078, &error);
		let failure = result.failure().expect("HTTP errors should fold into failures.");

		assert_eq!(failure.location_id, 432078);
		assert_eq!(failure.kind, ErrorKind::Http);
		assert!(failure.message.contains("storage offline"));
	}

	#[test]
	fn shape_failures_keep_their_message() {
		let error = Error::from(ResponseShapeError::MissingDownloadUrl);
		let result = TransferResult::from_error(7, &error);
		let failure = result.failure().expect("Shape errors should fold into failures.");

		assert_eq!(failure.kind, ErrorKind::ResponseShape);
		assert!(failure.message.contains("No download_url"));
		assert!(!result.is_success());
	}

	#[test]
	fn results_serialize_with_a_status_tag() {
		let result = TransferResult::Success(TransferSuccess {
			location_id: 1,
			delivery: Delivery::Saved { file_id: "f-1".into(), save_path: "/tmp/f".into() },
			message: "File downloaded successfully".into(),
		});
		let value = serde_json::to_value(&result).expect("Results should serialize.");

		assert_eq!(value["status"], "success");
		assert_eq!(value["locationId"], 1);
		assert_eq!(value["delivery"]["saved"]["fileId"], "f-1");
	}
}
