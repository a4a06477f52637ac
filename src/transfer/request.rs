//! Transfer request descriptions, their builders, and input validation.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, error::ValidationError};

/// Optional document metadata forwarded with an upload.
///
/// Structured fields are rendered to strings before inclusion; absent fields are
/// omitted from the multipart form entirely, never sent as empty or null values.
#[derive(Clone, Debug, Default)]
pub struct DocumentMetadata {
	/// `preparedBy` form field.
	pub prepared_by: Option<String>,
	/// `reportTitle` form field.
	pub report_title: Option<String>,
	/// `reportDate` form field (upstream expects `YYYY-MM-DD`).
	pub report_date: Option<String>,
	/// `serviceGroups` entries, one form field per element.
	pub service_groups: Option<Vec<serde_json::Value>>,
	/// `serviceTypes` entries, one form field per element.
	pub service_types: Option<Vec<serde_json::Value>>,
	/// `documentTypes` entries, one form field per element.
	pub document_types: Option<Vec<serde_json::Value>>,
	/// `documentStatus` form field.
	pub document_status: Option<serde_json::Value>,
}
impl DocumentMetadata {
	pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
		let mut fields = Vec::new();

		if let Some(value) = &self.prepared_by {
			fields.push(("preparedBy", value.clone()));
		}
		if let Some(value) = &self.report_title {
			fields.push(("reportTitle", value.clone()));
		}
		if let Some(value) = &self.report_date {
			fields.push(("reportDate", value.clone()));
		}
		if let Some(values) = &self.service_groups {
			fields.extend(values.iter().map(|value| ("serviceGroups", stringify(value))));
		}
		if let Some(values) = &self.service_types {
			fields.extend(values.iter().map(|value| ("serviceTypes", stringify(value))));
		}
		if let Some(values) = &self.document_types {
			fields.extend(values.iter().map(|value| ("documentTypes", stringify(value))));
		}
		if let Some(value) = &self.document_status {
			fields.push(("documentStatus", stringify(value)));
		}

		fields
	}
}

// Bare strings stay as-is; structured values are rendered as compact JSON.
fn stringify(value: &serde_json::Value) -> String {
	match value {
		serde_json::Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

/// Description of a single multipart upload.
#[derive(Clone, Debug)]
pub struct UploadRequest {
	/// Target location identifier; must be positive.
	pub location_id: i64,
	/// Actor recorded as the uploader; must be non-empty.
	pub uploaded_by: String,
	/// Local source file read fully into memory for the POST.
	pub file_path: PathBuf,
	/// Overrides the display filename derived from the source file's base name.
	pub display_filename: Option<String>,
	/// Optional document metadata.
	pub metadata: DocumentMetadata,
}
impl UploadRequest {
	/// Creates an upload request for the location/actor/file triple.
	pub fn new(
		location_id: i64,
		uploaded_by: impl Into<String>,
		file_path: impl Into<PathBuf>,
	) -> Self {
		Self {
			location_id,
			uploaded_by: uploaded_by.into(),
			file_path: file_path.into(),
			display_filename: None,
			metadata: DocumentMetadata::default(),
		}
	}

	/// Overrides the display filename.
	pub fn display_filename(mut self, name: impl Into<String>) -> Self {
		self.display_filename = Some(name.into());

		self
	}

	/// Sets the `preparedBy` metadata field.
	pub fn prepared_by(mut self, value: impl Into<String>) -> Self {
		self.metadata.prepared_by = Some(value.into());

		self
	}

	/// Sets the `reportTitle` metadata field.
	pub fn report_title(mut self, value: impl Into<String>) -> Self {
		self.metadata.report_title = Some(value.into());

		self
	}

	/// Sets the `reportDate` metadata field.
	pub fn report_date(mut self, value: impl Into<String>) -> Self {
		self.metadata.report_date = Some(value.into());

		self
	}

	/// Sets the `serviceGroups` metadata entries.
	pub fn service_groups(mut self, values: Vec<serde_json::Value>) -> Self {
		self.metadata.service_groups = Some(values);

		self
	}

	/// Sets the `serviceTypes` metadata entries.
	pub fn service_types(mut self, values: Vec<serde_json::Value>) -> Self {
		self.metadata.service_types = Some(values);

		self
	}

	/// Sets the `documentTypes` metadata entries.
	pub fn document_types(mut self, values: Vec<serde_json::Value>) -> Self {
		self.metadata.document_types = Some(values);

		self
	}

	/// Sets the `documentStatus` metadata field.
	pub fn document_status(mut self, value: serde_json::Value) -> Self {
		self.metadata.document_status = Some(value);

		self
	}

	/// Returns the filename sent upstream: the explicit override or the source base
	/// name.
	pub(crate) fn effective_filename(&self) -> String {
		self.display_filename.clone().unwrap_or_else(|| {
			self.file_path
				.file_name()
				.map(|name| name.to_string_lossy().into_owned())
				.unwrap_or_else(|| "file".into())
		})
	}

	pub(crate) fn validate(&self) -> Result<(), ValidationError> {
		validate_location_id(self.location_id)?;
		validate_actor("uploadedBy", &self.uploaded_by)?;

		if !self.file_path.is_file() {
			return Err(ValidationError::FileNotFound {
				path: self.file_path.display().to_string(),
			});
		}

		Ok(())
	}
}

/// Description of a single two-step download.
#[derive(Clone, Debug)]
pub struct DownloadRequest {
	/// Source location identifier; must be positive.
	pub location_id: i64,
	/// Upstream file identifier; must be non-empty.
	pub file_id: String,
	/// Actor recorded as the requester; must be non-empty.
	pub requested_by: String,
	/// Destination path; parent directories are created as needed.
	pub save_path: PathBuf,
}
impl DownloadRequest {
	/// Creates a download request for the location/file/actor/destination tuple.
	pub fn new(
		location_id: i64,
		file_id: impl Into<String>,
		requested_by: impl Into<String>,
		save_path: impl Into<PathBuf>,
	) -> Self {
		Self {
			location_id,
			file_id: file_id.into(),
			requested_by: requested_by.into(),
			save_path: save_path.into(),
		}
	}

	pub(crate) fn validate(&self) -> Result<(), ValidationError> {
		validate_location_id(self.location_id)?;
		validate_actor("requestedBy", &self.requested_by)?;
		validate_actor("fileId", &self.file_id)?;

		Ok(())
	}
}

pub(crate) fn validate_location_id(value: i64) -> Result<(), ValidationError> {
	if value > 0 { Ok(()) } else { Err(ValidationError::InvalidLocationId { value }) }
}

pub(crate) fn validate_actor(field: &'static str, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() { Err(ValidationError::EmptyField { field }) } else { Ok(()) }
}
