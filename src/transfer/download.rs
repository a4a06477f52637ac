//! Two-step download workflow: trade the file id for a signed URL, then stream the
//! bytes to disk.

// std
use std::{fs, io::Write};
// self
use crate::{
	_prelude::*,
	api,
	http::{ApiRequest, Target},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	transfer::{Bridge, Delivery, DownloadRequest, TransferResult, TransferSuccess},
};

impl Bridge {
	/// Downloads a file via the request-for-download ticket exchange.
	///
	/// The call always resolves to a [`TransferResult`]. A failure after step 2 has
	/// begun leaves any partially written file in place; an error result means the file
	/// at `save_path` must not be trusted. There are no retries; retry policy belongs
	/// to the caller.
	pub async fn download_file(&self, request: DownloadRequest) -> TransferResult {
		const KIND: OperationKind = OperationKind::Download;

		let span = OperationSpan::new(KIND, "download_file");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let location_id = request.location_id;

		match span.instrument(self.download_inner(request)).await {
			Ok(success) => {
				obs::record_operation_outcome(KIND, OperationOutcome::Success);

				TransferResult::Success(success)
			},
			Err(error) => {
				obs::record_operation_outcome(KIND, OperationOutcome::Failure);

				TransferResult::from_error(location_id, &error)
			},
		}
	}

	async fn download_inner(&self, request: DownloadRequest) -> Result<TransferSuccess> {
		request.validate()?;

		if let Some(parent) = request.save_path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent)?;
		}

		// Step 1: trade the file id for a short-lived signed URL.
		let endpoint = api::request_for_download_endpoint(
			request.location_id,
			&request.file_id,
			&request.requested_by,
		);
		let body = serde_json::json!({
			"locationId": request.location_id.to_string(),
			"fileId": request.file_id,
			"requestedBy": request.requested_by,
		});
		let ticket = self
			.executor
			.execute(ApiRequest::post(Target::Relative(endpoint)).json(body))
			.await?;
		let download_url = api::extract_download_url(&ticket.body)?;
		// Step 2: fetch the bytes from the signed URL, which may live on a different
		// host, writing chunks as they arrive so large files never sit in memory.
		let mut response = self
			.executor
			.execute_streaming(ApiRequest::get(Target::Absolute(download_url)))
			.await?;

		{
			let mut file = fs::File::create(&request.save_path)?;

			while let Some(chunk) = response.chunk().await? {
				file.write_all(&chunk)?;
			}

			file.flush()?;
		}

		Ok(TransferSuccess {
			location_id: request.location_id,
			delivery: Delivery::Saved {
				file_id: request.file_id,
				save_path: request.save_path,
			},
			message: "File downloaded successfully".into(),
		})
	}
}
