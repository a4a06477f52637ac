// std
use std::io::Write;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use collateral_bridge::{
	_preludet::*,
	error::ErrorKind,
	transfer::{Delivery, UploadRequest},
};

const TOKEN_PATH: &str = "/v1/los/oauth/token";
const UPLOAD_PATH: &str = "/v1/los/files/upload/locationId/432078/uploadedBy/user@example.com";

fn write_fixture_pdf() -> tempfile::NamedTempFile {
	let mut file = tempfile::Builder::new()
		.prefix("survey-report-")
		.suffix(".pdf")
		.tempfile()
		.expect("Fixture file should be created.");

	file.write_all(b"%PDF-1.4 fixture bytes").expect("Fixture file should be writable.");

	file
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"upload-token","expires_in":1800}"#);
		})
		.await
}

#[tokio::test]
async fn upload_success_returns_the_data_payload() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(UPLOAD_PATH)
				.header("authorization", "Bearer upload-token")
				.body_includes("432078")
				.body_includes("user@example.com");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"data":{"message":"ok","fileId":"f-881"}}"#);
		})
		.await;
	let bridge = build_test_bridge(&server.base_url());
	let file = write_fixture_pdf();
	let result =
		bridge.upload_file(UploadRequest::new(432078, "user@example.com", file.path())).await;
	let success = result.success().expect("A 200 upload should succeed.");

	assert_eq!(success.location_id, 432078);
	assert_eq!(success.message, "File uploaded successfully");

	match &success.delivery {
		Delivery::Uploaded { data } => {
			assert_eq!(data["message"], "ok");
			assert_eq!(data["fileId"], "f-881");
		},
		other => panic!("Unexpected delivery variant: {other:?}."),
	}

	mock.assert_async().await;
}

#[tokio::test]
async fn upload_sends_stringified_metadata_fields() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(UPLOAD_PATH)
				.body_includes("Quarterly Survey")
				.body_includes(r#"{"id":1,"name":"Test Group"}"#)
				.body_includes("renamed.pdf");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"data":{"message":"ok"}}"#);
		})
		.await;
	let bridge = build_test_bridge(&server.base_url());
	let file = write_fixture_pdf();
	let request = UploadRequest::new(432078, "user@example.com", file.path())
		.display_filename("renamed.pdf")
		.report_title("Quarterly Survey")
		.service_groups(vec![json!({"id": 1, "name": "Test Group"})]);
	let result = bridge.upload_file(request).await;

	assert!(result.is_success());

	mock.assert_async().await;
}

#[tokio::test]
async fn upload_tolerates_non_json_success_body() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(UPLOAD_PATH);
			then.status(200).body("accepted");
		})
		.await;
	let bridge = build_test_bridge(&server.base_url());
	let file = write_fixture_pdf();
	let result =
		bridge.upload_file(UploadRequest::new(432078, "user@example.com", file.path())).await;
	let success = result.success().expect("A 200 with a plain-text body should still succeed.");

	// The payload is synthesized from the known inputs when the body is not JSON.
	match &success.delivery {
		Delivery::Uploaded { data } => {
			assert_eq!(data["locationId"], 432078);
			assert_eq!(data["uploadedBy"], "user@example.com");
		},
		other => panic!("Unexpected delivery variant: {other:?}."),
	}
}

#[tokio::test]
async fn upload_failure_carries_the_server_message() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(UPLOAD_PATH);
			then.status(500)
				.header("content-type", "application/json")
				.body(r#"{"message":"storage offline"}"#);
		})
		.await;
	let bridge = build_test_bridge(&server.base_url());
	let file = write_fixture_pdf();
	let result =
		bridge.upload_file(UploadRequest::new(432078, "user@example.com", file.path())).await;
	let failure = result.failure().expect("A 500 upload should fail.");

	assert_eq!(failure.location_id, 432078);
	assert_eq!(failure.kind, ErrorKind::Http);
	assert!(failure.message.contains("500"));
	assert!(failure.message.contains("storage offline"));
}

#[tokio::test]
async fn invalid_inputs_fail_without_any_network_call() {
	let server = MockServer::start_async().await;
	let catch_all = server
		.mock_async(|when, then| {
			when.any_request();
			then.status(200);
		})
		.await;
	let bridge = build_test_bridge(&server.base_url());
	let file = write_fixture_pdf();

	for location_id in [0, -1, -432078] {
		let result = bridge
			.upload_file(UploadRequest::new(location_id, "user@example.com", file.path()))
			.await;
		let failure = result.failure().expect("A non-positive location id should fail.");

		assert_eq!(failure.kind, ErrorKind::Validation);
		assert_eq!(failure.location_id, location_id);
	}
	for actor in ["", "   "] {
		let result = bridge.upload_file(UploadRequest::new(432078, actor, file.path())).await;
		let failure = result.failure().expect("An empty actor id should fail.");

		assert_eq!(failure.kind, ErrorKind::Validation);
	}

	let missing = bridge
		.upload_file(UploadRequest::new(432078, "user@example.com", "/nonexistent/report.pdf"))
		.await;

	assert_eq!(
		missing.failure().expect("A missing source file should fail.").kind,
		ErrorKind::Validation,
	);

	catch_all.assert_calls_async(0).await;
}

#[tokio::test]
async fn throttle_denial_is_terminal_and_skips_the_network() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let upload = server
		.mock_async(|when, then| {
			when.method(POST).path(UPLOAD_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"data":{"message":"ok"}}"#);
		})
		.await;
	let bridge = build_test_bridge_with_limit(&server.base_url(), 1, 60);
	let file = write_fixture_pdf();
	let first =
		bridge.upload_file(UploadRequest::new(432078, "user@example.com", file.path())).await;

	assert!(first.is_success());

	let second =
		bridge.upload_file(UploadRequest::new(432078, "user@example.com", file.path())).await;
	let failure = second.failure().expect("A throttled upload should fail.");

	assert_eq!(failure.kind, ErrorKind::RateLimit);
	assert!(failure.message.contains("rate limit"));

	// The denied call never reached the upload endpoint.
	upload.assert_calls_async(1).await;
}
