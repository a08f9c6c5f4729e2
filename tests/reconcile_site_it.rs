#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use xiqse_client::{
	client::ReqwestProviderClient,
	config::{ConnectionConfig, Scheme},
	error::{Error, ReconciliationError},
	nbi,
	resource::{DesiredState, MutationAction},
};

const SITE_PATH: &str = "/World/test";

fn build_client(server: &MockServer) -> ReqwestProviderClient {
	let config = ConnectionConfig::builder(server.host())
		.scheme(Scheme::Http)
		.port(server.port())
		.credentials("abc", "xyz")
		.build()
		.expect("Connection config should be valid for the mock server.");

	ReqwestProviderClient::new(config).expect("Reqwest client should build for the mock server.")
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token/access-token");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"access_token": "tok123"
			}));
		})
		.await
}

async fn mock_graphql<'a>(server: &'a MockServer, marker: &str, body: Value) -> httpmock::Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/nbi/graphql")
				.header("authorization", "Bearer tok123")
				.body_includes(marker);
			then.status(200).header("content-type", "application/json").json_body(body);
		})
		.await
}

fn site_found() -> Value {
	json!({ "data": { "network": { "siteByLocation": {
		"location": SITE_PATH, "siteId": "42", "siteName": "test"
	} } } })
}

fn site_missing() -> Value {
	json!({ "data": { "network": { "siteByLocation": null } } })
}

#[tokio::test]
async fn present_creates_a_missing_site() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let read = mock_graphql(&server, "siteByLocation", site_missing()).await;
	let create = mock_graphql(
		&server,
		"createSite",
		json!({ "data": { "network": { "createSite": {
			"status": "SUCCESS", "siteId": "42", "siteLocation": SITE_PATH, "errorCode": null
		} } } }),
	)
	.await;
	let mut client = build_client(&server);
	let descriptor = nbi::site(SITE_PATH).expect("Site descriptor should build.");
	let result = client
		.reconcile(DesiredState::Present, &descriptor)
		.await
		.expect("Creating a missing site should succeed.");

	assert!(result.changed);
	assert_eq!(result.current, Some(json!({ "location": SITE_PATH, "siteId": "42" })));
	assert_eq!(result.message, "Site /World/test created.");

	token.assert_calls_async(1).await;
	read.assert_calls_async(1).await;
	create.assert_calls_async(1).await;
}

#[tokio::test]
async fn present_leaves_an_existing_site_alone() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let read = mock_graphql(&server, "siteByLocation", site_found()).await;
	let create = mock_graphql(&server, "createSite", json!({ "data": null })).await;
	let mut client = build_client(&server);
	let descriptor = nbi::site(SITE_PATH).expect("Site descriptor should build.");
	let result = client
		.reconcile(DesiredState::Present, &descriptor)
		.await
		.expect("An existing site should be reported.");

	assert!(!result.changed);
	assert_eq!(result.current, Some(json!({ "location": SITE_PATH, "siteId": "42" })));

	read.assert_calls_async(1).await;
	create.assert_calls_async(0).await;
}

#[tokio::test]
async fn present_then_present_is_idempotent() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let read_missing = mock_graphql(&server, "siteByLocation", site_missing()).await;
	let create = mock_graphql(
		&server,
		"createSite",
		json!({ "data": { "network": { "createSite": {
			"status": "SUCCESS", "siteId": "42", "siteLocation": SITE_PATH
		} } } }),
	)
	.await;
	let mut client = build_client(&server);
	let descriptor = nbi::site(SITE_PATH).expect("Site descriptor should build.");
	let first = client
		.reconcile(DesiredState::Present, &descriptor)
		.await
		.expect("First run should create the site.");

	read_missing.delete_async().await;

	let read_found = mock_graphql(&server, "siteByLocation", site_found()).await;
	let second = client
		.reconcile(DesiredState::Present, &descriptor)
		.await
		.expect("Second run should find the site.");

	assert!(first.changed);
	assert!(!second.changed);
	assert_eq!(second.message, "Site /World/test already present.");

	token.assert_calls_async(1).await;
	create.assert_calls_async(1).await;
	read_found.assert_calls_async(1).await;
}

#[tokio::test]
async fn absent_then_absent_is_idempotent() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let read_found = mock_graphql(&server, "siteByLocation", site_found()).await;
	let delete = mock_graphql(
		&server,
		"deleteSite",
		json!({ "data": { "network": { "deleteSite": {
			"status": "SUCCESS", "siteId": "42", "siteLocation": SITE_PATH
		} } } }),
	)
	.await;
	let mut client = build_client(&server);
	let descriptor = nbi::site(SITE_PATH).expect("Site descriptor should build.");
	let first = client
		.reconcile(DesiredState::Absent, &descriptor)
		.await
		.expect("First run should delete the site.");

	read_found.delete_async().await;

	let _read_missing = mock_graphql(&server, "siteByLocation", site_missing()).await;
	let second = client
		.reconcile(DesiredState::Absent, &descriptor)
		.await
		.expect("Second run should find nothing to delete.");

	assert!(first.changed);
	assert_eq!(first.current, None);
	assert_eq!(first.message, "Site /World/test deleted.");
	assert!(!second.changed);
	assert_eq!(second.message, "Site /World/test not present.");

	delete.assert_calls_async(1).await;
}

#[tokio::test]
async fn gathered_never_mutates() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let read = mock_graphql(&server, "siteByLocation", site_found()).await;
	let create = mock_graphql(&server, "createSite", json!({ "data": null })).await;
	let delete = mock_graphql(&server, "deleteSite", json!({ "data": null })).await;
	let mut client = build_client(&server);
	let descriptor = nbi::site(SITE_PATH).expect("Site descriptor should build.");
	let result = client
		.reconcile(DesiredState::Gathered, &descriptor)
		.await
		.expect("Gathering should succeed.");

	assert!(!result.changed);
	assert_eq!(result.message, "Site /World/test exists.");

	read.assert_calls_async(1).await;
	create.assert_calls_async(0).await;
	delete.assert_calls_async(0).await;
}

#[tokio::test]
async fn unsupported_state_issues_no_calls() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let read = mock_graphql(&server, "siteByLocation", site_found()).await;
	let mut client = build_client(&server);
	let descriptor = nbi::site(SITE_PATH).expect("Site descriptor should build.");

	for state in [DesiredState::Merged, DesiredState::Replaced, DesiredState::Deleted] {
		let err = client
			.reconcile(state, &descriptor)
			.await
			.expect_err("The site resource only supports gathered, present, and absent.");

		assert!(matches!(
			err,
			Error::UnsupportedState { state: rejected, ref resource } if rejected == state && resource == "site"
		));
	}

	token.assert_calls_async(0).await;
	read.assert_calls_async(0).await;
}

#[tokio::test]
async fn failed_creation_reports_the_remote_status() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let _read = mock_graphql(&server, "siteByLocation", site_missing()).await;
	let _create = mock_graphql(
		&server,
		"createSite",
		json!({ "data": { "network": { "createSite": {
			"status": "ERROR", "errorCode": 409, "siteId": null, "siteLocation": SITE_PATH
		} } } }),
	)
	.await;
	let mut client = build_client(&server);
	let descriptor = nbi::site(SITE_PATH).expect("Site descriptor should build.");
	let err = client
		.reconcile(DesiredState::Present, &descriptor)
		.await
		.expect_err("An ERROR status should fail the run.");

	assert_eq!(err.to_string(), "site creation failed: remote status ERROR.");
	assert!(matches!(
		err,
		Error::Reconciliation(ReconciliationError::Rejected { action: MutationAction::Create, .. })
	));
}

#[tokio::test]
async fn unreadable_deletion_response_is_reported() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let _read = mock_graphql(&server, "siteByLocation", site_found()).await;
	let _delete = server
		.mock_async(|when, then| {
			when.method(POST).path("/nbi/graphql").body_includes("deleteSite");
			then.status(200).header("content-type", "text/html").body("<html>proxy error</html>");
		})
		.await;
	let mut client = build_client(&server);
	let descriptor = nbi::site(SITE_PATH).expect("Site descriptor should build.");
	let err = client
		.reconcile(DesiredState::Absent, &descriptor)
		.await
		.expect_err("A non-JSON body should fail the run.");

	match err {
		Error::Reconciliation(ReconciliationError::Unreadable { resource, action, payload }) => {
			assert_eq!(resource, "site");
			assert_eq!(action, MutationAction::Delete);
			assert_eq!(payload, "<html>proxy error</html>");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
