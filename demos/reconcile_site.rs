//! Reconciles a site against a mocked Site Engine: the first `present` run creates it, the
//! second finds it and changes nothing.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use xiqse_client::{
	client::ReqwestProviderClient,
	config::{ConnectionConfig, Scheme},
	nbi,
	resource::DesiredState,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token/access-token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access_token": "demo-token" }));
		})
		.await;
	let missing = server
		.mock_async(|when, then| {
			when.method(POST).path("/nbi/graphql").body_includes("siteByLocation");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "data": { "network": { "siteByLocation": null } } }));
		})
		.await;
	let _create = server
		.mock_async(|when, then| {
			when.method(POST).path("/nbi/graphql").body_includes("createSite");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"data": { "network": { "createSite": {
					"status": "SUCCESS", "siteId": "42", "siteLocation": "/World/demo"
				} } }
			}));
		})
		.await;
	let config = ConnectionConfig::builder(server.host())
		.scheme(Scheme::Http)
		.port(server.port())
		.credentials("demo-client", "demo-secret")
		.build()?;
	let mut client = ReqwestProviderClient::new(config)?;
	let descriptor = nbi::site("/World/demo")?;
	let first = client.reconcile(DesiredState::Present, &descriptor).await?;

	println!("first run: changed={} message={:?}", first.changed, first.message);

	missing.delete_async().await;

	let _found = server
		.mock_async(|when, then| {
			when.method(POST).path("/nbi/graphql").body_includes("siteByLocation");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"data": { "network": { "siteByLocation": {
					"location": "/World/demo", "siteId": "42", "siteName": "demo"
				} } }
			}));
		})
		.await;
	let second = client.reconcile(DesiredState::Present, &descriptor).await?;

	println!("second run: changed={} message={:?}", second.changed, second.message);
	println!("{}", serde_json::to_string_pretty(&second)?);

	Ok(())
}
