// self
use crate::{
	_prelude::*,
	client::ProviderClient,
	graphql::{GraphQlRequest, JsonPath},
	nbi::documents,
	reconcile::ReconciliationResult,
	resource::{MutationAction, MutationSpec},
	transport::Transport,
};

/// Resource kind label used in device failures.
pub const DEVICE_KIND: &str = "device";

/// One managed device as reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
	/// Management IP address.
	pub ip: String,
	/// SNMP system name.
	#[serde(default)]
	pub sys_name: Option<String>,
	/// Location path of the site the device belongs to.
	#[serde(default)]
	pub site_path: Option<String>,
	/// Firmware version; only populated by single-device lookups.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub firmware: Option<String>,
}

/// Parameters for onboarding one device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDevice {
	/// Management IP address.
	pub ip_address: String,
	/// Access profile used to reach the device.
	pub profile_name: String,
	/// Location path of the target site.
	pub site_path: String,
}
impl NewDevice {
	/// Creates onboarding parameters.
	pub fn new(
		ip_address: impl Into<String>,
		profile_name: impl Into<String>,
		site_path: impl Into<String>,
	) -> Self {
		Self {
			ip_address: ip_address.into(),
			profile_name: profile_name.into(),
			site_path: site_path.into(),
		}
	}
}

/// Per-device entry returned by the onboarding mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAddResult {
	/// Server-side device identifier, once assigned.
	#[serde(default)]
	pub device_id: Option<i64>,
	/// IP address the entry refers to.
	#[serde(default)]
	pub ip_address: Option<String>,
	/// Server message.
	#[serde(default)]
	pub message: Option<String>,
	/// Serial number, when discovered.
	#[serde(default, rename = "seriallNumber", alias = "serialNumber")]
	pub serial_number: Option<String>,
	/// Entry status (e.g., `SUCCESS`).
	#[serde(default)]
	pub status: Option<String>,
}

impl<T> ProviderClient<T>
where
	T: ?Sized + Transport,
{
	/// Lists every managed device.
	pub async fn devices(&mut self) -> Result<Vec<DeviceSummary>> {
		let response = self.execute_request(&GraphQlRequest::new(documents::DEVICES)).await?;

		Ok(response.extract(&JsonPath::parse("network.devices"))?.unwrap_or_default())
	}

	/// Looks up one device by IP address.
	pub async fn device(&mut self, ip_address: &str) -> Result<Option<DeviceSummary>> {
		let request = GraphQlRequest::new(documents::DEVICE_BY_IP).variable("ipAddress", ip_address);
		let response = self.execute_request(&request).await?;

		Ok(response.extract(&JsonPath::parse("network.device"))?)
	}

	/// Returns the firmware version of one device, or `None` when unknown.
	pub async fn device_firmware(&mut self, ip_address: &str) -> Result<Option<String>> {
		let request =
			GraphQlRequest::new(documents::DEVICE_FIRMWARE).variable("ipAddress", ip_address);
		let response = self.execute_request(&request).await?;

		Ok(response.extract(&JsonPath::parse("network.device.firmware"))?)
	}

	/// Asks the server to resynchronize one device.
	///
	/// A `SUCCESS` status means the job was accepted, which counts as a change.
	pub async fn sync_device(&mut self, ip_address: &str) -> Result<ReconciliationResult> {
		let spec = MutationSpec::new(
			GraphQlRequest::new(documents::READ_DEVICES).variable("ipAddress", ip_address),
			"network.readDevices",
		);

		self.apply_mutation(DEVICE_KIND, MutationAction::Synchronize, &spec).await?;

		Ok(ReconciliationResult::changed(
			None,
			format!("Synchronization in progress for {ip_address}."),
		))
	}

	/// Pushes the full stored configuration onto one device.
	pub async fn enforce_device(&mut self, ip_address: &str) -> Result<ReconciliationResult> {
		let spec = MutationSpec::new(
			GraphQlRequest::new(documents::ENFORCE_DEVICE).variable("ipAddress", ip_address),
			"network.configureDevice",
		);

		self.apply_mutation(DEVICE_KIND, MutationAction::Enforce, &spec).await?;

		Ok(ReconciliationResult::changed(
			None,
			format!("Configuration enforcement in progress for {ip_address}."),
		))
	}

	/// Onboards one device and returns the server's per-device results as-is.
	pub async fn add_device(&mut self, device: &NewDevice) -> Result<Vec<DeviceAddResult>> {
		let request = GraphQlRequest::new(documents::CREATE_DEVICES)
			.variable("ipAddress", device.ip_address.as_str())
			.variable("profileName", device.profile_name.as_str())
			.variable("sitePath", device.site_path.as_str());
		let response = self.execute_request(&request).await?;

		Ok(response.extract(&JsonPath::parse("network.createDevices.results"))?.unwrap_or_default())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{_preludet::*, error::ReconciliationError};

	fn client(transport: ScriptedTransport) -> (ProviderClient<ScriptedTransport>, Arc<ScriptedTransport>) {
		let transport = Arc::new(transport);
		let client = ProviderClient::with_transport(test_config(), transport.clone())
			.expect("Client should build from a valid config.");

		(client, transport)
	}

	fn sent_variables(transport: &ScriptedTransport, index: usize) -> Value {
		let body = transport.requests()[index].body.clone().into_bytes();
		let decoded: Value = serde_json::from_slice(&body).expect("GraphQL body should be JSON.");

		decoded["variables"].clone()
	}

	#[tokio::test]
	async fn firmware_lookup_sends_ip_address() {
		let (mut client, transport) = client(
			ScriptedTransport::default()
				.respond_token("tok")
				.respond_json(200, json!({ "data": { "network": { "device": { "firmware": "8.10.1.0" } } } }))
				.respond_json(200, json!({ "data": { "network": { "device": null } } })),
		);

		assert_eq!(
			client.device_firmware("10.0.0.1").await.expect("Lookup should succeed.").as_deref(),
			Some("8.10.1.0")
		);
		assert_eq!(client.device_firmware("10.0.0.2").await.expect("Lookup should succeed."), None);
		assert_eq!(sent_variables(&transport, 1), json!({ "ipAddress": "10.0.0.1" }));
	}

	#[tokio::test]
	async fn sync_reports_a_change_on_success() {
		let (mut client, _) = client(ScriptedTransport::default().respond_token("tok").respond_json(
			200,
			json!({ "data": { "network": { "readDevices": { "status": "SUCCESS", "errorCode": 0 } } } }),
		));
		let result = client.sync_device("10.0.0.1").await.expect("Sync should succeed.");

		assert_eq!(
			result,
			ReconciliationResult::changed(None, "Synchronization in progress for 10.0.0.1.")
		);
	}

	#[tokio::test]
	async fn sync_failure_names_the_action() {
		let (mut client, _) = client(ScriptedTransport::default().respond_token("tok").respond_json(
			200,
			json!({ "data": { "network": { "readDevices": { "status": "ERROR", "errorCode": 1 } } } }),
		));
		let err = client.sync_device("10.0.0.1").await.expect_err("An ERROR status should fail.");

		assert!(matches!(
			err,
			Error::Reconciliation(ReconciliationError::Rejected {
				action: MutationAction::Synchronize,
				..
			})
		));
		assert_eq!(err.to_string(), "device synchronization failed: remote status ERROR.");
	}

	#[tokio::test]
	async fn add_device_returns_raw_results() {
		let (mut client, transport) = client(ScriptedTransport::default().respond_token("tok").respond_json(
			200,
			json!({ "data": { "network": { "createDevices": { "results": [{
				"deviceId": 7,
				"ipAddress": "10.0.0.9",
				"message": "queued",
				"seriallNumber": null,
				"status": "SUCCESS"
			}] } } } }),
		));
		let results = client
			.add_device(&NewDevice::new("10.0.0.9", "public_v2", "/World/Lab"))
			.await
			.expect("Onboarding should succeed.");

		assert_eq!(results.len(), 1);
		assert_eq!(results[0].device_id, Some(7));
		assert_eq!(results[0].status.as_deref(), Some("SUCCESS"));
		assert_eq!(
			sent_variables(&transport, 1),
			json!({ "ipAddress": "10.0.0.9", "profileName": "public_v2", "sitePath": "/World/Lab" })
		);
	}

	#[tokio::test]
	async fn devices_listing_tolerates_missing_data() {
		let (mut client, _) = client(
			ScriptedTransport::default()
				.respond_token("tok")
				.respond_json(200, json!({ "data": null, "errors": [{ "message": "forbidden" }] })),
		);

		assert!(client.devices().await.expect("Listing should succeed.").is_empty());
	}
}
