// self
use crate::{
	_prelude::*,
	client::ProviderClient,
	graphql::{GraphQlRequest, JsonPath},
	nbi::documents,
	transport::Transport,
};

/// Server information block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
	/// Uptime as rendered by the server.
	#[serde(default)]
	pub uptime: Option<String>,
	/// Product version.
	#[serde(default)]
	pub version: Option<String>,
}

impl<T> ProviderClient<T>
where
	T: ?Sized + Transport,
{
	/// Reads the server uptime and version.
	pub async fn server_info(&mut self) -> Result<ServerInfo> {
		let response = self.execute_request(&GraphQlRequest::new(documents::SERVER_INFO)).await?;

		Ok(response.extract(&JsonPath::parse("administration.serverInfo"))?.unwrap_or_default())
	}

	/// Reads the server version; `None` when the server does not report one.
	pub async fn server_version(&mut self) -> Result<Option<String>> {
		let response =
			self.execute_request(&GraphQlRequest::new(documents::SERVER_VERSION)).await?;

		Ok(response.extract(&JsonPath::parse("administration.serverInfo.version"))?)
	}
}
