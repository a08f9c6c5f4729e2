// self
use crate::{
	_prelude::*,
	client::ProviderClient,
	error::ConfigError,
	graphql::{GraphQlRequest, JsonPath, Projection},
	nbi::documents,
	resource::{DesiredState, MutationSpec, ResourceDescriptor},
	transport::Transport,
};

/// Resource kind label used by [`site`].
pub const SITE_KIND: &str = "site";

/// One entry of the site listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
	/// Full location path (e.g., `/World/Paris`).
	pub location: String,
	/// Last path segment as displayed by the server.
	#[serde(default)]
	pub site_name: Option<String>,
}

/// Builds the descriptor for the site at `site_path`.
///
/// The site supports `gathered`, `present`, and `absent`. Its representation is
/// `{ location, siteId }`, read from `siteByLocation` or from the `createSite` result.
pub fn site(site_path: impl Into<String>) -> Result<ResourceDescriptor> {
	let site_path = site_path.into();
	let request = |document: &str| GraphQlRequest::new(document).variable("sitePath", site_path.as_str());
	let descriptor = ResourceDescriptor::builder(
		SITE_KIND,
		request(documents::SITE_BY_LOCATION),
		"network.siteByLocation",
	)
	.label(format!("Site {site_path}"))
	.representation(Projection::identity().field("location", "location").field("siteId", "siteId"))
	.create(
		MutationSpec::new(request(documents::CREATE_SITE), "network.createSite").representation(
			Projection::identity().field("location", "siteLocation").field("siteId", "siteId"),
		),
	)
	.delete(MutationSpec::new(request(documents::DELETE_SITE), "network.deleteSite"))
	.support_states([DesiredState::Gathered, DesiredState::Present, DesiredState::Absent])
	.build()
	.map_err(ConfigError::from)?;

	Ok(descriptor)
}

impl<T> ProviderClient<T>
where
	T: ?Sized + Transport,
{
	/// Lists every site known to the server.
	pub async fn sites(&mut self) -> Result<Vec<SiteSummary>> {
		let response = self.execute_request(&GraphQlRequest::new(documents::SITES)).await?;

		Ok(response.extract(&JsonPath::parse("network.sites"))?.unwrap_or_default())
	}
}
