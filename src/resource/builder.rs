// self
use crate::{
	_prelude::*,
	graphql::{GraphQlRequest, JsonPath, Projection},
	resource::{DesiredState, MutationSpec, ResourceDescriptor, SupportedStates},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ResourceDescriptorError {
	/// Kind label is required for error messages.
	#[error("Resource kind must not be empty.")]
	EmptyKind,
	/// An empty identity path would treat the whole payload as the object.
	#[error("Identity path must name at least one field.")]
	EmptyIdentityPath,
	/// At least one state must be supported.
	#[error("Descriptor must enable at least one desired state.")]
	NoSupportedStates,
	/// `present` requires a create mutation.
	#[error("The `present` state requires a create mutation.")]
	MissingCreate,
	/// `absent` requires a delete mutation.
	#[error("The `absent` state requires a delete mutation.")]
	MissingDelete,
	/// The reconciler has no algorithm for the state.
	#[error("Desired state `{state}` has no reconciliation algorithm.")]
	UnimplementedState {
		/// State that was enabled.
		state: DesiredState,
	},
}

/// Builder for [`ResourceDescriptor`] values.
#[derive(Debug)]
pub struct ResourceDescriptorBuilder {
	/// Kind label for the descriptor being constructed.
	pub kind: String,
	/// Optional message label; defaults to the kind.
	pub label: Option<String>,
	/// Request that reads the current state.
	pub read: GraphQlRequest,
	/// Existence-check location inside the read response.
	pub identity_path: JsonPath,
	/// Representation extracted from the existing object.
	pub representation: Projection,
	/// Optional create mutation.
	pub create: Option<MutationSpec>,
	/// Optional delete mutation.
	pub delete: Option<MutationSpec>,
	/// States enabled for the resource.
	pub supported_states: SupportedStates,
}
impl ResourceDescriptorBuilder {
	/// Creates a new builder seeded with the provided kind, read request, and identity path.
	pub fn new(
		kind: impl Into<String>,
		read: GraphQlRequest,
		identity_path: impl Into<JsonPath>,
	) -> Self {
		Self {
			kind: kind.into(),
			label: None,
			read,
			identity_path: identity_path.into(),
			representation: Projection::identity(),
			create: None,
			delete: None,
			supported_states: SupportedStates::default(),
		}
	}

	/// Sets the label used in result messages.
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());

		self
	}

	/// Sets the representation extracted from the existing object.
	pub fn representation(mut self, projection: Projection) -> Self {
		self.representation = projection;

		self
	}

	/// Sets the create mutation.
	pub fn create(mut self, spec: MutationSpec) -> Self {
		self.create = Some(spec);

		self
	}

	/// Sets the delete mutation.
	pub fn delete(mut self, spec: MutationSpec) -> Self {
		self.delete = Some(spec);

		self
	}

	/// Marks a single state as supported.
	pub fn support_state(mut self, state: DesiredState) -> Self {
		self.supported_states = self.supported_states.enable(state);

		self
	}

	/// Marks multiple states as supported.
	pub fn support_states<I>(mut self, states: I) -> Self
	where
		I: IntoIterator<Item = DesiredState>,
	{
		for state in states {
			self.supported_states = self.supported_states.enable(state);
		}

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ResourceDescriptor, ResourceDescriptorError> {
		let kind = self.kind.trim().to_owned();

		if kind.is_empty() {
			return Err(ResourceDescriptorError::EmptyKind);
		}
		if self.identity_path.is_empty() {
			return Err(ResourceDescriptorError::EmptyIdentityPath);
		}
		if self.supported_states.is_empty() {
			return Err(ResourceDescriptorError::NoSupportedStates);
		}
		if let Some(state) = self.supported_states.iter().find(|state| !state.is_implemented()) {
			return Err(ResourceDescriptorError::UnimplementedState { state });
		}
		if self.supported_states.present && self.create.is_none() {
			return Err(ResourceDescriptorError::MissingCreate);
		}
		if self.supported_states.absent && self.delete.is_none() {
			return Err(ResourceDescriptorError::MissingDelete);
		}

		Ok(ResourceDescriptor {
			label: self.label.unwrap_or_else(|| kind.clone()),
			kind,
			read: self.read,
			identity_path: self.identity_path,
			representation: self.representation,
			create: self.create,
			delete: self.delete,
			supported_states: self.supported_states,
		})
	}
}
