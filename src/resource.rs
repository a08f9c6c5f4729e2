//! Resource descriptors consumed by the reconciler.
//!
//! A [`ResourceDescriptor`] bundles everything the reconciler needs to know about one
//! reconcilable object: the read request and where existence shows up in its response,
//! optional create/delete mutations with their own success predicates, and the desired
//! states the resource supports. Documents stay opaque; descriptors only carry them.

/// Builder API for assembling resource descriptors.
pub mod builder;
/// Desired states and the per-resource support flags.
pub mod state;

pub use builder::*;
pub use state::*;

// self
use crate::{
	_prelude::*,
	graphql::{GraphQlRequest, GraphQlResponse, JsonPath, Projection, is_present},
};

/// State-changing mutation kinds, used to label failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
	/// Object creation.
	Create,
	/// Object deletion.
	Delete,
	/// Device resynchronization.
	Synchronize,
	/// Device configuration enforcement.
	Enforce,
}
impl MutationAction {
	/// Returns the noun used in failure messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			MutationAction::Create => "creation",
			MutationAction::Delete => "deletion",
			MutationAction::Synchronize => "synchronization",
			MutationAction::Enforce => "enforcement",
		}
	}
}
impl Display for MutationAction {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Success predicate for a mutation: a string field compared against a sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
	/// Status field, relative to the mutation's result node.
	pub field: JsonPath,
	/// Value that signals success.
	pub expected: String,
}
impl StatusCheck {
	/// Success sentinel used by the Site Engine mutations.
	pub const SUCCESS: &'static str = "SUCCESS";

	/// Creates a predicate comparing `field` against `expected`.
	pub fn new(field: impl Into<JsonPath>, expected: impl Into<String>) -> Self {
		Self { field: field.into(), expected: expected.into() }
	}

	/// Returns the status string found under `node`, if any.
	pub fn status_of<'a>(&self, node: &'a Value) -> Option<&'a str> {
		self.field.resolve(node).and_then(Value::as_str)
	}
}
impl Default for StatusCheck {
	fn default() -> Self {
		Self::new("status", Self::SUCCESS)
	}
}

/// Outcome of interpreting a mutation response.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationOutcome {
	/// The status matched the success sentinel.
	Succeeded {
		/// Projected representation of the result node, if the node was present.
		representation: Option<Value>,
	},
	/// The status was missing or did not match.
	Failed {
		/// Status string found in the response, if any.
		status: Option<String>,
	},
}

/// One state-changing request plus the rules for reading its response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MutationSpec {
	/// Request to issue.
	pub request: GraphQlRequest,
	/// Location of the mutation's result node inside `data`.
	pub result_path: JsonPath,
	/// Success predicate evaluated against the result node.
	pub success: StatusCheck,
	/// Representation extracted from the result node on success.
	pub representation: Projection,
}
impl MutationSpec {
	/// Creates a spec whose result node lives at `result_path` and reports `status: SUCCESS`.
	pub fn new(request: GraphQlRequest, result_path: impl Into<JsonPath>) -> Self {
		Self {
			request,
			result_path: result_path.into(),
			success: StatusCheck::default(),
			representation: Projection::identity(),
		}
	}

	/// Overrides the success predicate.
	pub fn success_when(mut self, check: StatusCheck) -> Self {
		self.success = check;

		self
	}

	/// Overrides the representation extracted on success.
	pub fn representation(mut self, projection: Projection) -> Self {
		self.representation = projection;

		self
	}

	/// Interprets a response according to this spec.
	pub fn evaluate(&self, response: &GraphQlResponse) -> MutationOutcome {
		let node = response.lookup(&self.result_path);
		let status = node.and_then(|node| self.success.status_of(node));

		if status == Some(self.success.expected.as_str()) {
			let representation =
				node.filter(|node| is_present(node)).map(|node| self.representation.apply(node));

			MutationOutcome::Succeeded { representation }
		} else {
			MutationOutcome::Failed { status: status.map(str::to_owned) }
		}
	}
}

/// Immutable description of one reconcilable remote object.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceDescriptor {
	/// Resource kind label (e.g., `site`).
	pub kind: String,
	/// Human-readable label used in result messages (e.g., `Site /World/test`).
	pub label: String,
	/// Request that reads the current state.
	pub read: GraphQlRequest,
	/// Location of the existence-check value inside the read response's `data`.
	pub identity_path: JsonPath,
	/// Representation extracted from the existing object.
	pub representation: Projection,
	/// Mutation issued to create the object.
	pub create: Option<MutationSpec>,
	/// Mutation issued to delete the object.
	pub delete: Option<MutationSpec>,
	/// Desired states the resource supports.
	pub supported_states: SupportedStates,
}
impl ResourceDescriptor {
	/// Creates a new builder for the provided kind, read request, and identity path.
	pub fn builder(
		kind: impl Into<String>,
		read: GraphQlRequest,
		identity_path: impl Into<JsonPath>,
	) -> ResourceDescriptorBuilder {
		ResourceDescriptorBuilder::new(kind, read, identity_path)
	}

	/// Checks whether the descriptor supports a given state.
	pub fn supports(&self, state: DesiredState) -> bool {
		self.supported_states.supports(state)
	}

	/// Extracts the current representation from a read response.
	///
	/// A missing path segment or an empty marker means the object does not exist.
	pub fn observe(&self, response: &GraphQlResponse) -> Option<Value> {
		response
			.lookup(&self.identity_path)
			.filter(|node| is_present(node))
			.map(|node| self.representation.apply(node))
	}
}
