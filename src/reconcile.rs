//! Desired-state reconciliation on top of [`ProviderClient`].
//!
//! One invocation issues exactly one read and at most one mutation. The read decides existence
//! through the descriptor's identity path; GraphQL `errors` on the read do not fail the run.
//! Mutations are judged by their [`StatusCheck`](crate::resource::StatusCheck), and a failed
//! mutation surfaces the remote status, the GraphQL error messages, and the payload.

// self
use crate::{
	_prelude::*,
	client::ProviderClient,
	error::{ConfigError, ReconciliationError, TransportError},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	resource::{
		DesiredState, MutationAction, MutationOutcome, MutationSpec, ResourceDescriptor,
		ResourceDescriptorError,
	},
	transport::Transport,
};

/// Outcome of one reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
	/// `true` only when a mutation was issued and reported success.
	pub changed: bool,
	/// Representation of the object after the run, if it exists.
	pub current: Option<Value>,
	/// Human-readable summary.
	pub message: String,
}
impl ReconciliationResult {
	/// Result of a run that issued no successful mutation.
	pub fn unchanged(current: Option<Value>, message: impl Into<String>) -> Self {
		Self { changed: false, current, message: message.into() }
	}

	/// Result of a run whose mutation succeeded.
	pub fn changed(current: Option<Value>, message: impl Into<String>) -> Self {
		Self { changed: true, current, message: message.into() }
	}
}

impl<T> ProviderClient<T>
where
	T: ?Sized + Transport,
{
	/// Drives the resource described by `descriptor` toward `state`.
	///
	/// States the descriptor does not support fail with [`Error::UnsupportedState`] before any
	/// request is sent.
	pub async fn reconcile(
		&mut self,
		state: DesiredState,
		descriptor: &ResourceDescriptor,
	) -> Result<ReconciliationResult> {
		const KIND: OperationKind = OperationKind::Reconcile;

		let span = OperationSpan::new(KIND, state.as_str());

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.reconcile_inner(state, descriptor)).await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}

	/// Issues one mutation and interprets its response.
	///
	/// Returns the projected result node on success. A body that is not a GraphQL envelope
	/// becomes [`ReconciliationError::Unreadable`]; a status other than the expected one becomes
	/// [`ReconciliationError::Rejected`].
	pub async fn apply_mutation(
		&mut self,
		resource: &str,
		action: MutationAction,
		spec: &MutationSpec,
	) -> Result<Option<Value>> {
		let response = match self.execute_request(&spec.request).await {
			Ok(response) => response,
			Err(Error::Transport(TransportError::Decode { body, .. })) =>
				return Err(ReconciliationError::Unreadable {
					resource: resource.to_owned(),
					action,
					payload: body,
				}
				.into()),
			Err(e) => return Err(e),
		};

		match spec.evaluate(&response) {
			MutationOutcome::Succeeded { representation } => Ok(representation),
			MutationOutcome::Failed { status } => Err(ReconciliationError::Rejected {
				resource: resource.to_owned(),
				action,
				status,
				errors: response.error_messages(),
				payload: response.to_value(),
			}
			.into()),
		}
	}

	async fn reconcile_inner(
		&mut self,
		state: DesiredState,
		descriptor: &ResourceDescriptor,
	) -> Result<ReconciliationResult> {
		if !descriptor.supports(state) || !state.is_implemented() {
			return Err(Error::UnsupportedState { state, resource: descriptor.kind.clone() });
		}

		let response = self.execute_request(&descriptor.read).await?;
		let current = descriptor.observe(&response);
		let label = &descriptor.label;

		match (state, current) {
			(DesiredState::Gathered, Some(current)) =>
				Ok(ReconciliationResult::unchanged(Some(current), format!("{label} exists."))),
			(DesiredState::Gathered, None) =>
				Ok(ReconciliationResult::unchanged(None, format!("{label} does not exist."))),
			(DesiredState::Present, Some(current)) =>
				Ok(ReconciliationResult::unchanged(Some(current), format!("{label} already present."))),
			(DesiredState::Present, None) => {
				let spec = descriptor
					.create
					.as_ref()
					.ok_or(ConfigError::from(ResourceDescriptorError::MissingCreate))?;
				let created =
					self.apply_mutation(&descriptor.kind, MutationAction::Create, spec).await?;

				Ok(ReconciliationResult::changed(created, format!("{label} created.")))
			},
			(DesiredState::Absent, None) =>
				Ok(ReconciliationResult::unchanged(None, format!("{label} not present."))),
			(DesiredState::Absent, Some(_)) => {
				let spec = descriptor
					.delete
					.as_ref()
					.ok_or(ConfigError::from(ResourceDescriptorError::MissingDelete))?;

				self.apply_mutation(&descriptor.kind, MutationAction::Delete, spec).await?;

				Ok(ReconciliationResult::changed(None, format!("{label} deleted.")))
			},
			(DesiredState::Merged | DesiredState::Replaced | DesiredState::Deleted, _) =>
				Err(Error::UnsupportedState { state, resource: descriptor.kind.clone() }),
		}
	}
}
