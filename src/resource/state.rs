// self
use crate::{_prelude::*, error::ConfigError};

/// Caller-declared target condition for a resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredState {
	#[default]
	/// Read the current representation without changing anything.
	Gathered,
	/// Ensure the object exists.
	Present,
	/// Ensure the object does not exist.
	Absent,
	/// Merge the declared attributes into the object.
	Merged,
	/// Replace the object's attributes with the declared ones.
	Replaced,
	/// Remove the declared attributes.
	Deleted,
}
impl DesiredState {
	/// Every state in declaration order.
	pub const ALL: [DesiredState; 6] = [
		DesiredState::Gathered,
		DesiredState::Present,
		DesiredState::Absent,
		DesiredState::Merged,
		DesiredState::Replaced,
		DesiredState::Deleted,
	];

	/// Returns the stable label for the state.
	pub const fn as_str(self) -> &'static str {
		match self {
			DesiredState::Gathered => "gathered",
			DesiredState::Present => "present",
			DesiredState::Absent => "absent",
			DesiredState::Merged => "merged",
			DesiredState::Replaced => "replaced",
			DesiredState::Deleted => "deleted",
		}
	}

	/// Returns `true` for states the reconciler has an algorithm for.
	pub const fn is_implemented(self) -> bool {
		matches!(self, DesiredState::Gathered | DesiredState::Present | DesiredState::Absent)
	}
}
impl Display for DesiredState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for DesiredState {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		DesiredState::ALL
			.into_iter()
			.find(|state| state.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| ConfigError::UnknownState { value: s.to_owned() })
	}
}

/// Desired states advertised by one resource type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedStates {
	/// Indicates whether `gathered` is supported.
	pub gathered: bool,
	/// Indicates whether `present` is supported.
	pub present: bool,
	/// Indicates whether `absent` is supported.
	pub absent: bool,
	/// Indicates whether `merged` is supported.
	pub merged: bool,
	/// Indicates whether `replaced` is supported.
	pub replaced: bool,
	/// Indicates whether `deleted` is supported.
	pub deleted: bool,
}
impl SupportedStates {
	/// Returns true if the provided state is supported.
	pub fn supports(self, state: DesiredState) -> bool {
		match state {
			DesiredState::Gathered => self.gathered,
			DesiredState::Present => self.present,
			DesiredState::Absent => self.absent,
			DesiredState::Merged => self.merged,
			DesiredState::Replaced => self.replaced,
			DesiredState::Deleted => self.deleted,
		}
	}

	/// Marks a state as supported.
	pub fn enable(mut self, state: DesiredState) -> Self {
		match state {
			DesiredState::Gathered => self.gathered = true,
			DesiredState::Present => self.present = true,
			DesiredState::Absent => self.absent = true,
			DesiredState::Merged => self.merged = true,
			DesiredState::Replaced => self.replaced = true,
			DesiredState::Deleted => self.deleted = true,
		}

		self
	}

	/// Returns true when no states are enabled.
	pub fn is_empty(self) -> bool {
		!DesiredState::ALL.into_iter().any(|state| self.supports(state))
	}

	/// Iterates over the enabled states.
	pub fn iter(self) -> impl Iterator<Item = DesiredState> {
		DesiredState::ALL.into_iter().filter(move |state| self.supports(*state))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_round_trip_through_from_str() {
		for state in DesiredState::ALL {
			assert_eq!(state.as_str().parse::<DesiredState>().ok(), Some(state));
		}

		assert_eq!("Present".parse::<DesiredState>().ok(), Some(DesiredState::Present));
		assert!(matches!("enabled".parse::<DesiredState>(), Err(ConfigError::UnknownState { .. })));
		assert_eq!(DesiredState::default(), DesiredState::Gathered);
	}

	#[test]
	fn serde_uses_snake_case_labels() {
		let state: DesiredState =
			serde_json::from_str("\"absent\"").expect("State should deserialize.");

		assert_eq!(state, DesiredState::Absent);
	}

	#[test]
	fn supported_states_track_flags() {
		let states = SupportedStates::default()
			.enable(DesiredState::Gathered)
			.enable(DesiredState::Present)
			.enable(DesiredState::Absent);

		assert!(states.supports(DesiredState::Present));
		assert!(!states.supports(DesiredState::Merged));
		assert!(!states.is_empty());
		assert!(SupportedStates::default().is_empty());
		assert_eq!(
			states.iter().collect::<Vec<_>>(),
			vec![DesiredState::Gathered, DesiredState::Present, DesiredState::Absent]
		);
	}
}
