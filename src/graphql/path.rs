//! Key paths into response payloads and projections built on top of them.

// self
use crate::_prelude::*;

/// Sequence of keys locating a value inside a JSON document.
///
/// Segments index objects by key; a segment made of ASCII digits also indexes arrays.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPath(Vec<String>);
impl JsonPath {
	/// Builds a path from individual segments.
	pub fn new<I, S>(segments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(segments.into_iter().map(Into::into).collect())
	}

	/// Parses a dotted path such as `network.siteByLocation`; empty segments are skipped.
	pub fn parse(dotted: &str) -> Self {
		Self::new(dotted.split('.').filter(|segment| !segment.is_empty()))
	}

	/// Returns the path segments.
	pub fn segments(&self) -> &[String] {
		&self.0
	}

	/// Returns `true` for the root path.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Walks the path from `root`, returning `None` as soon as a segment is missing.
	pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
		self.0.iter().try_fold(root, |node, segment| match node {
			Value::Object(map) => map.get(segment),
			Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
			_ => None,
		})
	}
}
impl From<&str> for JsonPath {
	fn from(dotted: &str) -> Self {
		Self::parse(dotted)
	}
}
impl Display for JsonPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0.join("."))
	}
}

/// Returns `true` when a value counts as an existing object.
///
/// `null`, empty strings, empty arrays, and empty objects all mean "does not exist".
pub fn is_present(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::String(text) => !text.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
		Value::Bool(_) | Value::Number(_) => true,
	}
}

/// Maps a node onto a flat object of named fields.
///
/// An empty projection keeps the node unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection(Vec<(String, JsonPath)>);
impl Projection {
	/// Creates an empty projection.
	pub fn identity() -> Self {
		Self::default()
	}

	/// Adds an output field read from `path` relative to the node.
	pub fn field(mut self, name: impl Into<String>, path: impl Into<JsonPath>) -> Self {
		self.0.push((name.into(), path.into()));

		self
	}

	/// Returns `true` when the projection keeps nodes unchanged.
	pub fn is_identity(&self) -> bool {
		self.0.is_empty()
	}

	/// Applies the projection; missing fields become `null`.
	pub fn apply(&self, node: &Value) -> Value {
		if self.is_identity() {
			return node.clone();
		}

		let map = self
			.0
			.iter()
			.map(|(name, path)| (name.clone(), path.resolve(node).cloned().unwrap_or(Value::Null)))
			.collect::<Map<_, _>>();

		Value::Object(map)
	}
}
