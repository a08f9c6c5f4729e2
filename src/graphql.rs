//! GraphQL request/response envelopes.
//!
//! Documents are opaque strings; the client never inspects or rewrites them. Responses keep
//! `data` and `errors` side by side, and callers decide how to interpret `errors`.

pub mod path;

pub use path::*;

// self
use crate::{_prelude::*, error::PayloadError};

/// Variables map sent alongside a document.
pub type Variables = Map<String, Value>;

/// One GraphQL call: a document plus its variables.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphQlRequest {
	/// Query or mutation text.
	#[serde(rename = "query")]
	pub document: String,
	/// Variables referenced by the document.
	pub variables: Variables,
}
impl GraphQlRequest {
	/// Creates a request with no variables.
	pub fn new(document: impl Into<String>) -> Self {
		Self { document: document.into(), variables: Variables::new() }
	}

	/// Adds or replaces one variable.
	pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.variables.insert(name.into(), value.into());

		self
	}

	/// Replaces the whole variables map.
	pub fn with_variables(mut self, variables: Variables) -> Self {
		self.variables = variables;

		self
	}
}

/// One entry of the GraphQL `errors` array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
	/// Human-readable message.
	pub message: String,
	/// Response path the error refers to, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<Vec<Value>>,
	/// Server-specific extension data.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extensions: Option<Value>,
}

/// Parsed GraphQL response envelope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
	/// Operation-specific payload.
	#[serde(default)]
	pub data: Option<Value>,
	/// Errors reported by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub errors: Option<Vec<GraphQlError>>,
}
impl GraphQlResponse {
	/// Returns `true` when the server reported at least one error.
	pub fn has_errors(&self) -> bool {
		self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
	}

	/// Collects the error messages in order.
	pub fn error_messages(&self) -> Vec<String> {
		self.errors
			.iter()
			.flatten()
			.map(|error| error.message.clone())
			.collect()
	}

	/// Resolves `path` inside `data`.
	pub fn lookup(&self, path: &JsonPath) -> Option<&Value> {
		path.resolve(self.data.as_ref()?)
	}

	/// Deserializes the value at `path` inside `data`; absent or null values yield `None`.
	pub fn extract<T>(&self, path: &JsonPath) -> Result<Option<T>, PayloadError>
	where
		T: DeserializeOwned,
	{
		match self.lookup(path) {
			None | Some(Value::Null) => Ok(None),
			Some(value) => serde_path_to_error::deserialize(value)
				.map(Some)
				.map_err(|source| PayloadError { path: path.to_string(), source }),
		}
	}

	/// Renders the response back into a JSON value for error reports.
	pub fn to_value(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_serializes_as_query_and_variables() {
		let request = GraphQlRequest::new("query Site($sitePath: String!) { x }")
			.variable("sitePath", "/World/test");
		let encoded = serde_json::to_value(&request).expect("Request should serialize.");

		assert_eq!(
			encoded,
			serde_json::json!({
				"query": "query Site($sitePath: String!) { x }",
				"variables": { "sitePath": "/World/test" },
			})
		);
		assert_eq!(
			serde_json::to_value(GraphQlRequest::new("{ a }")).expect("Request should serialize."),
			serde_json::json!({ "query": "{ a }", "variables": {} })
		);
	}

	#[test]
	fn response_keeps_errors_next_to_data() {
		let response: GraphQlResponse = serde_json::from_str(
			r#"{"data":{"network":{"siteByLocation":null}},"errors":[{"message":"Site not found","path":["network","siteByLocation"]}]}"#,
		)
		.expect("Envelope should parse.");

		assert!(response.has_errors());
		assert_eq!(response.error_messages(), vec!["Site not found".to_owned()]);
		assert_eq!(response.lookup(&JsonPath::parse("network.siteByLocation")), Some(&Value::Null));
	}

	#[test]
	fn null_errors_are_treated_as_absent() {
		let response: GraphQlResponse =
			serde_json::from_str(r#"{"data":{},"errors":null}"#).expect("Envelope should parse.");

		assert!(!response.has_errors());
		assert!(response.error_messages().is_empty());
	}

	#[test]
	fn extract_reports_the_failing_path() {
		let response: GraphQlResponse = serde_json::from_str(
			r#"{"data":{"administration":{"serverInfo":{"version":42}}}}"#,
		)
		.expect("Envelope should parse.");
		let err = response
			.extract::<String>(&JsonPath::parse("administration.serverInfo.version"))
			.expect_err("A number should not deserialize as a string.");

		assert_eq!(err.path, "administration.serverInfo.version");
		assert_eq!(
			response
				.extract::<String>(&JsonPath::parse("administration.serverInfo.uptime"))
				.expect("Missing fields should not fail."),
			None
		);
	}
}
