//! Client-level error types shared by the transport, the provider client, and reconciliation.

// self
use crate::{
	_prelude::*,
	resource::{DesiredState, MutationAction},
};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant is fatal to the invocation that produced it; nothing is retried or
/// downgraded internally.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network failure or non-2xx HTTP status.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// No usable bearer token could be obtained or the token was rejected.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// A create/delete (or other state-changing) mutation did not succeed.
	#[error(transparent)]
	Reconciliation(#[from] ReconciliationError),
	/// A typed query result could not be interpreted.
	#[error(transparent)]
	Payload(#[from] PayloadError),

	/// Desired state is not implemented for the targeted resource.
	#[error("Desired state `{state}` is not supported by the {resource} resource.")]
	UnsupportedState {
		/// Requested desired state.
		state: DesiredState,
		/// Resource kind label (e.g., `site`).
		resource: String,
	},
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Connection settings failed validation.
	#[error(transparent)]
	InvalidConnection(#[from] crate::config::ConnectionConfigError),
	/// Resource descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::resource::ResourceDescriptorError),
	/// Endpoint URL derived from the connection settings is invalid.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be encoded as JSON.
	#[error("Request body could not be encoded.")]
	RequestEncode(#[from] serde_json::Error),
	/// Desired-state label is not one of the known states.
	#[error("Unknown desired state `{value}`.")]
	UnknownState {
		/// Label that failed to parse.
		value: String,
	},
	/// Scheme label is neither `http` nor `https`.
	#[error("Unknown scheme `{value}`; expected `http` or `https`.")]
	UnknownScheme {
		/// Label that failed to parse.
		value: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, timeout, HTTP status, body decoding).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Connection or DNS failure reported by the HTTP client.
	#[error("Network error occurred while calling the API: {source}.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The per-call timeout expired before a response arrived.
	#[error("Request timed out after {timeout:?}.")]
	Timeout {
		/// Timeout that was applied to the call.
		timeout: Duration,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// The endpoint answered with a non-2xx status.
	#[error("Endpoint returned HTTP {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body text (lossy UTF-8).
		body: String,
	},
	/// The endpoint answered 2xx but the body was not the expected JSON.
	#[error("Endpoint returned a body that could not be decoded (HTTP {status}).")]
	Decode {
		/// HTTP status code.
		status: u16,
		/// Raw response body text (lossy UTF-8).
		body: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(timeout: Duration, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { timeout, source: Box::new(src) }
	}

	/// Returns the HTTP status code when the failure carries one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
			Self::Network { .. } | Self::Timeout { .. } => None,
		}
	}
}

/// Failures while obtaining or using the bearer token.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Token endpoint answered without an `access_token` field.
	#[error("Authentication failed: no access_token in response.")]
	MissingAccessToken,
	/// Token endpoint answered with an empty `access_token`.
	#[error("Authentication failed: access_token is empty.")]
	EmptyAccessToken,
	/// Token endpoint rejected the client credentials.
	#[error("Token endpoint rejected the client credentials with HTTP {status}.")]
	InvalidClient {
		/// HTTP status code.
		status: u16,
	},
	/// GraphQL endpoint no longer accepts the cached token; build a new client to re-authenticate.
	#[error("GraphQL endpoint rejected the bearer token with HTTP {status}.")]
	TokenRejected {
		/// HTTP status code.
		status: u16,
	},
	/// Token request failed at the transport level.
	#[error("Auth request failed: {0}")]
	Transport(#[source] TransportError),
}

/// Failures of state-changing mutations issued while reconciling.
#[derive(Debug, ThisError)]
pub enum ReconciliationError {
	/// The remote API reported a non-success status for the mutation.
	#[error("{resource} {action} failed: remote status {}.", .status.as_deref().unwrap_or("<missing>"))]
	Rejected {
		/// Resource kind label.
		resource: String,
		/// Mutation that was attempted.
		action: MutationAction,
		/// Status string found in the response, if any.
		status: Option<String>,
		/// GraphQL error messages attached to the response.
		errors: Vec<String>,
		/// Parsed response payload.
		payload: Value,
	},
	/// The mutation was sent but its response could not be parsed.
	#[error("{resource} {action} failed: response could not be interpreted.")]
	Unreadable {
		/// Resource kind label.
		resource: String,
		/// Mutation that was attempted.
		action: MutationAction,
		/// Raw response payload.
		payload: String,
	},
}

/// Typed extraction failure for read-only query results.
#[derive(Debug, ThisError)]
#[error("Response field `{path}` has an unexpected shape.")]
pub struct PayloadError {
	/// Dotted path of the field inside `data`.
	pub path: String,
	/// Structured parsing failure.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;

	#[test]
	fn transport_status_is_exposed() {
		let err = TransportError::Status { status: 503, body: "unavailable".into() };

		assert_eq!(err.status(), Some(503));
		assert!(err.to_string().contains("503"));
		assert_eq!(TransportError::network(std::io::Error::other("dns")).status(), None);
	}

	#[test]
	fn authentication_transport_keeps_source() {
		let err: Error = AuthenticationError::Transport(TransportError::Status {
			status: 500,
			body: "boom".into(),
		})
		.into();

		assert!(matches!(err, Error::Authentication(AuthenticationError::Transport(_))));

		let source = StdError::source(&err)
			.expect("Authentication error should expose the transport error as its source.");

		assert!(source.to_string().contains("500"));
	}

	#[test]
	fn rejected_message_names_action() {
		let err = ReconciliationError::Rejected {
			resource: "site".into(),
			action: MutationAction::Create,
			status: Some("ERROR".into()),
			errors: Vec::new(),
			payload: Value::Null,
		};

		assert_eq!(err.to_string(), "site creation failed: remote status ERROR.");
	}
}
