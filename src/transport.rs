//! HTTP transport primitives for token and GraphQL calls.
//!
//! The module exposes [`Transport`] alongside [`TransportRequest`] and [`TransportResponse`]
//! so callers can plug in their own HTTP stack (or a scripted double in tests) without the
//! provider client knowing which one is in use. Implementations only perform the exchange in
//! [`Transport::dispatch`]; the provided [`Transport::send`] applies the shared 2xx rule so
//! every transport classifies HTTP failures the same way.
//!
//! A transport makes exactly one attempt per call. Callers needing retries must wrap it.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::ConnectionConfig, error::ConfigError};

/// Boxed future returned by [`Transport`] methods.
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of issuing the client's POST requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back several
/// provider clients, and the futures they return must be `Send`.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Performs the exchange and returns the raw response, whatever its status.
	///
	/// Connection, DNS, and timeout failures map to [`TransportError::Network`] and
	/// [`TransportError::Timeout`].
	fn dispatch(&self, request: TransportRequest) -> TransportFuture<'_>;

	/// Performs the exchange and rejects non-2xx statuses with [`TransportError::Status`].
	fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(async move { self.dispatch(request).await?.error_for_status() })
	}
}

/// Request body variants used by the client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestBody {
	#[default]
	/// No body.
	Empty,
	/// `application/x-www-form-urlencoded` payload.
	Form(String),
	/// Serialized JSON payload.
	Json(Vec<u8>),
}
impl RequestBody {
	/// Encodes key/value pairs as a form body.
	pub fn form<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		Self::Form(form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish())
	}

	/// Serializes a value as a JSON body.
	pub fn json<T>(value: &T) -> Result<Self, serde_json::Error>
	where
		T: ?Sized + Serialize,
	{
		serde_json::to_vec(value).map(Self::Json)
	}

	/// Returns the encoded bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		match self {
			Self::Empty => Vec::new(),
			Self::Form(text) => text.into_bytes(),
			Self::Json(bytes) => bytes,
		}
	}
}

/// Fully formed POST request handed to a [`Transport`].
#[derive(Clone, Debug)]
pub struct TransportRequest {
	/// Absolute URL, including any query string.
	pub url: Url,
	/// Header pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Request body.
	pub body: RequestBody,
	/// Timeout for this call.
	pub timeout: Duration,
}
impl TransportRequest {
	/// Creates a POST request with no headers and an empty body.
	pub fn post(url: Url, timeout: Duration) -> Self {
		Self { url, headers: Vec::new(), body: RequestBody::Empty, timeout }
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets the body.
	pub fn body(mut self, body: RequestBody) -> Self {
		self.body = body;

		self
	}

	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Raw response captured by a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Creates a response from a status code and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the body as lossy UTF-8 text.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Keeps 2xx responses and turns everything else into [`TransportError::Status`].
	pub fn error_for_status(self) -> Result<Self, TransportError> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(TransportError::Status { status: self.status, body: self.text() })
		}
	}

	/// Parses the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T, TransportError>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| TransportError::Decode {
			status: self.status,
			body: self.text(),
			source,
		})
	}
}

/// Reqwest-backed [`Transport`] used by default.
///
/// Redirects are never followed: both endpoints answer directly.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a client that applies the config's certificate policy and timeout.
	pub fn from_config(config: &ConnectionConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(!config.verify_tls)
			.redirect(reqwest::redirect::Policy::none())
			.timeout(config.timeout)
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn dispatch(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let TransportRequest { url, headers, body, timeout } = request;
			let mut builder = self.0.post(url).timeout(timeout);

			for (name, value) in &headers {
				builder = builder.header(name.as_str(), value.as_str());
			}

			let response = builder
				.body(body.into_bytes())
				.send()
				.await
				.map_err(|e| map_reqwest_error(e, timeout))?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(|e| map_reqwest_error(e, timeout))?;

			Ok(TransportResponse::new(status, body.to_vec()))
		})
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError, timeout: Duration) -> TransportError {
	if err.is_timeout() { TransportError::timeout(timeout, err) } else { TransportError::network(err) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn form_body_is_url_encoded() {
		let body = RequestBody::form([("grant_type", "client_credentials"), ("note", "a b&c")]);

		assert_eq!(body, RequestBody::Form("grant_type=client_credentials&note=a+b%26c".into()));
		assert!(RequestBody::Empty.into_bytes().is_empty());
	}

	#[test]
	fn non_success_status_becomes_transport_error() {
		let err = TransportResponse::new(502, "bad gateway")
			.error_for_status()
			.expect_err("HTTP 502 should be rejected.");

		assert!(matches!(err, TransportError::Status { status: 502, ref body } if body == "bad gateway"));
		assert!(TransportResponse::new(204, "").error_for_status().is_ok());
	}

	#[test]
	fn json_decode_failure_keeps_raw_body() {
		let err = TransportResponse::new(200, "<html>maintenance</html>")
			.json::<Value>()
			.expect_err("HTML should not decode as JSON.");

		match err {
			TransportError::Decode { status, body, .. } => {
				assert_eq!(status, 200);
				assert_eq!(body, "<html>maintenance</html>");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn header_lookup_is_case_insensitive() {
		let url = Url::parse("https://example.com/nbi/graphql").expect("URL fixture should parse.");
		let request = TransportRequest::post(url, Duration::from_secs(1))
			.header("Content-Type", "application/json");

		assert_eq!(request.header_value("content-type"), Some("application/json"));
		assert_eq!(request.header_value("authorization"), None);
	}
}
