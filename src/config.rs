//! Connection settings for one Site Engine northbound endpoint.
//!
//! [`ConnectionConfig`] is the validated, immutable form owned by a
//! [`ProviderClient`](crate::client::ProviderClient). [`ProviderSettings`] mirrors the loose
//! configuration surface (as read from a playbook, a file, or the environment) and converts
//! into a validated config through [`TryFrom`].

// self
use crate::{_prelude::*, error::ConfigError, secret::Secret};

/// Default HTTPS port of the northbound API.
pub const DEFAULT_PORT: u16 = 8443;
/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const TOKEN_PATH: &str = "oauth/token/access-token";
const GRAPHQL_PATH: &str = "nbi/graphql";

/// URL scheme used to reach the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
	/// Plain HTTP.
	Http,
	#[default]
	/// HTTP over TLS.
	Https,
}
impl Scheme {
	/// Returns the URL scheme label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Scheme::Http => "http",
			Scheme::Https => "https",
		}
	}
}
impl Display for Scheme {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Scheme {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.eq_ignore_ascii_case("http") {
			Ok(Scheme::Http)
		} else if s.eq_ignore_ascii_case("https") {
			Ok(Scheme::Https)
		} else {
			Err(ConfigError::UnknownScheme { value: s.to_owned() })
		}
	}
}

/// Errors raised while validating connection settings.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConnectionConfigError {
	/// Host is empty.
	#[error("Host cannot be empty.")]
	EmptyHost,
	/// Host contains whitespace.
	#[error("Host `{host}` contains whitespace.")]
	HostContainsWhitespace {
		/// Host that failed validation.
		host: String,
	},
	/// Port zero is not routable.
	#[error("Port must be non-zero.")]
	ZeroPort,
	/// A zero timeout would fail every call immediately.
	#[error("Timeout must be non-zero.")]
	ZeroTimeout,
	/// Client identifier or secret is missing.
	#[error("The {field} credential cannot be empty.")]
	EmptyCredential {
		/// Which credential failed validation.
		field: &'static str,
	},
	/// Host and port do not form a valid base URL.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Rendered URL that failed to parse.
		url: String,
	},
}

/// Validated connection parameters and credentials for one API endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionConfig {
	/// URL scheme.
	pub scheme: Scheme,
	/// IP address or FQDN of the server.
	pub host: String,
	/// TCP port.
	pub port: u16,
	/// OAuth client identifier.
	pub client_id: Secret,
	/// OAuth client secret.
	pub client_secret: Secret,
	/// Whether server certificates are validated.
	pub verify_tls: bool,
	/// Timeout applied to every call.
	pub timeout: Duration,
}
impl ConnectionConfig {
	/// Creates a builder for the provided host with every other field at its default.
	pub fn builder(host: impl Into<String>) -> ConnectionConfigBuilder {
		ConnectionConfigBuilder::new(host)
	}

	/// Returns `scheme://host:port/`.
	pub fn base_url(&self) -> Result<Url, ConnectionConfigError> {
		let host = if self.host.contains(':') && !self.host.starts_with('[') {
			format!("[{}]", self.host)
		} else {
			self.host.clone()
		};
		let rendered = format!("{}://{host}:{}/", self.scheme, self.port);

		Url::parse(&rendered).map_err(|_| ConnectionConfigError::InvalidBaseUrl { url: rendered })
	}

	/// Returns the token endpoint, including the `grant_type` query parameter.
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		let mut url = self
			.base_url()?
			.join(TOKEN_PATH)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		url.query_pairs_mut().append_pair("grant_type", "client_credentials");

		Ok(url)
	}

	/// Returns the GraphQL endpoint.
	pub fn graphql_endpoint(&self) -> Result<Url, ConfigError> {
		self.base_url()?.join(GRAPHQL_PATH).map_err(|source| ConfigError::InvalidEndpoint { source })
	}

	fn validate(&self) -> Result<(), ConnectionConfigError> {
		if self.host.is_empty() {
			return Err(ConnectionConfigError::EmptyHost);
		}
		if self.host.chars().any(char::is_whitespace) {
			return Err(ConnectionConfigError::HostContainsWhitespace { host: self.host.clone() });
		}
		if self.port == 0 {
			return Err(ConnectionConfigError::ZeroPort);
		}
		if self.timeout.is_zero() {
			return Err(ConnectionConfigError::ZeroTimeout);
		}
		if self.client_id.is_empty() {
			return Err(ConnectionConfigError::EmptyCredential { field: "client_id" });
		}
		if self.client_secret.is_empty() {
			return Err(ConnectionConfigError::EmptyCredential { field: "client_secret" });
		}

		self.base_url().map(|_| ())
	}
}

/// Builder for [`ConnectionConfig`] values.
#[derive(Clone, Debug)]
pub struct ConnectionConfigBuilder {
	scheme: Scheme,
	host: String,
	port: u16,
	client_id: Secret,
	client_secret: Secret,
	verify_tls: bool,
	timeout: Duration,
}
impl ConnectionConfigBuilder {
	fn new(host: impl Into<String>) -> Self {
		Self {
			scheme: Scheme::default(),
			host: host.into(),
			port: DEFAULT_PORT,
			client_id: Secret::new(""),
			client_secret: Secret::new(""),
			verify_tls: true,
			timeout: DEFAULT_TIMEOUT,
		}
	}

	/// Overrides the URL scheme (defaults to HTTPS).
	pub fn scheme(mut self, scheme: Scheme) -> Self {
		self.scheme = scheme;

		self
	}

	/// Overrides the port (defaults to 8443).
	pub fn port(mut self, port: u16) -> Self {
		self.port = port;

		self
	}

	/// Sets the client credential pair exchanged for a bearer token.
	pub fn credentials(
		mut self,
		client_id: impl Into<Secret>,
		client_secret: impl Into<Secret>,
	) -> Self {
		self.client_id = client_id.into();
		self.client_secret = client_secret.into();

		self
	}

	/// Enables or disables certificate validation (defaults to enabled).
	pub fn verify_tls(mut self, verify: bool) -> Self {
		self.verify_tls = verify;

		self
	}

	/// Overrides the per-call timeout (defaults to 30 seconds).
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<ConnectionConfig, ConnectionConfigError> {
		let config = ConnectionConfig {
			scheme: self.scheme,
			host: self.host.trim().to_owned(),
			port: self.port,
			client_id: self.client_id,
			client_secret: self.client_secret,
			verify_tls: self.verify_tls,
			timeout: self.timeout,
		};

		config.validate()?;

		Ok(config)
	}
}

/// Loose configuration surface as supplied by callers.
///
/// Field names follow the upstream `provider` option block, so `protocol` and `verify` are
/// accepted alongside `scheme` and `verify_tls`. `timeout` is expressed in seconds.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
	/// URL scheme.
	#[serde(alias = "protocol")]
	pub scheme: Scheme,
	/// IP address or FQDN of the server.
	pub host: String,
	/// TCP port.
	pub port: u16,
	/// OAuth client identifier.
	pub client_id: Secret,
	/// OAuth client secret.
	pub client_secret: Secret,
	/// Whether server certificates are validated.
	#[serde(alias = "verify")]
	pub verify_tls: bool,
	/// Per-call timeout in seconds.
	pub timeout: u64,
}
impl Default for ProviderSettings {
	fn default() -> Self {
		Self {
			scheme: Scheme::default(),
			host: String::new(),
			port: DEFAULT_PORT,
			client_id: Secret::new(""),
			client_secret: Secret::new(""),
			verify_tls: true,
			timeout: DEFAULT_TIMEOUT.as_secs(),
		}
	}
}
impl TryFrom<ProviderSettings> for ConnectionConfig {
	type Error = ConnectionConfigError;

	fn try_from(settings: ProviderSettings) -> Result<Self, Self::Error> {
		ConnectionConfig::builder(settings.host)
			.scheme(settings.scheme)
			.port(settings.port)
			.credentials(settings.client_id, settings.client_secret)
			.verify_tls(settings.verify_tls)
			.timeout(Duration::from_secs(settings.timeout))
			.build()
	}
}
