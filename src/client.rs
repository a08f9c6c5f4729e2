//! Provider client: token exchange and GraphQL execution against one Site Engine.
//!
//! A [`ProviderClient`] owns one validated [`ConnectionConfig`], a shared [`Transport`], and at
//! most one bearer token. The token is acquired lazily on the first [`ProviderClient::execute`]
//! (or eagerly through [`ProviderClient::authenticate`]) and then reused for the lifetime of the
//! client. Nothing refreshes it: a GraphQL 401 surfaces as
//! [`AuthenticationError::TokenRejected`] and the caller decides whether to build a new client.
//!
//! Every operation takes `&mut self`, so one client drives one sequence of calls at a time.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	config::ConnectionConfig,
	error::{AuthenticationError, ConfigError, TransportError},
	graphql::{GraphQlRequest, GraphQlResponse, Variables},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	secret::Secret,
	transport::{RequestBody, Transport, TransportRequest},
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestProviderClient = ProviderClient<ReqwestTransport>;

/// Bearer token issued by the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Opaque token value.
	pub secret: Secret,
	/// When the token was received.
	pub acquired_at: OffsetDateTime,
}
impl AccessToken {
	/// Wraps a freshly issued token value.
	pub fn new(secret: impl Into<Secret>) -> Self {
		Self { secret: secret.into(), acquired_at: OffsetDateTime::now_utc() }
	}
}

/// Authentication state of a [`ProviderClient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
	/// No token has been acquired yet.
	Unauthenticated,
	/// A token is cached and attached to every GraphQL call.
	Authenticated,
}

#[derive(Deserialize)]
struct TokenResponse {
	#[serde(default)]
	access_token: Option<String>,
}

#[derive(Clone, Debug)]
struct Endpoints {
	token: Url,
	graphql: Url,
}

/// Authenticated GraphQL client for one Site Engine endpoint.
pub struct ProviderClient<T>
where
	T: ?Sized + Transport,
{
	config: ConnectionConfig,
	transport: Arc<T>,
	endpoints: Endpoints,
	token: Option<AccessToken>,
}
impl<T> ProviderClient<T>
where
	T: ?Sized + Transport,
{
	/// Creates a client that reuses the caller-provided transport.
	///
	/// The transport is responsible for honoring `config.verify_tls`; the client only emits the
	/// insecure-TLS notice.
	pub fn with_transport(config: ConnectionConfig, transport: impl Into<Arc<T>>) -> Result<Self> {
		let endpoints =
			Endpoints { token: config.token_endpoint()?, graphql: config.graphql_endpoint()? };

		if !config.verify_tls {
			obs::record_insecure_tls(&config.host);
		}

		Ok(Self { config, transport: transport.into(), endpoints, token: None })
	}

	/// Returns the connection settings.
	pub fn config(&self) -> &ConnectionConfig {
		&self.config
	}

	/// Returns the GraphQL endpoint URL.
	pub fn graphql_endpoint(&self) -> &Url {
		&self.endpoints.graphql
	}

	/// Returns the token endpoint URL, including its `grant_type` query.
	pub fn token_endpoint(&self) -> &Url {
		&self.endpoints.token
	}

	/// Returns the current authentication state.
	pub fn state(&self) -> SessionState {
		if self.token.is_some() {
			SessionState::Authenticated
		} else {
			SessionState::Unauthenticated
		}
	}

	/// Returns `true` once a token is cached.
	pub fn is_authenticated(&self) -> bool {
		self.token.is_some()
	}

	/// Returns the cached token, if any.
	pub fn token(&self) -> Option<&AccessToken> {
		self.token.as_ref()
	}

	/// Exchanges the client credentials for a bearer token and caches it.
	///
	/// Each call performs exactly one token request. On failure the previously cached token,
	/// if any, is kept.
	pub async fn authenticate(&mut self) -> Result<&AccessToken> {
		const KIND: OperationKind = OperationKind::Authenticate;

		let span = OperationSpan::new(KIND, "authenticate");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.request_token()).await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		Ok(&*self.token.insert(result?))
	}

	/// Executes one GraphQL document, authenticating first when no token is cached.
	pub async fn execute(
		&mut self,
		document: impl Into<String>,
		variables: Variables,
	) -> Result<GraphQlResponse> {
		let request = GraphQlRequest::new(document).with_variables(variables);

		self.execute_request(&request).await
	}

	/// Executes a prepared [`GraphQlRequest`].
	///
	/// A `data`/`errors` envelope is returned untouched; interpreting `errors` is left to the
	/// caller.
	pub async fn execute_request(&mut self, request: &GraphQlRequest) -> Result<GraphQlResponse> {
		const KIND: OperationKind = OperationKind::Execute;

		let span = OperationSpan::new(KIND, "execute_request");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async {
				if self.token.is_none() {
					self.authenticate().await?;
				}

				let bearer = self
					.token
					.as_ref()
					.map(|token| token.secret.clone())
					.ok_or(AuthenticationError::MissingAccessToken)?;

				self.post_graphql(&bearer, request).await
			})
			.await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}

	async fn request_token(&self) -> Result<AccessToken> {
		let credentials = format!(
			"{}:{}",
			self.config.client_id.expose(),
			self.config.client_secret.expose()
		);
		let request = TransportRequest::post(self.endpoints.token.clone(), self.config.timeout)
			.header("Authorization", format!("Basic {}", STANDARD.encode(credentials)))
			.header("Content-Type", "application/x-www-form-urlencoded")
			.header("Accept", "application/json");
		let response = self.transport.send(request).await.map_err(|e| match e {
			TransportError::Status { status: status @ (401 | 403), .. } =>
				AuthenticationError::InvalidClient { status },
			e => AuthenticationError::Transport(e),
		})?;
		let body = response.json::<TokenResponse>().map_err(AuthenticationError::Transport)?;

		match body.access_token {
			None => Err(AuthenticationError::MissingAccessToken.into()),
			Some(token) if token.is_empty() => Err(AuthenticationError::EmptyAccessToken.into()),
			Some(token) => Ok(AccessToken::new(token)),
		}
	}

	async fn post_graphql(
		&self,
		bearer: &Secret,
		request: &GraphQlRequest,
	) -> Result<GraphQlResponse> {
		let body = RequestBody::json(request).map_err(ConfigError::from)?;
		let http = TransportRequest::post(self.endpoints.graphql.clone(), self.config.timeout)
			.header("Authorization", format!("Bearer {}", bearer.expose()))
			.header("Content-Type", "application/json")
			.header("Accept", "application/json")
			.body(body);
		let response = self.transport.send(http).await.map_err(|e| match e {
			TransportError::Status { status: 401, .. } =>
				Error::from(AuthenticationError::TokenRejected { status: 401 }),
			e => Error::from(e),
		})?;

		Ok(response.json::<GraphQlResponse>()?)
	}
}
#[cfg(feature = "reqwest")]
impl ProviderClient<ReqwestTransport> {
	/// Creates a client backed by a reqwest transport built from the config's TLS policy and
	/// timeout.
	pub fn new(config: ConnectionConfig) -> Result<Self> {
		let transport = ReqwestTransport::from_config(&config)?;

		Self::with_transport(config, transport)
	}
}
impl<T> Debug for ProviderClient<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderClient")
			.field("config", &self.config)
			.field("graphql_endpoint", &self.endpoints.graphql.as_str())
			.field("state", &self.state())
			.finish()
	}
}
