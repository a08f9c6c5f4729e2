//! Typed client for the ExtremeCloud IQ Site Engine northbound GraphQL API, with a small
//! desired-state reconciler for sites and devices built on top of it.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod nbi;
pub mod obs;
pub mod reconcile;
pub mod resource;
pub mod secret;
pub mod transport;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use parking_lot::Mutex;
	// self
	use crate::{
		config::ConnectionConfig,
		error::TransportError,
		transport::{Transport, TransportFuture, TransportRequest, TransportResponse},
	};

	/// Client identifier used by [`test_config`].
	pub const TEST_CLIENT_ID: &str = "abc";
	/// Client secret used by [`test_config`].
	pub const TEST_CLIENT_SECRET: &str = "xyz";

	/// Builds a valid connection config pointing at a host that is never contacted.
	pub fn test_config() -> ConnectionConfig {
		ConnectionConfig::builder("xiqse.test")
			.credentials(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
			.build()
			.expect("Test connection config should be valid.")
	}

	/// In-memory [`Transport`] that replays scripted responses in order and records every
	/// request it receives.
	///
	/// Once the script is exhausted each call fails with [`TransportError::Network`].
	#[derive(Debug, Default)]
	pub struct ScriptedTransport {
		script: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
		requests: Mutex<Vec<TransportRequest>>,
	}
	impl ScriptedTransport {
		/// Queues a raw response.
		pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
			self.script.lock().push_back(Ok(TransportResponse::new(status, body)));

			self
		}

		/// Queues a JSON response.
		pub fn respond_json(self, status: u16, body: Value) -> Self {
			self.respond(status, body.to_string())
		}

		/// Queues a successful token exchange.
		pub fn respond_token(self, token: &str) -> Self {
			self.respond_json(200, serde_json::json!({ "access_token": token }))
		}

		/// Queues a transport failure.
		pub fn fail(self, err: TransportError) -> Self {
			self.script.lock().push_back(Err(err));

			self
		}

		/// Returns a snapshot of the recorded requests.
		pub fn requests(&self) -> Vec<TransportRequest> {
			self.requests.lock().clone()
		}

		/// Returns how many requests were dispatched.
		pub fn request_count(&self) -> usize {
			self.requests.lock().len()
		}

		/// Returns how many scripted entries were never consumed.
		pub fn remaining(&self) -> usize {
			self.script.lock().len()
		}
	}
	impl Transport for ScriptedTransport {
		fn dispatch(&self, request: TransportRequest) -> TransportFuture<'_> {
			self.requests.lock().push(request);

			let next = self.script.lock().pop_front().unwrap_or_else(|| {
				Err(TransportError::network(std::io::Error::other("script exhausted")))
			});

			Box::pin(async move { next })
		}
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
