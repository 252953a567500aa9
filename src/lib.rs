//! Authenticated GraphQL + REST client composition for the Product Hunt API—token-injecting
//! transports, a normalized record cache keyed by entity id, and an explicit composition root.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod compose;
pub mod error;
pub mod graphql;
pub mod http;
pub mod obs;
pub mod rest;
pub mod settings;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		cache::CacheStorage,
		compose::{ComposeConfig, HuntClients, compose},
		settings::{MemorySettings, SettingsStore},
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_client() -> ReqwestClient {
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Composes a client set against mock endpoints, backed by an in-memory settings store and
	/// a memory-only record cache.
	///
	/// Pass `None` to leave the settings store unseeded and exercise the fallback credential.
	pub fn compose_test_clients(
		graphql_endpoint: Url,
		rest_endpoint: Url,
		token: Option<&str>,
		debug: bool,
	) -> (HuntClients, Arc<MemorySettings>) {
		let settings = Arc::new(MemorySettings::default());

		if let Some(token) = token {
			settings
				.set_token(token)
				.expect("Writing a token into the in-memory settings store should succeed.");
		}

		let config = ComposeConfig::new(settings.clone() as Arc<dyn SettingsStore>)
			.debug(debug)
			.cache(CacheStorage::Memory)
			.graphql_endpoint(graphql_endpoint)
			.rest_endpoint(rest_endpoint)
			.http_client(test_reqwest_client());
		let clients = compose(config).expect("Composing test clients should succeed.");

		(clients, settings)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, hunt_client as _, tokio as _};
