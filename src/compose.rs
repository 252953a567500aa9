//! The composition root: builds both client singletons at process startup.
//!
//! Construction happens exactly once, synchronously, with every collaborator
//! passed in by value—no ambient globals, no build-configuration flags read
//! from the environment. The returned clients are `Send + Sync` and meant to
//! be held in `Arc`s for the process lifetime; there is no teardown beyond
//! process exit.

// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")]
use crate::{
	auth::{AccessToken, TokenProvider},
	cache::{
		CacheKeyResolver, CacheStorage, FileRecordStore, IdFieldResolver, MemoryRecordStore,
		RecordStore,
	},
	error::ConfigError,
	graphql::GraphqlClient,
	http::{BodyLogInterceptor, HttpTransport, TokenInterceptor},
	obs::RequestKind,
	rest::RestClient,
	settings::SettingsStore,
};

/// Product Hunt GraphQL endpoint.
pub const GRAPHQL_API: &str = "https://api.producthunt.com/v2/api/graphql";
/// Product Hunt REST base URL.
pub const REST_API: &str = "https://api.producthunt.com/v2/";
/// Default name for the persistent normalized cache.
pub const DEFAULT_CACHE_NAME: &str = "hunt_cache";

/// Configuration consumed once by [`compose`].
#[cfg(feature = "reqwest")]
pub struct ComposeConfig {
	settings: Arc<dyn SettingsStore>,
	debug: bool,
	cache: CacheStorage,
	resolver: Arc<dyn CacheKeyResolver>,
	fallback: Option<AccessToken>,
	graphql_endpoint: Option<Url>,
	rest_endpoint: Option<Url>,
	http_client: Option<ReqwestClient>,
}
#[cfg(feature = "reqwest")]
impl ComposeConfig {
	/// Creates a configuration over the given settings store.
	///
	/// Defaults: release mode (no body logging), the persistent `hunt_cache`
	/// store, the id-field resolver, the production endpoint constants, and a
	/// stock reqwest client.
	pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
		Self {
			settings,
			debug: false,
			cache: CacheStorage::named(DEFAULT_CACHE_NAME),
			resolver: Arc::new(IdFieldResolver),
			fallback: None,
			graphql_endpoint: None,
			rest_endpoint: None,
			http_client: None,
		}
	}

	/// Sets the debug flag; `true` installs the body-logging interceptor on both transports.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;

		self
	}

	/// Overrides the cache storage choice.
	pub fn cache(mut self, cache: CacheStorage) -> Self {
		self.cache = cache;

		self
	}

	/// Overrides the cache-key resolver.
	pub fn resolver(mut self, resolver: Arc<dyn CacheKeyResolver>) -> Self {
		self.resolver = resolver;

		self
	}

	/// Overrides the fallback credential used when no token is persisted.
	pub fn fallback_token(mut self, fallback: AccessToken) -> Self {
		self.fallback = Some(fallback);

		self
	}

	/// Overrides the GraphQL endpoint (tests point this at a mock server).
	pub fn graphql_endpoint(mut self, endpoint: Url) -> Self {
		self.graphql_endpoint = Some(endpoint);

		self
	}

	/// Overrides the REST base URL (tests point this at a mock server).
	pub fn rest_endpoint(mut self, endpoint: Url) -> Self {
		self.rest_endpoint = Some(endpoint);

		self
	}

	/// Supplies a preconfigured reqwest client shared by both transports.
	pub fn http_client(mut self, client: ReqwestClient) -> Self {
		self.http_client = Some(client);

		self
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ComposeConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ComposeConfig")
			.field("debug", &self.debug)
			.field("cache", &self.cache)
			.field("fallback_set", &self.fallback.is_some())
			.finish()
	}
}

/// The two client singletons produced by [`compose`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct HuntClients {
	/// Authenticated GraphQL client with the normalized record cache.
	pub graphql: Arc<GraphqlClient>,
	/// Plain REST client.
	pub rest: Arc<RestClient>,
}

#[cfg(feature = "reqwest")]
fn endpoint(override_url: Option<Url>, constant: &'static str) -> Result<Url, ConfigError> {
	match override_url {
		Some(url) => Ok(url),
		None => Url::parse(constant)
			.map_err(|source| ConfigError::InvalidEndpoint { url: constant.to_owned(), source }),
	}
}

/// Builds both clients from the given configuration.
///
/// The GraphQL stack is wired as token provider → token interceptor →
/// authenticated transport → client over the normalized record store; the REST
/// stack independently gets a plain transport. Both share one reqwest client.
#[cfg(feature = "reqwest")]
pub fn compose(config: ComposeConfig) -> Result<HuntClients> {
	let graphql_endpoint = endpoint(config.graphql_endpoint, GRAPHQL_API)?;
	let rest_endpoint = endpoint(config.rest_endpoint, REST_API)?;
	let client = match config.http_client {
		Some(client) => client,
		None => ReqwestClient::builder().build().map_err(ConfigError::from)?,
	};
	let store: Arc<dyn RecordStore> = match config.cache {
		CacheStorage::Memory => Arc::new(MemoryRecordStore::default()),
		CacheStorage::Persistent { path } => Arc::new(FileRecordStore::open(path)?),
	};
	let provider = match config.fallback {
		Some(fallback) => TokenProvider::with_fallback(config.settings, fallback),
		None => TokenProvider::new(config.settings),
	};
	let mut graphql_transport = HttpTransport::new(client.clone(), RequestKind::Graphql);

	if config.debug {
		graphql_transport = graphql_transport.with_interceptor(Arc::new(BodyLogInterceptor));
	}

	// The token interceptor sits last: network level, after any debug logging.
	graphql_transport =
		graphql_transport.with_interceptor(Arc::new(TokenInterceptor::new(provider)));

	let mut rest_transport = HttpTransport::new(client, RequestKind::Rest);

	if config.debug {
		rest_transport = rest_transport.with_interceptor(Arc::new(BodyLogInterceptor));
	}

	let graphql =
		Arc::new(GraphqlClient::new(graphql_endpoint, graphql_transport, config.resolver, store));
	let rest = Arc::new(RestClient::new(rest_endpoint, rest_transport));

	Ok(HuntClients { graphql, rest })
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::settings::MemorySettings;

	fn config() -> ComposeConfig {
		ComposeConfig::new(Arc::new(MemorySettings::default())).cache(CacheStorage::Memory)
	}

	#[test]
	fn endpoint_constants_parse() {
		Url::parse(GRAPHQL_API).expect("GraphQL endpoint constant should parse.");
		Url::parse(REST_API).expect("REST base URL constant should parse.");
	}

	#[test]
	fn release_mode_installs_only_the_token_interceptor() {
		let clients = compose(config()).expect("Composing release clients should succeed.");

		assert_eq!(clients.graphql.transport().interceptor_labels(), ["token"]);
		assert!(clients.rest.transport().interceptor_labels().is_empty());
	}

	#[test]
	fn debug_mode_installs_exactly_one_body_logger_per_transport() {
		let clients =
			compose(config().debug(true)).expect("Composing debug clients should succeed.");

		assert_eq!(clients.graphql.transport().interceptor_labels(), ["body_log", "token"]);
		assert_eq!(clients.rest.transport().interceptor_labels(), ["body_log"]);
	}
}
