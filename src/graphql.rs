//! GraphQL client assembly: authenticated transport + normalized record cache.
//!
//! The client does not plan queries or resolve fields—that is the engine's
//! job. It owns the wire envelope, response decoding, and the normalization
//! policy seam: which key an entity lands under, and whether it lands at all.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	cache::{CacheKey, CacheKeyResolver, RecordSet, RecordStore, ResponseField, Variables},
	error::TransientError,
};
#[cfg(feature = "reqwest")]
use crate::{
	error::ConfigError,
	http::{HttpTransport, Method, RequestParts},
};

/// A GraphQL operation ready for the wire.
#[derive(Clone, Debug, Serialize)]
pub struct GraphqlRequest {
	query: String,
	#[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
	operation_name: Option<String>,
	#[serde(skip_serializing_if = "Variables::is_empty")]
	variables: Variables,
}
impl GraphqlRequest {
	/// Creates a request carrying the given query text.
	pub fn new(query: impl Into<String>) -> Self {
		Self { query: query.into(), operation_name: None, variables: Variables::new() }
	}

	/// Names the operation within the query document.
	pub fn operation_name(mut self, name: impl Into<String>) -> Self {
		self.operation_name = Some(name.into());

		self
	}

	/// Attaches the operation variables.
	pub fn variables(mut self, variables: Variables) -> Self {
		self.variables = variables;

		self
	}
}

/// A single error entry from the response `errors` array.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphqlResponseError {
	/// Human-readable error message.
	pub message: String,
	/// Path to the response field the error applies to, if any.
	#[serde(default)]
	pub path: Vec<serde_json::Value>,
}

/// Decoded GraphQL response envelope.
///
/// Field-level errors are data, not failures: the endpoint answered, so they
/// are surfaced here for the caller to inspect rather than mapped into the
/// crate error taxonomy.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphqlResponse<T> {
	/// Decoded `data` payload, when present.
	pub data: Option<T>,
	/// Field-level errors reported by the endpoint.
	#[serde(default)]
	pub errors: Vec<GraphqlResponseError>,
}

fn decode<T>(body: &[u8], status: Option<u16>) -> Result<GraphqlResponse<T>, TransientError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransientError::ResponseParse { source, status })
}

/// GraphQL client over the authenticated transport and the normalized record cache.
#[cfg(feature = "reqwest")]
pub struct GraphqlClient {
	endpoint: Url,
	transport: HttpTransport,
	resolver: Arc<dyn CacheKeyResolver>,
	store: Arc<dyn RecordStore>,
}
#[cfg(feature = "reqwest")]
impl GraphqlClient {
	/// Assembles a client from its collaborators.
	pub fn new(
		endpoint: Url,
		transport: HttpTransport,
		resolver: Arc<dyn CacheKeyResolver>,
		store: Arc<dyn RecordStore>,
	) -> Self {
		Self { endpoint, transport, resolver, store }
	}

	/// Returns the transport, mainly so tests can inspect the interceptor chain.
	pub fn transport(&self) -> &HttpTransport {
		&self.transport
	}

	/// Returns the normalized record store backing this client.
	pub fn record_store(&self) -> &Arc<dyn RecordStore> {
		&self.store
	}

	/// POSTs the operation envelope and decodes the response.
	pub async fn execute<T>(&self, request: &GraphqlRequest) -> Result<GraphqlResponse<T>>
	where
		T: DeserializeOwned,
	{
		let payload = serde_json::to_vec(request).map_err(ConfigError::RequestSerialize)?;
		let parts = RequestParts::new(Method::Post, self.endpoint.clone())
			.header("content-type", "application/json")
			.body(payload);
		let response = self.transport.execute(parts).await?;

		response.ensure_success()?;

		Ok(decode(&response.body, response.metadata.status)?)
	}

	/// Normalizes one entity record set into the cache.
	///
	/// The key is derived via the record path of the resolver. Entities that
	/// resolve to the no-key sentinel are skipped—never merged—and `None` is
	/// returned to signal the exclusion.
	pub fn normalize(
		&self,
		field: &ResponseField,
		record_set: &RecordSet,
	) -> Result<Option<CacheKey>> {
		let key = self.resolver.from_record_set(field, record_set);

		if key.is_no_key() {
			return Ok(None);
		}

		self.store.merge(key.clone(), record_set.clone())?;

		Ok(Some(key))
	}

	/// Looks up a cached entity via the argument path of the resolver.
	///
	/// Because both resolver paths agree on the key, a record merged after a
	/// mutation is found here by the equivalent query arguments.
	pub fn lookup(
		&self,
		field: &ResponseField,
		variables: &Variables,
	) -> Result<Option<RecordSet>> {
		let key = self.resolver.from_field_arguments(field, variables);

		if key.is_no_key() {
			return Ok(None);
		}

		Ok(self.store.load(&key)?)
	}
}
#[cfg(feature = "reqwest")]
impl Debug for GraphqlClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GraphqlClient")
			.field("endpoint", &self.endpoint)
			.field("transport", &self.transport)
			.finish()
	}
}
