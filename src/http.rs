//! Transport primitives: request parts, network interceptors, and the reqwest executor.
//!
//! Interceptors are the crate's only hook into outgoing traffic. They run in
//! registration order after the request is fully assembled and immediately
//! before transmission, seeing the same [`RequestParts`] view the wire will
//! carry. The token injector and the debug body logger are both expressed this
//! way, so the executor itself stays policy-free.

// self
use crate::{_prelude::*, auth::TokenProvider, error::TransientError};
#[cfg(feature = "reqwest")]
use crate::{
	error::TransportError,
	obs::{RequestKind, RequestOutcome, RequestSpan, record_request_outcome},
};
#[cfg(feature = "reqwest")] use reqwest::header::RETRY_AFTER;
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;

/// Query parameter name carrying the access token on every authenticated request.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// HTTP methods the composed clients emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
}
impl Method {
	/// Returns the canonical method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}

	#[cfg(feature = "reqwest")]
	fn as_reqwest(self) -> reqwest::Method {
		match self {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Mutable view of an outgoing request as seen by network interceptors.
#[derive(Clone, Debug)]
pub struct RequestParts {
	/// Request method.
	pub method: Method,
	/// Full request URL, including any query parameters set so far.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Request body bytes, if any.
	pub body: Option<Vec<u8>>,
}
impl RequestParts {
	/// Creates bodyless request parts for the given method and URL.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Appends a header pair.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Attaches a request body.
	pub fn body(mut self, bytes: impl Into<Vec<u8>>) -> Self {
		self.body = Some(bytes.into());

		self
	}
}

/// Hook observing and rewriting a request immediately before it is sent.
pub trait NetworkInterceptor
where
	Self: Send + Sync,
{
	/// Stable label identifying the interceptor in diagnostics.
	fn label(&self) -> &'static str;

	/// Rewrites the request parts; runs on every request, unconditionally.
	fn intercept(&self, parts: RequestParts) -> RequestParts;
}

/// Appends the resolved access token as a query parameter.
///
/// Everything else about the request—method, body, headers, pre-existing query
/// parameters—passes through untouched. The token is resolved per request, so
/// a credential persisted after startup is picked up without rebuilding the
/// client.
pub struct TokenInterceptor(TokenProvider);
impl TokenInterceptor {
	/// Creates an interceptor resolving tokens through the given provider.
	pub fn new(provider: TokenProvider) -> Self {
		Self(provider)
	}
}
impl NetworkInterceptor for TokenInterceptor {
	fn label(&self) -> &'static str {
		"token"
	}

	fn intercept(&self, mut parts: RequestParts) -> RequestParts {
		let token = self.0.resolve();

		parts.url.query_pairs_mut().append_pair(ACCESS_TOKEN_PARAM, token.expose());

		parts
	}
}
impl Debug for TokenInterceptor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenInterceptor").field(&self.0).finish()
	}
}

/// Logs the request line and body at DEBUG; a pass-through otherwise.
///
/// Only installed when the composition root runs with the debug flag set. The
/// logging itself compiles to a no-op unless the `tracing` feature is enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct BodyLogInterceptor;
impl NetworkInterceptor for BodyLogInterceptor {
	fn label(&self) -> &'static str {
		"body_log"
	}

	fn intercept(&self, parts: RequestParts) -> RequestParts {
		crate::obs::log_body("request", parts.method.as_str(), &parts.url, parts.body.as_deref());

		parts
	}
}

/// Captures metadata from the most recent HTTP response for downstream error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the endpoint, if available.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Raw response handed back by [`HttpTransport::execute`].
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// Status and retry metadata captured from the response.
	pub metadata: ResponseMetadata,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Fails with a [`TransientError::Endpoint`] unless the status is 2xx.
	pub fn ensure_success(&self) -> Result<&Self, TransientError> {
		match self.metadata.status {
			Some(status) if (200..300).contains(&status) => Ok(self),
			status => Err(TransientError::Endpoint {
				message: String::from_utf8_lossy(&self.body).into_owned(),
				status,
				retry_after: self.metadata.retry_after,
			}),
		}
	}
}

/// Reqwest-backed request executor carrying an interceptor chain.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct HttpTransport {
	client: ReqwestClient,
	kind: RequestKind,
	interceptors: Vec<Arc<dyn NetworkInterceptor>>,
}
#[cfg(feature = "reqwest")]
impl HttpTransport {
	/// Creates a transport over an existing reqwest client with an empty chain.
	pub fn new(client: ReqwestClient, kind: RequestKind) -> Self {
		Self { client, kind, interceptors: Vec::new() }
	}

	/// Appends an interceptor to the end of the chain.
	pub fn with_interceptor(mut self, interceptor: Arc<dyn NetworkInterceptor>) -> Self {
		self.interceptors.push(interceptor);

		self
	}

	/// Returns the labels of the installed interceptors, in execution order.
	pub fn interceptor_labels(&self) -> Vec<&'static str> {
		self.interceptors.iter().map(|i| i.label()).collect()
	}

	/// Runs the interceptor chain, dispatches the request, and captures response metadata.
	pub async fn execute(&self, parts: RequestParts) -> Result<TransportResponse> {
		let parts =
			self.interceptors.iter().fold(parts, |parts, interceptor| interceptor.intercept(parts));
		let span = RequestSpan::new(self.kind, "execute");

		record_request_outcome(self.kind, RequestOutcome::Attempt);

		let outcome = span.instrument(self.dispatch(parts)).await;

		match &outcome {
			Ok(_) => record_request_outcome(self.kind, RequestOutcome::Success),
			Err(_) => record_request_outcome(self.kind, RequestOutcome::Failure),
		}

		outcome
	}

	async fn dispatch(&self, parts: RequestParts) -> Result<TransportResponse> {
		let log_bodies = self.interceptors.iter().any(|i| i.label() == "body_log");
		let mut request = self.client.request(parts.method.as_reqwest(), parts.url.clone());

		for (name, value) in &parts.headers {
			request = request.header(name, value);
		}
		if let Some(body) = parts.body {
			request = request.body(body);
		}

		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let retry_after = parse_retry_after(response.headers());
		let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

		if log_bodies {
			crate::obs::log_body("response", parts.method.as_str(), &parts.url, Some(&body));
		}

		Ok(TransportResponse {
			metadata: ResponseMetadata { status: Some(status), retry_after },
			body,
		})
	}
}
#[cfg(feature = "reqwest")]
impl Debug for HttpTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpTransport")
			.field("kind", &self.kind)
			.field("interceptors", &self.interceptor_labels())
			.finish()
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(secs as i64));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::settings::{MemorySettings, SettingsStore};

	fn token_interceptor(token: &str) -> TokenInterceptor {
		let settings = MemorySettings::default();

		settings.set_token(token).expect("Writing into the memory store should succeed.");

		TokenInterceptor::new(TokenProvider::new(Arc::new(settings)))
	}

	fn query_pairs(url: &Url) -> Vec<(String, String)> {
		url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
	}

	#[test]
	fn token_interceptor_appends_exactly_one_parameter() {
		let url = Url::parse("https://api.example.test/graphql?first=10&after=cursor")
			.expect("Fixture URL should parse.");
		let parts = RequestParts::new(Method::Post, url)
			.header("content-type", "application/json")
			.body(br#"{"query":"{ posts }"}"#.to_vec());
		let before = parts.clone();
		let after = token_interceptor("abc").intercept(parts);
		let pairs = query_pairs(&after.url);
		let token_values: Vec<_> = pairs
			.iter()
			.filter(|(name, _)| name == ACCESS_TOKEN_PARAM)
			.map(|(_, value)| value.as_str())
			.collect();

		assert_eq!(token_values, ["abc"]);
		// Every original query parameter survives, in order, ahead of the token.
		assert_eq!(pairs[..2], query_pairs(&before.url)[..]);
		assert_eq!(after.method, before.method);
		assert_eq!(after.headers, before.headers);
		assert_eq!(after.body, before.body);
	}

	#[test]
	fn token_interceptor_resolves_per_request() {
		let settings = MemorySettings::default();

		settings.set_token("first").expect("Writing into the memory store should succeed.");

		let interceptor = TokenInterceptor::new(TokenProvider::new(Arc::new(settings.clone())));
		let url = Url::parse("https://api.example.test/graphql").expect("Fixture URL should parse.");
		let first = interceptor.intercept(RequestParts::new(Method::Post, url.clone()));

		settings.set_token("second").expect("Writing into the memory store should succeed.");

		let second = interceptor.intercept(RequestParts::new(Method::Post, url));

		assert!(first.url.query().is_some_and(|q| q.contains("access_token=first")));
		assert!(second.url.query().is_some_and(|q| q.contains("access_token=second")));
	}

	#[test]
	fn body_log_interceptor_is_a_pass_through() {
		let url = Url::parse("https://api.example.test/v2/posts?days_ago=1")
			.expect("Fixture URL should parse.");
		let parts = RequestParts::new(Method::Get, url);
		let before = parts.clone();
		let after = BodyLogInterceptor.intercept(parts);

		assert_eq!(after.url, before.url);
		assert_eq!(after.headers, before.headers);
		assert_eq!(after.body, before.body);
	}

	#[test]
	fn ensure_success_maps_error_statuses() {
		let response = TransportResponse {
			metadata: ResponseMetadata {
				status: Some(429),
				retry_after: Some(Duration::seconds(30)),
			},
			body: b"slow down".to_vec(),
		};
		let error = response.ensure_success().expect_err("A 429 must not count as success.");

		match error {
			TransientError::Endpoint { message, status, retry_after } => {
				assert_eq!(message, "slow down");
				assert_eq!(status, Some(429));
				assert_eq!(retry_after, Some(Duration::seconds(30)));
			},
			other => panic!("Expected an endpoint error, got {other:?}."),
		}
	}

	#[test]
	fn ensure_success_accepts_2xx() {
		let response = TransportResponse {
			metadata: ResponseMetadata { status: Some(204), retry_after: None },
			body: Vec::new(),
		};

		assert!(response.ensure_success().is_ok());
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn retry_after_parses_seconds() {
		let mut headers = reqwest::header::HeaderMap::new();

		headers.insert(RETRY_AFTER, "120".parse().expect("Fixture header should parse."));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(120)));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn interceptor_labels_reflect_the_chain() {
		let transport = HttpTransport::new(ReqwestClient::default(), RequestKind::Graphql)
			.with_interceptor(Arc::new(BodyLogInterceptor))
			.with_interceptor(Arc::new(token_interceptor("abc")));

		assert_eq!(transport.interceptor_labels(), ["body_log", "token"]);
	}
}
