//! REST client assembly: plain transport + typed JSON decoding.
//!
//! Unlike the GraphQL stack this client carries no token interceptor; the only
//! optional extra on its transport is the debug body logger.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::TransientError};
#[cfg(feature = "reqwest")]
use crate::{
	error::ConfigError,
	http::{HttpTransport, Method, RequestParts},
};

fn decode<T>(body: &[u8], status: Option<u16>) -> Result<T, TransientError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransientError::ResponseParse { source, status })
}

/// REST client over the plain transport.
#[cfg(feature = "reqwest")]
pub struct RestClient {
	base: Url,
	transport: HttpTransport,
}
#[cfg(feature = "reqwest")]
impl RestClient {
	/// Assembles a client over the given base URL and transport.
	pub fn new(base: Url, transport: HttpTransport) -> Self {
		Self { base, transport }
	}

	/// Returns the transport, mainly so tests can inspect the interceptor chain.
	pub fn transport(&self) -> &HttpTransport {
		&self.transport
	}

	/// GETs `path` relative to the base URL and decodes the JSON body into `T`.
	pub async fn get<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let url = self.base.join(path).map_err(|source| ConfigError::InvalidPath {
			path: path.to_owned(),
			source,
		})?;
		let response = self.transport.execute(RequestParts::new(Method::Get, url)).await?;

		response.ensure_success()?;

		Ok(decode(&response.body, response.metadata.status)?)
	}
}
#[cfg(feature = "reqwest")]
impl Debug for RestClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClient")
			.field("base", &self.base)
			.field("transport", &self.transport)
			.finish()
	}
}
