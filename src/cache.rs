//! Normalized-cache keys, the id-based key resolver, and record-store backends.
//!
//! Normalization itself (query planning, field selection, consistency across
//! concurrent writers) is the business of the GraphQL engine this crate
//! composes with. What lives here is the authored policy: how an entity's
//! cache key is derived, and the storage seam those keyed records flow
//! through.

pub mod key;
pub mod resolver;
pub mod store;

pub use key::CacheKey;
pub use resolver::*;
pub use store::{FileRecordStore, MemoryRecordStore, RecordSet, RecordStore};

// std
use std::path::PathBuf;
// self
use crate::_prelude::*;

/// Error type produced by [`RecordStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// A record carrying the no-key sentinel was handed to the store.
	#[error("Record set has no cache key and must not be normalized.")]
	MissingKey,
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Storage choice for the normalized record cache, made at composition time.
///
/// Passing no name in the original configuration yields a memory-only cache
/// that does not persist across restarts; a named cache lands in a local file
/// and survives them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStorage {
	/// In-process records only; nothing outlives the process.
	Memory,
	/// Records persisted to a named local snapshot file.
	Persistent {
		/// Path of the snapshot file.
		path: PathBuf,
	},
}
impl CacheStorage {
	/// Builds a persistent storage choice from a bare cache name (e.g. `hunt_cache`),
	/// mapping it to `<name>.json` in the current working directory.
	pub fn named(name: impl AsRef<str>) -> Self {
		Self::Persistent { path: PathBuf::from(format!("{}.json", name.as_ref())) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn cache_error_converts_into_crate_error_with_source() {
		let cache_error = CacheError::Backend { message: "snapshot unwritable".into() };
		let crate_error: Error = cache_error.clone().into();

		assert!(matches!(crate_error, Error::Cache(_)));
		assert!(crate_error.to_string().contains("snapshot unwritable"));

		let source = StdError::source(&crate_error)
			.expect("Crate error should expose the original cache error as its source.");

		assert_eq!(source.to_string(), cache_error.to_string());
	}

	#[test]
	fn named_storage_maps_to_json_snapshot() {
		let storage = CacheStorage::named("hunt_cache");

		assert_eq!(storage, CacheStorage::Persistent { path: PathBuf::from("hunt_cache.json") });
	}
}
