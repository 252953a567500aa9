//! Storage seam for normalized records and the built-in backends.

pub mod file;
pub mod memory;

pub use file::FileRecordStore;
pub use memory::MemoryRecordStore;

// self
use crate::{
	_prelude::*,
	cache::{CacheError, CacheKey},
};

/// Materialized field map for a single normalized entity.
pub type RecordSet = BTreeMap<String, serde_json::Value>;

/// Storage backend contract for normalized records.
///
/// The contract is deliberately narrow—load, field-level merge, clear. Cache
/// consistency and eviction belong to the engine layered on top, not to the
/// backends implementing this seam.
pub trait RecordStore
where
	Self: Send + Sync,
{
	/// Fetches the record stored under `key`, if present.
	fn load(&self, key: &CacheKey) -> Result<Option<RecordSet>, CacheError>;

	/// Merges `record` into the entity stored under `key`, field by field.
	///
	/// Fields present in `record` replace same-named stored fields; stored
	/// fields absent from `record` are retained. Handing in [`CacheKey::NO_KEY`]
	/// is a caller bug and fails with [`CacheError::MissingKey`].
	fn merge(&self, key: CacheKey, record: RecordSet) -> Result<(), CacheError>;

	/// Removes every stored record.
	fn clear(&self) -> Result<(), CacheError>;
}

pub(crate) fn merge_into(target: &mut RecordSet, record: RecordSet) {
	for (field, value) in record {
		target.insert(field, value);
	}
}
