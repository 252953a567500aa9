//! Thread-safe in-memory [`RecordStore`] implementation.
//!
//! This is what the composition root builds when no cache name is configured:
//! records live for the process only and never touch the disk.

// self
use crate::{
	_prelude::*,
	cache::{
		CacheError, CacheKey,
		store::{RecordSet, RecordStore, merge_into},
	},
};

type RecordMap = Arc<RwLock<HashMap<CacheKey, RecordSet>>>;

/// Memory-only record store; contents do not survive a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore(RecordMap);
impl MemoryRecordStore {
	/// Returns the number of stored records.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no records are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl RecordStore for MemoryRecordStore {
	fn load(&self, key: &CacheKey) -> Result<Option<RecordSet>, CacheError> {
		Ok(self.0.read().get(key).cloned())
	}

	fn merge(&self, key: CacheKey, record: RecordSet) -> Result<(), CacheError> {
		if key.is_no_key() {
			return Err(CacheError::MissingKey);
		}

		merge_into(self.0.write().entry(key).or_default(), record);

		Ok(())
	}

	fn clear(&self) -> Result<(), CacheError> {
		self.0.write().clear();

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn record(pairs: &[(&str, &str)]) -> RecordSet {
		pairs
			.iter()
			.map(|(field, value)| {
				((*field).to_owned(), serde_json::Value::String((*value).to_owned()))
			})
			.collect()
	}

	#[test]
	fn merge_and_load_round_trip() {
		let store = MemoryRecordStore::default();
		let key = CacheKey::new("42");

		store
			.merge(key.clone(), record(&[("id", "42"), ("name", "Posthaven")]))
			.expect("Merging into the memory store should succeed.");

		let loaded = store
			.load(&key)
			.expect("Loading from the memory store should succeed.")
			.expect("Merged record should be present.");

		assert_eq!(loaded.get("name").and_then(serde_json::Value::as_str), Some("Posthaven"));
	}

	#[test]
	fn merge_upserts_fields_and_retains_the_rest() {
		let store = MemoryRecordStore::default();
		let key = CacheKey::new("42");

		store
			.merge(key.clone(), record(&[("id", "42"), ("name", "Posthaven"), ("tagline", "old")]))
			.expect("Initial merge should succeed.");
		store
			.merge(key.clone(), record(&[("tagline", "new")]))
			.expect("Partial merge should succeed.");

		let loaded = store
			.load(&key)
			.expect("Loading from the memory store should succeed.")
			.expect("Merged record should be present.");

		assert_eq!(loaded.get("tagline").and_then(serde_json::Value::as_str), Some("new"));
		assert_eq!(loaded.get("name").and_then(serde_json::Value::as_str), Some("Posthaven"));
	}

	#[test]
	fn no_key_records_are_rejected() {
		let store = MemoryRecordStore::default();
		let outcome = store.merge(CacheKey::NO_KEY, record(&[("name", "Posthaven")]));

		assert_eq!(outcome, Err(CacheError::MissingKey));
		assert!(store.is_empty());
	}

	#[test]
	fn clear_removes_everything() {
		let store = MemoryRecordStore::default();

		store
			.merge(CacheKey::new("42"), record(&[("id", "42")]))
			.expect("Merging into the memory store should succeed.");
		store.clear().expect("Clearing the memory store should succeed.");

		assert!(store.is_empty());
	}
}
