//! File-backed [`RecordStore`] persisting normalized records across restarts.
//!
//! This backs the named cache configuration (e.g. `hunt_cache`): the snapshot
//! is loaded eagerly at open and rewritten atomically after every merge.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	cache::{
		CacheError, CacheKey,
		store::{RecordSet, RecordStore, merge_into},
	},
};

/// Persists normalized records to a JSON snapshot after each mutation.
#[derive(Clone, Debug)]
pub struct FileRecordStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<CacheKey, RecordSet>>>,
}
impl FileRecordStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing records.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = if path.exists() { Self::load_snapshot(&path)? } else { HashMap::new() };

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<CacheKey, RecordSet>, CacheError> {
		let metadata = path.metadata().map_err(|e| CacheError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| CacheError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		let entries: Vec<(CacheKey, RecordSet)> =
			serde_json::from_slice(&bytes).map_err(|e| CacheError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(entries.into_iter().collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), CacheError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| CacheError::Backend {
				message: format!("Failed to create cache directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &HashMap<CacheKey, RecordSet>) -> Result<(), CacheError> {
		Self::ensure_parent_exists(&self.path)?;

		let snapshot: Vec<_> = contents.iter().collect();
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| CacheError::Serialization {
				message: format!("Failed to serialize cache snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| CacheError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| CacheError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| CacheError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| CacheError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl RecordStore for FileRecordStore {
	fn load(&self, key: &CacheKey) -> Result<Option<RecordSet>, CacheError> {
		Ok(self.inner.read().get(key).cloned())
	}

	fn merge(&self, key: CacheKey, record: RecordSet) -> Result<(), CacheError> {
		if key.is_no_key() {
			return Err(CacheError::MissingKey);
		}

		let mut guard = self.inner.write();

		merge_into(guard.entry(key).or_default(), record);
		self.persist_locked(&guard)
	}

	fn clear(&self) -> Result<(), CacheError> {
		let mut guard = self.inner.write();

		guard.clear();
		self.persist_locked(&guard)
	}
}
