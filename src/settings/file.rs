//! Simple file-backed [`SettingsStore`] for desktop deployments and demos.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	settings::{SettingsError, SettingsStore},
};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Snapshot {
	token: Option<String>,
}

/// Persists settings to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileSettings {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileSettings {
	/// Opens (or creates) a settings file at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot =
			if path.exists() { Self::load_snapshot(&path)? } else { Snapshot::default() };

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, SettingsError> {
		let metadata = path.metadata().map_err(|e| SettingsError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(Snapshot::default());
		}

		let bytes = fs::read(path).map_err(|e| SettingsError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| SettingsError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), SettingsError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| SettingsError::Backend {
				message: format!("Failed to create settings directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &Snapshot) -> Result<(), SettingsError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| SettingsError::Serialization {
				message: format!("Failed to serialize settings snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| SettingsError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| SettingsError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| SettingsError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| SettingsError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl SettingsStore for FileSettings {
	fn token(&self) -> Option<String> {
		self.inner.read().token.clone()
	}

	fn set_token(&self, token: &str) -> Result<(), SettingsError> {
		let mut guard = self.inner.write();

		guard.token = Some(token.to_owned());
		self.persist_locked(&guard)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"hunt_client_settings_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn set_and_reload_round_trip() {
		let path = temp_path();
		let settings = FileSettings::open(&path).expect("Failed to open settings snapshot.");

		settings.set_token("persisted-token").expect("Failed to persist token.");
		drop(settings);

		let reopened = FileSettings::open(&path).expect("Failed to reopen settings snapshot.");

		assert_eq!(reopened.token().as_deref(), Some("persisted-token"));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary settings snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn empty_file_yields_no_token() {
		let path = temp_path();

		File::create(&path).expect("Failed to create empty settings file.");

		let settings = FileSettings::open(&path).expect("Failed to open empty settings snapshot.");

		assert_eq!(settings.token(), None);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary settings snapshot {}: {e}", path.display())
		});
	}
}
