//! Thread-safe in-memory [`SettingsStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	settings::{SettingsError, SettingsStore},
};

/// Keeps the persisted token in-process; contents do not survive a restart.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings(Arc<RwLock<Option<String>>>);
impl SettingsStore for MemorySettings {
	fn token(&self) -> Option<String> {
		self.0.read().clone()
	}

	fn set_token(&self, token: &str) -> Result<(), SettingsError> {
		*self.0.write() = Some(token.to_owned());

		Ok(())
	}
}
