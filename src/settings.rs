//! Persisted-settings contracts and built-in store implementations.
//!
//! The settings store is the collaborator that owns the user's access token. The
//! crate re-reads the `token` property on every outgoing request, so a token
//! written mid-session takes effect without recomposing the clients; the
//! blank-token fallback policy lives in [`TokenProvider`](crate::auth::TokenProvider),
//! not here.

pub mod file;
pub mod memory;

pub use file::FileSettings;
pub use memory::MemorySettings;

// self
use crate::_prelude::*;

/// Readable settings contract implemented by persistence backends.
pub trait SettingsStore
where
	Self: Send + Sync,
{
	/// Returns the persisted access token, if any was ever stored.
	///
	/// Blankness is not interpreted here; an empty or whitespace-only value is
	/// returned verbatim and left to the caller's fallback policy.
	fn token(&self) -> Option<String>;

	/// Persists or replaces the access token.
	fn set_token(&self, token: &str) -> Result<(), SettingsError>;
}

/// Error type produced by [`SettingsStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SettingsError {
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
