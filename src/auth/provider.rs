//! Token resolution against the persisted settings store.

// self
use crate::{_prelude::*, auth::AccessToken, settings::SettingsStore};

/// Compiled-in token substituted when no credential has been persisted.
///
/// This anonymous credential is shared by every unconfigured install; see the
/// crate README before shipping it anywhere security-sensitive.
pub const FALLBACK_TOKEN: &str = "anonymous-developer-token";

/// Resolves the access token used for authenticated transports.
///
/// The provider is a pure read over the settings collaborator: a non-blank
/// persisted token wins, anything else (missing, empty, whitespace-only)
/// yields the fallback. A blank token is a policy case, never an error.
#[derive(Clone)]
pub struct TokenProvider {
	settings: Arc<dyn SettingsStore>,
	fallback: AccessToken,
}
impl TokenProvider {
	/// Creates a provider reading from the given settings store, falling back to
	/// [`FALLBACK_TOKEN`].
	pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
		Self::with_fallback(settings, AccessToken::new(FALLBACK_TOKEN))
	}

	/// Creates a provider with a caller-supplied fallback credential.
	pub fn with_fallback(settings: Arc<dyn SettingsStore>, fallback: AccessToken) -> Self {
		Self { settings, fallback }
	}

	/// Returns the persisted token if it is non-blank, the fallback otherwise.
	pub fn resolve(&self) -> AccessToken {
		match self.settings.token() {
			Some(token) if !token.trim().is_empty() => AccessToken::new(token),
			_ => self.fallback.clone(),
		}
	}
}
impl Debug for TokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider").field("fallback", &self.fallback).finish()
	}
}
