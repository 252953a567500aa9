//! Cache-key type used to normalize entities by identity.

// self
use crate::_prelude::*;

/// Identifier under which a normalized entity is stored.
///
/// Entities without a usable identity carry [`CacheKey::NO_KEY`]; such records
/// are excluded from normalization entirely rather than merged under a guessed
/// key. Partial or unidentifiable entities never contaminate the cache.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);
impl CacheKey {
	/// Sentinel signalling that the entity must not be cached or normalized.
	pub const NO_KEY: Self = Self(String::new());

	/// Builds a key from a non-empty entity identifier.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Returns `true` when this key is the no-key sentinel.
	pub fn is_no_key(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the raw key value; empty for the sentinel.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Debug for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		if self.is_no_key() {
			f.write_str("CacheKey(NO_KEY)")
		} else {
			write!(f, "CacheKey({})", self.0)
		}
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn sentinel_is_detected() {
		assert!(CacheKey::NO_KEY.is_no_key());
		assert!(!CacheKey::new("42").is_no_key());
	}

	#[test]
	fn debug_distinguishes_sentinel() {
		assert_eq!(format!("{:?}", CacheKey::NO_KEY), "CacheKey(NO_KEY)");
		assert_eq!(format!("{:?}", CacheKey::new("42")), "CacheKey(42)");
	}
}
