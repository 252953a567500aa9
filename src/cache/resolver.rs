//! Cache-key resolution from GraphQL response shapes.
//!
//! A normalized cache stores entities by identity rather than by query shape,
//! so the same entity reached through different queries lands in one record.
//! Resolution therefore has to agree across two very different inputs: the
//! materialized record set a response produced, and the argument bindings a
//! request was made with. [`IdFieldResolver`] keys both off the entity's `id`.

// self
use crate::{
	_prelude::*,
	cache::{CacheKey, RecordSet},
};

/// Variable bindings supplied alongside a GraphQL operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables(BTreeMap<String, serde_json::Value>);
impl Variables {
	/// Creates an empty binding set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a binding, replacing any previous value under the same name.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.0.insert(name.into(), value.into());

		self
	}

	/// Looks up a binding by name.
	pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
		self.0.get(name)
	}

	/// Returns `true` when no bindings are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Argument bound to a response field: either an inline literal or a reference
/// into the operation's [`Variables`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldArgument {
	/// Inline literal value.
	Literal(serde_json::Value),
	/// Named reference resolved against the operation variables.
	Variable(String),
}

/// A GraphQL response field together with its argument bindings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseField {
	name: String,
	arguments: BTreeMap<String, FieldArgument>,
}
impl ResponseField {
	/// Creates a field with no arguments.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), arguments: BTreeMap::new() }
	}

	/// Adds an argument binding to the field.
	pub fn with_argument(mut self, name: impl Into<String>, argument: FieldArgument) -> Self {
		self.arguments.insert(name.into(), argument);

		self
	}

	/// Returns the field name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Resolves the named argument against the operation variables, following a
	/// variable reference when the binding is not a literal.
	pub fn resolve_argument<'a>(
		&'a self,
		name: &str,
		variables: &'a Variables,
	) -> Option<&'a serde_json::Value> {
		match self.arguments.get(name)? {
			FieldArgument::Literal(value) => Some(value),
			FieldArgument::Variable(reference) => variables.get(reference),
		}
	}
}

/// Derives the identity under which a response entity is normalized.
///
/// Implementations must keep the two paths in agreement: a record written
/// after a mutation and a record looked up during a query have to resolve to
/// the same key, otherwise the normalized cache silently forks the entity.
pub trait CacheKeyResolver
where
	Self: Send + Sync,
{
	/// Derives a key from the materialized record set returned for `field`.
	fn from_record_set(&self, field: &ResponseField, record_set: &RecordSet) -> CacheKey;

	/// Derives a key from the argument bindings used to request `field`.
	fn from_field_arguments(&self, field: &ResponseField, variables: &Variables) -> CacheKey;
}

/// Resolver keying every entity off its `id` attribute.
///
/// Entities lacking a non-empty string `id`—on either path—resolve to
/// [`CacheKey::NO_KEY`] and are thereby excluded from normalization.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdFieldResolver;
impl IdFieldResolver {
	const ID_ATTRIBUTE: &'static str = "id";

	fn format_cache_key(id: Option<&serde_json::Value>) -> CacheKey {
		match id.and_then(serde_json::Value::as_str) {
			Some(id) if !id.is_empty() => CacheKey::new(id),
			_ => CacheKey::NO_KEY,
		}
	}
}
impl CacheKeyResolver for IdFieldResolver {
	fn from_record_set(&self, _field: &ResponseField, record_set: &RecordSet) -> CacheKey {
		Self::format_cache_key(record_set.get(Self::ID_ATTRIBUTE))
	}

	fn from_field_arguments(&self, field: &ResponseField, variables: &Variables) -> CacheKey {
		Self::format_cache_key(field.resolve_argument(Self::ID_ATTRIBUTE, variables))
	}
}
