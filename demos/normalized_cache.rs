//! Demonstrates the id-based cache-key policy: a record written through the record path is
//! found again through the argument path, and unidentified records never enter the store.

// crates.io
use color_eyre::Result;
// self
use hunt_client::{
	cache::{
		CacheKeyResolver, FieldArgument, IdFieldResolver, MemoryRecordStore, RecordSet,
		RecordStore, ResponseField, Variables,
	},
	serde_json,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let resolver = IdFieldResolver;
	let store = MemoryRecordStore::default();
	let field =
		ResponseField::new("post").with_argument("id", FieldArgument::Variable("postId".to_owned()));

	// Write path: a mutation response materialized this record.
	let record: RecordSet = serde_json::from_value(serde_json::json!({
		"id": "42",
		"name": "Posthaven",
		"tagline": "A long-term blogging platform",
	}))?;
	let key = resolver.from_record_set(&field, &record);

	store.merge(key.clone(), record)?;
	println!("Normalized under key `{key}`.");

	// Read path: a later query reaches the same entity via its arguments.
	let variables = Variables::new().with("postId", "42");
	let lookup_key = resolver.from_field_arguments(&field, &variables);
	let cached = store.load(&lookup_key)?.expect("Both paths resolve to the same key.");

	println!("Looked up `{lookup_key}`: {cached:?}.");

	// An entity without an id resolves to the sentinel and is skipped entirely.
	let anonymous: RecordSet =
		serde_json::from_value(serde_json::json!({ "name": "No identity" }))?;

	assert!(resolver.from_record_set(&field, &anonymous).is_no_key());
	println!("Unidentified records are excluded from normalization.");

	Ok(())
}
