#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde::Deserialize;
// self
use hunt_client::{
	_preludet::*,
	cache::{FieldArgument, RecordSet, ResponseField, Variables},
	compose::HuntClients,
	graphql::GraphqlRequest,
	serde_json,
};

#[derive(Debug, Deserialize)]
struct Post {
	id: String,
	name: String,
	tagline: String,
}

#[derive(Debug, Deserialize)]
struct PostData {
	post: Post,
}

fn compose_against(server: &MockServer) -> HuntClients {
	let graphql_endpoint =
		Url::parse(&server.url("/graphql")).expect("Mock GraphQL endpoint should parse.");
	let rest_endpoint = Url::parse(&server.url("/v2/")).expect("Mock REST base should parse.");
	let (clients, _settings) =
		compose_test_clients(graphql_endpoint, rest_endpoint, Some("integration-token"), false);

	clients
}

fn record_set_of(post: &Post) -> RecordSet {
	let value = serde_json::json!({
		"id": post.id,
		"name": post.name,
		"tagline": post.tagline,
	});

	serde_json::from_value(value).expect("Record fixture should convert into a record set.")
}

fn post_field() -> ResponseField {
	ResponseField::new("post").with_argument("id", FieldArgument::Variable("postId".to_owned()))
}

#[tokio::test]
async fn execute_decodes_and_normalizes_by_id() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql").query_param("access_token", "integration-token");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":{"post":{"id":"42","name":"Posthaven","tagline":"Blogging"}}}"#,
			);
		})
		.await;
	let clients = compose_against(&server);
	let request =
		GraphqlRequest::new("query Post($postId: ID!) { post(id: $postId) { id name tagline } }")
			.operation_name("Post")
			.variables(Variables::new().with("postId", "42"));
	let response = clients
		.graphql
		.execute::<PostData>(&request)
		.await
		.expect("Executing the query against the mock endpoint should succeed.");
	let data = response.data.expect("Payload data should be present.");

	mock.assert_async().await;

	// Write path: normalize the materialized record under its id.
	let key = clients
		.graphql
		.normalize(&post_field(), &record_set_of(&data.post))
		.expect("Normalizing an identified record should succeed.")
		.expect("An identified record must produce a key.");

	assert_eq!(key.as_str(), "42");

	// Read path: the same entity is found via the argument bindings alone.
	let cached = clients
		.graphql
		.lookup(&post_field(), &Variables::new().with("postId", "42"))
		.expect("Looking up a cached record should succeed.")
		.expect("The normalized record should be retrievable by its arguments.");

	assert_eq!(cached.get("name").and_then(serde_json::Value::as_str), Some("Posthaven"));
	assert_eq!(cached.get("tagline").and_then(serde_json::Value::as_str), Some("Blogging"));
}

#[test]
fn unidentified_records_are_excluded_from_normalization() {
	// No traffic is dispatched here, so fixed endpoints stand in for a live server.
	let graphql_endpoint = Url::parse("https://graphql.invalid/graphql")
		.expect("Static GraphQL endpoint should parse.");
	let rest_endpoint =
		Url::parse("https://rest.invalid/v2/").expect("Static REST base should parse.");
	let (clients, _settings) =
		compose_test_clients(graphql_endpoint, rest_endpoint, Some("integration-token"), false);
	let record: RecordSet = serde_json::from_value(serde_json::json!({ "name": "Posthaven" }))
		.expect("Record fixture should convert into a record set.");
	let outcome = clients
		.graphql
		.normalize(&post_field(), &record)
		.expect("Normalizing an unidentified record is a policy skip, never an error.");

	assert!(outcome.is_none());

	// Nothing was merged, so the argument-path lookup finds nothing either.
	let cached = clients
		.graphql
		.lookup(&post_field(), &Variables::new().with("postId", "42"))
		.expect("Looking up a cached record should succeed.");

	assert!(cached.is_none());
}

#[tokio::test]
async fn graphql_error_statuses_surface_with_metadata() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql");
			then.status(429).header("retry-after", "30").body("rate limited");
		})
		.await;
	let clients = compose_against(&server);
	let error = clients
		.graphql
		.execute::<PostData>(&GraphqlRequest::new("{ viewer { id } }"))
		.await
		.expect_err("A 429 response must surface as an error.");

	assert!(error.to_string().contains("rate limited"));
}
