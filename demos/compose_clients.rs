//! Demonstrates composing the GraphQL + REST client pair once at startup and issuing one
//! request through each, against a local mock of the Product Hunt API.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use hunt_client::{
	cache::CacheStorage,
	compose::{ComposeConfig, compose},
	graphql::{GraphqlRequest, GraphqlResponse},
	serde_json,
	settings::{MemorySettings, SettingsStore},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let graphql_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql").query_param("access_token", "demo-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"data":{"post":{"id":"42","name":"Posthaven"}}}"#);
		})
		.await;
	let rest_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/categories");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"categories":[{"id":1,"name":"Tech"}]}"#);
		})
		.await;
	let settings = Arc::new(MemorySettings::default());

	settings.set_token("demo-token")?;

	// Built exactly once; both clients are shared from here on.
	let clients = compose(
		ComposeConfig::new(settings as Arc<dyn SettingsStore>)
			.debug(true)
			.cache(CacheStorage::Memory)
			.graphql_endpoint(Url::parse(&server.url("/graphql"))?)
			.rest_endpoint(Url::parse(&server.url("/v2/"))?),
	)?;
	let response: GraphqlResponse<serde_json::Value> = clients
		.graphql
		.execute(&GraphqlRequest::new("query Post($postId: ID!) { post(id: $postId) { id name } }"))
		.await?;

	println!("GraphQL data: {:?}.", response.data);

	let categories: serde_json::Value = clients.rest.get("categories").await?;

	println!("REST payload: {categories}.");

	graphql_mock.assert_async().await;
	rest_mock.assert_async().await;

	Ok(())
}
