// tests/page_properties.rs
//! The page view: property table derivation, typed property retrieval,
//! retry behavior, and update semantics.

mod common;

use common::{Scripted, StubApi};
use notion_objects::{
    Annotations, Error, NotionClient, PropertyValue, RetryPolicy, SelectValue,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const PAGE: &str = "000000000000000000000000000000f1";

fn client_for(stub: &Arc<StubApi>) -> NotionClient {
    NotionClient::with_api(stub.clone(), RetryPolicy::new(3, Duration::from_millis(1)))
}

fn seed_page(stub: &StubApi) {
    stub.insert_page(
        PAGE,
        json!({
            "object": "page",
            "id": PAGE,
            "archived": false,
            "properties": {
                "Name": { "id": "title", "type": "title", "title": [] },
                "Score": { "id": "sc%3A", "type": "number", "number": 12.0 },
                "Status": { "id": "st%7C", "type": "select", "select": null }
            }
        }),
    );
}

#[tokio::test]
async fn property_table_is_derived_once() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    seed_page(&stub);

    let mut page = notion.page(PAGE).unwrap();
    // Nothing is fetched until first read.
    assert_eq!(stub.count("retrieve_page"), 0);

    let names: Vec<String> = page.properties().await.unwrap().keys().cloned().collect();
    assert_eq!(names, vec!["Name", "Score", "Status"]);
    assert_eq!(page.properties().await.unwrap()["Score"].as_str(), "sc%3A");

    page.raw().await.unwrap();
    assert_eq!(stub.count("retrieve_page"), 1);
}

#[tokio::test]
async fn unknown_property_names_fail_locally() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    seed_page(&stub);

    let mut page = notion.page(PAGE).unwrap();
    let err = page.retrieve_property("Nope").await.unwrap_err();
    match err {
        Error::InvalidArgument(message) => {
            assert!(message.contains("Nope"));
            assert!(message.contains("Name"));
            assert!(message.contains("Score"));
        }
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
    // No remote property call was issued for the bad name.
    assert_eq!(stub.count("retrieve_page_property"), 0);
}

#[tokio::test]
async fn property_retrieval_is_retried_through_rate_limits() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    seed_page(&stub);
    stub.insert_property(
        PAGE,
        "title",
        json!({
            "object": "property_item",
            "type": "title",
            "title": { "type": "text", "text": { "content": "Roadmap", "link": null }, "plain_text": "Roadmap" }
        }),
    );
    stub.script_property(Scripted::RateLimited);

    let mut page = notion.page(PAGE).unwrap();
    let value = page.retrieve_property("Name").await.unwrap();
    match value {
        PropertyValue::Title(title) => assert_eq!(title.plain_text(), "Roadmap"),
        other => panic!("expected title, got {:?}", other),
    }
    // One throttled attempt, one successful retry — invisible to the caller.
    assert_eq!(stub.count("retrieve_page_property"), 2);
}

#[tokio::test]
async fn cleared_selects_read_as_no_selection() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    seed_page(&stub);
    stub.insert_property(
        PAGE,
        "st%7C",
        json!({ "object": "property_item", "type": "select", "select": null }),
    );

    let mut page = notion.page(PAGE).unwrap();
    match page.retrieve_property("Status").await.unwrap() {
        PropertyValue::Select(select) => assert_eq!(select.select(), None),
        other => panic!("expected select, got {:?}", other),
    }
}

#[tokio::test]
async fn unrecognized_property_tags_fall_back_to_raw() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    seed_page(&stub);
    stub.insert_property(
        PAGE,
        "sc%3A",
        json!({ "object": "property_item", "type": "rollup", "rollup": { "number": 3 } }),
    );

    let mut page = notion.page(PAGE).unwrap();
    let value = page.retrieve_property("Score").await.unwrap();
    assert!(matches!(value, PropertyValue::Other(_)));
    assert_eq!(value.type_name(), "rollup");
    assert_eq!(value.raw()["rollup"]["number"], json!(3));
}

#[tokio::test]
async fn set_title_replaces_the_cached_page_state() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    seed_page(&stub);

    let mut page = notion.page(PAGE).unwrap();
    page.properties().await.unwrap();
    assert_eq!(stub.count("retrieve_page"), 1);

    page.set_title("Renamed", Annotations::default()).await.unwrap();
    assert_eq!(stub.count("update_page"), 1);

    // The cache now holds the update response; no re-fetch happens.
    let raw = page.raw().await.unwrap();
    assert_eq!(
        raw["properties"]["title"]["title"][0]["plain_text"],
        json!("Renamed")
    );
    assert_eq!(stub.count("retrieve_page"), 1);

    // The name→id table was derived before the update and stays as-is.
    let names: Vec<String> = page.properties().await.unwrap().keys().cloned().collect();
    assert_eq!(names, vec!["Name", "Score", "Status"]);
}

#[tokio::test]
async fn set_property_sends_a_template_payload() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    seed_page(&stub);

    let mut page = notion.page(PAGE).unwrap();
    page.set_property("Status", SelectValue::template("Shipped"))
        .await
        .unwrap();

    let raw = page.raw().await.unwrap();
    assert_eq!(
        raw["properties"]["Status"]["select"]["name"],
        json!("Shipped")
    );
    assert_eq!(stub.count("update_page"), 1);
    // The write replaced the cache; no page retrieval ever ran.
    assert_eq!(stub.count("retrieve_page"), 0);
}

#[tokio::test]
async fn archive_is_a_remote_state_transition() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    seed_page(&stub);

    let mut page = notion.page(PAGE).unwrap();
    page.archive().await.unwrap();
    assert_eq!(page.raw().await.unwrap()["archived"], json!(true));
}

#[tokio::test]
async fn failed_updates_leave_the_cache_untouched() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    // No page seeded: the update fails with not-found.

    let mut page = notion.page(PAGE).unwrap();
    let err = page.archive().await.unwrap_err();
    assert!(err.is_not_found());

    // The next read still goes to the remote (and fails the same way).
    assert!(page.raw().await.is_err());
    assert_eq!(stub.count("retrieve_page"), 1);
}

#[tokio::test]
async fn page_children_flow_through_the_block_view() {
    let stub = Arc::new(StubApi::default());
    let notion = client_for(&stub);
    seed_page(&stub);
    stub.insert_children(
        PAGE,
        vec![json!({
            "object": "block",
            "id": "00000000000000000000000000000a01",
            "type": "paragraph",
            "paragraph": { "rich_text": [] }
        })],
    );

    let mut page = notion.page(PAGE).unwrap();
    assert_eq!(page.children().await.unwrap().len(), 1);
    assert_eq!(page.children().await.unwrap().len(), 1);
    assert_eq!(stub.count("list_children"), 1);
}
