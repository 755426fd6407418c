// tests/common/mod.rs
//! Call-counting stub of the workspace API used by the integration tests.
//!
//! The stub serves canned representations from in-memory maps, applies
//! writes the way the real service echoes them back, and lets tests
//! script per-call outcomes (rate limits, cursored pages) for the retry
//! and pagination paths.
#![allow(dead_code)]

use async_trait::async_trait;
use notion_objects::{BlockId, DatabaseId, Error, NotionApi, PageId, PaginatedList, PropertyId};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Scripted outcome for one stubbed call.
pub enum Scripted {
    Page(PaginatedList),
    Value(Value),
    RateLimited,
}

#[derive(Default)]
pub struct StubApi {
    pub blocks: Mutex<HashMap<String, Value>>,
    pub pages: Mutex<HashMap<String, Value>>,
    pub databases: Mutex<HashMap<String, Value>>,
    pub children: Mutex<HashMap<String, Vec<Value>>>,
    /// Property payloads keyed by "<page-id>/<property-id>".
    pub properties: Mutex<HashMap<String, Value>>,
    pub property_script: Mutex<VecDeque<Scripted>>,
    pub query_script: Mutex<VecDeque<Scripted>>,
    /// The start_cursor argument of every query_database call, in order.
    pub query_cursors: Mutex<Vec<Option<String>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    next_id: AtomicU64,
}

impl StubApi {
    pub fn count(&self, operation: &str) -> usize {
        *self.calls.lock().unwrap().get(operation).unwrap_or(&0)
    }

    fn bump(&self, operation: &'static str) {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
    }

    fn fresh_id(&self) -> String {
        format!("{:032x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 0xb100)
    }

    pub fn insert_block(&self, id: &str, raw: Value) {
        self.blocks.lock().unwrap().insert(id.to_string(), raw);
    }

    pub fn insert_page(&self, id: &str, raw: Value) {
        self.pages.lock().unwrap().insert(id.to_string(), raw);
    }

    pub fn insert_database(&self, id: &str, raw: Value) {
        self.databases.lock().unwrap().insert(id.to_string(), raw);
    }

    pub fn insert_children(&self, parent: &str, children: Vec<Value>) {
        self.children
            .lock()
            .unwrap()
            .insert(parent.to_string(), children);
    }

    pub fn insert_property(&self, page: &str, property: &str, raw: Value) {
        self.properties
            .lock()
            .unwrap()
            .insert(format!("{}/{}", page, property), raw);
    }

    pub fn script_query(&self, outcome: Scripted) {
        self.query_script.lock().unwrap().push_back(outcome);
    }

    pub fn script_property(&self, outcome: Scripted) {
        self.property_script.lock().unwrap().push_back(outcome);
    }
}

/// Copies the top-level keys of an update body onto a stored
/// representation, merging the `properties` table per key the way the
/// service applies partial property updates.
fn apply_update(target: &mut Value, body: &Value) {
    let (Some(target_map), Some(body_map)) = (target.as_object_mut(), body.as_object()) else {
        return;
    };
    for (key, value) in body_map {
        if key == "properties" {
            let table = target_map
                .entry("properties")
                .or_insert_with(|| json!({}));
            if let (Some(existing), Some(incoming)) = (table.as_object_mut(), value.as_object()) {
                for (name, property) in incoming {
                    existing.insert(name.clone(), property.clone());
                }
            }
        } else {
            target_map.insert(key.clone(), value.clone());
        }
    }
}

/// The value-payload type tag: the single key of a property template
/// ("title", "number", ...).
fn payload_tag(payload: &Value) -> String {
    payload
        .as_object()
        .and_then(|map| map.keys().next())
        .cloned()
        .unwrap_or_else(|| "unknown".to_string())
}

#[async_trait]
impl NotionApi for StubApi {
    async fn retrieve_block(&self, id: &BlockId) -> Result<Value, Error> {
        self.bump("retrieve_block");
        self.blocks
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| Error::not_found(format!("no block {}", id)))
    }

    async fn list_children(&self, parent: &BlockId) -> Result<PaginatedList, Error> {
        self.bump("list_children");
        let children = self
            .children
            .lock()
            .unwrap()
            .get(parent.as_str())
            .cloned()
            .unwrap_or_default();
        Ok(PaginatedList::complete(children))
    }

    async fn append_children(&self, parent: &BlockId, body: Value) -> Result<PaginatedList, Error> {
        self.bump("append_children");
        let templates = body
            .get("children")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut created = Vec::new();
        for template in templates {
            let mut block = template;
            block["id"] = json!(self.fresh_id());
            block["object"] = json!("block");
            created.push(block);
        }

        self.children
            .lock()
            .unwrap()
            .entry(parent.as_str().to_string())
            .or_default()
            .extend(created.iter().cloned());

        Ok(PaginatedList::complete(created))
    }

    async fn update_block(&self, id: &BlockId, body: Value) -> Result<Value, Error> {
        self.bump("update_block");
        let mut blocks = self.blocks.lock().unwrap();
        let block = blocks
            .get_mut(id.as_str())
            .ok_or_else(|| Error::not_found(format!("no block {}", id)))?;
        apply_update(block, &body);
        Ok(block.clone())
    }

    async fn retrieve_page(&self, id: &PageId) -> Result<Value, Error> {
        self.bump("retrieve_page");
        self.pages
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| Error::not_found(format!("no page {}", id)))
    }

    async fn update_page(&self, id: &PageId, body: Value) -> Result<Value, Error> {
        self.bump("update_page");
        let mut pages = self.pages.lock().unwrap();
        let page = pages
            .get_mut(id.as_str())
            .ok_or_else(|| Error::not_found(format!("no page {}", id)))?;
        apply_update(page, &body);
        Ok(page.clone())
    }

    async fn retrieve_page_property(
        &self,
        page: &PageId,
        property: &PropertyId,
    ) -> Result<Value, Error> {
        self.bump("retrieve_page_property");
        if let Some(outcome) = self.property_script.lock().unwrap().pop_front() {
            return match outcome {
                Scripted::RateLimited => Err(Error::rate_limited("stubbed throttle")),
                Scripted::Value(value) => Ok(value),
                Scripted::Page(page) => Ok(json!({
                    "object": "list",
                    "type": "property_item",
                    "results": page.results,
                })),
            };
        }
        self.properties
            .lock()
            .unwrap()
            .get(&format!("{}/{}", page.as_str(), property.as_str()))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("no property {} on {}", property, page)))
    }

    async fn retrieve_database(&self, id: &DatabaseId) -> Result<Value, Error> {
        self.bump("retrieve_database");
        self.databases
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| Error::not_found(format!("no database {}", id)))
    }

    async fn query_database(
        &self,
        _database: &DatabaseId,
        _filter: Option<&Value>,
        start_cursor: Option<&str>,
        _page_size: u32,
    ) -> Result<PaginatedList, Error> {
        self.bump("query_database");
        self.query_cursors
            .lock()
            .unwrap()
            .push(start_cursor.map(str::to_string));

        match self.query_script.lock().unwrap().pop_front() {
            Some(Scripted::Page(page)) => Ok(page),
            Some(Scripted::RateLimited) => Err(Error::rate_limited("stubbed throttle")),
            Some(Scripted::Value(_)) | None => Ok(PaginatedList::complete(Vec::new())),
        }
    }

    async fn create_page(&self, parent: &DatabaseId, properties: Value) -> Result<Value, Error> {
        self.bump("create_page");
        let page_id = self.fresh_id();

        let mut stored_properties = serde_json::Map::new();
        if let Some(map) = properties.as_object() {
            for (index, (name, payload)) in map.iter().enumerate() {
                let tag = payload_tag(payload);
                let property_id = if tag == "title" {
                    "title".to_string()
                } else {
                    format!("p{}", index)
                };

                let mut stored = json!({ "id": property_id.as_str(), "type": tag.as_str() });
                stored[&tag] = payload.get(&tag).cloned().unwrap_or(Value::Null);
                stored_properties.insert(name.clone(), stored);

                let mut endpoint_value =
                    json!({ "object": "property_item", "type": tag.as_str() });
                endpoint_value[&tag] = payload.get(&tag).cloned().unwrap_or(Value::Null);
                self.properties
                    .lock()
                    .unwrap()
                    .insert(format!("{}/{}", page_id, property_id), endpoint_value);
            }
        }

        let page = json!({
            "object": "page",
            "id": page_id.as_str(),
            "parent": { "database_id": parent.as_str() },
            "archived": false,
            "properties": Value::Object(stored_properties),
        });
        self.pages
            .lock()
            .unwrap()
            .insert(page_id, page.clone());
        Ok(page)
    }
}
