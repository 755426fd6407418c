// src/api/client.rs
//! HTTP implementation of the [`NotionApi`](super::NotionApi) trait.
//!
//! A thin wrapper around reqwest: authentication headers, endpoint
//! construction, and decoding of wire error bodies into the typed
//! error vocabulary. No caching and no business logic live here.

use super::types::{NotionApiErrorResponse, PaginatedList};
use crate::constants::{ERROR_BODY_PREVIEW_LENGTH, NOTION_API_BASE_URL};
use crate::error::{Error, NotionErrorCode};
use crate::types::{ApiKey, BlockId, DatabaseId, PageId, PropertyId};
use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::{json, Value};

const NOTION_VERSION: &str = "2022-06-28";

/// A reqwest-backed Notion API client.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client authenticating against the public API.
    pub fn new(api_key: &ApiKey) -> Result<Self, Error> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Creates a client against an alternate base URL (proxies, test
    /// servers).
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, Error> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                Error::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    async fn get(&self, endpoint: &str) -> Result<Response, Error> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }

    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, Error> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }

    async fn patch<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, Error> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("PATCH {}", url);
        Ok(self.client.patch(url).json(body).send().await?)
    }
}

/// Decodes a response body into `T`, mapping wire error bodies onto the
/// typed error vocabulary.
async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to parse response from {}: {}", url, e);
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
            Error::MalformedResponse(format!("{} (body: {})", e, preview))
        });
    }

    match serde_json::from_str::<NotionApiErrorResponse>(&body) {
        Ok(err) => Err(Error::Api {
            code: NotionErrorCode::from_api_response(&err.code),
            message: err.message,
            status,
        }),
        Err(_) => Err(Error::Api {
            code: NotionErrorCode::from_http_status(status.as_u16()),
            message: format!("HTTP {} from {}", status, url),
            status,
        }),
    }
}

#[async_trait::async_trait]
impl super::NotionApi for NotionHttpClient {
    async fn retrieve_block(&self, id: &BlockId) -> Result<Value, Error> {
        let endpoint = format!("blocks/{}", id.to_hyphenated());
        decode(self.get(&endpoint).await?).await
    }

    async fn list_children(&self, parent: &BlockId) -> Result<PaginatedList, Error> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        decode(self.get(&endpoint).await?).await
    }

    async fn append_children(&self, parent: &BlockId, body: Value) -> Result<PaginatedList, Error> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        decode(self.patch(&endpoint, &body).await?).await
    }

    async fn update_block(&self, id: &BlockId, body: Value) -> Result<Value, Error> {
        let endpoint = format!("blocks/{}", id.to_hyphenated());
        decode(self.patch(&endpoint, &body).await?).await
    }

    async fn retrieve_page(&self, id: &PageId) -> Result<Value, Error> {
        let endpoint = format!("pages/{}", id.to_hyphenated());
        decode(self.get(&endpoint).await?).await
    }

    async fn update_page(&self, id: &PageId, body: Value) -> Result<Value, Error> {
        let endpoint = format!("pages/{}", id.to_hyphenated());
        decode(self.patch(&endpoint, &body).await?).await
    }

    async fn retrieve_page_property(
        &self,
        page: &PageId,
        property: &PropertyId,
    ) -> Result<Value, Error> {
        // Property ids arrive from the service already URL-safe.
        let endpoint = format!(
            "pages/{}/properties/{}",
            page.to_hyphenated(),
            property.as_str()
        );
        decode(self.get(&endpoint).await?).await
    }

    async fn retrieve_database(&self, id: &DatabaseId) -> Result<Value, Error> {
        let endpoint = format!("databases/{}", id.to_hyphenated());
        decode(self.get(&endpoint).await?).await
    }

    async fn query_database(
        &self,
        database: &DatabaseId,
        filter: Option<&Value>,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<PaginatedList, Error> {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let mut body = json!({ "page_size": page_size });
        if let Some(filter) = filter {
            body["filter"] = filter.clone();
        }
        if let Some(cursor) = start_cursor {
            body["start_cursor"] = json!(cursor);
        }
        decode(self.post(&endpoint, &body).await?).await
    }

    async fn create_page(&self, parent: &DatabaseId, properties: Value) -> Result<Value, Error> {
        let body = json!({
            "parent": { "database_id": parent.to_hyphenated() },
            "properties": properties,
        });
        decode(self.post("pages", &body).await?).await
    }
}
