//! Network plumbing: request/response types, the [`Transport`] seam and the
//! read-only [`ApiClient`] over the server's JSON endpoints.
//!
//! No HTTP client is bundled. Hosts supply a [`Transport`] (a browser fetch
//! bridge, a native client, or a scripted one in tests).

use crate::config::UiConfig;
use crate::core::error::{Error, Result, TransportError};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Header the server uses to tell script requests from page navigations
pub const REQUESTED_WITH_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// One part of a serialized form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text(String),
    File {
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// Ordered name/part pairs, as a browser's form data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    pub parts: Vec<(String, FormPart)>,
}

impl FormPayload {
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push((name.into(), FormPart::Text(value.into())));
    }

    /// First text value for `name`
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, part)| match part {
            FormPart::Text(value) if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn has_files(&self) -> bool {
        self.parts
            .iter()
            .any(|(_, part)| matches!(part, FormPart::File { .. }))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(FormPayload),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Header value, matched case-insensitively
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn parse_json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// The `message` field of a JSON body, if there is one
    pub fn message(&self) -> Option<String> {
        self.parse_json::<serde_json::Value>()
            .ok()?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}

/// Sends requests and resolves once the response settles
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: Request) -> std::result::Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: Request) -> std::result::Result<Response, TransportError> {
        (**self).send(request).await
    }
}

/// Row of `/api/items`
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct ItemSummary {
    pub item_id: i64,
    pub item_code: String,
    pub item_name: String,
    pub current_stock: i64,
    pub unit_price: f64,
}

/// Body of `/api/items/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct ItemDetail {
    pub item_id: i64,
    pub item_code: String,
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub current_stock: i64,
    pub unit_price: f64,
    pub reorder_level: i64,
}

impl ItemDetail {
    pub fn status(&self) -> crate::core::stock::StockStatus {
        crate::core::stock::classify(self.current_stock, self.reorder_level)
    }
}

/// Body of `/api/stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct Stats {
    pub total_items: u64,
    pub low_stock_items: u64,
}

/// Read-only wrappers over the server's JSON endpoints
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client rooted at the configured `api_base_url`
    pub fn from_config(transport: T, config: &UiConfig) -> Self {
        Self::new(transport, config.api_base_url.as_str())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GETs `endpoint` and decodes its JSON body.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] when no response arrives, [`Error::Http`] on a
    /// non-2xx status, [`Error::Serialization`] on a body that does not decode.
    pub async fn request<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        let request = Request::new(Method::Get, format!("{}{endpoint}", self.base_url))
            .header("Content-Type", "application/json");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::error!("API request failed: {}", e);
            Error::from(e)
        })?;

        if !response.is_success() {
            tracing::error!(
                "API request failed: {} returned {}",
                endpoint,
                response.status
            );
            return Err(Error::Http {
                status: response.status,
                message: response.message(),
            });
        }

        Ok(response.parse_json()?)
    }

    pub async fn get_items(&self) -> Result<Vec<ItemSummary>> {
        self.request("/api/items").await
    }

    pub async fn get_item(&self, item_id: i64) -> Result<ItemDetail> {
        self.request(&format!("/api/items/{item_id}")).await
    }

    pub async fn get_supplier(&self, supplier_id: i64) -> Result<serde_json::Value> {
        self.request(&format!("/api/suppliers/{supplier_id}")).await
    }

    pub async fn get_transaction(&self, transaction_id: i64) -> Result<serde_json::Value> {
        self.request(&format!("/api/transactions/{transaction_id}"))
            .await
    }

    pub async fn get_stats(&self) -> Result<Stats> {
        self.request("/api/stats").await
    }
}
