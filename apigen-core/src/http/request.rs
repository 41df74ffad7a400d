//! Incoming API requests: method, path, query parameters and JSON body

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Body;
use hyper::{Method, Request, Uri};
use serde_json::{Map, Value};

use super::error::ApiError;

/// Body member holding the attributes for store and update
pub const DATA_FIELD: &str = "data";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self { method, path: path.to_string(), query: HashMap::new(), body: None }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Build from a URI and a raw body; a non-empty body must be JSON
    pub fn from_parts(method: Method, uri: &Uri, body: &[u8]) -> Result<Self, ApiError> {
        let query = uri.query().map(parse_query).unwrap_or_default();

        let body = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            let value = serde_json::from_slice(body).map_err(|e| {
                log::debug!("Rejecting malformed JSON body: {}", e);
                ApiError::WrongArgs("Invalid JSON body".to_string())
            })?;
            Some(value)
        };

        Ok(Self { method, path: uri.path().to_string(), query, body })
    }

    /// Read a hyper request, refusing bodies larger than `max_body_size`
    pub async fn from_hyper<B>(req: Request<B>, max_body_size: usize) -> Result<Self, ApiError>
    where
        B: Body<Data = Bytes> + Send,
        B::Error: std::error::Error + Send + Sync + 'static,
    {
        let (parts, body) = req.into_parts();
        let bytes = Limited::new(body, max_body_size)
            .collect()
            .await
            .map_err(|e| {
                log::warn!("Failed to read request body for {}: {}", parts.uri.path(), e);
                ApiError::WrongArgs("Unreadable or oversized request body".to_string())
            })?
            .to_bytes();

        Self::from_parts(parts.method, &parts.uri, &bytes)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Parameter present with a non-empty value
    pub fn has(&self, key: &str) -> bool {
        self.query(key).is_some_and(|v| !v.is_empty())
    }

    pub fn json(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The `data` member of the body, when it is an object
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.body.as_ref()?.get(DATA_FIELD)?.as_object()
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(component: &str) -> String {
    let spaced = component.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => component.to_string(),
    }
}
