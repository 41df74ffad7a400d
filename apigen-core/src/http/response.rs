//! JSON responses produced by controllers

use hyper::{Response, StatusCode};
use serde_json::{json, Value};

use super::utils::{body_from, Resp, CONTENT_TYPE_JSON};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Value,
    headers: Vec<(String, String)>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body, headers: Vec::new() }
    }

    /// 200
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// 201
    pub fn created(body: Value) -> Self {
        Self::new(StatusCode::CREATED, body)
    }

    /// 200 `{"message": "..."}`
    pub fn message(message: &str) -> Self {
        Self::ok(json!({ "message": message }))
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    pub fn into_hyper(self) -> Resp {
        let mut builder = Response::builder()
            .status(self.status)
            .header("content-type", CONTENT_TYPE_JSON);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match builder.body(body_from(self.body.to_string())) {
            Ok(response) => response,
            Err(e) => {
                log::error!("Invalid response header: {}", e);
                let mut fallback = Response::new(body_from(
                    json!({"error": {"http_code": 500, "message": super::error::INTERNAL_ERROR}})
                        .to_string(),
                ));
                *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn into_hyper_sets_json_content_type() {
        let response = ApiResponse::created(json!({"data": null})).with_header("X-Trace", "abc");
        let hyper_response = response.into_hyper();

        assert_eq!(hyper_response.status(), StatusCode::CREATED);
        assert_eq!(hyper_response.headers()["content-type"], CONTENT_TYPE_JSON);
        assert_eq!(hyper_response.headers()["x-trace"], "abc");

        let bytes = hyper_response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"data":null}"#);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = ApiResponse::message("Deleted").with_header("Allow", "GET");
        assert_eq!(response.header("allow"), Some("GET"));
        assert_eq!(response.body(), &json!({"message": "Deleted"}));
    }
}
