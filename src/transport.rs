//! HTTP seam
//!
//! Requests are described as plain values so the authenticated helper can
//! replay them after a token refresh. `ReqwestTransport` is the production
//! implementation; tests substitute a scripted one.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Multipart form; file contents are held in memory so the body can be resent
    Multipart(Vec<(String, FormValue)>),
}

/// Request descriptor: url, method, headers, body
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, parts: Vec<(String, FormValue)>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value with the same name
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value));
    }

    pub fn with_bearer(mut self, token: &str) -> Self {
        self.set_header("Authorization", format!("Bearer {}", token));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode a 2xx body, or turn a non-2xx response into an `ApiError`
    pub fn into_result<T: serde::de::DeserializeOwned>(self) -> ApiResult<T> {
        if !self.is_success() {
            return Err(ApiError::from_status(self.status, &self.body));
        }
        serde_json::from_slice(&self.body).map_err(ApiError::from)
    }
}

pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: HttpRequest) -> impl Future<Output = ApiResult<HttpResponse>> + Send;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn build_form(parts: Vec<(String, FormValue)>) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in parts {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File { file_name, bytes } => {
                    let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                    form.part(name, part)
                }
            };
        }
        form
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.as_reqwest(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(Self::build_form(parts)),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_bearer_replaces_existing_header() {
        let req = HttpRequest::get("http://x/api/notices")
            .with_bearer("one")
            .with_bearer("two");
        assert_eq!(req.header("authorization"), Some("Bearer two"));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn test_into_result_decodes_success() {
        let resp = HttpResponse::new(200, r#"{"count": 12}"#);
        let value: serde_json::Value = resp.into_result().unwrap();
        assert_eq!(value["count"], 12);
    }

    #[test]
    fn test_into_result_maps_failure() {
        let resp = HttpResponse::new(404, r#"{"error": "Notice not found"}"#);
        let err = resp.into_result::<serde_json::Value>().unwrap_err();
        assert_eq!(
            err,
            ApiError::RequestFailed {
                status: 404,
                message: "Notice not found".to_string()
            }
        );
    }

    #[test]
    fn test_into_result_reports_schema_mismatch() {
        let resp = HttpResponse::new(200, "not json");
        assert!(matches!(
            resp.into_result::<serde_json::Value>(),
            Err(ApiError::Decode(_))
        ));
    }
}
