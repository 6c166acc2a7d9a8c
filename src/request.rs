use crate::error::{DeskError, DeskResult};
use std::collections::HashMap;

pub use routedesk_shared::protocol::HttpMethod;

#[cfg(test)]
use std::{cell::RefCell, rc::Rc};

// =========================================================
// HTTP Interface Abstraction
// =========================================================

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One request, one response. No retries, no timeouts beyond the transport's own.
///
/// `?Send` because browser fetch futures are not `Send`.
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> DeskResult<HttpResponse>;
}

// =========================================================
// Test doubles
// =========================================================

#[cfg(test)]
#[derive(Default)]
struct MockState {
    // URL -> (status, body); `None` simulates a transport failure
    responses: RefCell<HashMap<String, Option<(u16, String)>>>,
    // (URL, method, headers, body)
    requests: RefCell<Vec<(String, String, HashMap<String, String>, Option<String>)>>,
}

/// Canned responses per URL; clones share the same state.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockHttpClient {
    state: Rc<MockState>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.state
            .responses
            .borrow_mut()
            .insert(url.to_string(), Some((status, body.to_string())));
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.state
            .responses
            .borrow_mut()
            .insert(url.to_string(), Some((status, body.to_string())));
    }

    pub fn mock_unreachable(&self, url: &str) {
        self.state
            .responses
            .borrow_mut()
            .insert(url.to_string(), None);
    }

    pub fn requests(&self) -> Vec<(String, String, HashMap<String, String>, Option<String>)> {
        self.state.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.borrow().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> DeskResult<HttpResponse> {
        self.state.requests.borrow_mut().push((
            req.url.clone(),
            req.method.as_str().to_string(),
            req.headers.clone(),
            req.body.clone(),
        ));

        match self.state.responses.borrow().get(&req.url) {
            Some(Some((status, body))) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(None) => Err(DeskError::transport(format!("unreachable: {}", req.url))),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

/// Native client for smoke tests against a running backend. Keeps the
/// session cookie between calls like the browser does.
#[cfg(test)]
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(test)]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> DeskResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| DeskError::transport(format!("Reqwest Error: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| DeskError::transport(format!("Reqwest Body Error: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
