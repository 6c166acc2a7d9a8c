//! Fetch transport.
//!
//! Implements the core `HttpClient` on top of `web_sys::fetch`. Requests are
//! sent with `credentials: include` so the backend session cookie travels
//! with every call.

use async_trait::async_trait;
use routedesk::{DeskError, DeskResult, HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response};

fn js_error(context: &str, e: JsValue) -> DeskError {
    DeskError::transport(format!("{}: {:?}", context, e))
}

/// Browser `fetch` client. Stateless; the cookie jar belongs to the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchClient;

impl FetchClient {
    fn build(req: &HttpRequest) -> DeskResult<Request> {
        let headers = Headers::new().map_err(|e| js_error("Headers", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_error("Header", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        opts.set_credentials(RequestCredentials::Include);
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts).map_err(|e| js_error("Request", e))
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> DeskResult<HttpResponse> {
        let request = Self::build(&req)?;
        let window =
            web_sys::window().ok_or_else(|| DeskError::transport("No window object"))?;

        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("Network", e))?;
        let response: Response = value.dyn_into().map_err(|e| js_error("Response", e))?;

        let status = response.status();
        let promise = response.text().map_err(|e| js_error("Body", e))?;
        let body = JsFuture::from(promise)
            .await
            .map_err(|e| js_error("Body", e))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
