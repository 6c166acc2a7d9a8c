use crate::error::{DeskError, DeskResult};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use routedesk_shared::protocol::{
    ApiRequest, ExtractOrdersRequest, LatestRouteRequest, LogoutRequest, PendingNodesRequest,
    ResetNodesRequest, RouteRequest, SituationCall, TripIdsRequest,
};
use routedesk_shared::{
    Ack, AuthResponse, Conversation, HEADER_AUTHORIZATION, LoginRequest, Node, RouteRecord,
    STATUS_SUCCESS, SignupRequest, SituationKind, SituationRequest, SolveRequest, SolveResponse,
    TripRef,
};
use serde_json::Value;

/// Typed client for the dispatch backend.
///
/// Every call is a single best-effort request; the session cookie travels
/// with the transport, the bearer token (when held) in `Authorization`.
#[derive(Clone, Debug, PartialEq)]
pub struct DeskApi<C> {
    base_url: String,
    client: C,
    bearer: Option<String>,
}

impl<C: HttpClient + Clone> DeskApi<C> {
    pub fn new(base_url: &str, client: C) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            bearer: None,
        }
    }

    /// Clone of this client carrying `token` as bearer credential.
    pub fn with_bearer(&self, token: Option<&str>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            bearer: token.map(str::to_string),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.is_some()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send one endpoint request and unwrap its `{status, ...}` envelope.
    pub async fn call<R: ApiRequest>(&self, req: &R) -> DeskResult<R::Response> {
        let path = req.path();
        let mut http = HttpRequest::new(&self.url(&path), R::METHOD)
            .with_header("Accept", "application/json");

        if R::METHOD != HttpMethod::Get {
            http = http
                .with_header("Content-Type", "application/json")
                .with_body(serde_json::to_value(req)?);
        }
        if let Some(token) = &self.bearer {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        log::debug!("{} {}", R::METHOD.as_str(), path);

        let resp = self
            .client
            .send(http)
            .await
            .map_err(|e| e.in_op_with("api.send", path.clone()))?;

        decode_envelope::<R::Response>(resp).map_err(|e| {
            log::warn!("{} {} failed: {}", R::METHOD.as_str(), path, e);
            e.in_op_with("api.decode", path)
        })
    }

    // =========================================================
    // Auth
    // =========================================================

    pub async fn login(&self, req: &LoginRequest) -> DeskResult<AuthResponse> {
        self.call(req).await
    }

    pub async fn signup(&self, req: &SignupRequest) -> DeskResult<AuthResponse> {
        self.call(req).await
    }

    pub async fn logout(&self) -> DeskResult<Ack> {
        self.call(&LogoutRequest {}).await
    }

    // =========================================================
    // Orders & Nodes
    // =========================================================

    pub async fn extract_orders(&self) -> DeskResult<Ack> {
        self.call(&ExtractOrdersRequest {}).await
    }

    pub async fn pending_nodes(&self) -> DeskResult<Vec<Node>> {
        Ok(self.call(&PendingNodesRequest).await?.nodes)
    }

    pub async fn reset_nodes(&self) -> DeskResult<Ack> {
        self.call(&ResetNodesRequest {}).await
    }

    // =========================================================
    // Routes
    // =========================================================

    pub async fn solve(&self, req: &SolveRequest) -> DeskResult<SolveResponse> {
        self.call(req).await
    }

    pub async fn latest_route(&self) -> DeskResult<RouteRecord> {
        self.call(&LatestRouteRequest).await
    }

    pub async fn route(&self, trip_id: &str) -> DeskResult<RouteRecord> {
        self.call(&RouteRequest {
            trip_id: trip_id.to_string(),
        })
        .await
    }

    pub async fn trip_ids(&self) -> DeskResult<Vec<TripRef>> {
        Ok(self.call(&TripIdsRequest).await?.trip_ids)
    }

    // =========================================================
    // Situations
    // =========================================================

    /// Submit a situation and normalise the reply into one message list.
    pub async fn situation(
        &self,
        kind: SituationKind,
        trip_id: Option<&str>,
        request: SituationRequest,
    ) -> DeskResult<Conversation> {
        let call = SituationCall {
            kind,
            trip_id: trip_id.map(str::to_string),
            request,
        };
        let reply = self.call(&call).await?;
        Ok(reply.into_conversation(kind))
    }
}

/// Server-supplied failure text: `message`, or `error` from the auth guard.
fn server_message(body: &Value) -> String {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn decode_envelope<T: serde::de::DeserializeOwned>(resp: HttpResponse) -> DeskResult<T> {
    let body: Option<Value> = serde_json::from_str(&resp.body).ok();

    if !resp.ok() {
        let message = body.as_ref().map(server_message).unwrap_or_default();
        return Err(DeskError::rejected(message).in_op_with("http.status", resp.status.to_string()));
    }

    let body = body.ok_or_else(|| DeskError::malformed("").in_op_with("api.envelope", "not JSON"))?;

    let status = body.get("status").and_then(Value::as_str);
    if status != Some(STATUS_SUCCESS) {
        return Err(DeskError::rejected(server_message(&body)));
    }

    serde_json::from_value(body).map_err(DeskError::from)
}
