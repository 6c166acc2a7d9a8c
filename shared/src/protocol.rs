use crate::{
    Ack, AuthResponse, LoginRequest, PendingNodes, RouteRecord, SignupRequest, SituationKind,
    SituationReply, SituationRequest, SolveRequest, SolveResponse, TripList,
};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// `Response` is the payload that remains once the `{status, message}` envelope
/// has been checked by the client.
pub trait ApiRequest: Serialize {
    /// The response payload returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the backend base URL.
    fn path(&self) -> String;
}

macro_rules! fixed_endpoint {
    ($req:ty, $resp:ty, $method:ident, $path:literal) => {
        impl ApiRequest for $req {
            type Response = $resp;
            const METHOD: HttpMethod = HttpMethod::$method;
            fn path(&self) -> String {
                $path.to_string()
            }
        }
    };
}

// =========================================================
// Request Definitions
// =========================================================

fixed_endpoint!(LoginRequest, AuthResponse, Post, "/api/login");
fixed_endpoint!(SignupRequest, AuthResponse, Post, "/api/signup");

/// Logout. Serializes to `{}`.
#[derive(Debug, Default, Serialize)]
pub struct LogoutRequest {}
fixed_endpoint!(LogoutRequest, Ack, Post, "/api/logout");

/// Convert the warehouse's pending orders into nodes.
#[derive(Debug, Default, Serialize)]
pub struct ExtractOrdersRequest {}
fixed_endpoint!(ExtractOrdersRequest, Ack, Post, "/api/orders/to-nodes");

#[derive(Debug, Default, Serialize)]
pub struct PendingNodesRequest;
fixed_endpoint!(PendingNodesRequest, PendingNodes, Get, "/api/nodes/pending");

/// Put processed nodes back to pending.
#[derive(Debug, Default, Serialize)]
pub struct ResetNodesRequest {}
fixed_endpoint!(ResetNodesRequest, Ack, Post, "/api/nodes/reset-pending");

fixed_endpoint!(SolveRequest, SolveResponse, Post, "/api/solve");

#[derive(Debug, Default, Serialize)]
pub struct LatestRouteRequest;
fixed_endpoint!(LatestRouteRequest, RouteRecord, Get, "/api/routes/latest");

#[derive(Debug, Default, Serialize)]
pub struct TripIdsRequest;
fixed_endpoint!(TripIdsRequest, TripList, Get, "/api/routes/trip-ids");

/// Fetch one stored trip.
#[derive(Debug, Serialize)]
pub struct RouteRequest {
    #[serde(skip)]
    pub trip_id: String,
}

impl ApiRequest for RouteRequest {
    type Response = RouteRecord;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/routes/{}", self.trip_id)
    }
}

/// Situation submission; the body is the flattened `SituationRequest`.
///
/// When `trip_id` is set the endpoint gets a `/{trip_id}` suffix so the
/// backend can pick the trip used as context.
#[derive(Debug, Serialize)]
pub struct SituationCall {
    #[serde(skip)]
    pub kind: SituationKind,
    #[serde(skip)]
    pub trip_id: Option<String>,
    #[serde(flatten)]
    pub request: SituationRequest,
}

impl ApiRequest for SituationCall {
    type Response = SituationReply;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        match &self.trip_id {
            Some(trip) => format!("{}/{}", self.kind.endpoint(), trip),
            None => self.kind.endpoint().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_situation_paths() {
        let mut call = SituationCall {
            kind: SituationKind::Fatigue,
            trip_id: None,
            request: SituationRequest::default(),
        };
        assert_eq!(call.path(), "/api/situation/fatigue");
        call.trip_id = Some("abc123ef".into());
        assert_eq!(call.path(), "/api/situation/fatigue/abc123ef");
    }

    #[test]
    fn test_situation_body_is_flat() {
        let call = SituationCall {
            kind: SituationKind::Fuel,
            trip_id: Some("t1".into()),
            request: SituationRequest {
                vehicle_id: "V2".into(),
                near_customer: "C079".into(),
                note: None,
            },
        };
        let v = serde_json::to_value(&call).unwrap();
        assert_eq!(
            v,
            serde_json::json!({ "vehicle_id": "V2", "near_customer": "C079" })
        );
    }

    #[test]
    fn test_empty_posts_send_object() {
        let v = serde_json::to_value(LogoutRequest {}).unwrap();
        assert_eq!(v, serde_json::json!({}));
        assert_eq!(RouteRequest { trip_id: "x".into() }.path(), "/api/routes/x");
    }
}
