use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod serde_helper;
mod time_window;

pub use time_window::TimeWindow;

// =========================================================
// Constants
// =========================================================

pub const STATUS_SUCCESS: &str = "success";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const ROUTE_LAYER_PREFIX: &str = "route-";

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(default)]
    pub access_token: Option<String>,
}

// =========================================================
// Orders & Nodes
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub local_authority: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// An order converted into a schedulable delivery unit.
///
/// Status transitions (pending -> processed) belong to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: i64,
    pub order_id: i64,
    #[serde(rename = "cust_lat")]
    pub lat: f64,
    #[serde(rename = "cust_long")]
    pub long: f64,
    #[serde(default)]
    pub package_weight: Option<f64>,
    #[serde(default)]
    pub traffic_level: Option<String>,
    #[serde(default)]
    pub delivery_window: Option<String>,
    #[serde(default)]
    pub warehouse_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub customer: Customer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingNodes {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// Bare acknowledgement for mutations that only report a status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

// =========================================================
// Solving & Routes
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_vehicles: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_capacity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    pub trip_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub route_detail: Option<RouteDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    #[serde(default)]
    pub total_distance_km: Option<f64>,
    #[serde(default)]
    pub total_traffic_duration_mins: Option<f64>,
    #[serde(default)]
    pub total_normal_duration_mins: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    Fuel,
    Repair,
}

impl StationKind {
    pub fn label(&self) -> &'static str {
        match self {
            StationKind::Fuel => "fuel",
            StationKind::Repair => "repair",
        }
    }
}

/// A fuel or repair facility suggested near a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportStation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(deserialize_with = "serde_helper::string_or_number")]
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub nearby_petrol_stations: Option<Vec<SupportStation>>,
    #[serde(default)]
    pub nearby_repair_shops: Option<Vec<SupportStation>>,
}

impl Stop {
    /// `[lon, lat]`, the order map libraries expect.
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn stations(&self) -> impl Iterator<Item = (StationKind, &SupportStation)> {
        let fuel = self
            .nearby_petrol_stations
            .iter()
            .flatten()
            .map(|s| (StationKind::Fuel, s));
        let repair = self
            .nearby_repair_shops
            .iter()
            .flatten()
            .map(|s| (StationKind::Repair, s));
        fuel.chain(repair)
    }

    pub fn station_count(&self, kind: StationKind) -> usize {
        let list = match kind {
            StationKind::Fuel => &self.nearby_petrol_stations,
            StationKind::Repair => &self.nearby_repair_shops,
        };
        list.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRoute {
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub sequence: Option<Vec<Stop>>,
    #[serde(default)]
    pub metrics: Option<RouteMetrics>,
    #[serde(default)]
    pub total_distance_km: Option<f64>,
}

impl VehicleRoute {
    pub fn stops(&self) -> &[Stop] {
        self.sequence.as_deref().unwrap_or(&[])
    }

    /// Distance from `metrics`, falling back to the total written on the route itself.
    pub fn distance_km(&self) -> Option<f64> {
        self.metrics
            .as_ref()
            .and_then(|m| m.total_distance_km)
            .or(self.total_distance_km)
    }
}

/// Solved trip payload as produced by the backend solver.
///
/// `refined_routes` stays optional so its absence can be reported as a
/// malformed payload by the consumer instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteDetail {
    #[serde(default)]
    pub depot: Option<Stop>,
    #[serde(default)]
    pub refined_routes: Option<Vec<VehicleRoute>>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(alias = "route")]
    pub route_detail: RouteDetail,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRef {
    pub trip_id: String,
    #[serde(default)]
    pub created_at: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripList {
    #[serde(default)]
    pub trip_ids: Vec<TripRef>,
}

// =========================================================
// Situations
// =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SituationKind {
    #[default]
    General,
    Fuel,
    Fatigue,
}

impl SituationKind {
    pub const ALL: [SituationKind; 3] = [
        SituationKind::General,
        SituationKind::Fuel,
        SituationKind::Fatigue,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            SituationKind::General => "/api/situation/recommend",
            SituationKind::Fuel => "/api/situation/fuel",
            SituationKind::Fatigue => "/api/situation/fatigue",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SituationKind::General => "General Issue",
            SituationKind::Fuel => "Fuel/Energy",
            SituationKind::Fatigue => "Fatigue/Compliance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SituationRequest {
    pub vehicle_id: String,
    pub near_customer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Raw situation reply. General recommendations answer with `chat_history`,
/// fuel and fatigue with `conversation`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SituationReply {
    #[serde(default)]
    pub chat_history: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub conversation: Option<Vec<ChatMessage>>,
}

impl SituationReply {
    pub fn into_conversation(self, kind: SituationKind) -> Conversation {
        let messages = match kind {
            SituationKind::General => self.chat_history,
            SituationKind::Fuel | SituationKind::Fatigue => self.conversation,
        };
        Conversation {
            kind,
            messages: messages.unwrap_or_default(),
        }
    }
}

/// Situation chat, tagged by the endpoint that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub kind: SituationKind,
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json<T: serde::de::DeserializeOwned>(s: &str) -> T {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_node_wire_names() {
        let node: Node = from_json(
            r#"{"node_id":7,"order_id":42,"cust_lat":51.5,"cust_long":-0.12,
                "package_weight":12.5,"traffic_level":"High","delivery_window":"Morning",
                "warehouse_id":"W010","status":"pending",
                "customer":{"customer_id":"C079","name":null,"region":"london",
                            "local_authority":null,"phone":null}}"#,
        );
        assert_eq!(node.lat, 51.5);
        assert_eq!(node.long, -0.12);
        assert_eq!(node.customer.customer_id.as_deref(), Some("C079"));
        assert!(node.customer.name.is_none());
        assert_eq!(node.package_weight, Some(12.5));
    }

    #[test]
    fn test_node_nullable_columns() {
        let node: Node = from_json(
            r#"{"node_id":8,"order_id":43,"cust_lat":51.5,"cust_long":-0.12,
                "package_weight":null}"#,
        );
        assert!(node.package_weight.is_none());
        assert!(node.status.is_empty());
        assert_eq!(node.customer, Customer::default());
    }

    #[test]
    fn test_solve_request_omits_absent_fields() {
        let req = SolveRequest {
            num_vehicles: Some(3),
            ..Default::default()
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v, serde_json::json!({ "num_vehicles": 3 }));
    }

    #[test]
    fn test_route_record_accepts_route_alias() {
        let rec: RouteRecord = from_json(
            r#"{"trip_id":"abc123ef","route":{"refined_routes":[]},"summary":"ok"}"#,
        );
        assert_eq!(rec.trip_id.as_deref(), Some("abc123ef"));
        assert_eq!(rec.route_detail.refined_routes, Some(vec![]));
    }

    #[test]
    fn test_route_detail_without_routes_still_parses() {
        let detail: RouteDetail = from_json(r#"{"depot":{"id":0,"lat":1.0,"lon":2.0}}"#);
        assert!(detail.refined_routes.is_none());
        assert_eq!(detail.depot.unwrap().id, "0");
    }

    #[test]
    fn test_stop_stations_fuel_before_repair() {
        let stop: Stop = from_json(
            r#"{"id":"C1","lat":1.0,"lon":2.0,
                "nearby_petrol_stations":[{"name":"Shell","lat":1.1,"lon":2.1}],
                "nearby_repair_shops":[{"name":"Kwik Fit","lat":1.2,"lon":2.2},
                                       {"name":"Halfords","lat":1.3,"lon":2.3}]}"#,
        );
        let kinds: Vec<_> = stop.stations().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![StationKind::Fuel, StationKind::Repair, StationKind::Repair]
        );
        assert_eq!(stop.station_count(StationKind::Repair), 2);
        assert_eq!(stop.lng_lat(), [2.0, 1.0]);
    }

    #[test]
    fn test_distance_falls_back_to_route_total() {
        let route = VehicleRoute {
            total_distance_km: Some(12.3),
            metrics: Some(RouteMetrics::default()),
            ..Default::default()
        };
        assert_eq!(route.distance_km(), Some(12.3));
    }

    #[test]
    fn test_situation_reply_picks_field_by_kind() {
        let reply: SituationReply = from_json(
            r#"{"chat_history":[{"role":"user","content":"hi"}],
                "conversation":[{"role":"assistant","content":"refuel at A"}]}"#,
        );
        let general = reply.clone().into_conversation(SituationKind::General);
        assert_eq!(general.messages[0].content, "hi");

        let fuel = reply.into_conversation(SituationKind::Fuel);
        assert_eq!(fuel.kind, SituationKind::Fuel);
        assert_eq!(fuel.messages[0].role, ChatRole::Assistant);

        let empty = SituationReply::default().into_conversation(SituationKind::Fatigue);
        assert!(empty.messages.is_empty());
    }

    #[test]
    fn test_trip_ref_created_at() {
        let list: TripList = from_json(
            r#"{"trip_ids":[{"trip_id":"abc123ef","created_at":"2025-03-01T09:15:00.123456"},
                            {"trip_id":"ffee0011","created_at":null}]}"#,
        );
        assert_eq!(list.trip_ids.len(), 2);
        assert!(list.trip_ids[0].created_at.is_some());
        assert!(list.trip_ids[1].created_at.is_none());
    }
}
