use crate::api::DeskApi;
use crate::error::DeskResult;
use crate::request::HttpClient;
use routedesk_shared::{RouteRecord, SolveRequest, SolveResponse, TripRef};

const SOLVE_FAILED: &str = "Failed to solve routes";
const ROUTE_FAILED: &str = "Failed to load route";
const TRIPS_FAILED: &str = "Failed to load trips";

pub const DEFAULT_VEHICLES: u32 = 3;
pub const DEFAULT_CAPACITY: u32 = 200;
/// Bounds offered by the vehicle-count widget. Not enforced on submit.
pub const VEHICLE_WIDGET_RANGE: (u32, u32) = (1, 20);

#[derive(Debug, Clone, PartialEq)]
pub struct SolveForm {
    pub num_vehicles: u32,
    pub vehicle_capacity: u32,
    pub preferences: String,
}

impl Default for SolveForm {
    fn default() -> Self {
        Self {
            num_vehicles: DEFAULT_VEHICLES,
            vehicle_capacity: DEFAULT_CAPACITY,
            preferences: String::new(),
        }
    }
}

impl SolveForm {
    /// Empty preferences are left out of the request.
    pub fn request(&self) -> SolveRequest {
        let preferences = self.preferences.trim();
        SolveRequest {
            preferences: (!preferences.is_empty()).then(|| preferences.to_string()),
            num_vehicles: Some(self.num_vehicles),
            vehicle_capacity: Some(self.vehicle_capacity),
        }
    }
}

/// Parses a numeric form field; anything unparsable keeps the previous value.
pub fn parse_count(input: &str, previous: u32) -> u32 {
    input.trim().parse().unwrap_or(previous)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub trip_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct RoutesPage {
    pub form: SolveForm,
    pub loading: bool,
    pub result: Option<SolveOutcome>,
    pub error: Option<String>,
    /// Trip currently shown in the viewer.
    pub record: Option<RouteRecord>,
    pub trips: Vec<TripRef>,
}

impl RoutesPage {
    pub fn begin_solve(&mut self) -> SolveRequest {
        self.loading = true;
        self.error = None;
        self.result = None;
        self.form.request()
    }

    /// Returns the trip to fetch for the viewer when the solve response
    /// carried no route inline.
    pub fn finish_solve(&mut self, result: DeskResult<SolveResponse>) -> Option<String> {
        self.loading = false;
        match result {
            Ok(resp) => {
                log::info!("Solved trip {}", resp.trip_id);
                let follow_up = match resp.route_detail {
                    Some(detail) => {
                        self.record = Some(RouteRecord {
                            trip_id: Some(resp.trip_id.clone()),
                            summary: detail.summary.clone(),
                            route_detail: detail,
                        });
                        None
                    }
                    None => Some(resp.trip_id.clone()),
                };
                self.result = Some(SolveOutcome {
                    trip_id: resp.trip_id,
                    message: resp.message,
                });
                follow_up
            }
            Err(e) => {
                log::warn!("Solve failed: {}", e);
                self.error = Some(e.user_message(SOLVE_FAILED));
                None
            }
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_load(&mut self, result: DeskResult<RouteRecord>) {
        self.loading = false;
        match result {
            Ok(record) => self.record = Some(record),
            Err(e) => {
                log::warn!("Route load failed: {}", e);
                self.error = Some(e.user_message(ROUTE_FAILED));
            }
        }
    }

    pub fn finish_trips(&mut self, result: DeskResult<Vec<TripRef>>) {
        self.loading = false;
        match result {
            Ok(trips) => self.trips = trips,
            Err(e) => {
                log::warn!("Trip list failed: {}", e);
                self.error = Some(e.user_message(TRIPS_FAILED));
            }
        }
    }

    pub async fn solve<C: HttpClient + Clone>(&mut self, api: &DeskApi<C>) {
        let req = self.begin_solve();
        let result = api.solve(&req).await;
        if let Some(trip_id) = self.finish_solve(result) {
            self.load_trip(api, &trip_id).await;
        }
    }

    pub async fn load_trip<C: HttpClient + Clone>(&mut self, api: &DeskApi<C>, trip_id: &str) {
        self.begin_load();
        let result = api.route(trip_id).await;
        self.finish_load(result);
    }

    pub async fn load_latest<C: HttpClient + Clone>(&mut self, api: &DeskApi<C>) {
        self.begin_load();
        let result = api.latest_route().await;
        self.finish_load(result);
    }

    pub async fn load_trips<C: HttpClient + Clone>(&mut self, api: &DeskApi<C>) {
        self.begin_load();
        let result = api.trip_ids().await;
        self.finish_trips(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MockHttpClient;
    use serde_json::{Value, json};

    const BASE: &str = "http://api.test";

    #[test]
    fn test_form_defaults_and_empty_preferences() {
        let form = SolveForm::default();
        let req = form.request();
        assert_eq!(req.num_vehicles, Some(3));
        assert_eq!(req.vehicle_capacity, Some(200));
        assert!(req.preferences.is_none());
    }

    #[test]
    fn test_parse_count_keeps_previous_on_garbage() {
        assert_eq!(parse_count("5", 3), 5);
        assert_eq!(parse_count("", 3), 3);
        assert_eq!(parse_count("abc", 200), 200);
        // widget bounds are advisory
        assert_eq!(parse_count("42", 3), 42);
    }

    #[tokio::test]
    async fn test_solve_shows_trip_and_message_verbatim() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{BASE}/api/solve"),
            200,
            json!({ "status": "success", "trip_id": "abc123ef", "message": "Routes optimized" }),
        );
        client.mock_response(
            &format!("{BASE}/api/routes/abc123ef"),
            200,
            json!({ "status": "success", "trip_id": "abc123ef", "route": { "refined_routes": [] } }),
        );
        let api = DeskApi::new(BASE, client.clone());

        let mut page = RoutesPage::default();
        page.form.preferences = "avoid high traffic".into();
        page.solve(&api).await;

        assert_eq!(
            page.result,
            Some(SolveOutcome {
                trip_id: "abc123ef".into(),
                message: "Routes optimized".into()
            })
        );
        assert!(page.error.is_none());
        assert!(!page.loading);
        assert_eq!(page.record.unwrap().trip_id.as_deref(), Some("abc123ef"));

        let body: Value = serde_json::from_str(client.requests()[0].3.as_ref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "preferences": "avoid high traffic", "num_vehicles": 3, "vehicle_capacity": 200 })
        );
    }

    #[tokio::test]
    async fn test_solve_failure_clears_previous_result() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{BASE}/api/solve"),
            404,
            json!({ "status": "error", "message": "No pending nodes found" }),
        );
        let api = DeskApi::new(BASE, client);

        let mut page = RoutesPage::default();
        page.result = Some(SolveOutcome {
            trip_id: "old".into(),
            message: "old".into(),
        });
        page.solve(&api).await;
        assert!(page.result.is_none());
        assert_eq!(page.error.as_deref(), Some("No pending nodes found"));
    }

    #[tokio::test]
    async fn test_solve_with_inline_detail_feeds_viewer() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{BASE}/api/solve"),
            200,
            json!({ "status": "success", "trip_id": "t1", "message": "ok",
                    "route_detail": { "refined_routes": [], "summary": "Two vans" } }),
        );
        let api = DeskApi::new(BASE, client.clone());

        let mut page = RoutesPage::default();
        page.solve(&api).await;
        assert_eq!(client.request_count(), 1);
        let record = page.record.unwrap();
        assert_eq!(record.trip_id.as_deref(), Some("t1"));
        assert_eq!(record.summary.as_deref(), Some("Two vans"));
    }

    #[tokio::test]
    async fn test_load_latest_and_failure_fallback() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{BASE}/api/routes/latest"),
            200,
            json!({ "status": "success", "trip_id": "t9", "route_detail": { "refined_routes": [] } }),
        );
        client.mock_unreachable(&format!("{BASE}/api/routes/missing"));
        let api = DeskApi::new(BASE, client);

        let mut page = RoutesPage::default();
        page.load_latest(&api).await;
        assert_eq!(page.record.as_ref().unwrap().trip_id.as_deref(), Some("t9"));

        page.load_trip(&api, "missing").await;
        assert_eq!(page.error.as_deref(), Some("Failed to load route"));
        // the previously shown trip stays on screen
        assert!(page.record.is_some());
    }

    #[tokio::test]
    async fn test_load_trips() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{BASE}/api/routes/trip-ids"),
            200,
            json!({ "status": "success", "trip_ids": [{ "trip_id": "b" }, { "trip_id": "a" }] }),
        );
        let api = DeskApi::new(BASE, client);

        let mut page = RoutesPage::default();
        page.load_trips(&api).await;
        let ids: Vec<_> = page.trips.iter().map(|t| t.trip_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
