use routedesk_shared::RouteRecord;

/// Per-vehicle figures shown next to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFacts {
    pub label: String,
    /// Visits excluding the return to the depot.
    pub stops: usize,
    pub distance_km: Option<f64>,
    pub traffic_mins: Option<f64>,
    pub normal_mins: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSummary {
    pub trip_id: Option<String>,
    pub routes: Vec<RouteFacts>,
    pub summary: Option<String>,
}

impl RouteSummary {
    pub fn from_record(record: &RouteRecord) -> Self {
        let detail = &record.route_detail;
        let routes = detail
            .refined_routes
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, route)| {
                let metrics = route.metrics.as_ref();
                RouteFacts {
                    label: route
                        .vehicle
                        .clone()
                        .filter(|v| !v.is_empty())
                        .unwrap_or_else(|| format!("Vehicle {}", i + 1)),
                    stops: route.stops().len().saturating_sub(1),
                    distance_km: route.distance_km(),
                    traffic_mins: metrics.and_then(|m| m.total_traffic_duration_mins),
                    normal_mins: metrics.and_then(|m| m.total_normal_duration_mins),
                }
            })
            .collect();

        Self {
            trip_id: record.trip_id.clone(),
            routes,
            summary: record
                .summary
                .clone()
                .or_else(|| detail.summary.clone())
                .filter(|s| !s.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;
    use routedesk_shared::{RouteDetail, VehicleRoute};

    #[test]
    fn test_counts_and_summary_fallback() {
        let record = RouteRecord {
            trip_id: Some("t1".into()),
            route_detail: fixtures::two_vans(),
            summary: None,
        };
        let summary = RouteSummary::from_record(&record);
        assert_eq!(summary.routes.len(), 2);
        assert_eq!(summary.routes[0].stops, 2);
        assert_eq!(summary.routes[0].traffic_mins, Some(31.0));
        assert_eq!(summary.routes[1].label, "Vehicle 2");
        assert_eq!(summary.routes[1].distance_km, Some(11.0));
        assert_eq!(summary.summary.as_deref(), Some("Two vans cover central London"));
    }

    #[test]
    fn test_empty_sequence_has_zero_stops() {
        let record = RouteRecord {
            trip_id: None,
            route_detail: RouteDetail {
                refined_routes: Some(vec![VehicleRoute::default()]),
                ..Default::default()
            },
            summary: Some("Record-level text".into()),
        };
        let summary = RouteSummary::from_record(&record);
        assert_eq!(summary.routes[0].stops, 0);
        assert_eq!(summary.summary.as_deref(), Some("Record-level text"));
    }
}
