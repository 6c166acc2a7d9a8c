//! Route visualisation.
//!
//! A solved trip is first turned into a [`RoutePlan`], a flat description of
//! everything to draw. The plan is then handed to a [`RenderTarget`]: either a
//! map surface or a plain text listing carrying the same information. The
//! target is picked once, at startup, by [`select_target`].

pub mod map;
pub mod summary;
pub mod text;

pub use map::{LineLayer, MapSurface, MapTarget, Marker, MarkerKind, Popup};
pub use summary::{RouteFacts, RouteSummary};
pub use text::{TextBlock, TextStop, TextTarget};

use crate::config::MapSettings;
use crate::error::{DeskError, DeskResult};
use routedesk_shared::{
    ROUTE_LAYER_PREFIX, RouteDetail, StationKind, Stop, SupportStation, VehicleRoute,
};

/// Route line colours, cycled by route index.
pub const PALETTE: [&str; 5] = ["#45b7d1", "#96ceb4", "#feca57", "#ff9ff3", "#f8b500"];
pub const DEPOT_COLOR: &str = "#ff6b6b";
pub const CUSTOMER_COLOR: &str = "#4ecdc4";
pub const STATION_COLOR: &str = "#ff9ff3";

pub const INVALID_ROUTE_DATA: &str = "Invalid route data";

/// `[lng, lat]`
pub type LngLat = [f64; 2];

pub fn route_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn route_layer_id(index: usize) -> String {
    format!("{}{}", ROUTE_LAYER_PREFIX, index)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LngLat,
    pub north_east: LngLat,
}

impl Bounds {
    pub fn around(point: LngLat) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    pub fn extend(&mut self, [lng, lat]: LngLat) {
        self.south_west[0] = self.south_west[0].min(lng);
        self.south_west[1] = self.south_west[1].min(lat);
        self.north_east[0] = self.north_east[0].max(lng);
        self.north_east[1] = self.north_east[1].max(lat);
    }

    /// Smallest box containing every point, `None` for no points.
    pub fn covering<I: IntoIterator<Item = LngLat>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::around(iter.next()?);
        iter.for_each(|p| bounds.extend(p));
        Some(bounds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRole {
    Depot,
    Customer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStop {
    pub id: String,
    pub role: StopRole,
    pub position: LngLat,
    pub weight: Option<f64>,
    pub time_window: Option<String>,
    /// Support stations near this stop; always empty for the depot.
    pub stations: Vec<PlannedStation>,
}

impl PlannedStop {
    fn from_stop(stop: &Stop, role: StopRole) -> Self {
        let stations = match role {
            StopRole::Depot => Vec::new(),
            StopRole::Customer => stop
                .stations()
                .map(|(kind, station)| PlannedStation::from_station(kind, station))
                .collect(),
        };
        Self {
            id: stop.id.clone(),
            role,
            position: stop.lng_lat(),
            weight: stop.weight,
            time_window: stop.time_window.as_ref().map(ToString::to_string),
            stations,
        }
    }

    pub fn station_count(&self, kind: StationKind) -> usize {
        self.stations.iter().filter(|s| s.kind == kind).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStation {
    pub kind: StationKind,
    pub name: String,
    pub address: Option<String>,
    pub position: LngLat,
    pub distance_km: Option<f64>,
}

impl PlannedStation {
    fn from_station(kind: StationKind, station: &SupportStation) -> Self {
        let name = station.name.clone().unwrap_or_else(|| match kind {
            StationKind::Fuel => "Fuel station".to_string(),
            StationKind::Repair => "Repair shop".to_string(),
        });
        Self {
            kind,
            name,
            address: station.address.clone(),
            position: [station.lon, station.lat],
            distance_km: station.distance_km,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    pub index: usize,
    pub color: &'static str,
    pub label: String,
    pub layer_id: String,
    pub stops: Vec<PlannedStop>,
    pub stations: Vec<PlannedStation>,
    /// Full sequence including depot endpoints. Empty means nothing is drawn.
    pub path: Vec<LngLat>,
    pub distance_km: Option<f64>,
    pub traffic_mins: Option<f64>,
    pub normal_mins: Option<f64>,
}

impl PlannedRoute {
    fn build(index: usize, route: &VehicleRoute, depot_id: Option<&str>) -> Self {
        let label = route
            .vehicle
            .clone()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("Vehicle {}", index + 1));

        let stops: Vec<PlannedStop> = route
            .stops()
            .iter()
            .map(|stop| {
                let role = if depot_id == Some(stop.id.as_str()) {
                    StopRole::Depot
                } else {
                    StopRole::Customer
                };
                PlannedStop::from_stop(stop, role)
            })
            .collect();
        let stations = stops.iter().flat_map(|s| s.stations.iter().cloned()).collect();

        let metrics = route.metrics.as_ref();
        Self {
            index,
            color: route_color(index),
            label,
            layer_id: route_layer_id(index),
            path: route.stops().iter().map(Stop::lng_lat).collect(),
            stops,
            stations,
            distance_km: route.distance_km(),
            traffic_mins: metrics.and_then(|m| m.total_traffic_duration_mins),
            normal_mins: metrics.and_then(|m| m.total_normal_duration_mins),
        }
    }

    pub fn customers(&self) -> impl Iterator<Item = &PlannedStop> {
        self.stops.iter().filter(|s| s.role == StopRole::Customer)
    }

    pub fn is_drawable(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Everything a target needs to draw one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub depot: Option<PlannedStop>,
    pub routes: Vec<PlannedRoute>,
    pub bounds: Option<Bounds>,
    pub summary: Option<String>,
}

impl RoutePlan {
    pub fn build(detail: &RouteDetail) -> DeskResult<Self> {
        let Some(refined) = detail.refined_routes.as_ref() else {
            return Err(DeskError::malformed(INVALID_ROUTE_DATA).in_op("render.plan"));
        };
        let depot = detail.depot.as_ref();
        let depot_id = depot.map(|d| d.id.as_str());

        let routes: Vec<PlannedRoute> = refined
            .iter()
            .enumerate()
            .map(|(i, route)| PlannedRoute::build(i, route, depot_id))
            .collect();

        let bounds = Bounds::covering(
            depot
                .map(Stop::lng_lat)
                .into_iter()
                .chain(routes.iter().flat_map(|r| r.path.iter().copied())),
        );

        Ok(Self {
            depot: depot.map(|d| PlannedStop::from_stop(d, StopRole::Depot)),
            routes,
            bounds,
            summary: detail.summary.clone(),
        })
    }
}

/// What a render pass produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Map { markers: usize, lines: usize },
    Text(Vec<TextBlock>),
    /// The target could not draw yet; render again once it is ready.
    Deferred,
}

pub trait RenderTarget {
    fn name(&self) -> &'static str;

    fn is_ready(&self) -> bool {
        true
    }

    /// Replaces whatever the previous call drew.
    fn render(&mut self, plan: &RoutePlan) -> DeskResult<Rendered>;
}

/// Validates the payload and draws it; malformed input draws nothing.
pub fn render_detail(target: &mut dyn RenderTarget, detail: &RouteDetail) -> DeskResult<Rendered> {
    let plan = RoutePlan::build(detail)?;
    if !target.is_ready() {
        log::debug!("Route viewer: {} not ready, deferring draw", target.name());
        return Ok(Rendered::Deferred);
    }
    target
        .render(&plan)
        .map_err(|e| e.in_op_with("render.draw", target.name()))
}

/// Map rendering when a surface could be created, text otherwise.
pub fn select_target<S>(surface: Option<S>, settings: &MapSettings) -> Box<dyn RenderTarget>
where
    S: MapSurface + 'static,
{
    match surface {
        Some(surface) => {
            log::info!("Route viewer: map");
            Box::new(MapTarget::new(surface, settings))
        }
        None => {
            log::info!("Route viewer: text listing");
            Box::new(TextTarget::new())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskErrorStatus;
    use map::MemorySurface;

    #[test]
    fn test_missing_refined_routes_is_malformed() {
        let err = RoutePlan::build(&RouteDetail::default()).unwrap_err();
        assert_eq!(err.status, DeskErrorStatus::Malformed);
        assert_eq!(err.message(), "Invalid route data");
    }

    #[test]
    fn test_plan_classifies_stops_and_labels() {
        let plan = RoutePlan::build(&fixtures::two_vans()).unwrap();
        assert_eq!(plan.routes.len(), 2);

        let v1 = &plan.routes[0];
        assert_eq!(v1.label, "V1");
        assert_eq!(v1.color, "#45b7d1");
        assert_eq!(v1.layer_id, "route-0");
        assert_eq!(v1.path.len(), 3);
        assert_eq!(v1.customers().count(), 1);
        assert_eq!(v1.stations.len(), 2);
        assert_eq!(v1.stations[0].kind, StationKind::Fuel);
        assert_eq!(v1.stations[1].kind, StationKind::Repair);
        assert_eq!(v1.stops[1].time_window.as_deref(), Some("08:00–12:00"));

        let second = &plan.routes[1];
        assert_eq!(second.label, "Vehicle 2");
        assert_eq!(second.color, "#96ceb4");
        assert_eq!(second.distance_km, Some(11.0));
    }

    #[test]
    fn test_bounds_cover_every_stop() {
        let plan = RoutePlan::build(&fixtures::two_vans()).unwrap();
        let bounds = plan.bounds.unwrap();
        assert_eq!(bounds.south_west, [-0.2, 51.45]);
        assert_eq!(bounds.north_east, [-0.10, 51.52]);
    }

    #[test]
    fn test_palette_cycles_and_empty_routes_keep_their_slot() {
        let mut detail = RouteDetail {
            refined_routes: Some(vec![VehicleRoute::default(); 7]),
            ..Default::default()
        };
        if let Some(routes) = detail.refined_routes.as_mut() {
            routes[6] = fixtures::two_vans().refined_routes.unwrap()[0].clone();
        }
        let plan = RoutePlan::build(&detail).unwrap();
        assert_eq!(plan.routes[5].color, PALETTE[0]);
        assert_eq!(plan.routes[6].color, PALETTE[1]);
        assert!(!plan.routes[0].is_drawable());
        assert!(plan.routes[6].is_drawable());
    }

    #[test]
    fn test_select_target() {
        let settings = MapSettings::default();
        assert_eq!(select_target(Some(MemorySurface::default()), &settings).name(), "map");
        assert_eq!(select_target::<MemorySurface>(None, &settings).name(), "text");
    }

    #[test]
    fn test_render_detail_reports_malformed_without_drawing() {
        let mut target = MapTarget::new(MemorySurface::default(), &MapSettings::default());
        assert!(render_detail(&mut target, &RouteDetail::default()).is_err());
        assert!(target.surface().markers.is_empty());
        assert!(target.surface().fitted.is_none());
    }

    #[test]
    fn test_draw_waits_for_surface() {
        let surface = MemorySurface {
            loading: true,
            ..Default::default()
        };
        let mut target = MapTarget::new(surface, &MapSettings::default());
        let detail = fixtures::two_vans();

        assert_eq!(render_detail(&mut target, &detail).unwrap(), Rendered::Deferred);
        assert!(target.surface().markers.is_empty());
        assert!(target.surface().layers.is_empty());

        assert!(render_detail(&mut target, &RouteDetail::default()).is_err());

        target.surface_mut().loading = false;
        assert_eq!(
            render_detail(&mut target, &detail).unwrap(),
            Rendered::Map { markers: 5, lines: 2 }
        );
    }
}
