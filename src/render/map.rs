use super::{
    Bounds, CUSTOMER_COLOR, DEPOT_COLOR, LngLat, PlannedRoute, PlannedStation, PlannedStop,
    RenderTarget, Rendered, RoutePlan, STATION_COLOR,
};
use crate::config::MapSettings;
use crate::error::DeskResult;
use routedesk_shared::{ROUTE_LAYER_PREFIX, StationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Depot,
    Customer,
    Station(StationKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl Popup {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    fn row(mut self, label: &str, value: impl Into<String>) -> Self {
        self.rows.push((label.to_string(), value.into()));
        self
    }

    /// Plain HTML for popup libraries that take markup.
    pub fn to_html(&self) -> String {
        let mut html = format!("<div><h3>{}</h3>", escape(&self.title));
        for (label, value) in &self.rows {
            html.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>",
                escape(label),
                escape(value)
            ));
        }
        html.push_str("</div>");
        html
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: LngLat,
    pub color: &'static str,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    pub id: String,
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
    pub coordinates: Vec<LngLat>,
}

/// Drawing primitives of an interactive map.
pub trait MapSurface {
    /// `false` while the map cannot take layers yet (style still loading).
    fn is_ready(&self) -> bool {
        true
    }

    fn clear_markers(&mut self) -> DeskResult<()>;

    fn layer_ids(&self) -> Vec<String>;

    /// Removes the layer and the source backing it.
    fn remove_layer(&mut self, id: &str) -> DeskResult<()>;

    fn add_marker(&mut self, marker: &Marker) -> DeskResult<()>;

    fn add_line(&mut self, line: &LineLayer) -> DeskResult<()>;

    fn fit_bounds(&mut self, bounds: Bounds, padding: u32) -> DeskResult<()>;
}

pub struct MapTarget<S> {
    surface: S,
    line_width: f64,
    line_opacity: f64,
    fit_padding: u32,
}

impl<S: MapSurface> MapTarget<S> {
    pub fn new(surface: S, settings: &MapSettings) -> Self {
        Self {
            surface,
            line_width: settings.line_width,
            line_opacity: settings.line_opacity,
            fit_padding: settings.fit_padding,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn clear(&mut self) -> DeskResult<()> {
        self.surface.clear_markers()?;
        for id in self.surface.layer_ids() {
            if id.starts_with(ROUTE_LAYER_PREFIX) {
                self.surface.remove_layer(&id)?;
            }
        }
        Ok(())
    }

    fn line(&self, route: &PlannedRoute) -> LineLayer {
        LineLayer {
            id: route.layer_id.clone(),
            color: route.color,
            width: self.line_width,
            opacity: self.line_opacity,
            coordinates: route.path.clone(),
        }
    }
}

/// `lat, lon` to four places.
pub(super) fn location(position: LngLat) -> String {
    format!("{:.4}, {:.4}", position[1], position[0])
}

fn depot_marker(depot: &PlannedStop) -> Marker {
    Marker {
        kind: MarkerKind::Depot,
        position: depot.position,
        color: DEPOT_COLOR,
        popup: Popup::new("Depot")
            .row("ID", depot.id.as_str())
            .row("Location", location(depot.position)),
    }
}

fn customer_marker(stop: &PlannedStop, vehicle: &str) -> Marker {
    let mut popup = Popup::new("Customer")
        .row("ID", stop.id.as_str())
        .row("Vehicle", vehicle)
        .row("Location", location(stop.position));
    if let Some(weight) = stop.weight {
        popup = popup.row("Weight", format!("{} kg", weight));
    }
    if let Some(window) = &stop.time_window {
        popup = popup.row("Time Window", window.as_str());
    }
    Marker {
        kind: MarkerKind::Customer,
        position: stop.position,
        color: CUSTOMER_COLOR,
        popup,
    }
}

fn station_marker(station: &PlannedStation) -> Marker {
    let mut popup = Popup::new(station.name.as_str()).row("Type", station.kind.label());
    if let Some(address) = &station.address {
        popup = popup.row("Address", address.as_str());
    }
    if let Some(distance) = station.distance_km {
        popup = popup.row("Distance", format!("{} km", distance));
    }
    Marker {
        kind: MarkerKind::Station(station.kind),
        position: station.position,
        color: STATION_COLOR,
        popup,
    }
}

impl<S: MapSurface> RenderTarget for MapTarget<S> {
    fn name(&self) -> &'static str {
        "map"
    }

    fn is_ready(&self) -> bool {
        self.surface.is_ready()
    }

    fn render(&mut self, plan: &RoutePlan) -> DeskResult<Rendered> {
        self.clear()?;

        let mut markers = 0;
        let mut lines = 0;

        if let Some(depot) = &plan.depot {
            self.surface.add_marker(&depot_marker(depot))?;
            markers += 1;
        }

        for route in plan.routes.iter().filter(|r| r.is_drawable()) {
            for stop in route.customers() {
                self.surface.add_marker(&customer_marker(stop, &route.label))?;
                markers += 1;
            }
            for station in &route.stations {
                self.surface.add_marker(&station_marker(station))?;
                markers += 1;
            }
            let line = self.line(route);
            self.surface.add_line(&line)?;
            lines += 1;
        }

        if let Some(bounds) = plan.bounds {
            self.surface.fit_bounds(bounds, self.fit_padding)?;
        }

        log::debug!("Drew {} markers and {} route lines", markers, lines);
        Ok(Rendered::Map { markers, lines })
    }
}

/// Surface that keeps everything in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemorySurface {
    pub markers: Vec<Marker>,
    pub layers: Vec<LineLayer>,
    /// Layers not owned by the route viewer, e.g. base-map labels.
    pub foreign_layers: Vec<String>,
    pub fitted: Option<(Bounds, u32)>,
    /// Simulates a map whose style has not loaded.
    pub loading: bool,
}

#[cfg(test)]
impl MapSurface for MemorySurface {
    fn is_ready(&self) -> bool {
        !self.loading
    }

    fn clear_markers(&mut self) -> DeskResult<()> {
        self.markers.clear();
        Ok(())
    }

    fn layer_ids(&self) -> Vec<String> {
        self.foreign_layers
            .iter()
            .cloned()
            .chain(self.layers.iter().map(|l| l.id.clone()))
            .collect()
    }

    fn remove_layer(&mut self, id: &str) -> DeskResult<()> {
        self.layers.retain(|l| l.id != id);
        self.foreign_layers.retain(|l| l != id);
        Ok(())
    }

    fn add_marker(&mut self, marker: &Marker) -> DeskResult<()> {
        self.markers.push(marker.clone());
        Ok(())
    }

    fn add_line(&mut self, line: &LineLayer) -> DeskResult<()> {
        self.layers.push(line.clone());
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: u32) -> DeskResult<()> {
        self.fitted = Some((bounds, padding));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;
    use routedesk_shared::{RouteDetail, VehicleRoute};

    fn target() -> MapTarget<MemorySurface> {
        MapTarget::new(MemorySurface::default(), &MapSettings::default())
    }

    #[test]
    fn test_draws_markers_lines_and_fits() {
        let plan = RoutePlan::build(&fixtures::two_vans()).unwrap();
        let mut target = target();
        let rendered = target.render(&plan).unwrap();

        // depot + 2 customers + 2 stations
        assert_eq!(rendered, Rendered::Map { markers: 5, lines: 2 });
        let surface = target.surface();
        assert_eq!(surface.markers[0].color, "#ff6b6b");
        assert_eq!(surface.markers[1].kind, MarkerKind::Customer);
        assert_eq!(surface.markers[1].color, "#4ecdc4");
        assert_eq!(surface.markers[2].kind, MarkerKind::Station(StationKind::Fuel));
        assert_eq!(surface.markers[3].kind, MarkerKind::Station(StationKind::Repair));

        let ids: Vec<_> = surface.layers.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["route-0", "route-1"]);
        assert_eq!(surface.layers[1].color, "#96ceb4");
        assert_eq!(surface.layers[0].width, 3.0);
        assert_eq!(surface.layers[0].opacity, 0.8);
        assert_eq!(surface.layers[0].coordinates.len(), 3);
        assert_eq!(surface.fitted.unwrap().1, 50);
    }

    #[test]
    fn test_customer_popup() {
        let plan = RoutePlan::build(&fixtures::two_vans()).unwrap();
        let mut target = target();
        target.render(&plan).unwrap();

        let popup = &target.surface().markers[1].popup;
        assert_eq!(popup.title, "Customer");
        assert!(popup.rows.contains(&("Vehicle".into(), "V1".into())));
        assert!(popup.rows.contains(&("Location".into(), "51.5200, -0.1000".into())));
        assert!(popup.rows.contains(&("Weight".into(), "12.5 kg".into())));
        assert!(popup.rows.contains(&("Time Window".into(), "08:00–12:00".into())));
    }

    #[test]
    fn test_redraw_is_idempotent_and_keeps_foreign_layers() {
        let plan = RoutePlan::build(&fixtures::two_vans()).unwrap();
        let mut target = target();
        target.surface.foreign_layers.push("road-label".into());

        target.render(&plan).unwrap();
        let markers = target.surface().markers.len();
        let layers = target.surface().layers.len();
        target.render(&plan).unwrap();

        assert_eq!(target.surface().markers.len(), markers);
        assert_eq!(target.surface().layers.len(), layers);
        assert_eq!(target.surface().foreign_layers, vec!["road-label".to_string()]);
    }

    #[test]
    fn test_rendering_fewer_routes_removes_stale_lines() {
        let mut target = target();
        target
            .render(&RoutePlan::build(&fixtures::two_vans()).unwrap())
            .unwrap();

        let mut detail = fixtures::two_vans();
        if let Some(routes) = detail.refined_routes.as_mut() {
            routes.truncate(1);
        }
        target.render(&RoutePlan::build(&detail).unwrap()).unwrap();
        assert_eq!(target.surface().layers.len(), 1);
    }

    #[test]
    fn test_empty_sequence_draws_nothing() {
        let detail = RouteDetail {
            refined_routes: Some(vec![VehicleRoute::default()]),
            ..Default::default()
        };
        let mut target = target();
        let rendered = target.render(&RoutePlan::build(&detail).unwrap()).unwrap();
        assert_eq!(rendered, Rendered::Map { markers: 0, lines: 0 });
        assert!(target.surface().fitted.is_none());
    }

    #[test]
    fn test_popup_html_is_escaped() {
        let popup = Popup::new("A&B <shop>").row("Address", "1 \"High\" St");
        assert_eq!(
            popup.to_html(),
            "<div><h3>A&amp;B &lt;shop&gt;</h3><p><strong>Address:</strong> 1 &quot;High&quot; St</p></div>"
        );
    }
}
