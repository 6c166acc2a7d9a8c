use super::map::location;
use super::{PlannedRoute, PlannedStation, PlannedStop, RenderTarget, Rendered, RoutePlan, StopRole};
use crate::error::DeskResult;
use routedesk_shared::StationKind;

/// One block of the text listing: the depot, or one route.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub title: String,
    /// Route colour, `None` for the depot block.
    pub color: Option<&'static str>,
    pub facts: Vec<String>,
    pub stops: Vec<TextStop>,
}

/// One stop line plus the support stations listed beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStop {
    pub line: String,
    pub stations: Vec<String>,
}

/// Fallback used when no map is available.
#[derive(Debug, Default)]
pub struct TextTarget {
    last: Vec<TextBlock>,
}

impl TextTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.last
    }
}

fn depot_block(depot: &PlannedStop) -> TextBlock {
    TextBlock {
        title: format!("Depot: {}", depot.id),
        color: None,
        facts: vec![format!("Location: {}", location(depot.position))],
        stops: Vec::new(),
    }
}

fn station_line(station: &PlannedStation) -> String {
    let mut line = format!("{} ({})", station.name, station.kind.label());
    if let Some(address) = &station.address {
        line.push_str(&format!(", {}", address));
    }
    if let Some(distance) = station.distance_km {
        line.push_str(&format!(", {} km away", distance));
    }
    line
}

fn stop_entry(stop: &PlannedStop) -> TextStop {
    let mut line = match stop.role {
        StopRole::Depot => format!("{} (depot)", stop.id),
        StopRole::Customer => stop.id.clone(),
    };
    line.push_str(&format!(" @ {}", location(stop.position)));
    if let Some(weight) = stop.weight {
        line.push_str(&format!(" ({} kg)", weight));
    }
    if let Some(window) = &stop.time_window {
        line.push_str(&format!(" [{}]", window));
    }
    let fuel = stop.station_count(StationKind::Fuel);
    if fuel > 0 {
        line.push_str(&format!(" - {} fuel stations nearby", fuel));
    }
    let repair = stop.station_count(StationKind::Repair);
    if repair > 0 {
        line.push_str(&format!(" - {} repair shops nearby", repair));
    }
    TextStop {
        line,
        stations: stop.stations.iter().map(station_line).collect(),
    }
}

fn route_block(route: &PlannedRoute) -> TextBlock {
    let mut facts = Vec::new();
    if let Some(km) = route.distance_km {
        facts.push(format!("Distance: {} km", km));
    }
    if let Some(mins) = route.traffic_mins {
        facts.push(format!("Traffic Time: {} min", mins));
    }
    if let Some(mins) = route.normal_mins {
        facts.push(format!("Normal Time: {} min", mins));
    }
    TextBlock {
        title: route.label.clone(),
        color: Some(route.color),
        facts,
        stops: route.stops.iter().map(stop_entry).collect(),
    }
}

impl RenderTarget for TextTarget {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&mut self, plan: &RoutePlan) -> DeskResult<Rendered> {
        let blocks: Vec<TextBlock> = plan
            .depot
            .iter()
            .map(depot_block)
            .chain(plan.routes.iter().map(route_block))
            .collect();
        self.last = blocks.clone();
        Ok(Rendered::Text(blocks))
    }
}
