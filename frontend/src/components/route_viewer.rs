use crate::web::MapboxSurface;
use leptos::html::Div;
use leptos::prelude::*;
use routedesk::DeskConfig;
use routedesk::render::{
    INVALID_ROUTE_DATA, RenderTarget, Rendered, RouteSummary, TextBlock, render_detail,
    select_target,
};
use routedesk_shared::RouteRecord;
use std::cell::RefCell;
use std::rc::Rc;

/// Draws the selected trip. The render target is chosen on first mount and
/// reused for every later trip.
#[component]
pub fn RouteViewer(record: Signal<Option<RouteRecord>>) -> impl IntoView {
    let config = use_context::<DeskConfig>().unwrap_or_default();
    let container = NodeRef::<Div>::new();
    let target: Rc<RefCell<Option<Box<dyn RenderTarget>>>> = Rc::new(RefCell::new(None));

    let (map_mode, set_map_mode) = signal(config.has_map());
    let (blocks, set_blocks) = signal(Vec::<TextBlock>::new());
    let (error, set_error) = signal(Option::<String>::None);
    // Flips once the map style has loaded so a deferred draw is retried.
    let (ready, set_ready) = signal(false);

    Effect::new(move |_| {
        let record = record.get();
        ready.track();
        let Some(element) = container.get() else {
            return;
        };

        let mut slot = target.borrow_mut();
        let target = slot.get_or_insert_with(|| {
            let surface = MapboxSurface::mount(
                &element,
                config.mapbox_access_token.as_deref(),
                &config.map,
            );
            if let Some(map) = &surface {
                map.when_loaded(move || {
                    let _ = set_ready.try_set(true);
                });
            }
            let chosen = select_target(surface, &config.map);
            set_map_mode.set(chosen.name() == "map");
            chosen
        });

        let Some(record) = record else {
            return;
        };
        match render_detail(&mut **target, &record.route_detail) {
            Ok(Rendered::Text(text)) => {
                set_blocks.set(text);
                set_error.set(None);
            }
            Ok(Rendered::Map { .. }) => set_error.set(None),
            Ok(Rendered::Deferred) => {}
            Err(e) => {
                log::warn!("Route render failed: {}", e);
                set_error.set(Some(e.user_message(INVALID_ROUTE_DATA)));
            }
        }
    });

    let summary = move || record.with(|r| r.as_ref().map(RouteSummary::from_record));

    view! {
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-4">
            <div class="lg:col-span-2 card bg-base-100 shadow-xl overflow-hidden">
                <Show when=move || error.get().is_some()>
                    <div role="alert" class="alert alert-error error">
                        <span>{move || error.get().unwrap_or_default()}</span>
                    </div>
                </Show>
                <div
                    node_ref=container
                    id="map"
                    class="w-full"
                    style=move || if map_mode.get() { "height: 520px" } else { "display: none" }
                ></div>
                <Show when=move || !map_mode.get()>
                    <div class="p-4 space-y-3 max-h-[520px] overflow-y-auto">
                        <h3 class="font-semibold">"Route Data (text view)"</h3>
                        <For
                            each=move || blocks.get().into_iter().enumerate()
                            key=|(i, block)| (*i, block.title.clone())
                            children=|(_, block)| view! { <TextBlockView block=block /> }
                        />
                    </div>
                </Show>
            </div>
            <div class="space-y-3">
                {move || summary().map(|s| view! { <SummaryPanel summary=s /> })}
            </div>
        </div>
    }
}

#[component]
fn TextBlockView(block: TextBlock) -> impl IntoView {
    let border = block
        .color
        .map(|c| format!("border-left: 4px solid {}", c))
        .unwrap_or_default();
    view! {
        <div class="p-3 bg-base-200 rounded" style=border>
            <h4 class="font-semibold">{block.title}</h4>
            <ul class="text-sm">
                {block.facts.into_iter().map(|f| view! { <li>{f}</li> }).collect_view()}
            </ul>
            <ol class="list-decimal list-inside text-sm mt-2">
                {block
                    .stops
                    .into_iter()
                    .map(|stop| {
                        view! {
                            <li>
                                {stop.line}
                                <ul class="list-disc list-inside ml-6 opacity-70">
                                    {stop.stations.into_iter().map(|s| view! { <li>{s}</li> }).collect_view()}
                                </ul>
                            </li>
                        }
                    })
                    .collect_view()}
            </ol>
        </div>
    }
}

#[component]
fn SummaryPanel(summary: RouteSummary) -> impl IntoView {
    let metric = |label: &'static str, value: Option<String>| {
        value.map(|v| {
            view! {
                <div class="flex justify-between text-sm">
                    <span class="opacity-70">{label}</span>
                    <span>{v}</span>
                </div>
            }
        })
    };

    view! {
        {summary.trip_id.map(|id| view! { <div class="badge badge-outline">"Trip " {id}</div> })}
        {summary
            .routes
            .into_iter()
            .map(|route| {
                view! {
                    <div class="card bg-base-100 shadow p-4 route-info">
                        <h3 class="font-semibold">{route.label}</h3>
                        {metric("Stops", Some(route.stops.to_string()))}
                        {metric("Distance", route.distance_km.map(|d| format!("{} km", d)))}
                        {metric("Traffic Duration", route.traffic_mins.map(|m| format!("{} min", m)))}
                        {metric("Normal Duration", route.normal_mins.map(|m| format!("{} min", m)))}
                    </div>
                }
            })
            .collect_view()}
        {summary.summary.map(|text| {
            view! {
                <div class="card bg-base-100 shadow p-4 route-info">
                    <h3 class="font-semibold">"Trip Summary"</h3>
                    <p class="text-sm">{text}</p>
                </div>
            }
        })}
    }
}
