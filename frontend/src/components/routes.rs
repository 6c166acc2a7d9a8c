use crate::auth::use_auth;
use crate::components::layout::{ErrorBanner, PageShell};
use crate::components::route_viewer::RouteViewer;
use leptos::prelude::*;
use leptos::task::spawn_local;
use routedesk::pages::routes::{RoutesPage as RoutesState, VEHICLE_WIDGET_RANGE, parse_count};

#[component]
pub fn RoutesPage() -> impl IntoView {
    let auth = use_auth();
    let page = RwSignal::new(RoutesState::default());

    let solve = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = auth.api();
        let Some(req) = page.try_update(|p| p.begin_solve()) else {
            return;
        };
        spawn_local(async move {
            let result = api.solve(&req).await;
            let follow_up = page.try_update(|p| p.finish_solve(result)).flatten();
            if let Some(trip_id) = follow_up {
                page.update(|p| p.begin_load());
                let record = api.route(&trip_id).await;
                page.update(|p| p.finish_load(record));
            }
        });
    };

    let load_latest = move |_| {
        let api = auth.api();
        page.update(|p| p.begin_load());
        spawn_local(async move {
            let result = api.latest_route().await;
            page.update(|p| p.finish_load(result));
        });
    };

    let load_trip = move |trip_id: String| {
        let api = auth.api();
        page.update(|p| p.begin_load());
        spawn_local(async move {
            let result = api.route(&trip_id).await;
            page.update(|p| p.finish_load(result));
        });
    };

    let load_trips = move || {
        let api = auth.api();
        page.update(|p| p.begin_load());
        spawn_local(async move {
            let result = api.trip_ids().await;
            page.update(|p| p.finish_trips(result));
        });
    };

    load_trips();

    let loading = move || page.with(|p| p.loading);
    let error = Signal::derive(move || page.with(|p| p.error.clone()));
    let record = Signal::derive(move || page.with(|p| p.record.clone()));
    let (min_vehicles, max_vehicles) = VEHICLE_WIDGET_RANGE;

    view! {
        <PageShell title="Route Optimization">
            <div class="card bg-base-100 shadow-xl">
                <form class="card-body" on:submit=solve>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="num-vehicles">
                                <span class="label-text">"Number of vehicles"</span>
                            </label>
                            <input
                                id="num-vehicles"
                                type="number"
                                min=min_vehicles.to_string()
                                max=max_vehicles.to_string()
                                class="input input-bordered"
                                prop:value=move || page.with(|p| p.form.num_vehicles.to_string())
                                on:input=move |ev| {
                                    let raw = event_target_value(&ev);
                                    page.update(|p| p.form.num_vehicles = parse_count(&raw, p.form.num_vehicles));
                                }
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="vehicle-capacity">
                                <span class="label-text">"Vehicle capacity (kg)"</span>
                            </label>
                            <input
                                id="vehicle-capacity"
                                type="number"
                                min="1"
                                class="input input-bordered"
                                prop:value=move || page.with(|p| p.form.vehicle_capacity.to_string())
                                on:input=move |ev| {
                                    let raw = event_target_value(&ev);
                                    page.update(|p| p.form.vehicle_capacity = parse_count(&raw, p.form.vehicle_capacity));
                                }
                            />
                        </div>
                    </div>
                    <div class="form-control">
                        <label class="label" for="preferences">
                            <span class="label-text">"Preferences"</span>
                        </label>
                        <textarea
                            id="preferences"
                            class="textarea textarea-bordered"
                            placeholder="e.g. avoid high traffic areas, prioritise morning deliveries"
                            prop:value=move || page.with(|p| p.form.preferences.clone())
                            on:input=move |ev| {
                                let raw = event_target_value(&ev);
                                page.update(|p| p.form.preferences = raw);
                            }
                        ></textarea>
                    </div>
                    <div class="card-actions justify-end">
                        <button type="button" class="btn btn-outline" on:click=load_latest disabled=loading>
                            "Load Latest Route"
                        </button>
                        <button class="btn btn-primary" disabled=loading>
                            {move || if loading() { "Optimizing..." } else { "Optimize Routes" }}
                        </button>
                    </div>
                </form>
            </div>

            <ErrorBanner error=error />
            {move || {
                page.with(|p| p.result.clone()).map(|outcome| {
                    view! {
                        <div class="alert alert-success result">
                            <div>
                                <h3 class="font-semibold">"Routes optimized"</h3>
                                <p><strong>"Trip ID: "</strong>{outcome.trip_id}</p>
                                <p>{outcome.message}</p>
                            </div>
                        </div>
                    }
                })
            }}

            <Show when=move || page.with(|p| !p.trips.is_empty())>
                <div class="flex flex-wrap gap-2 items-center">
                    <span class="text-sm opacity-70">"Previous trips:"</span>
                    <For
                        each=move || page.with(|p| p.trips.clone())
                        key=|trip| trip.trip_id.clone()
                        children=move |trip| {
                            let id = trip.trip_id.clone();
                            let when = trip
                                .created_at
                                .map(|t| t.format(" (%Y-%m-%d %H:%M)").to_string())
                                .unwrap_or_default();
                            view! {
                                <button class="btn btn-xs btn-outline" on:click=move |_| load_trip(id.clone())>
                                    {trip.trip_id} {when}
                                </button>
                            }
                        }
                    />
                </div>
            </Show>

            <RouteViewer record=record />
        </PageShell>
    }
}
