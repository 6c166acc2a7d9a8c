use crate::auth::use_auth;
use crate::components::layout::{NoticeBanner, PageShell};
use leptos::prelude::*;
use leptos::task::spawn_local;
use routedesk::pages::orders::{NodeCard, OrdersPage as OrdersState};

#[component]
pub fn OrdersPage() -> impl IntoView {
    let auth = use_auth();
    let page = RwSignal::new(OrdersState::default());

    let load = move || {
        let api = auth.api();
        page.update(|p| p.begin());
        spawn_local(async move {
            let result = api.pending_nodes().await;
            page.update(|p| p.finish_load(result));
        });
    };

    let extract = move |_| {
        let api = auth.api();
        page.update(|p| p.begin());
        spawn_local(async move {
            let result = api.extract_orders().await;
            if page.try_update(|p| p.finish_extract(result)).unwrap_or(false) {
                let nodes = api.pending_nodes().await;
                page.update(|p| p.finish_load(nodes));
            }
        });
    };

    let reset = move |_| {
        let api = auth.api();
        page.update(|p| p.begin());
        spawn_local(async move {
            let result = api.reset_nodes().await;
            if page.try_update(|p| p.finish_reset(result)).unwrap_or(false) {
                let nodes = api.pending_nodes().await;
                page.update(|p| p.finish_load(nodes));
            }
        });
    };

    load();

    let notice = Signal::derive(move || page.with(|p| p.notice.clone()));
    Effect::new(move |_| {
        let Some(shown) = notice.get() else {
            return;
        };
        if let Some(lifetime) = shown.lifetime() {
            set_timeout(
                move || {
                    page.update(|p| {
                        if p.notice.as_ref() == Some(&shown) {
                            p.notice = None;
                        }
                    })
                },
                lifetime,
            );
        }
    });

    let loading = move || page.with(|p| p.loading);
    let cards = move || page.with(|p| p.cards());

    view! {
        <PageShell title="Order Management">
            <NoticeBanner notice=notice />
            <div class="flex gap-2">
                <button class="btn btn-primary" on:click=extract disabled=loading>
                    "Extract Orders to Nodes"
                </button>
                <button class="btn btn-outline" on:click=move |_| load() disabled=loading>
                    "Refresh"
                </button>
                <button class="btn btn-outline btn-warning" on:click=reset disabled=loading>
                    "Reset Pending Nodes"
                </button>
            </div>

            <h2 class="text-xl font-semibold">
                "Pending Nodes (" {move || page.with(|p| p.nodes.len())} ")"
            </h2>
            <Show when=loading>
                <span class="loading loading-spinner loading-md"></span>
            </Show>
            <Show when=move || !loading() && page.with(|p| p.nodes.is_empty())>
                <p class="text-base-content/50">"No pending nodes. Extract orders to get started."</p>
            </Show>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <For each=cards key=|card| card.node_id children=move |card: NodeCard| view! { <NodeCardView card=card /> } />
            </div>
        </PageShell>
    }
}

#[component]
fn NodeCardView(card: NodeCard) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow node-card">
            <div class="card-body p-4 text-sm">
                <div class="flex justify-between items-center">
                    <h3 class="card-title text-base">{card.title}</h3>
                    <span class=card.traffic_class>{card.traffic_level}</span>
                </div>
                <p><strong>"Order: "</strong>{card.order}</p>
                <p><strong>"Customer: "</strong>{card.customer}</p>
                <p><strong>"Location: "</strong>{card.location}</p>
                <p><strong>"Weight: "</strong>{card.weight}</p>
                <p><strong>"Delivery window: "</strong>{card.delivery_window}</p>
                <p><strong>"Region: "</strong>{card.region}</p>
            </div>
        </div>
    }
}
