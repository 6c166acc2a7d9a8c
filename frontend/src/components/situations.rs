use crate::auth::use_auth;
use crate::components::layout::{ErrorBanner, PageShell};
use leptos::prelude::*;
use leptos::task::spawn_local;
use routedesk::pages::situations::SituationsPage as SituationsState;
use routedesk_shared::{ChatRole, SituationKind};

#[component]
pub fn SituationsPage() -> impl IntoView {
    let auth = use_auth();
    let page = RwSignal::new(SituationsState::default());

    let submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(req) = page.try_update(|p| p.begin()).flatten() else {
            return;
        };
        let api = auth.api();
        let (kind, trip) = page.with_untracked(|p| (p.kind, p.trip().map(str::to_string)));
        spawn_local(async move {
            let result = api.situation(kind, trip.as_deref(), req).await;
            page.update(|p| p.finish(result));
        });
    };

    let loading = move || page.with(|p| p.loading);
    let incomplete = move || page.with(|p| p.request().is_none());
    let error = Signal::derive(move || page.with(|p| p.error.clone()));

    view! {
        <PageShell title="Situation Management">
            <div class="card bg-base-100 shadow-xl">
                <form class="card-body" on:submit=submit>
                    <div class="join">
                        {SituationKind::ALL
                            .into_iter()
                            .map(|kind| {
                                view! {
                                    <button
                                        type="button"
                                        class=move || {
                                            if page.with(|p| p.kind == kind) {
                                                "btn join-item btn-primary"
                                            } else {
                                                "btn join-item"
                                            }
                                        }
                                        on:click=move |_| page.update(|p| p.kind = kind)
                                    >
                                        {kind.label()}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <input
                            type="text"
                            placeholder="Vehicle ID (e.g. V2)"
                            class="input input-bordered"
                            prop:value=move || page.with(|p| p.vehicle_id.clone())
                            on:input=move |ev| {
                                let raw = event_target_value(&ev);
                                page.update(|p| p.vehicle_id = raw);
                            }
                        />
                        <input
                            type="text"
                            placeholder="Near customer (e.g. C079)"
                            class="input input-bordered"
                            prop:value=move || page.with(|p| p.near_customer.clone())
                            on:input=move |ev| {
                                let raw = event_target_value(&ev);
                                page.update(|p| p.near_customer = raw);
                            }
                        />
                        <input
                            type="text"
                            placeholder="Trip ID (optional)"
                            class="input input-bordered"
                            prop:value=move || page.with(|p| p.trip_id.clone())
                            on:input=move |ev| {
                                let raw = event_target_value(&ev);
                                page.update(|p| p.trip_id = raw);
                            }
                        />
                    </div>
                    <textarea
                        class="textarea textarea-bordered"
                        placeholder="Describe the situation (optional)"
                        prop:value=move || page.with(|p| p.note.clone())
                        on:input=move |ev| {
                            let raw = event_target_value(&ev);
                            page.update(|p| p.note = raw);
                        }
                    ></textarea>
                    <div class="card-actions justify-end">
                        <button type="button" class="btn btn-ghost" on:click=move |_| page.update(|p| p.clear())>
                            "Clear"
                        </button>
                        <button class="btn btn-primary" disabled=move || loading() || incomplete()>
                            {move || if loading() { "Getting recommendation..." } else { "Get Recommendation" }}
                        </button>
                    </div>
                </form>
            </div>

            <ErrorBanner error=error />
            {move || {
                page.with(|p| p.conversation.clone()).map(|conversation| {
                    view! {
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <h2 class="card-title">{conversation.kind.label()} " conversation"</h2>
                                {conversation
                                    .messages
                                    .into_iter()
                                    .map(|message| {
                                        let (side, who) = match message.role {
                                            ChatRole::User => ("chat chat-end", "You"),
                                            ChatRole::Assistant => ("chat chat-start", "Assistant"),
                                        };
                                        view! {
                                            <div class=side>
                                                <div class="chat-header">{who}</div>
                                                <div class="chat-bubble whitespace-pre-wrap">{message.content}</div>
                                            </div>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        </div>
                    }
                })
            }}
        </PageShell>
    }
}
