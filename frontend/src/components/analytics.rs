use crate::components::layout::PageShell;
use leptos::prelude::*;
use routedesk::pages::analytics::AnalyticsSnapshot;

#[component]
pub fn AnalyticsPage() -> impl IntoView {
    let snapshot = AnalyticsSnapshot::placeholder();
    let sample = snapshot.sample;

    view! {
        <PageShell title="Analytics">
            <Show when=move || sample>
                <div role="alert" class="alert alert-info">
                    <span>"Sample data. Figures are illustrative and not read from the backend."</span>
                </div>
            </Show>
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                {snapshot
                    .metrics
                    .into_iter()
                    .map(|m| {
                        view! {
                            <div class="stat metric-card">
                                <div class="stat-title">{m.title}</div>
                                <div class="stat-value">{m.value}</div>
                                <div class=format!("stat-desc {}", m.trend.css_class())>{m.change}</div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">"Recent Activity"</h2>
                        <ul class="space-y-2">
                            {snapshot
                                .activity
                                .into_iter()
                                .map(|a| {
                                    view! {
                                        <li class="flex gap-3">
                                            <span>{a.icon}</span>
                                            <div>
                                                <h4 class="font-semibold">{a.title}</h4>
                                                <p class="text-sm">{a.detail}</p>
                                                <span class="text-xs opacity-60">{a.when}</span>
                                            </div>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">"Insights"</h2>
                        {snapshot
                            .insights
                            .into_iter()
                            .map(|i| {
                                view! {
                                    <div>
                                        <h3 class="font-semibold">{i.title}</h3>
                                        <p class="text-sm">{i.body}</p>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </div>
        </PageShell>
    }
}
