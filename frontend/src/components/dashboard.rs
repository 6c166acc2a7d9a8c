use crate::auth::use_auth;
use crate::components::layout::PageShell;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

fn blurb(route: AppRoute) -> &'static str {
    match route {
        AppRoute::Orders => "Turn incoming orders into delivery nodes and review what is pending.",
        AppRoute::Routes => "Solve vehicle routes and inspect trips on the map.",
        AppRoute::Situations => "Ask for help with fuel, fatigue or other on-road issues.",
        AppRoute::Analytics => "Headline figures for the operation.",
        _ => "",
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let email = move || auth.user().map(|u| u.email).unwrap_or_default();

    view! {
        <PageShell title="Dashboard">
            <p class="text-base-content/70">"Welcome, " {email}</p>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                {AppRoute::PAGES
                    .into_iter()
                    .map(|route| {
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body">
                                    <h2 class="card-title">{route.title()}</h2>
                                    <p>{blurb(route)}</p>
                                    <div class="card-actions justify-end">
                                        <Link to=route class="btn btn-primary btn-sm">"Open"</Link>
                                    </div>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </PageShell>
    }
}
