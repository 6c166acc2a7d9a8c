//! RouteDesk web client.
//!
//! - `web::route`: page enumeration and path mapping
//! - `web::router`: history-backed router with the auth guard
//! - `auth`: session context
//! - `components`: pages and shared layout
//!
//! Page state and rendering decisions live in the `routedesk` crate; the
//! components here only bind them to signals and the DOM.

mod auth;
mod components {
    pub mod analytics;
    pub mod dashboard;
    pub mod layout;
    pub mod login;
    pub mod orders;
    pub mod route_viewer;
    pub mod routes;
    pub mod situations;
}

use crate::auth::AuthContext;
use crate::components::analytics::AnalyticsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::orders::OrdersPage;
use crate::components::routes::RoutesPage;
use crate::components::situations::SituationsPage;

use leptos::prelude::*;
use routedesk::DeskConfig;

// Thin wrappers over browser APIs.
pub(crate) mod web {
    mod http;
    mod mapbox;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchClient;
    pub use mapbox::MapboxSurface;
    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Orders => view! { <OrdersPage /> }.into_any(),
        AppRoute::Routes => view! { <RoutesPage /> }.into_any(),
        AppRoute::Situations => view! { <SituationsPage /> }.into_any(),
        AppRoute::Analytics => view! { <AnalyticsPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = DeskConfig::from_env();
    log::info!(
        "RouteDesk starting: api={} map={}",
        config.api_base_url,
        config.has_map()
    );
    provide_context(config.clone());

    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx);
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
