//! RouteDesk core.
//!
//! Everything the dashboard does that does not touch the DOM: the typed API
//! client over an abstract [`HttpClient`], the explicit [`Session`], one
//! controller per page and the route visualisation pipeline. The browser
//! crate supplies a fetch transport and a map surface and renders the state
//! these types hold.

pub mod api;
pub mod config;
pub mod error;
pub mod pages;
pub mod render;
pub mod request;
pub mod session;

pub use api::DeskApi;
pub use config::{DeskConfig, MapSettings};
pub use error::{DeskError, DeskErrorStatus, DeskResult};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use session::Session;

#[cfg(test)]
mod live_tests {
    use super::*;
    use crate::request::ReqwestHttpClient;

    /// Runs against a real backend: `ROUTEDESK_LIVE_URL=http://localhost:5000 cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_live_login_and_pending_nodes() {
        let Ok(base) = std::env::var("ROUTEDESK_LIVE_URL") else {
            return;
        };
        let email = std::env::var("ROUTEDESK_LIVE_EMAIL").unwrap_or_default();
        let password = std::env::var("ROUTEDESK_LIVE_PASSWORD").unwrap_or_default();

        let api = DeskApi::new(&base, ReqwestHttpClient::new());
        let mut session = Session::new();
        session.login(&api, &email, &password).await.unwrap();

        let nodes = session.authorize(&api).pending_nodes().await.unwrap();
        println!("{} pending nodes", nodes.len());

        session.logout(&api).await.unwrap();
        assert!(!session.is_authenticated());
    }
}
