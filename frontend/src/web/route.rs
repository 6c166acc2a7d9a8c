//! Route table.
//!
//! Pure data: no DOM access, so the guard rules are unit-testable.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Login,
    Dashboard,
    Orders,
    Routes,
    Situations,
    Analytics,
    NotFound,
}

impl AppRoute {
    /// Pages reachable from the dashboard, in display order.
    pub const PAGES: [AppRoute; 4] = [
        AppRoute::Orders,
        AppRoute::Routes,
        AppRoute::Situations,
        AppRoute::Analytics,
    ];

    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/orders" => Self::Orders,
            "/routes" => Self::Routes,
            "/situations" => Self::Situations,
            "/analytics" => Self::Analytics,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Dashboard => "/dashboard",
            Self::Orders => "/orders",
            Self::Routes => "/routes",
            Self::Situations => "/situations",
            Self::Analytics => "/analytics",
            Self::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Dashboard => "Dashboard",
            Self::Orders => "Order Management",
            Self::Routes => "Route Optimization",
            Self::Situations => "Situation Management",
            Self::Analytics => "Analytics",
            Self::NotFound => "Not found",
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// Signed-in users skip the login page.
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip_for_pages() {
        for route in AppRoute::PAGES {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/orders/"), AppRoute::Orders);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_guards() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(AppRoute::PAGES.iter().all(AppRoute::requires_auth));
    }
}
