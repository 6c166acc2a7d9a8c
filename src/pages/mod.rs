//! Page controllers.
//!
//! Each page keeps plain, cloneable state plus `begin_*` / `finish_*`
//! transitions so a UI can update its signal before and after awaiting the
//! API, and an `async` convenience method that runs the whole round trip.
//! Whatever resolves last overwrites what is displayed.

pub mod analytics;
pub mod orders;
pub mod routes;
pub mod situations;

use std::time::Duration;

const SUCCESS_NOTICE_LIFETIME: Duration = Duration::from_secs(3);

/// Page-level banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    pub fn css_class(&self) -> &'static str {
        if self.is_error { "message error" } else { "message success" }
    }

    /// How long the banner stays up; `None` keeps it until it is replaced.
    pub fn lifetime(&self) -> Option<Duration> {
        if self.is_error { None } else { Some(SUCCESS_NOTICE_LIFETIME) }
    }
}
