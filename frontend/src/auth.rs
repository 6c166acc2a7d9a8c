//! Auth context.
//!
//! Holds the explicit `Session` and the API client in a signal shared through
//! Leptos context. The router only sees the derived `is_authenticated`
//! signal. Sessions live in memory; only the last email is remembered.

use crate::web::FetchClient;
use crate::web::LocalStorage;
use leptos::prelude::*;
use routedesk::{DeskApi, DeskConfig, DeskResult, Session};
use routedesk_shared::User;

const STORAGE_EMAIL_KEY: &str = "routedesk_email";

pub type Api = DeskApi<FetchClient>;

#[derive(Clone)]
pub struct AuthState {
    pub session: Session,
    /// Unauthenticated client; use [`AuthContext::api`] for calls.
    base_api: Api,
    /// Prefill for the login form.
    pub last_email: String,
}

#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new(config: &DeskConfig) -> Self {
        let (state, set_state) = signal(AuthState {
            session: Session::new(),
            base_api: DeskApi::new(&config.api_base_url, FetchClient),
            last_email: LocalStorage::get(STORAGE_EMAIL_KEY).unwrap_or_default(),
        });
        Self { state, set_state }
    }

    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.session.is_authenticated()))
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.session.user().cloned())
    }

    /// Client carrying the current session's credentials.
    pub fn api(&self) -> Api {
        self.state
            .with_untracked(|s| s.session.authorize(&s.base_api))
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

fn snapshot(ctx: &AuthContext) -> (Session, Api) {
    ctx.state
        .with_untracked(|s| (s.session.clone(), s.base_api.clone()))
}

fn install(ctx: &AuthContext, session: Session, email: &str) {
    LocalStorage::set(STORAGE_EMAIL_KEY, email);
    ctx.set_state.update(|state| {
        state.session = session;
        state.last_email = email.to_string();
    });
}

pub async fn login(ctx: &AuthContext, email: String, password: String) -> DeskResult<()> {
    let (mut session, api) = snapshot(ctx);
    session.login(&api, &email, &password).await?;
    install(ctx, session, &email);
    Ok(())
}

pub async fn signup(
    ctx: &AuthContext,
    email: String,
    password: String,
    warehouse: String,
    phone: String,
) -> DeskResult<()> {
    let (mut session, api) = snapshot(ctx);
    session
        .signup(&api, &email, &password, Some(&warehouse), Some(&phone))
        .await?;
    install(ctx, session, &email);
    Ok(())
}

/// Always ends the local session; the router then leaves protected pages.
pub async fn logout(ctx: &AuthContext) {
    let (mut session, api) = snapshot(ctx);
    if let Err(e) = session.logout(&api).await {
        log::warn!("{}", e);
    }
    ctx.set_state.update(|state| state.session = session);
}
