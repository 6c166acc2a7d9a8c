//! Explicit session handle.
//!
//! A `Session` is owned by whoever drives the UI and passed by reference into
//! each page; there is no process-wide user. Nothing is persisted: every page
//! load starts unauthenticated.

use crate::api::DeskApi;
use crate::error::{DeskError, DeskErrorStatus, DeskResult};
use crate::request::HttpClient;
use routedesk_shared::{AuthResponse, LoginRequest, SignupRequest, User};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<User>,
    access_token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// API client carrying this session's bearer token.
    pub fn authorize<C: HttpClient + Clone>(&self, api: &DeskApi<C>) -> DeskApi<C> {
        api.with_bearer(self.access_token())
    }

    fn install(&mut self, auth: AuthResponse) -> &User {
        log::info!("Signed in as {}", auth.user.email);
        self.access_token = auth.access_token;
        self.user.insert(auth.user)
    }

    /// Sign in. On any failure the session is left untouched.
    pub async fn login<C: HttpClient + Clone>(
        &mut self,
        api: &DeskApi<C>,
        email: &str,
        password: &str,
    ) -> DeskResult<&User> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth = api
            .login(&req)
            .await
            .map_err(|e| generic_rejection(e, "Login failed").in_op("session.login"))?;
        Ok(self.install(auth))
    }

    /// Create an account and sign in with it.
    pub async fn signup<C: HttpClient + Clone>(
        &mut self,
        api: &DeskApi<C>,
        email: &str,
        password: &str,
        warehouse: Option<&str>,
        phone: Option<&str>,
    ) -> DeskResult<&User> {
        let req = SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            warehouse: non_blank(warehouse),
            phone: non_blank(phone),
        };
        let auth = api
            .signup(&req)
            .await
            .map_err(|e| generic_rejection(e, "Signup failed").in_op("session.signup"))?;
        Ok(self.install(auth))
    }

    /// Sign out. Local state is cleared whatever the backend says; the
    /// backend outcome is returned for logging only.
    pub async fn logout<C: HttpClient + Clone>(&mut self, api: &DeskApi<C>) -> DeskResult<()> {
        let outcome = self.authorize(api).logout().await;
        self.user = None;
        self.access_token = None;
        match outcome {
            Ok(_) => {
                log::info!("Signed out");
                Ok(())
            }
            Err(e) => {
                log::warn!("Logout call failed, local session cleared anyway: {}", e);
                Err(e.in_op("session.logout"))
            }
        }
    }
}

/// A rejection without server text becomes the generic failure message.
fn generic_rejection(e: DeskError, generic: &str) -> DeskError {
    if e.status == DeskErrorStatus::Rejected && e.message().trim().is_empty() {
        DeskError::rejected(generic)
    } else {
        e
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MockHttpClient;
    use serde_json::{Value, json};

    const BASE: &str = "http://api.test";

    fn setup() -> (MockHttpClient, DeskApi<MockHttpClient>) {
        let client = MockHttpClient::new();
        (client.clone(), DeskApi::new(BASE, client))
    }

    fn auth_ok() -> Value {
        json!({ "status": "success",
                "user": { "id": "u-1", "email": "ops@depot.test" },
                "access_token": "jwt-1" })
    }

    #[tokio::test]
    async fn test_login_installs_user_and_token() {
        let (client, api) = setup();
        client.mock_response(&format!("{BASE}/api/login"), 200, auth_ok());

        let mut session = Session::new();
        let user = session.login(&api, "ops@depot.test", "pw").await.unwrap();
        assert_eq!(user.id, "u-1");
        assert!(session.is_authenticated());
        assert_eq!(session.access_token(), Some("jwt-1"));
        assert!(session.authorize(&api).has_bearer());
    }

    #[tokio::test]
    async fn test_failed_login_stays_unauthenticated() {
        let (client, api) = setup();
        client.mock_response(
            &format!("{BASE}/api/login"),
            200,
            json!({ "status": "error" }),
        );

        let mut session = Session::new();
        let err = session.login(&api, "ops@depot.test", "bad").await.unwrap_err();
        assert_eq!(err.message(), "Login failed");
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.access_token().is_none());
    }

    #[tokio::test]
    async fn test_signup_sends_optional_profile_fields() {
        let (client, api) = setup();
        client.mock_response(&format!("{BASE}/api/signup"), 201, auth_ok());

        let mut session = Session::new();
        session
            .signup(&api, "ops@depot.test", "pw", Some("W010"), Some("  "))
            .await
            .unwrap();

        let body: Value = serde_json::from_str(client.requests()[0].3.as_ref().unwrap()).unwrap();
        assert_eq!(body["warehouse"], "W010");
        assert!(body.get("phone").is_none());
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_failure_message() {
        let (client, api) = setup();
        client.mock_response(
            &format!("{BASE}/api/signup"),
            400,
            json!({ "status": "error", "message": "Signup failed" }),
        );

        let mut session = Session::new();
        let err = session
            .signup(&api, "dup@depot.test", "pw", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Signup failed"), "Signup failed");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let (client, api) = setup();
        client.mock_response(&format!("{BASE}/api/login"), 200, auth_ok());
        client.mock_unreachable(&format!("{BASE}/api/logout"));

        let mut session = Session::new();
        session.login(&api, "ops@depot.test", "pw").await.unwrap();
        assert!(session.logout(&api).await.is_err());
        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
    }

    #[tokio::test]
    async fn test_logout_success() {
        let (client, api) = setup();
        client.mock_response(&format!("{BASE}/api/login"), 200, auth_ok());
        client.mock_response(
            &format!("{BASE}/api/logout"),
            200,
            json!({ "status": "success", "message": "Logged out" }),
        );

        let mut session = Session::new();
        session.login(&api, "ops@depot.test", "pw").await.unwrap();
        session.logout(&api).await.unwrap();
        assert_eq!(session, Session::new());

        let (_, _, headers, _) = &client.requests()[1];
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer jwt-1");
    }
}
