//! Process-wide authentication state with an explicit lifecycle.
//!
//! The store is constructed once at startup (hydrating from durable
//! storage), handed to every consumer, and mutated only through the
//! defined transitions: login/signup, logout, and 401 expiry. Each
//! transition assigns the whole state tuple at once, and always updates
//! durable storage and the navigation cookie together — the route-gating
//! layer reads the cookie, so letting the two drift would make the client
//! and the gate disagree about who is logged in.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Mutex;
use std::sync::Arc;

use crate::client::{Doctor, HttpClient, LoginPayload, SignupPayload};
use crate::error::CliError;
use crate::notify::Notifier;
use crate::storage::{CookieSink, SessionStorage, TOKEN_KEY, USER_KEY};

/// Public landing route; unauthenticated users are sent here.
pub const LANDING_ROUTE: &str = "/";
/// Protected area entry point after a successful login/signup.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Navigation side-effect seam. The web front end routes with a browser
/// router; the CLI records the route and lets the menu loop follow it.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Terminal stand-in for the router: remembers the current route.
pub struct CliNavigator {
    current: Mutex<String>,
}

impl CliNavigator {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(LANDING_ROUTE.to_string()),
        }
    }

    pub fn current_route(&self) -> String {
        self.current.lock().unwrap().clone()
    }
}

impl Default for CliNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for CliNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(target: "medthing_cli::session", %route, "Navigating");
        *self.current.lock().unwrap() = route.to_string();
    }
}

/// The session tuple. Invariant: `token` is present iff `user` is.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<Doctor>,
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct SessionStore {
    state: Mutex<Session>,
    storage: Arc<dyn SessionStorage>,
    cookies: Arc<dyn CookieSink>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl SessionStore {
    /// Builds the store, hydrating from durable storage. Requires both the
    /// token and a parseable user record; anything less (partial writes,
    /// corrupt JSON) is discarded from every persistence mechanism and the
    /// store starts Unauthenticated.
    pub fn restore(
        storage: Arc<dyn SessionStorage>,
        cookies: Arc<dyn CookieSink>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let state = match (storage.get(TOKEN_KEY), storage.get(USER_KEY)) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<Doctor>(&raw_user) {
                Ok(user) => {
                    tracing::info!(target: "medthing_cli::session", email = %user.email, "Restored session from durable storage");
                    Session {
                        user: Some(user),
                        token: Some(token),
                        loading: false,
                        error: None,
                    }
                }
                Err(err) => {
                    tracing::warn!(target: "medthing_cli::session", error = %err, "Discarding malformed stored session");
                    storage.remove(TOKEN_KEY);
                    storage.remove(USER_KEY);
                    cookies.clear_token();
                    Session::default()
                }
            },
            (None, None) => Session::default(),
            _ => {
                tracing::warn!(target: "medthing_cli::session", "Discarding partial stored session");
                storage.remove(TOKEN_KEY);
                storage.remove(USER_KEY);
                cookies.clear_token();
                Session::default()
            }
        };
        Self {
            state: Mutex::new(state),
            storage,
            cookies,
            navigator,
            notifier,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    pub fn current_user(&self) -> Option<Doctor> {
        self.state.lock().unwrap().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }

    fn set_state(&self, session: Session) {
        *self.state.lock().unwrap() = session;
    }

    /// Authenticates against the backend. Empty credentials fail locally
    /// without touching the network, leaving the store Unauthenticated
    /// with a validation message.
    pub async fn login<C: HttpClient + ?Sized>(
        &self,
        client: &C,
        email: &str,
        password: SecretString,
    ) -> Result<Doctor, CliError> {
        if email.trim().is_empty() || password.expose_secret().is_empty() {
            return self.reject_locally("Email and password are required");
        }
        self.set_state(Session {
            user: None,
            token: None,
            loading: true,
            error: None,
        });

        let payload = LoginPayload {
            email: email.trim().to_string(),
            password,
        };
        match client.login(&payload).await {
            Ok(auth) => {
                let user = auth.user.clone();
                self.establish(auth.token, auth.user, "Login successful");
                Ok(user)
            }
            Err(err) => self.reject(err),
        }
    }

    /// Registers a doctor account; same persistence and navigation
    /// behavior as `login`. The backend additionally requires a name.
    pub async fn signup<C: HttpClient + ?Sized>(
        &self,
        client: &C,
        details: SignupPayload,
    ) -> Result<Doctor, CliError> {
        if details.email.trim().is_empty()
            || details.password.expose_secret().is_empty()
            || details.name.trim().is_empty()
        {
            return self.reject_locally("Email, password, and name are required");
        }
        self.set_state(Session {
            user: None,
            token: None,
            loading: true,
            error: None,
        });

        match client.signup(&details).await {
            Ok(auth) => {
                let user = auth.user.clone();
                self.establish(auth.token, auth.user, "Account created successfully");
                Ok(user)
            }
            Err(err) => self.reject(err),
        }
    }

    /// Clears every trace of the session and returns to the landing
    /// route. Never fails: persistence errors are logged by the storage
    /// layer, not propagated.
    pub fn logout(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.cookies.clear_token();
        self.set_state(Session::default());
        self.notifier.success("Logged out successfully");
        self.navigator.navigate(LANDING_ROUTE);
    }

    /// 401 teardown: same clearing as logout, but keeps the server's
    /// message for display and navigates at most once per authenticated
    /// session, however many in-flight calls hit the 401 together.
    pub fn expire(&self, message: &str) {
        let was_authenticated = {
            let mut state = self.state.lock().unwrap();
            let was = state.token.is_some();
            *state = Session {
                user: None,
                token: None,
                loading: false,
                error: Some(message.to_string()),
            };
            was
        };
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.cookies.clear_token();
        if was_authenticated {
            tracing::warn!(target: "medthing_cli::session", %message, "Session expired, returning to landing route");
            self.navigator.navigate(LANDING_ROUTE);
        }
    }

    /// Successful-auth transition: persist to storage and cookie together,
    /// then swap in the full authenticated tuple.
    fn establish(&self, token: String, user: Doctor, note: &str) {
        match serde_json::to_string(&user) {
            Ok(raw_user) => {
                self.storage.set(TOKEN_KEY, &token);
                self.storage.set(USER_KEY, &raw_user);
                self.cookies.set_token(&token);
            }
            Err(err) => {
                // Keep storage and cookie in lockstep even on this
                // unlikely failure: persist neither.
                tracing::error!(target: "medthing_cli::session", error = %err, "Failed to serialize user profile, session will not survive restart");
                self.storage.remove(TOKEN_KEY);
                self.storage.remove(USER_KEY);
                self.cookies.clear_token();
            }
        }
        self.set_state(Session {
            user: Some(user),
            token: Some(token),
            loading: false,
            error: None,
        });
        self.notifier.success(note);
        self.navigator.navigate(DASHBOARD_ROUTE);
    }

    fn reject_locally(&self, message: &str) -> Result<Doctor, CliError> {
        self.set_state(Session {
            user: None,
            token: None,
            loading: false,
            error: Some(message.to_string()),
        });
        Err(CliError::InputError(message.to_string()))
    }

    fn reject(&self, err: CliError) -> Result<Doctor, CliError> {
        let message = surface_message(&err);
        self.set_state(Session {
            user: None,
            token: None,
            loading: false,
            error: Some(message.clone()),
        });
        self.notifier.error(&message);
        Err(err)
    }
}

/// The message worth showing a user for a failed auth call: the server's
/// own words where we have them, the error's display form otherwise.
fn surface_message(err: &CliError) -> String {
    match err {
        CliError::AuthFailed(message)
        | CliError::InputError(message)
        | CliError::Internal(message) => message.clone(),
        CliError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryCookieSink, MemoryStorage};
    use crate::test_support::{RecordingNavigator, RecordingNotifier, UnreachableClient};
    use serde_json::json;
    use uuid::Uuid;

    struct Harness {
        storage: Arc<MemoryStorage>,
        cookies: Arc<MemoryCookieSink>,
        navigator: Arc<RecordingNavigator>,
        notifier: Arc<RecordingNotifier>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                storage: Arc::new(MemoryStorage::new()),
                cookies: Arc::new(MemoryCookieSink::new()),
                navigator: Arc::new(RecordingNavigator::default()),
                notifier: Arc::new(RecordingNotifier::default()),
            }
        }

        fn store(&self) -> SessionStore {
            SessionStore::restore(
                self.storage.clone(),
                self.cookies.clone(),
                self.navigator.clone(),
                self.notifier.clone(),
            )
        }
    }

    fn doctor_json() -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "email": "doc@example.com",
            "name": "Dr. X",
            "specialization": "Cardiology",
            "licenseNumber": "LIC-1"
        })
    }

    #[test]
    fn starts_unauthenticated_with_empty_storage() {
        let harness = Harness::new();
        let store = harness.store();
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
        assert!(store.last_error().is_none());
    }

    #[test]
    fn restores_authenticated_session_from_storage() {
        let harness = Harness::new();
        harness.storage.set(TOKEN_KEY, "abc");
        harness
            .storage
            .set(USER_KEY, &doctor_json().to_string());

        let store = harness.store();
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.current_user().unwrap().email, "doc@example.com");
    }

    #[test]
    fn discards_malformed_stored_user() {
        let harness = Harness::new();
        harness.storage.set(TOKEN_KEY, "abc");
        harness.storage.set(USER_KEY, "{not json");
        harness.cookies.set_token("abc");

        let store = harness.store();
        assert!(!store.is_authenticated());
        assert!(harness.storage.get(TOKEN_KEY).is_none());
        assert!(harness.storage.get(USER_KEY).is_none());
        assert!(harness.cookies.token().is_none());
    }

    #[test]
    fn discards_partial_stored_session() {
        let harness = Harness::new();
        harness.storage.set(TOKEN_KEY, "abc");
        harness.cookies.set_token("abc");

        let store = harness.store();
        assert!(!store.is_authenticated());
        assert!(harness.storage.get(TOKEN_KEY).is_none());
        assert!(harness.cookies.token().is_none());
    }

    #[tokio::test]
    async fn login_with_empty_email_does_not_touch_network() {
        let harness = Harness::new();
        let store = harness.store();

        let result = store
            .login(
                &UnreachableClient,
                "",
                SecretString::new("secret".to_string().into_boxed_str()),
            )
            .await;

        assert!(matches!(result, Err(CliError::InputError(_))));
        assert!(!store.is_authenticated());
        assert_eq!(
            store.last_error().as_deref(),
            Some("Email and password are required")
        );
        assert!(harness.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn login_with_empty_password_does_not_touch_network() {
        let harness = Harness::new();
        let store = harness.store();

        let result = store
            .login(
                &UnreachableClient,
                "doc@example.com",
                SecretString::new(String::new().into_boxed_str()),
            )
            .await;

        assert!(matches!(result, Err(CliError::InputError(_))));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn signup_requires_name() {
        let harness = Harness::new();
        let store = harness.store();

        let details = SignupPayload {
            email: "doc@example.com".to_string(),
            password: SecretString::new("secret123".to_string().into_boxed_str()),
            name: "  ".to_string(),
            specialization: "Cardiology".to_string(),
            license_number: "LIC-1".to_string(),
        };
        let result = store.signup(&UnreachableClient, details).await;

        assert!(matches!(result, Err(CliError::InputError(_))));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn logout_clears_storage_and_cookie_together() {
        let harness = Harness::new();
        harness.storage.set(TOKEN_KEY, "abc");
        harness
            .storage
            .set(USER_KEY, &doctor_json().to_string());
        harness.cookies.set_token("abc");

        let store = harness.store();
        assert!(store.is_authenticated());

        store.logout();
        assert!(!store.is_authenticated());
        assert!(harness.storage.get(TOKEN_KEY).is_none());
        assert!(harness.storage.get(USER_KEY).is_none());
        assert!(harness.cookies.token().is_none());
        assert_eq!(harness.navigator.routes(), vec![LANDING_ROUTE.to_string()]);
    }

    #[test]
    fn expire_redirects_exactly_once() {
        let harness = Harness::new();
        harness.storage.set(TOKEN_KEY, "abc");
        harness
            .storage
            .set(USER_KEY, &doctor_json().to_string());
        harness.cookies.set_token("abc");

        let store = harness.store();
        store.expire("Token expired");
        store.expire("Token expired");

        assert!(!store.is_authenticated());
        assert_eq!(store.last_error().as_deref(), Some("Token expired"));
        assert!(harness.storage.get(TOKEN_KEY).is_none());
        assert!(harness.cookies.token().is_none());
        assert_eq!(harness.navigator.routes(), vec![LANDING_ROUTE.to_string()]);
    }
}
