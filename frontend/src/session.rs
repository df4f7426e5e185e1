//! Authentication state: bearer token plus the lazily loaded identity.

use std::cell::RefCell;
use std::rc::Rc;

use log::{error, warn};
use serde::de::IgnoredAny;

use crate::api::ApiClient;
use crate::models::{Credentials, LoginResponse, Registration, User};
use crate::router::{Navigator, Route};
use crate::storage::TokenStorage;

/// An empty token means "not signed in".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Owns the session for the lifetime of the app. Operations never fail
/// outward; errors are logged and reported as `false` or as a cleared
/// session.
pub struct SessionStore {
    state: RefCell<Session>,
    api: ApiClient,
    tokens: Rc<dyn TokenStorage>,
    navigator: Rc<dyn Navigator>,
}

impl SessionStore {
    /// Restores any token persisted by a previous page load.
    pub fn new(api: ApiClient, tokens: Rc<dyn TokenStorage>, navigator: Rc<dyn Navigator>) -> Self {
        let token = tokens.load().unwrap_or_default();
        Self {
            state: RefCell::new(Session { token, user: None }),
            api,
            tokens,
            navigator,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> String {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub async fn login(&self, credentials: &Credentials) -> bool {
        let response: LoginResponse = match self.api.post("/auth/login", credentials).await {
            Ok(response) => response,
            Err(err) => {
                error!("login failed: {err}");
                return false;
            }
        };

        if let Err(err) = self.tokens.store(&response.access_token) {
            warn!("token could not be persisted: {err}");
        }
        *self.state.borrow_mut() = Session {
            token: response.access_token,
            user: response.user,
        };
        true
    }

    /// Creates the account only; the caller signs in separately.
    pub async fn register(&self, registration: &Registration) -> bool {
        match self
            .api
            .post::<_, IgnoredAny>("/auth/register", registration)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                error!("registration failed: {err}");
                false
            }
        }
    }

    /// Loads the identity behind the current token. A rejected lookup means
    /// the token is no longer valid and ends the session.
    pub async fn fetch_user(&self) {
        if !self.is_authenticated() {
            return;
        }
        match self.api.get::<User>("/auth/me").await {
            Ok(user) => self.state.borrow_mut().user = Some(user),
            Err(err) => {
                error!("identity lookup failed, signing out: {err}");
                self.logout();
            }
        }
    }

    /// Clears the session and asks the router to show the login page.
    pub fn logout(&self) {
        *self.state.borrow_mut() = Session::default();
        if let Err(err) = self.tokens.remove() {
            warn!("persisted token could not be removed: {err}");
        }
        self.navigator.navigate(Route::Login);
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::api::Method;
    use crate::config::AppConfig;
    use crate::storage::MemoryTokenStorage;
    use crate::test_support::{RecordingNavigator, Reply, ScriptedTransport};

    struct Fixture {
        transport: Rc<ScriptedTransport>,
        tokens: Rc<MemoryTokenStorage>,
        navigator: Rc<RecordingNavigator>,
        store: SessionStore,
    }

    fn fixture(tokens: MemoryTokenStorage) -> Fixture {
        let transport = Rc::new(ScriptedTransport::default());
        let tokens = Rc::new(tokens);
        let navigator = Rc::new(RecordingNavigator::default());
        let api = ApiClient::new(&AppConfig::default(), transport.clone(), tokens.clone());
        let store = SessionStore::new(api, tokens.clone(), navigator.clone());
        Fixture {
            transport,
            tokens,
            navigator,
            store,
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "a".to_string(),
            password: "b".to_string(),
        }
    }

    #[test]
    fn starts_from_the_persisted_token() {
        let fx = fixture(MemoryTokenStorage::with_token("saved"));
        assert!(fx.store.is_authenticated());
        assert_eq!(fx.store.token(), "saved");
        assert!(fx.store.user().is_none());
    }

    #[test]
    fn successful_login_stores_and_persists_the_token() {
        let fx = fixture(MemoryTokenStorage::default());
        fx.transport.expect(
            Method::Post,
            "/auth/login",
            Reply::json(json!({ "access_token": "T", "user": { "id": 1 } })),
        );

        assert!(block_on(fx.store.login(&credentials())));
        assert!(fx.store.is_authenticated());
        assert_eq!(fx.store.token(), "T");
        assert_eq!(fx.store.user().map(|u| u.id), Some(1));
        assert_eq!(fx.tokens.load().as_deref(), Some("T"));
        assert_eq!(
            fx.transport.requests()[0].body,
            Some(json!({ "email": "a", "password": "b" }))
        );
    }

    #[test]
    fn failed_login_keeps_the_previous_session() {
        let fx = fixture(MemoryTokenStorage::with_token("old"));
        fx.transport.expect(Method::Post, "/auth/login", Reply::status(401));

        assert!(!block_on(fx.store.login(&credentials())));
        assert_eq!(fx.store.token(), "old");
        assert_eq!(fx.tokens.load().as_deref(), Some("old"));
    }

    #[test]
    fn register_never_signs_in() {
        let fx = fixture(MemoryTokenStorage::default());
        fx.transport.expect(
            Method::Post,
            "/auth/register",
            Reply::json(json!({ "access_token": "ignored" })),
        );
        fx.transport.expect(Method::Post, "/auth/register", Reply::status(409));
        let registration = Registration {
            name: "Ana".to_string(),
            email: "ana@example.test".to_string(),
            password: "secret123".to_string(),
        };

        assert!(block_on(fx.store.register(&registration)));
        assert!(!fx.store.is_authenticated());
        assert_eq!(fx.tokens.load(), None);
        assert!(!block_on(fx.store.register(&registration)));
    }

    #[test]
    fn fetch_user_without_token_does_not_call_the_api() {
        let fx = fixture(MemoryTokenStorage::default());
        block_on(fx.store.fetch_user());
        assert!(fx.transport.requests().is_empty());
        assert!(fx.navigator.routes().is_empty());
    }

    #[test]
    fn fetch_user_populates_the_identity() {
        let fx = fixture(MemoryTokenStorage::with_token("T"));
        fx.transport.expect(
            Method::Get,
            "/auth/me",
            Reply::json(json!({ "id": 7, "email": "x@example.test" })),
        );

        block_on(fx.store.fetch_user());
        assert_eq!(fx.store.user().map(|u| u.id), Some(7));
        assert_eq!(fx.transport.requests()[0].bearer.as_deref(), Some("T"));
    }

    #[test]
    fn failed_fetch_user_clears_the_whole_session() {
        let fx = fixture(MemoryTokenStorage::with_token("expired"));
        fx.transport.expect(Method::Get, "/auth/me", Reply::status(401));

        block_on(fx.store.fetch_user());
        assert_eq!(fx.store.snapshot(), Session::default());
        assert_eq!(fx.tokens.load(), None);
        assert_eq!(fx.navigator.routes(), vec![Route::Login]);
    }

    #[test]
    fn logout_clears_storage_and_requests_the_login_route() {
        let fx = fixture(MemoryTokenStorage::with_token("T"));
        fx.store.logout();

        assert!(!fx.store.is_authenticated());
        assert!(fx.store.user().is_none());
        assert_eq!(fx.tokens.load(), None);
        assert_eq!(fx.navigator.routes(), vec![Route::Login]);
    }
}
