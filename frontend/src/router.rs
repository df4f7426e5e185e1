//! Route table and the navigation guard.
//!
//! Every transition, including the one issued by logout, goes through
//! [`before_each`]. The decision table is evaluated once per hop:
//!
//! 1. protected route, no session        -> redirect to login
//! 2. session, welcome/login/register    -> redirect to dashboard
//! 3. session, identity not yet loaded   -> fetch identity, then proceed
//! 4. otherwise                          -> proceed
//!
//! Branch 3 does not re-evaluate the table after the fetch. When the fetch
//! fails, the session is cleared and logout queues its own navigation to
//! login, which is guarded as a separate transition.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use log::{debug, error};

use crate::session::{Session, SessionStore};

pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Welcome,
    Login,
    Register,
    Dashboard,
    Movements,
    Categories,
    Budgets,
    Reports,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Welcome,
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Movements,
        Route::Categories,
        Route::Budgets,
        Route::Reports,
        Route::NotFound,
    ];

    /// Resolves a location path, ignoring ASCII case. Query string, fragment
    /// and a trailing slash are ignored too.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/').to_ascii_lowercase();
        match trimmed.as_str() {
            "" => Self::Welcome,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/movimientos" => Self::Movements,
            "/categorias" => Self::Categories,
            "/presupuestos" => Self::Budgets,
            "/reportes" => Self::Reports,
            _ => Self::NotFound,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Welcome => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Movements => "/movimientos",
            Self::Categories => "/categorias",
            Self::Budgets => "/presupuestos",
            Self::Reports => "/reportes",
            Self::NotFound => "/404",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Login => "login",
            Self::Register => "register",
            Self::Dashboard => "dashboard",
            Self::Movements => "movements",
            Self::Categories => "categories",
            Self::Budgets => "budgets",
            Self::Reports => "reports",
            Self::NotFound => "not-found",
        }
    }

    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Movements | Self::Categories | Self::Budgets | Self::Reports
        )
    }

    /// Entry pages that an authenticated session skips.
    pub fn is_entry(self) -> bool {
        matches!(self, Self::Welcome | Self::Login | Self::Register)
    }
}

/// Receives explicit navigation commands.
pub trait Navigator {
    fn navigate(&self, route: Route);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Redirect(Route),
    LoadUserThenProceed,
    Proceed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Redirect(Route),
    Proceed,
}

/// The decision table; first matching row wins.
pub fn decide(to: Route, session: &Session) -> GuardDecision {
    let authenticated = session.is_authenticated();
    if to.requires_auth() && !authenticated {
        GuardDecision::Redirect(Route::Login)
    } else if authenticated && to.is_entry() {
        GuardDecision::Redirect(Route::Dashboard)
    } else if authenticated && session.user.is_none() {
        GuardDecision::LoadUserThenProceed
    } else {
        GuardDecision::Proceed
    }
}

/// Runs before every transition.
pub async fn before_each(to: Route, from: Route, session: &SessionStore) -> GuardOutcome {
    let decision = decide(to, &session.snapshot());
    debug!("guard {} -> {}: {:?}", from.name(), to.name(), decision);
    match decision {
        GuardDecision::Redirect(route) => GuardOutcome::Redirect(route),
        GuardDecision::LoadUserThenProceed => {
            session.fetch_user().await;
            GuardOutcome::Proceed
        }
        GuardDecision::Proceed => GuardOutcome::Proceed,
    }
}

/// Asks `guard` about `to` and follows its redirects. Returns `None` once
/// more than [`MAX_REDIRECTS`] redirects have been issued.
pub async fn follow_redirects<G, F>(to: Route, mut guard: G) -> Option<Route>
where
    G: FnMut(Route) -> F,
    F: Future<Output = GuardOutcome>,
{
    let mut target = to;
    for _ in 0..=MAX_REDIRECTS {
        match guard(target).await {
            GuardOutcome::Proceed => return Some(target),
            GuardOutcome::Redirect(next) => {
                debug!("redirecting {} -> {}", target.path(), next.path());
                target = next;
            }
        }
    }
    None
}

/// Tracks the committed route and resolves guarded transitions.
pub struct Router {
    session: Rc<SessionStore>,
    current: Cell<Route>,
}

impl Router {
    pub fn new(session: Rc<SessionStore>, initial: Route) -> Self {
        Self {
            session,
            current: Cell::new(initial),
        }
    }

    pub fn current(&self) -> Route {
        self.current.get()
    }

    /// Guards `to`, following redirects as fresh transitions, and commits the
    /// route that was finally allowed. A redirect loop leaves the current
    /// route in place.
    pub async fn navigate(&self, to: Route) -> Route {
        let from = self.current.get();
        let session = &self.session;
        if let Some(landed) = follow_redirects(to, |target| before_each(target, from, session)).await {
            self.current.set(landed);
            return landed;
        }
        error!(
            "navigation to {} exceeded {} redirects, staying on {}",
            to.path(),
            MAX_REDIRECTS,
            from.path()
        );
        from
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::models::User;

    fn session(token: &str, user: Option<User>) -> Session {
        Session {
            token: token.to_string(),
            user,
        }
    }

    fn user() -> User {
        User {
            id: 1,
            email: "a@example.test".to_string(),
            name: None,
        }
    }

    #[rstest]
    #[case("/", Route::Welcome)]
    #[case("/login", Route::Login)]
    #[case("/register/", Route::Register)]
    #[case("/dashboard?tab=1", Route::Dashboard)]
    #[case("/movimientos#top", Route::Movements)]
    #[case("/categorias", Route::Categories)]
    #[case("/presupuestos", Route::Budgets)]
    #[case("/reportes", Route::Reports)]
    #[case("/Dashboard", Route::Dashboard)]
    #[case("/LOGIN/", Route::Login)]
    #[case("/nope", Route::NotFound)]
    fn paths_resolve_to_routes(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::from_path(path), expected);
    }

    #[test]
    fn every_named_route_round_trips_through_its_path() {
        for route in Route::ALL.into_iter().filter(|r| *r != Route::NotFound) {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn protected_routes_redirect_anonymous_sessions_to_login() {
        let anonymous = session("", None);
        for route in Route::ALL.into_iter().filter(|r| r.requires_auth()) {
            assert_eq!(decide(route, &anonymous), GuardDecision::Redirect(Route::Login));
        }
    }

    #[rstest]
    #[case(Route::Welcome)]
    #[case(Route::Login)]
    #[case(Route::Register)]
    fn entry_routes_redirect_sessions_to_dashboard(#[case] route: Route) {
        assert_eq!(
            decide(route, &session("T", None)),
            GuardDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(
            decide(route, &session("T", Some(user()))),
            GuardDecision::Redirect(Route::Dashboard)
        );
    }

    #[rstest]
    #[case(Route::Dashboard)]
    #[case(Route::Reports)]
    #[case(Route::NotFound)]
    fn missing_identity_is_loaded_before_proceeding(#[case] route: Route) {
        assert_eq!(
            decide(route, &session("T", None)),
            GuardDecision::LoadUserThenProceed
        );
        assert_eq!(decide(route, &session("T", Some(user()))), GuardDecision::Proceed);
    }

    #[rstest]
    #[case(Route::Welcome)]
    #[case(Route::Login)]
    #[case(Route::Register)]
    #[case(Route::NotFound)]
    fn public_routes_proceed_for_anonymous_sessions(#[case] route: Route) {
        assert_eq!(decide(route, &session("", None)), GuardDecision::Proceed);
    }

    #[test]
    fn bouncing_guard_gives_up_after_the_redirect_limit() {
        let mut asked = 0;
        let landed = futures::executor::block_on(follow_redirects(Route::Dashboard, |target| {
            asked += 1;
            let next = if target == Route::Login {
                Route::Dashboard
            } else {
                Route::Login
            };
            async move { GuardOutcome::Redirect(next) }
        }));

        assert_eq!(landed, None);
        assert_eq!(asked, MAX_REDIRECTS + 1);
    }

    #[test]
    fn redirect_chain_within_the_limit_lands_on_its_end() {
        let landed = futures::executor::block_on(follow_redirects(Route::Welcome, |target| async move {
            match target {
                Route::Welcome => GuardOutcome::Redirect(Route::Dashboard),
                _ => GuardOutcome::Proceed,
            }
        }));

        assert_eq!(landed, Some(Route::Dashboard));
    }
}
