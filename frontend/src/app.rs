//! Root component: builds the stores once, owns the guarded router, and keeps
//! browser history in step with the committed route.

use std::rc::Rc;

use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{ApiClient, GlooTransport};
use crate::config::AppConfig;
use crate::router::{Navigator, Route, Router};
use crate::session::SessionStore;
use crate::storage::{LocalTokenStorage, TokenStorage};
use crate::store::{BudgetStore, CategoryStore, MovementStore};
use crate::views::{
    BudgetsPage, CategoriesPage, DashboardPage, Layout, LoginPage, MovementsPage, NotFoundPage,
    RegisterPage, ReportsPage, WelcomePage,
};

/// Everything a page needs, constructed once per app and passed down
/// explicitly.
#[derive(Clone)]
pub struct AppContext {
    pub session: Rc<SessionStore>,
    pub router: Rc<Router>,
    pub movements: Rc<MovementStore>,
    pub categories: Rc<CategoryStore>,
    pub budgets: Rc<BudgetStore>,
    /// Requests a guarded transition.
    pub navigate: Callback<Route>,
}

impl AppContext {
    pub fn new(config: &AppConfig, navigate: Callback<Route>) -> Self {
        let tokens: Rc<dyn TokenStorage> = Rc::new(LocalTokenStorage::new(config.token_key.clone()));
        let api = ApiClient::new(config, Rc::new(GlooTransport), tokens.clone());
        let session = Rc::new(SessionStore::new(
            api.clone(),
            tokens,
            Rc::new(navigate.clone()),
        ));
        Self {
            router: Rc::new(Router::new(session.clone(), Route::Welcome)),
            session,
            movements: Rc::new(MovementStore::new(api.clone())),
            categories: Rc::new(CategoryStore::new(api.clone())),
            budgets: Rc::new(BudgetStore::new(api)),
            navigate,
        }
    }
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.session, &other.session) && self.navigate == other.navigate
    }
}

impl Navigator for Callback<Route> {
    fn navigate(&self, route: Route) {
        self.emit(route);
    }
}

/// Latest navigation request; `seq` makes repeated requests for the same
/// route distinct.
#[derive(Debug, Clone, PartialEq)]
struct NavigationRequest {
    seq: u64,
    target: Route,
}

impl Reducible for NavigationRequest {
    type Action = Route;

    fn reduce(self: Rc<Self>, target: Route) -> Rc<Self> {
        Rc::new(Self {
            seq: self.seq + 1,
            target,
        })
    }
}

fn location_route() -> Route {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .map(|path| Route::from_path(&path))
        .unwrap_or(Route::Welcome)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryUpdate {
    Push(Route),
    Replace(Route),
}

/// A guard redirect replaces the entry of the route it refused, so Back does
/// not lead into the redirect again.
fn history_update(target: Route, landed: Route, current_path: &str) -> Option<HistoryUpdate> {
    if landed == Route::NotFound || Route::from_path(current_path) == landed {
        None
    } else if landed != target {
        Some(HistoryUpdate::Replace(landed))
    } else {
        Some(HistoryUpdate::Push(landed))
    }
}

fn sync_location(target: Route, landed: Route) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let current = window.location().pathname().unwrap_or_default();
    let Some(update) = history_update(target, landed, &current) else {
        return;
    };
    let history = match window.history() {
        Ok(history) => history,
        Err(err) => {
            warn!("history is not available: {err:?}");
            return;
        }
    };
    let result = match update {
        HistoryUpdate::Push(route) => history.push_state_with_url(&JsValue::NULL, "", Some(route.path())),
        HistoryUpdate::Replace(route) => {
            history.replace_state_with_url(&JsValue::NULL, "", Some(route.path()))
        }
    };
    if let Err(err) = result {
        warn!("could not update history: {err:?}");
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let request = use_reducer(|| NavigationRequest {
        seq: 0,
        target: location_route(),
    });
    let route = use_state(|| None::<Route>);

    let context = {
        let request = request.clone();
        use_state(move || {
            let navigate = Callback::from(move |target: Route| request.dispatch(target));
            AppContext::new(&AppConfig::from_env(), navigate)
        })
    };

    {
        let route = route.clone();
        let router = context.router.clone();
        use_effect_with_deps(
            move |request: &NavigationRequest| {
                let target = request.target;
                spawn_local(async move {
                    let landed = router.navigate(target).await;
                    sync_location(target, landed);
                    route.set(Some(landed));
                });
                || ()
            },
            (*request).clone(),
        );
    }

    {
        let request = request.clone();
        use_effect_with_deps(
            move |_| {
                let listener =
                    Closure::<dyn Fn()>::new(move || request.dispatch(location_route()));
                let window = web_sys::window();
                if let Some(window) = &window {
                    let _ = window.add_event_listener_with_callback(
                        "popstate",
                        listener.as_ref().unchecked_ref(),
                    );
                }
                move || {
                    if let Some(window) = window {
                        let _ = window.remove_event_listener_with_callback(
                            "popstate",
                            listener.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (),
        );
    }

    let Some(active) = *route else {
        return html! {
            <div class="min-h-screen flex items-center justify-center bg-background text-muted-foreground">
                {"Checking session..."}
            </div>
        };
    };

    let ctx = (*context).clone();
    let page = match active {
        Route::Welcome => html! { <WelcomePage ctx={ctx.clone()} /> },
        Route::Login => html! { <LoginPage ctx={ctx.clone()} /> },
        Route::Register => html! { <RegisterPage ctx={ctx.clone()} /> },
        Route::Dashboard => html! { <DashboardPage ctx={ctx.clone()} /> },
        Route::Movements => html! { <MovementsPage ctx={ctx.clone()} /> },
        Route::Categories => html! { <CategoriesPage ctx={ctx.clone()} /> },
        Route::Budgets => html! { <BudgetsPage ctx={ctx.clone()} /> },
        Route::Reports => html! { <ReportsPage ctx={ctx.clone()} /> },
        Route::NotFound => html! { <NotFoundPage ctx={ctx.clone()} /> },
    };

    if active.requires_auth() {
        html! {
            <Layout ctx={ctx} active={active}>
                { page }
            </Layout>
        }
    } else {
        page
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::refused_deep_link(Route::Dashboard, Route::Login, "/dashboard", Some(HistoryUpdate::Replace(Route::Login)))]
    #[case::entry_page_skipped(Route::Login, Route::Dashboard, "/login", Some(HistoryUpdate::Replace(Route::Dashboard)))]
    #[case::in_app_link(Route::Budgets, Route::Budgets, "/dashboard", Some(HistoryUpdate::Push(Route::Budgets)))]
    #[case::already_there(Route::Reports, Route::Reports, "/reportes", None)]
    #[case::unknown_path_kept(Route::NotFound, Route::NotFound, "/nope", None)]
    fn redirects_replace_and_links_push(
        #[case] target: Route,
        #[case] landed: Route,
        #[case] current_path: &str,
        #[case] expected: Option<HistoryUpdate>,
    ) {
        assert_eq!(history_update(target, landed, current_path), expected);
    }
}
