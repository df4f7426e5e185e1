//! In-process fakes for the network and navigation ports.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;

use crate::api::{ApiClient, ApiRequest, HttpTransport, Method};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::router::{Navigator, Route, Router};
use crate::session::SessionStore;
use crate::storage::{MemoryTokenStorage, TokenStorage};
use crate::store::{BudgetStore, CategoryStore, MovementStore};

/// Canned answer for one scripted request.
pub enum Reply {
    Ready(Result<Value, ApiError>),
    /// Resolves once the paired [`oneshot::Sender`] fires.
    Deferred(oneshot::Receiver<Result<Value, ApiError>>),
}

impl Reply {
    pub fn json(value: Value) -> Self {
        Self::Ready(Ok(value))
    }

    pub fn empty() -> Self {
        Self::Ready(Ok(Value::Null))
    }

    pub fn status(status: u16) -> Self {
        Self::Ready(Err(ApiError::Status {
            status,
            body: String::new(),
        }))
    }

    pub fn deferred() -> (oneshot::Sender<Result<Value, ApiError>>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self::Deferred(receiver))
    }
}

/// Answers requests from a queue of expectations, matched in order by
/// method and URL suffix. Unscripted requests fail with a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    expectations: RefCell<VecDeque<(Method, String, Reply)>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn expect(&self, method: Method, path: &str, reply: Reply) {
        self.expectations
            .borrow_mut()
            .push_back((method, path.to_string(), reply));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.method == method && request.url.ends_with(path))
            .count()
    }

    pub fn pending_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }

    fn take_reply(&self, request: &ApiRequest) -> Option<Reply> {
        let mut expectations = self.expectations.borrow_mut();
        let position = expectations
            .iter()
            .position(|(method, path, _)| *method == request.method && request.url.ends_with(path.as_str()))?;
        expectations.remove(position).map(|(_, _, reply)| reply)
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        match self.take_reply(&request) {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Deferred(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("reply dropped".to_string()))),
            None => Err(ApiError::Status {
                status: 404,
                body: format!("unscripted request to {}", request.url),
            }),
        }
    }
}

/// Records navigation commands instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: RefCell<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.borrow_mut().push(route);
    }
}

/// The whole client wired against fakes, mirroring `AppContext`.
pub struct Harness {
    pub transport: Rc<ScriptedTransport>,
    pub tokens: Rc<MemoryTokenStorage>,
    pub navigator: Rc<RecordingNavigator>,
    pub session: Rc<SessionStore>,
    pub router: Router,
    pub movements: MovementStore,
    pub categories: CategoryStore,
    pub budgets: BudgetStore,
}

impl Harness {
    pub fn new(tokens: MemoryTokenStorage) -> Self {
        let transport = Rc::new(ScriptedTransport::default());
        let tokens = Rc::new(tokens);
        let navigator = Rc::new(RecordingNavigator::default());
        let storage: Rc<dyn TokenStorage> = tokens.clone();
        let api = ApiClient::new(&AppConfig::default(), transport.clone(), storage.clone());
        let session = Rc::new(SessionStore::new(api.clone(), storage, navigator.clone()));
        Self {
            router: Router::new(session.clone(), Route::Welcome),
            movements: MovementStore::new(api.clone()),
            categories: CategoryStore::new(api.clone()),
            budgets: BudgetStore::new(api),
            transport,
            tokens,
            navigator,
            session,
        }
    }

    pub fn anonymous() -> Self {
        Self::new(MemoryTokenStorage::default())
    }

    pub fn signed_in(token: &str) -> Self {
        Self::new(MemoryTokenStorage::with_token(token))
    }
}

/// Yields once to the executor so sibling futures in a `join!` get polled.
pub fn yield_now() -> impl Future<Output = ()> {
    YieldNow { yielded: false }
}

struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
