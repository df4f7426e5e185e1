//! List-owning stores for the API's CRUD resources.
//!
//! A store's list only ever changes by wholesale replacement from a
//! successful `fetch_list`. Successful mutations are followed by a refetch,
//! failed ones leave the list as it was. Nothing here is cancelled or
//! serialised, so two overlapping fetches are last-writer-wins.

use std::cell::RefCell;

use log::error;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;

use crate::api::ApiClient;
use crate::models::{
    Budget, BudgetPatch, Category, CategoryPatch, MonthlySummary, Movement, MovementPatch,
    NewBudget, NewCategory, NewMovement, RecordId,
};

/// An entity served as a REST collection under [`Resource::PATH`].
pub trait Resource: DeserializeOwned + Clone + 'static {
    const PATH: &'static str;
    /// Singular noun used in log lines.
    const LABEL: &'static str;

    type Draft: Serialize;
    type Patch: Serialize;

    fn id(&self) -> RecordId;
}

impl Resource for Movement {
    const PATH: &'static str = "/movimientos";
    const LABEL: &'static str = "movement";

    type Draft = NewMovement;
    type Patch = MovementPatch;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Resource for Category {
    const PATH: &'static str = "/categorias";
    const LABEL: &'static str = "category";

    type Draft = NewCategory;
    type Patch = CategoryPatch;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Resource for Budget {
    const PATH: &'static str = "/presupuestos";
    const LABEL: &'static str = "budget";

    type Draft = NewBudget;
    type Patch = BudgetPatch;

    fn id(&self) -> RecordId {
        self.id
    }
}

pub struct ResourceStore<R: Resource> {
    api: ApiClient,
    items: RefCell<Vec<R>>,
}

pub type CategoryStore = ResourceStore<Category>;
pub type BudgetStore = ResourceStore<Budget>;

impl<R: Resource> ResourceStore<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: RefCell::new(Vec::new()),
        }
    }

    /// Copy of the list as of the last successful fetch.
    pub fn items(&self) -> Vec<R> {
        self.items.borrow().clone()
    }

    pub fn find(&self, id: RecordId) -> Option<R> {
        self.items.borrow().iter().find(|item| item.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Replaces the list with the server's. Returns whether it was refreshed.
    pub async fn fetch_list(&self) -> bool {
        match self.api.get::<Vec<R>>(R::PATH).await {
            Ok(items) => {
                *self.items.borrow_mut() = items;
                true
            }
            Err(err) => {
                error!("error fetching {} list: {err}", R::LABEL);
                false
            }
        }
    }

    pub async fn create(&self, draft: &R::Draft) -> bool {
        let result = self.api.post::<_, IgnoredAny>(R::PATH, draft).await;
        self.after_write("creating", result.map(|_| ())).await
    }

    pub async fn update(&self, id: RecordId, patch: &R::Patch) -> bool {
        let result = self.api.patch(&Self::item_path(id), patch).await;
        self.after_write("updating", result).await
    }

    pub async fn delete(&self, id: RecordId) -> bool {
        let result = self.api.delete(&Self::item_path(id)).await;
        self.after_write("deleting", result).await
    }

    fn item_path(id: RecordId) -> String {
        format!("{}/{}", R::PATH, id)
    }

    async fn after_write(&self, action: &str, result: Result<(), crate::error::ApiError>) -> bool {
        match result {
            Ok(()) => {
                self.fetch_list().await;
                true
            }
            Err(err) => {
                error!("error {action} {}: {err}", R::LABEL);
                false
            }
        }
    }
}

/// Movements plus the per-month aggregate, which is fetched independently
/// of the list.
pub struct MovementStore {
    list: ResourceStore<Movement>,
    summary: RefCell<MonthlySummary>,
}

impl MovementStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            list: ResourceStore::new(api),
            summary: RefCell::new(MonthlySummary::default()),
        }
    }

    pub fn list(&self) -> &ResourceStore<Movement> {
        &self.list
    }

    pub fn summary(&self) -> MonthlySummary {
        self.summary.borrow().clone()
    }

    /// `month` is 1-based.
    pub async fn fetch_monthly_summary(&self, month: u32, year: i32) -> bool {
        let query = vec![
            ("month".to_string(), month.to_string()),
            ("year".to_string(), year.to_string()),
        ];
        match self
            .list
            .api
            .get_with_query::<MonthlySummary>("/movimientos/resumen-mensual", query)
            .await
        {
            Ok(summary) => {
                *self.summary.borrow_mut() = summary;
                true
            }
            Err(err) => {
                error!("error fetching summary for {month}/{year}: {err}");
                false
            }
        }
    }
}
