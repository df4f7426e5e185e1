//! Personal-finance web client: guarded routes over session, movement,
//! category and budget stores backed by the finance REST API.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod router;
pub mod session;
pub mod storage;
pub mod store;
pub mod views;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
