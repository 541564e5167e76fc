//! Libris lending records core
//!
//! The authentication, authorization and lending-ledger core of the Libris
//! library management system. Persistent storage is abstracted behind the
//! [`store`] traits; transport and catalog CRUD live in other crates.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
