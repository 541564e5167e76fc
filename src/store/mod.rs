//! Storage abstraction for users and books
//!
//! The core never talks to a database directly; it goes through these traits
//! so the persistence backend stays swappable (and mockable in tests).

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, User},
};

pub use memory::MemoryStore;

/// User persistence operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by their unique identifier (e-mail), the token subject.
    async fn find_by_identifier(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn save(&self, user: User) -> AppResult<User>;
}

/// Book persistence operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    async fn save(&self, book: Book) -> AppResult<Book>;
}

/// Whether a lending commit landed or lost a concurrent race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnOutcome {
    Committed,
    /// One of the rows changed since it was read; nothing was written.
    Conflict,
}

/// Atomic compare-and-swap commit of one lending transition.
///
/// Contract: `book` and `user` carry the `version` they were read at. The
/// commit writes both rows together, with bumped versions, only if the
/// stored versions still match; otherwise it writes nothing and reports
/// [`TxnOutcome::Conflict`]. A database implementation maps this to a
/// transaction (or versioned dual write) scoped to this book+user pair;
/// writes for disjoint pairs must not block each other. A partially
/// committed transition is never observable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LendingTxn: Send + Sync {
    async fn commit(&self, book: Book, user: User) -> AppResult<TxnOutcome>;
}

/// Container for all store handles, shared across services.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookStore>,
    pub txn: Arc<dyn LendingTxn>,
}

impl Stores {
    /// Wire all store handles onto a single in-memory backend.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            books: store.clone(),
            txn: store,
        }
    }
}
