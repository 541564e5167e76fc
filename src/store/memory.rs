//! In-memory store backend
//!
//! Backs the test suite and small embedded deployments. All maps live under
//! one `RwLock`; taking the write lock for a lending commit makes the
//! two-row transition atomic (coarser than the per-pair minimum the trait
//! contract allows, which is fine in-process).

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, User},
    store::{BookStore, LendingTxn, TxnOutcome, UserStore},
};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    users_by_email: HashMap<String, Uuid>,
    books: HashMap<Uuid, Book>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a book directly, bypassing catalog management.
    pub async fn insert_book(&self, book: Book) -> Book {
        let mut inner = self.inner.write().await;
        inner.books.insert(book.id, book.clone());
        book
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_identifier(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users_by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        inner.users_by_email.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let inner = self.inner.read().await;
        Ok(inner.books.get(&id).cloned())
    }

    async fn save(&self, book: Book) -> AppResult<Book> {
        let mut inner = self.inner.write().await;
        inner.books.insert(book.id, book.clone());
        Ok(book)
    }
}

#[async_trait]
impl LendingTxn for MemoryStore {
    async fn commit(&self, mut book: Book, mut user: User) -> AppResult<TxnOutcome> {
        // Single write section: the version check and both writes happen
        // without any interleaved commit.
        let mut inner = self.inner.write().await;

        let book_current = inner.books.get(&book.id).map(|b| b.version) == Some(book.version);
        let user_current = inner.users.get(&user.id).map(|u| u.version) == Some(user.version);
        if !book_current || !user_current {
            return Ok(TxnOutcome::Conflict);
        }

        book.version += 1;
        user.version += 1;
        inner.books.insert(book.id, book);
        inner.users_by_email.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user);
        Ok(TxnOutcome::Committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoanState, Role};

    #[tokio::test]
    async fn test_user_lookup_by_email_and_id() {
        let store = MemoryStore::new();
        let user = User::new("Ana", "ana@example.com", "hash".into(), Role::User);
        let saved = UserStore::save(&store, user).await.unwrap();

        let by_email = store.find_by_identifier("ana@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, saved.id);

        let by_id = UserStore::find_by_id(&store, saved.id).await.unwrap();
        assert_eq!(by_id.unwrap().email, "ana@example.com");

        assert!(store
            .find_by_identifier("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_commit_writes_both_rows() {
        let store = MemoryStore::new();
        let mut user = User::new("Ana", "ana@example.com", "hash".into(), Role::User);
        UserStore::save(&store, user.clone()).await.unwrap();
        let mut book = store.insert_book(Book::new("Ficciones", "978-0-8021-3030-3")).await;

        book.state = LoanState::Borrowed { by: user.id };
        user.borrowed_count = 1;
        let outcome = store.commit(book.clone(), user.clone()).await.unwrap();
        assert_eq!(outcome, TxnOutcome::Committed);

        let stored_book = BookStore::find_by_id(&store, book.id).await.unwrap().unwrap();
        let stored_user = UserStore::find_by_id(&store, user.id).await.unwrap().unwrap();
        assert_eq!(stored_book.borrower(), Some(user.id));
        assert_eq!(stored_user.borrowed_count, 1);
        assert_eq!(stored_book.version, book.version + 1);
        assert_eq!(stored_user.version, user.version + 1);
    }

    #[tokio::test]
    async fn test_stale_commit_is_rejected_and_writes_nothing() {
        let store = MemoryStore::new();
        let user = User::new("Ana", "ana@example.com", "hash".into(), Role::User);
        UserStore::save(&store, user.clone()).await.unwrap();
        let book = store.insert_book(Book::new("Ficciones", "978-0-8021-3030-3")).await;

        // First transition lands and bumps both versions.
        let mut first_book = book.clone();
        first_book.state = LoanState::Borrowed { by: user.id };
        let mut first_user = user.clone();
        first_user.borrowed_count = 1;
        let outcome = store.commit(first_book, first_user).await.unwrap();
        assert_eq!(outcome, TxnOutcome::Committed);

        // A second transition computed from the same stale reads must lose.
        let mut stale_book = book.clone();
        stale_book.state = LoanState::Borrowed { by: user.id };
        let mut stale_user = user.clone();
        stale_user.borrowed_count = 1;
        let outcome = store.commit(stale_book, stale_user).await.unwrap();
        assert_eq!(outcome, TxnOutcome::Conflict);

        // The stored rows still reflect the first commit only.
        let stored_book = BookStore::find_by_id(&store, book.id).await.unwrap().unwrap();
        let stored_user = UserStore::find_by_id(&store, user.id).await.unwrap().unwrap();
        assert_eq!(stored_book.borrower(), Some(user.id));
        assert_eq!(stored_user.borrowed_count, 1);
        assert_eq!(stored_book.version, 1);
        assert_eq!(stored_user.version, 1);
    }
}
