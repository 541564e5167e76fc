//! Role-gated access to the lending ledger

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, Role, User},
    services::{authorize::Authorizer, lending::LendingLedger},
};

/// Role-gated actions the gateway dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CatalogWrite,
    Borrow,
    Return,
}

impl Action {
    /// Static action → required role table.
    pub fn required_role(&self) -> Role {
        match self {
            Action::CatalogWrite => Role::Admin,
            Action::Borrow | Action::Return => Role::User,
        }
    }
}

/// Composition root: authorize, then delegate to the ledger.
///
/// Authorization failures (`MalformedHeader`/`InvalidToken`/`Unauthorized`)
/// stay distinct variants from the ledger's business-rule failures, so
/// callers can map them to different responses.
#[derive(Clone)]
pub struct AccessGateway {
    authorizer: Authorizer,
    ledger: LendingLedger,
}

impl AccessGateway {
    pub fn new(authorizer: Authorizer, ledger: LendingLedger) -> Self {
        Self { authorizer, ledger }
    }

    pub async fn borrow(&self, auth_header: &str, book_id: Uuid) -> AppResult<Book> {
        let user = self
            .authorizer
            .authorize(auth_header, Action::Borrow.required_role())
            .await?;
        self.ledger.borrow(book_id, &user).await
    }

    pub async fn return_book(&self, auth_header: &str, book_id: Uuid) -> AppResult<Book> {
        let user = self
            .authorizer
            .authorize(auth_header, Action::Return.required_role())
            .await?;
        self.ledger.return_book(book_id, &user).await
    }

    /// Gate a catalog mutation. The mutation itself is performed by the
    /// catalog service; this only answers who is allowed to do it.
    pub async fn authorize_catalog_write(&self, auth_header: &str) -> AppResult<User> {
        self.authorizer
            .authorize(auth_header, Action::CatalogWrite.required_role())
            .await
    }
}
