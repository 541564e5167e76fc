//! Lending ledger: borrow/return state transitions

use uuid::Uuid;

use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    models::{Book, LoanState, User},
    store::{Stores, TxnOutcome},
};

/// How many times a transition is recomputed after losing a commit race.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Owns the borrow/return state machine and its per-user/per-book
/// invariants.
///
/// Every call re-reads current rows from the stores before validating
/// preconditions; nothing is cached across calls. The two-row effect of a
/// successful transition goes through [`LendingTxn::commit`] as one
/// compare-and-swap against the versions the rows were read at; losing a
/// concurrent race re-runs the whole read-validate-commit cycle, so the
/// loser sees the winner's state and gets the proper business error.
///
/// [`LendingTxn::commit`]: crate::store::LendingTxn::commit
#[derive(Clone)]
pub struct LendingLedger {
    stores: Stores,
    max_borrowed: u32,
}

impl LendingLedger {
    pub fn new(stores: Stores, config: &LendingConfig) -> Self {
        Self {
            stores,
            max_borrowed: config.max_borrowed_books,
        }
    }

    /// Borrow a book for `user`.
    ///
    /// Fails with `BookNotFound`, `BookNotAvailable` or
    /// `BorrowLimitExceeded`; state is untouched on any failure.
    pub async fn borrow(&self, book_id: Uuid, user: &User) -> AppResult<Book> {
        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let mut book = self
                .stores
                .books
                .find_by_id(book_id)
                .await?
                .ok_or(AppError::BookNotFound(book_id))?;

            let mut holder = self.current_user(user.id).await?;

            if !book.is_available() {
                return Err(AppError::BookNotAvailable(book.title));
            }
            if holder.borrowed_count >= self.max_borrowed {
                return Err(AppError::BorrowLimitExceeded(self.max_borrowed));
            }

            book.state = LoanState::Borrowed { by: holder.id };
            holder.borrowed_count += 1;

            match self.stores.txn.commit(book.clone(), holder.clone()).await? {
                TxnOutcome::Committed => {
                    tracing::info!(
                        user = %holder.email,
                        book = %book.title,
                        count = holder.borrowed_count,
                        "Book borrowed"
                    );
                    return Ok(book);
                }
                TxnOutcome::Conflict => {
                    tracing::debug!(book = %book.title, "Borrow lost a commit race, retrying");
                }
            }
        }

        Err(AppError::Fault("Lending commit kept conflicting".to_string()))
    }

    /// Return a book previously borrowed by `user`.
    ///
    /// `NotCurrentBorrower` when the book is on loan to someone else;
    /// `NothingToReturn` when it is not on loan at all (including a second
    /// return of the same book).
    pub async fn return_book(&self, book_id: Uuid, user: &User) -> AppResult<Book> {
        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let mut book = self
                .stores
                .books
                .find_by_id(book_id)
                .await?
                .ok_or(AppError::BookNotFound(book_id))?;

            match book.state {
                LoanState::Available => return Err(AppError::NothingToReturn(book.title)),
                LoanState::Borrowed { by } if by != user.id => {
                    return Err(AppError::NotCurrentBorrower(book.title));
                }
                LoanState::Borrowed { .. } => {}
            }

            let mut holder = self.current_user(user.id).await?;

            book.state = LoanState::Available;
            holder.borrowed_count = holder.borrowed_count.saturating_sub(1);

            match self.stores.txn.commit(book.clone(), holder.clone()).await? {
                TxnOutcome::Committed => {
                    tracing::info!(
                        user = %holder.email,
                        book = %book.title,
                        count = holder.borrowed_count,
                        "Book returned"
                    );
                    return Ok(book);
                }
                TxnOutcome::Conflict => {
                    tracing::debug!(book = %book.title, "Return lost a commit race, retrying");
                }
            }
        }

        Err(AppError::Fault("Lending commit kept conflicting".to_string()))
    }

    /// Re-read the user row; the authorized snapshot may be stale.
    async fn current_user(&self, id: Uuid) -> AppResult<User> {
        self.stores
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Fault(format!("User row {} disappeared", id)))
    }
}
