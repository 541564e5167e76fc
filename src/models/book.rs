//! Book model and lending state

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lending state of a single book. A book is available exactly when it has
/// no borrower; the enum makes that unrepresentable any other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoanState {
    Available,
    Borrowed { by: Uuid },
}

/// A physical book in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    /// Unique across the catalog.
    pub isbn: String,
    pub state: LoanState,
    /// Optimistic-lock tag, bumped by every committed lending transition.
    #[serde(default)]
    pub version: u64,
}

impl Book {
    pub fn new(title: &str, isbn: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            isbn: isbn.to_string(),
            state: LoanState::Available,
            version: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.state == LoanState::Available
    }

    /// The current borrower, if any.
    pub fn borrower(&self) -> Option<Uuid> {
        match self.state {
            LoanState::Available => None,
            LoanState::Borrowed { by } => Some(by),
        }
    }
}
