//! Domain models

pub mod book;
pub mod user;

pub use book::{Book, LoanState};
pub use user::{Role, User};
