//! Query layer over the idea/vote tables.
//!
//! Repositories borrow any [`sea_orm::ConnectionTrait`], so the same code runs
//! against a pooled connection for reads and a transaction for writes. They
//! enforce no business rules and return raw [`sea_orm::DbErr`]s; the service
//! decides what a failure means.

pub mod idea;
pub mod vote;

pub use idea::{IdeaListQuery, IdeaRepository, IdeaSort, SortOrder, MAX_PAGE_SIZE};
pub use vote::VoteRepository;

use sea_orm::{DbErr, SqlErr};

/// Result of a write that may trip a storage-level unique constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    Applied(T),
    UniqueViolation,
}

impl<T> WriteOutcome<T> {
    /// Splits a raw storage result into success, unique-key conflict, or a
    /// genuine failure that should propagate.
    pub fn classify(result: Result<T, DbErr>) -> Result<Self, DbErr> {
        match result {
            Ok(value) => Ok(Self::Applied(value)),
            Err(err) if is_unique_violation(&err) => Ok(Self::UniqueViolation),
            Err(err) => Err(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WriteOutcome<U> {
        match self {
            Self::Applied(value) => WriteOutcome::Applied(f(value)),
            Self::UniqueViolation => WriteOutcome::UniqueViolation,
        }
    }
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
