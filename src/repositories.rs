//! Persistence capabilities used by the use cases.
//!
//! Each repository is a trait with a SeaORM implementation; tests swap in the
//! in-memory versions from [`memory`].

mod movies;
mod users;

#[cfg(test)]
pub mod memory;

pub use movies::SeaOrmMovieRepository;
pub use users::SeaOrmUserRepository;

use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Movie, MoviePage, User};

/// Error types for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A unique constraint rejected the write
    #[error("{0}")]
    Conflict(String),

    /// Error from the database operations
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Maps unique violations to [`RepositoryError::Conflict`] using the
    /// constraint text reported by the driver.
    pub(crate) fn from_write(error: DbErr, describe: impl Fn(&str) -> String) -> Self {
        match error.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict(describe(&detail)),
            _ => Self::Database(error),
        }
    }
}

/// Filter and window for a movie listing. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieListQuery {
    pub page: u64,
    pub page_size: u64,
    pub title: Option<String>,
}

impl MovieListQuery {
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when email or username is taken.
    async fn create(&self, user: &User) -> Result<User, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn create(&self, movie: &Movie) -> Result<Movie, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, RepositoryError>;

    /// Overwrites every mutable column of an existing row.
    async fn update(&self, movie: &Movie) -> Result<Movie, RepositoryError>;

    async fn list(&self, query: &MovieListQuery) -> Result<MoviePage, RepositoryError>;

    /// Returns the number of rows removed.
    async fn delete(&self, id: Uuid) -> Result<u64, RepositoryError>;
}
