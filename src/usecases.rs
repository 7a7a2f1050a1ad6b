//! Business orchestration between the HTTP handlers and the repositories.

mod movies;
mod users;

pub use movies::MovieUsecase;
pub use users::UserUsecase;
