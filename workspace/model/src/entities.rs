//! Root for all SeaORM entity modules of the movie catalog.

pub mod movie;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::movie::Entity as Movie;
    pub use super::user::Entity as User;
}
