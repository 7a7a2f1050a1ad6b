//! SeaORM entities backing the movie catalog.

pub mod entities;
