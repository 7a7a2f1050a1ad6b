//! Domain objects passed between use cases and repositories.

use common::{MovieDetailsResponse, MovieResponse, UserSummary};
use model::entities::{movie, user};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    /// bcrypt hash, never the plaintext
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub poster: String,
    pub trailer: String,
    pub actors: Vec<String>,
    pub genres: Vec<String>,
    /// Owner; set on creation and never reassigned
    pub user_id: Uuid,
}

impl Movie {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// One page of a filtered listing plus the size of the whole match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePage {
    pub items: Vec<Movie>,
    pub total: u64,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
        }
    }
}

impl From<movie::Model> for Movie {
    fn from(model: movie::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            poster: model.poster,
            trailer: model.trailer,
            actors: model.actors.into(),
            genres: model.genres.into(),
            user_id: model.user_id,
        }
    }
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
        }
    }
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            genres: movie.genres,
            actors: movie.actors,
            trailer_url: movie.trailer,
            poster: movie.poster,
        }
    }
}

impl From<Movie> for MovieDetailsResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            genres: movie.genres,
            actors: movie.actors,
            trailer_url: movie.trailer,
            poster: movie.poster,
            user_id: movie.user_id,
        }
    }
}
