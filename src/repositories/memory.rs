//! In-memory repositories for use-case tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::{MovieListQuery, MovieRepository, RepositoryError, UserRepository};
use crate::domain::{Movie, MoviePage, User};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_string()));
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict("username already exists".to_string()));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    movies: Mutex<BTreeMap<Uuid, Movie>>,
}

impl InMemoryMovieRepository {
    pub fn len(&self) -> usize {
        self.movies.lock().unwrap().len()
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn create(&self, movie: &Movie) -> Result<Movie, RepositoryError> {
        let mut movies = self.movies.lock().unwrap();
        if movies.contains_key(&movie.id) {
            return Err(RepositoryError::Conflict("movie already exists".to_string()));
        }
        movies.insert(movie.id, movie.clone());
        Ok(movie.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, RepositoryError> {
        Ok(self.movies.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, RepositoryError> {
        let mut movies = self.movies.lock().unwrap();
        match movies.get_mut(&movie.id) {
            Some(stored) => {
                *stored = movie.clone();
                Ok(movie.clone())
            }
            None => Err(RepositoryError::Database(sea_orm::DbErr::RecordNotUpdated)),
        }
    }

    async fn list(&self, query: &MovieListQuery) -> Result<MoviePage, RepositoryError> {
        let needle = query.title.as_deref().map(str::to_lowercase);
        let mut matches: Vec<Movie> = self
            .movies
            .lock()
            .unwrap()
            .values()
            .filter(|m| match &needle {
                Some(needle) => m.title.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect();
        Ok(MoviePage { items, total })
    }

    async fn delete(&self, id: Uuid) -> Result<u64, RepositoryError> {
        Ok(self.movies.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }
}
