use common::{CreateMovieRequest, MAX_PAGE_SIZE, UpdateMovieRequest};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{Movie, MoviePage};
use crate::error::{AppError, AppResult};
use crate::repositories::{MovieListQuery, MovieRepository};
use crate::uploader::{PosterFile, PosterUploader};
use crate::validation::{ensure_owner, validate_trailer_url};

/// Movie catalog operations. Mutations are restricted to the owner.
#[derive(Clone)]
pub struct MovieUsecase {
    repo: Arc<dyn MovieRepository>,
    uploader: Arc<dyn PosterUploader>,
}

impl MovieUsecase {
    pub fn new(repo: Arc<dyn MovieRepository>, uploader: Arc<dyn PosterUploader>) -> Self {
        Self { repo, uploader }
    }

    #[instrument(skip(self, request, poster), fields(title = %request.title))]
    pub async fn create_movie(
        &self,
        request: CreateMovieRequest,
        poster: PosterFile,
        caller_id: Uuid,
    ) -> AppResult<Movie> {
        validate_trailer_url(&request.trailer_url)?;

        let poster_url = self.uploader.upload(poster).await?;
        debug!("Poster hosted at {}", poster_url);

        let movie = Movie {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            poster: poster_url,
            trailer: request.trailer_url,
            actors: request.actors,
            genres: request.genres,
            user_id: caller_id,
        };
        let created = self.repo.create(&movie).await?;
        info!(movie_id = %created.id, "Movie created");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update_movie(
        &self,
        id: Uuid,
        request: UpdateMovieRequest,
        caller_id: Uuid,
    ) -> AppResult<Movie> {
        let existing = self.find(id).await?;
        ensure_owner(&existing, caller_id)?;
        validate_trailer_url(&request.trailer_url)?;

        let movie = Movie {
            title: request.title,
            description: request.description,
            genres: request.genres,
            actors: request.actors,
            trailer: request.trailer_url,
            poster: request.poster,
            ..existing
        };
        let updated = self.repo.update(&movie).await?;
        info!("Movie updated");
        Ok(updated)
    }

    /// `page` is 1-based; an empty or blank title filter means no filter.
    #[instrument(skip(self))]
    pub async fn get_movies(
        &self,
        page: u64,
        page_size: u64,
        title: Option<&str>,
    ) -> AppResult<MoviePage> {
        if page < 1 {
            return Err(AppError::validation("page must be at least 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        // The store addresses rows with a signed 64-bit offset.
        let window_end = page
            .checked_mul(page_size)
            .filter(|end| i64::try_from(*end).is_ok());
        if window_end.is_none() {
            return Err(AppError::validation("page is out of range"));
        }

        let title = title.map(str::trim).filter(|t| !t.is_empty());
        let query = MovieListQuery {
            page,
            page_size,
            title: title.map(str::to_string),
        };
        let result = self.repo.list(&query).await?;
        debug!("Listing returned {} of {} movies", result.items.len(), result.total);
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn get_movie_by_id(&self, id: Uuid) -> AppResult<Movie> {
        self.find(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_movie(&self, id: Uuid, caller_id: Uuid) -> AppResult<()> {
        let existing = self.find(id).await?;
        ensure_owner(&existing, caller_id)?;

        if self.repo.delete(id).await? == 0 {
            warn!("Movie vanished before it could be deleted");
            return Err(AppError::NotFound("movie"));
        }
        info!("Movie deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Movie> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("movie"))
    }
}
