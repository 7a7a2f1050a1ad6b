use async_trait::async_trait;
use model::entities::movie;
use sea_orm::sea_query::{BinOper, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use super::{MovieListQuery, MovieRepository, RepositoryError};
use crate::domain::{Movie, MoviePage};

#[derive(Clone, Debug)]
pub struct SeaOrmMovieRepository {
    db: DatabaseConnection,
}

impl SeaOrmMovieRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active_model(movie: &Movie) -> movie::ActiveModel {
    movie::ActiveModel {
        id: Set(movie.id),
        title: Set(movie.title.clone()),
        description: Set(movie.description.clone()),
        poster: Set(movie.poster.clone()),
        trailer: Set(movie.trailer.clone()),
        actors: Set(movie.actors.clone().into()),
        genres: Set(movie.genres.clone().into()),
        user_id: Set(movie.user_id),
    }
}

/// `%needle%` with LIKE wildcards in the needle escaped with `!`.
fn title_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '!') {
            escaped.push('!');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Case-insensitive substring match on the title. Both sides go through the
/// database's own `LOWER` so they are folded the same way:
/// `LOWER(title) LIKE LOWER(?) ESCAPE '!'`.
fn title_matches(needle: &str) -> SimpleExpr {
    let pattern = SimpleExpr::Binary(
        Box::new(Func::lower(Expr::val(title_pattern(needle))).into()),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant('!'.into())),
    );
    Expr::expr(Func::lower(Expr::col(movie::Column::Title))).binary(BinOper::Like, pattern)
}

#[async_trait]
impl MovieRepository for SeaOrmMovieRepository {
    #[instrument(skip(self, movie), fields(movie_id = %movie.id))]
    async fn create(&self, movie: &Movie) -> Result<Movie, RepositoryError> {
        trace!("Inserting movie row");
        let model = to_active_model(movie)
            .insert(&self.db)
            .await
            .map_err(|e| RepositoryError::from_write(e, |_| "movie already exists".to_string()))?;
        debug!("Movie row inserted");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, RepositoryError> {
        let model = movie::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Movie::from))
    }

    #[instrument(skip(self, movie), fields(movie_id = %movie.id))]
    async fn update(&self, movie: &Movie) -> Result<Movie, RepositoryError> {
        trace!("Updating movie row");
        let model = to_active_model(movie).update(&self.db).await?;
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &MovieListQuery) -> Result<MoviePage, RepositoryError> {
        let mut select = movie::Entity::find();
        if let Some(title) = query.title.as_deref() {
            select = select.filter(title_matches(title));
        }

        let paginator = select
            .order_by_asc(movie::Column::Title)
            .order_by_asc(movie::Column::Id)
            .paginate(&self.db, query.page_size);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(query.page - 1).await?;
        debug!("Fetched {} of {} matching movies", items.len(), total);

        Ok(MoviePage {
            items: items.into_iter().map(Movie::from).collect(),
            total,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<u64, RepositoryError> {
        let result = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        debug!("Delete affected {} rows", result.rows_affected);
        Ok(result.rows_affected)
    }
}
