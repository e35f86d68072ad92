use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, LoaderTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::{
    entities::{actor, country, genre, movie},
    error::{AppError, AppResult},
    models::{MovieDetail, MovieListItem, MoviePage, PageWindow, RelatedMovies},
};

const RELATED_LIMIT: u64 = 10;
const TOP_VIEWED_LIMIT: u64 = 15;

/// Read side of the catalog: filtered, paginated queries over the movie
/// table with their associations attached.
#[derive(Clone)]
pub struct CatalogQuery {
    db: DatabaseConnection,
}

impl CatalogQuery {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, window: PageWindow) -> AppResult<MoviePage> {
        self.page(movie::Entity::find(), window).await
    }

    /// Substring match on the movie name, unanchored.
    pub async fn search(&self, query: &str, window: PageWindow) -> AppResult<MoviePage> {
        self.page(movie::Entity::find().filter(movie::Column::Name.contains(query)), window).await
    }

    pub async fn by_genre(&self, genre_id: i32, window: PageWindow) -> AppResult<MoviePage> {
        self.page(movie::Entity::find().filter(movie::Column::GenreId.eq(genre_id)), window).await
    }

    pub async fn by_country(&self, country_id: i32, window: PageWindow) -> AppResult<MoviePage> {
        self.page(movie::Entity::find().filter(movie::Column::CountryId.eq(country_id)), window)
            .await
    }

    pub async fn by_actor(&self, actor_id: i32, window: PageWindow) -> AppResult<MoviePage> {
        self.page(movie::Entity::find().filter(movie::Column::ActorId.eq(actor_id)), window).await
    }

    pub async fn get(&self, movie_id: i32) -> AppResult<MovieDetail> {
        let movie = movie::Entity::find_by_id(movie_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("movie"))?;

        let genre = movie.find_related(genre::Entity).one(&self.db).await?;
        let country = movie.find_related(country::Entity).one(&self.db).await?;
        let actor = movie.find_related(actor::Entity).one(&self.db).await?;

        Ok(MovieDetail { movie, genre, country, actor })
    }

    /// The clicked movie plus up to 10 others, most recent first. Movies
    /// sharing the clicked movie's genre or country are preferred; when
    /// nothing shares either, plain recency is used instead.
    pub async fn related(&self, movie_id: i32) -> AppResult<RelatedMovies> {
        let clicked = movie::Entity::find_by_id(movie_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("movie"))?;

        let base = movie::Entity::find()
            .filter(movie::Column::Id.ne(clicked.id))
            .order_by_desc(movie::Column::CreatedAt)
            .limit(RELATED_LIMIT);

        let mut affinity = Condition::any();
        if let Some(genre_id) = clicked.genre_id {
            affinity = affinity.add(movie::Column::GenreId.eq(genre_id));
        }
        if let Some(country_id) = clicked.country_id {
            affinity = affinity.add(movie::Column::CountryId.eq(country_id));
        }
        let has_affinity = clicked.genre_id.is_some() || clicked.country_id.is_some();

        let mut rows = if has_affinity {
            base.clone().filter(affinity).all(&self.db).await?
        } else {
            Vec::new()
        };
        if rows.is_empty() {
            rows = base.all(&self.db).await?;
        }

        let related_movies = self.attach_all(rows).await?;

        let genre = clicked.find_related(genre::Entity).one(&self.db).await?;
        let country = clicked.find_related(country::Entity).one(&self.db).await?;
        let clicked_movie = MovieListItem { movie: clicked, genre, country };

        Ok(RelatedMovies { clicked_movie, related_movies })
    }

    /// Up to 15 movies by view count, descending. Raw list, no envelope.
    pub async fn top_viewed(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .order_by_desc(movie::Column::View)
            .limit(TOP_VIEWED_LIMIT)
            .all(&self.db)
            .await?)
    }

    /// Shared pagination path: newest first, genre and country attached,
    /// `totalPages = ceil(count / limit)` with the zero-match case yielding
    /// the literal empty envelope.
    async fn page(&self, select: Select<movie::Entity>, window: PageWindow) -> AppResult<MoviePage> {
        let paginator = select
            .order_by_desc(movie::Column::CreatedAt)
            .paginate(&self.db, window.limit);

        let total_pages = paginator.num_pages().await?;
        if total_pages == 0 {
            return Ok(MoviePage::empty());
        }

        let rows = paginator.fetch_page(window.page - 1).await?;
        let movies = self.attach_refs(rows).await?;

        Ok(MoviePage { movies, total_pages })
    }

    async fn attach_refs(&self, rows: Vec<movie::Model>) -> AppResult<Vec<MovieListItem>> {
        let genres = rows.load_one(genre::Entity, &self.db).await?;
        let countries = rows.load_one(country::Entity, &self.db).await?;

        Ok(rows
            .into_iter()
            .zip(genres)
            .zip(countries)
            .map(|((movie, genre), country)| MovieListItem { movie, genre, country })
            .collect())
    }

    async fn attach_all(&self, rows: Vec<movie::Model>) -> AppResult<Vec<MovieDetail>> {
        let genres = rows.load_one(genre::Entity, &self.db).await?;
        let countries = rows.load_one(country::Entity, &self.db).await?;
        let actors = rows.load_one(actor::Entity, &self.db).await?;

        Ok(rows
            .into_iter()
            .zip(genres)
            .zip(countries)
            .zip(actors)
            .map(|(((movie, genre), country), actor)| MovieDetail { movie, genre, country, actor })
            .collect())
    }
}
