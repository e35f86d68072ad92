use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    entities::movie,
    error::{AppError, AppResult},
    models::{MovieDetail, PageQuery, RelatedMovies},
    mutation::{CreateMovie, UpdateMovie},
    upload::Asset,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/search", get(search_movies))
        .route("/movies/top-viewed", get(top_viewed))
        .route("/movies/{id}", get(get_movie).put(update_movie).delete(delete_movie))
        .route("/movies/{id}/related", get(related_movies))
        .route("/movies/{id}/view", post(increase_view))
        .route("/movies/genre/{genre_id}", get(movies_by_genre))
        .route("/movies/country/{country_id}", get(movies_by_country))
        .route("/movies/actor/{actor_id}", get(movies_by_actor))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Response> {
    let window =
        PageQuery { page: params.page, limit: params.limit }.window(state.config.max_page_size);
    let page = state.catalog.search(params.q.as_deref().unwrap_or(""), window).await?;
    Ok(Json(page).into_response())
}

async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Response> {
    let page = state.catalog.list(params.window(state.config.max_page_size)).await?;
    // Original API quirk: an empty catalog answers with a message body.
    if page.total_pages == 0 {
        return Ok(Json(json!({ "message": "No movies found" })).into_response());
    }
    Ok(Json(page).into_response())
}

async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MovieDetail>> {
    Ok(Json(state.catalog.get(id).await?))
}

async fn movies_by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<i32>,
    Query(params): Query<PageQuery>,
) -> AppResult<Response> {
    let page = state.catalog.by_genre(genre_id, params.window(state.config.max_page_size)).await?;
    Ok(Json(page).into_response())
}

async fn movies_by_country(
    State(state): State<AppState>,
    Path(country_id): Path<i32>,
    Query(params): Query<PageQuery>,
) -> AppResult<Response> {
    let page =
        state.catalog.by_country(country_id, params.window(state.config.max_page_size)).await?;
    Ok(Json(page).into_response())
}

async fn movies_by_actor(
    State(state): State<AppState>,
    Path(actor_id): Path<i32>,
    Query(params): Query<PageQuery>,
) -> AppResult<Response> {
    let page = state.catalog.by_actor(actor_id, params.window(state.config.max_page_size)).await?;
    Ok(Json(page).into_response())
}

async fn create_movie(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<movie::Model>)> {
    let form = MovieForm::read(multipart).await?;
    let input = CreateMovie {
        name: form.name.ok_or(AppError::InvalidField("name"))?,
        genre_id: form.genre_id.ok_or(AppError::InvalidField("genreId"))?,
        country_id: form.country_id.ok_or(AppError::InvalidField("countryId"))?,
        actor_id: form.actor_id.ok_or(AppError::InvalidField("actorId"))?,
        image: form.image.ok_or(AppError::InvalidField("imageUrl"))?,
        video: form.video.ok_or(AppError::InvalidField("videoUrl"))?,
    };
    let created = state.mutations.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<movie::Model>> {
    let form = MovieForm::read(multipart).await?;
    let input = UpdateMovie {
        name: form.name.ok_or(AppError::InvalidField("name"))?,
        genre_id: form.genre_id.ok_or(AppError::InvalidField("genreId"))?,
        country_id: form.country_id.ok_or(AppError::InvalidField("countryId"))?,
        actor_id: form.actor_id.ok_or(AppError::InvalidField("actorId"))?,
        image: form.image,
        video: form.video,
    };
    Ok(Json(state.mutations.update(id, input).await?))
}

async fn delete_movie(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.mutations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn related_movies(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RelatedMovies>> {
    Ok(Json(state.catalog.related(id).await?))
}

async fn increase_view(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    state.views.increase(id).await?;
    Ok(Json(json!({ "message": "view counted" })))
}

async fn top_viewed(State(state): State<AppState>) -> AppResult<Json<Vec<movie::Model>>> {
    Ok(Json(state.catalog.top_viewed().await?))
}

/// Multipart fields shared by create and update.
#[derive(Debug, Default)]
struct MovieForm {
    name: Option<String>,
    genre_id: Option<i32>,
    country_id: Option<i32>,
    actor_id: Option<i32>,
    image: Option<Asset>,
    video: Option<Asset>,
}

impl MovieForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match name.as_str() {
                "name" => form.name = Some(field.text().await?),
                "genreId" => form.genre_id = Some(parse_id(&field.text().await?, "genreId")?),
                "countryId" => form.country_id = Some(parse_id(&field.text().await?, "countryId")?),
                "actorId" => form.actor_id = Some(parse_id(&field.text().await?, "actorId")?),
                "imageUrl" => form.image = Some(read_asset(field).await?),
                "videoUrl" => form.video = Some(read_asset(field).await?),
                _ => {}
            }
        }
        Ok(form)
    }
}

async fn read_asset(field: Field<'_>) -> AppResult<Asset> {
    let filename = field.file_name().unwrap_or("asset").to_string();
    let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
    let bytes = field.bytes().await?.to_vec();
    Ok(Asset { filename, content_type, bytes })
}

fn parse_id(raw: &str, field: &'static str) -> AppResult<i32> {
    raw.trim().parse().map_err(|_| AppError::InvalidField(field))
}
