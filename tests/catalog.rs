use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use moviebox::{
    entities::{actor, country, genre, movie},
    error::AppError,
    models::{PageQuery, PageWindow},
    mutation::{CatalogMutation, CreateMovie, UpdateMovie},
    query::CatalogQuery,
    upload::{Asset, MediaClient},
    views::ViewCounter,
};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

// Single pooled connection so every query sees the same in-memory database.
async fn setup() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

// No API key configured, so uploads return placeholder URLs offline.
fn media() -> Arc<MediaClient> {
    Arc::new(MediaClient::new("https://media.invalid".to_string(), String::new(), 5).unwrap())
}

fn window(page: i64, limit: i64) -> PageWindow {
    PageQuery { page: Some(page), limit: Some(limit) }.window(100)
}

async fn seed_refs(db: &DatabaseConnection) -> (genre::Model, country::Model, actor::Model) {
    let genre = genre::ActiveModel { name: Set("Action".to_string()), ..Default::default() }
        .insert(db)
        .await
        .unwrap();
    let country = country::ActiveModel { name: Set("USA".to_string()), ..Default::default() }
        .insert(db)
        .await
        .unwrap();
    let actor = actor::ActiveModel { name: Set("Keanu".to_string()), ..Default::default() }
        .insert(db)
        .await
        .unwrap();
    (genre, country, actor)
}

async fn seed_movie(
    db: &DatabaseConnection,
    name: &str,
    view: i32,
    created_at: i64,
    genre_id: Option<i32>,
    country_id: Option<i32>,
    actor_id: Option<i32>,
) -> movie::Model {
    movie::ActiveModel {
        name: Set(name.to_string()),
        image_url: Set(format!("https://media.invalid/image/{name}")),
        video_url: Set(format!("https://media.invalid/video/{name}")),
        view: Set(view),
        created_at: Set(created_at),
        genre_id: Set(genre_id),
        country_id: Set(country_id),
        actor_id: Set(actor_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

fn asset(filename: &str) -> Asset {
    Asset {
        filename: filename.to_string(),
        content_type: "application/octet-stream".to_string(),
        bytes: vec![0u8; 16],
    }
}

#[tokio::test]
async fn list_paginates_newest_first() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    for i in 0..25 {
        seed_movie(&db, &format!("Movie {i}"), 0, 1_000 + i, Some(g.id), Some(c.id), Some(a.id))
            .await;
    }
    let catalog = CatalogQuery::new(db);

    let page = catalog.list(PageQuery::default().window(100)).await.unwrap();
    assert_eq!(page.movies.len(), 10);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.movies[0].movie.name, "Movie 24");

    // Associations come attached on list reads.
    assert_eq!(page.movies[0].genre.as_ref().unwrap().name, "Action");
    assert_eq!(page.movies[0].country.as_ref().unwrap().name, "USA");

    let last = catalog.list(window(3, 10)).await.unwrap();
    assert_eq!(last.movies.len(), 5);
    assert_eq!(last.total_pages, 3);

    // Past the end: empty page, same page count.
    let past = catalog.list(window(9, 10)).await.unwrap();
    assert!(past.movies.is_empty());
    assert_eq!(past.total_pages, 3);
}

#[tokio::test]
async fn total_pages_is_count_ceil_limit() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    for i in 0..7 {
        seed_movie(&db, &format!("M{i}"), 0, i, Some(g.id), Some(c.id), Some(a.id)).await;
    }
    let catalog = CatalogQuery::new(db);

    assert_eq!(catalog.list(window(1, 3)).await.unwrap().total_pages, 3);
    assert_eq!(catalog.list(window(1, 7)).await.unwrap().total_pages, 1);
    assert_eq!(catalog.list(window(1, 10)).await.unwrap().total_pages, 1);
}

#[tokio::test]
async fn search_matches_substring_and_reports_empty() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    seed_movie(&db, "The Matrix", 0, 1, Some(g.id), Some(c.id), Some(a.id)).await;
    seed_movie(&db, "Matrix Reloaded", 0, 2, Some(g.id), Some(c.id), Some(a.id)).await;
    seed_movie(&db, "Speed", 0, 3, Some(g.id), Some(c.id), Some(a.id)).await;
    let catalog = CatalogQuery::new(db);

    let hits = catalog.search("Matrix", PageQuery::default().window(100)).await.unwrap();
    assert_eq!(hits.movies.len(), 2);
    assert_eq!(hits.total_pages, 1);

    let none = catalog.search("Solaris", PageQuery::default().window(100)).await.unwrap();
    assert!(none.movies.is_empty());
    assert_eq!(none.total_pages, 0);
}

#[tokio::test]
async fn filters_by_foreign_key() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let other_genre = genre::ActiveModel { name: Set("Drama".to_string()), ..Default::default() }
        .insert(&db)
        .await
        .unwrap();
    seed_movie(&db, "A", 0, 1, Some(g.id), Some(c.id), Some(a.id)).await;
    seed_movie(&db, "B", 0, 2, Some(other_genre.id), Some(c.id), Some(a.id)).await;
    let catalog = CatalogQuery::new(db);

    let by_genre = catalog.by_genre(g.id, PageQuery::default().window(100)).await.unwrap();
    assert_eq!(by_genre.movies.len(), 1);
    assert_eq!(by_genre.movies[0].movie.name, "A");

    let by_country = catalog.by_country(c.id, PageQuery::default().window(100)).await.unwrap();
    assert_eq!(by_country.movies.len(), 2);

    let by_actor = catalog.by_actor(a.id, PageQuery::default().window(100)).await.unwrap();
    assert_eq!(by_actor.movies.len(), 2);

    let nobody = catalog.by_actor(a.id + 99, PageQuery::default().window(100)).await.unwrap();
    assert!(nobody.movies.is_empty());
    assert_eq!(nobody.total_pages, 0);
}

#[tokio::test]
async fn get_returns_detail_or_not_found() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let m = seed_movie(&db, "Speed", 0, 1, Some(g.id), Some(c.id), Some(a.id)).await;
    let catalog = CatalogQuery::new(db);

    let detail = catalog.get(m.id).await.unwrap();
    assert_eq!(detail.genre.unwrap().name, "Action");
    assert_eq!(detail.country.unwrap().name, "USA");
    assert_eq!(detail.actor.unwrap().name, "Keanu");

    let err = catalog.get(m.id + 99).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn create_derives_display_name_and_zero_views() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let mutations = CatalogMutation::new(db, media());

    let created = mutations
        .create(CreateMovie {
            name: "Matrix".to_string(),
            genre_id: g.id,
            country_id: c.id,
            actor_id: a.id,
            image: asset("poster.png"),
            video: asset("trailer.mp4"),
        })
        .await
        .unwrap();

    assert_eq!(created.name, "[ Keanu ] Matrix");
    assert_eq!(created.view, 0);
    assert_eq!(created.image_url, "https://media.invalid/image/poster.png");
    assert_eq!(created.video_url, "https://media.invalid/video/trailer.mp4");
}

#[tokio::test]
async fn create_requires_existing_actor() {
    let db = setup().await;
    let (g, c, _) = seed_refs(&db).await;
    let mutations = CatalogMutation::new(db, media());

    let err = mutations
        .create(CreateMovie {
            name: "Matrix".to_string(),
            genre_id: g.id,
            country_id: c.id,
            actor_id: 999,
            image: asset("poster.png"),
            video: asset("trailer.mp4"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn update_keeps_urls_when_no_assets_supplied() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let m = seed_movie(&db, "[ Keanu ] Matrix", 3, 1, Some(g.id), Some(c.id), Some(a.id)).await;
    let mutations = CatalogMutation::new(db, media());

    let updated = mutations
        .update(
            m.id,
            UpdateMovie {
                name: "Matrix Reloaded".to_string(),
                genre_id: g.id,
                country_id: c.id,
                actor_id: a.id,
                image: None,
                video: None,
            },
        )
        .await
        .unwrap();

    // Same naming policy as create, media untouched, counter preserved.
    assert_eq!(updated.name, "[ Keanu ] Matrix Reloaded");
    assert_eq!(updated.image_url, m.image_url);
    assert_eq!(updated.video_url, m.video_url);
    assert_eq!(updated.view, 3);
}

#[tokio::test]
async fn update_replaces_only_supplied_asset() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let m = seed_movie(&db, "[ Keanu ] Matrix", 0, 1, Some(g.id), Some(c.id), Some(a.id)).await;
    let mutations = CatalogMutation::new(db, media());

    let updated = mutations
        .update(
            m.id,
            UpdateMovie {
                name: "Matrix".to_string(),
                genre_id: g.id,
                country_id: c.id,
                actor_id: a.id,
                image: Some(asset("poster-v2.png")),
                video: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.image_url, "https://media.invalid/image/poster-v2.png");
    assert_eq!(updated.video_url, m.video_url);
}

#[tokio::test]
async fn update_missing_movie_is_not_found() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let mutations = CatalogMutation::new(db, media());

    let err = mutations
        .update(
            42,
            UpdateMovie {
                name: "Ghost".to_string(),
                genre_id: g.id,
                country_id: c.id,
                actor_id: a.id,
                image: None,
                video: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_row() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let m = seed_movie(&db, "Speed", 0, 1, Some(g.id), Some(c.id), Some(a.id)).await;
    let catalog = CatalogQuery::new(db.clone());
    let mutations = CatalogMutation::new(db, media());

    assert!(matches!(mutations.delete(m.id + 99).await.unwrap_err(), AppError::NotFound(_)));

    mutations.delete(m.id).await.unwrap();
    assert!(matches!(catalog.get(m.id).await.unwrap_err(), AppError::NotFound(_)));
    assert!(matches!(mutations.delete(m.id).await.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn increase_view_counts_every_call() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let m = seed_movie(&db, "Speed", 0, 1, Some(g.id), Some(c.id), Some(a.id)).await;
    let catalog = CatalogQuery::new(db.clone());
    let views = ViewCounter::new(db);

    views.increase(m.id).await.unwrap();
    views.increase(m.id).await.unwrap();
    assert_eq!(catalog.get(m.id).await.unwrap().movie.view, 2);

    for _ in 0..10 {
        views.increase(m.id).await.unwrap();
    }
    assert_eq!(catalog.get(m.id).await.unwrap().movie.view, 12);

    assert!(matches!(views.increase(m.id + 99).await.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn top_viewed_caps_at_fifteen_sorted_desc() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    for i in 0..20 {
        seed_movie(&db, &format!("M{i}"), i, i as i64, Some(g.id), Some(c.id), Some(a.id)).await;
    }
    let catalog = CatalogQuery::new(db);

    let top = catalog.top_viewed().await.unwrap();
    assert_eq!(top.len(), 15);
    assert_eq!(top[0].view, 19);
    assert!(top.windows(2).all(|w| w[0].view >= w[1].view));
}

#[tokio::test]
async fn related_prefers_shared_genre_or_country() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let other_genre = genre::ActiveModel { name: Set("Drama".to_string()), ..Default::default() }
        .insert(&db)
        .await
        .unwrap();
    let other_country = country::ActiveModel { name: Set("France".to_string()), ..Default::default() }
        .insert(&db)
        .await
        .unwrap();

    let clicked = seed_movie(&db, "Clicked", 0, 100, Some(g.id), Some(c.id), Some(a.id)).await;
    let same_genre =
        seed_movie(&db, "Same genre", 0, 90, Some(g.id), Some(other_country.id), Some(a.id)).await;
    let same_country =
        seed_movie(&db, "Same country", 0, 80, Some(other_genre.id), Some(c.id), Some(a.id)).await;
    let unrelated = seed_movie(
        &db,
        "Unrelated",
        0,
        70,
        Some(other_genre.id),
        Some(other_country.id),
        Some(a.id),
    )
    .await;
    let catalog = CatalogQuery::new(db);

    let related = catalog.related(clicked.id).await.unwrap();
    assert_eq!(related.clicked_movie.movie.id, clicked.id);

    let ids: Vec<i32> = related.related_movies.iter().map(|m| m.movie.id).collect();
    assert!(!ids.contains(&clicked.id));
    assert!(ids.contains(&same_genre.id));
    assert!(ids.contains(&same_country.id));
    assert!(!ids.contains(&unrelated.id));
    assert!(ids.len() <= 10);
}

#[tokio::test]
async fn related_falls_back_to_recency() {
    let db = setup().await;
    let (g, c, a) = seed_refs(&db).await;
    let other_genre = genre::ActiveModel { name: Set("Drama".to_string()), ..Default::default() }
        .insert(&db)
        .await
        .unwrap();
    let other_country = country::ActiveModel { name: Set("France".to_string()), ..Default::default() }
        .insert(&db)
        .await
        .unwrap();

    let clicked = seed_movie(&db, "Clicked", 0, 100, Some(g.id), Some(c.id), Some(a.id)).await;
    for i in 0..12 {
        seed_movie(
            &db,
            &format!("Other {i}"),
            0,
            i,
            Some(other_genre.id),
            Some(other_country.id),
            Some(a.id),
        )
        .await;
    }
    let catalog = CatalogQuery::new(db);

    let related = catalog.related(clicked.id).await.unwrap();
    assert_eq!(related.related_movies.len(), 10);
    assert!(related.related_movies.iter().all(|m| m.movie.id != clicked.id));
    // Most recent first.
    assert_eq!(related.related_movies[0].movie.name, "Other 11");

    let err = catalog.related(clicked.id + 999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
