use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::{
    entities::{actor, movie},
    error::{AppError, AppResult},
    upload::{Asset, AssetKind, MediaClient},
};

#[derive(Debug)]
pub struct CreateMovie {
    pub name: String,
    pub genre_id: i32,
    pub country_id: i32,
    pub actor_id: i32,
    pub image: Asset,
    pub video: Asset,
}

/// Update payload. Assets are optional: only a supplied asset is uploaded
/// and replaced, a metadata-only edit touches no media.
#[derive(Debug)]
pub struct UpdateMovie {
    pub name: String,
    pub genre_id: i32,
    pub country_id: i32,
    pub actor_id: i32,
    pub image: Option<Asset>,
    pub video: Option<Asset>,
}

/// Write side of the catalog: create, update, delete.
#[derive(Clone)]
pub struct CatalogMutation {
    db: DatabaseConnection,
    media: Arc<MediaClient>,
}

impl CatalogMutation {
    pub fn new(db: DatabaseConnection, media: Arc<MediaClient>) -> Self {
        Self { db, media }
    }

    /// Creates a movie. Both assets must upload successfully before the row
    /// is written, so a failed upload aborts the whole create. Not
    /// idempotent: retrying after a partial failure can leave an orphaned
    /// asset on the media host.
    pub async fn create(&self, input: CreateMovie) -> AppResult<movie::Model> {
        let actor = actor::Entity::find_by_id(input.actor_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("actor"))?;

        let image_url = self.media.upload(AssetKind::Image, &input.image).await?;
        let video_url = self.media.upload(AssetKind::Video, &input.video).await?;

        let row = movie::ActiveModel {
            name: Set(display_name(&actor.name, &input.name)),
            image_url: Set(image_url),
            video_url: Set(video_url),
            view: Set(0),
            created_at: Set(now_sec()),
            genre_id: Set(Some(input.genre_id)),
            country_id: Set(Some(input.country_id)),
            actor_id: Set(Some(input.actor_id)),
            ..Default::default()
        };

        Ok(row.insert(&self.db).await?)
    }

    /// Updates a movie. The display name is re-derived from the (possibly
    /// new) actor, keeping the naming policy identical to create.
    pub async fn update(&self, movie_id: i32, input: UpdateMovie) -> AppResult<movie::Model> {
        let existing = movie::Entity::find_by_id(movie_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("movie"))?;

        let actor = actor::Entity::find_by_id(input.actor_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("actor"))?;

        let image_url = match &input.image {
            Some(asset) => self.media.upload(AssetKind::Image, asset).await?,
            None => existing.image_url.clone(),
        };
        let video_url = match &input.video {
            Some(asset) => self.media.upload(AssetKind::Video, asset).await?,
            None => existing.video_url.clone(),
        };

        let mut row: movie::ActiveModel = existing.into();
        row.name = Set(display_name(&actor.name, &input.name));
        row.image_url = Set(image_url);
        row.video_url = Set(video_url);
        row.genre_id = Set(Some(input.genre_id));
        row.country_id = Set(Some(input.country_id));
        row.actor_id = Set(Some(input.actor_id));

        Ok(row.update(&self.db).await?)
    }

    /// Hard delete, no tombstone.
    pub async fn delete(&self, movie_id: i32) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(movie_id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("movie"));
        }
        Ok(())
    }
}

/// Catalog display name: the actor's name bracket-prefixed onto the title.
pub fn display_name(actor_name: &str, title: &str) -> String {
    format!("[ {actor_name} ] {title}")
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
