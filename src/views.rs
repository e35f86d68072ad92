use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
};

/// Per-movie view counter.
#[derive(Clone)]
pub struct ViewCounter {
    db: DatabaseConnection,
}

impl ViewCounter {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Increments the counter by exactly 1. Issued as a single
    /// `view = view + 1` statement so concurrent increments on the same
    /// movie never lose an update.
    pub async fn increase(&self, movie_id: i32) -> AppResult<()> {
        let res = movie::Entity::update_many()
            .col_expr(movie::Column::View, Expr::col(movie::Column::View).add(1))
            .filter(movie::Column::Id.eq(movie_id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(AppError::NotFound("movie"));
        }
        Ok(())
    }
}
