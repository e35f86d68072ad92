pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod mutation;
pub mod query;
pub mod routes;
pub mod upload;
pub mod views;

use std::sync::Arc;

use crate::{config::Config, mutation::CatalogMutation, query::CatalogQuery, views::ViewCounter};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: CatalogQuery,
    pub mutations: CatalogMutation,
    pub views: ViewCounter,
}
