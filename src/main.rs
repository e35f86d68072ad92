use std::sync::Arc;

use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use moviebox::{
    AppState, config::Config, db, mutation::CatalogMutation, query::CatalogQuery, routes,
    upload::MediaClient, views::ViewCounter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviebox=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(&config.database_url).await?;

    let media = Arc::new(MediaClient::new(
        config.media_upload_url.clone(),
        config.media_api_key.clone(),
        config.upload_timeout_secs,
    )?);

    let state = AppState {
        config: config.clone(),
        catalog: CatalogQuery::new(db.clone()),
        mutations: CatalogMutation::new(db.clone(), media),
        views: ViewCounter::new(db),
    };

    let app = routes::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
