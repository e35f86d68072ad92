use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub media_upload_url: String,
    pub media_api_key: String,
    pub upload_timeout_secs: u64,
    pub max_page_size: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://moviebox.db?mode=rwc".to_string());

        let media_upload_url = std::env::var("MEDIA_UPLOAD_URL")
            .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1/moviebox".to_string());

        let media_api_key = std::env::var("MEDIA_API_KEY").unwrap_or_else(|_| "".to_string());

        let upload_timeout_secs: u64 =
            std::env::var("UPLOAD_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(30);

        let max_page_size: u64 =
            std::env::var("MAX_PAGE_SIZE").ok().and_then(|s| s.parse().ok()).unwrap_or(100);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            media_upload_url,
            media_api_key,
            upload_timeout_secs,
            max_page_size,
        })
    }
}
