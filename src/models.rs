use serde::{Deserialize, Serialize};

use crate::entities::{actor, country, genre, movie};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw `page`/`limit` query parameters as sent by the client.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized pagination window: page starts at 1, limit is bounded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl PageQuery {
    /// Missing or non-positive values fall back to the defaults; limit is
    /// capped at `max_limit` so a caller cannot request an unbounded window.
    pub fn window(self, max_limit: u64) -> PageWindow {
        let page = match self.page {
            Some(p) if p > 0 => p as u64,
            _ => DEFAULT_PAGE,
        };
        let limit = match self.limit {
            Some(l) if l > 0 => (l as u64).min(max_limit),
            _ => DEFAULT_LIMIT,
        };
        PageWindow { page, limit }
    }
}

/// Movie as it appears in list responses, with genre and country attached.
#[derive(Debug, Serialize)]
pub struct MovieListItem {
    #[serde(flatten)]
    pub movie: movie::Model,
    pub genre: Option<genre::Model>,
    pub country: Option<country::Model>,
}

/// Movie with all three associations attached, for detail responses.
#[derive(Debug, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: movie::Model,
    pub genre: Option<genre::Model>,
    pub country: Option<country::Model>,
    pub actor: Option<actor::Model>,
}

/// Result envelope for every paginated list operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<MovieListItem>,
    pub total_pages: u64,
}

impl MoviePage {
    pub fn empty() -> Self {
        Self { movies: Vec::new(), total_pages: 0 }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedMovies {
    pub clicked_movie: MovieListItem,
    pub related_movies: Vec<MovieDetail>,
}
