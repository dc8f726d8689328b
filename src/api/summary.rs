//! Home-page summary endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppResult, services::summary::next_visit_count};

/// Cookie carrying the session's visit count
const VISITS_COOKIE: &str = "num_visits";

/// Query parameters for the summary counts
#[derive(Debug, Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// Count books whose title contains this, case-insensitive
    pub title_contains: Option<String>,
    /// Count genres whose name contains this, case-insensitive
    pub genre_contains: Option<String>,
}

/// Home-page summary counts
#[derive(Serialize, ToSchema)]
pub struct SummaryResponse {
    /// Total number of books
    pub num_books: i64,
    /// Total number of copies
    pub num_instances: i64,
    /// Copies currently available
    pub num_instances_available: i64,
    /// Total number of authors
    pub num_authors: i64,
    /// Books matching `title_contains`, when given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_books_matching: Option<i64>,
    /// Genres matching `genre_contains`, when given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_genres_matching: Option<i64>,
    /// Visits from this session, including this one
    pub num_visits: u64,
}

/// Catalog summary: entity counts plus the session visit counter
#[utoipa::path(
    get,
    path = "/catalog/summary",
    tag = "summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Catalog counts", body = SummaryResponse)
    )
)]
pub async fn get_summary(
    State(state): State<crate::AppState>,
    Query(query): Query<SummaryQuery>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<SummaryResponse>)> {
    let counts = state
        .services
        .summary
        .catalog_counts(
            query.title_contains.as_deref(),
            query.genre_contains.as_deref(),
        )
        .await?;

    let previous = jar
        .get(VISITS_COOKIE)
        .and_then(|c| c.value().parse::<u64>().ok());
    let num_visits = next_visit_count(previous);

    let mut cookie = Cookie::new(VISITS_COOKIE, num_visits.to_string());
    cookie.set_path("/");
    let jar = jar.add(cookie);

    Ok((
        jar,
        Json(SummaryResponse {
            num_books: counts.num_books,
            num_instances: counts.num_instances,
            num_instances_available: counts.num_instances_available,
            num_authors: counts.num_authors,
            num_books_matching: counts.num_books_matching,
            num_genres_matching: counts.num_genres_matching,
            num_visits,
        }),
    ))
}
