//! Loan renewal endpoints and reserved-copy listings

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::BookInstanceDetails,
};

use super::AuthenticatedUser;

/// Where a successful renewal lands
const BORROWED_LIST_PATH: &str = "/api/v1/catalog/instances/borrowed";

/// Renewal form submission
#[derive(Deserialize, ToSchema)]
pub struct RenewalRequest {
    /// Proposed new due date
    pub renewal_date: NaiveDate,
}

/// Renewal form state, presented on GET and redisplayed on invalid POST
#[derive(Serialize, ToSchema)]
pub struct RenewalForm {
    /// The copy being renewed
    pub instance: BookInstanceDetails,
    /// Proposed due date: the default suggestion on GET, the submitted
    /// value when redisplayed after a failed validation
    pub renewal_date: NaiveDate,
    /// Validation message, if the last submission was rejected
    pub error: Option<String>,
}

/// Present the renewal form for a copy
#[utoipa::path(
    get,
    path = "/catalog/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Renewal form with suggested date", body = RenewalForm),
        (status = 403, description = "Missing can_mark_returned permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalForm>> {
    claims.require_mark_returned()?;

    let (instance, proposed) = state.services.loans.renewal_proposal(id).await?;
    let today = Utc::now().date_naive();

    Ok(Json(RenewalForm {
        instance: BookInstanceDetails::from_instance(instance, today),
        renewal_date: proposed,
        error: None,
    }))
}

/// Renew a copy: set a new due date
#[utoipa::path(
    post,
    path = "/catalog/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 303, description = "Renewed, redirects to the borrowed list"),
        (status = 400, description = "Date outside the allowed window", body = RenewalForm),
        (status = 403, description = "Missing can_mark_returned permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Form(form): Form<RenewalRequest>,
) -> AppResult<Response> {
    claims.require_mark_returned()?;

    match state.services.loans.renew(id, form.renewal_date).await {
        Ok(_) => Ok(Redirect::to(BORROWED_LIST_PATH).into_response()),
        Err(AppError::Validation(message)) => {
            // Redisplay the form: submitted value retained, nothing written
            let (instance, _) = state.services.loans.renewal_proposal(id).await?;
            let today = Utc::now().date_naive();
            let body = RenewalForm {
                instance: BookInstanceDetails::from_instance(instance, today),
                renewal_date: form.renewal_date,
                error: Some(message),
            };
            Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// List every borrowed copy (librarian view)
#[utoipa::path(
    get,
    path = "/catalog/instances/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrowed copies, ordered by due date", body = Vec<BookInstanceDetails>),
        (status = 403, description = "Missing can_mark_returned permission")
    )
)]
pub async fn list_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookInstanceDetails>>> {
    claims.require_mark_returned()?;

    let instances = state.services.loans.list_borrowed().await?;
    let today = Utc::now().date_naive();
    let details = instances
        .into_iter()
        .map(|i| BookInstanceDetails::from_instance(i, today))
        .collect();
    Ok(Json(details))
}

/// List the authenticated user's borrowed copies
#[utoipa::path(
    get,
    path = "/catalog/instances/my",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own borrowed copies, ordered by due date", body = Vec<BookInstanceDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookInstanceDetails>>> {
    let instances = state
        .services
        .loans
        .list_borrowed_by_user(claims.user_id)
        .await?;
    let today = Utc::now().date_naive();
    let details = instances
        .into_iter()
        .map(|i| BookInstanceDetails::from_instance(i, today))
        .collect();
    Ok(Json(details))
}
