use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::auth::Claims;
use crate::domain::DomainError;
use crate::services::{self, CompletionOutcome, StartedPass};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompleteDayRequest {
    #[serde(alias = "day_number")]
    pub day_number: Option<i32>,
}

/// An empty body completes whatever day is due; a non-empty one must parse.
fn parse_complete_request(body: &[u8]) -> Result<CompleteDayRequest, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CompleteDayRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| DomainError::InvalidRequest(e.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/wellness/passes",
    responses(
        (status = 200, description = "Wellness passes with the caller's progress"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_passes(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let passes = services::get_catalog(&db, claims.user_id(), Utc::now()).await?;
    Ok(Json(json!({ "passes": passes })))
}

#[utoipa::path(
    get,
    path = "/api/wellness/active",
    responses(
        (status = 200, description = "Active wellness pass, or null")
    )
)]
pub async fn get_active(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let active = services::get_active(&db, claims.user_id(), Utc::now()).await?;
    Ok(Json(json!({ "active": active })))
}

#[utoipa::path(
    post,
    path = "/api/wellness/passes/{slug}/start",
    params(("slug" = String, Path, description = "Wellness pass slug")),
    responses(
        (status = 200, description = "Pass started"),
        (status = 404, description = "PASS_NOT_FOUND"),
        (status = 409, description = "PASS_ALREADY_ACTIVE or PASS_ALREADY_COMPLETED")
    )
)]
pub async fn start_pass(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(slug): Path<String>,
) -> Result<Json<StartedPass>, DomainError> {
    let started = services::start_pass(&db, claims.user_id(), &slug, Utc::now()).await?;
    Ok(Json(started))
}

#[utoipa::path(
    post,
    path = "/api/wellness/complete",
    request_body = CompleteDayRequest,
    responses(
        (status = 200, description = "Day recorded (or already recorded)"),
        (status = 400, description = "WRONG_DAY or INVALID_REQUEST"),
        (status = 404, description = "PASS_NOT_ACTIVE, NOT_ENROLLED or DAY_NOT_FOUND"),
        (status = 409, description = "DAY_LOCKED or ALREADY_FINISHED")
    )
)]
pub async fn complete_day(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    body: Bytes,
) -> Result<Json<CompletionOutcome>, DomainError> {
    let request = parse_complete_request(&body)?;
    let outcome =
        services::complete_day(&db, claims.user_id(), request.day_number, Utc::now()).await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_requests_no_day() {
        assert_eq!(parse_complete_request(b"").unwrap().day_number, None);
        assert_eq!(parse_complete_request(b" \n").unwrap().day_number, None);
        assert_eq!(parse_complete_request(b"{}").unwrap().day_number, None);
    }

    #[test]
    fn test_day_number_spellings() {
        let camel = parse_complete_request(br#"{"dayNumber": 4}"#).unwrap();
        assert_eq!(camel.day_number, Some(4));
        let snake = parse_complete_request(br#"{"day_number": 2}"#).unwrap();
        assert_eq!(snake.day_number, Some(2));
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        for body in [
            &br#"{"day_number": "four"}"#[..],
            br#"{"day": 1}"#,
            b"not json",
        ] {
            assert!(matches!(
                parse_complete_request(body),
                Err(DomainError::InvalidRequest(_))
            ));
        }
    }
}
