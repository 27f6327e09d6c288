use axum::{Json, extract::State};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::Claims;
use crate::domain::DomainError;
use crate::services::{self, RedeemedCoupon};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RedeemCouponRequest {
    pub code: String,
}

#[utoipa::path(
    post,
    path = "/api/coupons/redeem",
    request_body = RedeemCouponRequest,
    responses(
        (status = 200, description = "One use of the coupon reserved"),
        (status = 404, description = "COUPON_NOT_FOUND"),
        (status = 409, description = "COUPON_EXHAUSTED or COUPON_EXPIRED")
    )
)]
pub async fn redeem(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<RedeemCouponRequest>,
) -> Result<Json<RedeemedCoupon>, DomainError> {
    let redeemed = services::redeem_coupon(&db, claims.user_id(), &payload.code, Utc::now()).await?;
    Ok(Json(redeemed))
}
