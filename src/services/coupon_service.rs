//! Coupon Service - promo and reward redemption

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::*;
use serde::Serialize;

use crate::domain::DomainError;
use crate::models::coupon::{self, Entity as Coupon};
use crate::models::{format_timestamp, parse_timestamp};
use crate::services::reservation::try_reserve;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemedCoupon {
    pub code: String,
    pub discount_percent: i32,
    pub used_count: i32,
    pub max_uses: Option<i32>,
}

/// Consume one use of `code` on behalf of `user_id`.
pub async fn redeem_coupon(
    db: &DatabaseConnection,
    user_id: &str,
    code: &str,
    now: DateTime<Utc>,
) -> Result<RedeemedCoupon, DomainError> {
    let code = code.trim().to_ascii_uppercase();

    let found = Coupon::find()
        .filter(coupon::Column::Code.eq(code.as_str()))
        .one(db)
        .await?
        .filter(|c| c.is_usable_by(user_id))
        .ok_or(DomainError::CouponNotFound)?;

    if let Some(expires_at) = found.expires_at.as_deref() {
        if parse_timestamp(expires_at)? <= now {
            return Err(DomainError::CouponExpired);
        }
    }

    let reserve = Coupon::update_many()
        .col_expr(
            coupon::Column::UsedCount,
            Expr::col(coupon::Column::UsedCount).add(1),
        )
        .col_expr(coupon::Column::UpdatedAt, Expr::value(format_timestamp(now)))
        .filter(coupon::Column::Id.eq(found.id))
        .filter(coupon::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(coupon::Column::MaxUses.is_null())
                .add(Expr::col(coupon::Column::UsedCount).lt(Expr::col(coupon::Column::MaxUses))),
        );

    if !try_reserve(db, reserve).await? {
        tracing::debug!(user_id, code = %found.code, "Coupon exhausted");
        return Err(DomainError::CouponExhausted);
    }

    let redeemed = Coupon::find_by_id(found.id)
        .one(db)
        .await?
        .ok_or(DomainError::CouponNotFound)?;

    tracing::info!(user_id, code = %redeemed.code, "Coupon redeemed");

    Ok(RedeemedCoupon {
        code: redeemed.code,
        discount_percent: redeemed.discount_percent,
        used_count: redeemed.used_count,
        max_uses: redeemed.max_uses,
    })
}
