//! Per-user active slot.
//!
//! The slot is `user_wellness_states.active_enrollment_id`. It moves
//! EMPTY -> HELD(enrollment) -> EMPTY and every transition is a conditional
//! update, never a blind write.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::*;

use crate::domain::DomainError;
use crate::models::format_timestamp;
use crate::models::user_wellness_state::{self, Entity as UserWellnessState};
use crate::services::reservation::try_reserve;

/// Load the user's state row, creating it on first interaction.
pub async fn ensure_user_state<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<user_wellness_state::Model, DomainError> {
    let ts = format_timestamp(now);
    let row = user_wellness_state::ActiveModel {
        user_id: Set(user_id.to_owned()),
        active_enrollment_id: Set(None),
        created_at: Set(ts.clone()),
        updated_at: Set(ts),
        ..Default::default()
    };

    // Concurrent first interactions collapse onto the unique user_id.
    UserWellnessState::insert(row)
        .on_conflict(
            OnConflict::column(user_wellness_state::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    find_user_state(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::Internal(format!("state row missing for user {}", user_id)))
}

pub async fn find_user_state<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> Result<Option<user_wellness_state::Model>, DomainError> {
    Ok(UserWellnessState::find()
        .filter(user_wellness_state::Column::UserId.eq(user_id))
        .one(conn)
        .await?)
}

/// Point the empty slot at `enrollment_id`. Returns false if the slot is held.
pub async fn claim_slot<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    enrollment_id: i32,
    now: DateTime<Utc>,
) -> Result<bool, DomainError> {
    let update = UserWellnessState::update_many()
        .col_expr(
            user_wellness_state::Column::ActiveEnrollmentId,
            Expr::value(enrollment_id),
        )
        .col_expr(
            user_wellness_state::Column::UpdatedAt,
            Expr::value(format_timestamp(now)),
        )
        .filter(user_wellness_state::Column::UserId.eq(user_id))
        .filter(user_wellness_state::Column::ActiveEnrollmentId.is_null());

    Ok(try_reserve(conn, update).await?)
}

/// Empty the slot if it is still held by `enrollment_id`.
pub async fn release_slot<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    enrollment_id: i32,
    now: DateTime<Utc>,
) -> Result<bool, DomainError> {
    let update = UserWellnessState::update_many()
        .col_expr(
            user_wellness_state::Column::ActiveEnrollmentId,
            Expr::value(Option::<i32>::None),
        )
        .col_expr(
            user_wellness_state::Column::UpdatedAt,
            Expr::value(format_timestamp(now)),
        )
        .filter(user_wellness_state::Column::UserId.eq(user_id))
        .filter(user_wellness_state::Column::ActiveEnrollmentId.eq(enrollment_id));

    Ok(try_reserve(conn, update).await?)
}
