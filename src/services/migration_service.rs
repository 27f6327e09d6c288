//! Compat migration for enrollments created before the active slot existed.
//!
//! Safe to call from any entry point, redundantly and concurrently: adoption
//! goes through the same conditional claim as `start`, and losing that race
//! simply means somebody else already filled the slot.

use chrono::{DateTime, Utc};
use sea_orm::*;

use crate::domain::DomainError;
use crate::models::user_wellness_pass::{self, Entity as UserWellnessPass};
use crate::models::user_wellness_state;
use crate::services::user_state::{claim_slot, ensure_user_state};

pub async fn ensure_active_slot(
    db: &DatabaseConnection,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<user_wellness_state::Model, DomainError> {
    let state = ensure_user_state(db, user_id, now).await?;
    if state.active_enrollment_id.is_some() {
        return Ok(state);
    }

    // Most recently progressed unfinished enrollment wins.
    let orphan = UserWellnessPass::find()
        .filter(user_wellness_pass::Column::UserId.eq(user_id))
        .filter(user_wellness_pass::Column::FinishedAt.is_null())
        .order_by_desc(user_wellness_pass::Column::LastCompletedAt)
        .order_by_desc(user_wellness_pass::Column::Id)
        .one(db)
        .await?;

    let Some(orphan) = orphan else {
        return Ok(state);
    };

    if claim_slot(db, user_id, orphan.id, now).await? {
        tracing::warn!(
            user_id,
            enrollment_id = orphan.id,
            "Adopted legacy enrollment into empty active slot"
        );
    } else {
        tracing::debug!(user_id, "Active slot filled concurrently, skipping adoption");
    }

    ensure_user_state(db, user_id, now).await
}
