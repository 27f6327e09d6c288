//! Enrollment Service - starting a wellness pass

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde::Serialize;

use crate::domain::DomainError;
use crate::models::format_timestamp;
use crate::models::user_wellness_pass::{self, Entity as UserWellnessPass};
use crate::models::wellness_pass::{self, Entity as WellnessPass};
use crate::services::migration_service::ensure_active_slot;
use crate::services::user_state::{claim_slot, ensure_user_state};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedPass {
    pub active_slug: String,
}

/// Active program definition by slug.
pub async fn find_active_pass<C: ConnectionTrait>(
    conn: &C,
    slug: &str,
) -> Result<wellness_pass::Model, DomainError> {
    WellnessPass::find()
        .filter(wellness_pass::Column::Slug.eq(slug))
        .filter(wellness_pass::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or(DomainError::PassNotFound)
}

pub async fn find_enrollment<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    pass_id: i32,
) -> Result<Option<user_wellness_pass::Model>, DomainError> {
    Ok(UserWellnessPass::find()
        .filter(user_wellness_pass::Column::UserId.eq(user_id))
        .filter(user_wellness_pass::Column::PassId.eq(pass_id))
        .one(conn)
        .await?)
}

/// Create the enrollment for (user, pass) unless it already exists.
async fn find_or_create_enrollment<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    pass_id: i32,
    now: DateTime<Utc>,
) -> Result<user_wellness_pass::Model, DomainError> {
    let ts = format_timestamp(now);
    let row = user_wellness_pass::ActiveModel {
        user_id: Set(user_id.to_owned()),
        pass_id: Set(pass_id),
        completed_days_count: Set(0),
        current_day_number: Set(1),
        last_completed_at: Set(None),
        finished_at: Set(None),
        reward_coupon_id: Set(None),
        created_at: Set(ts.clone()),
        updated_at: Set(ts),
        ..Default::default()
    };

    UserWellnessPass::insert(row)
        .on_conflict(
            OnConflict::columns([
                user_wellness_pass::Column::UserId,
                user_wellness_pass::Column::PassId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    find_enrollment(conn, user_id, pass_id)
        .await?
        .ok_or_else(|| DomainError::Internal("enrollment row missing after insert".to_string()))
}

/// Start (or resume) a wellness pass and claim the user's active slot.
pub async fn start_pass(
    db: &DatabaseConnection,
    user_id: &str,
    slug: &str,
    now: DateTime<Utc>,
) -> Result<StartedPass, DomainError> {
    ensure_active_slot(db, user_id, now).await?;

    let txn = db.begin().await?;

    let pass = find_active_pass(&txn, slug).await?;

    if let Some(existing) = find_enrollment(&txn, user_id, pass.id).await? {
        if existing.is_finished() {
            return Err(DomainError::PassAlreadyCompleted);
        }
    }

    let enrollment = find_or_create_enrollment(&txn, user_id, pass.id, now).await?;
    ensure_user_state(&txn, user_id, now).await?;

    if !claim_slot(&txn, user_id, enrollment.id, now).await? {
        // Rolls back a freshly created enrollment together with the failed claim.
        txn.rollback().await?;
        tracing::debug!(user_id, pass = %pass.slug, "Active slot already held");
        return Err(DomainError::PassAlreadyActive);
    }

    txn.commit().await?;

    tracing::info!(
        user_id,
        pass = %pass.slug,
        enrollment_id = enrollment.id,
        "Wellness pass started"
    );

    Ok(StartedPass {
        active_slug: pass.slug,
    })
}
