//! Completion Service - completing the current day of the active pass
//!
//! Validation runs in a fixed order (slot, enrollment, availability, day
//! row) and the write path is a single transaction guarded twice: the
//! unique (user, pass, day) completion row and a conditional bump of the
//! enrollment counter. Losing either guard to a concurrent duplicate is
//! reported as the same idempotent success as an already-recorded day.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Serialize;

use crate::domain::{DomainError, compute_availability, is_unique_violation};
use crate::models::format_timestamp;
use crate::models::user_wellness_pass::{self, Entity as UserWellnessPass};
use crate::models::user_wellness_pass_day::{self, Entity as UserWellnessPassDay};
use crate::models::wellness_pass::{self, Entity as WellnessPass};
use crate::models::wellness_pass_day::{self, Entity as WellnessPassDay};
use crate::services::migration_service::ensure_active_slot;
use crate::services::progress_view::{ActiveProgramView, build_view, get_active};
use crate::services::reservation::try_reserve;
use crate::services::reward_service::issue_reward;
use crate::services::user_state::{find_user_state, release_slot};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    /// None once the pass has just been finished.
    pub active: Option<ActiveProgramView>,
    /// Only set on the call that finished the pass.
    pub reward_code: Option<String>,
    pub is_finished: bool,
}

/// Result of the guarded write.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Progressed,
    Finished { reward_code: String },
    Duplicate,
}

/// Insert the completion row. Returns false if the day was already recorded.
pub async fn insert_day_completion<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    pass_id: i32,
    day_number: i32,
    now: DateTime<Utc>,
) -> Result<bool, DomainError> {
    let row = user_wellness_pass_day::ActiveModel {
        user_id: Set(user_id.to_owned()),
        pass_id: Set(pass_id),
        day_number: Set(day_number),
        completed_at: Set(format_timestamp(now)),
        ..Default::default()
    };

    match UserWellnessPassDay::insert(row).exec(conn).await {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

async fn day_completion_exists<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    pass_id: i32,
    day_number: i32,
) -> Result<bool, DomainError> {
    let count = UserWellnessPassDay::find()
        .filter(user_wellness_pass_day::Column::UserId.eq(user_id))
        .filter(user_wellness_pass_day::Column::PassId.eq(pass_id))
        .filter(user_wellness_pass_day::Column::DayNumber.eq(day_number))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Complete one day of the user's active pass.
///
/// `requested_day` is optional; when given it must equal the day the
/// enrollment currently expects.
pub async fn complete_day(
    db: &DatabaseConnection,
    user_id: &str,
    requested_day: Option<i32>,
    now: DateTime<Utc>,
) -> Result<CompletionOutcome, DomainError> {
    ensure_active_slot(db, user_id, now).await?;

    let txn = db.begin().await?;

    // 1. Active slot
    let enrollment_id = find_user_state(&txn, user_id)
        .await?
        .and_then(|state| state.active_enrollment_id)
        .ok_or(DomainError::PassNotActive)?;

    // 2. Enrollment
    let (enrollment, pass) = match UserWellnessPass::find_by_id(enrollment_id)
        .find_also_related(WellnessPass)
        .one(&txn)
        .await?
    {
        Some((enrollment, Some(pass))) => (enrollment, pass),
        _ => return Err(DomainError::NotEnrolled),
    };
    if enrollment.is_finished() {
        return Err(DomainError::AlreadyFinished);
    }

    // 3-4. Target day and time gate
    let availability = compute_availability(&enrollment.progress()?, pass.total_days, now);
    let target_day = requested_day.unwrap_or(availability.available_day);
    if target_day != availability.available_day {
        return Err(DomainError::WrongDay {
            requested: target_day,
            expected: availability.available_day,
        });
    }
    if availability.next_unlock_at.is_some_and(|at| at > now) {
        return Err(DomainError::DayLocked { day: target_day });
    }

    // 5. Day definition
    let day_exists = WellnessPassDay::find()
        .filter(wellness_pass_day::Column::PassId.eq(pass.id))
        .filter(wellness_pass_day::Column::DayNumber.eq(target_day))
        .one(&txn)
        .await?
        .is_some();
    if !day_exists {
        return Err(DomainError::DayNotFound { day: target_day });
    }

    // 6. Already recorded: replay without side effects
    if day_completion_exists(&txn, user_id, pass.id, target_day).await? {
        txn.rollback().await?;
        tracing::debug!(user_id, pass = %pass.slug, day = target_day, "Replayed day completion");
        return current_outcome(db, user_id, now).await;
    }

    // 7. Guarded write
    match record_completion(&txn, &pass, &enrollment, target_day, now).await? {
        Recorded::Duplicate => {
            txn.rollback().await?;
            tracing::debug!(
                user_id,
                pass = %pass.slug,
                day = target_day,
                "Concurrent duplicate completion treated as replay"
            );
            current_outcome(db, user_id, now).await
        }
        Recorded::Progressed => {
            txn.commit().await?;
            tracing::info!(user_id, pass = %pass.slug, day = target_day, "Wellness day completed");

            let refreshed = UserWellnessPass::find_by_id(enrollment.id)
                .one(db)
                .await?
                .ok_or(DomainError::NotEnrolled)?;
            Ok(CompletionOutcome {
                active: Some(build_view(db, &pass, &refreshed, now).await?),
                reward_code: None,
                is_finished: false,
            })
        }
        Recorded::Finished { reward_code } => {
            txn.commit().await?;
            tracing::info!(user_id, pass = %pass.slug, "Wellness pass finished");

            Ok(CompletionOutcome {
                active: None,
                reward_code: Some(reward_code),
                is_finished: true,
            })
        }
    }
}

/// Insert the completion row and bump the enrollment from the counter value
/// in `enrollment`; finishing also mints the reward and frees the slot.
///
/// `Duplicate` means another writer won either guard. The caller must roll
/// back, since the completion row may already have been written.
pub async fn record_completion(
    txn: &DatabaseTransaction,
    pass: &wellness_pass::Model,
    enrollment: &user_wellness_pass::Model,
    target_day: i32,
    now: DateTime<Utc>,
) -> Result<Recorded, DomainError> {
    if !insert_day_completion(txn, &enrollment.user_id, pass.id, target_day, now).await? {
        return Ok(Recorded::Duplicate);
    }

    let completed_days_count = enrollment.completed_days_count + 1;
    let current_day_number = (target_day + 1).min(pass.total_days + 1);
    let ts = format_timestamp(now);

    let bumped = try_reserve(
        txn,
        UserWellnessPass::update_many()
            .col_expr(
                user_wellness_pass::Column::CompletedDaysCount,
                Expr::value(completed_days_count),
            )
            .col_expr(
                user_wellness_pass::Column::CurrentDayNumber,
                Expr::value(current_day_number),
            )
            .col_expr(
                user_wellness_pass::Column::LastCompletedAt,
                Expr::value(Some(ts.clone())),
            )
            .col_expr(user_wellness_pass::Column::UpdatedAt, Expr::value(ts.clone()))
            .filter(user_wellness_pass::Column::Id.eq(enrollment.id))
            .filter(
                user_wellness_pass::Column::CompletedDaysCount.eq(enrollment.completed_days_count),
            )
            .filter(user_wellness_pass::Column::FinishedAt.is_null()),
    )
    .await?;
    if !bumped {
        return Ok(Recorded::Duplicate);
    }

    if completed_days_count < pass.total_days {
        return Ok(Recorded::Progressed);
    }

    let reward = issue_reward(txn, pass, enrollment, now).await?;

    let finished = try_reserve(
        txn,
        UserWellnessPass::update_many()
            .col_expr(
                user_wellness_pass::Column::FinishedAt,
                Expr::value(Some(ts.clone())),
            )
            .col_expr(
                user_wellness_pass::Column::RewardCouponId,
                Expr::value(Some(reward.id)),
            )
            .filter(user_wellness_pass::Column::Id.eq(enrollment.id))
            .filter(user_wellness_pass::Column::FinishedAt.is_null()),
    )
    .await?;
    if !finished {
        return Err(DomainError::Internal(format!(
            "enrollment {} finished concurrently",
            enrollment.id
        )));
    }

    if !release_slot(txn, &enrollment.user_id, enrollment.id, now).await? {
        tracing::warn!(
            user_id = %enrollment.user_id,
            enrollment_id = enrollment.id,
            "Finished enrollment did not hold the active slot"
        );
    }

    Ok(Recorded::Finished {
        reward_code: reward.code,
    })
}

/// Outcome for a replayed request: current state, never a reward.
async fn current_outcome(
    db: &DatabaseConnection,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<CompletionOutcome, DomainError> {
    let active = get_active(db, user_id, now).await?;
    Ok(CompletionOutcome {
        is_finished: active.is_none(),
        active,
        reward_code: None,
    })
}
