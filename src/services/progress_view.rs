//! Read model for the user's active wellness pass.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::*;
use serde::Serialize;

use crate::domain::{DayStatus, DomainError, compute_availability, day_status};
use crate::models::coupon::Entity as Coupon;
use crate::models::user_wellness_pass::{self, Entity as UserWellnessPass};
use crate::models::user_wellness_pass_day::{self, Entity as UserWellnessPassDay};
use crate::models::wellness_pass::{self, Entity as WellnessPass};
use crate::models::wellness_pass_day::{self, Entity as WellnessPassDay};
use crate::services::migration_service::ensure_active_slot;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayOverview {
    pub day_number: i32,
    pub title: String,
    pub status: DayStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProgramView {
    pub slug: String,
    pub title: String,
    pub progress_percent: i32,
    pub current_day_number: i32,
    pub current_day_title: Option<String>,
    /// Only present once the day is unlocked or already completed.
    pub current_day_content: Option<String>,
    pub is_day_completed: bool,
    /// None while the current day is unlocked.
    pub next_available_in_seconds: Option<i64>,
    pub completed_days_count: i32,
    pub days_left: i32,
    pub is_finished: bool,
    pub reward_code: Option<String>,
    pub days: Vec<DayOverview>,
}

/// `completed / total` as a rounded percentage.
pub fn progress_percent(completed_days: i32, total_days: i32) -> i32 {
    if total_days <= 0 {
        return 0;
    }
    ((f64::from(completed_days) / f64::from(total_days)) * 100.0).round() as i32
}

pub async fn completed_day_numbers<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    pass_id: i32,
) -> Result<HashSet<i32>, DomainError> {
    let rows = UserWellnessPassDay::find()
        .filter(user_wellness_pass_day::Column::UserId.eq(user_id))
        .filter(user_wellness_pass_day::Column::PassId.eq(pass_id))
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|row| row.day_number).collect())
}

pub async fn build_view<C: ConnectionTrait>(
    conn: &C,
    pass: &wellness_pass::Model,
    enrollment: &user_wellness_pass::Model,
    now: DateTime<Utc>,
) -> Result<ActiveProgramView, DomainError> {
    let availability = compute_availability(&enrollment.progress()?, pass.total_days, now);
    let completed = completed_day_numbers(conn, &enrollment.user_id, pass.id).await?;

    let days = WellnessPassDay::find()
        .filter(wellness_pass_day::Column::PassId.eq(pass.id))
        .order_by_asc(wellness_pass_day::Column::DayNumber)
        .all(conn)
        .await?;

    let current_day_number = enrollment.current_day_number.min(pass.total_days);
    let is_day_completed = completed.contains(&current_day_number);
    let current_day = days.iter().find(|d| d.day_number == current_day_number);
    let show_content = is_day_completed || !availability.is_locked();

    let reward_code = match enrollment.reward_coupon_id {
        Some(coupon_id) => Coupon::find_by_id(coupon_id)
            .one(conn)
            .await?
            .map(|c| c.code),
        None => None,
    };

    let overview = days
        .iter()
        .map(|d| DayOverview {
            day_number: d.day_number,
            title: d.title.clone(),
            status: day_status(d.day_number, completed.contains(&d.day_number), &availability),
        })
        .collect();

    Ok(ActiveProgramView {
        slug: pass.slug.clone(),
        title: pass.title.clone(),
        progress_percent: progress_percent(enrollment.completed_days_count, pass.total_days),
        current_day_number,
        current_day_title: current_day.map(|d| d.title.clone()),
        current_day_content: current_day
            .filter(|_| show_content)
            .map(|d| d.content.clone()),
        is_day_completed,
        next_available_in_seconds: availability.seconds_until_unlock(now),
        completed_days_count: enrollment.completed_days_count,
        days_left: (pass.total_days - enrollment.completed_days_count).max(0),
        is_finished: enrollment.is_finished(),
        reward_code,
        days: overview,
    })
}

/// View of the enrollment that currently holds the user's active slot.
pub async fn get_active(
    db: &DatabaseConnection,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<ActiveProgramView>, DomainError> {
    let state = ensure_active_slot(db, user_id, now).await?;
    let Some(enrollment_id) = state.active_enrollment_id else {
        return Ok(None);
    };

    let Some((enrollment, Some(pass))) = UserWellnessPass::find_by_id(enrollment_id)
        .find_also_related(WellnessPass)
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    build_view(db, &pass, &enrollment, now).await.map(Some)
}
