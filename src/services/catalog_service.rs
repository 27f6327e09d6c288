//! Catalog Service - program list annotated with the user's relationship

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::*;
use serde::Serialize;

use crate::domain::DomainError;
use crate::models::user_wellness_pass::{self, Entity as UserWellnessPass};
use crate::models::wellness_pass::{self, Entity as WellnessPass};
use crate::services::migration_service::ensure_active_slot;
use crate::services::progress_view::progress_percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassState {
    Active,
    Completed,
    Locked,
    AvailableToStart,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub total_days: i32,
    pub reward_text: String,
    pub state: PassState,
    pub can_start: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_days_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_left: Option<i32>,
}

pub fn classify(
    enrollment: Option<&user_wellness_pass::Model>,
    active_enrollment_id: Option<i32>,
) -> PassState {
    match (enrollment, active_enrollment_id) {
        (Some(e), Some(active)) if e.id == active => PassState::Active,
        (Some(e), _) if e.is_finished() => PassState::Completed,
        (_, Some(_)) => PassState::Locked,
        _ => PassState::AvailableToStart,
    }
}

pub async fn get_catalog(
    db: &DatabaseConnection,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<CatalogEntry>, DomainError> {
    let user_state = ensure_active_slot(db, user_id, now).await?;

    let passes = WellnessPass::find()
        .filter(wellness_pass::Column::IsActive.eq(true))
        .order_by_asc(wellness_pass::Column::Id)
        .all(db)
        .await?;

    let enrollments: HashMap<i32, user_wellness_pass::Model> = UserWellnessPass::find()
        .filter(user_wellness_pass::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.pass_id, e))
        .collect();

    let entries = passes
        .into_iter()
        .map(|pass| {
            let enrollment = enrollments.get(&pass.id);
            let state = classify(enrollment, user_state.active_enrollment_id);

            CatalogEntry {
                reward_text: pass.reward_text(),
                state,
                can_start: state == PassState::AvailableToStart,
                progress_percent: enrollment
                    .map(|e| progress_percent(e.completed_days_count, pass.total_days)),
                completed_days_count: enrollment.map(|e| e.completed_days_count),
                days_left: enrollment
                    .map(|e| (pass.total_days - e.completed_days_count).max(0)),
                slug: pass.slug,
                title: pass.title,
                description: pass.description,
                total_days: pass.total_days,
            }
        })
        .collect();

    Ok(entries)
}
