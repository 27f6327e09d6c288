use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::parse_timestamp;
use crate::domain::{DomainError, EnrollmentProgress};

/// A user's enrollment in one wellness pass. Unique per (user_id, pass_id)
/// and never deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_wellness_passes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub pass_id: i32,
    /// 0..=total_days, only ever incremented by one.
    pub completed_days_count: i32,
    /// Next day to attempt, 1..=total_days + 1.
    pub current_day_number: i32,
    pub last_completed_at: Option<String>,
    /// Set exactly once, together with `reward_coupon_id`.
    pub finished_at: Option<String>,
    pub reward_coupon_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wellness_pass::Entity",
        from = "Column::PassId",
        to = "super::wellness_pass::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    WellnessPass,
    #[sea_orm(
        belongs_to = "super::coupon::Entity",
        from = "Column::RewardCouponId",
        to = "super::coupon::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    RewardCoupon,
}

impl Related<super::wellness_pass::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WellnessPass.def()
    }
}

impl Related<super::coupon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RewardCoupon.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn progress(&self) -> Result<EnrollmentProgress, DomainError> {
        Ok(EnrollmentProgress {
            completed_days_count: self.completed_days_count,
            current_day_number: self.current_day_number,
            last_completed_at: self
                .last_completed_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            finished_at: self
                .finished_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}
