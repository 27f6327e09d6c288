use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A program definition. Created and edited by admin tooling only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wellness_passes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Always >= 1.
    pub total_days: i32,
    pub reward_discount_percent: i32,
    /// Lifetime of the minted reward coupon, counted from issuance.
    pub reward_valid_days: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wellness_pass_day::Entity")]
    Day,
    #[sea_orm(has_many = "super::user_wellness_pass::Entity")]
    Enrollment,
}

impl Related<super::wellness_pass_day::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Day.def()
    }
}

impl Related<super::user_wellness_pass::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn reward_text(&self) -> String {
        format!(
            "{}% off your next visit, valid for {} days",
            self.reward_discount_percent, self.reward_valid_days
        )
    }
}
