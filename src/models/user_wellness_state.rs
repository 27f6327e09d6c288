use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per user. `active_enrollment_id` is the user's single active slot
/// and is only ever written through conditional updates.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_wellness_states")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: String,
    pub active_enrollment_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_wellness_pass::Entity",
        from = "Column::ActiveEnrollmentId",
        to = "super::user_wellness_pass::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    ActiveEnrollment,
}

impl Related<super::user_wellness_pass::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActiveEnrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
