use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wellness_pass_days")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pass_id: i32,
    /// Unique together with `pass_id`.
    pub day_number: i32,
    pub title: String,
    pub content: String,
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
}

impl Related<super::wellness_pass::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WellnessPass.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
