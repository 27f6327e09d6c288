use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Discount coupon. Promo coupons are shared (`assigned_user_id` is NULL);
/// wellness rewards are bound to one user with `max_uses = 1`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    /// NULL = unlimited
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub assigned_user_id: Option<String>,
    pub expires_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_usable_by(&self, user_id: &str) -> bool {
        self.assigned_user_id
            .as_deref()
            .map_or(true, |owner| owner == user_id)
    }
}
