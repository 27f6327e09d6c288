//! Reward issuance for finished wellness passes.

use chrono::{DateTime, Datelike, Duration, Utc};
use sea_orm::*;

use crate::domain::DomainError;
use crate::models::coupon::{self, Entity as Coupon};
use crate::models::format_timestamp;
use crate::models::user_wellness_pass;
use crate::models::wellness_pass;

const USER_FRAGMENT_LEN: usize = 8;

/// `<SLUG>-<first 8 alphanumerics of the user id>-<year>`
pub fn derive_reward_code(slug: &str, user_id: &str, issued_at: DateTime<Utc>) -> String {
    let fragment: String = user_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(USER_FRAGMENT_LEN)
        .collect();

    format!(
        "{}-{}-{}",
        slug.to_ascii_uppercase(),
        fragment.to_ascii_uppercase(),
        issued_at.year()
    )
}

/// Mint the single-use reward coupon for a finishing enrollment.
///
/// Must run inside the transaction that sets `finished_at`; that transition
/// happens once per enrollment, so this does too. Always inserts a new
/// coupon; a taken code gets the enrollment id appended.
pub async fn issue_reward<C: ConnectionTrait>(
    conn: &C,
    pass: &wellness_pass::Model,
    enrollment: &user_wellness_pass::Model,
    now: DateTime<Utc>,
) -> Result<coupon::Model, DomainError> {
    let base_code = derive_reward_code(&pass.slug, &enrollment.user_id, now);

    // Slugs that differ only by case derive the same code.
    let taken = Coupon::find()
        .filter(coupon::Column::Code.eq(base_code.as_str()))
        .count(conn)
        .await?
        > 0;
    let code = if taken {
        format!("{}-{}", base_code, enrollment.id)
    } else {
        base_code
    };

    let ts = format_timestamp(now);
    let reward = coupon::ActiveModel {
        code: Set(code),
        description: Set(Some(format!("Reward for completing {}", pass.title))),
        discount_percent: Set(pass.reward_discount_percent),
        max_uses: Set(Some(1)),
        used_count: Set(0),
        is_active: Set(true),
        assigned_user_id: Set(Some(enrollment.user_id.clone())),
        expires_at: Set(Some(format_timestamp(
            now + Duration::days(i64::from(pass.reward_valid_days)),
        ))),
        created_at: Set(ts.clone()),
        updated_at: Set(ts),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::info!(
        user_id = %enrollment.user_id,
        pass = %pass.slug,
        code = %reward.code,
        "Issued wellness reward coupon"
    );

    Ok(reward)
}
