use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::auth::create_jwt;
use crate::models::format_timestamp;
use crate::models::{coupon, wellness_pass, wellness_pass_day};

struct DemoPass {
    slug: &'static str,
    title: &'static str,
    description: &'static str,
    reward_discount_percent: i32,
    reward_valid_days: i32,
    days: &'static [(&'static str, &'static str)],
}

const DEMO_PASSES: &[DemoPass] = &[
    DemoPass {
        slug: "glow-5",
        title: "Glow in 5 Days",
        description: "Five small daily rituals for calmer, brighter skin.",
        reward_discount_percent: 15,
        reward_valid_days: 30,
        days: &[
            ("Hydration check", "Drink two extra glasses of water today and note how your skin feels tonight."),
            ("Gentle cleanse", "Swap any harsh scrub for a mild cleanser, morning and evening."),
            ("Sun sense", "Apply SPF 30+ before going out, even if it's cloudy."),
            ("Sleep reset", "Aim for lights out 30 minutes earlier than usual."),
            ("Glow review", "Take a photo in daylight and compare with how you felt on day one."),
        ],
    },
    DemoPass {
        slug: "calm-3",
        title: "Calm in 3 Days",
        description: "A short breathing and posture routine before your next visit.",
        reward_discount_percent: 10,
        reward_valid_days: 14,
        days: &[
            ("Box breathing", "Four rounds of 4-4-4-4 breathing after waking up."),
            ("Desk posture", "Set three reminders to roll your shoulders back and unclench your jaw."),
            ("Evening unwind", "Ten minutes without screens before bed."),
        ],
    },
];

pub async fn seed_demo_data(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<(), DbErr> {
    let ts = format_timestamp(now);

    for demo in DEMO_PASSES {
        let pass = wellness_pass::ActiveModel {
            slug: Set(demo.slug.to_owned()),
            title: Set(demo.title.to_owned()),
            description: Set(Some(demo.description.to_owned())),
            total_days: Set(demo.days.len() as i32),
            reward_discount_percent: Set(demo.reward_discount_percent),
            reward_valid_days: Set(demo.reward_valid_days),
            is_active: Set(true),
            created_at: Set(ts.clone()),
            updated_at: Set(ts.clone()),
            ..Default::default()
        };

        wellness_pass::Entity::insert(pass)
            .on_conflict(
                OnConflict::column(wellness_pass::Column::Slug)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        let Some(saved) = wellness_pass::Entity::find()
            .filter(wellness_pass::Column::Slug.eq(demo.slug))
            .one(db)
            .await?
        else {
            continue;
        };

        for (index, (title, content)) in demo.days.iter().enumerate() {
            let day = wellness_pass_day::ActiveModel {
                pass_id: Set(saved.id),
                day_number: Set(index as i32 + 1),
                title: Set((*title).to_owned()),
                content: Set((*content).to_owned()),
                ..Default::default()
            };

            wellness_pass_day::Entity::insert(day)
                .on_conflict(
                    OnConflict::columns([
                        wellness_pass_day::Column::PassId,
                        wellness_pass_day::Column::DayNumber,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
        }
    }

    let welcome = coupon::ActiveModel {
        code: Set("WELCOME10".to_owned()),
        description: Set(Some("10% off a first consultation".to_owned())),
        discount_percent: Set(10),
        max_uses: Set(Some(100)),
        used_count: Set(0),
        is_active: Set(true),
        assigned_user_id: Set(None),
        expires_at: Set(None),
        created_at: Set(ts.clone()),
        updated_at: Set(ts),
        ..Default::default()
    };

    coupon::Entity::insert(welcome)
        .on_conflict(
            OnConflict::column(coupon::Column::Code)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

/// Bearer token for a throwaway demo patient, for poking at the API locally.
pub fn demo_token() -> Result<(String, String), String> {
    let user_id = uuid::Uuid::new_v4().to_string();
    let token = create_jwt(&user_id)?;
    Ok((user_id, token))
}
