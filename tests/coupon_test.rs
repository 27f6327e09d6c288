use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use wellness_pass::db;
use wellness_pass::domain::DomainError;
use wellness_pass::models::coupon;
use wellness_pass::seed;
use wellness_pass::services::redeem_coupon;

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 10, 14, 30, 0).unwrap()
}

// Helper to create a coupon
async fn create_coupon(
    db: &DatabaseConnection,
    code: &str,
    max_uses: Option<i32>,
    assigned_user_id: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
) -> coupon::Model {
    let ts = now().to_rfc3339();
    coupon::ActiveModel {
        code: Set(code.to_string()),
        description: Set(None),
        discount_percent: Set(20),
        max_uses: Set(max_uses),
        used_count: Set(0),
        is_active: Set(true),
        assigned_user_id: Set(assigned_user_id.map(str::to_string)),
        expires_at: Set(expires_at.map(|at| at.to_rfc3339())),
        created_at: Set(ts.clone()),
        updated_at: Set(ts),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create coupon")
}

#[tokio::test]
async fn test_seeded_promo_is_redeemable() {
    let db = setup_test_db().await;
    seed::seed_demo_data(&db, now()).await.unwrap();
    // Seeding twice is a no-op
    seed::seed_demo_data(&db, now()).await.unwrap();

    let redeemed = redeem_coupon(&db, "patient-1", "welcome10", now()).await.unwrap();
    assert_eq!(redeemed.code, "WELCOME10");
    assert_eq!(redeemed.discount_percent, 10);
    assert_eq!(redeemed.used_count, 1);
    assert_eq!(redeemed.max_uses, Some(100));

    let redeemed = redeem_coupon(&db, "patient-2", "WELCOME10", now()).await.unwrap();
    assert_eq!(redeemed.used_count, 2);

    let promos = coupon::Entity::find()
        .filter(coupon::Column::Code.eq("WELCOME10"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(promos.len(), 1);
}

#[tokio::test]
async fn test_usage_never_exceeds_max_uses() {
    let db = setup_test_db().await;
    let created = create_coupon(&db, "TWICE", Some(2), None, None).await;

    for user in ["a", "b"] {
        redeem_coupon(&db, user, "TWICE", now()).await.unwrap();
    }

    let third = redeem_coupon(&db, "c", "TWICE", now()).await;
    assert!(matches!(third, Err(DomainError::CouponExhausted)));

    let stored = coupon::Entity::find_by_id(created.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.used_count, 2);
}

#[tokio::test]
async fn test_back_to_back_redemptions_respect_limit() {
    let db = setup_test_db().await;
    create_coupon(&db, "ONCE", Some(1), None, None).await;

    // The in-memory pool has one connection, so these run one after the other

    let (a, b) = tokio::join!(
        redeem_coupon(&db, "a", "ONCE", now()),
        redeem_coupon(&db, "b", "ONCE", now()),
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
}

#[tokio::test]
async fn test_unlimited_coupon() {
    let db = setup_test_db().await;
    create_coupon(&db, "OPEN", None, None, None).await;

    for _ in 0..5 {
        redeem_coupon(&db, "a", "OPEN", now()).await.unwrap();
    }
    let last = redeem_coupon(&db, "a", "OPEN", now()).await.unwrap();
    assert_eq!(last.used_count, 6);
    assert_eq!(last.max_uses, None);
}

#[tokio::test]
async fn test_expired_coupon() {
    let db = setup_test_db().await;
    create_coupon(&db, "OLD", None, None, Some(now() - Duration::days(1))).await;
    create_coupon(&db, "EDGE", None, None, Some(now())).await;
    create_coupon(&db, "FRESH", None, None, Some(now() + Duration::minutes(1))).await;

    assert!(matches!(
        redeem_coupon(&db, "a", "OLD", now()).await,
        Err(DomainError::CouponExpired)
    ));
    assert!(matches!(
        redeem_coupon(&db, "a", "EDGE", now()).await,
        Err(DomainError::CouponExpired)
    ));
    assert!(redeem_coupon(&db, "a", "FRESH", now()).await.is_ok());
}

#[tokio::test]
async fn test_assigned_coupon_is_private() {
    let db = setup_test_db().await;
    create_coupon(&db, "MINE-2026", Some(1), Some("owner"), None).await;

    assert!(matches!(
        redeem_coupon(&db, "intruder", "MINE-2026", now()).await,
        Err(DomainError::CouponNotFound)
    ));
    assert!(redeem_coupon(&db, "owner", "mine-2026", now()).await.is_ok());
}

#[tokio::test]
async fn test_unknown_and_inactive_coupons() {
    let db = setup_test_db().await;
    let paused = create_coupon(&db, "PAUSED", None, None, None).await;

    let mut paused: coupon::ActiveModel = paused.into();
    paused.is_active = Set(false);
    paused.update(&db).await.unwrap();

    assert!(matches!(
        redeem_coupon(&db, "a", "MISSING", now()).await,
        Err(DomainError::CouponNotFound)
    ));
    assert!(matches!(
        redeem_coupon(&db, "a", "PAUSED", now()).await,
        Err(DomainError::CouponExhausted)
    ));
}

#[test]
fn test_error_codes_and_kinds() {
    use wellness_pass::domain::ErrorKind;

    assert_eq!(DomainError::CouponExhausted.code(), "COUPON_EXHAUSTED");
    assert_eq!(DomainError::CouponExhausted.kind(), ErrorKind::Conflict);
    assert_eq!(DomainError::CouponNotFound.kind(), ErrorKind::NotFound);
    assert_eq!(DomainError::CouponExpired.kind(), ErrorKind::Conflict);
    assert_eq!(
        DomainError::WrongDay { requested: 3, expected: 2 }.kind(),
        ErrorKind::BadRequest
    );
    assert_eq!(DomainError::Database("boom".into()).code(), "INTERNAL_ERROR");
    assert_eq!(
        DomainError::InvalidRequest("bad".into()).kind(),
        ErrorKind::BadRequest
    );
}
