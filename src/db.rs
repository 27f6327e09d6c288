use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Program definitions
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS wellness_passes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            description TEXT,
            total_days INTEGER NOT NULL CHECK (total_days >= 1),
            reward_discount_percent INTEGER NOT NULL DEFAULT 0,
            reward_valid_days INTEGER NOT NULL DEFAULT 30,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS wellness_pass_days (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pass_id INTEGER NOT NULL,
            day_number INTEGER NOT NULL CHECK (day_number >= 1),
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            FOREIGN KEY (pass_id) REFERENCES wellness_passes(id) ON DELETE CASCADE,
            UNIQUE (pass_id, day_number)
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Coupons: shared promo codes and single-use wellness rewards
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS coupons (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            description TEXT,
            discount_percent INTEGER NOT NULL,
            max_uses INTEGER,
            used_count INTEGER NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            assigned_user_id TEXT,
            expires_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Enrollments
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS user_wellness_passes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            pass_id INTEGER NOT NULL,
            completed_days_count INTEGER NOT NULL DEFAULT 0,
            current_day_number INTEGER NOT NULL DEFAULT 1,
            last_completed_at TEXT,
            finished_at TEXT,
            reward_coupon_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (pass_id) REFERENCES wellness_passes(id) ON DELETE CASCADE,
            FOREIGN KEY (reward_coupon_id) REFERENCES coupons(id) ON DELETE SET NULL,
            UNIQUE (user_id, pass_id)
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Per-user active slot
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS user_wellness_states (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL UNIQUE,
            active_enrollment_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (active_enrollment_id) REFERENCES user_wellness_passes(id) ON DELETE SET NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Day completions
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS user_wellness_pass_days (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            pass_id INTEGER NOT NULL,
            day_number INTEGER NOT NULL,
            completed_at TEXT NOT NULL,
            FOREIGN KEY (pass_id) REFERENCES wellness_passes(id) ON DELETE CASCADE,
            UNIQUE (user_id, pass_id, day_number)
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_user_wellness_passes_user ON user_wellness_passes(user_id)"
            .to_owned(),
    ))
    .await?;

    Ok(())
}
