use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wellness_pass::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellness_pass=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&db, chrono::Utc::now()).await {
            tracing::error!("Failed to seed data: {}", e);
        } else {
            tracing::info!("Demo data seeded successfully.");
            match seed::demo_token() {
                Ok((user_id, token)) => {
                    tracing::info!(%user_id, "Demo bearer token: {}", token)
                }
                Err(e) => tracing::warn!("Failed to create demo token: {}", e),
            }
        }
    }

    if let Err(e) = server::run_server(db, &config).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
