pub mod coupons;
pub mod error;
pub mod health;
pub mod wellness;

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;

use crate::infrastructure::AppState;

fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Wellness passes
        .route("/wellness/passes", get(wellness::list_passes))
        .route("/wellness/passes/:slug/start", post(wellness::start_pass))
        .route("/wellness/active", get(wellness::get_active))
        .route("/wellness/complete", post(wellness::complete_day))
        // Coupons
        .route("/coupons/redeem", post(coupons::redeem))
}

pub fn api_router(db: DatabaseConnection) -> Router {
    api_router_with_state(AppState::new(db))
}

pub fn api_router_with_state(state: AppState) -> Router {
    routes().with_state(state)
}
