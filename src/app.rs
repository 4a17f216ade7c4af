use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/user/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/water/data", get(handlers::get_water_data))
        .route("/api/water/add", post(handlers::add_water))
        .route("/api/water/weekly-stats", get(handlers::get_weekly_stats))
        .route("/api/water/history", get(handlers::get_history))
        .route("/api/water/recommendation", get(handlers::get_recommendation))
        .route("/api/analytics/report", get(handlers::get_report))
        .with_state(state)
}
