pub mod analytics;
pub mod app;
pub mod config;
pub mod errors;
pub mod goal;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod schedule;
pub mod stats;
pub mod storage;
pub mod state;

pub use app::router;
pub use config::Settings;
pub use state::AppState;
pub use storage::{load_data, prepare_data_dir};
