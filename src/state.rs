use crate::config::Settings;
use crate::goal::GoalFormula;
use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub goal_formula: GoalFormula,
    pub retention_days: u32,
}

impl AppState {
    pub fn new(settings: &Settings, data: AppData) -> Self {
        Self {
            data_path: settings.data_path.clone(),
            data: Arc::new(Mutex::new(data)),
            goal_formula: settings.goal_formula,
            retention_days: settings.retention_days,
        }
    }
}
