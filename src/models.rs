use crate::goal::{GoalFormula, RecommendedIntake, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeEntry {
    pub amount_ml: f64,
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DayLog {
    pub total_ml: f64,
    #[serde(default)]
    pub entries: Vec<IntakeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub profile: UserProfile,
    /// Keyed by `YYYY-MM-DD`.
    #[serde(default)]
    pub days: BTreeMap<String, DayLog>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `amount` stays loosely typed so a missing or non-numeric value is answered
/// like any other invalid amount.
#[derive(Debug, Deserialize)]
pub struct AddIntakeRequest {
    #[serde(default)]
    pub amount: serde_json::Value,
}

impl AddIntakeRequest {
    /// Milliliters, when the amount is a finite positive number.
    pub fn amount_ml(&self) -> Option<f64> {
        self.amount
            .as_f64()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gender.is_none()
            && self.weight.is_none()
            && self.height.is_none()
            && self.activity_level.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub gender: String,
    pub weight: f64,
    pub height: f64,
    pub activity_level: String,
    pub activity_label: String,
    pub daily_goal: u32,
    pub goal_formula: GoalFormula,
}

#[derive(Debug, Serialize)]
pub struct TodaySummary {
    pub date: String,
    pub total_ml: f64,
    pub entries: usize,
    pub goal_ml: u32,
    pub remaining_ml: f64,
    pub progress_percent: u32,
}

#[derive(Debug, Serialize)]
pub struct WaterDataResponse {
    pub today_intake: f64,
    pub yesterday_intake: f64,
    pub recommended_intake: u32,
    pub progress_percent: u32,
    pub daily_quote: &'static str,
    pub next_refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub formula: GoalFormula,
    pub daily_goal_ml: u32,
    pub weight_based_ml: u32,
    pub imperial: RecommendedIntake,
    pub activity_factor: f64,
    pub weather_factor: f64,
    pub adjusted_goal_ml: u32,
    pub tips: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub temp_f: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WeeklyStatsResponse {
    pub streak: u32,
    pub weekly_average: f64,
    pub best_day: f64,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub total_ml: f64,
    pub goal_met: bool,
}

#[derive(Debug, Serialize)]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub total_ml: f64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyAveragePoint {
    pub week: String,
    pub days_counted: u8,
    pub avg_ml: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub goal_ml: u32,
    pub last_7_days: Vec<DailyPoint>,
    pub weekly_totals: Vec<WeeklyPoint>,
    pub weekly_averages: Vec<WeeklyAveragePoint>,
}
