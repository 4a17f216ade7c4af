use crate::analytics::{
    ProgressReport, ReportQuery, daily_quote, progress_report_at, weather_tips,
};
use crate::errors::AppError;
use crate::goal::{
    ActivityLevel, Gender, GoalFormula, UserProfile, daily_goal_ml, progress_percent,
    weather_factor,
};
use crate::intake::date_key;
use crate::models::{
    AddIntakeRequest, ApiResponse, AppData, HistoryResponse, ProfileResponse, ProfileUpdate,
    RecommendationQuery, RecommendationResponse, TodaySummary, WaterDataResponse,
    WeeklyStatsResponse,
};
use crate::schedule::next_midnight;
use crate::state::AppState;
use crate::stats::{build_history, weekly_stats};
use crate::storage::persist_data;
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use chrono::{Duration, Local, NaiveDateTime};
use tracing::info;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

pub async fn get_profile(State(state): State<AppState>) -> ApiResult<ProfileResponse> {
    let data = state.data.lock().await;
    Ok(Json(ApiResponse::ok(profile_response(
        &data.profile,
        state.goal_formula,
    ))))
}

pub async fn update_profile(
    State(state): State<AppState>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<ProfileResponse> {
    let Json(payload) = payload?;
    if payload.is_empty() {
        return Err(AppError::bad_request("No valid fields to update"));
    }

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    apply_profile_update(&mut next.profile, payload)?;

    persist_data(&state.data_path, &next).await?;
    *data = next;

    let goal = data.profile.daily_goal_ml(state.goal_formula);
    info!(daily_goal_ml = goal, "profile updated");
    Ok(Json(ApiResponse::ok(profile_response(
        &data.profile,
        state.goal_formula,
    ))))
}

pub async fn get_water_data(State(state): State<AppState>) -> ApiResult<WaterDataResponse> {
    let now = Local::now().naive_local();
    let data = state.data.lock().await;
    Ok(Json(ApiResponse::ok(water_data_at(
        now,
        &data,
        state.goal_formula,
    ))))
}

pub async fn add_water(
    State(state): State<AppState>,
    payload: Result<Json<AddIntakeRequest>, JsonRejection>,
) -> ApiResult<TodaySummary> {
    let amount = payload
        .ok()
        .and_then(|Json(request)| request.amount_ml())
        .ok_or_else(|| AppError::bad_request("Invalid amount provided"))?;

    let now = Local::now().naive_local();
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let total_ml = next.record_intake(now, amount);

    persist_data(&state.data_path, &next).await?;
    *data = next;

    info!(amount_ml = amount, total_ml, "water intake recorded");
    Ok(Json(ApiResponse::ok(today_summary(
        now,
        &data,
        state.goal_formula,
    ))))
}

pub async fn get_weekly_stats(State(state): State<AppState>) -> ApiResult<WeeklyStatsResponse> {
    let data = state.data.lock().await;
    Ok(Json(ApiResponse::ok(weekly_stats(&data))))
}

pub async fn get_history(State(state): State<AppState>) -> ApiResult<HistoryResponse> {
    let data = state.data.lock().await;
    let goal = data.profile.daily_goal_ml(state.goal_formula);
    Ok(Json(ApiResponse::ok(build_history(&data, goal))))
}

pub async fn get_recommendation(
    State(state): State<AppState>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> ApiResult<RecommendationResponse> {
    let Query(query) = query?;
    let data = state.data.lock().await;
    Ok(Json(ApiResponse::ok(recommendation(
        &data.profile,
        state.goal_formula,
        &query,
    ))))
}

pub async fn get_report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<ProgressReport> {
    let Query(query) = query?;
    let today = Local::now().date_naive();
    let data = state.data.lock().await;
    let goal = data.profile.daily_goal_ml(state.goal_formula);
    Ok(Json(ApiResponse::ok(progress_report_at(
        today,
        &data,
        goal,
        query.period,
    ))))
}

fn apply_profile_update(profile: &mut UserProfile, update: ProfileUpdate) -> Result<(), AppError> {
    if let Some(name) = update.name {
        profile.name = name.trim().to_string();
    }

    if let Some(gender) = update.gender {
        profile.gender = if gender.trim().is_empty() {
            None
        } else {
            Some(
                Gender::parse(&gender)
                    .ok_or_else(|| AppError::bad_request("gender must be 'male' or 'female'"))?,
            )
        };
    }

    if let Some(weight) = update.weight {
        profile.weight_kg = Some(positive(weight, "weight")?);
    }

    if let Some(height) = update.height {
        profile.height_cm = Some(positive(height, "height")?);
    }

    if let Some(level) = update.activity_level {
        let key = level.trim().to_ascii_lowercase();
        profile.activity_level = if key.is_empty() {
            None
        } else {
            Some(ActivityLevel::from_key(&key).ok_or_else(|| {
                AppError::bad_request(format!("unknown activity level '{level}'"))
            })?)
        };
    }

    Ok(())
}

fn positive(value: f64, field: &str) -> Result<f64, AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::bad_request(format!("{field} must be a positive number")))
    }
}

fn profile_response(profile: &UserProfile, formula: GoalFormula) -> ProfileResponse {
    ProfileResponse {
        name: profile.name.clone(),
        gender: profile.gender.map(Gender::as_str).unwrap_or_default().to_string(),
        weight: profile.weight_kg.unwrap_or(0.0),
        height: profile.height_cm.unwrap_or(0.0),
        activity_level: profile
            .activity_level
            .map(ActivityLevel::key)
            .unwrap_or_default()
            .to_string(),
        activity_label: profile
            .activity_level
            .map_or("Not set", ActivityLevel::label)
            .to_string(),
        daily_goal: profile.daily_goal_ml(formula),
        goal_formula: formula,
    }
}

fn water_data_at(now: NaiveDateTime, data: &AppData, formula: GoalFormula) -> WaterDataResponse {
    let today = now.date();
    let today_intake = data.total_on(today);
    let recommended_intake = data.profile.daily_goal_ml(formula);

    WaterDataResponse {
        today_intake,
        yesterday_intake: data.total_on(today - Duration::days(1)),
        recommended_intake,
        progress_percent: progress_percent(today_intake, recommended_intake),
        daily_quote: daily_quote(today),
        next_refresh: next_midnight(now).format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}

fn today_summary(now: NaiveDateTime, data: &AppData, formula: GoalFormula) -> TodaySummary {
    let today = now.date();
    let total_ml = data.total_on(today);
    let goal_ml = data.profile.daily_goal_ml(formula);

    TodaySummary {
        date: date_key(today),
        total_ml,
        entries: data.day(today).map_or(0, |log| log.entries.len()),
        goal_ml,
        remaining_ml: (f64::from(goal_ml) - total_ml).max(0.0),
        progress_percent: progress_percent(total_ml, goal_ml),
    }
}

fn recommendation(
    profile: &UserProfile,
    formula: GoalFormula,
    query: &RecommendationQuery,
) -> RecommendationResponse {
    let daily_goal = profile.daily_goal_ml(formula);
    let weather = weather_factor(query.temp_f, query.humidity);

    RecommendationResponse {
        formula,
        daily_goal_ml: daily_goal,
        weight_based_ml: daily_goal_ml(
            profile.gender.map_or("", Gender::as_str),
            profile.weight_kg.unwrap_or(0.0),
            profile.activity_level.map_or("", ActivityLevel::key),
        ),
        imperial: profile.recommended_intake(),
        activity_factor: profile.activity_multiplier(),
        weather_factor: (weather * 100.0).round() / 100.0,
        adjusted_goal_ml: (f64::from(daily_goal) * weather).round() as u32,
        tips: weather_tips(query.temp_f),
    }
}
