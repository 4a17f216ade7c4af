//! Recommended daily water intake.
//!
//! Two formulas are available. [`daily_goal_ml`] works from weight, gender and
//! activity in metric units. [`recommended_intake`] goes through pounds and
//! fluid ounces and reports both units. [`GoalFormula`] picks which one sets a
//! profile's daily goal.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Goal used when no usable body weight is on file.
pub const FALLBACK_GOAL_ML: u32 = 3000;

pub const ML_PER_OZ: f64 = 29.5735;

const MALE_ML_PER_KG: f64 = 35.0;
const DEFAULT_ML_PER_KG: f64 = 31.0;
const LBS_PER_KG: f64 = 2.20462;
const OZ_PER_LB: f64 = 0.67;
const FEMALE_OZ_FACTOR: f64 = 0.9;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GoalError {
    #[error("weight must be a positive number of kilograms, got {0}")]
    InvalidProfile(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    ExtraActive,
}

impl ActivityLevel {
    /// Exact, lowercase key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "sedentary" => Some(Self::Sedentary),
            "light" => Some(Self::Light),
            "moderate" => Some(Self::Moderate),
            "active" => Some(Self::Active),
            "extra_active" => Some(Self::ExtraActive),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::ExtraActive => "extra_active",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary",
            Self::Light => "Light Exercise",
            Self::Moderate => "Moderate Exercise",
            Self::Active => "Very Active",
            Self::ExtraActive => "Extra Active",
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.0,
            Self::Light => 1.1,
            Self::Moderate => 1.2,
            Self::Active => 1.3,
            Self::ExtraActive => 1.4,
        }
    }
}

/// Multiplier for an activity key; anything unrecognized counts as 1.0.
pub fn activity_multiplier(activity_level: &str) -> f64 {
    ActivityLevel::from_key(activity_level).map_or(1.0, ActivityLevel::multiplier)
}

/// Weight-based daily goal in whole milliliters.
///
/// `gender` must be exactly `"male"` to get the higher per-kilogram rate.
/// A weight that is not a positive finite number short-circuits to
/// [`FALLBACK_GOAL_ML`].
pub fn daily_goal_ml(gender: &str, weight_kg: f64, activity_level: &str) -> u32 {
    if !is_usable_weight(weight_kg) {
        return FALLBACK_GOAL_ML;
    }

    let rate = if gender == "male" {
        MALE_ML_PER_KG
    } else {
        DEFAULT_ML_PER_KG
    };

    (weight_kg * rate * activity_multiplier(activity_level)).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecommendedIntake {
    pub ounces: f64,
    pub milliliters: f64,
}

impl RecommendedIntake {
    pub fn fallback() -> Self {
        let milliliters = f64::from(FALLBACK_GOAL_ML);
        Self {
            ounces: round_tenth(milliliters / ML_PER_OZ),
            milliliters,
        }
    }
}

/// Imperial-intermediate recommendation, rejecting unusable weights.
///
/// `_height_cm` is accepted for call-site compatibility and does not affect
/// the result.
pub fn try_recommended_intake(
    weight_kg: f64,
    _height_cm: f64,
    gender: &str,
    activity_level: &str,
) -> Result<RecommendedIntake, GoalError> {
    if !is_usable_weight(weight_kg) {
        return Err(GoalError::InvalidProfile(weight_kg));
    }

    let base_oz = weight_kg * LBS_PER_KG * OZ_PER_LB;
    let gender_factor = if gender.eq_ignore_ascii_case("female") {
        FEMALE_OZ_FACTOR
    } else {
        1.0
    };
    let total_oz = base_oz * activity_multiplier(activity_level) * gender_factor;

    Ok(RecommendedIntake {
        ounces: round_tenth(total_oz),
        milliliters: round_tenth(total_oz * ML_PER_OZ),
    })
}

/// Same as [`try_recommended_intake`] but falls back to
/// [`RecommendedIntake::fallback`] instead of failing.
pub fn recommended_intake(
    weight_kg: f64,
    height_cm: f64,
    gender: &str,
    activity_level: &str,
) -> RecommendedIntake {
    try_recommended_intake(weight_kg, height_cm, gender, activity_level)
        .unwrap_or_else(|_| RecommendedIntake::fallback())
}

/// Temperature (°F) and humidity (%) adjustment. Missing readings count as neutral.
pub fn weather_factor(temp_f: Option<f64>, humidity: Option<f64>) -> f64 {
    let mut temp_factor = 1.0;
    if let Some(temp) = temp_f {
        if temp > 80.0 {
            temp_factor += 0.1;
        }
        if temp > 90.0 {
            temp_factor += 0.1;
        }
    }

    let mut humidity_factor = 1.0;
    if let Some(humidity) = humidity {
        if humidity > 60.0 {
            humidity_factor += 0.05;
        }
        if humidity > 80.0 {
            humidity_factor += 0.05;
        }
    }

    temp_factor * humidity_factor
}

/// Share of the goal reached, as a whole percentage capped at 100.
pub fn progress_percent(current_ml: f64, goal_ml: u32) -> u32 {
    if goal_ml == 0 || !current_ml.is_finite() || current_ml <= 0.0 {
        return 0;
    }
    (current_ml / f64::from(goal_ml) * 100.0).min(100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalFormula {
    #[default]
    Weight,
    Imperial,
}

impl FromStr for GoalFormula {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weight" => Ok(Self::Weight),
            "imperial" => Ok(Self::Imperial),
            other => Err(format!("unknown goal formula '{other}'")),
        }
    }
}

impl fmt::Display for GoalFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weight => f.write_str("weight"),
            Self::Imperial => f.write_str("imperial"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
}

impl UserProfile {
    pub fn daily_goal_ml(&self, formula: GoalFormula) -> u32 {
        match formula {
            GoalFormula::Weight => daily_goal_ml(
                self.gender_key(),
                self.weight_kg.unwrap_or(0.0),
                self.activity_key(),
            ),
            GoalFormula::Imperial => self.recommended_intake().milliliters.round() as u32,
        }
    }

    pub fn recommended_intake(&self) -> RecommendedIntake {
        recommended_intake(
            self.weight_kg.unwrap_or(0.0),
            self.height_cm.unwrap_or(0.0),
            self.gender_key(),
            self.activity_key(),
        )
    }

    pub fn activity_multiplier(&self) -> f64 {
        activity_multiplier(self.activity_key())
    }

    fn gender_key(&self) -> &'static str {
        self.gender.map_or("", Gender::as_str)
    }

    fn activity_key(&self) -> &'static str {
        self.activity_level.map_or("", ActivityLevel::key)
    }
}

fn is_usable_weight(weight_kg: f64) -> bool {
    weight_kg.is_finite() && weight_kg > 0.0
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_weight_returns_fallback() {
        for weight in [0.0, -1.0, -70.0, f64::NAN, f64::NEG_INFINITY] {
            assert_eq!(daily_goal_ml("male", weight, "active"), FALLBACK_GOAL_ML);
        }
        assert_eq!(UserProfile::default().daily_goal_ml(GoalFormula::Weight), 3000);
    }

    #[test]
    fn weight_formula_known_values() {
        assert_eq!(daily_goal_ml("male", 70.0, "moderate"), 2940);
        assert_eq!(daily_goal_ml("female", 60.0, "sedentary"), 1860);
        assert_eq!(daily_goal_ml("male", 80.0, "extra_active"), 3920);
    }

    #[test]
    fn weight_formula_gender_match_is_exact() {
        assert_eq!(daily_goal_ml("Male", 70.0, "sedentary"), 2170);
        assert_eq!(daily_goal_ml("", 70.0, "sedentary"), 2170);
        assert_eq!(daily_goal_ml("male", 70.0, "sedentary"), 2450);
    }

    #[test]
    fn unknown_activity_uses_unit_multiplier() {
        for key in ["", "couch", "MODERATE", "very_active"] {
            assert_eq!(daily_goal_ml("male", 70.0, key), (70.0_f64 * 35.0).round() as u32);
            assert_eq!(activity_multiplier(key), 1.0);
        }
    }

    #[test]
    fn imperial_formula_ignores_gender_case() {
        let upper = recommended_intake(60.0, 165.0, "FEMALE", "light");
        let lower = recommended_intake(60.0, 165.0, "female", "light");
        assert_eq!(upper, lower);

        let male = recommended_intake(60.0, 165.0, "male", "light");
        assert!(lower.ounces < male.ounces);
    }

    #[test]
    fn imperial_formula_known_value() {
        // 70 kg -> 154.3234 lb -> 103.3967 oz, x1.2 -> 124.076 oz
        let intake = recommended_intake(70.0, 175.0, "male", "moderate");
        assert_eq!(intake.ounces, 124.1);
        assert_eq!(intake.milliliters, 3669.4);
    }

    #[test]
    fn imperial_units_agree_within_rounding() {
        let tolerance = 0.05 * ML_PER_OZ + 0.05;
        for weight in [45.0, 58.5, 70.0, 92.3, 130.0] {
            for activity in ["sedentary", "light", "moderate", "active", "extra_active"] {
                let intake = recommended_intake(weight, 170.0, "female", activity);
                assert!((intake.milliliters - intake.ounces * ML_PER_OZ).abs() <= tolerance);
            }
        }
    }

    #[test]
    fn imperial_height_is_ignored() {
        assert_eq!(
            recommended_intake(70.0, 150.0, "male", "active"),
            recommended_intake(70.0, 200.0, "male", "active"),
        );
    }

    #[test]
    fn imperial_invalid_weight() {
        assert_eq!(
            try_recommended_intake(0.0, 170.0, "male", "light"),
            Err(GoalError::InvalidProfile(0.0))
        );
        let fallback = recommended_intake(-3.0, 170.0, "male", "light");
        assert_eq!(fallback.milliliters, 3000.0);
        assert_eq!(fallback.ounces, 101.4);
    }

    #[test]
    fn formulas_are_repeatable() {
        let first = (
            daily_goal_ml("female", 64.2, "active"),
            recommended_intake(64.2, 168.0, "female", "active"),
        );
        for _ in 0..10 {
            assert_eq!(daily_goal_ml("female", 64.2, "active"), first.0);
            assert_eq!(recommended_intake(64.2, 168.0, "female", "active"), first.1);
        }
    }

    #[test]
    fn weather_factor_steps() {
        assert_eq!(weather_factor(None, None), 1.0);
        assert_eq!(weather_factor(Some(80.0), Some(60.0)), 1.0);
        assert!((weather_factor(Some(85.0), None) - 1.1).abs() < 1e-9);
        assert!((weather_factor(Some(95.0), Some(85.0)) - 1.2 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(progress_percent(0.0, 2000), 0);
        assert_eq!(progress_percent(500.0, 2000), 25);
        assert_eq!(progress_percent(5000.0, 2000), 100);
        assert_eq!(progress_percent(500.0, 0), 0);
    }

    #[test]
    fn profile_goal_follows_formula() {
        let profile = UserProfile {
            name: "Sam".into(),
            gender: Some(Gender::Male),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            activity_level: Some(ActivityLevel::Moderate),
        };
        assert_eq!(profile.daily_goal_ml(GoalFormula::Weight), 2940);
        assert_eq!(profile.daily_goal_ml(GoalFormula::Imperial), 3669);
    }

    #[test]
    fn goal_formula_parses() {
        assert_eq!("Imperial".parse::<GoalFormula>(), Ok(GoalFormula::Imperial));
        assert_eq!("weight".parse::<GoalFormula>(), Ok(GoalFormula::Weight));
        assert!("metric".parse::<GoalFormula>().is_err());
    }
}
