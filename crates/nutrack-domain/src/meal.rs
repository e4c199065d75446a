//! Meal logging wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{AccountId, FoodId, MealId};
use crate::nutrition::NutritionalData;

/// Which daily meal slot an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// One food within a meal, with the serving multiplier applied client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealFoodItem {
    pub food_id: FoodId,
    pub food_name: String,
    pub servings: f64,
    pub nutrition: NutritionalData,
}

/// A logged meal and its pre-summed nutrition totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: MealId,
    pub user_id: AccountId,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub foods: Vec<MealFoodItem>,
    pub total_nutrition: NutritionalData,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
