//! Calorie estimation from a free-text meal description.

use crate::db::FoodItem;

/// Totals for every reference food found in a description
#[derive(Debug, Clone, PartialEq)]
pub struct CalorieEstimate {
    pub found_foods: Vec<String>,
    pub calories: f64,
    pub protein: f64,
    pub fats: f64,
    pub carbs: f64,
}

/// Sum the nutrition of every food whose name occurs in `text`.
///
/// Matching is a case-insensitive substring test per food, so overlapping
/// names (e.g. "йогурт" inside "греческий йогурт") each count. Returns `None`
/// when nothing matched.
pub fn estimate_calories(text: &str, foods: &[FoodItem]) -> Option<CalorieEstimate> {
    let text = text.to_lowercase();

    let mut estimate = CalorieEstimate {
        found_foods: Vec::new(),
        calories: 0.0,
        protein: 0.0,
        fats: 0.0,
        carbs: 0.0,
    };

    for food in foods.iter().filter(|food| text.contains(food.name.as_str())) {
        estimate.found_foods.push(food.name.clone());
        estimate.calories += food.calories;
        estimate.protein += food.protein;
        estimate.fats += food.fats;
        estimate.carbs += food.carbs;
    }

    if estimate.found_foods.is_empty() {
        None
    } else {
        Some(estimate)
    }
}
