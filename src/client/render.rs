//! Plain-text rendering of a session.

use super::Session;
use crate::models::NutritionRecord;
use std::fmt::Write as _;

/// Render the whole session: image, error, candidates and nutrition.
pub fn session(session: &Session, selected: usize) -> String {
    let mut out = String::new();

    match session.image() {
        Some(image) => {
            let _ = writeln!(
                out,
                "Your Meal: {} ({}, {} bytes)",
                image.name,
                image.mime,
                image.bytes.len()
            );
        }
        None => out.push_str("No image uploaded. Use `upload <path>` to add one.\n"),
    }

    if let Some(error) = session.error() {
        let _ = writeln!(out, "Error: {}", error);
    }

    let candidates = session.candidates();
    if !candidates.is_empty() {
        out.push_str("\nWhat food is this?\n");
        out.push_str(&candidate_list(candidates, selected));
    }

    if let Some(record) = session.nutrition() {
        out.push('\n');
        out.push_str(&nutrition(record));
    }

    out
}

/// Numbered candidate list with the current selection marked.
pub fn candidate_list(candidates: &[String], selected: usize) -> String {
    let mut out = String::new();
    for (i, name) in candidates.iter().enumerate() {
        let marker = if i == selected { "(*)" } else { "( )" };
        let _ = writeln!(out, "  {} {}. {}", marker, i + 1, name);
    }
    out
}

pub fn nutrition(record: &NutritionRecord) -> String {
    let name = if record.food_name.is_empty() {
        "N/A"
    } else {
        record.food_name.as_str()
    };

    let mut out = String::new();
    let _ = writeln!(out, "Nutritional Breakdown: {}", name);
    let _ = writeln!(out, "Serving Size: {}g", record.serving_size_grams);
    let _ = writeln!(
        out,
        "  Calories (kcal): {:<8} Protein (g): {:<8} Fat (g): {}",
        record.calories, record.protein_grams, record.fat_grams
    );
    let _ = writeln!(
        out,
        "  Carbs (g): {:<14} Fiber (g): {:<10} Sugar (g): {}",
        record.carbohydrates_grams, record.fiber_grams, record.sugar_grams
    );
    out
}
