use crate::api_connection::endpoints::NutritionRecord;
use crate::feedback::MacroTotals;

/// Plain-text block with the summed calories and macros.
pub fn nutrition_summary(totals: &MacroTotals) -> String {
    format!(
        "Calories: {} kcal\nProtein: {:.1}g\nFat: {:.1}g\nSugar: {:.1}g",
        totals.calories.trunc() as i64,
        totals.protein,
        totals.fat,
        totals.sugar
    )
}

/// Drops the characters legacy Telegram Markdown treats as entity markers,
/// so free text can sit inside `*...*` without breaking the message.
pub fn markdown_safe(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '_' | '`' | '['))
        .collect()
}

/// Markdown reply combining the nutrition summary and the feedback text.
/// `food` names the dish in the heading when the meal came from a photo.
pub fn render_meal_report(food: Option<&str>, foods: &[NutritionRecord], advice: &str) -> String {
    let heading = match food {
        Some(food) => format!("🧾 *Nutrition Summary for {}:*", markdown_safe(food)),
        None => "🧾 *Nutrition Summary:*".to_string(),
    };
    let summary = nutrition_summary(&MacroTotals::from_records(foods));
    format!("{}\n```{}```\n\n{}", heading, summary, advice)
}
