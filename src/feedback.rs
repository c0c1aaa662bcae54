use rand::Rng;
use std::fmt;
use tracing::debug;

use crate::api_connection::endpoints::NutritionRecord;
use crate::ingredient_parser::IngredientRecord;

pub const FEEDBACK_HEADER: &str = "🧠 *Nutrition Tips Based on Your Meal:*";

pub const MOTIVATIONAL_QUOTES: [&str; 5] = [
    "Remember, every healthy choice is a step toward a happier you! 🌟",
    "Small changes can make a big impact. Keep it up! 💪",
    "Your body deserves the best fuel — treat it well! 🥦",
    "Balance is key: enjoy your food and nourish your soul. 🍽️",
    "Health is a journey, not a sprint. One step at a time! 🚶‍♀️",
];

pub const LIGHT_MEAL_MAX_KCAL: f64 = 400.0;
pub const BALANCED_MEAL_MAX_KCAL: f64 = 700.0;
pub const LOW_PROTEIN_G: f64 = 10.0;
pub const HIGH_PROTEIN_G: f64 = 20.0;
pub const HIGH_FAT_G: f64 = 30.0;
pub const LOW_FAT_G: f64 = 10.0;
pub const HIGH_SUGAR_G: f64 = 25.0;
pub const LOW_SUGAR_G: f64 = 5.0;

pub const VEGETABLE_KEYWORDS: [&str; 8] = [
    "vegetable", "salad", "spinach", "broccoli", "carrot", "lettuce", "kale", "cucumber",
];

pub const LIGHT_MEAL: &str =
    "🥣 That’s a light meal — great if you’re having a snack or watching your intake.";
pub const BALANCED_MEAL: &str = "✅ This seems like a well-balanced meal in terms of calories.";
pub const HIGH_CALORIE_MEAL: &str = "🍽️ A high-calorie meal — be sure it fits into your daily goals!";
pub const LOW_PROTEIN: &str =
    "💡 You could boost your protein with eggs, beans, yogurt, or lean meat.";
pub const HIGH_PROTEIN: &str =
    "💪 Great protein intake — helps keep you full and supports your muscles!";
pub const HIGH_FAT: &str = "⚠️ A bit high in fat — try grilling or steaming instead of frying.";
pub const LOW_FAT: &str = "👍 Low in fat — clean and light!";
pub const HIGH_SUGAR: &str =
    "🍭 Watch out for the sugar — consider reducing sweets or sugary drinks.";
pub const LOW_SUGAR: &str = "✅ Low sugar — excellent for balanced energy levels!";
pub const ADD_VEGETABLES: &str =
    "🌱 Adding veggies next time would be great for fiber and nutrients!";

/// Sums of the macros the feedback rules look at.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub sugar: f64,
}

impl MacroTotals {
    pub fn from_records(records: &[NutritionRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, record| Self {
            calories: acc.calories + record.calories(),
            protein: acc.protein + record.protein(),
            fat: acc.fat + record.total_fat(),
            sugar: acc.sugar + record.sugars(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackReport {
    pub fragments: Vec<&'static str>,
    pub closing: &'static str,
}

impl FeedbackReport {
    /// Applies the threshold rules in their fixed order, then draws the
    /// closing line from [`MOTIVATIONAL_QUOTES`].
    pub fn build<R: Rng + ?Sized>(
        total_calories: f64,
        nutrition: &[NutritionRecord],
        rng: &mut R,
    ) -> Self {
        let totals = MacroTotals::from_records(nutrition);

        let mut fragments = vec![calorie_fragment(total_calories)];
        fragments.extend(protein_fragment(totals.protein));
        fragments.extend(fat_fragment(totals.fat));
        fragments.extend(sugar_fragment(totals.sugar));
        if !contains_vegetables(nutrition) {
            fragments.push(ADD_VEGETABLES);
        }

        let closing = MOTIVATIONAL_QUOTES[rng.gen_range(0..MOTIVATIONAL_QUOTES.len())];
        Self { fragments, closing }
    }
}

impl fmt::Display for FeedbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", FEEDBACK_HEADER)?;
        for fragment in &self.fragments {
            writeln!(f, "{}", fragment)?;
        }
        write!(f, "{}", self.closing)
    }
}

pub fn generate_feedback<R: Rng + ?Sized>(
    ingredients: &[IngredientRecord],
    total_calories: f64,
    nutrition: &[NutritionRecord],
    rng: &mut R,
) -> String {
    let report = FeedbackReport::build(total_calories, nutrition, rng);
    debug!(
        ingredients = ingredients.len(),
        foods = nutrition.len(),
        total_calories,
        fragments = report.fragments.len(),
        "Generated meal feedback"
    );
    report.to_string()
}

pub fn calorie_fragment(total_calories: f64) -> &'static str {
    if total_calories < LIGHT_MEAL_MAX_KCAL {
        LIGHT_MEAL
    } else if total_calories < BALANCED_MEAL_MAX_KCAL {
        BALANCED_MEAL
    } else {
        HIGH_CALORIE_MEAL
    }
}

// Mid-range values are unremarkable and get no fragment.
pub fn protein_fragment(total_protein: f64) -> Option<&'static str> {
    if total_protein < LOW_PROTEIN_G {
        Some(LOW_PROTEIN)
    } else if total_protein > HIGH_PROTEIN_G {
        Some(HIGH_PROTEIN)
    } else {
        None
    }
}

pub fn fat_fragment(total_fat: f64) -> Option<&'static str> {
    if total_fat > HIGH_FAT_G {
        Some(HIGH_FAT)
    } else if total_fat < LOW_FAT_G {
        Some(LOW_FAT)
    } else {
        None
    }
}

pub fn sugar_fragment(total_sugar: f64) -> Option<&'static str> {
    if total_sugar > HIGH_SUGAR_G {
        Some(HIGH_SUGAR)
    } else if total_sugar < LOW_SUGAR_G {
        Some(LOW_SUGAR)
    } else {
        None
    }
}

pub fn contains_vegetables(nutrition: &[NutritionRecord]) -> bool {
    nutrition.iter().any(|record| {
        let name = record.food_name.to_lowercase();
        VEGETABLE_KEYWORDS.iter().any(|keyword| name.contains(keyword))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn food(name: &str, calories: f64, protein: f64, fat: f64, sugars: f64) -> NutritionRecord {
        NutritionRecord {
            food_name: name.to_string(),
            nf_calories: Some(calories),
            nf_protein: Some(protein),
            nf_total_fat: Some(fat),
            nf_sugars: Some(sugars),
        }
    }

    fn report_for(total_calories: f64, nutrition: &[NutritionRecord]) -> FeedbackReport {
        FeedbackReport::build(total_calories, nutrition, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_calorie_boundaries() {
        assert_eq!(calorie_fragment(399.9), LIGHT_MEAL);
        assert_eq!(calorie_fragment(400.0), BALANCED_MEAL);
        assert_eq!(calorie_fragment(699.9), BALANCED_MEAL);
        assert_eq!(calorie_fragment(700.0), HIGH_CALORIE_MEAL);
        assert_eq!(calorie_fragment(0.0), LIGHT_MEAL);
    }

    #[test]
    fn test_protein_mid_range_is_silent() {
        assert_eq!(protein_fragment(15.0), None);
        assert_eq!(protein_fragment(10.0), None);
        assert_eq!(protein_fragment(20.0), None);
        assert_eq!(protein_fragment(9.9), Some(LOW_PROTEIN));
        assert_eq!(protein_fragment(20.1), Some(HIGH_PROTEIN));
    }

    #[test]
    fn test_fat_and_sugar_mid_ranges_are_silent() {
        assert_eq!(fat_fragment(10.0), None);
        assert_eq!(fat_fragment(30.0), None);
        assert_eq!(fat_fragment(30.5), Some(HIGH_FAT));
        assert_eq!(fat_fragment(9.5), Some(LOW_FAT));
        assert_eq!(sugar_fragment(5.0), None);
        assert_eq!(sugar_fragment(25.0), None);
        assert_eq!(sugar_fragment(26.0), Some(HIGH_SUGAR));
        assert_eq!(sugar_fragment(4.0), Some(LOW_SUGAR));
    }

    #[test]
    fn test_totals_treat_missing_fields_as_zero() {
        let records = vec![
            food("egg", 78.0, 6.3, 5.3, 0.6),
            NutritionRecord {
                food_name: "toast".to_string(),
                nf_calories: Some(75.0),
                ..Default::default()
            },
        ];
        let totals = MacroTotals::from_records(&records);
        assert_eq!(totals.calories, 153.0);
        assert!((totals.protein - 6.3).abs() < 1e-9);
        assert!((totals.fat - 5.3).abs() < 1e-9);
        assert!((totals.sugar - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_rules_fire_in_fixed_order() {
        let records = vec![food("bacon cheeseburger", 900.0, 45.0, 50.0, 30.0)];
        let report = report_for(900.0, &records);
        assert_eq!(
            report.fragments,
            vec![HIGH_CALORIE_MEAL, HIGH_PROTEIN, HIGH_FAT, HIGH_SUGAR, ADD_VEGETABLES]
        );
    }

    #[test]
    fn test_unremarkable_meal_with_vegetables() {
        let records = vec![food("Grilled Chicken Salad", 450.0, 15.0, 20.0, 10.0)];
        let report = report_for(450.0, &records);
        assert_eq!(report.fragments, vec![BALANCED_MEAL]);
    }

    #[test]
    fn test_vegetable_keywords_match_case_insensitively() {
        assert!(contains_vegetables(&[food("Steamed BROCCOLI", 0.0, 0.0, 0.0, 0.0)]));
        assert!(contains_vegetables(&[
            food("rice", 0.0, 0.0, 0.0, 0.0),
            food("baby carrots", 0.0, 0.0, 0.0, 0.0),
        ]));
        assert!(!contains_vegetables(&[food("white rice", 0.0, 0.0, 0.0, 0.0)]));
        assert!(!contains_vegetables(&[]));
    }

    #[test]
    fn test_output_shape() {
        let records = vec![food("toast", 75.0, 2.6, 1.0, 1.5)];
        let mut rng = StdRng::seed_from_u64(42);
        let feedback = generate_feedback(&[], 75.0, &records, &mut rng);

        let lines: Vec<&str> = feedback.lines().collect();
        assert_eq!(lines[0], FEEDBACK_HEADER);
        let last = *lines.last().unwrap();
        assert!(MOTIVATIONAL_QUOTES.contains(&last));
        assert_eq!(
            MOTIVATIONAL_QUOTES.iter().filter(|quote| feedback.contains(*quote)).count(),
            1
        );
        assert_eq!(
            &lines[1..lines.len() - 1],
            &[LIGHT_MEAL, LOW_PROTEIN, LOW_FAT, LOW_SUGAR, ADD_VEGETABLES]
        );
    }

    #[test]
    fn test_same_seed_same_feedback() {
        let records = vec![food("pasta", 550.0, 18.0, 12.0, 6.0)];
        let first = generate_feedback(&[], 550.0, &records, &mut StdRng::seed_from_u64(3));
        let second = generate_feedback(&[], 550.0, &records, &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_nutrition_list() {
        let report = report_for(0.0, &[]);
        assert_eq!(
            report.fragments,
            vec![LIGHT_MEAL, LOW_PROTEIN, LOW_FAT, LOW_SUGAR, ADD_VEGETABLES]
        );
    }
}
