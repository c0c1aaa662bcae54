use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

pub const DEFAULT_QUANTITY: f64 = 1.0;
pub const PLACEHOLDER_UNIT: &str = "unit";

// Commas and the standalone words "with" / "and". Word boundaries keep
// "sandwich" and "candy" in one piece.
static SEGMENT_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",|\bwith\b|\band\b").expect("delimiter pattern is valid"));

// Measures that may be glued to a number ("200g"). A bare "200g" has no
// food name and yields no record; any other glued word ("3pancakes") is
// the name itself.
const GLUED_MEASURES: &[&str] = &["g", "kg", "mg", "ml", "l", "oz", "lb", "lbs"];

const NUMBER_WORDS: &[(&str, f64)] = &[
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngredientRecord {
    pub quantity: f64,
    pub unit: String,
    pub name: String,
}

impl IngredientRecord {
    /// A single food with no known quantity or unit, e.g. a classifier label.
    pub fn single(name: &str) -> Self {
        Self {
            quantity: DEFAULT_QUANTITY,
            unit: PLACEHOLDER_UNIT.to_string(),
            name: name.trim().to_string(),
        }
    }
}

impl fmt::Display for IngredientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.quantity, self.unit, self.name)
    }
}

/// Splits a free-text meal description into ingredient records.
///
/// Each comma/"with"/"and" delimited segment is read as
/// `[quantity] [unit] name`. The unit is only taken when a name word
/// still follows it, so `"2 eggs"` is `{2, "unit", "eggs"}` while
/// `"2 boiled eggs"` is `{2, "boiled", "eggs"}`. Segments without a
/// name are dropped; the function never fails.
pub fn parse_ingredients(text: &str) -> Vec<IngredientRecord> {
    let lowered = text.to_lowercase();
    SEGMENT_DELIMITERS
        .split(&lowered)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(parse_segment)
        .collect()
}

/// Renders records as the natural-language query sent to the nutrition lookup.
pub fn ingredients_query(ingredients: &[IngredientRecord]) -> String {
    ingredients
        .iter()
        .map(IngredientRecord::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_segment(segment: &str) -> Option<IngredientRecord> {
    let (first, after_first) = split_first_token(segment)?;

    let (quantity, glued_unit, rest) = match leading_quantity(first) {
        Some((quantity, glued_unit)) => (quantity, glued_unit, after_first),
        None => (DEFAULT_QUANTITY, None, segment.trim()),
    };

    let (unit, name) = match glued_unit {
        Some(word) if rest.is_empty() && !GLUED_MEASURES.contains(&word) => {
            (PLACEHOLDER_UNIT, word)
        }
        Some(unit) => (unit, rest),
        None => split_unit(rest),
    };

    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some(IngredientRecord {
        quantity,
        unit: unit.to_string(),
        name: name.to_string(),
    })
}

/// First whitespace-delimited token and the trimmed remainder.
fn split_first_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.find(char::is_whitespace) {
        Some(idx) => Some((&text[..idx], text[idx..].trim_start())),
        None => Some((text, "")),
    }
}

/// Classifies a leading token as a quantity. Returns the value and, for
/// tokens like `200g`, the unit glued to the number.
fn leading_quantity(token: &str) -> Option<(f64, Option<&str>)> {
    if let Some(&(_, value)) = NUMBER_WORDS.iter().find(|(word, _)| *word == token) {
        return Some((value, None));
    }

    let digits_end = token
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(token.len());
    let (numeric, suffix) = token.split_at(digits_end);
    if !is_decimal(numeric) {
        return None;
    }

    let glued_unit = if suffix.is_empty() {
        None
    } else if suffix.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Some(suffix)
    } else {
        return None;
    };

    let quantity = numeric
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(DEFAULT_QUANTITY);

    Some((quantity, glued_unit))
}

// Matches `\d*\.?\d+` over the whole token.
fn is_decimal(token: &str) -> bool {
    let (int_part, frac_part) = token.split_once('.').unwrap_or(("", token));
    !frac_part.is_empty()
        && int_part.chars().all(|c| c.is_ascii_digit())
        && frac_part.chars().all(|c| c.is_ascii_digit())
}

fn split_unit(rest: &str) -> (&str, &str) {
    match split_first_token(rest) {
        Some((unit, name)) if !name.is_empty() => (unit, name),
        _ => (PLACEHOLDER_UNIT, rest),
    }
}
