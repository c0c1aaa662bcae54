use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use crate::api_connection::connection::{FoodClassifier, NutritionLookup};
use crate::api_connection::endpoints::NutritionRecord;
use crate::conversation::{conversational_reply, random_quote};
use crate::feedback::{generate_feedback, MacroTotals};
use crate::ingredient_parser::{ingredients_query, parse_ingredients, IngredientRecord};
use crate::report::{markdown_safe, render_meal_report};

pub const START_MESSAGE: &str = "👋 Hi! Send me a food photo or type what you ate!";
pub const HELP_MESSAGE: &str =
    "📝 Send a photo or write something like:\n'I ate 2 boiled eggs and toast.'";
pub const UNKNOWN_COMMAND_MESSAGE: &str = "❓ Unknown command. Use /help to learn how to use me!";
pub const NOT_UNDERSTOOD_MESSAGE: &str =
    "❌ I couldn't understand. Please describe your meal more clearly.";
pub const TEXT_NOT_FOUND_MESSAGE: &str = "⚠️ Sorry, I couldn't find nutrition data for that.";
pub const PHOTO_NOT_FOUND_MESSAGE: &str = "⚠️ Couldn't find nutrition info.";
pub const NOT_RECOGNISED_MESSAGE: &str =
    "🤔 I couldn't recognise the food in that photo. Try another picture or describe the meal in text.";
pub const PHOTO_UNAVAILABLE_MESSAGE: &str =
    "📷 Photo analysis isn't available right now. Please describe your meal in text instead.";

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// Whether `text` uses Telegram's legacy Markdown markup.
    pub markdown: bool,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: false,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: true,
        }
    }
}

/// Transport-independent request handling: turns one inbound chat event
/// into the replies to send back.
///
/// The random source behind quotes and small-talk replies is the only
/// state; it is locked only for the duration of a single pick.
pub struct CalorieCoach {
    nutrition: Arc<dyn NutritionLookup>,
    classifier: Option<Arc<dyn FoodClassifier>>,
    rng: Mutex<StdRng>,
}

impl CalorieCoach {
    pub fn new(nutrition: Arc<dyn NutritionLookup>) -> Self {
        Self {
            nutrition,
            classifier: None,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn FoodClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    fn with_rng_locked<T>(&self, pick: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        pick(&mut rng)
    }

    pub fn start(&self) -> Reply {
        Reply::plain(START_MESSAGE)
    }

    pub fn help(&self) -> Reply {
        Reply::plain(HELP_MESSAGE)
    }

    pub fn quote(&self) -> Reply {
        Reply::plain(self.with_rng_locked(|rng| random_quote(rng)))
    }

    pub fn unknown_command(&self) -> Reply {
        Reply::plain(UNKNOWN_COMMAND_MESSAGE)
    }

    pub async fn respond_to_text(&self, text: &str) -> Vec<Reply> {
        if let Some(reply) = self.with_rng_locked(|rng| conversational_reply(text, rng)) {
            return vec![Reply::plain(reply)];
        }

        let ingredients = parse_ingredients(text);
        if ingredients.is_empty() {
            info!("No ingredients found in message");
            return vec![Reply::plain(NOT_UNDERSTOOD_MESSAGE)];
        }

        let query = ingredients_query(&ingredients);
        info!(ingredients = ingredients.len(), %query, "Analyzing meal description");

        match self.find_nutrition(&query).await {
            Some(foods) => vec![self.meal_report(None, &ingredients, &foods)],
            None => vec![Reply::plain(TEXT_NOT_FOUND_MESSAGE)],
        }
    }

    pub async fn respond_to_photo(&self, image: &[u8]) -> Vec<Reply> {
        let Some(classifier) = &self.classifier else {
            warn!("Photo received but no classifier is configured");
            return vec![Reply::plain(PHOTO_UNAVAILABLE_MESSAGE)];
        };

        let food_name = match classifier.classify(image).await {
            Ok(label) if !label.trim().is_empty() => label.trim().to_string(),
            Ok(_) => {
                warn!("Classifier returned an empty label");
                return vec![Reply::plain(NOT_RECOGNISED_MESSAGE)];
            }
            Err(e) => {
                warn!(error = %e, "Image classification failed");
                return vec![Reply::plain(NOT_RECOGNISED_MESSAGE)];
            }
        };
        info!(food = %food_name, "Classified photo");

        let mut replies = vec![Reply::markdown(format!(
            "📸 I think this is *{}*. Let me analyze it...",
            markdown_safe(&food_name)
        ))];

        match self.find_nutrition(&food_name).await {
            Some(foods) => {
                let ingredients = [IngredientRecord::single(&food_name)];
                replies.push(self.meal_report(Some(&food_name), &ingredients, &foods));
            }
            None => replies.push(Reply::plain(PHOTO_NOT_FOUND_MESSAGE)),
        }
        replies
    }

    /// Lookup failures and empty results both read as "not found"; the
    /// status code is only logged.
    async fn find_nutrition(&self, query: &str) -> Option<Vec<NutritionRecord>> {
        match self.nutrition.lookup(query).await {
            Ok(foods) if !foods.is_empty() => Some(foods),
            Ok(_) => {
                info!(query, "Nutrition lookup returned no foods");
                None
            }
            Err(e) => {
                warn!(query, error = %e, "Nutrition lookup failed");
                None
            }
        }
    }

    fn meal_report(
        &self,
        food: Option<&str>,
        ingredients: &[IngredientRecord],
        foods: &[NutritionRecord],
    ) -> Reply {
        let total_calories = MacroTotals::from_records(foods).calories;
        let advice =
            self.with_rng_locked(|rng| generate_feedback(ingredients, total_calories, foods, rng));
        Reply::markdown(render_meal_report(food, foods, &advice))
    }
}
