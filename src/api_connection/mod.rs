pub mod connection;
pub mod endpoints;

pub use connection::{
    ApiConnectionError, FoodClassifier, HuggingFaceClassifier, NutritionLookup, NutritionixClient,
};
pub use endpoints::NutritionRecord;
