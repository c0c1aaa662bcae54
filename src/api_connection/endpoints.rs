use serde::{Deserialize, Serialize};

pub const NUTRITIONIX_BASE_URL: &str = "https://trackapi.nutritionix.com";
pub const NUTRITIONIX_NATURAL_NUTRIENTS_PATH: &str = "/v2/natural/nutrients";

pub const HUGGINGFACE_INFERENCE_BASE_URL: &str = "https://router.huggingface.co/hf-inference";
pub const DEFAULT_FOOD_CLASSIFIER_MODEL: &str = "nateraw/vit-base-food101";

#[derive(Debug, Serialize, Clone)]
pub struct NaturalNutrientsRequest {
    pub query: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NaturalNutrientsResponse {
    #[serde(default)]
    pub foods: Vec<NutritionRecord>,
}

/// One food as returned by the Nutritionix natural-language endpoint.
/// Missing or `null` nutrient fields read as zero through the accessors.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NutritionRecord {
    #[serde(default)]
    pub food_name: String,
    #[serde(default)]
    pub nf_calories: Option<f64>,
    #[serde(default)]
    pub nf_protein: Option<f64>,
    #[serde(default)]
    pub nf_total_fat: Option<f64>,
    #[serde(default)]
    pub nf_sugars: Option<f64>,
}

impl NutritionRecord {
    pub fn calories(&self) -> f64 {
        self.nf_calories.unwrap_or(0.0)
    }

    pub fn protein(&self) -> f64 {
        self.nf_protein.unwrap_or(0.0)
    }

    pub fn total_fat(&self) -> f64 {
        self.nf_total_fat.unwrap_or(0.0)
    }

    pub fn sugars(&self) -> f64 {
        self.nf_sugars.unwrap_or(0.0)
    }
}

/// A single label/score pair from the image-classification endpoint.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClassificationLabel {
    pub label: String,
    pub score: f64,
}
