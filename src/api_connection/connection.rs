use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::endpoints::{
    ClassificationLabel, NaturalNutrientsRequest, NaturalNutrientsResponse, NutritionRecord,
    DEFAULT_FOOD_CLASSIFIER_MODEL, HUGGINGFACE_INFERENCE_BASE_URL, NUTRITIONIX_BASE_URL,
    NUTRITIONIX_NATURAL_NUTRIENTS_PATH,
};

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
    #[error("Classifier returned no labels")]
    EmptyPrediction,
}

/// Natural-language nutrition lookup: a free-text query in, one record per
/// recognised food out.
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<NutritionRecord>, ApiConnectionError>;
}

/// Best-guess food label for an encoded image.
#[async_trait]
pub trait FoodClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<String, ApiConnectionError>;
}

async fn read_success_body(response: reqwest::Response) -> Result<String, ApiConnectionError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.text().await?)
    } else {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        Err(ApiConnectionError::ApiError { status, error_body })
    }
}

#[derive(Debug, Clone)]
pub struct NutritionixClient {
    http: Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl NutritionixClient {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: NUTRITIONIX_BASE_URL.to_string(),
            app_id: app_id.into(),
            app_key: app_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn natural_nutrients(
        &self,
        query: &str,
    ) -> Result<Vec<NutritionRecord>, ApiConnectionError> {
        let url = format!("{}{}", self.base_url, NUTRITIONIX_NATURAL_NUTRIENTS_PATH);
        debug!(%url, query, "Querying Nutritionix");

        let response = self
            .http
            .post(&url)
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.app_key)
            .json(&NaturalNutrientsRequest {
                query: query.to_string(),
            })
            .send()
            .await?;

        let body = read_success_body(response).await?;
        let parsed: NaturalNutrientsResponse = serde_json::from_str(&body)?;
        debug!(foods = parsed.foods.len(), "Nutritionix lookup complete");
        Ok(parsed.foods)
    }
}

#[async_trait]
impl NutritionLookup for NutritionixClient {
    async fn lookup(&self, query: &str) -> Result<Vec<NutritionRecord>, ApiConnectionError> {
        self.natural_nutrients(query).await
    }
}

#[derive(Debug, Clone)]
pub struct HuggingFaceClassifier {
    http: Client,
    base_url: String,
    model: String,
    api_token: String,
}

impl HuggingFaceClassifier {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: HUGGINGFACE_INFERENCE_BASE_URL.to_string(),
            model: DEFAULT_FOOD_CLASSIFIER_MODEL.to_string(),
            api_token: api_token.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn predict(&self, image: &[u8]) -> Result<Vec<ClassificationLabel>, ApiConnectionError> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        debug!(%url, bytes = image.len(), "Classifying image");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        let body = read_success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl FoodClassifier for HuggingFaceClassifier {
    async fn classify(&self, image: &[u8]) -> Result<String, ApiConnectionError> {
        let labels = self.predict(image).await?;
        let best = best_label(&labels).ok_or(ApiConnectionError::EmptyPrediction)?;
        debug!(label = %best.label, score = best.score, candidates = labels.len(), "Picked top label");
        Ok(humanize_label(&best.label))
    }
}

fn best_label(labels: &[ClassificationLabel]) -> Option<&ClassificationLabel> {
    labels.iter().max_by(|a, b| a.score.total_cmp(&b.score))
}

/// Food-101 labels are snake_case ("apple_pie"); the lookup wants plain words.
pub fn humanize_label(label: &str) -> String {
    label.replace('_', " ").trim().to_string()
}
