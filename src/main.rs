use anyhow::{anyhow, Context, Result};
use calorie_coach::api_connection::connection::{
    FoodClassifier, HuggingFaceClassifier, NutritionixClient,
};
use calorie_coach::cli::{parse_args, Command};
use calorie_coach::coach::CalorieCoach;
use calorie_coach::config::{
    ClassifierConfig, Config, NutritionixCredentials, HF_API_TOKEN_ENV_VAR,
};
use calorie_coach::telegram;
use std::path::Path;
use std::sync::Arc;
use teloxide::Bot;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "calorie_coach=debug,teloxide=info,warn"
    } else {
        "calorie_coach=info,teloxide=warn,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
}

fn nutritionix_client(credentials: &NutritionixCredentials) -> NutritionixClient {
    NutritionixClient::new(&credentials.app_id, &credentials.app_key)
}

fn food_classifier(config: &ClassifierConfig) -> HuggingFaceClassifier {
    HuggingFaceClassifier::new(&config.api_token).with_model(&config.model)
}

async fn run_bot() -> Result<()> {
    let config = Config::from_env().context("Bot configuration is incomplete")?;

    let mut coach = CalorieCoach::new(Arc::new(nutritionix_client(&config.nutritionix)));
    match &config.classifier {
        Some(classifier) => {
            info!(model = %classifier.model, "Photo analysis enabled");
            coach = coach.with_classifier(Arc::new(food_classifier(classifier)));
        }
        None => info!(
            "{} not set; photo analysis disabled",
            HF_API_TOKEN_ENV_VAR
        ),
    }

    let bot = Bot::new(config.bot_token);
    telegram::run(bot, Arc::new(coach)).await;
    Ok(())
}

async fn analyze(text: &str) -> Result<()> {
    let credentials =
        NutritionixCredentials::from_env().context("Nutritionix credentials are required")?;
    let coach = CalorieCoach::new(Arc::new(nutritionix_client(&credentials)));

    for reply in coach.respond_to_text(text).await {
        println!("{}\n", reply.text);
    }
    Ok(())
}

async fn classify(image_path: &Path) -> Result<()> {
    let config = ClassifierConfig::from_env()
        .ok_or_else(|| anyhow!("{} must be set to classify images", HF_API_TOKEN_ENV_VAR))?;
    let image = fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read image file '{}'", image_path.display()))?;

    let label = food_classifier(&config)
        .classify(&image)
        .await
        .with_context(|| format!("Failed to classify '{}'", image_path.display()))?;
    println!("{}", label);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli_args = parse_args();
    init_tracing(cli_args.verbose);

    match cli_args.command {
        Command::Run => run_bot().await,
        Command::Analyze { text } => analyze(&text).await,
        Command::Classify { image } => classify(&image).await,
    }
}
