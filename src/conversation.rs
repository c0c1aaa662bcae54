use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

use crate::feedback::MOTIVATIONAL_QUOTES;

pub const FOOD_FACTS: [&str; 5] = [
    "Did you know? Carrots were originally purple! 🥕",
    "Honey never spoils — archaeologists found edible honey in ancient Egyptian tombs! 🍯",
    "Tomatoes are fruits, botanically speaking. 🍅",
    "Broccoli contains more vitamin C than oranges! 🥦",
    "Apples float because they are 25% air! 🍏",
];

pub const FOOD_JOKES: [&str; 3] = [
    "Why did the tomato turn red? Because it saw the salad dressing! 🍅😄",
    "What did the lettuce say to the celery? Quit stalking me! 🥬😂",
    "Why don’t eggs tell jokes? They’d crack each other up! 🥚🤣",
];

const HELLO: &[&str] = &[
    "Hi there! 👋 How can I help you with your nutrition today?",
    "Hello! Ready to talk food and health? 😊",
];
const HI: &[&str] = &[
    "Hey! Send me a food photo or describe your meal!",
    "Hi! What did you eat today? 🥗",
];
const THANK_YOU: &[&str] = &[
    "You're welcome! Happy to help! 😊",
    "Anytime! Keep eating well! 🍎",
];
const THANKS: &[&str] = &[
    "My pleasure! Stay healthy! 🍀",
    "Glad to help! Let me know if you want advice.",
];
const HOW_ARE_YOU: &[&str] = &[
    "I’m great, thanks for asking! How about you?",
    "Feeling healthy and ready to help! What about you?",
];
const HELP: &[&str] =
    &["You can send me a food photo or describe your meal, and I'll give nutrition advice!"];
const BYE: &[&str] = &[
    "Goodbye! Stay healthy! 👋",
    "See you later! Keep making great food choices!",
];

/// Intent phrases in match priority order.
const INTENTS: &[(&str, &[&str])] = &[
    ("hello", HELLO),
    ("hi", HI),
    ("thank you", THANK_YOU),
    ("thanks", THANKS),
    ("how are you", HOW_ARE_YOU),
    ("help", HELP),
    ("bye", BYE),
    ("fun fact", &FOOD_FACTS),
    ("joke", &FOOD_JOKES),
    ("quote", &MOTIVATIONAL_QUOTES),
];

// Whole-word matching, so "chicken" does not trigger "hi".
static INTENT_PATTERNS: LazyLock<Vec<(Regex, &'static [&'static str])>> = LazyLock::new(|| {
    INTENTS
        .iter()
        .map(|(phrase, replies)| {
            let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
            let pattern = format!(r"\b{}\b", words.join(r"\s+"));
            let regex = Regex::new(&pattern).expect("intent pattern is valid");
            (regex, *replies)
        })
        .collect()
});

/// Returns a canned reply when the text is small talk rather than a meal.
pub fn conversational_reply<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    INTENT_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&lowered))
        .and_then(|(_, replies)| replies.choose(rng).copied())
}

pub fn random_quote<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MOTIVATIONAL_QUOTES[rng.gen_range(0..MOTIVATIONAL_QUOTES.len())]
}
