use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Telegram calorie coach: meal text or photo in, nutrition feedback out", long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the Telegram bot with long polling
    Run,
    /// Analyze one meal description and print the replies
    Analyze {
        /// Free-text meal description, e.g. "2 boiled eggs and toast"
        text: String,
    },
    /// Classify a local food photo and print the label
    Classify {
        /// Path to the image file
        image: PathBuf,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
