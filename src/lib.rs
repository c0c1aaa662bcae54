pub mod api_connection;
pub mod cli;
pub mod coach;
pub mod config;
pub mod conversation;
pub mod feedback;
pub mod ingredient_parser;
pub mod report;
pub mod telegram;
