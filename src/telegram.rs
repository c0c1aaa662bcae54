use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::net::Download;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{Me, ParseMode, PhotoSize};
use teloxide::utils::command::BotCommands;
use teloxide::RequestError;
use tracing::{debug, info, warn};

use crate::coach::{CalorieCoach, Reply, NOT_RECOGNISED_MESSAGE};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "say hello and see what I can do.")]
    Start,
    #[command(description = "show how to describe a meal.")]
    Help,
    #[command(description = "get a motivational quote.")]
    Quote,
}

/// Starts long polling and routes messages to the coach until Ctrl-C.
pub async fn run(bot: Bot, coach: Arc<CalorieCoach>) {
    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(answer_command),
        )
        .branch(dptree::filter(|msg: Message| msg.photo().is_some()).endpoint(answer_photo))
        .branch(
            dptree::filter(|msg: Message, me: Me| {
                addressed_to_other_bot(msg.text(), me.username())
            })
            .endpoint(ignore_other_bot_command),
        )
        .branch(
            dptree::filter(|msg: Message| is_command_like(msg.text()))
                .endpoint(answer_unknown_command),
        )
        .branch(Message::filter_text().endpoint(answer_text));

    info!("Calorie coach bot is running");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![coach])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn is_command_like(text: Option<&str>) -> bool {
    text.is_some_and(|text| text.starts_with('/'))
}

/// True for `/command@name` when `name` is not this bot. In group chats
/// those belong to another bot and get no reply at all.
fn addressed_to_other_bot(text: Option<&str>, bot_username: &str) -> bool {
    let Some(command) = text
        .filter(|text| text.starts_with('/'))
        .and_then(|text| text.split_whitespace().next())
    else {
        return false;
    };
    match command.split_once('@') {
        Some((_, mention)) => !mention.eq_ignore_ascii_case(bot_username),
        None => false,
    }
}

/// Photo sizes arrive smallest first; the last one is the full image.
fn largest_photo(sizes: Option<&[PhotoSize]>) -> Option<&PhotoSize> {
    sizes.and_then(<[PhotoSize]>::last)
}

/// Markdown the API rejects (an unbalanced marker in a food label, say) is
/// resent as plain text so the user still gets the content.
#[allow(deprecated)]
async fn send_replies(bot: &Bot, chat_id: ChatId, replies: Vec<Reply>) -> Result<()> {
    for reply in replies {
        if !reply.markdown {
            bot.send_message(chat_id, reply.text).await?;
            continue;
        }
        let sent = bot
            .send_message(chat_id, reply.text.clone())
            .parse_mode(ParseMode::Markdown)
            .await;
        match sent {
            Ok(_) => {}
            Err(RequestError::Api(e)) => {
                warn!(chat_id = chat_id.0, error = %e, "Markdown reply rejected, resending as plain");
                bot.send_message(chat_id, reply.text).await?;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

async fn answer_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    coach: Arc<CalorieCoach>,
) -> Result<()> {
    info!(chat_id = msg.chat.id.0, command = ?cmd, "Handling command");
    let reply = match cmd {
        Command::Start => coach.start(),
        Command::Help => coach.help(),
        Command::Quote => coach.quote(),
    };
    send_replies(&bot, msg.chat.id, vec![reply]).await
}

async fn answer_unknown_command(
    bot: Bot,
    msg: Message,
    coach: Arc<CalorieCoach>,
) -> Result<()> {
    info!(chat_id = msg.chat.id.0, text = ?msg.text(), "Unknown command");
    send_replies(&bot, msg.chat.id, vec![coach.unknown_command()]).await
}

async fn ignore_other_bot_command(msg: Message) -> Result<()> {
    debug!(chat_id = msg.chat.id.0, text = ?msg.text(), "Ignoring command for another bot");
    Ok(())
}

async fn answer_text(bot: Bot, msg: Message, text: String, coach: Arc<CalorieCoach>) -> Result<()> {
    info!(chat_id = msg.chat.id.0, "Handling text message");
    let replies = coach.respond_to_text(&text).await;
    send_replies(&bot, msg.chat.id, replies).await
}

async fn answer_photo(bot: Bot, msg: Message, coach: Arc<CalorieCoach>) -> Result<()> {
    info!(chat_id = msg.chat.id.0, "Handling photo message");
    let Some(photo) = largest_photo(msg.photo()) else {
        warn!(chat_id = msg.chat.id.0, "Photo message without photo sizes");
        let replies = vec![Reply::plain(NOT_RECOGNISED_MESSAGE)];
        return send_replies(&bot, msg.chat.id, replies).await;
    };

    let replies = match download_photo(&bot, photo).await {
        Ok(image) => coach.respond_to_photo(&image).await,
        Err(e) => {
            warn!(chat_id = msg.chat.id.0, error = ?e, "Could not fetch photo");
            vec![Reply::plain(NOT_RECOGNISED_MESSAGE)]
        }
    };
    send_replies(&bot, msg.chat.id, replies).await
}

async fn download_photo(bot: &Bot, photo: &PhotoSize) -> Result<Vec<u8>> {
    let file = bot
        .get_file(photo.file.id.clone())
        .await
        .context("Failed to resolve photo file")?;
    let mut image = Vec::new();
    bot.download_file(&file.path, &mut image)
        .await
        .context("Failed to download photo")?;
    Ok(image)
}
