// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update handlers: commands, inline buttons, and free text.
//!
//! Handlers never let a failed reply take down the dispatcher. Errors that
//! escape are logged by the dispatcher's error handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile, InputMedia, InputMediaPhoto, ParseMode};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, warn};

use translanda_core::{TranslandaError, UserId};

use crate::BotContext;
use crate::callback::CallbackAction;
use crate::catalog::TripCatalog;
use crate::markdown::{RichText, format_for_telegram};
use crate::screens::{self, Screen};

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Bot commands, matched case-insensitively by teloxide.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Comandos disponibles:")]
pub enum Command {
    #[command(description = "inicia el bot")]
    Start,
    #[command(description = "muestra los comandos disponibles")]
    Comandos,
    #[command(description = "datos de contacto")]
    Contacto,
    #[command(description = "viajes disponibles")]
    Viajes,
    #[command(description = "tasa del dólar")]
    Dolar,
    #[command(description = "muestra el logo de TransLanda")]
    Logo,
    #[command(description = "busca una imagen en Google")]
    Img(String),
}

fn channel_err(context: &'static str) -> impl FnOnce(teloxide::RequestError) -> TranslandaError {
    move |e| TranslandaError::Channel {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

fn is_not_modified(e: &teloxide::RequestError) -> bool {
    e.to_string().contains("message is not modified")
}

/// Conversation key for a message: the sender, or the chat when anonymous.
pub fn sender_id(msg: &Message) -> UserId {
    match msg.from.as_ref() {
        Some(user) => UserId::from(user.id.0),
        None => UserId::from(msg.chat.id.0.to_string()),
    }
}

pub async fn command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: Arc<BotContext>,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    debug!(chat_id = chat_id.0, command = ?cmd, "command received");

    match cmd {
        Command::Start => {
            bot.send_message(chat_id, screens::GREETING).await?;
        }
        Command::Comandos => send_rich(&bot, chat_id, &screens::command_list()).await?,
        Command::Contacto => send_rich(&bot, chat_id, &screens::contact(&ctx.contact)).await?,
        Command::Viajes => {
            let screen = screens::trip_menu(&ctx.catalog, ctx.brand_image.clone());
            send_screen(&bot, chat_id, &screen).await?;
        }
        Command::Dolar => {
            let text = ctx.exchange.rate_message().await;
            bot.send_message(chat_id, text).await?;
        }
        Command::Logo => send_logo(&bot, chat_id, &ctx).await?,
        Command::Img(query) => send_image(&bot, chat_id, &ctx, query.trim()).await?,
    }
    Ok(())
}

/// Free text goes to the responder. Failures become the configured apology.
pub async fn text(bot: Bot, msg: Message, text: String, ctx: Arc<BotContext>) -> HandlerResult {
    if text.starts_with('/') {
        debug!(chat_id = msg.chat.id.0, "ignoring unknown command");
        return Ok(());
    }

    let user_id = sender_id(&msg);
    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
        debug!(error = %e, "failed to send typing indicator");
    }

    let reply = match ctx.responder.reply(&user_id, &text).await {
        Ok(reply) => {
            debug!(user_id = %user_id, curated = reply.is_curated(), "reply ready");
            reply.into_text()
        }
        Err(e) => {
            error!(user_id = %user_id, error = %e, "failed to answer message");
            ctx.error_reply.clone()
        }
    };

    send_markdown(&bot, msg.chat.id, &reply).await?;
    Ok(())
}

pub async fn callback(bot: Bot, q: CallbackQuery, ctx: Arc<BotContext>) -> HandlerResult {
    let mut notice = None;

    if let (Some(data), Some(message)) = (q.data.as_deref(), q.regular_message()) {
        let action = CallbackAction::parse(data);
        debug!(data, "callback received");

        match action {
            CallbackAction::Logo { liked } => answer_logo(&bot, message, liked).await?,
            action => match screen_for(&ctx.catalog, ctx.brand_image.clone(), &action) {
                Some(screen) => edit_screen(&bot, message, &screen).await?,
                None => {
                    warn!(data, "callback for unknown trip");
                    notice = Some(screens::TRIP_NOT_FOUND);
                }
            },
        }
    }

    let mut answer = bot.answer_callback_query(q.id.clone());
    if let Some(text) = notice {
        answer = answer.text(text);
    }
    answer.await?;
    Ok(())
}

/// The screen a button press leads to, `None` when it names no known trip.
pub fn screen_for(
    catalog: &TripCatalog,
    brand_image: Option<PathBuf>,
    action: &CallbackAction,
) -> Option<Screen> {
    match action {
        CallbackAction::Menu => Some(screens::trip_menu(catalog, brand_image)),
        CallbackAction::Trip(id) => catalog.get(id).map(screens::trip_details),
        CallbackAction::Payment(id) => catalog.get(id).map(screens::payment),
        CallbackAction::Seats(id) => catalog.get(id).map(screens::seats),
        CallbackAction::Stops(id) => catalog.get(id).map(screens::stops),
        CallbackAction::Logo { .. } => None,
    }
}

async fn send_logo(bot: &Bot, chat_id: ChatId, ctx: &BotContext) -> Result<(), TranslandaError> {
    let photo = match (&ctx.logo_url, &ctx.brand_image) {
        (Some(url), _) => Some(InputFile::url(url.clone())),
        (None, Some(path)) if image_exists(path).await => Some(InputFile::file(path.clone())),
        _ => None,
    };

    if let Some(photo) = photo {
        match bot
            .send_photo(chat_id, photo)
            .caption(screens::LOGO_QUESTION)
            .reply_markup(screens::logo_keyboard())
            .await
        {
            Ok(_) => return Ok(()),
            Err(e) => warn!(error = %e, "failed to send logo photo, asking without it"),
        }
    }

    bot.send_message(chat_id, screens::LOGO_QUESTION)
        .reply_markup(screens::logo_keyboard())
        .await
        .map_err(channel_err("failed to send logo poll"))?;
    Ok(())
}

async fn answer_logo(bot: &Bot, message: &Message, liked: bool) -> Result<(), TranslandaError> {
    let caption = screens::logo_answer(liked);
    let result = if message.photo().is_some() {
        bot.edit_message_caption(message.chat.id, message.id)
            .caption(caption)
            .await
    } else {
        bot.edit_message_text(message.chat.id, message.id, caption)
            .await
    };

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_not_modified(&e) => Ok(()),
        Err(e) => Err(channel_err("failed to record logo answer")(e)),
    }
}

async fn send_image(
    bot: &Bot,
    chat_id: ChatId,
    ctx: &BotContext,
    query: &str,
) -> Result<(), TranslandaError> {
    let reply = if query.is_empty() {
        screens::IMAGE_QUERY_MISSING.to_string()
    } else if let Some(images) = &ctx.images {
        match images.search(query).await {
            Ok(Some(link)) => match link.parse() {
                Ok(url) => match bot.send_photo(chat_id, InputFile::url(url)).await {
                    Ok(_) => return Ok(()),
                    Err(e) => {
                        warn!(error = %e, link = %link, "Telegram could not fetch the image, sending the link");
                        link
                    }
                },
                Err(e) => {
                    warn!(error = %e, link = %link, "image search returned an invalid URL");
                    screens::IMAGE_NOT_FOUND.to_string()
                }
            },
            Ok(None) => screens::IMAGE_NOT_FOUND.to_string(),
            Err(e) => {
                warn!(error = %e, query, "image search failed");
                screens::IMAGE_NOT_FOUND.to_string()
            }
        }
    } else {
        screens::IMAGE_SEARCH_DISABLED.to_string()
    };

    bot.send_message(chat_id, reply)
        .await
        .map_err(channel_err("failed to send message"))?;
    Ok(())
}

async fn image_exists(path: &Path) -> bool {
    let exists = tokio::fs::try_exists(path).await.unwrap_or(false);
    if !exists {
        debug!(image = %path.display(), "screen image missing");
    }
    exists
}

async fn screen_image(screen: &Screen) -> Option<PathBuf> {
    let path = screen.image.as_ref()?;
    image_exists(path).await.then(|| path.clone())
}

/// Sends model output as MarkdownV2, falling back to plain text.
async fn send_markdown(bot: &Bot, chat_id: ChatId, text: &str) -> Result<(), TranslandaError> {
    match bot
        .send_message(chat_id, format_for_telegram(text))
        .parse_mode(ParseMode::MarkdownV2)
        .await
    {
        Ok(_) => Ok(()),
        Err(e) => {
            warn!(error = %e, "MarkdownV2 failed, sending as plain text");
            bot.send_message(chat_id, text)
                .await
                .map_err(channel_err("failed to send message"))?;
            Ok(())
        }
    }
}

async fn send_rich(bot: &Bot, chat_id: ChatId, text: &RichText) -> Result<(), TranslandaError> {
    match bot
        .send_message(chat_id, text.markdown())
        .parse_mode(ParseMode::MarkdownV2)
        .await
    {
        Ok(_) => Ok(()),
        Err(e) => {
            warn!(error = %e, "MarkdownV2 failed, sending as plain text");
            bot.send_message(chat_id, text.plain())
                .await
                .map_err(channel_err("failed to send message"))?;
            Ok(())
        }
    }
}

/// Sends a screen as a new message, as a photo when its image is on disk.
async fn send_screen(bot: &Bot, chat_id: ChatId, screen: &Screen) -> Result<(), TranslandaError> {
    if let Some(path) = screen_image(screen).await {
        match bot
            .send_photo(chat_id, InputFile::file(path))
            .caption(screen.caption.markdown())
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(screen.keyboard.clone())
            .await
        {
            Ok(_) => return Ok(()),
            Err(e) => warn!(error = %e, "photo screen failed, sending as text"),
        }
    }

    let sent = bot
        .send_message(chat_id, screen.caption.markdown())
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(screen.keyboard.clone())
        .await;
    if let Err(e) = sent {
        warn!(error = %e, "MarkdownV2 failed, sending as plain text");
        bot.send_message(chat_id, screen.caption.plain())
            .reply_markup(screen.keyboard.clone())
            .await
            .map_err(channel_err("failed to send screen"))?;
    }
    Ok(())
}

/// Replaces the pressed message with `screen`. When the edit is rejected the
/// screen is sent as a new message instead.
async fn edit_screen(bot: &Bot, message: &Message, screen: &Screen) -> Result<(), TranslandaError> {
    let (chat_id, message_id) = (message.chat.id, message.id);
    let markdown = screen.caption.markdown();

    let result = if let Some(path) = screen_image(screen).await {
        let media = InputMedia::Photo(
            InputMediaPhoto::new(InputFile::file(path))
                .caption(markdown)
                .parse_mode(ParseMode::MarkdownV2),
        );
        bot.edit_message_media(chat_id, message_id, media)
            .reply_markup(screen.keyboard.clone())
            .await
            .map(|_| ())
    } else if message.photo().is_some() {
        bot.edit_message_caption(chat_id, message_id)
            .caption(markdown)
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(screen.keyboard.clone())
            .await
            .map(|_| ())
    } else {
        bot.edit_message_text(chat_id, message_id, markdown)
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(screen.keyboard.clone())
            .await
            .map(|_| ())
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_not_modified(&e) => Ok(()),
        Err(e) => {
            warn!(error = %e, "editing screen failed, sending a new message");
            send_screen(bot, chat_id, screen).await
        }
    }
}
