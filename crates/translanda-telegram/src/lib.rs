// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram front end for the TransLanda bot.
//!
//! Long polling via teloxide. Commands and inline buttons are answered
//! from the trip catalog and the web lookups. Free text goes through the
//! [`Responder`].

pub mod callback;
pub mod catalog;
pub mod handler;
pub mod markdown;
pub mod screens;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use translanda_config::model::{ContactConfig, TranslandaConfig};
use translanda_core::error::TranslandaError;
use translanda_core::traits::PluginAdapter;
use translanda_core::types::{AdapterType, HealthStatus};
use translanda_memory::Responder;
use translanda_web::{ExchangeRateScraper, ImageSearchClient};

use crate::catalog::TripCatalog;
use crate::handler::Command;

/// Everything the handlers need, shared across updates.
pub struct BotContext {
    pub responder: Arc<Responder>,
    pub catalog: TripCatalog,
    pub exchange: ExchangeRateScraper,
    /// `None` when the search API is not configured.
    pub images: Option<ImageSearchClient>,
    pub logo_url: Option<reqwest::Url>,
    pub brand_image: Option<PathBuf>,
    pub contact: ContactConfig,
    pub error_reply: String,
}

impl BotContext {
    pub fn from_config(
        config: &TranslandaConfig,
        responder: Arc<Responder>,
    ) -> Result<Self, TranslandaError> {
        let catalog = TripCatalog::load(std::path::Path::new(&config.catalog.file))?;
        let exchange = ExchangeRateScraper::new(&config.exchange)?;

        let images = match ImageSearchClient::new(&config.search) {
            Ok(client) => Some(client),
            Err(e) => {
                info!(reason = %e, "image search disabled");
                None
            }
        };

        let logo_url = config
            .telegram
            .logo_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| {
                reqwest::Url::parse(u).map_err(|e| {
                    TranslandaError::Config(format!("invalid telegram.logo_url {u:?}: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            responder,
            catalog,
            exchange,
            images,
            logo_url,
            brand_image: config.catalog.brand_image.as_ref().map(PathBuf::from),
            contact: config.catalog.contact.clone(),
            error_reply: config.memory.error_reply.clone(),
        })
    }
}

/// Telegram bot wired to a [`BotContext`].
pub struct TelegramBot {
    bot: Bot,
    context: Arc<BotContext>,
    drop_pending_updates: bool,
}

impl TelegramBot {
    /// Requires `telegram.bot_token` to be set.
    pub fn new(config: &TranslandaConfig, context: BotContext) -> Result<Self, TranslandaError> {
        let token = config.telegram.bot_token.as_deref().ok_or_else(|| {
            TranslandaError::Config("telegram.bot_token is required for the Telegram bot".into())
        })?;

        if token.is_empty() {
            return Err(TranslandaError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token),
            context: Arc::new(context),
            drop_pending_updates: config.telegram.drop_pending_updates,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Polls for updates until Ctrl-C.
    pub async fn run(&self) {
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "failed to register bot commands");
        }

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .branch(
                        dptree::entry()
                            .filter_command::<Command>()
                            .endpoint(handler::command),
                    )
                    .branch(Message::filter_text().endpoint(handler::text)),
            )
            .branch(Update::filter_callback_query().endpoint(handler::callback));

        let mut polling = Polling::builder(self.bot.clone());
        if self.drop_pending_updates {
            polling = polling.drop_pending_updates();
        }
        let listener = polling.build();

        info!("starting Telegram long polling");

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![self.context.clone()])
            .default_handler(|_| async {})
            .error_handler(LoggingErrorHandler::with_custom_text(
                "error while handling a Telegram update",
            ))
            .enable_ctrlc_handler()
            .build();

        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("error from the update listener"),
            )
            .await;

        info!("Telegram polling stopped");
    }
}

#[async_trait]
impl PluginAdapter for TelegramBot {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, TranslandaError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), TranslandaError> {
        debug!("Telegram bot shutting down");
        Ok(())
    }
}
