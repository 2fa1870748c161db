// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram adapter for Mediagate.
//!
//! Receives updates by long polling or webhook, translates them into
//! [`GateEvent`](mediagate_gate::GateEvent)s, and serves the gate workflow's
//! replies back through [`TelegramTransport`]. Membership checks go through
//! [`TelegramMembership`].

pub mod handler;
pub mod oracle;
pub mod transport;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use mediagate_config::model::TelegramConfig;
use mediagate_core::error::MediagateError;
use mediagate_gate::GateWorkflow;
use teloxide::dispatching::{DefaultKey, Dispatcher, UpdateFilterExt};
use teloxide::RequestError;
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::{debug, info, warn};

pub use oracle::TelegramMembership;
pub use transport::TelegramTransport;

/// The bot's own username, used to accept `/command@username` forms.
#[derive(Debug, Clone)]
struct BotUsername(Arc<str>);

/// Owns the bot connection and runs the update loop.
pub struct TelegramGate {
    bot: Bot,
    config: TelegramConfig,
}

impl TelegramGate {
    /// Creates a new Telegram gate.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, MediagateError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            MediagateError::Config("telegram.bot_token is required to start the bot".into())
        })?;

        if token.is_empty() {
            return Err(MediagateError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        Ok(Self { bot, config })
    }

    /// Membership oracle sharing this gate's bot connection.
    pub fn membership(&self) -> TelegramMembership {
        TelegramMembership::new(self.bot.clone())
    }

    /// Address the webhook listener binds to.
    pub fn listen_addr(&self) -> Result<SocketAddr, MediagateError> {
        let host: IpAddr = self.config.listen_host.parse().map_err(|e| {
            MediagateError::Config(format!(
                "invalid telegram.listen_host `{}`: {e}",
                self.config.listen_host
            ))
        })?;
        Ok(SocketAddr::new(host, self.config.listen_port))
    }

    /// Runs until Ctrl-C.
    ///
    /// Uses a webhook when `telegram.webhook_url` is set and long polling
    /// otherwise.
    pub async fn run(self, workflow: Arc<GateWorkflow>) -> Result<(), MediagateError> {
        let me = self.bot.get_me().await.map_err(|e| MediagateError::Channel {
            message: format!("failed to reach Telegram: {e}"),
            source: Some(Box::new(e)),
        })?;
        let username = BotUsername(Arc::from(me.username()));
        info!(bot = %username.0, "connected to Telegram");

        let mut dispatcher = build_dispatcher(self.bot.clone(), workflow, username);
        #[cfg(unix)]
        spawn_sigterm_listener(dispatcher.shutdown_token());

        match self.config.webhook_url.as_deref() {
            Some(raw) => {
                let url = reqwest::Url::parse(raw).map_err(|e| {
                    MediagateError::Config(format!("invalid telegram.webhook_url: {e}"))
                })?;
                let addr = self.listen_addr()?;
                info!(%addr, %url, "starting Telegram webhook listener");

                let listener = webhooks::axum(self.bot.clone(), webhooks::Options::new(addr, url))
                    .await
                    .map_err(|e| MediagateError::Channel {
                        message: format!("failed to register webhook: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                dispatcher
                    .dispatch_with_listener(
                        listener,
                        LoggingErrorHandler::with_custom_text("webhook listener error"),
                    )
                    .await;
            }
            None => {
                info!("starting Telegram long polling");
                dispatcher.dispatch().await;
            }
        }

        info!("Telegram update loop stopped");
        Ok(())
    }
}

fn build_dispatcher(
    bot: Bot,
    workflow: Arc<GateWorkflow>,
    username: BotUsername,
) -> Dispatcher<Bot, RequestError, DefaultKey> {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![workflow, username])
        .default_handler(|update| async move {
            debug!(update_id = update.id.0, "ignoring unsupported update");
        })
        .enable_ctrlc_handler()
        .build()
}

/// Ctrl-C is handled by the dispatcher itself; SIGTERM stops it the same way.
#[cfg(unix)]
fn spawn_sigterm_listener(token: teloxide::dispatching::ShutdownToken) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
        info!("received SIGTERM, initiating shutdown");

        match token.shutdown() {
            Ok(stopped) => stopped.await,
            Err(_) => debug!("dispatcher was not running at SIGTERM"),
        }
    });
}

async fn on_message(
    bot: Bot,
    msg: Message,
    workflow: Arc<GateWorkflow>,
    username: BotUsername,
) -> ResponseResult<()> {
    let Some((user, event)) = handler::event_from_message(&msg, &username.0) else {
        debug!(chat_id = msg.chat.id.0, "ignoring message");
        return respond(());
    };

    let transport = TelegramTransport::new(bot);
    let outcome = workflow.handle(user, event, &transport).await;
    debug!(user_id = %user, ?outcome, "message handled");
    respond(())
}

async fn on_callback(
    bot: Bot,
    query: CallbackQuery,
    workflow: Arc<GateWorkflow>,
) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "failed to answer callback query");
    }

    let Some((user, event)) = handler::event_from_callback(&query) else {
        debug!(data = ?query.data, "ignoring callback query");
        return respond(());
    };

    let prompt = query.message.as_ref().map(|m| (m.chat().id, m.id()));
    let transport = TelegramTransport::with_prompt(bot, prompt);
    let outcome = workflow.handle(user, event, &transport).await;
    debug!(user_id = %user, ?outcome, "callback handled");
    respond(())
}
