//! TelegramBot - long-polling loop feeding the command router.
//!
//! Each update is handled on its own task so a slow synthesis call for one
//! user does not hold up everyone else. The loop stops when the shutdown
//! channel flips to `true`; in-flight tasks finish on their own.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::client::{TelegramClient, TelegramError};
use super::types::{Incoming, InlineKeyboardMarkup};
use crate::application::{CommandRouter, Reply};

/// Pause after a failed poll before trying again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct TelegramBot {
    client: TelegramClient,
    router: Arc<CommandRouter>,
    poll_timeout: Duration,
}

impl TelegramBot {
    pub fn new(client: TelegramClient, router: Arc<CommandRouter>, poll_timeout: Duration) -> Self {
        Self {
            client,
            router,
            poll_timeout,
        }
    }

    /// Polls until shutdown. Returns an error only for a rejected token.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), TelegramError> {
        let mut offset: Option<i64> = None;
        info!("Polling for updates");

        loop {
            let polled = tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Polling stopped");
                        return Ok(());
                    }
                    continue;
                }
                polled = self.client.get_updates(offset, self.poll_timeout) => polled,
            };

            let updates = match polled {
                Ok(updates) => updates,
                Err(e) if e.is_unauthorized() => return Err(e),
                Err(e) => {
                    warn!(error = %e, "Polling failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                let Some(incoming) = update.into_incoming() else {
                    continue;
                };

                let client = self.client.clone();
                let router = self.router.clone();
                tokio::spawn(async move {
                    handle_incoming(&client, &router, incoming).await;
                });
            }
        }
    }
}

/// Routes one update and sends back whatever the router answers.
pub async fn handle_incoming(client: &TelegramClient, router: &CommandRouter, incoming: Incoming) {
    if let Some(id) = &incoming.callback_id {
        if let Err(e) = client.answer_callback_query(id).await {
            debug!(error = %e, "Could not acknowledge callback");
        }
    }

    let Some(reply) = router.route(&incoming.sender, incoming.inbound).await else {
        return;
    };

    if let Err(e) = deliver(client, incoming.chat_id, &reply).await {
        error!(chat_id = incoming.chat_id, error = %e, "Failed to deliver reply");
    }
}

/// Card pictures first, then the text with its keyboard. A picture that
/// cannot be sent does not stop the text.
async fn deliver(client: &TelegramClient, chat_id: i64, reply: &Reply) -> Result<(), TelegramError> {
    for photo in &reply.photos {
        if let Err(e) = client.send_photo(chat_id, &photo.url, &photo.caption).await {
            warn!(chat_id, url = %photo.url, error = %e, "Failed to send card image");
        }
    }

    let markup = reply.keyboard.as_ref().map(InlineKeyboardMarkup::from);
    client.send_message(chat_id, &reply.text, markup).await
}
