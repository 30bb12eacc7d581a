//! Telegram transport using teloxide.
//!
//! Telegram sessions are token-authenticated, so this transport ignores the
//! persisted credential blob and never emits a pairing code; both paths stay
//! live in the session manager for transports that need them.

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::transport::{
    ConversationId, IncomingMessage, MediaHandle, SessionEvent, Transport, TransportError,
};

/// Buffered events between the dispatcher and the session manager.
const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn connect(
        &self,
        _creds: Option<Vec<u8>>,
    ) -> Result<mpsc::Receiver<SessionEvent>, TransportError> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        info!("Connected as @{}", me.username());

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        if tx.send(SessionEvent::Open).await.is_err() {
            return Err(TransportError::Connect("event channel closed".into()));
        }

        let bot = self.bot.clone();
        tokio::spawn(async move {
            let handler = Update::filter_message().endpoint(forward_message);

            Dispatcher::builder(bot, handler)
                .dependencies(dptree::deps![tx.clone()])
                .build()
                .dispatch()
                .await;

            // Dispatcher exit means the session dropped.
            tx.send(SessionEvent::Closed).await.ok();
        });

        Ok(rx)
    }

    async fn download(&self, media: &MediaHandle) -> Result<Vec<u8>, TransportError> {
        let file = self
            .bot
            .get_file(FileId(media.0.clone()))
            .await
            .map_err(|e| TransportError::Download(e.to_string()))?;

        let mut data = Vec::new();
        self.bot
            .download_file(&file.path, &mut data)
            .await
            .map_err(|e| TransportError::Download(e.to_string()))?;

        Ok(data)
    }

    async fn send_text(
        &self,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<(), TransportError> {
        let chat_id: i64 = conversation
            .0
            .parse()
            .map_err(|_| TransportError::Send(format!("bad conversation id {:?}", conversation.0)))?;

        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map(|_| ())
            .map_err(|e| {
                warn!("Failed to send: {e}");
                TransportError::Send(e.to_string())
            })
    }
}

/// Reduce a Telegram update to the transport's message shape. The largest
/// photo size is the one worth describing.
async fn forward_message(msg: Message, tx: mpsc::Sender<SessionEvent>) -> ResponseResult<()> {
    let media = msg
        .photo()
        .and_then(|sizes| sizes.last())
        .map(|photo| MediaHandle(photo.file.id.0.clone()));

    let incoming = IncomingMessage {
        conversation: ConversationId(msg.chat.id.0.to_string()),
        media,
        caption: msg.caption().map(str::to_string),
    };

    tx.send(SessionEvent::Message(incoming)).await.ok();
    Ok(())
}
