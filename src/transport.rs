//! Messaging transport contract.
//!
//! The session manager is written against this trait so the event source can
//! be the real Telegram client in production and a scripted fake in tests.
//! A transport emits [`SessionEvent`]s on a channel and exposes the two
//! calls the pipeline needs: downloading an attachment and sending a reply.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Opaque conversation identifier, formatted by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationId(pub String);

/// Platform-specific handle addressing one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle(pub String);

/// One inbound chat message, already reduced to what the pipeline needs.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub conversation: ConversationId,
    /// Image attachment, if the message carries one.
    pub media: Option<MediaHandle>,
    pub caption: Option<String>,
}

/// Events a transport reports to the session manager.
#[derive(Debug)]
pub enum SessionEvent {
    /// First-time pairing code to surface to the operator.
    PairingCode(String),
    /// The session is established and ready.
    Open,
    /// Updated credential material to persist before the next event.
    CredentialsUpdate(Vec<u8>),
    Message(IncomingMessage),
    /// The session dropped; the receiver ends after this.
    Closed,
}

#[derive(Debug)]
pub enum TransportError {
    /// Session establishment failed.
    Connect(String),
    /// Attachment download failed.
    Download(String),
    /// Outbound message send failed.
    Send(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(msg) => write!(f, "connect failed: {msg}"),
            Self::Download(msg) => write!(f, "download failed: {msg}"),
            Self::Send(msg) => write!(f, "send failed: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish the session, resuming from persisted credentials when
    /// given. Returns the event stream for this session; the stream ends
    /// when the session drops.
    async fn connect(
        &self,
        creds: Option<Vec<u8>>,
    ) -> Result<mpsc::Receiver<SessionEvent>, TransportError>;

    /// Download the full binary content of an attachment.
    async fn download(&self, media: &MediaHandle) -> Result<Vec<u8>, TransportError>;

    /// Send plain text back to a conversation.
    async fn send_text(
        &self,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<(), TransportError>;
}
