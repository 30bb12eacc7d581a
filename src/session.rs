//! Session manager: owns the messaging connection lifecycle and dispatches
//! incoming events to the caption → relay → describe → reply pipeline.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::command;
use crate::creds::CredentialStore;
use crate::describe::{DescribeError, Describer};
use crate::relay::{MediaRelay, RelayError};
use crate::transport::{IncomingMessage, SessionEvent, Transport, TransportError};

/// Fixed reply when handling a message fails.
pub const APOLOGY_REPLY: &str = "⚠️ Something went wrong.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Open,
}

/// Anything that can go wrong while handling one message. Caught at the
/// event boundary; never tears down the session.
#[derive(Debug)]
enum EventError {
    Relay(RelayError),
    Describe(DescribeError),
    Send(TransportError),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relay(e) => write!(f, "{e}"),
            Self::Describe(e) => write!(f, "{e}"),
            Self::Send(e) => write!(f, "{e}"),
        }
    }
}

impl From<RelayError> for EventError {
    fn from(e: RelayError) -> Self {
        Self::Relay(e)
    }
}

impl From<DescribeError> for EventError {
    fn from(e: DescribeError) -> Self {
        Self::Describe(e)
    }
}

pub struct SessionManager {
    transport: Arc<dyn Transport>,
    store: CredentialStore,
    relay: Arc<MediaRelay>,
    describer: Arc<Describer>,
    state_tx: watch::Sender<SessionState>,
}

impl SessionManager {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: CredentialStore,
        relay: MediaRelay,
        describer: Describer,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Disconnected);
        Self {
            transport,
            store,
            relay: Arc::new(relay),
            describer: Arc::new(describer),
            state_tx,
        }
    }

    /// Observe session state transitions.
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Run the session state machine. Reconnects immediately and
    /// indefinitely on drop; never returns.
    pub async fn run(&self) {
        loop {
            self.state_tx.send_replace(SessionState::Connecting);

            let creds = self.store.load();
            let mut events = match self.transport.connect(creds).await {
                Ok(rx) => rx,
                Err(e) => {
                    warn!("session connect failed: {e}");
                    continue;
                }
            };

            while let Some(event) = events.recv().await {
                match event {
                    SessionEvent::PairingCode(code) => {
                        info!("scan the pairing code below to link this bot");
                        println!("{code}");
                    }
                    SessionEvent::Open => {
                        self.state_tx.send_replace(SessionState::Open);
                        info!("🔥 Bot connected!");
                    }
                    SessionEvent::CredentialsUpdate(blob) => {
                        // Must be on disk before the next event is consumed.
                        if let Err(e) = self.store.save(&blob) {
                            warn!("failed to persist credentials: {e}");
                        }
                    }
                    SessionEvent::Message(msg) => self.dispatch(msg),
                    SessionEvent::Closed => break,
                }
            }

            info!("session closed, reconnecting");
        }
    }

    /// Hand one message to the pipeline on its own task, so a slow remote
    /// call never blocks acceptance of the next event. Failures are logged
    /// and answered with the fixed apology.
    fn dispatch(&self, msg: IncomingMessage) {
        let transport = Arc::clone(&self.transport);
        let relay = Arc::clone(&self.relay);
        let describer = Arc::clone(&self.describer);

        tokio::spawn(async move {
            let conversation = msg.conversation.clone();
            if let Err(e) = handle_message(transport.as_ref(), &relay, &describer, msg).await {
                warn!("❌ message handler error: {e}");
                if let Err(e) = transport.send_text(&conversation, APOLOGY_REPLY).await {
                    warn!("failed to send apology: {e}");
                }
            }
        });
    }
}

/// The per-message pipeline. Messages without both an image and a caption,
/// and captions that are not commands, are ignored without any remote call.
async fn handle_message(
    transport: &dyn Transport,
    relay: &MediaRelay,
    describer: &Describer,
    msg: IncomingMessage,
) -> Result<(), EventError> {
    let (Some(media), Some(caption)) = (&msg.media, &msg.caption) else {
        return Ok(());
    };
    let Some(parsed) = command::parse(caption) else {
        return Ok(());
    };

    info!("🖼️ {:?} command, prompt: {:?}", parsed.kind, parsed.prompt);

    let public_url = relay.relay(transport, media).await?;
    let text = describer.describe(&parsed.prompt, &public_url).await?;
    transport
        .send_text(&msg.conversation, &text)
        .await
        .map_err(EventError::Send)?;

    Ok(())
}
