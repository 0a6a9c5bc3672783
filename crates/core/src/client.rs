//! MessagingClient trait — the abstraction over the messaging platform.
//!
//! A client knows how to resolve a token into an identity and how to post a
//! text message to a channel. The scheduler never sees the transport; it
//! holds the client as `Arc<dyn MessagingClient>` and treats both operations
//! as suspension points.

use async_trait::async_trait;

use crate::channel::ChannelId;
use crate::error::ClientError;
use crate::token::{Identity, Session, Token};

/// Acknowledgment of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Platform-assigned id of the created message.
    pub message_id: String,
}

/// The messaging platform seam.
///
/// Implementations handle transport, authentication headers, and payload
/// formats. Both operations may fail with [`ClientError`]; the scheduler
/// recovers those failures at the token boundary.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Platform label for logs (e.g., "discord").
    fn name(&self) -> &str;

    /// Resolve the identity behind a token ("who am I").
    async fn identify(&self, token: &Token) -> Result<Identity, ClientError>;

    /// Post a text message to a channel on behalf of a session.
    async fn send(
        &self,
        session: &Session,
        channel: &ChannelId,
        content: &str,
    ) -> Result<SendReceipt, ClientError>;
}
