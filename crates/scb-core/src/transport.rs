use async_trait::async_trait;

use crate::domain::RecipientId;

/// Outbound transport capability.
///
/// Messenger (Graph API) is the first implementation; the core never inspects
/// transport-specific error payloads, only the boolean outcome.
#[async_trait]
pub trait SendPort: Send + Sync {
    /// Returns true when the transport accepted delivery.
    async fn send(&self, recipient: &RecipientId, text: &str) -> bool;
}
