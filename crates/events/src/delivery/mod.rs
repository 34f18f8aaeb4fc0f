//! External delivery channels for workflow notifications.

use async_trait::async_trait;

pub mod email;

use email::EmailError;

/// Sends a single plain-text message to one address.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}
