//! Notification delivery for the driver workflow.
//!
//! - [`EmailNotifier`] implements the core `Notifier` port: it resolves a
//!   role to recipient addresses and hands each message to a [`Mailer`].
//! - [`delivery`] holds the SMTP channel.

pub mod delivery;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use delivery::Mailer;
pub use notifier::EmailNotifier;
