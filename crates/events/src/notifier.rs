//! Role-addressed email notifier.

use std::sync::Arc;

use async_trait::async_trait;
use driverflow_core::error::NotificationError;
use driverflow_core::ports::{Notifier, RecipientDirectory};
use driverflow_core::roles::Role;
use tokio::task::JoinSet;

use crate::delivery::Mailer;

/// Sends each notification to every active holder of the target role.
///
/// `notify` returns once recipients are resolved; the emails go out on a
/// background task. Without a mailer (SMTP unconfigured) messages are logged
/// instead.
pub struct EmailNotifier {
    directory: Arc<dyn RecipientDirectory>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl EmailNotifier {
    pub fn new(directory: Arc<dyn RecipientDirectory>, mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self { directory, mailer }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(
        &self,
        role: Role,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let recipients = self.directory.emails_for_role(role).await?;
        if recipients.is_empty() {
            tracing::debug!(role = %role, subject, "No recipients for notification");
            return Ok(());
        }

        let Some(mailer) = &self.mailer else {
            tracing::info!(
                role = %role,
                subject,
                recipients = recipients.len(),
                "SMTP not configured, notification not mailed"
            );
            return Ok(());
        };

        tokio::spawn(deliver(
            Arc::clone(mailer),
            role,
            recipients,
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}

/// Send one message per recipient concurrently, logging each failure.
///
/// Runs as a detached task; nothing awaits it.
async fn deliver(
    mailer: Arc<dyn Mailer>,
    role: Role,
    recipients: Vec<String>,
    subject: String,
    body: String,
) {
    let subject: Arc<str> = subject.into();
    let body: Arc<str> = body.into();
    let mut sends = JoinSet::new();
    for to in recipients {
        let mailer = Arc::clone(&mailer);
        let subject = Arc::clone(&subject);
        let body = Arc::clone(&body);
        sends.spawn(async move {
            let result = mailer.send(&to, &subject, &body).await;
            (to, result)
        });
    }

    let mut failed = 0usize;
    while let Some(joined) = sends.join_next().await {
        match joined {
            Ok((_, Ok(()))) => {}
            Ok((to, Err(e))) => {
                failed += 1;
                tracing::warn!(to = %to, role = %role, subject = %subject, error = %e, "Email delivery failed");
            }
            Err(e) => {
                failed += 1;
                tracing::error!(error = %e, "Email task panicked");
            }
        }
    }
    if failed > 0 {
        tracing::warn!(role = %role, failed, subject = %subject, "Some notification emails were not delivered");
    }
}
