//! Role-to-recipient lookup backed by the `users` table.

use async_trait::async_trait;
use driverflow_core::error::NotificationError;
use driverflow_core::ports::RecipientDirectory;
use driverflow_core::roles::Role;

use crate::repositories::UserRepo;
use crate::DbPool;

/// Resolves a role to the emails of its active users.
#[derive(Clone)]
pub struct PgRecipientDirectory {
    pool: DbPool,
}

impl PgRecipientDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientDirectory for PgRecipientDirectory {
    async fn emails_for_role(&self, role: Role) -> Result<Vec<String>, NotificationError> {
        UserRepo::find_active_emails_by_role(&self.pool, role.as_str())
            .await
            .map_err(|e| NotificationError::Recipients(e.to_string()))
    }
}
