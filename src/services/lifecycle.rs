//! Account lifecycle mutations.
//!
//! Every mutation has the same shape: locate the account in the registry,
//! change one field, persist the registry, then run the sync command so the
//! enforcement layer picks the change up. A failed sync does not roll the
//! registry back; the caller gets `SyncFailed` and the registry keeps the new
//! intent, which the next successful sync will project.

use crate::constants::SECONDS_PER_DAY;
use crate::services::commands::{CommandOutcome, ExternalCommands};
use crate::services::registry::{AccountRecord, Registry, RegistryError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Expiry,
    Suspension,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Expiry => "expiry",
            Field::Suspension => "status",
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("account {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Registry(RegistryError),
    /// The registry already holds the change; only the projection failed.
    #[error("{} updated, but sync failed:\n{}", .field.label(), .outcome.describe(usize::MAX))]
    SyncFailed {
        field: Field,
        record: AccountRecord,
        outcome: CommandOutcome,
    },
}

impl From<RegistryError> for LifecycleError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(name) => LifecycleError::NotFound(name),
            other => LifecycleError::Registry(other),
        }
    }
}

/// New expiry for an absolute "N days from now" edit.
pub fn expiry_from_now(now: i64, days: i64) -> i64 {
    now + days * SECONDS_PER_DAY
}

/// New expiry for an extension: counted from the later of now and the current expiry,
/// so an already-lapsed account never gets credited with the lapsed period.
pub fn extended_expiry(now: i64, current: i64, days: i64) -> i64 {
    now.max(current) + days * SECONDS_PER_DAY
}

#[derive(Clone)]
pub struct Lifecycle {
    registry: Registry,
    commands: ExternalCommands,
}

impl Lifecycle {
    pub fn new(registry: Registry, commands: ExternalCommands) -> Self {
        Self { registry, commands }
    }

    pub async fn set_expiry_days(&self, name: &str, days: i64, now: i64) -> Result<AccountRecord, LifecycleError> {
        let record = self
            .registry
            .update(name, |c| {
                c.expire = expiry_from_now(now, days);
                c.revoked = false;
            })
            .await?;
        self.sync(Field::Expiry, record).await
    }

    pub async fn extend_expiry_days(&self, name: &str, days: i64, now: i64) -> Result<AccountRecord, LifecycleError> {
        let record = self
            .registry
            .update(name, |c| {
                c.expire = extended_expiry(now, c.expire, days);
                c.revoked = false;
            })
            .await?;
        self.sync(Field::Expiry, record).await
    }

    pub async fn set_suspended(&self, name: &str, suspended: bool) -> Result<AccountRecord, LifecycleError> {
        let record = self.registry.update(name, |c| c.revoked = suspended).await?;
        self.sync(Field::Suspension, record).await
    }

    /// The trial flag only drives notices and presentation; it is not projected
    /// to the enforcement layer, so no sync runs.
    pub async fn set_trial(&self, name: &str, trial: bool) -> Result<AccountRecord, LifecycleError> {
        Ok(self.registry.update(name, |c| c.trial = trial).await?)
    }

    async fn sync(&self, field: Field, record: AccountRecord) -> Result<AccountRecord, LifecycleError> {
        let outcome = self.commands.sync_expiry().await;
        if outcome.success() {
            Ok(record)
        } else {
            tracing::warn!(target = "lifecycle.sync", account = %record.name, field = field.label(), rc = outcome.code, "registry updated but sync failed");
            Err(LifecycleError::SyncFailed { field, record, outcome })
        }
    }
}
