use super::event::KycEvent;
use super::party::{BankId, PartyRef};
use super::request::KycRequest;
use crate::error::Result;
use async_trait::async_trait;

/// Registry of KYC request assets, keyed by request id.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<KycRequest>>;

    /// Adds a freshly opened request. Fails with
    /// [`KycError::AlreadyExists`](crate::error::KycError::AlreadyExists)
    /// when the id is already taken.
    async fn add(&self, request: KycRequest) -> Result<()>;

    /// Replaces a stored request, comparing `request.version` against the
    /// stored revision. On success the store bumps the revision and writes it
    /// back into `request`; on a mismatch it fails with
    /// [`KycError::VersionConflict`](crate::error::KycError::VersionConflict)
    /// and stores nothing.
    async fn update(&self, request: &mut KycRequest) -> Result<()>;
}

/// Read-only view of the participant registry.
#[async_trait]
pub trait PartyDirectory: Send + Sync {
    /// Resolves the bank a party belongs to. `Ok(None)` means the party is
    /// unknown or not visible to the caller; resolution failures are not
    /// fatal to the approval flow.
    async fn bank_of(&self, party: &PartyRef) -> Result<Option<BankId>>;
}

/// Downstream notification channel for workflow events.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: KycEvent) -> Result<()>;
}

pub type RequestStoreBox = Box<dyn RequestStore>;
pub type PartyDirectoryBox = Box<dyn PartyDirectory>;
pub type EventBusBox = Box<dyn EventBus>;
