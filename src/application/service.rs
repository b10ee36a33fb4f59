use crate::domain::action::Action;
use crate::domain::event::KycEvent;
use crate::domain::party::{BankId, PartyRef};
use crate::domain::ports::{EventBusBox, PartyDirectoryBox, RequestStoreBox};
use crate::domain::request::KycRequest;
use crate::error::{KycError, Result};
use std::collections::HashMap;

/// The main entry point of the KYC workflow application.
///
/// `WorkflowService` connects the transition rules on [`KycRequest`] to the
/// outside world. Per action it loads the targeted request from the
/// registry, applies one transition and persists the outcome before
/// publishing the matching event. When a transition fails, nothing is
/// persisted and nothing is published.
pub struct WorkflowService {
    requests: RequestStoreBox,
    directory: PartyDirectoryBox,
    events: EventBusBox,
}

impl WorkflowService {
    /// Creates a new `WorkflowService` instance.
    ///
    /// # Arguments
    ///
    /// * `requests` - The registry of KYC requests.
    /// * `directory` - The participant registry used for bank lookups.
    /// * `events` - The channel workflow events are published on.
    pub fn new(
        requests: RequestStoreBox,
        directory: PartyDirectoryBox,
        events: EventBusBox,
    ) -> Self {
        Self {
            requests,
            directory,
            events,
        }
    }

    /// Applies one submitted action against the registry.
    pub async fn apply(&self, action: Action) -> Result<()> {
        match action {
            Action::Initiate {
                request,
                applicant,
                rules,
            } => self.initiate(&request, applicant, rules).await,
            Action::Approve {
                request,
                approving_party,
            } => self.approve(&request, approving_party).await,
            Action::Reject {
                request,
                close_reason,
            } => self.reject(&request, &close_reason).await,
            Action::SuggestChanges {
                request,
                rules,
                suggesting_party,
            } => self.suggest_changes(&request, rules, suggesting_party).await,
            Action::Close {
                request,
                close_reason,
            } => self.close(&request, &close_reason).await,
        }
    }

    /// Files a new KYC request on behalf of `applicant`.
    ///
    /// The applicant must resolve to a bank in the directory; an applicant
    /// nobody vouches for cannot open a request.
    pub async fn initiate(
        &self,
        request_id: &str,
        applicant: PartyRef,
        rules: Vec<String>,
    ) -> Result<()> {
        let issuing_bank = self
            .directory
            .bank_of(&applicant)
            .await?
            .ok_or_else(|| KycError::UnknownParty(applicant.to_string()))?;
        let request = KycRequest::open(request_id, applicant, issuing_bank, rules)?;
        self.requests.add(request.clone()).await?;
        tracing::debug!(request_id, applicant = %request.applicant, "kyc request filed");
        self.announce(KycEvent::InitialApplication { kyc: request })
            .await;
        Ok(())
    }

    /// Records an approval of `request_id` by `party`.
    pub async fn approve(&self, request_id: &str, party: PartyRef) -> Result<()> {
        let mut request = self.fetch(request_id).await?;
        let banks = self.employee_banks(&request, &party).await;
        request.approve(party.clone(), |p| banks.get(p).cloned())?;
        self.requests.update(&mut request).await?;
        tracing::debug!(request_id, party = %party, status = ?request.status, "approval recorded");
        self.announce(KycEvent::Approve {
            kyc: request,
            approving_party: party,
        })
        .await;
        Ok(())
    }

    /// Rejects `request_id`, recording `close_reason`.
    pub async fn reject(&self, request_id: &str, close_reason: &str) -> Result<()> {
        let mut request = self.fetch(request_id).await?;
        request.reject(close_reason)?;
        self.requests.update(&mut request).await?;
        tracing::debug!(request_id, close_reason, "kyc request rejected");
        self.announce(KycEvent::Reject {
            kyc: request,
            close_reason: close_reason.to_string(),
        })
        .await;
        Ok(())
    }

    /// Replaces the compliance rules of `request_id`, resetting the collected
    /// approvals to the suggesting party alone.
    pub async fn suggest_changes(
        &self,
        request_id: &str,
        rules: Vec<String>,
        suggesting_party: PartyRef,
    ) -> Result<()> {
        let mut request = self.fetch(request_id).await?;
        request.suggest_changes(rules.clone(), suggesting_party.clone())?;
        self.requests.update(&mut request).await?;
        tracing::debug!(request_id, party = %suggesting_party, "rule changes suggested");
        self.announce(KycEvent::SuggestChanges {
            kyc: request,
            rules,
            suggesting_party,
        })
        .await;
        Ok(())
    }

    /// Closes `request_id` once the product has been delivered.
    pub async fn close(&self, request_id: &str, close_reason: &str) -> Result<()> {
        let mut request = self.fetch(request_id).await?;
        request.close(close_reason)?;
        self.requests.update(&mut request).await?;
        tracing::debug!(request_id, close_reason, "kyc request closed");
        self.announce(KycEvent::Close {
            kyc: request,
            close_reason: close_reason.to_string(),
        })
        .await;
        Ok(())
    }

    async fn fetch(&self, request_id: &str) -> Result<KycRequest> {
        self.requests
            .get(request_id)
            .await?
            .ok_or_else(|| KycError::NotFound(request_id.to_string()))
    }

    /// Resolves the banks of the incoming party and of every employee already
    /// in the approval list. Parties the directory cannot resolve, or whose
    /// lookup fails, are left out of the map; the same-bank check then treats
    /// them as belonging to no bank.
    async fn employee_banks(
        &self,
        request: &KycRequest,
        party: &PartyRef,
    ) -> HashMap<PartyRef, BankId> {
        let mut banks = HashMap::new();
        for p in request.approval.iter().chain(std::iter::once(party)) {
            if !p.is_employee() || banks.contains_key(p) {
                continue;
            }
            if let Ok(Some(bank)) = self.directory.bank_of(p).await {
                banks.insert(p.clone(), bank);
            }
        }
        banks
    }

    /// The registry write has already committed at this point; a failing bus
    /// must not fail the action, so the error is only logged.
    async fn announce(&self, event: KycEvent) {
        if let Err(err) = self.events.publish(event).await {
            tracing::warn!(error = %err, "event publish failed after commit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{EventBus, RequestStore};
    use crate::domain::request::RequestStatus;
    use crate::infrastructure::in_memory::{
        InMemoryEventBus, InMemoryPartyDirectory, InMemoryRequestStore,
    };
    use async_trait::async_trait;

    async fn service_with_handles() -> (WorkflowService, InMemoryRequestStore, InMemoryEventBus) {
        let store = InMemoryRequestStore::new();
        let bus = InMemoryEventBus::new();
        let directory = InMemoryPartyDirectory::demo().await;
        let service = WorkflowService::new(
            Box::new(store.clone()),
            Box::new(directory),
            Box::new(bus.clone()),
        );
        (service, store, bus)
    }

    #[tokio::test]
    async fn test_initiate_persists_and_publishes() {
        let (service, store, bus) = service_with_handles().await;

        service
            .initiate(
                "KYC-1",
                PartyRef::customer("alice"),
                vec!["basic-profile".to_string()],
            )
            .await
            .unwrap();

        let stored = store.get("KYC-1").await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::AwaitingApproval);
        assert_eq!(stored.issuing_bank, BankId::new("BoD"));

        let events = bus.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), "InitialApplication");
        assert_eq!(events[0].request().id, "KYC-1");
    }

    #[tokio::test]
    async fn test_initiate_unknown_applicant() {
        let (service, store, bus) = service_with_handles().await;

        let result = service
            .initiate("KYC-1", PartyRef::customer("mallory"), vec![])
            .await;
        assert!(matches!(result, Err(KycError::UnknownParty(_))));
        assert!(store.get("KYC-1").await.unwrap().is_none());
        assert!(bus.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_approve_publishes_post_transition_snapshot() {
        let (service, store, bus) = service_with_handles().await;

        service
            .initiate("KYC-1", PartyRef::customer("alice"), vec![])
            .await
            .unwrap();
        service
            .approve("KYC-1", PartyRef::employee("matias"))
            .await
            .unwrap();

        let events = bus.events().await;
        assert_eq!(events.len(), 2);
        let KycEvent::Approve {
            kyc,
            approving_party,
        } = &events[1]
        else {
            panic!("expected an Approve event, got {:?}", events[1]);
        };
        assert_eq!(*approving_party, PartyRef::employee("matias"));
        assert_eq!(kyc.status, RequestStatus::Approved);

        // The snapshot in the event matches what the registry holds.
        let stored = store.get("KYC-1").await.unwrap().unwrap();
        assert_eq!(*kyc, stored);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_failed_transition_publishes_nothing() {
        let (service, store, bus) = service_with_handles().await;

        service
            .initiate("KYC-1", PartyRef::customer("alice"), vec![])
            .await
            .unwrap();
        let before = store.get("KYC-1").await.unwrap().unwrap();

        let result = service.close("KYC-1", "too early").await;
        assert!(matches!(result, Err(KycError::NotReadyForClose)));

        assert_eq!(store.get("KYC-1").await.unwrap().unwrap(), before);
        assert_eq!(bus.events().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_request_not_found() {
        let (service, _, bus) = service_with_handles().await;

        let result = service.approve("KYC-404", PartyRef::employee("matias")).await;
        assert!(matches!(result, Err(KycError::NotFound(_))));
        assert!(bus.events().await.is_empty());
    }

    struct FailingBus;

    #[async_trait]
    impl EventBus for FailingBus {
        async fn publish(&self, _event: KycEvent) -> Result<()> {
            Err(KycError::InternalError(Box::new(std::io::Error::other(
                "bus down",
            ))))
        }
    }

    #[tokio::test]
    async fn test_failing_bus_does_not_fail_action() {
        let store = InMemoryRequestStore::new();
        let directory = InMemoryPartyDirectory::demo().await;
        let service = WorkflowService::new(
            Box::new(store.clone()),
            Box::new(directory),
            Box::new(FailingBus),
        );

        service
            .initiate("KYC-1", PartyRef::customer("alice"), vec![])
            .await
            .unwrap();

        // The registry committed even though publishing failed.
        assert!(store.get("KYC-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_apply_routes_all_action_kinds() {
        let (service, store, _) = service_with_handles().await;

        service
            .apply(Action::Initiate {
                request: "KYC-1".to_string(),
                applicant: PartyRef::customer("bob"),
                rules: vec!["basic-profile".to_string()],
            })
            .await
            .unwrap();
        service
            .apply(Action::SuggestChanges {
                request: "KYC-1".to_string(),
                rules: vec!["enhanced-dd".to_string()],
                suggesting_party: PartyRef::employee("matias"),
            })
            .await
            .unwrap();
        service
            .apply(Action::Approve {
                request: "KYC-1".to_string(),
                approving_party: PartyRef::employee("ella"),
            })
            .await
            .unwrap();

        let stored = store.get("KYC-1").await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Approved);
        assert_eq!(stored.rules, vec!["enhanced-dd"]);
        assert_eq!(stored.version, 2);

        service
            .apply(Action::Reject {
                request: "KYC-2".to_string(),
                close_reason: "no such request".to_string(),
            })
            .await
            .unwrap_err();
    }
}
