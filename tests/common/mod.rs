use kycflow::application::service::WorkflowService;
use kycflow::infrastructure::in_memory::{
    InMemoryEventBus, InMemoryPartyDirectory, InMemoryRequestStore,
};

/// Builds a service over fresh in-memory adapters and the demo roster,
/// handing back the adapter handles so tests can inspect and steer state
/// behind the service's back.
pub async fn demo_service() -> (
    WorkflowService,
    InMemoryRequestStore,
    InMemoryPartyDirectory,
    InMemoryEventBus,
) {
    let store = InMemoryRequestStore::new();
    let directory = InMemoryPartyDirectory::demo().await;
    let bus = InMemoryEventBus::new();
    let service = WorkflowService::new(
        Box::new(store.clone()),
        Box::new(directory.clone()),
        Box::new(bus.clone()),
    );
    (service, store, directory, bus)
}
