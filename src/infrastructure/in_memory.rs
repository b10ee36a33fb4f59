use crate::domain::event::KycEvent;
use crate::domain::party::{Bank, BankEmployee, BankId, Customer, PartyRef, PartyRole};
use crate::domain::ports::{EventBus, PartyDirectory, RequestStore};
use crate::domain::request::KycRequest;
use crate::error::{KycError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory registry of KYC requests.
///
/// Uses `Arc<RwLock<HashMap<String, KycRequest>>>` to allow shared concurrent
/// access. Ideal for testing or single-run invocations where persistence is
/// not required.
#[derive(Default, Clone)]
pub struct InMemoryRequestStore {
    requests: Arc<RwLock<HashMap<String, KycRequest>>>,
}

impl InMemoryRequestStore {
    /// Creates a new, empty in-memory request store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn get(&self, id: &str) -> Result<Option<KycRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(id).cloned())
    }

    async fn add(&self, request: KycRequest) -> Result<()> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.id) {
            return Err(KycError::AlreadyExists(request.id.clone()));
        }
        requests.insert(request.id.clone(), request);
        Ok(())
    }

    async fn update(&self, request: &mut KycRequest) -> Result<()> {
        let mut requests = self.requests.write().await;
        let stored = requests
            .get(&request.id)
            .ok_or_else(|| KycError::NotFound(request.id.clone()))?;
        if stored.version != request.version {
            return Err(KycError::VersionConflict {
                id: request.id.clone(),
                submitted: request.version,
                stored: stored.version,
            });
        }
        request.version += 1;
        requests.insert(request.id.clone(), request.clone());
        Ok(())
    }
}

#[derive(Default)]
struct DirectoryInner {
    banks: HashMap<BankId, Bank>,
    customers: HashMap<String, Customer>,
    employees: HashMap<String, BankEmployee>,
    restricted: HashSet<PartyRef>,
}

/// A thread-safe in-memory participant directory.
///
/// Holds the bank, customer and employee records and answers the bank
/// lookups behind the same-bank approval check. Parties marked restricted
/// resolve to `None`, like records the caller has no read access to.
#[derive(Default, Clone)]
pub struct InMemoryPartyDirectory {
    inner: Arc<RwLock<DirectoryInner>>,
}

impl InMemoryPartyDirectory {
    /// Creates a new, empty in-memory directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory pre-loaded with the demo roster: the banks BoD and
    /// EB, one employee at each, and one customer at each.
    pub async fn demo() -> Self {
        let directory = Self::new();
        directory
            .add_bank(Bank {
                id: BankId::new("BoD"),
                name: "Bank of Dinero".to_string(),
            })
            .await;
        directory
            .add_bank(Bank {
                id: BankId::new("EB"),
                name: "Eastwood Banking".to_string(),
            })
            .await;
        directory
            .add_employee(BankEmployee {
                id: "matias".to_string(),
                name: "Matías".to_string(),
                bank: BankId::new("BoD"),
            })
            .await;
        directory
            .add_employee(BankEmployee {
                id: "ella".to_string(),
                name: "Ella".to_string(),
                bank: BankId::new("EB"),
            })
            .await;
        directory
            .add_customer(Customer {
                id: "alice".to_string(),
                name: "Alice".to_string(),
                last_name: "Hamilton".to_string(),
                company_name: "QuickFix IT".to_string(),
                bank: BankId::new("BoD"),
            })
            .await;
        directory
            .add_customer(Customer {
                id: "bob".to_string(),
                name: "Bob".to_string(),
                last_name: "Appleton".to_string(),
                company_name: "Conga Computers".to_string(),
                bank: BankId::new("EB"),
            })
            .await;
        directory
    }

    pub async fn add_bank(&self, bank: Bank) {
        let mut inner = self.inner.write().await;
        inner.banks.insert(bank.id.clone(), bank);
    }

    pub async fn add_customer(&self, customer: Customer) {
        let mut inner = self.inner.write().await;
        inner.customers.insert(customer.id.clone(), customer);
    }

    pub async fn add_employee(&self, employee: BankEmployee) {
        let mut inner = self.inner.write().await;
        inner.employees.insert(employee.id.clone(), employee);
    }

    /// Marks a party as unreadable; `bank_of` resolves it to `None` from now
    /// on.
    pub async fn restrict(&self, party: PartyRef) {
        let mut inner = self.inner.write().await;
        inner.restricted.insert(party);
    }
}

#[async_trait]
impl PartyDirectory for InMemoryPartyDirectory {
    async fn bank_of(&self, party: &PartyRef) -> Result<Option<BankId>> {
        let inner = self.inner.read().await;
        if inner.restricted.contains(party) {
            return Ok(None);
        }
        let bank = match party.role {
            PartyRole::Customer => inner.customers.get(&party.id).map(|c| c.bank.clone()),
            PartyRole::BankEmployee => inner.employees.get(&party.id).map(|e| e.bank.clone()),
        };
        Ok(bank)
    }
}

/// An event bus that records everything published on it.
///
/// Uses `Arc<RwLock<Vec<KycEvent>>>` so tests and local runs can inspect the
/// published events through a cloned handle.
#[derive(Default, Clone)]
pub struct InMemoryEventBus {
    events: Arc<RwLock<Vec<KycEvent>>>,
}

impl InMemoryEventBus {
    /// Creates a new, empty in-memory event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event published so far, in publish order.
    pub async fn events(&self) -> Vec<KycEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: KycEvent) -> Result<()> {
        let mut events = self.events.write().await;
        events.push(event);
        Ok(())
    }
}
