use crate::domain::party::{BankId, PartyRef, PartyRole};
use crate::error::KycError;
use serde::{Deserialize, Serialize};

/// Number of distinct parties that must sign off before a request is fully
/// approved: the applicant and one bank employee.
pub const REQUIRED_APPROVALS: usize = 2;

/// Lifecycle states of a KYC request.
///
/// `Closed` and `Rejected` are terminal. `ReadyForPayment` is entered by an
/// external fulfilment process once the approved product has been delivered,
/// never by the transition rules themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    AwaitingApproval,
    Approved,
    Rejected,
    ReadyForPayment,
    Closed,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Closed | RequestStatus::Rejected)
    }
}

/// A request for KYC approval, the central asset of the workflow.
///
/// All state transitions go through the validating methods below. Each method
/// checks the current state, fails with a [`KycError`] when the transition is
/// not allowed, and leaves the request untouched on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycRequest {
    pub id: String,
    /// The customer the KYC check is about.
    pub applicant: PartyRef,
    /// Bank the applicant belongs to, captured when the request is filed.
    pub issuing_bank: BankId,
    /// Compliance rules the applicant has to satisfy.
    pub rules: Vec<String>,
    /// Evidence documents collected against the rules.
    pub evidence: Vec<String>,
    /// Parties that have approved the current revision of the request.
    pub approval: Vec<PartyRef>,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<String>,
    /// Revision counter owned by the request store.
    #[serde(default)]
    pub version: u64,
}

impl KycRequest {
    /// Files a new request on behalf of `applicant`.
    ///
    /// The applicant counts as the first approving party, so a single bank
    /// approval completes the request. Fails when the applicant is not a
    /// customer.
    pub fn open(
        id: impl Into<String>,
        applicant: PartyRef,
        issuing_bank: BankId,
        rules: Vec<String>,
    ) -> Result<Self, KycError> {
        if applicant.role != PartyRole::Customer {
            return Err(KycError::ApplicantNotCustomer);
        }
        Ok(Self {
            id: id.into(),
            approval: vec![applicant.clone()],
            applicant,
            issuing_bank,
            rules,
            evidence: Vec::new(),
            status: RequestStatus::AwaitingApproval,
            close_reason: None,
            version: 0,
        })
    }

    /// Records an approval by `party`.
    ///
    /// Fails when the request is terminal, already carries the full set of
    /// approvals, already carries an approval by `party`, or already carries
    /// an approval by another employee of the same bank. `bank_of` resolves a
    /// party to its bank; parties it cannot resolve are treated as belonging
    /// to no bank, so only two approvers that both resolve can collide.
    ///
    /// Reaching the full set of approvals moves the request to `Approved`.
    pub fn approve<F>(&mut self, party: PartyRef, bank_of: F) -> Result<(), KycError>
    where
        F: Fn(&PartyRef) -> Option<BankId>,
    {
        if self.status.is_terminal() {
            return Err(KycError::AlreadyClosed);
        }
        if self.approval.len() >= REQUIRED_APPROVALS {
            return Err(KycError::AlreadyFullyApproved);
        }
        if self.approval.contains(&party) {
            return Err(KycError::DuplicateApproval);
        }
        if party.is_employee()
            && let Some(bank) = bank_of(&party)
        {
            let same_bank = self
                .approval
                .iter()
                .filter(|prior| prior.is_employee())
                .any(|prior| bank_of(prior).is_some_and(|prior_bank| prior_bank == bank));
            if same_bank {
                return Err(KycError::BankAlreadyApproved);
            }
        }
        self.approval.push(party);
        if self.approval.len() == REQUIRED_APPROVALS {
            self.status = RequestStatus::Approved;
        }
        Ok(())
    }

    /// Rejects the request outright, recording `close_reason`.
    ///
    /// Allowed from any non-terminal state except `Approved`; a fully
    /// approved request can no longer be rejected.
    pub fn reject(&mut self, close_reason: impl Into<String>) -> Result<(), KycError> {
        if self.status.is_terminal() {
            return Err(KycError::AlreadyClosed);
        }
        if self.status == RequestStatus::Approved {
            return Err(KycError::AlreadyApproved);
        }
        self.status = RequestStatus::Rejected;
        self.close_reason = Some(close_reason.into());
        Ok(())
    }

    /// Amends the compliance rules on behalf of `suggesting_party`.
    ///
    /// Rule changes invalidate prior sign-off: the collected approvals are
    /// discarded in favour of the suggesting party alone and the request
    /// moves back to `AwaitingApproval`. Subject to the same state checks as
    /// [`reject`].
    ///
    /// [`reject`]: KycRequest::reject
    pub fn suggest_changes(
        &mut self,
        rules: Vec<String>,
        suggesting_party: PartyRef,
    ) -> Result<(), KycError> {
        if self.status.is_terminal() {
            return Err(KycError::AlreadyClosed);
        }
        if self.status == RequestStatus::Approved {
            return Err(KycError::AlreadyApproved);
        }
        self.rules = rules;
        self.approval = vec![suggesting_party];
        self.status = RequestStatus::AwaitingApproval;
        Ok(())
    }

    /// Closes a request whose product has been delivered.
    ///
    /// Only allowed from `ReadyForPayment`; anything earlier fails with
    /// [`KycError::NotReadyForClose`].
    pub fn close(&mut self, close_reason: impl Into<String>) -> Result<(), KycError> {
        match self.status {
            RequestStatus::ReadyForPayment => {
                self.status = RequestStatus::Closed;
                self.close_reason = Some(close_reason.into());
                Ok(())
            }
            RequestStatus::Closed | RequestStatus::Rejected => Err(KycError::AlreadyClosed),
            _ => Err(KycError::NotReadyForClose),
        }
    }

    pub fn is_fully_approved(&self) -> bool {
        self.approval.len() >= REQUIRED_APPROVALS
    }
}
