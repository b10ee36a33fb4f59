use crate::domain::party::PartyRef;
use crate::domain::request::KycRequest;
use serde::{Deserialize, Serialize};

/// Notification emitted after every successful transition.
///
/// Each variant carries the post-transition snapshot of the request plus the
/// inputs specific to the transition, so downstream consumers can follow the
/// workflow without querying the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum KycEvent {
    InitialApplication {
        kyc: KycRequest,
    },
    Approve {
        kyc: KycRequest,
        approving_party: PartyRef,
    },
    Reject {
        kyc: KycRequest,
        close_reason: String,
    },
    SuggestChanges {
        kyc: KycRequest,
        rules: Vec<String>,
        suggesting_party: PartyRef,
    },
    Close {
        kyc: KycRequest,
        close_reason: String,
    },
}

impl KycEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            KycEvent::InitialApplication { .. } => "InitialApplication",
            KycEvent::Approve { .. } => "Approve",
            KycEvent::Reject { .. } => "Reject",
            KycEvent::SuggestChanges { .. } => "SuggestChanges",
            KycEvent::Close { .. } => "Close",
        }
    }

    /// The request snapshot the event was emitted for.
    pub fn request(&self) -> &KycRequest {
        match self {
            KycEvent::InitialApplication { kyc }
            | KycEvent::Approve { kyc, .. }
            | KycEvent::Reject { kyc, .. }
            | KycEvent::SuggestChanges { kyc, .. }
            | KycEvent::Close { kyc, .. } => kyc,
        }
    }
}
