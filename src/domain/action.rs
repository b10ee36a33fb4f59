use crate::domain::party::PartyRef;
use serde::Deserialize;

/// Discriminant of a submitted action, as spelled in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Initiate,
    Approve,
    Reject,
    SuggestChanges,
    Close,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Initiate => "initiate",
            ActionKind::Approve => "approve",
            ActionKind::Reject => "reject",
            ActionKind::SuggestChanges => "suggest_changes",
            ActionKind::Close => "close",
        }
    }
}

/// A fully decoded action targeting one KYC request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Initiate {
        request: String,
        applicant: PartyRef,
        rules: Vec<String>,
    },
    Approve {
        request: String,
        approving_party: PartyRef,
    },
    Reject {
        request: String,
        close_reason: String,
    },
    SuggestChanges {
        request: String,
        rules: Vec<String>,
        suggesting_party: PartyRef,
    },
    Close {
        request: String,
        close_reason: String,
    },
}

impl Action {
    pub fn request_id(&self) -> &str {
        match self {
            Action::Initiate { request, .. }
            | Action::Approve { request, .. }
            | Action::Reject { request, .. }
            | Action::SuggestChanges { request, .. }
            | Action::Close { request, .. } => request,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Initiate { .. } => ActionKind::Initiate,
            Action::Approve { .. } => ActionKind::Approve,
            Action::Reject { .. } => ActionKind::Reject,
            Action::SuggestChanges { .. } => ActionKind::SuggestChanges,
            Action::Close { .. } => ActionKind::Close,
        }
    }
}
