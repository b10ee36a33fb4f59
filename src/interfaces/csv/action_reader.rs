use crate::domain::action::{Action, ActionKind};
use crate::domain::party::PartyRef;
use crate::error::{KycError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of the submitted-action CSV.
///
/// `actor` holds a `role:id` party reference. `detail` is overloaded by
/// action kind: a `;`-separated rule list for `initiate` and
/// `suggest_changes`, the close reason for `reject` and `close`, unused for
/// `approve`.
#[derive(Debug, Deserialize)]
struct ActionRecord {
    action: ActionKind,
    request: String,
    #[serde(default)]
    actor: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ActionRecord {
    fn actor(&self) -> Result<PartyRef> {
        let raw = self
            .actor
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                KycError::InvalidAction(format!("'{}' requires an actor", self.action.as_str()))
            })?;
        raw.parse()
    }

    fn rules(&self) -> Vec<String> {
        self.detail
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|rule| !rule.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn close_reason(&self) -> String {
        self.detail.clone().unwrap_or_default()
    }

    fn into_action(self) -> Result<Action> {
        let action = match self.action {
            ActionKind::Initiate => Action::Initiate {
                applicant: self.actor()?,
                rules: self.rules(),
                request: self.request,
            },
            ActionKind::Approve => Action::Approve {
                approving_party: self.actor()?,
                request: self.request,
            },
            ActionKind::Reject => Action::Reject {
                close_reason: self.close_reason(),
                request: self.request,
            },
            ActionKind::SuggestChanges => Action::SuggestChanges {
                suggesting_party: self.actor()?,
                rules: self.rules(),
                request: self.request,
            },
            ActionKind::Close => Action::Close {
                close_reason: self.close_reason(),
                request: self.request,
            },
        };
        Ok(action)
    }
}

/// Reads submitted actions from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<Action>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    /// Creates a new `ActionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and decodes actions, so large
    /// submission files are processed in a streaming fashion.
    pub fn actions(self) -> impl Iterator<Item = Result<Action>> {
        self.reader
            .into_deserialize::<ActionRecord>()
            .map(|result| {
                result
                    .map_err(KycError::from)
                    .and_then(ActionRecord::into_action)
            })
    }
}
