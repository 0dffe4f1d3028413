//! Report module.
//!
//! This module contains the outcome types produced by the migration
//! engine. Failures surface exclusively through these values: the
//! engine never returns an error for anything below the scope of a
//! whole account pair.

use serde::Serialize;
use std::{error, ops};

use crate::config::AccountPair;

/// Represents a failure scoped to one message of a mailbox.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MessageError {
    /// Represents the sequence number of the message on the source.
    pub seq: u32,
    pub cause: String,
}

/// Represents the outcome of copying one mailbox.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MailboxCopyOutcome {
    /// Represents the number of messages found on the source.
    pub attempted: usize,
    /// Represents the number of messages appended to the destination.
    pub copied: usize,
    pub errors: Vec<MessageError>,
}

/// Represents a failure scoped to one mailbox, or to one message of
/// it when `message` is set. Pair-level failures reuse this shape
/// with an empty mailbox name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SyncError {
    pub mailbox: String,
    pub message: Option<u32>,
    pub cause: String,
}

/// Represents the outcome of synchronizing one account pair.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AccountSyncOutcome {
    /// Represents the number of mailboxes listed on the source.
    pub mailboxes_attempted: usize,
    /// Represents the number of mailboxes the copier ran over.
    pub mailboxes_synced: usize,
    /// Represents the number of messages appended, over all
    /// mailboxes.
    pub messages_copied: usize,
    pub errors: Vec<SyncError>,
}

/// Represents the reportable outcome of one account pair. The pair is
/// identified by its email addresses only, never by credentials.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MigrationResult {
    pub source: String,
    pub destination: String,
    pub mailboxes_attempted: usize,
    pub mailboxes_synced: usize,
    pub messages_copied: usize,
    pub errors: Vec<SyncError>,
    /// Set when the run was cancelled before this pair was attempted.
    pub aborted: bool,
}

impl MigrationResult {
    pub(crate) fn from_outcome(pair: &AccountPair, outcome: AccountSyncOutcome) -> Self {
        Self {
            mailboxes_attempted: outcome.mailboxes_attempted,
            mailboxes_synced: outcome.mailboxes_synced,
            messages_copied: outcome.messages_copied,
            errors: outcome.errors,
            ..Self::identified(pair)
        }
    }

    pub(crate) fn failed(pair: &AccountPair, cause: String) -> Self {
        Self {
            errors: vec![SyncError {
                mailbox: String::new(),
                message: None,
                cause,
            }],
            ..Self::identified(pair)
        }
    }

    pub(crate) fn aborted(pair: &AccountPair) -> Self {
        Self {
            aborted: true,
            ..Self::identified(pair)
        }
    }

    fn identified(pair: &AccountPair) -> Self {
        Self {
            source: pair.source.email.clone(),
            destination: pair.destination.email.clone(),
            mailboxes_attempted: 0,
            mailboxes_synced: 0,
            messages_copied: 0,
            errors: Vec::new(),
            aborted: false,
        }
    }

    pub fn is_success(&self) -> bool {
        !self.aborted && self.errors.is_empty()
    }
}

/// Represents the ordered outcomes of one migration run, one per
/// configured account pair.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RunSummary(pub Vec<MigrationResult>);

impl RunSummary {
    pub fn messages_copied(&self) -> usize {
        self.iter().map(|result| result.messages_copied).sum()
    }

    pub fn is_success(&self) -> bool {
        self.iter().all(MigrationResult::is_success)
    }
}

impl ops::Deref for RunSummary {
    type Target = Vec<MigrationResult>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ops::DerefMut for RunSummary {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<MigrationResult> for RunSummary {
    fn from_iter<T: IntoIterator<Item = MigrationResult>>(iter: T) -> Self {
        RunSummary(iter.into_iter().collect())
    }
}

/// Renders an error and its source chain into the cause string
/// recorded in outcomes.
pub(crate) fn describe(err: &dyn error::Error) -> String {
    let mut cause = err.to_string();
    let mut source = err.source();

    while let Some(err) = source {
        cause.push_str(": ");
        cause.push_str(&err.to_string());
        source = err.source();
    }

    cause
}

#[cfg(test)]
mod tests {
    use crate::transport::{BoxError, Error};

    #[test]
    fn describe_renders_source_chain() {
        let err = Error::AppendMessageError(BoxError::from("connection reset"), "INBOX".into());
        assert_eq!(
            "cannot append message to mailbox INBOX: connection reset",
            super::describe(&err),
        );
    }
}
