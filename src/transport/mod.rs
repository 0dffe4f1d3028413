//! Transport module.
//!
//! This module exposes the transport traits the migration engine runs
//! against: a [`Transport`] opens authenticated [`Session`]s, and a
//! session drives one mail server. The IMAP implementation lives in
//! the [`imap`] submodule; tests run the engine against an in-memory
//! implementation instead.

use std::{error, result};
use thiserror::Error;

use crate::{AccountCredential, Mailboxes, MessageRecord};

#[cfg(feature = "imap-transport")]
pub mod imap;
#[cfg(feature = "imap-transport")]
pub use self::imap::{ImapSession, ImapSessionStream, ImapTransport};

/// Boxed error source, so the shared [`Error`] enum stays decoupled
/// from any one transport implementation.
pub type BoxError = Box<dyn error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot connect to server {1}")]
    ConnectError(#[source] BoxError, String),
    #[error("cannot login to server {1} as {2}")]
    LoginError(#[source] BoxError, String, String),
    #[error("cannot list mailboxes")]
    ListMailboxesError(#[source] BoxError),
    #[error("cannot find mailbox {0}")]
    MailboxNotFoundError(String),
    #[error("cannot select mailbox {1}")]
    SelectMailboxError(#[source] BoxError, String),
    #[error("cannot create mailbox {1}")]
    CreateMailboxError(#[source] BoxError, String),
    #[error("cannot subscribe to mailbox {1}")]
    SubscribeMailboxError(#[source] BoxError, String),
    #[error("cannot list messages")]
    ListMessagesError(#[source] BoxError),
    #[error("cannot fetch message {1}")]
    FetchMessageError(#[source] BoxError, u32),
    #[error("cannot append message to mailbox {1}")]
    AppendMessageError(#[source] BoxError, String),
    #[error("cannot logout from server")]
    LogoutError(#[source] BoxError),
    #[error("transport failure: {0}")]
    FatalError(String),
}

impl Error {
    /// Whether the error means the requested mailbox does not exist,
    /// as opposed to any other selection failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MailboxNotFoundError(_))
    }

    /// Whether the transport considers the condition unrecoverable
    /// for the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalError(_))
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Opens authenticated sessions. Shared between the parallel per-pair
/// migration tasks.
pub trait Transport: Sync {
    type Session: Session;

    fn login(&self, credential: &AccountCredential, debug: bool) -> Result<Self::Session>;
}

/// An authenticated, stateful connection to one mail server. Owned by
/// exactly one migration task at a time.
pub trait Session: Send {
    /// Lists the mailboxes of the account, in server order.
    fn list_mailboxes(&mut self) -> Result<Mailboxes>;

    /// Selects a mailbox read-only and returns its message count.
    fn examine_mailbox(&mut self, mailbox: &str) -> Result<u32>;

    /// Selects a mailbox and returns its message count.
    fn select_mailbox(&mut self, mailbox: &str) -> Result<u32>;

    fn create_mailbox(&mut self, mailbox: &str) -> Result<()>;

    fn subscribe_mailbox(&mut self, mailbox: &str) -> Result<()>;

    /// Lists the sequence numbers of the selected mailbox, ascending.
    fn list_messages(&mut self) -> Result<Vec<u32>>;

    /// Fetches one message of the selected mailbox, with its flags.
    /// A message whose flags cannot be read comes back with an empty
    /// flag set rather than an error.
    fn fetch_message(&mut self, seq: u32) -> Result<MessageRecord>;

    /// Appends a message to the given mailbox, preserving its flags.
    fn append_message(&mut self, mailbox: &str, message: &MessageRecord) -> Result<()>;

    fn logout(&mut self) -> Result<()>;
}
