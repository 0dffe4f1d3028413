//! Mailboxes module.
//!
//! This module contains the representation of the list of mailboxes
//! of a mail account, in the order the server reported them.

use serde::Serialize;
use std::ops;

use crate::Mailbox;

/// Represents the list of mailboxes.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Mailboxes(pub Vec<Mailbox>);

impl ops::Deref for Mailboxes {
    type Target = Vec<Mailbox>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ops::DerefMut for Mailboxes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<Mailbox> for Mailboxes {
    fn from_iter<T: IntoIterator<Item = Mailbox>>(iter: T) -> Self {
        Mailboxes(iter.into_iter().collect())
    }
}
