//! Mailbox module.
//!
//! This module contains the representation of one mailbox of a mail
//! account.

use serde::Serialize;
use std::fmt;

/// Represents the mailbox.
///
/// The name is an opaque token: hierarchy separators vary between
/// servers, so the name is only ever compared and passed back as-is.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Mailbox {
    /// Represents the mailbox hierarchy delimiter.
    pub delim: String,
    /// Represents the mailbox name.
    pub name: String,
}

impl Mailbox {
    pub fn new<N: ToString>(name: N) -> Self {
        Self {
            delim: String::default(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
