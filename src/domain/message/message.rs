//! Message module.
//!
//! This module contains the representation of a message in transit
//! between two mailboxes: the raw content fetched from the source,
//! plus the metadata that must survive the copy.

use chrono::{DateTime, FixedOffset};
use mailparse::MailHeaderMap;

use crate::Flags;

/// Represents one message being migrated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MessageRecord {
    /// Represents the full RFC 822 content, byte for byte.
    pub raw: Vec<u8>,
    /// Represents the flag state read from the source server.
    pub flags: Flags,
    /// Represents the server-side reception date, when the source
    /// reported one.
    pub internal_date: Option<DateTime<FixedOffset>>,
}

impl MessageRecord {
    pub fn new<R: Into<Vec<u8>>>(raw: R, flags: Flags) -> Self {
        Self {
            raw: raw.into(),
            flags,
            internal_date: None,
        }
    }

    /// Gets the Subject header of the message, used for trace logging
    /// during the copy.
    pub fn subject(&self) -> Option<String> {
        let (headers, _) = mailparse::parse_headers(&self.raw).ok()?;
        headers.get_first_value("Subject")
    }
}

#[cfg(test)]
mod tests {
    use crate::Flags;

    use super::MessageRecord;

    #[test]
    fn subject() {
        let message = MessageRecord::new(
            concat!(
                "Subject: Hello\r\n",
                "From: alice@localhost\r\n",
                "\r\n",
                "Hello!\r\n",
            ),
            Flags::default(),
        );
        assert_eq!(Some("Hello".into()), message.subject());

        let message = MessageRecord::new("\r\n", Flags::default());
        assert_eq!(None, message.subject());
    }
}
