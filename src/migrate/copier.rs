//! Message copier module.
//!
//! This module contains the mailbox-level transfer: every message of
//! the selected source mailbox is fetched and appended to the
//! same-named mailbox on the destination, flags included.

use log::{debug, log_enabled, trace, warn, Level};

use crate::{
    transport::{Result, Session},
    Flag, MailboxCopyOutcome, MessageError,
};

use super::report::describe;

/// Copies every message of the selected source mailbox into the given
/// mailbox on the destination.
///
/// The source session must have the mailbox selected (read-only is
/// enough); the source is never written to. A message that cannot be
/// fetched or appended is recorded and skipped, so one broken message
/// never stops the mailbox. Only a failing enumeration, or a fatal
/// transport error, makes the whole copy fail.
pub fn copy_mailbox_contents(
    source: &mut impl Session,
    destination: &mut impl Session,
    mailbox: &str,
) -> Result<MailboxCopyOutcome> {
    let seqs = source.list_messages()?;
    debug!("found {} message(s) in mailbox {}", seqs.len(), mailbox);

    let mut outcome = MailboxCopyOutcome {
        attempted: seqs.len(),
        ..MailboxCopyOutcome::default()
    };

    for seq in seqs {
        let message = match source.fetch_message(seq) {
            Ok(message) => message,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!("cannot fetch message {} from {}, skipping it", seq, mailbox);
                outcome.errors.push(MessageError {
                    seq,
                    cause: describe(&err),
                });
                continue;
            }
        };

        if log_enabled!(Level::Trace) {
            trace!(
                "message {}: subject {:?} ({})",
                seq,
                message.subject().unwrap_or_default(),
                if message.flags.contains(&Flag::Seen) {
                    "read"
                } else {
                    "unread"
                },
            );
        }

        match destination.append_message(mailbox, &message) {
            Ok(()) => outcome.copied += 1,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!("cannot append message {} to {}, skipping it", seq, mailbox);
                outcome.errors.push(MessageError {
                    seq,
                    cause: describe(&err),
                });
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use crate::{
        migrate::testing::{credential, MemorySession, MemoryTransport},
        transport::{Session, Transport},
        Flag, Flags,
    };

    use super::copy_mailbox_contents;

    fn sessions(transport: &MemoryTransport) -> (MemorySession, MemorySession) {
        let source = transport.login(&credential("src@test"), false).unwrap();
        let destination = transport.login(&credential("dst@test"), false).unwrap();
        (source, destination)
    }

    #[test]
    fn copy_empty_mailbox() {
        let transport = MemoryTransport::new();
        transport.add_mailbox("src@test", "INBOX");
        transport.add_mailbox("dst@test", "INBOX");

        let (mut source, mut destination) = sessions(&transport);
        source.examine_mailbox("INBOX").unwrap();

        let outcome = copy_mailbox_contents(&mut source, &mut destination, "INBOX").unwrap();
        assert_eq!(0, outcome.attempted);
        assert_eq!(0, outcome.copied);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn copy_preserves_flags() {
        let transport = MemoryTransport::new();
        transport.add_message("src@test", "INBOX", b"Subject: a\r\n\r\na", Flags::default());
        transport.add_message(
            "src@test",
            "INBOX",
            b"Subject: b\r\n\r\nb",
            Flags::from_iter([Flag::Seen, Flag::Flagged]),
        );
        transport.add_mailbox("dst@test", "INBOX");

        let (mut source, mut destination) = sessions(&transport);
        source.examine_mailbox("INBOX").unwrap();

        let outcome = copy_mailbox_contents(&mut source, &mut destination, "INBOX").unwrap();
        assert_eq!(2, outcome.attempted);
        assert_eq!(2, outcome.copied);
        assert!(outcome.errors.is_empty());

        let copied = transport.messages("dst@test", "INBOX");
        assert_eq!(2, copied.len());
        assert_eq!(Flags::default(), copied[0].flags);
        assert_eq!(b"Subject: a\r\n\r\na".to_vec(), copied[0].raw);
        assert_eq!(Flags::from_iter([Flag::Seen, Flag::Flagged]), copied[1].flags);

        // the source kept everything
        assert_eq!(2, transport.messages("src@test", "INBOX").len());
    }

    #[test]
    fn copy_continues_after_failed_append() {
        let transport = MemoryTransport::new();
        for n in 1..=3u8 {
            transport.add_message("src@test", "INBOX", &[n], Flags::default());
        }
        transport.add_mailbox("dst@test", "INBOX");
        transport.deny_append("dst@test", "INBOX", 2);

        let (mut source, mut destination) = sessions(&transport);
        source.examine_mailbox("INBOX").unwrap();

        let outcome = copy_mailbox_contents(&mut source, &mut destination, "INBOX").unwrap();
        assert_eq!(3, outcome.attempted);
        assert_eq!(2, outcome.copied);
        assert_eq!(1, outcome.errors.len());
        assert_eq!(2, outcome.errors[0].seq);
        assert!(outcome.errors[0].cause.contains("append denied"));

        let copied = transport.messages("dst@test", "INBOX");
        assert_eq!(vec![1u8], copied[0].raw);
        assert_eq!(vec![3u8], copied[1].raw);
    }

    #[test]
    fn copy_stops_on_fatal_append() {
        let transport = MemoryTransport::new();
        transport.add_message("src@test", "INBOX", b"a", Flags::default());
        transport.add_mailbox("dst@test", "INBOX");
        transport.fatal_append("dst@test", "INBOX");

        let (mut source, mut destination) = sessions(&transport);
        source.examine_mailbox("INBOX").unwrap();

        let err = copy_mailbox_contents(&mut source, &mut destination, "INBOX").unwrap_err();
        assert!(err.is_fatal());
    }
}
