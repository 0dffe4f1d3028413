//! Mailbox synchronizer module.
//!
//! This module contains the account-level pass: it walks the source
//! mailboxes in server order, makes sure each one exists on the
//! destination, and hands each one over to the copier.

use log::{debug, warn};

use crate::{
    transport::{Result, Session},
    AccountSyncOutcome, SyncError,
};

use super::{copier, report::describe};

/// Synchronizes every mailbox of the source account into the
/// destination account.
///
/// A mailbox that cannot be opened on either end is recorded and
/// skipped; per-message failures come back flattened into the outcome
/// errors, tagged with their mailbox. Only a failing mailbox listing,
/// or a fatal transport error, makes the whole pair fail.
pub fn synchronize_account(
    source: &mut impl Session,
    destination: &mut impl Session,
) -> Result<AccountSyncOutcome> {
    let mailboxes = source.list_mailboxes()?;
    debug!("found {} mailbox(es) on source", mailboxes.len());

    let mut outcome = AccountSyncOutcome {
        mailboxes_attempted: mailboxes.len(),
        ..AccountSyncOutcome::default()
    };

    for mailbox in mailboxes.iter() {
        debug!("synchronizing mailbox: {}", mailbox);

        if let Err(err) = source.examine_mailbox(&mailbox.name) {
            if err.is_fatal() {
                return Err(err);
            }
            warn!("cannot open mailbox {} on source, skipping it", mailbox);
            outcome.errors.push(SyncError {
                mailbox: mailbox.name.clone(),
                message: None,
                cause: describe(&err),
            });
            continue;
        }

        if let Err(err) = ensure_mailbox(destination, &mailbox.name) {
            if err.is_fatal() {
                return Err(err);
            }
            warn!("cannot open mailbox {} on destination, skipping it", mailbox);
            outcome.errors.push(SyncError {
                mailbox: mailbox.name.clone(),
                message: None,
                cause: describe(&err),
            });
            continue;
        }

        match copier::copy_mailbox_contents(source, destination, &mailbox.name) {
            Ok(copy) => {
                outcome.mailboxes_synced += 1;
                outcome.messages_copied += copy.copied;
                outcome
                    .errors
                    .extend(copy.errors.into_iter().map(|err| SyncError {
                        mailbox: mailbox.name.clone(),
                        message: Some(err.seq),
                        cause: err.cause,
                    }));
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                outcome.errors.push(SyncError {
                    mailbox: mailbox.name.clone(),
                    message: None,
                    cause: describe(&err),
                });
            }
        }
    }

    Ok(outcome)
}

/// Selects the mailbox on the destination, creating it first when the
/// server does not know it yet. Creation is idempotent from the
/// caller's point of view: an existing mailbox selects fine on the
/// first try.
fn ensure_mailbox(destination: &mut impl Session, mailbox: &str) -> Result<()> {
    match destination.select_mailbox(mailbox) {
        Ok(_) => return Ok(()),
        Err(err) if err.is_not_found() => (),
        Err(err) => return Err(err),
    }

    debug!("creating mailbox {} on destination", mailbox);
    destination.create_mailbox(mailbox)?;

    // subscription is cosmetic: the migration works without it
    if let Err(err) = destination.subscribe_mailbox(mailbox) {
        warn!("cannot subscribe to mailbox {}: {}", mailbox, err);
    }

    destination.select_mailbox(mailbox)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        migrate::testing::{credential, MemoryTransport},
        transport::Transport,
        Flag, Flags,
    };

    use super::synchronize_account;

    fn transport_with_source() -> MemoryTransport {
        let transport = MemoryTransport::new();
        transport.add_message("src@test", "INBOX", b"a", Flags::default());
        transport.add_message(
            "src@test",
            "INBOX",
            b"b",
            Flags::from_iter([Flag::Seen]),
        );
        transport.add_mailbox("src@test", "Sent");
        transport
    }

    #[test]
    fn sync_creates_missing_mailboxes() {
        let transport = transport_with_source();

        let mut source = transport.login(&credential("src@test"), false).unwrap();
        let mut destination = transport.login(&credential("dst@test"), false).unwrap();

        let outcome = synchronize_account(&mut source, &mut destination).unwrap();
        assert_eq!(2, outcome.mailboxes_attempted);
        assert_eq!(2, outcome.mailboxes_synced);
        assert_eq!(2, outcome.messages_copied);
        assert!(outcome.errors.is_empty());

        assert_eq!(vec!["INBOX", "Sent"], transport.mailbox_names("dst@test"));
        assert_eq!(2, transport.messages("dst@test", "INBOX").len());
        assert!(transport.messages("dst@test", "Sent").is_empty());
    }

    #[test]
    fn sync_twice_does_not_fail_on_existing_mailboxes() {
        let transport = transport_with_source();

        for _ in 0..2 {
            let mut source = transport.login(&credential("src@test"), false).unwrap();
            let mut destination = transport.login(&credential("dst@test"), false).unwrap();
            let outcome = synchronize_account(&mut source, &mut destination).unwrap();
            assert!(outcome.errors.is_empty());
            assert_eq!(2, outcome.mailboxes_synced);
        }

        // no incremental sync: the second run appends everything again
        assert_eq!(4, transport.messages("dst@test", "INBOX").len());
    }

    #[test]
    fn sync_skips_mailbox_it_cannot_create() {
        let transport = transport_with_source();
        transport.deny_create("dst@test", "INBOX");

        let mut source = transport.login(&credential("src@test"), false).unwrap();
        let mut destination = transport.login(&credential("dst@test"), false).unwrap();

        let outcome = synchronize_account(&mut source, &mut destination).unwrap();
        assert_eq!(2, outcome.mailboxes_attempted);
        assert_eq!(1, outcome.mailboxes_synced);
        assert_eq!(0, outcome.messages_copied);
        assert_eq!(1, outcome.errors.len());
        assert_eq!("INBOX", outcome.errors[0].mailbox);
        assert_eq!(None, outcome.errors[0].message);

        // the Sent mailbox still went through
        assert_eq!(vec!["Sent"], transport.mailbox_names("dst@test"));
    }

    #[test]
    fn sync_fails_when_source_cannot_list() {
        let transport = transport_with_source();
        transport.deny_list("src@test");

        let mut source = transport.login(&credential("src@test"), false).unwrap();
        let mut destination = transport.login(&credential("dst@test"), false).unwrap();

        assert!(synchronize_account(&mut source, &mut destination).is_err());
    }
}
