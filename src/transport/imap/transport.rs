//! IMAP transport module.
//!
//! This module contains the IMAP implementation of the transport
//! traits, built on the `imap` crate over TLS.

use imap_proto::NameAttribute;
use log::{log_enabled, trace, Level};
use native_tls::{TlsConnector, TlsStream};
use std::{
    io::{self, Read, Write},
    net::TcpStream,
    time::Duration,
};
use utf7_imap::{decode_utf7_imap as decode_utf7, encode_utf7_imap as encode_utf7};

use crate::{
    domain::flag::imap::RawFlag,
    transport::{BoxError, Error, Result, Session, Transport},
    AccountCredential, Flag, Flags, Mailbox, Mailboxes, MessageRecord,
};

/// Socket timeout applied to every network call, in seconds.
const DEFAULT_TIMEOUT: u64 = 60;

/// Fetch query for one full message: `BODY.PEEK` keeps the source
/// mailbox untouched (a plain `BODY` fetch would set `\Seen`).
const FETCH_QUERY: &str = "(FLAGS INTERNALDATE BODY.PEEK[])";

pub enum ImapSessionStream {
    Tls(TlsStream<TcpStream>),
    Tcp(TcpStream),
}

impl Read for ImapSessionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tls(stream) => stream.read(buf),
            Self::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for ImapSessionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tls(stream) => stream.write(buf),
            Self::Tcp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tls(stream) => stream.flush(),
            Self::Tcp(stream) => stream.flush(),
        }
    }
}

/// Represents the IMAP transport options. Credentials are not part of
/// the transport: they come in per login.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct ImapTransport {
    /// Disables TLS when set to false.
    pub ssl: Option<bool>,
    /// Enables StartTLS.
    pub starttls: Option<bool>,
    /// Trusts any certificate.
    pub insecure: Option<bool>,
    /// Overrides the socket timeout, in seconds.
    pub timeout: Option<u64>,
}

impl ImapTransport {
    pub fn ssl(&self) -> bool {
        self.ssl.unwrap_or(true)
    }

    pub fn starttls(&self) -> bool {
        self.starttls.unwrap_or_default()
    }

    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
    }
}

impl Transport for ImapTransport {
    type Session = ImapSession;

    fn login(&self, credential: &AccountCredential, debug: bool) -> Result<ImapSession> {
        let connector = TlsConnector::builder()
            .danger_accept_invalid_certs(self.insecure())
            .danger_accept_invalid_hostnames(self.insecure())
            .build()
            .map_err(|err| Error::ConnectError(Box::new(err), credential.server.clone()))?;

        let timeout = self.timeout();
        let mut client_builder = imap::ClientBuilder::new(credential.host(), credential.port());
        if self.starttls() {
            client_builder.starttls();
        }

        let client = if self.ssl() {
            client_builder.connect(|domain, tcp| {
                tcp.set_read_timeout(Some(timeout))?;
                tcp.set_write_timeout(Some(timeout))?;
                let tls = TlsConnector::connect(&connector, domain, tcp)?;
                Ok(ImapSessionStream::Tls(tls))
            })
        } else {
            client_builder.connect(|_, tcp| {
                tcp.set_read_timeout(Some(timeout))?;
                tcp.set_write_timeout(Some(timeout))?;
                Ok(ImapSessionStream::Tcp(tcp))
            })
        }
        .map_err(|err| Error::ConnectError(Box::new(err), credential.server.clone()))?;

        let mut session = client.login(&credential.email, &credential.password).map_err(|res| {
            Error::LoginError(
                Box::new(res.0),
                credential.server.clone(),
                credential.email.clone(),
            )
        })?;
        session.debug = debug || log_enabled!(Level::Trace);

        Ok(ImapSession { session })
    }
}

pub struct ImapSession {
    session: imap::Session<ImapSessionStream>,
}

impl Session for ImapSession {
    fn list_mailboxes(&mut self) -> Result<Mailboxes> {
        let names = self
            .session
            .list(Some(""), Some("*"))
            .map_err(|err| Error::ListMailboxesError(Box::new(err)))?;

        // \Noselect names are hierarchy placeholders: nothing can be
        // selected or appended there
        let mailboxes = Mailboxes::from_iter(
            names
                .iter()
                .filter(|name| !name.attributes().contains(&NameAttribute::NoSelect))
                .map(|name| Mailbox {
                    delim: name.delimiter().unwrap_or_default().into(),
                    name: decode_utf7(name.name().into()),
                }),
        );

        trace!("imap mailboxes: {:?}", mailboxes);
        Ok(mailboxes)
    }

    fn examine_mailbox(&mut self, mailbox: &str) -> Result<u32> {
        let state = self
            .session
            .examine(encode_utf7(mailbox.to_owned()))
            .map_err(|err| classify_select_error(err, mailbox))?;

        Ok(state.exists)
    }

    fn select_mailbox(&mut self, mailbox: &str) -> Result<u32> {
        let state = self
            .session
            .select(encode_utf7(mailbox.to_owned()))
            .map_err(|err| classify_select_error(err, mailbox))?;

        Ok(state.exists)
    }

    fn create_mailbox(&mut self, mailbox: &str) -> Result<()> {
        self.session
            .create(encode_utf7(mailbox.to_owned()))
            .map_err(|err| Error::CreateMailboxError(Box::new(err), mailbox.to_owned()))?;

        Ok(())
    }

    fn subscribe_mailbox(&mut self, mailbox: &str) -> Result<()> {
        self.session
            .subscribe(encode_utf7(mailbox.to_owned()))
            .map_err(|err| Error::SubscribeMailboxError(Box::new(err), mailbox.to_owned()))?;

        Ok(())
    }

    fn list_messages(&mut self) -> Result<Vec<u32>> {
        let mut seqs: Vec<u32> = self
            .session
            .search("ALL")
            .map_err(|err| Error::ListMessagesError(Box::new(err)))?
            .into_iter()
            .collect();

        // the imap crate hands the result back as a set
        seqs.sort_unstable();
        Ok(seqs)
    }

    fn fetch_message(&mut self, seq: u32) -> Result<MessageRecord> {
        let fetches = self
            .session
            .fetch(seq.to_string(), FETCH_QUERY)
            .map_err(|err| Error::FetchMessageError(Box::new(err), seq))?;
        let fetch = fetches
            .get(0)
            .ok_or_else(|| Error::FetchMessageError(BoxError::from("no fetch result"), seq))?;
        let raw = fetch
            .body()
            .ok_or_else(|| Error::FetchMessageError(BoxError::from("missing body"), seq))?
            .to_vec();

        Ok(MessageRecord {
            raw,
            flags: Flags::from(fetch.flags()),
            internal_date: fetch.internal_date(),
        })
    }

    fn append_message(&mut self, mailbox: &str, message: &MessageRecord) -> Result<()> {
        let name = encode_utf7(mailbox.to_owned());

        // \Recent is server-managed and cannot be appended
        let flags: Vec<RawFlag<'static>> = Flags::from_iter(
            message
                .flags
                .iter()
                .filter(|flag| **flag != Flag::Recent)
                .cloned(),
        )
        .into();

        match message.internal_date {
            Some(date) => self
                .session
                .append(&name, &message.raw)
                .flags(flags)
                .internal_date(date)
                .finish(),
            None => self.session.append(&name, &message.raw).flags(flags).finish(),
        }
        .map_err(|err| Error::AppendMessageError(Box::new(err), mailbox.to_owned()))?;

        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.session
            .logout()
            .map_err(|err| Error::LogoutError(Box::new(err)))?;

        Ok(())
    }
}

/// Servers answer NO to a SELECT or EXAMINE of a mailbox they do not
/// know; everything else stays a plain selection failure.
fn classify_select_error(err: imap::Error, mailbox: &str) -> Error {
    if matches!(err, imap::Error::No(_)) {
        Error::MailboxNotFoundError(mailbox.to_owned())
    } else {
        Error::SelectMailboxError(Box::new(err), mailbox.to_owned())
    }
}
