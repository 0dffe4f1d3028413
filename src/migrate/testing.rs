//! In-memory transport used by the engine tests: a handful of fake
//! mail servers sharing one store, with fault injection knobs for the
//! failure paths.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use crate::{
    transport::{BoxError, Error, Result, Session, Transport},
    AccountCredential, Flags, Mailbox, Mailboxes, MessageRecord,
};

pub(crate) fn credential(email: &str) -> AccountCredential {
    AccountCredential::new("mem.test", email, "secret")
}

#[derive(Clone, Default)]
pub(crate) struct MemoryTransport {
    store: Arc<Mutex<Store>>,
}

#[derive(Default)]
struct Store {
    accounts: Vec<Account>,
    deny_logins: HashSet<String>,
    deny_lists: HashSet<String>,
    deny_creates: HashSet<(String, String)>,
    deny_appends: HashSet<(String, String, u32)>,
    fatal_appends: HashSet<(String, String)>,
    logouts: u32,
}

impl Store {
    fn account_mut(&mut self, email: &str) -> &mut Account {
        if let Some(pos) = self.accounts.iter().position(|a| a.email == email) {
            return &mut self.accounts[pos];
        }
        self.accounts.push(Account {
            email: email.to_owned(),
            mailboxes: Vec::new(),
        });
        self.accounts.last_mut().unwrap()
    }

    fn account(&self, email: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.email == email)
    }
}

struct Account {
    email: String,
    mailboxes: Vec<MailboxState>,
}

impl Account {
    fn mailbox(&self, name: &str) -> Option<&MailboxState> {
        self.mailboxes.iter().find(|m| m.name == name)
    }

    fn mailbox_mut(&mut self, name: &str) -> Option<&mut MailboxState> {
        self.mailboxes.iter_mut().find(|m| m.name == name)
    }
}

#[derive(Default)]
struct MailboxState {
    name: String,
    messages: Vec<MessageRecord>,
    /// Count of append attempts, successful or not.
    appends: u32,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mailbox(&self, email: &str, mailbox: &str) {
        let mut store = self.store.lock().unwrap();
        let account = store.account_mut(email);
        if account.mailbox(mailbox).is_none() {
            account.mailboxes.push(MailboxState {
                name: mailbox.to_owned(),
                ..MailboxState::default()
            });
        }
    }

    pub fn add_message(&self, email: &str, mailbox: &str, raw: &[u8], flags: Flags) {
        self.add_mailbox(email, mailbox);
        let mut store = self.store.lock().unwrap();
        store
            .account_mut(email)
            .mailbox_mut(mailbox)
            .unwrap()
            .messages
            .push(MessageRecord::new(raw, flags));
    }

    pub fn deny_login(&self, email: &str) {
        self.store.lock().unwrap().deny_logins.insert(email.into());
    }

    pub fn deny_list(&self, email: &str) {
        self.store.lock().unwrap().deny_lists.insert(email.into());
    }

    pub fn deny_create(&self, email: &str, mailbox: &str) {
        self.store
            .lock()
            .unwrap()
            .deny_creates
            .insert((email.into(), mailbox.into()));
    }

    /// Makes the nth append attempt (1-based) to the given mailbox
    /// fail.
    pub fn deny_append(&self, email: &str, mailbox: &str, nth: u32) {
        self.store
            .lock()
            .unwrap()
            .deny_appends
            .insert((email.into(), mailbox.into(), nth));
    }

    pub fn fatal_append(&self, email: &str, mailbox: &str) {
        self.store
            .lock()
            .unwrap()
            .fatal_appends
            .insert((email.into(), mailbox.into()));
    }

    pub fn logouts(&self) -> u32 {
        self.store.lock().unwrap().logouts
    }

    pub fn mailbox_names(&self, email: &str) -> Vec<String> {
        let store = self.store.lock().unwrap();
        store
            .account(email)
            .map(|account| account.mailboxes.iter().map(|m| m.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn messages(&self, email: &str, mailbox: &str) -> Vec<MessageRecord> {
        let store = self.store.lock().unwrap();
        store
            .account(email)
            .and_then(|account| account.mailbox(mailbox))
            .map(|mailbox| mailbox.messages.clone())
            .unwrap_or_default()
    }
}

impl Transport for MemoryTransport {
    type Session = MemorySession;

    fn login(&self, credential: &AccountCredential, _debug: bool) -> Result<MemorySession> {
        let mut store = self.store.lock().unwrap();
        if store.deny_logins.contains(&credential.email) {
            return Err(Error::LoginError(
                BoxError::from("login denied"),
                credential.server.clone(),
                credential.email.clone(),
            ));
        }
        store.account_mut(&credential.email);

        Ok(MemorySession {
            email: credential.email.clone(),
            store: self.store.clone(),
            selected: None,
        })
    }
}

pub(crate) struct MemorySession {
    email: String,
    store: Arc<Mutex<Store>>,
    selected: Option<String>,
}

impl MemorySession {
    fn open(&mut self, mailbox: &str) -> Result<u32> {
        let store = self.store.lock().unwrap();
        let count = store
            .account(&self.email)
            .and_then(|account| account.mailbox(mailbox))
            .map(|mailbox| mailbox.messages.len() as u32)
            .ok_or_else(|| Error::MailboxNotFoundError(mailbox.to_owned()))?;
        drop(store);

        self.selected = Some(mailbox.to_owned());
        Ok(count)
    }
}

impl Session for MemorySession {
    fn list_mailboxes(&mut self) -> Result<Mailboxes> {
        let store = self.store.lock().unwrap();
        if store.deny_lists.contains(&self.email) {
            return Err(Error::ListMailboxesError(BoxError::from("listing denied")));
        }

        Ok(Mailboxes::from_iter(
            store
                .account(&self.email)
                .map(|account| {
                    account
                        .mailboxes
                        .iter()
                        .map(|m| Mailbox::new(&m.name))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
        ))
    }

    fn examine_mailbox(&mut self, mailbox: &str) -> Result<u32> {
        self.open(mailbox)
    }

    fn select_mailbox(&mut self, mailbox: &str) -> Result<u32> {
        self.open(mailbox)
    }

    fn create_mailbox(&mut self, mailbox: &str) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        if store
            .deny_creates
            .contains(&(self.email.clone(), mailbox.to_owned()))
        {
            return Err(Error::CreateMailboxError(
                BoxError::from("create denied"),
                mailbox.to_owned(),
            ));
        }

        let account = store.account_mut(&self.email);
        if account.mailbox(mailbox).is_none() {
            account.mailboxes.push(MailboxState {
                name: mailbox.to_owned(),
                ..MailboxState::default()
            });
        }

        Ok(())
    }

    fn subscribe_mailbox(&mut self, _mailbox: &str) -> Result<()> {
        Ok(())
    }

    fn list_messages(&mut self) -> Result<Vec<u32>> {
        let mailbox = self
            .selected
            .clone()
            .ok_or_else(|| Error::ListMessagesError(BoxError::from("no mailbox selected")))?;
        let count = self.open(&mailbox)?;

        Ok((1..=count).collect())
    }

    fn fetch_message(&mut self, seq: u32) -> Result<MessageRecord> {
        let store = self.store.lock().unwrap();
        self.selected
            .as_ref()
            .and_then(|mailbox| store.account(&self.email)?.mailbox(mailbox))
            .and_then(|mailbox| mailbox.messages.get(seq as usize - 1))
            .cloned()
            .ok_or_else(|| Error::FetchMessageError(BoxError::from("no such message"), seq))
    }

    fn append_message(&mut self, mailbox: &str, message: &MessageRecord) -> Result<()> {
        let mut store = self.store.lock().unwrap();

        if store
            .fatal_appends
            .contains(&(self.email.clone(), mailbox.to_owned()))
        {
            return Err(Error::FatalError("mail store exhausted".into()));
        }

        let email = self.email.clone();
        let state = store
            .account_mut(&email)
            .mailbox_mut(mailbox)
            .ok_or_else(|| {
                Error::AppendMessageError(BoxError::from("no such mailbox"), mailbox.to_owned())
            })?;
        state.appends += 1;
        let nth = state.appends;

        if store
            .deny_appends
            .contains(&(self.email.clone(), mailbox.to_owned(), nth))
        {
            return Err(Error::AppendMessageError(
                BoxError::from("append denied"),
                mailbox.to_owned(),
            ));
        }

        store
            .account_mut(&email)
            .mailbox_mut(mailbox)
            .unwrap()
            .messages
            .push(message.clone());

        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.store.lock().unwrap().logouts += 1;
        Ok(())
    }
}
