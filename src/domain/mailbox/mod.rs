pub mod mailbox;
pub use mailbox::Mailbox;

pub mod mailboxes;
pub use mailboxes::Mailboxes;
