pub mod flag;
pub use flag::{Flag, Flags};

pub mod mailbox;
pub use mailbox::{Mailbox, Mailboxes};

pub mod message;
pub use message::MessageRecord;
