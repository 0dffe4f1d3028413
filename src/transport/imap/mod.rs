pub mod transport;
pub use transport::{ImapSession, ImapSessionStream, ImapTransport};
