pub mod flag;
pub use flag::Flag;

pub mod flags;
pub use flags::Flags;

#[cfg(feature = "imap-transport")]
pub mod imap;
