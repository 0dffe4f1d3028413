pub mod account;
pub use account::{AccountCredential, AccountPair};

pub mod migration;
pub use migration::{Error, MigrationConfig, Result};
