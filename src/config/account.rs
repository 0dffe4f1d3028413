//! Account module.
//!
//! This module contains the representation of the mail accounts
//! involved in a migration.

use std::fmt;

/// Default IMAP over TLS port.
const DEFAULT_PORT: u16 = 993;

/// Represents the credentials of one mail account.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct AccountCredential {
    /// Represents the server address, either `host` or `host:port`.
    pub server: String,
    /// Represents the account email address, used as login.
    pub email: String,
    /// Represents the account password.
    pub password: String,
}

impl AccountCredential {
    pub fn new<S: ToString>(server: S, email: S, password: S) -> Self {
        Self {
            server: server.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// Gets the host part of the server address.
    pub fn host(&self) -> &str {
        match self.server.split_once(':') {
            Some((host, _)) => host,
            None => &self.server,
        }
    }

    /// Gets the port part of the server address, falling back on the
    /// IMAPS default.
    pub fn port(&self) -> u16 {
        self.server
            .split_once(':')
            .and_then(|(_, port)| port.parse().ok())
            .unwrap_or(DEFAULT_PORT)
    }
}

// The password must never leak through debug logging.
impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AccountCredential")
            .field("server", &self.server)
            .field("email", &self.email)
            .field("password", &"<hidden>")
            .finish()
    }
}

/// Represents one migration job: a source account and the destination
/// account its messages are copied to.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountPair {
    pub source: AccountCredential,
    pub destination: AccountCredential,
}

impl fmt::Display for AccountPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.source.email, self.destination.email)
    }
}

#[cfg(test)]
mod tests {
    use super::AccountCredential;

    #[test]
    fn server_address() {
        let credential = AccountCredential::new("imap.test", "user@test", "secret");
        assert_eq!("imap.test", credential.host());
        assert_eq!(993, credential.port());

        let credential = AccountCredential::new("imap.test:143", "user@test", "secret");
        assert_eq!("imap.test", credential.host());
        assert_eq!(143, credential.port());
    }

    #[test]
    fn debug_hides_password() {
        let credential = AccountCredential::new("imap.test", "user@test", "secret");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("user@test"));
    }
}
