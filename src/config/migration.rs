//! Migration config module.
//!
//! This module contains the representation of the migration
//! configuration and its text-format loader. The format is one
//! optional `debug=<true|false>` directive plus one line per account
//! pair:
//!
//! ```text
//! debug=false
//! src.example.com,alice@src.example.com,secret;dst.example.com,alice@dst.example.com,secret
//! ```

use log::debug;
use std::{fs, io, path::PathBuf, result};
use thiserror::Error;

use crate::config::{AccountCredential, AccountPair};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read config file at {1}")]
    ReadConfigFileError(#[source] io::Error, PathBuf),
    #[error("missing account pair separator at line {0}")]
    ParsePairSeparatorError(usize),
    #[error("expected 3 account fields at line {0}, found {1}")]
    ParseAccountFieldsError(usize, usize),
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the whole configuration of one migration run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MigrationConfig {
    /// Enables protocol-level debugging on every session opened
    /// during the run.
    pub debug: bool,
    /// Represents the account pairs to migrate, in the order they
    /// should be reported.
    pub pairs: Vec<AccountPair>,
}

impl MigrationConfig {
    /// Reads and parses the configuration from the given file.
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let content =
            fs::read_to_string(&path).map_err(|err| Error::ReadConfigFileError(err, path))?;
        Self::parse(&content)
    }

    /// Parses the configuration from its text format.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for (num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(value) = line.strip_prefix("debug=") {
                // any value other than "true" disables debugging
                config.debug = value.trim().eq_ignore_ascii_case("true");
                continue;
            }

            config.pairs.push(parse_pair(num + 1, line)?);
        }

        debug!("parsed {} account pair(s)", config.pairs.len());
        Ok(config)
    }
}

fn parse_pair(num: usize, line: &str) -> Result<AccountPair> {
    let (source, destination) = line
        .split_once(';')
        .filter(|(_, destination)| !destination.contains(';'))
        .ok_or(Error::ParsePairSeparatorError(num))?;

    Ok(AccountPair {
        source: parse_credential(num, source)?,
        destination: parse_credential(num, destination)?,
    })
}

fn parse_credential(num: usize, raw: &str) -> Result<AccountCredential> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    match fields[..] {
        [server, email, password] => Ok(AccountCredential::new(server, email, password)),
        _ => Err(Error::ParseAccountFieldsError(num, fields.len())),
    }
}
