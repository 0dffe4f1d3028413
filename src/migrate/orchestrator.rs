//! Migration orchestrator module.
//!
//! This module contains the run-level pass: every configured account
//! pair gets its own pair of sessions and its own task, failures stay
//! confined to their pair, and the summary keeps the configured
//! order whatever the completion order.

use log::{debug, warn};
use rayon::prelude::*;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    config::{AccountPair, MigrationConfig},
    transport::{Session, Transport},
    MigrationResult, RunSummary,
};

use super::{report::describe, sync};

/// Clone-able cancellation handle shared between the caller and the
/// per-pair migration tasks. Raising it stops new pairs from being
/// attempted; pairs already in flight finish on their own.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Migrates every configured account pair and returns one result per
/// pair, in configured order.
pub fn run_migration<T: Transport>(transport: &T, config: &MigrationConfig) -> RunSummary {
    run_migration_with_token(transport, config, &CancelToken::new())
}

/// Same as [`run_migration`], with an externally owned cancellation
/// token. The token is also raised internally when the transport
/// signals a fatal failure, so the rest of the run is skipped.
pub fn run_migration_with_token<T: Transport>(
    transport: &T,
    config: &MigrationConfig,
    token: &CancelToken,
) -> RunSummary {
    debug!("starting migration of {} account pair(s)", config.pairs.len());

    // an indexed parallel iterator collects in input order, whatever
    // order the pairs complete in
    let results: Vec<MigrationResult> = config
        .pairs
        .par_iter()
        .map(|pair| {
            if token.is_cancelled() {
                debug!("run cancelled, skipping pair {}", pair);
                return MigrationResult::aborted(pair);
            }
            migrate_pair(transport, pair, config.debug, token)
        })
        .collect();

    RunSummary(results)
}

fn migrate_pair<T: Transport>(
    transport: &T,
    pair: &AccountPair,
    debug: bool,
    token: &CancelToken,
) -> MigrationResult {
    debug!("migrating pair {}", pair);

    let mut source = match transport.login(&pair.source, debug) {
        Ok(session) => session,
        Err(err) => {
            warn!("cannot login to source account {}", pair.source.email);
            if err.is_fatal() {
                token.cancel();
            }
            return MigrationResult::failed(pair, describe(&err));
        }
    };

    let mut destination = match transport.login(&pair.destination, debug) {
        Ok(session) => session,
        Err(err) => {
            warn!(
                "cannot login to destination account {}",
                pair.destination.email
            );
            if err.is_fatal() {
                token.cancel();
            }
            close(&mut source);
            return MigrationResult::failed(pair, describe(&err));
        }
    };

    let result = match sync::synchronize_account(&mut source, &mut destination) {
        Ok(outcome) => MigrationResult::from_outcome(pair, outcome),
        Err(err) => {
            if err.is_fatal() {
                token.cancel();
            }
            MigrationResult::failed(pair, describe(&err))
        }
    };

    // sessions are released on every path, errors included
    close(&mut source);
    close(&mut destination);

    result
}

fn close(session: &mut impl Session) {
    if let Err(err) = session.logout() {
        warn!("cannot logout session: {}", err);
    }
}
