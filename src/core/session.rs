//! Scoped unit of work for store mutations.
//!
//! Every mutation batch runs against a staged copy of the store. The copy is
//! swapped in when the batch finishes, so no transaction state outlives the
//! call and the caller's store is never left half-written unless the commit
//! policy asks for it.

use crate::core::store::EntityStore;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Staged work is kept only when the whole batch succeeds.
    #[default]
    OnSuccess,
    /// Staged work is kept even when the batch fails part-way.
    Always,
}

impl FromStr for CommitPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "on_success" | "on-success" => Ok(CommitPolicy::OnSuccess),
            "always" => Ok(CommitPolicy::Always),
            other => Err(format!(
                "unknown commit policy '{}', expected on_success or always",
                other
            )),
        }
    }
}

/// Outcome of a transaction, returned alongside the closure's own result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    Committed,
    RolledBack,
    PartiallyCommitted,
}

/// Run `work` against a staged copy of `store` and apply it per `policy`.
///
/// The second element is the closure's result unchanged. Under
/// [`CommitPolicy::Always`] a failed batch is still committed and reported as
/// [`TransactionOutcome::PartiallyCommitted`].
pub fn transaction<T, F>(
    store: &mut EntityStore,
    policy: CommitPolicy,
    work: F,
) -> (TransactionOutcome, Result<T>)
where
    F: FnOnce(&mut EntityStore) -> Result<T>,
{
    let mut staged = store.clone();
    match work(&mut staged) {
        Ok(value) => {
            *store = staged;
            tracing::debug!("transaction committed");
            (TransactionOutcome::Committed, Ok(value))
        }
        Err(e) if policy == CommitPolicy::Always => {
            *store = staged;
            tracing::warn!(error = %e, "transaction failed, partial work committed");
            (TransactionOutcome::PartiallyCommitted, Err(e))
        }
        Err(e) => {
            tracing::warn!(error = %e, "transaction failed, rolled back");
            (TransactionOutcome::RolledBack, Err(e))
        }
    }
}
