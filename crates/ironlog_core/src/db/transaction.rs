//! Transaction scopes shared by all repositories.
//!
//! # Responsibility
//! - Group multi-row writes so they commit or roll back as one unit.
//! - Give multi-query reads (hydration) a single consistent snapshot.
//!
//! # Invariants
//! - Write scopes take the write lock up front (`BEGIN IMMEDIATE`).
//! - A body returning `Err` rolls the transaction back when it is dropped.
//! - Scopes must not be nested: repository helpers running inside a scope
//!   take the `Transaction` (deref to `Connection`) instead of opening a new one.

use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `body` inside an immediate write transaction.
///
/// All writes performed by `body` become visible to other connections
/// atomically when it returns `Ok`. On `Err` nothing is persisted.
pub fn with_write_transaction<T, E, F>(conn: &Connection, body: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = body(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Runs `body` inside a deferred read transaction.
///
/// Every query issued by `body` observes the same committed state, so a
/// parent row and its children are never read across a concurrent commit.
pub fn with_read_snapshot<T, E, F>(conn: &Connection, body: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Deferred)?;
    let value = body(&tx)?;
    tx.commit()?;
    Ok(value)
}
