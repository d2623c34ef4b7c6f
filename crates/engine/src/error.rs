//! Engine error taxonomy.
//!
//! Only infrastructure failures are errors here. Business denials (self
//! target, cooldown, protection, empty farm, quota) are *values* returned
//! through [`crate::steal::StealOutcome`], because the caller can always
//! present those to the player; an error means the operation's effect is
//! unknown and must not be narrated as "just try again".

/// Infrastructure failures surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Another worker holds the lock. Transient; retry after backoff.
    #[error("Lock busy: {name}")]
    LockBusy { name: String },

    /// The lock's TTL elapsed before the transaction finished. The work
    /// may or may not have been observed by a competing worker; never
    /// treated as success.
    #[error("Lock expired mid-transaction: {name}")]
    LockTimeout { name: String },

    /// Database failure. Fatal for the request; no silent retry that
    /// could double-apply a mutation.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
