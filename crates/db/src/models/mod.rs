//! Row models for the four key namespaces.

pub mod cooldown;
pub mod farm;
pub mod lock;
pub mod steal_attempt;

pub use cooldown::CooldownRow;
pub use farm::FarmRow;
pub use lock::LockRow;
pub use steal_attempt::QuotaStatus;
