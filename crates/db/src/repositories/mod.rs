//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod cooldown_repo;
pub mod farm_repo;
pub mod lock_repo;
pub mod steal_quota_repo;

pub use cooldown_repo::CooldownRepo;
pub use farm_repo::FarmRepo;
pub use lock_repo::LockRepo;
pub use steal_quota_repo::StealQuotaRepo;
