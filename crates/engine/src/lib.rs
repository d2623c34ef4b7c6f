//! Coordination layer for shared mutable farm entities.
//!
//! Many concurrent command workers may target the same entity, or a pair
//! of entities at once (attacker and victim in a steal). This crate
//! guarantees that all economic reads/writes are serialized per entity,
//! that two-entity operations never deadlock, and that contested
//! transfers are fair and rate-limited. The database is the sole
//! serialization mechanism, so correctness holds under true multi-process
//! parallelism, not just within one runtime.
//!
//! # Assembly
//!
//! The dependency graph is built once at startup, leaf to root:
//!
//! ```no_run
//! use std::sync::Arc;
//! use grange_core::config::GameConfig;
//! use grange_engine::anti_abuse::AntiAbuseTracker;
//! use grange_engine::cooldown::CooldownTracker;
//! use grange_engine::dice::ThreadDice;
//! use grange_engine::inventory::CapacityInventory;
//! use grange_engine::steal::StealProtocol;
//! use grange_engine::store::EntityStore;
//!
//! # async fn assemble(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(GameConfig::default());
//! config.validate()?;
//!
//! let store = EntityStore::new(pool.clone(), config.clone());
//! let cooldowns = CooldownTracker::new(pool.clone());
//! let quota = AntiAbuseTracker::new(pool.clone());
//! let inventory = Arc::new(CapacityInventory::new(config.inventory_capacity));
//! let dice = Arc::new(ThreadDice);
//!
//! let protocol = StealProtocol::new(store, cooldowns, quota, inventory, dice, config);
//! let _outcome = protocol.execute_steal("attacker", "victim").await?;
//! # Ok(())
//! # }
//! ```

pub mod anti_abuse;
pub mod cooldown;
pub mod dice;
pub mod error;
pub mod inventory;
pub mod lock;
pub mod steal;
pub mod store;

pub use error::EngineError;
