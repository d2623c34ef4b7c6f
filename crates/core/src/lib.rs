//! Pure domain layer for the farm coordination core.
//!
//! This crate has zero internal dependencies and performs no I/O. It holds
//! the shared domain types ([`farm`]), the validated game configuration
//! ([`config`]), the atomic economic primitives ([`economy`]), and the pure
//! steal arithmetic ([`steal_math`]) so that both the engine and any future
//! tooling can use them without pulling in the database stack.

pub mod config;
pub mod economy;
pub mod error;
pub mod farm;
pub mod steal_math;
pub mod types;
