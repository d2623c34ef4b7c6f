//! Inventory capacity seam.
//!
//! The item model lives in an external service; this core only depends on
//! its add/capacity contract, so that contract is a trait supplied at
//! construction. Deposits happen on the already-locked, already-loaded
//! farm; giving the service its own write path would bypass the entity
//! lock.

use grange_core::farm::Farm;

/// Result of an attempted deposit. `added` may be less than the requested
/// quantity (partial) or zero (full); `success` means the full quantity
/// fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddItemOutcome {
    pub success: bool,
    pub added: i64,
}

/// Add/capacity contract of the inventory service.
pub trait Inventory: Send + Sync {
    /// Deposit up to `qty` units of `item_id` into the farm's inventory.
    fn add_item(&self, farm: &mut Farm, item_id: &str, qty: i64) -> AddItemOutcome;
}

/// Shipped implementation: a single total-unit capacity per farm.
#[derive(Debug, Clone)]
pub struct CapacityInventory {
    capacity: i64,
}

impl CapacityInventory {
    pub fn new(capacity: i64) -> Self {
        Self { capacity }
    }
}

impl Inventory for CapacityInventory {
    fn add_item(&self, farm: &mut Farm, item_id: &str, qty: i64) -> AddItemOutcome {
        let free = (self.capacity - farm.inventory_total()).max(0);
        let added = qty.clamp(0, free);
        if added > 0 {
            *farm.inventory.entry(item_id.to_string()).or_insert(0) += added;
        }
        AddItemOutcome { success: added == qty && qty > 0, added }
    }
}
