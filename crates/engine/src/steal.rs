//! The steal protocol: one contested transfer of crops between two farms,
//! executed as an atomic, fair, rate-limited unit.
//!
//! The attempt mutates the actor's inventory/cooldown and the target's
//! protection flag, so the whole sequence runs under one ordered two-key
//! lock; otherwise a second concurrent attempt could observe stale
//! target state or corrupt the anti-abuse counters.

use std::sync::Arc;

use chrono::{Duration, Utc};
use grange_core::config::GameConfig;
use grange_core::economy;
use grange_core::farm::QualityTier;
use grange_core::steal_math;

use grange_db::repositories::{CooldownRepo, FarmRepo};

use crate::anti_abuse::{AntiAbuseTracker, QuotaDecision, QuotaDenial};
use crate::cooldown::CooldownTracker;
use crate::dice::Dice;
use crate::error::EngineError;
use crate::inventory::Inventory;
use crate::store::EntityStore;

/// Cooldown action key for steal attempts.
const STEAL_ACTION: &str = "steal";

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Why an attempt was refused before being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// Actor targeted itself. Checked before any lock or state access.
    SelfTarget,
    /// The actor's steal cooldown is still running.
    CooldownActive,
    /// The target holds post-victimization farm protection.
    FarmProtected,
    /// The target has an active item defense.
    ItemDefenseActive,
    /// The target has no stealable plots.
    NothingToSteal,
    /// Inter-target cooldown against this victim is still running.
    TargetCooldownActive,
    /// The daily attempt quota against this victim is exhausted.
    QuotaExhausted,
}

/// A structured precondition denial. Not an error: the caller can always
/// present it, converting `remaining_ms` to minutes itself. This core
/// never formats presentation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub reason: DenialReason,
    pub remaining_ms: Option<i64>,
}

/// Terminal result of a *resolved* attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StealResult {
    /// At least one unit of loot was actually deposited.
    Success,
    /// The probability draw failed.
    Failed,
    /// The draw succeeded but zero net loot was delivered (capacity
    /// limits). Reported distinctly so statistics are not corrupted.
    Empty,
}

/// One crop/quantity pair deposited into the actor's inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootEntry {
    pub crop: String,
    pub quantity: i64,
}

/// Full report of a resolved attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct StealReport {
    pub result: StealResult,
    pub success_rate_percent: f64,
    pub rewards: Vec<LootEntry>,
    pub total_stolen: i64,
}

impl StealReport {
    pub fn success(&self) -> bool {
        self.result == StealResult::Success
    }
}

/// What `execute_steal` hands back to the command layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StealOutcome {
    Denied(Denial),
    Resolved(StealReport),
}

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Orchestrates lock, store, economy, cooldown, and quota components into
/// the contested-transfer operation.
///
/// All collaborators are supplied at construction; the dependency graph is
/// built once at startup in topological order, with the external seams
/// ([`Inventory`], [`Dice`]) as narrow trait objects.
pub struct StealProtocol {
    store: EntityStore,
    cooldowns: CooldownTracker,
    quota: AntiAbuseTracker,
    inventory: Arc<dyn Inventory>,
    dice: Arc<dyn Dice>,
    config: Arc<GameConfig>,
}

impl StealProtocol {
    pub fn new(
        store: EntityStore,
        cooldowns: CooldownTracker,
        quota: AntiAbuseTracker,
        inventory: Arc<dyn Inventory>,
        dice: Arc<dyn Dice>,
        config: Arc<GameConfig>,
    ) -> Self {
        Self { store, cooldowns, quota, inventory, dice, config }
    }

    /// Execute one "actor attempts to take resources from target"
    /// interaction.
    ///
    /// Precondition denials (steps before the probability draw) return as
    /// `StealOutcome::Denied` without arming the actor's cooldown or
    /// consuming quota; only a *resolved* attempt (success, failure, or
    /// empty) does both.
    pub async fn execute_steal(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<StealOutcome, EngineError> {
        if actor_id == target_id {
            // Before touching any lock or state.
            return Ok(StealOutcome::Denied(Denial {
                reason: DenialReason::SelfTarget,
                remaining_ms: None,
            }));
        }

        self.store
            .with_multi_lock(&[actor_id, target_id], || {
                self.steal_locked(actor_id, target_id)
            })
            .await
    }

    /// The protocol body. Runs with both entity locks held.
    async fn steal_locked(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<StealOutcome, EngineError> {
        let cfg = &self.config.steal;
        let now = Utc::now();

        // Actor's steal cooldown.
        let gate = self.cooldowns.is_ready(actor_id, STEAL_ACTION).await?;
        if !gate.ready {
            return Ok(denied(DenialReason::CooldownActive, Some(gate.remaining_ms)));
        }

        // Target protection. Farm protection is checked first so the
        // denial is deterministic when both are active.
        let mut target = self.store.get_or_create(target_id).await?;
        if let Some(ms) = target.farm_protection_remaining_ms(now) {
            return Ok(denied(DenialReason::FarmProtected, Some(ms)));
        }
        if let Some(ms) = target.item_defense_remaining_ms(now) {
            return Ok(denied(DenialReason::ItemDefenseActive, Some(ms)));
        }

        // Stealable plots, from computed growth, never the cached flag.
        let stealable: Vec<(String, QualityTier, f64)> = target
            .plots
            .iter()
            .filter(|plot| steal_math::is_stealable(plot, now))
            .filter_map(|plot| {
                let crop = plot.crop.clone()?;
                let growth = steal_math::growth_fraction(plot, now)?;
                Some((crop, plot.quality, growth))
            })
            .collect();
        if stealable.is_empty() {
            return Ok(denied(DenialReason::NothingToSteal, None));
        }

        // Quota gate, evaluated last so unrelated denials never consume
        // it. A denial here is a precondition failure: the cooldown stays
        // unarmed and the actor may immediately try a different target.
        let decision = self
            .quota
            .check_and_record(
                actor_id,
                target_id,
                cfg.max_attempts_per_target_per_day,
                cfg.inter_target_cooldown_ms,
            )
            .await?;
        if let QuotaDecision::Denied { reason, remaining_ms } = decision {
            let reason = match reason {
                QuotaDenial::TargetCooldownActive => DenialReason::TargetCooldownActive,
                QuotaDenial::QuotaExhausted => DenialReason::QuotaExhausted,
            };
            return Ok(StealOutcome::Denied(Denial { reason, remaining_ms }));
        }

        // Resolution draw.
        let mut actor = self.store.get_or_create(actor_id).await?;
        let rate = steal_math::success_rate(actor.level, target.level, cfg);
        let roll = self.dice.success_roll();
        let succeeded = roll < rate;

        actor.stats.steals_attempted += 1;

        let report = if !succeeded {
            StealReport {
                result: StealResult::Failed,
                success_rate_percent: rate,
                rewards: Vec::new(),
                total_stolen: 0,
            }
        } else {
            // Capacity-bounded loot, tallied per plot.
            let mut rewards: Vec<LootEntry> = Vec::new();
            let mut total = 0;
            let (lo, hi) = cfg.random_factor_band;
            for (crop, quality, growth) in &stealable {
                let qty = steal_math::loot_quantity(
                    self.config.base_yield(crop),
                    self.config.quality_multiplier(*quality),
                    *growth,
                    self.dice.yield_factor(lo, hi),
                    cfg,
                );
                let deposit = self.inventory.add_item(&mut actor, crop, qty);
                if deposit.added > 0 {
                    rewards.push(LootEntry { crop: crop.clone(), quantity: deposit.added });
                    total += deposit.added;
                }
            }

            if total == 0 {
                StealReport {
                    result: StealResult::Empty,
                    success_rate_percent: rate,
                    rewards: Vec::new(),
                    total_stolen: 0,
                }
            } else {
                actor.stats.steals_succeeded += 1;
                actor.stats.items_stolen += total;
                economy::apply_experience_delta(
                    &mut actor,
                    cfg.steal_success_xp,
                    &self.config.levels,
                );

                // Post-victimization grace period; granted only when loot
                // actually left the farm.
                target.farm_protection_until =
                    Some(now + Duration::milliseconds(cfg.protection_duration_ms));
                target.stats.times_stolen_from += 1;
                target.stats.items_lost += total;

                StealReport {
                    result: StealResult::Success,
                    success_rate_percent: rate,
                    rewards,
                    total_stolen: total,
                }
            }
        };

        // Every resolved branch persists in one transaction: both farms
        // and the cooldown commit together or not at all, so a storage
        // failure mid-sequence cannot leave the target protected while
        // the actor's loot, stats, and cooldown are lost.
        let mut tx = self.store.begin().await?;
        if report.result == StealResult::Success {
            FarmRepo::save(&mut *tx, &target).await?;
        }
        FarmRepo::save(&mut *tx, &actor).await?;
        CooldownRepo::arm(&mut *tx, actor_id, STEAL_ACTION, cfg.steal_cooldown_ms).await?;
        tx.commit().await?;

        tracing::info!(
            actor = actor_id,
            target = target_id,
            result = ?report.result,
            rate = report.success_rate_percent,
            total_stolen = report.total_stolen,
            "Steal attempt resolved",
        );

        Ok(StealOutcome::Resolved(report))
    }
}

fn denied(reason: DenialReason, remaining_ms: Option<i64>) -> StealOutcome {
    StealOutcome::Denied(Denial { reason, remaining_ms })
}
