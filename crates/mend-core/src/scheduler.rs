//! The global heal scheduler: owns in-flight events and the immediate queue.

use std::time::Instant;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use rustc_hash::FxHashMap;

use mend_config::Config;
use mend_world::{BlockPos, BlockRegistry, WorldModel};

use crate::error::HealError;
use crate::event::HealEvent;
use crate::snapshot::CapturedBlock;
use crate::suffocation::SuffocationGuard;

/// Owns every in-flight [`HealEvent`] plus the immediate-restore queue, and
/// is polled periodically by the host.
///
/// There is no ambient global: the host constructs one scheduler at startup,
/// passes it (with the world, guard, and config) into each poll, and tears it
/// down at shutdown. Polls are driven serially from a single logical thread;
/// nothing here locks or blocks.
pub struct HealScheduler {
    events: Vec<HealEvent>,
    /// Blocks that bypass every timer, keyed by position. Drained
    /// unconditionally on each poll.
    immediate: FxHashMap<BlockPos, CapturedBlock>,
    /// Single long-lived generator for the collateral draw.
    rng: Xoshiro256StarStar,
}

impl HealScheduler {
    /// Creates a scheduler.
    ///
    /// `seed` fixes the collateral draw for reproducible runs; `None` seeds
    /// from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Xoshiro256StarStar::seed_from_u64(seed),
            None => Xoshiro256StarStar::from_entropy(),
        };
        Self {
            events: Vec::new(),
            immediate: FxHashMap::default(),
            rng,
        }
    }

    /// Creates a scheduler seeded per the config's collateral policy.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.collateral.seed)
    }

    /// Records a destruction event: captures (and removes) every affected
    /// block and schedules its restoration.
    ///
    /// Fails fast on an invalid configuration -- a bad wait time or scan
    /// radius would corrupt every computation downstream.
    pub fn record_event(
        &mut self,
        world: &mut dyn WorldModel,
        registry: &BlockRegistry,
        config: &Config,
        destroyed: &[BlockPos],
        origin: BlockPos,
        now: Instant,
    ) -> Result<(), HealError> {
        config.validate()?;
        let policy = config.world_policy(world.world_name(origin.world));

        let event = HealEvent::record(
            world,
            registry,
            &policy,
            &config.collateral,
            &mut self.immediate,
            &mut self.rng,
            destroyed,
            origin,
            now,
        );
        self.events.push(event);
        Ok(())
    }

    /// One scheduler tick.
    ///
    /// Drains the immediate-restore queue unconditionally, then runs every
    /// live event's restore check, dropping events that report themselves
    /// resolved. Ordering between distinct events is unspecified; only the
    /// ordering inside each event is contractual.
    pub fn poll(
        &mut self,
        world: &mut dyn WorldModel,
        guard: &mut dyn SuffocationGuard,
        config: &Config,
        now: Instant,
    ) {
        for (_pos, block) in self.immediate.drain() {
            block.force_restore(world);
        }

        let relocate = config.safety.teleport_on_suffocate;
        self.events
            .retain_mut(|event| event.check_heal(world, guard, relocate, now));
    }

    /// Restores everything at once, ignoring due times.
    ///
    /// The hook behind forced repairs (admin commands, timed repair windows);
    /// the surface that triggers it lives outside this crate.
    pub fn force_heal(
        &mut self,
        world: &mut dyn WorldModel,
        guard: &mut dyn SuffocationGuard,
        config: &Config,
    ) {
        for (_pos, block) in self.immediate.drain() {
            block.force_restore(world);
        }

        let relocate = config.safety.teleport_on_suffocate;
        for mut event in std::mem::take(&mut self.events) {
            event.restore_all(world, guard, relocate);
        }
    }

    /// The events still in flight.
    pub fn events(&self) -> &[HealEvent] {
        &self.events
    }

    /// Number of blocks waiting in the immediate-restore queue.
    pub fn immediate_pending(&self) -> usize {
        self.immediate.len()
    }

    /// Returns `true` when nothing is pending at all.
    pub fn is_idle(&self) -> bool {
        self.events.is_empty() && self.immediate.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
