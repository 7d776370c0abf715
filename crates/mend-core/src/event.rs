//! One explosion's worth of healing: captured blocks, ordering, and timing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand_xoshiro::Xoshiro256StarStar;
use rustc_hash::{FxHashMap, FxHashSet};

use mend_config::{CollateralConfig, WorldPolicy};
use mend_world::{BlockPos, BlockRegistry, WorldModel};

use crate::capture::CapturePipeline;
use crate::snapshot::CapturedBlock;
use crate::suffocation::SuffocationGuard;
use crate::timer::{HealMode, HealTimer, TimerState};

/// A recorded destruction event awaiting (or undergoing) restoration.
///
/// Holds the ordered block queue produced by the capture pipeline, the dedup
/// set of visited positions (kept for the event's lifetime -- it only ever
/// grows), and the timer that decides when restoration begins.
pub struct HealEvent {
    origin: BlockPos,
    radius: f64,
    blocks: VecDeque<CapturedBlock>,
    checked: FxHashSet<BlockPos>,
    timer: HealTimer,
}

impl HealEvent {
    /// Records every block destroyed by one event and removes them from the
    /// live world.
    ///
    /// Blocks that must reappear at once land in `immediate` instead of the
    /// event's own queue. The timer is armed here, once, from the world
    /// policy in force at recording time.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record(
        world: &mut dyn WorldModel,
        registry: &BlockRegistry,
        policy: &WorldPolicy,
        collateral: &CollateralConfig,
        immediate: &mut FxHashMap<BlockPos, CapturedBlock>,
        rng: &mut Xoshiro256StarStar,
        destroyed: &[BlockPos],
        origin: BlockPos,
        now: Instant,
    ) -> HealEvent {
        let outcome =
            CapturePipeline::new(world, registry, policy, collateral, immediate, rng)
                .run(destroyed, origin);

        debug_assert!(outcome.radius >= 1.0, "heal event radius below sentinel");

        let mode = if policy.block_per_block {
            HealMode::Incremental
        } else {
            HealMode::Batch
        };
        let wait = Duration::from_secs(u64::from(policy.wait_seconds));

        tracing::debug!(
            "recorded heal event at ({}, {}, {}): {} blocks, radius {:.1}",
            origin.x,
            origin.y,
            origin.z,
            outcome.blocks.len(),
            outcome.radius
        );

        HealEvent {
            origin,
            radius: outcome.radius,
            blocks: VecDeque::from(outcome.blocks),
            checked: outcome.checked,
            timer: HealTimer::new(now, wait, mode),
        }
    }

    /// The location the event originated from.
    pub fn origin(&self) -> BlockPos {
        self.origin
    }

    /// Distance from the origin to the farthest captured block, plus one.
    /// 1.0 for an event that captured nothing.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The instant restoration begins.
    pub fn due_at(&self) -> Instant {
        self.timer.due_at()
    }

    /// Whether every captured block has been restored or given up.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks still awaiting restoration.
    pub fn remaining(&self) -> usize {
        self.blocks.len()
    }

    /// Number of distinct positions the capture pipeline visited.
    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// The per-tick restore check.
    ///
    /// Returns `true` while the event is still pending: not yet due, or due
    /// in incremental mode with blocks left. Returns `false` once the event
    /// is resolved and can be dropped by the scheduler.
    pub fn check_heal(
        &mut self,
        world: &mut dyn WorldModel,
        guard: &mut dyn SuffocationGuard,
        relocate_occupants: bool,
        now: Instant,
    ) -> bool {
        match self.timer.state(now) {
            TimerState::Waiting => true,
            TimerState::Due => match self.timer.mode() {
                HealMode::Batch => {
                    self.restore_all(world, guard, relocate_occupants);
                    false
                }
                HealMode::Incremental => {
                    self.restore_one(world, guard, relocate_occupants);
                    !self.blocks.is_empty()
                }
            },
        }
    }

    /// Restores every remaining block in one operation.
    ///
    /// A block whose position is now occupied is dropped as loot -- nothing
    /// may stay both unrestored and un-dropped -- so the queue always empties
    /// here.
    pub(crate) fn restore_all(
        &mut self,
        world: &mut dyn WorldModel,
        guard: &mut dyn SuffocationGuard,
        relocate_occupants: bool,
    ) {
        while let Some(block) = self.blocks.pop_front() {
            if !block.restore(world) {
                tracing::debug!(
                    "position ({}, {}, {}) occupied, dropping as loot",
                    block.pos().x,
                    block.pos().y,
                    block.pos().z
                );
                block.drop_loot(world);
            }
        }
        if relocate_occupants {
            guard.check_area(world, self.origin, self.radius);
        }
    }

    /// Restores the head of the queue.
    ///
    /// On a conflict, a delayable block gets one trip to the back of the
    /// queue; anything else (or a second failure) is dropped as loot.
    fn restore_one(
        &mut self,
        world: &mut dyn WorldModel,
        guard: &mut dyn SuffocationGuard,
        relocate_occupants: bool,
    ) {
        let Some(mut block) = self.blocks.pop_front() else {
            return;
        };
        let pos = block.pos();
        if !block.restore(world) {
            if block.behavior().delayable && !block.is_deferred() {
                block.defer();
                self.blocks.push_back(block);
            } else {
                block.drop_loot(world);
            }
        }
        if relocate_occupants {
            guard.check_position(world, pos);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
