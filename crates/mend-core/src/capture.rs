//! The event capture pipeline: records everything one explosion destroyed.
//!
//! Capture walks the destroyed set dependency-first so that supports always
//! precede their dependents in the final order, applies per-block policy
//! (immediate restore, blacklist, collateral inclusion), and removes every
//! captured block from the live world as it goes.

use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;
use rustc_hash::{FxHashMap, FxHashSet};

use mend_config::{CollateralConfig, WorldPolicy};
use mend_world::{BlockPos, BlockRegistry, WorldModel};

use crate::deps::dependent_neighbors;
use crate::order::sort_nearest_first;
use crate::snapshot::CapturedBlock;

/// What one capture run produced.
pub(crate) struct CaptureOutcome {
    /// Captured blocks, sorted nearest-to-origin first.
    pub blocks: Vec<CapturedBlock>,
    /// Every position visited with an occupant; grows monotonically and is
    /// kept by the event for its lifetime.
    pub checked: FxHashSet<BlockPos>,
    /// Max distance from the origin to any captured block, plus one.
    /// 1.0 when nothing was captured.
    pub radius: f64,
}

/// One run of the capture pipeline over a single destruction event.
pub(crate) struct CapturePipeline<'a> {
    world: &'a mut dyn WorldModel,
    registry: &'a BlockRegistry,
    policy: &'a WorldPolicy,
    collateral: &'a CollateralConfig,
    immediate: &'a mut FxHashMap<BlockPos, CapturedBlock>,
    rng: &'a mut Xoshiro256StarStar,
    checked: FxHashSet<BlockPos>,
    blocks: Vec<CapturedBlock>,
}

/// Work-stack frame: a position is visited (policy + dependency expansion)
/// before it is captured, and its dependencies are captured in between.
enum Frame {
    Visit(BlockPos),
    Capture(BlockPos),
}

impl<'a> CapturePipeline<'a> {
    pub(crate) fn new(
        world: &'a mut dyn WorldModel,
        registry: &'a BlockRegistry,
        policy: &'a WorldPolicy,
        collateral: &'a CollateralConfig,
        immediate: &'a mut FxHashMap<BlockPos, CapturedBlock>,
        rng: &'a mut Xoshiro256StarStar,
    ) -> Self {
        Self {
            world,
            registry,
            policy,
            collateral,
            immediate,
            rng,
            checked: FxHashSet::default(),
            blocks: Vec::new(),
        }
    }

    /// Records every destroyed position, runs the collateral pass, and
    /// produces the sorted outcome.
    pub(crate) fn run(mut self, destroyed: &[BlockPos], origin: BlockPos) -> CaptureOutcome {
        self.record_initial(destroyed);
        if self.collateral.enabled {
            self.collateral_scan(origin);
        }

        sort_nearest_first(&mut self.blocks, origin);
        let radius = compute_radius(&self.blocks, origin);

        debug_assert!(
            distinct_positions(&self.blocks),
            "duplicate position in heal list"
        );

        CaptureOutcome {
            blocks: self.blocks,
            checked: self.checked,
            radius,
        }
    }

    /// Records dependent kinds first, then the rest.
    ///
    /// Seeding `checked` with the dependent kinds before the free-standing
    /// pass keeps the recursive walk from recording a dependent's own
    /// dependents in inconsistent order.
    fn record_initial(&mut self, destroyed: &[BlockPos]) {
        let mut free_standing = Vec::with_capacity(destroyed.len());
        for &pos in destroyed {
            match self.world.state_at(pos) {
                Some(state) if self.registry.is_dependent(state.id.kind) => self.record(pos),
                Some(_) => free_standing.push(pos),
                None => {} // already gone, nothing to record
            }
        }
        for pos in free_standing {
            self.record(pos);
        }
    }

    /// Records one position and, transitively, everything it depends on.
    ///
    /// An explicit work stack instead of recursion: dependency chains can
    /// cycle, and `checked` is the only thing bounding the walk.
    pub(crate) fn record(&mut self, start: BlockPos) {
        let mut stack = vec![Frame::Visit(start)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Visit(pos) => self.visit(pos, &mut stack),
                Frame::Capture(pos) => {
                    if let Some(block) = CapturedBlock::capture(self.world, pos, self.registry) {
                        self.blocks.push(block);
                    } else {
                        tracing::debug!(
                            "block at ({}, {}, {}) vanished before capture",
                            pos.x,
                            pos.y,
                            pos.z
                        );
                    }
                }
            }
        }
    }

    fn visit(&mut self, pos: BlockPos, stack: &mut Vec<Frame>) {
        if self.checked.contains(&pos) {
            return;
        }
        let Some(state) = self.world.state_at(pos) else {
            return;
        };
        let Some(def) = self.registry.def_of(state.id) else {
            return; // unknown kind; CapturedBlock::capture would refuse it too
        };
        // Mark before expanding dependencies so cyclic graphs terminate.
        self.checked.insert(pos);

        // Chain-reaction-sensitive or protected blocks must reappear at once.
        if (self.policy.prevent_chain_reaction && def.explosive) || self.world.is_protected(pos) {
            if let Some(block) = CapturedBlock::capture(self.world, pos, self.registry) {
                self.immediate.insert(pos, block);
            }
            return;
        }

        if self.policy.is_blacklisted(state.id.kind.0, state.id.variant) {
            if let Some(block) = CapturedBlock::capture(self.world, pos, self.registry) {
                if self.policy.drop_destroyed {
                    block.drop_loot(self.world);
                }
                // Without the drop policy the block is discarded outright:
                // removed, never scheduled, never loot.
            }
            return;
        }

        // Restorable: supports are captured ahead of this block.
        stack.push(Frame::Capture(pos));
        for dep in dependent_neighbors(state, pos, self.registry) {
            stack.push(Frame::Visit(dep));
        }
    }

    /// Probabilistic collateral pass: every collateral-kind block within the
    /// configured sphere gets an independent chance to join the event.
    fn collateral_scan(&mut self, origin: BlockPos) {
        let radius = i32::from(self.collateral.radius);
        let chance = f64::from(self.collateral.chance_percent) / 100.0;
        let (min_y, max_y) = self.world.height_bounds(origin.world);

        for x in (origin.x - radius)..(origin.x + radius) {
            for y in (origin.y - radius).max(min_y)..(origin.y + radius).min(max_y) {
                for z in (origin.z - radius)..(origin.z + radius) {
                    let pos = BlockPos::new(x, y, z, origin.world);
                    if pos.distance(origin) > f64::from(radius) {
                        continue;
                    }
                    let Some(state) = self.world.state_at(pos) else {
                        continue;
                    };
                    let eligible = self
                        .registry
                        .def_of(state.id)
                        .is_some_and(|def| def.collateral);
                    if eligible && self.rng.gen_range(0.0..1.0) < chance {
                        self.record(pos);
                    }
                }
            }
        }
    }
}

fn compute_radius(blocks: &[CapturedBlock], origin: BlockPos) -> f64 {
    let mut r = 0.0f64;
    for block in blocks {
        r = r.max(block.pos().distance(origin));
    }
    r + 1.0
}

fn distinct_positions(blocks: &[CapturedBlock]) -> bool {
    let mut seen = FxHashSet::default();
    blocks.iter().all(|b| seen.insert(b.pos()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
