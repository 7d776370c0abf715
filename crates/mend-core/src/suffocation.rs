//! Host seam for relocating occupants out of freshly restored terrain.

use mend_world::{BlockPos, WorldModel};

/// Post-restoration safety collaborator.
///
/// Invoked when `teleport_on_suffocate` is enabled: after a batch restore the
/// whole event area is swept; after a single incremental restore only the one
/// position is checked. The engine has no occupant model of its own, so the
/// host decides what "embedded in terrain" means and where to move anyone it
/// finds.
pub trait SuffocationGuard {
    /// Sweep a spherical area around `center` for embedded occupants.
    fn check_area(&mut self, world: &mut dyn WorldModel, center: BlockPos, radius: f64);

    /// Check the single position that was just restored.
    fn check_position(&mut self, world: &mut dyn WorldModel, pos: BlockPos);
}

/// Guard that performs no relocation, for hosts without occupant tracking.
pub struct NoSuffocation;

impl SuffocationGuard for NoSuffocation {
    fn check_area(&mut self, _world: &mut dyn WorldModel, _center: BlockPos, _radius: f64) {}

    fn check_position(&mut self, _world: &mut dyn WorldModel, _pos: BlockPos) {}
}
