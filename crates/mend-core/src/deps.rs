//! The dependency resolver: which neighbor must exist before a block can
//! stand.

use mend_world::{BlockPos, BlockRegistry, BlockState, SupportKind};

/// Positions whose occupants must be captured before `state` at `pos` can be
/// safely restored.
///
/// Pure function of the block's kind and orientation. Free-standing kinds
/// return nothing; a floor-mounted block depends on the position below it, a
/// hanging block on the position above, and a wall-mounted block on the
/// position behind its decoded facing. Must be queried before the block
/// itself is captured -- capture removes the block, and a late lookup would
/// no longer see the pre-destruction state this resolver reads.
pub fn dependent_neighbors(
    state: BlockState,
    pos: BlockPos,
    registry: &BlockRegistry,
) -> Vec<BlockPos> {
    let Some(def) = registry.def_of(state.id) else {
        return Vec::new();
    };
    match def.support {
        SupportKind::FreeStanding => Vec::new(),
        SupportKind::OnFloor => vec![pos.offset(0, -1, 0)],
        SupportKind::Hanging => vec![pos.offset(0, 1, 0)],
        SupportKind::OnWall => {
            // The block faces away from its mount; the support is behind it.
            let (dx, dy, dz) = state.orientation.facing().opposite().unit_offset();
            vec![pos.offset(dx, dy, dz)]
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
