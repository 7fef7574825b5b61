/// Detail tiers and the dirty bits reported for their buffers.

use bitflags::bitflags;

/// One of the three capacity-bounded detail tiers.
///
/// Variants are ordered by assignment priority: a point goes to the
/// first tier (High → Standard → Low) that admits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetailTier {
    /// Near points, rendered with the finest mesh and a label
    High,
    /// Mid-range points
    Standard,
    /// Overflow tier, no distance limit
    Low,
}

impl DetailTier {
    /// All tiers in assignment priority order.
    pub const ALL: [DetailTier; 3] = [DetailTier::High, DetailTier::Standard, DetailTier::Low];

    pub const COUNT: usize = 3;

    /// Position in tier-indexed arrays.
    pub const fn index(self) -> usize {
        match self {
            DetailTier::High => 0,
            DetailTier::Standard => 1,
            DetailTier::Low => 2,
        }
    }

    /// Dirty bit of this tier's buffer.
    pub const fn dirty_flag(self) -> DirtyBuffers {
        match self {
            DetailTier::High => DirtyBuffers::HIGH,
            DetailTier::Standard => DirtyBuffers::STANDARD,
            DetailTier::Low => DirtyBuffers::LOW,
        }
    }
}

bitflags! {
    /// Buffers whose active prefix changed and must be re-uploaded.
    ///
    /// Returned by `FrustumCuller::cull()` and `FrustumCuller::take_dirty()`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyBuffers: u8 {
        const HIGH     = 1 << 0;
        const STANDARD = 1 << 1;
        const LOW      = 1 << 2;
        /// Debug octant boxes
        const OCTANTS  = 1 << 3;
        /// Label channel (mirrors HIGH)
        const LABELS   = 1 << 4;
    }
}
