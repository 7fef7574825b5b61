/// Culler configuration.

use crate::error::Result;
use crate::lod_bail;
use super::tier::DetailTier;

/// Total instance budget used by `CullerConfig::default()`.
pub const DEFAULT_TOTAL_CAPACITY: usize = 20_000;

/// Slots given to each of the HD and SD tiers by `with_total_capacity()`.
pub const DEFAULT_DETAIL_CAPACITY: usize = 128;

/// What happens once the LD (overflow) tier is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Stop the whole traversal as soon as LD is full. HD/SD candidates
    /// in farther partitions are not considered.
    StopTraversal,
    /// Keep scanning for HD/SD candidates; only LD-bound points are
    /// dropped. Stops once every tier is full.
    SkipOverflowOnly,
}

/// How HD/SD eligibility is gated before the per-point distance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceGate {
    /// A partition may only feed HD/SD if its *center* is within the
    /// threshold. Approximate for large partitions: a near point in a
    /// partition whose center is too far is demoted.
    PartitionCenter,
    /// Only the point's own distance counts.
    PerPoint,
}

/// Culler parameters. Set at construction; thresholds and the far plane
/// can be changed later through the culler's setters.
#[derive(Debug, Clone, PartialEq)]
pub struct CullerConfig {
    /// Far plane used for culling instead of the camera's own
    pub far_override: f32,
    pub hd_capacity: usize,
    pub sd_capacity: usize,
    pub ld_capacity: usize,
    /// Points closer than this may be HD
    pub hd_max_distance: f32,
    /// Points closer than this may be SD (must be >= `hd_max_distance`)
    pub sd_max_distance: f32,
    /// Maximum number of debug octant boxes (0 disables them)
    pub debug_capacity: usize,
    /// Uniform scale baked into every instance transform
    pub instance_scale: f32,
    pub overflow_policy: OverflowPolicy,
    pub distance_gate: DistanceGate,
}

impl Default for CullerConfig {
    fn default() -> Self {
        Self {
            far_override: 1000.0,
            hd_capacity: DEFAULT_DETAIL_CAPACITY,
            sd_capacity: DEFAULT_DETAIL_CAPACITY,
            ld_capacity: DEFAULT_TOTAL_CAPACITY - 2 * DEFAULT_DETAIL_CAPACITY,
            hd_max_distance: 150.0,
            sd_max_distance: 300.0,
            debug_capacity: 2500,
            instance_scale: 1.0,
            overflow_policy: OverflowPolicy::StopTraversal,
            distance_gate: DistanceGate::PartitionCenter,
        }
    }
}

impl CullerConfig {
    /// Default config with a total instance budget: HD and SD get
    /// `DEFAULT_DETAIL_CAPACITY` each, LD gets the rest.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `total` cannot cover the HD and SD tiers.
    pub fn with_total_capacity(total: usize) -> Result<Self> {
        let detail = 2 * DEFAULT_DETAIL_CAPACITY;
        if total < detail {
            lod_bail!(InvalidConfig, "starfield::CullerConfig",
                "Total capacity {} is smaller than the {} HD/SD slots", total, detail);
        }
        Ok(Self {
            ld_capacity: total - detail,
            ..Self::default()
        })
    }

    /// Capacity of a tier.
    pub fn capacity(&self, tier: DetailTier) -> usize {
        match tier {
            DetailTier::High => self.hd_capacity,
            DetailTier::Standard => self.sd_capacity,
            DetailTier::Low => self.ld_capacity,
        }
    }

    /// Distance limit of a tier (`None` for the overflow tier).
    pub fn max_distance(&self, tier: DetailTier) -> Option<f32> {
        match tier {
            DetailTier::High => Some(self.hd_max_distance),
            DetailTier::Standard => Some(self.sd_max_distance),
            DetailTier::Low => None,
        }
    }

    /// HD + SD + LD capacity.
    pub fn total_capacity(&self) -> usize {
        self.hd_capacity + self.sd_capacity + self.ld_capacity
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a non-positive or non-finite far plane or scale,
    /// a negative or NaN distance threshold, or an SD threshold below the
    /// HD one.
    pub fn validate(&self) -> Result<()> {
        if !(self.far_override.is_finite() && self.far_override > 0.0) {
            lod_bail!(InvalidConfig, "starfield::CullerConfig",
                "far_override must be finite and positive (got {})", self.far_override);
        }
        if !(self.instance_scale.is_finite() && self.instance_scale > 0.0) {
            lod_bail!(InvalidConfig, "starfield::CullerConfig",
                "instance_scale must be finite and positive (got {})", self.instance_scale);
        }
        validate_thresholds(self.hd_max_distance, self.sd_max_distance)
    }
}

/// HD and SD thresholds: each non-negative, SD not below HD.
pub(crate) fn validate_thresholds(hd_max_distance: f32, sd_max_distance: f32) -> Result<()> {
    validate_distance("hd_max_distance", hd_max_distance)?;
    validate_distance("sd_max_distance", sd_max_distance)?;
    if sd_max_distance < hd_max_distance {
        lod_bail!(InvalidConfig, "starfield::CullerConfig",
            "sd_max_distance ({}) is below hd_max_distance ({})", sd_max_distance, hd_max_distance);
    }
    Ok(())
}

fn validate_distance(name: &str, distance: f32) -> Result<()> {
    // `>= 0.0` is false for NaN
    if !(distance >= 0.0) {
        lod_bail!(InvalidConfig, "starfield::CullerConfig",
            "{} must be non-negative (got {})", name, distance);
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
