use glam::Vec3;
use crate::error::Result;
use crate::lod_bail;

// ===== AABB =====

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Tight bounds of a flat position array (stride 3).
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the array is empty or its length is not a multiple of 3.
    pub fn from_flat_positions(positions: &[f32]) -> Result<Self> {
        if positions.is_empty() || positions.len() % 3 != 0 {
            lod_bail!(InvalidInput, "starfield::AABB",
                "Position array length {} is not a non-zero multiple of 3", positions.len());
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for xyz in positions.chunks_exact(3) {
            let p = Vec3::new(xyz[0], xyz[1], xyz[2]);
            min = min.min(p);
            max = max.max(p);
        }

        Ok(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full edge lengths.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Test if this AABB fully contains another AABB.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if a point lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Whether min <= max on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }
}
