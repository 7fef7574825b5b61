/// Cluster id → instance color lookup.

use glam::Vec3;
use rustc_hash::FxHashMap;

/// Color used for clusters without an entry (and when no table is given).
pub const DEFAULT_CLUSTER_COLOR: Vec3 = Vec3::ONE;

/// Mapping from cluster id to a linear RGB color.
#[derive(Debug, Clone, Default)]
pub struct ClusterColorTable {
    colors: FxHashMap<u32, Vec3>,
}

impl ClusterColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an 8-bit sRGB palette where the position in the
    /// slice is the cluster id.
    pub fn from_rgb8(palette: &[[u8; 3]]) -> Self {
        let mut table = Self::new();
        for (cluster_id, rgb) in palette.iter().enumerate() {
            table.insert_rgb8(cluster_id as u32, *rgb);
        }
        table
    }

    /// Set a cluster color (linear RGB, 0..1).
    pub fn insert(&mut self, cluster_id: u32, color: Vec3) {
        self.colors.insert(cluster_id, color);
    }

    /// Set a cluster color from 8-bit sRGB components.
    pub fn insert_rgb8(&mut self, cluster_id: u32, rgb: [u8; 3]) {
        self.insert(cluster_id, srgb8_to_linear(rgb));
    }

    /// Color of `cluster_id`, white when absent.
    #[inline]
    pub fn color(&self, cluster_id: u32) -> Vec3 {
        self.colors.get(&cluster_id).copied().unwrap_or(DEFAULT_CLUSTER_COLOR)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Decode 8-bit sRGB to linear RGB.
pub fn srgb8_to_linear(rgb: [u8; 3]) -> Vec3 {
    fn channel(c: u8) -> f32 {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    Vec3::new(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
}

#[cfg(test)]
#[path = "color_table_tests.rs"]
mod tests;
