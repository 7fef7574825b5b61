/// TierBuffer: fixed-capacity instance storage for one draw call.
///
/// Holds one transform and one color per slot plus an active count.
/// Capacity is set at construction and never changes; slots past the
/// active count keep whatever a previous frame wrote and must be
/// ignored by consumers.

use glam::{Mat4, Vec3};

/// Fixed-capacity array of (transform, color) instances.
#[derive(Debug, Clone)]
pub struct TierBuffer {
    transforms: Vec<Mat4>,
    colors: Vec<Vec3>,
    active_count: usize,
    dirty: bool,
}

impl TierBuffer {
    /// Allocate `capacity` slots (identity transforms, white colors).
    pub fn new(capacity: usize) -> Self {
        Self {
            transforms: vec![Mat4::IDENTITY; capacity],
            colors: vec![Vec3::ONE; capacity],
            active_count: 0,
            dirty: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.transforms.len()
    }

    /// Number of valid leading slots.
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Write a pre-allocated slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= capacity()`.
    #[inline]
    pub fn set_at(&mut self, slot: usize, transform: Mat4, color: Vec3) {
        assert!(
            slot < self.transforms.len(),
            "TierBuffer slot {} out of range (capacity {})",
            slot,
            self.transforms.len()
        );
        self.transforms[slot] = transform;
        self.colors[slot] = color;
    }

    /// Set the number of valid leading slots.
    ///
    /// # Panics
    ///
    /// Panics if `count > capacity()`.
    pub fn set_count(&mut self, count: usize) {
        assert!(
            count <= self.transforms.len(),
            "TierBuffer count {} exceeds capacity {}",
            count,
            self.transforms.len()
        );
        self.active_count = count;
    }

    /// Transform stored in `slot`, stale or not.
    pub fn transform_at(&self, slot: usize) -> Mat4 {
        self.transforms[slot]
    }

    /// Color stored in `slot`, stale or not.
    pub fn color_at(&self, slot: usize) -> Vec3 {
        self.colors[slot]
    }

    /// Active transforms.
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms[..self.active_count]
    }

    /// Active colors.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors[..self.active_count]
    }

    /// Active transforms as raw bytes (16 f32 per instance, column-major).
    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.transforms())
    }

    /// Active colors as raw bytes (3 f32 per instance).
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.colors())
    }

    // ===== DIRTY TRACKING =====

    /// Flag the active prefix for re-upload.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by the consumer once the active prefix is uploaded.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Release the storage. Capacity drops to zero.
    pub fn dispose(&mut self) {
        self.transforms = Vec::new();
        self.colors = Vec::new();
        self.active_count = 0;
        self.dirty = false;
    }
}

#[cfg(test)]
#[path = "tier_buffer_tests.rs"]
mod tests;
