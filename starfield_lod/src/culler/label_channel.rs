/// Label channel: per-slot text mirrored onto the HD tier.
///
/// The culler writes the label text and transform of every HD point into
/// the same slot of the channel, then sets its count and refreshes it.
/// Turning the labels into pixels belongs to the consumer.

use glam::{Mat4, UVec2, Vec2};
use crate::lod_warn;

/// Sink for HD point labels.
pub trait LabelChannel {
    /// Number of slots available.
    fn capacity(&self) -> usize;

    /// Set the text of a slot.
    fn set_label_at(&mut self, slot: usize, text: &str);

    /// Set the transform of a slot (same transform as the HD instance).
    fn set_transform_at(&mut self, slot: usize, transform: Mat4);

    /// Set the number of valid leading slots.
    fn set_count(&mut self, count: usize);

    /// Regenerate any backing representation from the current labels.
    fn refresh(&mut self);

    /// Release all resources.
    fn dispose(&mut self);
}

// ===== LABEL SPRITES =====

/// Layout parameters for LabelSprites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSpritesConfig {
    /// Number of label slots
    pub capacity: usize,
    /// Pixels reserved per label in the atlas
    pub label_resolution: UVec2,
    /// Pixels of the whole atlas texture
    pub texture_resolution: UVec2,
}

impl Default for LabelSpritesConfig {
    fn default() -> Self {
        Self {
            capacity: 128,
            label_resolution: UVec2::new(128, 64),
            texture_resolution: UVec2::new(1024, 1024),
        }
    }
}

/// Location of one slot in the label atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasCell {
    pub column: u32,
    pub row: u32,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

/// Label channel backed by a grid atlas: slot `i` occupies cell
/// `(i % columns, i / columns)`.
#[derive(Debug)]
pub struct LabelSprites {
    config: LabelSpritesConfig,
    grid: UVec2,
    labels: Vec<String>,
    transforms: Vec<Mat4>,
    count: usize,
    generation: u64,
}

impl LabelSprites {
    pub fn new(config: LabelSpritesConfig) -> Self {
        let grid = config.texture_resolution / config.label_resolution.max(UVec2::ONE);
        let cells = grid.x as usize * grid.y as usize;
        if cells < config.capacity {
            lod_warn!("starfield::LabelSprites",
                "Atlas holds {} labels but {} slots were requested. Decrease the capacity or \
                 the label resolution, or increase the texture resolution.",
                cells, config.capacity);
        }

        Self {
            config,
            grid,
            labels: vec![String::new(); config.capacity],
            transforms: vec![Mat4::IDENTITY; config.capacity],
            count: 0,
            generation: 0,
        }
    }

    pub fn config(&self) -> &LabelSpritesConfig {
        &self.config
    }

    /// Atlas grid size in cells (columns, rows).
    pub fn grid(&self) -> UVec2 {
        self.grid
    }

    /// Atlas cell of `slot`, or `None` when the atlas has no room for it.
    pub fn atlas_cell(&self, slot: usize) -> Option<AtlasCell> {
        if self.grid.x == 0 || slot >= self.grid.x as usize * self.grid.y as usize {
            return None;
        }
        let column = slot as u32 % self.grid.x;
        let row = slot as u32 / self.grid.x;
        let step = Vec2::ONE / self.grid.as_vec2();
        Some(AtlasCell {
            column,
            row,
            uv_min: Vec2::new(column as f32, row as f32) * step,
            uv_max: Vec2::new((column + 1) as f32, (row + 1) as f32) * step,
        })
    }

    /// Active label texts.
    pub fn labels(&self) -> &[String] {
        &self.labels[..self.count]
    }

    /// Active label transforms.
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms[..self.count]
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Incremented by every `refresh()`; the rasterizer redraws the atlas
    /// when it sees a new value.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl LabelChannel for LabelSprites {
    fn capacity(&self) -> usize {
        self.labels.len()
    }

    fn set_label_at(&mut self, slot: usize, text: &str) {
        let label = &mut self.labels[slot];
        label.clear();
        label.push_str(text);
    }

    fn set_transform_at(&mut self, slot: usize, transform: Mat4) {
        self.transforms[slot] = transform;
    }

    fn set_count(&mut self, count: usize) {
        assert!(count <= self.labels.len(), "label count {} exceeds capacity {}", count, self.labels.len());
        self.count = count;
    }

    fn refresh(&mut self) {
        self.generation += 1;
    }

    fn dispose(&mut self) {
        self.labels = Vec::new();
        self.transforms = Vec::new();
        self.count = 0;
    }
}

#[cfg(test)]
#[path = "label_channel_tests.rs"]
mod tests;
