/// FrustumCuller: per-frame frustum culling and tiered LOD allocation.
///
/// Each `cull()` rebuilds the frustum, queries the spatial index, orders
/// the returned partitions nearest-first and hands out the scarce HD, SD
/// and LD slots greedily in that order. Farther points are the ones that
/// get dropped when the tiers fill up.
///
/// All buffers are allocated once at construction. The per-frame path
/// reuses two scratch vectors (partition ids and their ordering) and
/// keeps per-point values on the stack.

use std::time::{Duration, Instant};
use glam::{Mat4, Quat, Vec3};
use rdst::{RadixKey, RadixSort};
use crate::camera::{Camera, Frustum};
use crate::error::Result;
use crate::spatial::{PartitionId, Point, SpatialIndex};
use crate::{lod_bail, lod_info};
use super::color_table::{ClusterColorTable, DEFAULT_CLUSTER_COLOR};
use super::config::{validate_thresholds, CullerConfig, DistanceGate, OverflowPolicy};
use super::label_channel::{LabelChannel, LabelSprites, LabelSpritesConfig};
use super::tier::{DetailTier, DirtyBuffers};
use super::tier_buffer::TierBuffer;

/// Color of the debug octant boxes.
pub const OCTANT_COLOR: Vec3 = Vec3::new(0.8, 1.0, 0.0);

const HIGH: usize = DetailTier::High.index();
const STANDARD: usize = DetailTier::Standard.index();
const LOW: usize = DetailTier::Low.index();

// ===== FILTER STATE =====

/// Per-call point filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterState<'a> {
    /// Only points of this cluster are visible
    pub focus_cluster: Option<u32>,
    /// Opt-in visibility indexed by original point index. Indices past
    /// the end of the mask are treated as `false`.
    pub filter_mask: Option<&'a [bool]>,
}

impl<'a> FilterState<'a> {
    /// No filtering.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_focus(mut self, cluster_id: u32) -> Self {
        self.focus_cluster = Some(cluster_id);
        self
    }

    pub fn with_mask(mut self, mask: &'a [bool]) -> Self {
        self.filter_mask = Some(mask);
        self
    }

    /// Focus and mask predicates (the frustum test is separate).
    #[inline]
    pub fn admits(&self, point: &Point) -> bool {
        self.focus_cluster.map_or(true, |c| c == point.cluster_id())
            && self.filter_mask.map_or(true, |mask| {
                mask.get(point.original_index() as usize).copied().unwrap_or(false)
            })
    }
}

// ===== PARTITION ORDER =====

/// Sort key: squared center distance, then partition id.
#[derive(Debug, Clone, Copy)]
struct PartitionOrder {
    distance_sq: f32,
    partition: PartitionId,
}

impl RadixKey for PartitionOrder {
    const LEVELS: usize = 8;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        // Non-negative floats order like their bit patterns
        let key = ((self.distance_sq.to_bits() as u64) << 32) | self.partition as u64;
        (key >> (level * 8)) as u8
    }
}

// ===== FRUSTUM CULLER =====

/// Frustum culler with three detail tiers and a debug octant buffer.
///
/// HD points are mirrored into the label channel `L`, which the caller
/// reads back through `labels()`.
pub struct FrustumCuller<L: LabelChannel = LabelSprites> {
    config: CullerConfig,
    /// HD, SD, LD buffers (indexed by `DetailTier::index()`)
    tiers: [TierBuffer; DetailTier::COUNT],
    /// Squared distance limits (LD has none)
    max_distance_sq: [Option<f32>; DetailTier::COUNT],
    octants: TierBuffer,
    labels: L,
    labels_dirty: bool,
    enabled: bool,
    last_elapsed: Duration,
    visible_partitions: Vec<PartitionId>,
    partition_order: Vec<PartitionOrder>,
}

impl FrustumCuller<LabelSprites> {
    /// Create a culler with a `LabelSprites` channel sized to the HD tier.
    pub fn with_label_sprites(config: CullerConfig) -> Result<Self> {
        let sprites = LabelSprites::new(LabelSpritesConfig {
            capacity: config.hd_capacity,
            ..LabelSpritesConfig::default()
        });
        Self::new(config, sprites)
    }
}

impl<L: LabelChannel> FrustumCuller<L> {
    /// Create a culler writing HD labels into `labels`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the config does not validate or the label
    /// channel has fewer slots than the HD tier.
    pub fn new(config: CullerConfig, labels: L) -> Result<Self> {
        config.validate()?;
        if labels.capacity() < config.hd_capacity {
            lod_bail!(InvalidConfig, "starfield::FrustumCuller",
                "Label channel has {} slots but the HD tier needs {}",
                labels.capacity(), config.hd_capacity);
        }

        let tiers = DetailTier::ALL.map(|tier| TierBuffer::new(config.capacity(tier)));
        let max_distance_sq = DetailTier::ALL.map(|tier| config.max_distance(tier).map(|d| d * d));

        lod_info!("starfield::FrustumCuller",
            "Created with HD/SD/LD capacities {}/{}/{} and {} octant boxes",
            config.hd_capacity, config.sd_capacity, config.ld_capacity, config.debug_capacity);

        Ok(Self {
            tiers,
            max_distance_sq,
            octants: TierBuffer::new(config.debug_capacity),
            labels,
            labels_dirty: false,
            enabled: true,
            last_elapsed: Duration::ZERO,
            visible_partitions: Vec::new(),
            partition_order: Vec::new(),
            config,
        })
    }

    // ===== CULL =====

    /// Cull `index` against `camera` and refill the tier buffers.
    ///
    /// Returns the buffers that changed. When the culler is disabled this
    /// is a no-op: every buffer keeps its previous contents and the
    /// result is empty.
    pub fn cull(
        &mut self,
        index: &dyn SpatialIndex,
        camera: &Camera,
        cluster_colors: Option<&ClusterColorTable>,
        filter: &FilterState<'_>,
    ) -> DirtyBuffers {
        if !self.enabled {
            return DirtyBuffers::empty();
        }
        let start = Instant::now();

        let frustum = Frustum::from_camera_with_far(camera, self.config.far_override);
        let eye = camera.position();

        // Visible partitions, nearest center first
        self.visible_partitions.clear();
        index.query_frustum(&frustum, &mut self.visible_partitions);

        let mut order = std::mem::take(&mut self.partition_order);
        order.clear();
        order.extend(self.visible_partitions.iter().map(|&id| PartitionOrder {
            distance_sq: index.partition(id).center_distance_squared(eye),
            partition: id,
        }));
        order.radix_sort_unstable();

        // Debug boxes visualize the partition set, empty partitions included
        let octant_count = self.octants.capacity().min(order.len());
        for (slot, entry) in order[..octant_count].iter().enumerate() {
            let partition = index.partition(entry.partition);
            let transform = Mat4::from_scale_rotation_translation(
                partition.half_extents * 2.0,
                Quat::IDENTITY,
                partition.center,
            );
            self.octants.set_at(slot, transform, OCTANT_COLOR);
        }
        self.octants.set_count(octant_count);

        let counts = self.assign_tiers(index, &frustum, eye, &order, cluster_colors, filter);
        self.partition_order = order;

        for tier in DetailTier::ALL {
            let buffer = &mut self.tiers[tier.index()];
            buffer.set_count(counts[tier.index()]);
            buffer.mark_dirty();
        }
        self.octants.mark_dirty();
        self.labels.set_count(counts[HIGH]);
        self.labels.refresh();
        self.labels_dirty = true;

        self.last_elapsed = start.elapsed();

        DirtyBuffers::all()
    }

    /// Walk the ordered partitions and fill the tiers. Returns the final
    /// per-tier counts.
    fn assign_tiers(
        &mut self,
        index: &dyn SpatialIndex,
        frustum: &Frustum,
        eye: Vec3,
        order: &[PartitionOrder],
        cluster_colors: Option<&ClusterColorTable>,
        filter: &FilterState<'_>,
    ) -> [usize; DetailTier::COUNT] {
        let capacities = DetailTier::ALL.map(|tier| self.tiers[tier.index()].capacity());
        let scale = Vec3::splat(self.config.instance_scale);
        let mut counts = [0usize; DetailTier::COUNT];

        'partitions: for entry in order {
            let partition = index.partition(entry.partition);
            if partition.is_empty() {
                continue;
            }

            let gates = self.admission_gates(entry.distance_sq);

            // Partitions are sorted by center distance, so once neither
            // detail gate opens it stays closed for every later partition.
            if self.config.overflow_policy == OverflowPolicy::SkipOverflowOnly
                && self.config.distance_gate == DistanceGate::PartitionCenter
                && counts[LOW] >= capacities[LOW]
                && !gates[HIGH]
                && !gates[STANDARD]
            {
                break;
            }

            for point in partition.points {
                if self.traversal_exhausted(&counts, &capacities) {
                    break 'partitions;
                }

                if !filter.admits(point) || !frustum.contains_point(point.position) {
                    continue;
                }

                let color = cluster_colors
                    .map_or(DEFAULT_CLUSTER_COLOR, |table| table.color(point.cluster_id()));
                let distance_sq = point.position.distance_squared(eye);

                let Some(tier) = self.select_tier(&gates, &counts, &capacities, distance_sq) else {
                    continue;
                };

                let slot = counts[tier.index()];
                let transform =
                    Mat4::from_scale_rotation_translation(scale, Quat::IDENTITY, point.position);
                self.tiers[tier.index()].set_at(slot, transform, color);
                if tier == DetailTier::High {
                    self.labels.set_transform_at(slot, transform);
                    self.labels.set_label_at(slot, point.label());
                }
                counts[tier.index()] += 1;
            }
        }

        counts
    }

    /// Partition-level HD/SD admissibility. LD is always admissible.
    fn admission_gates(&self, partition_distance_sq: f32) -> [bool; DetailTier::COUNT] {
        match self.config.distance_gate {
            DistanceGate::PartitionCenter => self
                .max_distance_sq
                .map(|limit| limit.map_or(true, |max| partition_distance_sq < max)),
            DistanceGate::PerPoint => [true; DetailTier::COUNT],
        }
    }

    /// First tier (in priority order) that admits a point at `distance_sq`.
    #[inline]
    fn select_tier(
        &self,
        gates: &[bool; DetailTier::COUNT],
        counts: &[usize; DetailTier::COUNT],
        capacities: &[usize; DetailTier::COUNT],
        distance_sq: f32,
    ) -> Option<DetailTier> {
        DetailTier::ALL.into_iter().find(|tier| {
            let i = tier.index();
            gates[i]
                && counts[i] < capacities[i]
                && self.max_distance_sq[i].map_or(true, |max| distance_sq < max)
        })
    }

    #[inline]
    fn traversal_exhausted(
        &self,
        counts: &[usize; DetailTier::COUNT],
        capacities: &[usize; DetailTier::COUNT],
    ) -> bool {
        match self.config.overflow_policy {
            OverflowPolicy::StopTraversal => counts[LOW] >= capacities[LOW],
            OverflowPolicy::SkipOverflowOnly => {
                counts.iter().zip(capacities).all(|(count, capacity)| count >= capacity)
            }
        }
    }

    // ===== CONSUMER API =====

    /// Buffer of a detail tier.
    pub fn buffer(&self, tier: DetailTier) -> &TierBuffer {
        &self.tiers[tier.index()]
    }

    /// Debug octant boxes (one per visible partition, nearest first).
    pub fn debug_buffer(&self) -> &TierBuffer {
        &self.octants
    }

    /// Label channel holding the text and transform of every HD point.
    /// Changed whenever `DirtyBuffers::LABELS` is reported.
    pub fn labels(&self) -> &L {
        &self.labels
    }

    /// Return every dirty bit and clear it. Called by the renderer after
    /// uploading.
    pub fn take_dirty(&mut self) -> DirtyBuffers {
        let mut dirty = DirtyBuffers::empty();
        for tier in DetailTier::ALL {
            let buffer = &mut self.tiers[tier.index()];
            if buffer.is_dirty() {
                dirty |= tier.dirty_flag();
                buffer.clear_dirty();
            }
        }
        if self.octants.is_dirty() {
            dirty |= DirtyBuffers::OCTANTS;
            self.octants.clear_dirty();
        }
        if self.labels_dirty {
            dirty |= DirtyBuffers::LABELS;
            self.labels_dirty = false;
        }
        dirty
    }

    // ===== STATE =====

    pub fn config(&self) -> &CullerConfig {
        &self.config
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable culling. Checked at the start of each `cull()`.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Wall-clock time of the last enabled `cull()`.
    pub fn last_elapsed(&self) -> Duration {
        self.last_elapsed
    }

    /// `last_elapsed()` in milliseconds, two decimals.
    pub fn last_elapsed_ms(&self) -> String {
        format!("{:.2}", self.last_elapsed.as_secs_f64() * 1000.0)
    }

    /// Change the culling far plane. Takes effect on the next `cull()`.
    pub fn set_far_override(&mut self, far: f32) -> Result<()> {
        if !(far.is_finite() && far > 0.0) {
            lod_bail!(InvalidConfig, "starfield::FrustumCuller",
                "far_override must be finite and positive (got {})", far);
        }
        self.config.far_override = far;
        Ok(())
    }

    pub fn set_hd_max_distance(&mut self, distance: f32) -> Result<()> {
        validate_thresholds(distance, self.config.sd_max_distance)?;
        self.config.hd_max_distance = distance;
        self.max_distance_sq[HIGH] = Some(distance * distance);
        Ok(())
    }

    pub fn set_sd_max_distance(&mut self, distance: f32) -> Result<()> {
        validate_thresholds(self.config.hd_max_distance, distance)?;
        self.config.sd_max_distance = distance;
        self.max_distance_sq[STANDARD] = Some(distance * distance);
        Ok(())
    }

    pub fn set_overflow_policy(&mut self, policy: OverflowPolicy) {
        self.config.overflow_policy = policy;
    }

    pub fn set_distance_gate(&mut self, gate: DistanceGate) {
        self.config.distance_gate = gate;
    }

    /// Release every buffer and the label channel.
    pub fn dispose(mut self) {
        for buffer in &mut self.tiers {
            buffer.dispose();
        }
        self.octants.dispose();
        self.labels.dispose();
        lod_info!("starfield::FrustumCuller", "Disposed");
    }
}

#[cfg(test)]
#[path = "frustum_culler_tests.rs"]
mod tests;
