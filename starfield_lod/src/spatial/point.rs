/// Dataset points and the partitions a spatial index returns for them.

use glam::Vec3;

/// Per-point metadata carried alongside the position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PointMeta {
    /// Stable identity into the source dataset (indexes the filter mask)
    pub original_index: u32,
    /// Cluster id (color lookup and focus filtering)
    pub cluster_id: u32,
    /// Short text shown by the label channel for HD points
    pub label: Option<String>,
}

/// One dataset entry, owned by the spatial index.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub position: Vec3,
    pub meta: PointMeta,
}

impl Point {
    pub fn new(position: Vec3, meta: PointMeta) -> Self {
        Self { position, meta }
    }

    pub fn original_index(&self) -> u32 {
        self.meta.original_index
    }

    pub fn cluster_id(&self) -> u32 {
        self.meta.cluster_id
    }

    /// Label text, empty when the point has none.
    pub fn label(&self) -> &str {
        self.meta.label.as_deref().unwrap_or("")
    }
}

/// Identifier of a partition within the index that produced it.
pub type PartitionId = u32;

/// A spatial cell returned by a frustum query.
///
/// May only partially overlap the frustum: the culler re-tests every
/// point it contains.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub points: &'a [Point],
}

impl<'a> Partition<'a> {
    /// Squared distance from `from` to the partition center.
    pub fn center_distance_squared(&self, from: Vec3) -> f32 {
        self.center.distance_squared(from)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
