/// Spatial partitions over the point dataset.
///
/// A SpatialIndex buckets points into cells that can be queried by
/// frustum. The caller builds and owns the index and passes it by
/// reference to `FrustumCuller::cull()` each frame.

use glam::Vec3;
use crate::camera::Frustum;
use crate::error::Result;
use super::point::{Partition, PartitionId, PointMeta};

/// Trait for point-indexed spatial partitions.
pub trait SpatialIndex {
    /// Insert a point with its metadata.
    fn insert(&mut self, position: Vec3, meta: PointMeta) -> Result<()>;

    /// Append the id of every partition that intersects the frustum to
    /// `results`.
    ///
    /// The query is conservative: partially overlapping partitions are
    /// returned and their points re-tested by the caller.
    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<PartitionId>);

    /// Resolve a partition id returned by `query_frustum`.
    fn partition(&self, id: PartitionId) -> Partition<'_>;

    /// Number of points stored.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
