//! Spatial module: points, partitions and the indexes that hold them.

mod aabb;
mod point;
mod point_octree;
mod spatial_index;

pub use aabb::AABB;
pub use point::{Partition, PartitionId, Point, PointMeta};
pub use point_octree::{OctreeConfig, PointOctree};
pub use spatial_index::SpatialIndex;
