/*!
# Starfield LOD

Frustum culling and tiered level-of-detail allocation for large point
datasets.

Every frame, `FrustumCuller::cull()` takes a camera and a spatial index
over the dataset and fills three fixed-capacity instance buffers, one per
detail tier. Partitions are visited nearest-first, so when the budget runs
out it is the farthest points that are dropped. A bounded number of draw
calls can therefore represent an arbitrarily large dataset.

## Architecture

- **Camera / Frustum**: caller-driven perspective camera and the six-plane
  culling volume derived from it
- **SpatialIndex**: partitioned point storage queried by frustum
  (`PointOctree` is the provided implementation)
- **FrustumCuller**: per-frame allocation into HD, SD and LD `TierBuffer`s
  plus a debug octant buffer
- **LabelChannel**: per-slot text mirrored onto the HD tier
- **Dataset**: record ingestion into the flat arrays the index is built from

Rendering the buffers is left to the consumer: they expose their active
prefix as plain slices and bytemuck byte views ready for upload.
*/

// Internal modules
mod error;
pub mod log;
pub mod camera;
pub mod culler;
pub mod dataset;
pub mod spatial;

// Main starfield namespace module
pub mod starfield {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types and logger control, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, log, log_detailed,
        };
    }

    // Camera and frustum
    pub use crate::camera::{Camera, Frustum, FrustumTest};

    // Spatial index and points
    pub use crate::spatial::{
        AABB, OctreeConfig, Partition, PartitionId, Point, PointMeta, PointOctree, SpatialIndex,
    };

    // Culler, tiers and label channel
    pub use crate::culler::{
        ClusterColorTable, CullerConfig, DetailTier, DirtyBuffers, DistanceGate, FilterState,
        FrustumCuller, LabelChannel, LabelSprites, LabelSpritesConfig, OverflowPolicy, TierBuffer,
    };

    // Dataset ingestion
    pub use crate::dataset::{CoordinateTransform, DatasetRecord, FlatDataset};
}

// Re-export math library at crate root
pub use glam;
