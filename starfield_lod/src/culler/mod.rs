//! Culler module: tiered LOD allocation.
//!
//! `FrustumCuller` fills one `TierBuffer` per `DetailTier` each frame and
//! mirrors the HD tier into a `LabelChannel`.

mod color_table;
mod config;
mod frustum_culler;
mod label_channel;
mod tier;
mod tier_buffer;

pub use color_table::{srgb8_to_linear, ClusterColorTable, DEFAULT_CLUSTER_COLOR};
pub use config::{
    CullerConfig, DistanceGate, OverflowPolicy,
    DEFAULT_DETAIL_CAPACITY, DEFAULT_TOTAL_CAPACITY,
};
pub use frustum_culler::{FilterState, FrustumCuller, OCTANT_COLOR};
pub use label_channel::{AtlasCell, LabelChannel, LabelSprites, LabelSpritesConfig};
pub use tier::{DetailTier, DirtyBuffers};
pub use tier_buffer::TierBuffer;
