/// Dataset ingestion: records to flat arrays to spatial index.
///
/// Source records carry an id, a cluster and raw coordinates. They are
/// scaled into scene space by a `CoordinateTransform` and laid out as a
/// flat stride-3 position array with parallel cluster and label arrays,
/// which is the shape `PointOctree::from_flat()` consumes.

use glam::Vec3;
use crate::culler::ClusterColorTable;
use crate::error::Result;
use crate::spatial::{OctreeConfig, PointOctree, AABB};
use crate::{lod_bail, lod_debug};

/// One entry of the source dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    /// Identifier, used as the point's label
    pub id: String,
    pub cluster: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl DatasetRecord {
    pub fn new(id: impl Into<String>, cluster: u32, x: f32, y: f32, z: f32) -> Self {
        Self { id: id.into(), cluster, x, y, z }
    }
}

/// Mapping from source coordinates to scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    /// Uniform factor applied to every axis
    pub distance_factor: f32,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self { distance_factor: 1.0 }
    }
}

impl CoordinateTransform {
    /// # Errors
    ///
    /// `InvalidConfig` if the factor is zero, negative or not finite.
    pub fn new(distance_factor: f32) -> Result<Self> {
        if !(distance_factor.is_finite() && distance_factor > 0.0) {
            lod_bail!(InvalidConfig, "starfield::CoordinateTransform",
                "distance_factor must be finite and positive (got {})", distance_factor);
        }
        Ok(Self { distance_factor })
    }

    #[inline]
    pub fn apply(&self, x: f32, y: f32, z: f32) -> Vec3 {
        Vec3::new(x, y, z) * self.distance_factor
    }
}

/// Flat, index-ready dataset.
#[derive(Debug, Clone, Default)]
pub struct FlatDataset {
    positions: Vec<f32>,
    cluster_ids: Vec<u32>,
    labels: Vec<String>,
}

impl FlatDataset {
    /// Transform and flatten `records`. Point `i` of the result is
    /// `records[i]`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if a record has a non-finite coordinate.
    pub fn from_records(records: &[DatasetRecord], transform: &CoordinateTransform) -> Result<Self> {
        let mut dataset = Self {
            positions: Vec::with_capacity(records.len() * 3),
            cluster_ids: Vec::with_capacity(records.len()),
            labels: Vec::with_capacity(records.len()),
        };

        for (i, record) in records.iter().enumerate() {
            let position = transform.apply(record.x, record.y, record.z);
            if !position.is_finite() {
                lod_bail!(InvalidInput, "starfield::FlatDataset",
                    "Record {} ('{}') has a non-finite position {:?}", i, record.id, position);
            }
            dataset.positions.extend_from_slice(&position.to_array());
            dataset.cluster_ids.push(record.cluster);
            dataset.labels.push(record.id.clone());
        }

        lod_debug!("starfield::FlatDataset", "Flattened {} records", records.len());

        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.cluster_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cluster_ids.is_empty()
    }

    /// Positions, stride 3.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn cluster_ids(&self) -> &[u32] {
        &self.cluster_ids
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of point `index`.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    /// Per-point colors resolved through `table`.
    pub fn colors(&self, table: &ClusterColorTable) -> Vec<Vec3> {
        self.cluster_ids.iter().map(|&c| table.color(c)).collect()
    }

    /// Tight bounds of all positions.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the dataset is empty.
    pub fn bounds(&self) -> Result<AABB> {
        AABB::from_flat_positions(&self.positions)
    }

    /// Build a `PointOctree` over the dataset, bounded by `bounds()`.
    pub fn build_octree(&self, config: OctreeConfig) -> Result<PointOctree> {
        PointOctree::from_flat(
            self.bounds()?,
            config,
            &self.positions,
            &self.cluster_ids,
            Some(self.labels.as_slice()),
        )
    }
}

#[cfg(test)]
#[path = "dataset_tests.rs"]
mod tests;
