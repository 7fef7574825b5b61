/// PointOctree: adaptive point octree used as the default SpatialIndex.
///
/// Points live in leaves only. A leaf that exceeds `max_points_per_leaf`
/// splits into 8 octants and hands its points down, unless it already
/// sits at `max_depth`, in which case it keeps growing.
///
/// Nodes are stored in a flat array. The 8 children of a node are
/// contiguous, starting at `first_child` (0 = leaf, since the root can
/// never be a child).

use glam::Vec3;
use crate::camera::{Frustum, FrustumTest};
use crate::error::Result;
use crate::lod_bail;
use super::aabb::AABB;
use super::point::{Partition, PartitionId, Point, PointMeta};
use super::spatial_index::SpatialIndex;

/// Index of the root node in the flat node array.
const ROOT: usize = 0;

/// Construction parameters for PointOctree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctreeConfig {
    /// Maximum tree depth (root = 0)
    pub max_depth: u32,
    /// Points a leaf may hold before it splits
    pub max_points_per_leaf: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            max_points_per_leaf: 8,
        }
    }
}

/// A single node in the octree.
struct OctreeNode {
    aabb: AABB,
    depth: u32,
    /// Index of the first of 8 contiguous children (0 = leaf)
    first_child: usize,
    /// Points stored in this node (always empty for internal nodes)
    points: Vec<Point>,
}

impl OctreeNode {
    fn leaf(aabb: AABB, depth: u32) -> Self {
        Self {
            aabb,
            depth,
            first_child: 0,
            points: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.first_child == 0
    }
}

/// Adaptive point octree.
pub struct PointOctree {
    nodes: Vec<OctreeNode>,
    config: OctreeConfig,
    len: usize,
}

impl PointOctree {
    /// Create an empty octree covering `bounds`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the bounds are inverted or not finite, or if
    /// `max_points_per_leaf` is zero.
    pub fn new(bounds: AABB, config: OctreeConfig) -> Result<Self> {
        if !bounds.is_valid() || !bounds.min.is_finite() || !bounds.max.is_finite() {
            lod_bail!(InvalidConfig, "starfield::PointOctree",
                "Octree bounds must be finite with min <= max (got {:?})", bounds);
        }
        if config.max_points_per_leaf == 0 {
            lod_bail!(InvalidConfig, "starfield::PointOctree",
                "max_points_per_leaf must be at least 1");
        }

        Ok(Self {
            nodes: vec![OctreeNode::leaf(bounds, 0)],
            config,
            len: 0,
        })
    }

    /// Build an octree from flat dataset arrays.
    ///
    /// Point `i` takes its position from `positions[3i..3i+3]`, its cluster
    /// from `cluster_ids[i]` and its label from `labels[i]` (if given).
    /// Its original index is `i`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on stride or length mismatches, `OutOfBounds` if a
    /// position falls outside `bounds`.
    pub fn from_flat(
        bounds: AABB,
        config: OctreeConfig,
        positions: &[f32],
        cluster_ids: &[u32],
        labels: Option<&[String]>,
    ) -> Result<Self> {
        if positions.len() % 3 != 0 {
            lod_bail!(InvalidInput, "starfield::PointOctree",
                "Position array length {} is not a multiple of 3", positions.len());
        }
        let count = positions.len() / 3;
        if cluster_ids.len() != count {
            lod_bail!(InvalidInput, "starfield::PointOctree",
                "Expected {} cluster ids, got {}", count, cluster_ids.len());
        }
        if let Some(labels) = labels {
            if labels.len() != count {
                lod_bail!(InvalidInput, "starfield::PointOctree",
                    "Expected {} labels, got {}", count, labels.len());
            }
        }

        let mut octree = Self::new(bounds, config)?;
        for (i, xyz) in positions.chunks_exact(3).enumerate() {
            let meta = PointMeta {
                original_index: i as u32,
                cluster_id: cluster_ids[i],
                label: labels.map(|l| l[i].clone()),
            };
            octree.insert(Vec3::new(xyz[0], xyz[1], xyz[2]), meta)?;
        }

        crate::lod_debug!("starfield::PointOctree",
            "Built octree: {} points in {} leaves", octree.len, octree.leaf_count());

        Ok(octree)
    }

    /// World-space bounds of the root node.
    pub fn bounds(&self) -> &AABB {
        &self.nodes[ROOT].aabb
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Number of leaf nodes (empty leaves included).
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Deepest level reached by any node.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Compute the AABB of a specific octant (0–7).
    ///
    /// Octant bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = low, 1 = high).
    fn octant_aabb(parent: &AABB, center: &Vec3, octant: u8) -> AABB {
        AABB {
            min: Vec3::new(
                if octant & 1 == 0 { parent.min.x } else { center.x },
                if octant & 2 == 0 { parent.min.y } else { center.y },
                if octant & 4 == 0 { parent.min.z } else { center.z },
            ),
            max: Vec3::new(
                if octant & 1 == 0 { center.x } else { parent.max.x },
                if octant & 2 == 0 { center.y } else { parent.max.y },
                if octant & 4 == 0 { center.z } else { parent.max.z },
            ),
        }
    }

    /// Determine which octant a point falls into relative to a center.
    fn point_octant(center: &Vec3, point: &Vec3) -> u8 {
        ((point.x >= center.x) as u8)
            | (((point.y >= center.y) as u8) << 1)
            | (((point.z >= center.z) as u8) << 2)
    }

    /// Descend from the root to the leaf whose cell holds `position`.
    fn find_leaf(&self, position: &Vec3) -> usize {
        let mut node_idx = ROOT;
        loop {
            let node = &self.nodes[node_idx];
            if node.is_leaf() {
                return node_idx;
            }
            let octant = Self::point_octant(&node.aabb.center(), position);
            node_idx = node.first_child + octant as usize;
        }
    }

    /// Turn a leaf into an internal node and push its points down.
    ///
    /// Children that are still over budget split in turn, bounded by
    /// `max_depth`.
    fn split(&mut self, node_idx: usize) {
        let aabb = self.nodes[node_idx].aabb;
        let depth = self.nodes[node_idx].depth;
        let center = aabb.center();
        let points = std::mem::take(&mut self.nodes[node_idx].points);

        let first_child = self.nodes.len();
        for octant in 0..8u8 {
            let child_aabb = Self::octant_aabb(&aabb, &center, octant);
            self.nodes.push(OctreeNode::leaf(child_aabb, depth + 1));
        }
        self.nodes[node_idx].first_child = first_child;

        for point in points {
            let octant = Self::point_octant(&center, &point.position);
            self.nodes[first_child + octant as usize].points.push(point);
        }

        for child_idx in first_child..first_child + 8 {
            if self.needs_split(child_idx) {
                self.split(child_idx);
            }
        }
    }

    fn needs_split(&self, node_idx: usize) -> bool {
        let node = &self.nodes[node_idx];
        node.points.len() > self.config.max_points_per_leaf && node.depth < self.config.max_depth
    }

    /// 3-way classification at each node:
    /// - `Outside` → skip entire subtree
    /// - `Inside` → collect every leaf of the subtree without further testing
    /// - `Partial` → keep the leaf, or classify and recurse into children
    fn query_recursive(
        &self,
        node_idx: usize,
        frustum: &Frustum,
        classification: FrustumTest,
        results: &mut Vec<PartitionId>,
    ) {
        match classification {
            FrustumTest::Outside => {}
            FrustumTest::Inside => self.collect_leaves(node_idx, results),
            FrustumTest::Partial => {
                let node = &self.nodes[node_idx];
                if node.is_leaf() {
                    results.push(node_idx as PartitionId);
                    return;
                }
                for child_idx in node.first_child..node.first_child + 8 {
                    let child_class = frustum.classify_aabb(&self.nodes[child_idx].aabb);
                    self.query_recursive(child_idx, frustum, child_class, results);
                }
            }
        }
    }

    /// Collect every leaf below `node_idx` (no frustum test).
    fn collect_leaves(&self, node_idx: usize, results: &mut Vec<PartitionId>) {
        let node = &self.nodes[node_idx];
        if node.is_leaf() {
            results.push(node_idx as PartitionId);
            return;
        }
        for child_idx in node.first_child..node.first_child + 8 {
            self.collect_leaves(child_idx, results);
        }
    }
}

// ===== SPATIAL INDEX TRAIT =====

impl SpatialIndex for PointOctree {
    fn insert(&mut self, position: Vec3, meta: PointMeta) -> Result<()> {
        if !self.nodes[ROOT].aabb.contains_point(position) {
            lod_bail!(OutOfBounds, "starfield::PointOctree",
                "Point {} at {:?} lies outside the octree bounds", meta.original_index, position);
        }

        let leaf = self.find_leaf(&position);
        self.nodes[leaf].points.push(Point::new(position, meta));
        self.len += 1;

        if self.needs_split(leaf) {
            self.split(leaf);
        }
        Ok(())
    }

    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<PartitionId>) {
        let root_class = frustum.classify_aabb(&self.nodes[ROOT].aabb);
        self.query_recursive(ROOT, frustum, root_class, results);
    }

    fn partition(&self, id: PartitionId) -> Partition<'_> {
        let node = &self.nodes[id as usize];
        Partition {
            center: node.aabb.center(),
            half_extents: node.aabb.half_extents(),
            points: &node.points,
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
#[path = "point_octree_tests.rs"]
mod tests;
