//! Bounding Volume Hierarchy (BVH) over triangle bounds.
//!
//! Built top-down with a bucketed surface-area heuristic. The tree only stores triangle
//! indices; exact intersection tests are left to the caller through
//! [`Bvh::traverse`].

use std::time::Instant;

use whitted_core::MeshError;
use whitted_math::{Aabb, Axis, Ray, Vec3};

/// Maximum primitives per leaf node before splitting is forced.
const LEAF_MAX_SIZE: usize = 4;

/// Number of equal-width centroid buckets evaluated per split.
const BUCKET_COUNT: usize = 12;

/// Per-triangle record consumed by the builder.
#[derive(Clone, Copy, Debug)]
pub struct TriangleInfo {
    pub index: usize,
    pub bounds: Aabb,
    pub centroid: Vec3,
}

impl TriangleInfo {
    pub fn new(index: usize, bounds: Aabb) -> Self {
        Self {
            index,
            bounds,
            centroid: bounds.centroid(),
        }
    }
}

/// BVH node - either an inner node with two children or a leaf with triangles.
#[derive(Debug)]
pub enum BvhNode {
    Inner {
        bounds: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
    Leaf {
        bounds: Aabb,
        triangles: Vec<usize>,
    },
}

impl BvhNode {
    pub fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Inner { bounds, .. } | BvhNode::Leaf { bounds, .. } => bounds,
        }
    }
}

#[derive(Clone, Copy, Default)]
struct Bucket {
    count: usize,
    bounds: Aabb,
}

#[derive(Default)]
struct BuildStats {
    nodes: usize,
    leaves: usize,
    depth: usize,
}

/// A built hierarchy over a fixed set of triangles.
#[derive(Debug)]
pub struct Bvh {
    root: BvhNode,
    triangle_count: usize,
    node_count: usize,
    leaf_count: usize,
    depth: usize,
}

impl Bvh {
    /// Build the hierarchy. Fails on an empty triangle set.
    pub fn build(mut triangles: Vec<TriangleInfo>) -> Result<Self, MeshError> {
        if triangles.is_empty() {
            return Err(MeshError::NoTriangles);
        }

        let start = Instant::now();
        let mut stats = BuildStats::default();
        let root = build_range(&mut triangles, 1, &mut stats);

        log::info!(
            "Built BVH over {} triangles: {} nodes, {} leaves, depth {} in {:.2?}",
            triangles.len(),
            stats.nodes,
            stats.leaves,
            stats.depth,
            start.elapsed()
        );

        Ok(Self {
            root,
            triangle_count: triangles.len(),
            node_count: stats.nodes,
            leaf_count: stats.leaves,
            depth: stats.depth,
        })
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    pub fn bounds(&self) -> &Aabb {
        self.root.bounds()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Call `visit` with every triangle index in a leaf whose box the ray hits.
    ///
    /// Traversal is exhaustive: both children of a hit inner node are always visited.
    pub fn traverse<F: FnMut(usize)>(&self, ray: &Ray, mut visit: F) {
        traverse_node(&self.root, ray, &mut visit);
    }

    /// All leaves with their bounds, in depth-first order.
    pub fn leaves(&self) -> Vec<(&Aabb, &[usize])> {
        let mut out = Vec::with_capacity(self.leaf_count);
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                BvhNode::Leaf { bounds, triangles } => out.push((bounds, triangles.as_slice())),
                BvhNode::Inner { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }
}

fn traverse_node<F: FnMut(usize)>(node: &BvhNode, ray: &Ray, visit: &mut F) {
    match node {
        BvhNode::Leaf { bounds, triangles } => {
            if bounds.hit(ray) {
                triangles.iter().for_each(|&t| visit(t));
            }
        }
        BvhNode::Inner {
            bounds,
            left,
            right,
        } => {
            if bounds.hit(ray) {
                traverse_node(left, ray, visit);
                traverse_node(right, ray, visit);
            }
        }
    }
}

fn make_leaf(bounds: Aabb, infos: &[TriangleInfo], depth: usize, stats: &mut BuildStats) -> BvhNode {
    stats.nodes += 1;
    stats.leaves += 1;
    stats.depth = stats.depth.max(depth);
    BvhNode::Leaf {
        bounds,
        triangles: infos.iter().map(|info| info.index).collect(),
    }
}

/// Recursive construction over `infos`, which is reordered in place.
fn build_range(infos: &mut [TriangleInfo], depth: usize, stats: &mut BuildStats) -> BvhNode {
    let bounds = infos
        .iter()
        .fold(Aabb::EMPTY, |acc, info| acc.union(&info.bounds));

    if infos.len() == 1 {
        return make_leaf(bounds, infos, depth, stats);
    }

    let centroid_bounds = Aabb::enclosing(infos.iter().map(|info| info.centroid));
    let axis = centroid_bounds.max_extent();
    if axis.of(centroid_bounds.extent()) <= 0.0 {
        // All centroids coincide; no plane can separate them.
        log::debug!(
            "BVH leaf of {} triangles with coincident centroids at depth {}",
            infos.len(),
            depth
        );
        return make_leaf(bounds, infos, depth, stats);
    }

    let mid = if infos.len() <= LEAF_MAX_SIZE {
        infos.sort_unstable_by(|a, b| axis.of(a.centroid).total_cmp(&axis.of(b.centroid)));
        infos.len() / 2
    } else {
        // Above the leaf size a split is mandatory, so the leaf cost never wins here
        choose_sah_split(infos, &bounds, &centroid_bounds, axis)
    };

    let (left, right) = infos.split_at_mut(mid);
    let left = build_range(left, depth + 1, stats);
    let right = build_range(right, depth + 1, stats);
    stats.nodes += 1;

    BvhNode::Inner {
        bounds,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn bucket_index(centroid: Vec3, centroid_bounds: &Aabb, axis: Axis) -> usize {
    let offset = axis.of(centroid_bounds.offset(centroid));
    ((BUCKET_COUNT as f32 * offset) as usize).min(BUCKET_COUNT - 1)
}

/// Pick the cheapest bucket boundary and partition `infos` around it.
///
/// Returns the partition point; both sides are non-empty.
fn choose_sah_split(
    infos: &mut [TriangleInfo],
    bounds: &Aabb,
    centroid_bounds: &Aabb,
    axis: Axis,
) -> usize {
    let mut buckets = [Bucket::default(); BUCKET_COUNT];
    for info in infos.iter() {
        let b = bucket_index(info.centroid, centroid_bounds, axis);
        buckets[b].count += 1;
        buckets[b].bounds = buckets[b].bounds.union(&info.bounds);
    }

    let parent_area = bounds.surface_area();
    let mut best_split = 0;
    let mut best_cost = f32::INFINITY;
    for split in 0..BUCKET_COUNT - 1 {
        let (below, above) = buckets.split_at(split + 1);
        let (count_l, bounds_l) = merge(below);
        let (count_r, bounds_r) = merge(above);

        let weighted =
            count_l as f32 * bounds_l.surface_area() + count_r as f32 * bounds_r.surface_area();
        let cost = if parent_area > 0.0 {
            1.0 + weighted / parent_area
        } else {
            1.0 + infos.len() as f32
        };
        if cost < best_cost {
            best_cost = cost;
            best_split = split;
        }
    }

    let mid = partition(infos, |info| {
        bucket_index(info.centroid, centroid_bounds, axis) <= best_split
    });

    if mid == 0 || mid == infos.len() {
        // Rounding put everything on one side; fall back to a median split.
        infos.sort_unstable_by(|a, b| axis.of(a.centroid).total_cmp(&axis.of(b.centroid)));
        return infos.len() / 2;
    }
    mid
}

fn merge(buckets: &[Bucket]) -> (usize, Aabb) {
    buckets.iter().fold((0, Aabb::EMPTY), |(count, bounds), b| {
        (count + b.count, bounds.union(&b.bounds))
    })
}

/// Move every element satisfying `pred` to the front; returns how many there are.
fn partition<T, P: Fn(&T) -> bool>(items: &mut [T], pred: P) -> usize {
    let mut mid = 0;
    for i in 0..items.len() {
        if pred(&items[i]) {
            items.swap(i, mid);
            mid += 1;
        }
    }
    mid
}
