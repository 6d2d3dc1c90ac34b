//! Hierarchical scene graph.
//!
//! A [`SceneNode`] exclusively owns its children and maps rays into its own object space
//! before querying them. Materials are resolved top-down: every query carries the
//! material inherited from the nearest ancestor that set one, so nodes never need to
//! look upward.

use std::sync::Arc;

use crate::{Intersection, Sphere, TriangleMesh};
use whitted_core::Material;
use whitted_math::{Aabb, AffineTransform, Mat4, Ray};

/// Anything that can be placed in the scene graph.
#[derive(Debug)]
pub enum SceneObject {
    Sphere(Sphere),
    Mesh(TriangleMesh),
    Node(SceneNode),
}

impl SceneObject {
    /// Append every hit along the ray, unsorted, in the caller's space.
    pub fn collect_hits<'a>(
        &'a self,
        ray: &Ray,
        inherited: &'a Material,
        out: &mut Vec<Intersection<'a>>,
    ) {
        match self {
            SceneObject::Sphere(sphere) => sphere.collect_hits(ray, inherited, out),
            SceneObject::Mesh(mesh) => mesh.collect_hits(ray, inherited, out),
            SceneObject::Node(node) => node.collect_hits(ray, inherited, out),
        }
    }

    /// All hits along the ray, nearest first.
    pub fn intersect<'a>(&'a self, ray: &Ray, inherited: &'a Material) -> Vec<Intersection<'a>> {
        let mut out = Vec::new();
        self.collect_hits(ray, inherited, &mut out);
        sort_by_distance(&mut out);
        out
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            SceneObject::Sphere(sphere) => sphere.bounding_box(),
            SceneObject::Mesh(mesh) => mesh.bounding_box(),
            SceneObject::Node(node) => node.bounding_box(),
        }
    }

    fn for_each_material<F: FnMut(&Material)>(&self, f: &mut F) {
        match self {
            SceneObject::Sphere(sphere) => {
                if let Some(m) = sphere.material() {
                    f(m);
                }
            }
            SceneObject::Mesh(mesh) => {
                mesh.data()
                    .sub_meshes()
                    .iter()
                    .filter_map(|s| s.material.as_deref())
                    .for_each(|m| f(m));
            }
            SceneObject::Node(node) => node.for_each_material(f),
        }
    }
}

impl From<Sphere> for SceneObject {
    fn from(sphere: Sphere) -> Self {
        SceneObject::Sphere(sphere)
    }
}

impl From<TriangleMesh> for SceneObject {
    fn from(mesh: TriangleMesh) -> Self {
        SceneObject::Mesh(mesh)
    }
}

impl From<SceneNode> for SceneObject {
    fn from(node: SceneNode) -> Self {
        SceneObject::Node(node)
    }
}

/// A transformed group of objects with an optional material override.
#[derive(Debug, Default)]
pub struct SceneNode {
    children: Vec<SceneObject>,
    transform: AffineTransform,
    material: Option<Arc<Material>>,
}

impl SceneNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the node-to-parent transform.
    pub fn with_transform(mut self, to_parent: Mat4) -> Self {
        self.transform.set_to_parent(to_parent);
        self
    }

    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_child(mut self, child: impl Into<SceneObject>) -> Self {
        self.add(child);
        self
    }

    pub fn add(&mut self, child: impl Into<SceneObject>) {
        self.children.push(child.into());
    }

    pub fn children(&self) -> &[SceneObject] {
        &self.children
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut AffineTransform {
        &mut self.transform
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_deref()
    }

    pub fn set_material(&mut self, material: Option<Arc<Material>>) {
        self.material = material;
    }

    /// Append every child hit, mapped into this node's parent space.
    pub fn collect_hits<'a>(
        &'a self,
        ray: &Ray,
        inherited: &'a Material,
        out: &mut Vec<Intersection<'a>>,
    ) {
        let material = self.material.as_deref().unwrap_or(inherited);
        let local_ray = self.transform.ray_to_object(ray);

        let start = out.len();
        for child in &self.children {
            child.collect_hits(&local_ray, material, out);
        }
        for hit in &mut out[start..] {
            *hit = hit.transform(&self.transform);
        }
    }

    /// All hits along the ray, nearest first, in this node's parent space.
    pub fn intersect<'a>(&'a self, ray: &Ray, inherited: &'a Material) -> Vec<Intersection<'a>> {
        let mut out = Vec::new();
        self.collect_hits(ray, inherited, &mut out);
        sort_by_distance(&mut out);
        out
    }

    /// Parent-space bounds of all children.
    pub fn bounding_box(&self) -> Aabb {
        let local = self
            .children
            .iter()
            .fold(Aabb::EMPTY, |acc, child| acc.union(&child.bounding_box()));
        self.transform.aabb_to_parent(&local)
    }

    /// Visit every material set anywhere in this subtree.
    pub fn for_each_material<F: FnMut(&Material)>(&self, f: &mut F) {
        if let Some(m) = self.material.as_deref() {
            f(m);
        }
        for child in &self.children {
            child.for_each_material(f);
        }
    }
}

fn sort_by_distance(hits: &mut [Intersection<'_>]) {
    hits.sort_by(|a, b| a.t.total_cmp(&b.t));
}
