//! Triangle meshes ready for intersection.

use crate::bvh::{Bvh, TriangleInfo};
use crate::triangle::intersect_triangle;
use crate::Intersection;
use whitted_core::{Material, MeshData, MeshError};
use whitted_math::{Aabb, Ray, Vec2};

/// Mesh data together with the hierarchy built over it.
///
/// The only way to obtain one is [`TriangleMesh::build`], so a mesh can never be
/// queried before its hierarchy exists.
#[derive(Debug)]
pub struct TriangleMesh {
    data: MeshData,
    bvh: Bvh,
}

impl TriangleMesh {
    /// Validate the mesh and build its BVH.
    pub fn build(data: MeshData) -> Result<Self, MeshError> {
        data.validate()?;
        let infos = (0..data.triangle_count())
            .map(|i| TriangleInfo::new(i, data.triangle_bounds(i)))
            .collect();
        let bvh = Bvh::build(infos)?;
        Ok(Self { data, bvh })
    }

    pub fn data(&self) -> &MeshData {
        &self.data
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    pub fn bounding_box(&self) -> Aabb {
        *self.bvh.bounds()
    }

    /// Append the hit with triangle `index`, if any.
    pub fn intersect_triangle<'a>(
        &'a self,
        index: usize,
        ray: &Ray,
        inherited: &'a Material,
        out: &mut Vec<Intersection<'a>>,
    ) {
        let vertices = self.data.triangle_vertices(index);
        let Some(hit) = intersect_triangle(ray, vertices) else {
            return;
        };

        let [a, b, c] = vertices;
        let geometric = (b - a).cross(c - a);
        let enter = geometric.dot(ray.direction()) < 0.0;

        let sub_mesh = self.data.sub_mesh_of(index);
        let normal = match self.data.triangle_normals(index) {
            Some(normals) if sub_mesh.smooth => hit.interpolate(normals).try_normalize(),
            _ => None,
        }
        .unwrap_or_else(|| geometric.normalize_or_zero());

        let uv = self
            .data
            .triangle_uvs(index)
            .map(|uvs| hit.interpolate(uvs))
            .unwrap_or(Vec2::ZERO);

        out.push(Intersection {
            t: hit.t,
            position: ray.at(hit.t),
            normal,
            uv,
            vertex_color: self.data.triangle_colors(index).map(|c| hit.interpolate(c)),
            enter,
            material: sub_mesh.material.as_deref().unwrap_or(inherited),
        });
    }

    /// Append every hit along the ray, in no particular order.
    pub fn collect_hits<'a>(
        &'a self,
        ray: &Ray,
        inherited: &'a Material,
        out: &mut Vec<Intersection<'a>>,
    ) {
        self.bvh
            .traverse(ray, |index| self.intersect_triangle(index, ray, inherited, out));
    }
}
