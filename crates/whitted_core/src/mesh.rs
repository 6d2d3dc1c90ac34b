//! Triangle mesh buffers.
//!
//! [`MeshData`] owns indexed vertex positions and triangles plus optional per-triangle
//! normals and texture coordinates and optional per-vertex colors. Triangles are grouped
//! into [`SubMesh`]es sharing a material; a triangle that was never linked belongs to the
//! default sub-mesh at index [`DEFAULT_SUB_MESH`].

use std::sync::Arc;

use thiserror::Error;
use whitted_math::{Aabb, Vec2, Vec3};

use crate::{Color, Material};

/// Index of the sub-mesh every triangle belongs to until linked elsewhere.
pub const DEFAULT_SUB_MESH: usize = 0;

/// Errors raised while assembling mesh data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("mesh has no triangles")]
    NoTriangles,

    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("triangle {triangle} does not exist (mesh has {triangle_count} triangles)")]
    TriangleOutOfRange { triangle: usize, triangle_count: usize },

    #[error("vertex {vertex} does not exist (mesh has {vertex_count} vertices)")]
    VertexIndexOutOfRange { vertex: usize, vertex_count: usize },

    #[error("sub-mesh {sub_mesh} does not exist (mesh has {count} sub-meshes)")]
    SubMeshOutOfRange { sub_mesh: usize, count: usize },
}

/// A group of triangles sharing shading properties.
#[derive(Clone, Debug)]
pub struct SubMesh {
    pub name: String,

    /// Material override; `None` inherits the material of the enclosing scene node.
    pub material: Option<Arc<Material>>,

    /// Interpolate per-vertex normals when the triangle has them.
    pub smooth: bool,
}

impl Default for SubMesh {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            material: None,
            smooth: true,
        }
    }
}

impl SubMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }
}

/// Indexed triangle geometry with optional shading attributes.
#[derive(Clone, Debug)]
pub struct MeshData {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,

    // Attribute buffers grow lazily; a missing or `None` entry means "not provided".
    normals: Vec<Option<[Vec3; 3]>>,
    uvs: Vec<Option<[Vec2; 3]>>,
    colors: Vec<Option<Color>>,

    sub_meshes: Vec<SubMesh>,
    triangle_sub_mesh: Vec<usize>,
}

impl Default for MeshData {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshData {
    /// Create an empty mesh with only the default sub-mesh.
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            triangles: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            colors: Vec::new(),
            sub_meshes: vec![SubMesh::default()],
            triangle_sub_mesh: Vec::new(),
        }
    }

    /// Create a mesh from positions and triangle indices.
    pub fn from_triangles(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        let mut mesh = Self::new();
        mesh.positions = positions;
        for [a, b, c] in triangles {
            mesh.add_triangle_face(a, b, c)?;
        }
        Ok(mesh)
    }

    pub fn add_vertex(&mut self, position: Vec3) -> u32 {
        self.positions.push(position);
        (self.positions.len() - 1) as u32
    }

    /// Add a triangle over existing vertices and return its index.
    pub fn add_triangle_face(&mut self, a: u32, b: u32, c: u32) -> Result<usize, MeshError> {
        let triangle = self.triangles.len();
        for index in [a, b, c] {
            if index as usize >= self.positions.len() {
                return Err(MeshError::VertexOutOfRange {
                    triangle,
                    index,
                    vertex_count: self.positions.len(),
                });
            }
        }
        self.triangles.push([a, b, c]);
        Ok(triangle)
    }

    /// Add a triangle with three fresh vertices and return its index.
    pub fn add_triangle(&mut self, v0: Vec3, v1: Vec3, v2: Vec3) -> usize {
        let a = self.add_vertex(v0);
        let b = self.add_vertex(v1);
        let c = self.add_vertex(v2);
        self.triangles.push([a, b, c]);
        self.triangles.len() - 1
    }

    pub fn set_triangle_normals(&mut self, triangle: usize, normals: [Vec3; 3]) -> Result<(), MeshError> {
        self.check_triangle(triangle)?;
        grow(&mut self.normals, triangle + 1, None);
        self.normals[triangle] = Some(normals);
        Ok(())
    }

    pub fn set_triangle_uvs(&mut self, triangle: usize, uvs: [Vec2; 3]) -> Result<(), MeshError> {
        self.check_triangle(triangle)?;
        grow(&mut self.uvs, triangle + 1, None);
        self.uvs[triangle] = Some(uvs);
        Ok(())
    }

    pub fn set_vertex_color(&mut self, vertex: usize, color: Color) -> Result<(), MeshError> {
        if vertex >= self.positions.len() {
            return Err(MeshError::VertexIndexOutOfRange {
                vertex,
                vertex_count: self.positions.len(),
            });
        }
        grow(&mut self.colors, vertex + 1, None);
        self.colors[vertex] = Some(color);
        Ok(())
    }

    /// Register a sub-mesh and return its index.
    pub fn add_sub_mesh(&mut self, sub_mesh: SubMesh) -> usize {
        self.sub_meshes.push(sub_mesh);
        self.sub_meshes.len() - 1
    }

    pub fn sub_mesh_mut(&mut self, index: usize) -> Option<&mut SubMesh> {
        self.sub_meshes.get_mut(index)
    }

    pub fn default_sub_mesh_mut(&mut self) -> &mut SubMesh {
        &mut self.sub_meshes[DEFAULT_SUB_MESH]
    }

    pub fn link_triangle(&mut self, triangle: usize, sub_mesh: usize) -> Result<(), MeshError> {
        self.check_triangle(triangle)?;
        if sub_mesh >= self.sub_meshes.len() {
            return Err(MeshError::SubMeshOutOfRange {
                sub_mesh,
                count: self.sub_meshes.len(),
            });
        }
        grow(&mut self.triangle_sub_mesh, triangle + 1, DEFAULT_SUB_MESH);
        self.triangle_sub_mesh[triangle] = sub_mesh;
        Ok(())
    }

    /// Move a triangle back to the default sub-mesh.
    pub fn unlink_triangle(&mut self, triangle: usize) -> Result<(), MeshError> {
        self.link_triangle(triangle, DEFAULT_SUB_MESH)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn sub_mesh_count(&self) -> usize {
        self.sub_meshes.len()
    }

    pub fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn triangle(&self, triangle: usize) -> [u32; 3] {
        self.triangles[triangle]
    }

    /// Positions of the three corners of a triangle.
    pub fn triangle_vertices(&self, triangle: usize) -> [Vec3; 3] {
        self.triangles[triangle].map(|i| self.positions[i as usize])
    }

    /// Per-vertex normals of a triangle, if they were provided.
    pub fn triangle_normals(&self, triangle: usize) -> Option<[Vec3; 3]> {
        self.normals.get(triangle).copied().flatten()
    }

    /// Texture coordinates of a triangle's corners, if they were provided.
    pub fn triangle_uvs(&self, triangle: usize) -> Option<[Vec2; 3]> {
        self.uvs.get(triangle).copied().flatten()
    }

    /// Colors of a triangle's corners, if all three vertices have one.
    pub fn triangle_colors(&self, triangle: usize) -> Option<[Color; 3]> {
        let [a, b, c] = self.triangles[triangle];
        let color = |i: u32| self.colors.get(i as usize).copied().flatten();
        Some([color(a)?, color(b)?, color(c)?])
    }

    /// The sub-mesh a triangle belongs to.
    pub fn sub_mesh_of(&self, triangle: usize) -> &SubMesh {
        let index = self
            .triangle_sub_mesh
            .get(triangle)
            .copied()
            .unwrap_or(DEFAULT_SUB_MESH);
        &self.sub_meshes[index]
    }

    /// Bounding box of one triangle.
    pub fn triangle_bounds(&self, triangle: usize) -> Aabb {
        Aabb::enclosing(self.triangle_vertices(triangle))
    }

    /// Bounding box of all vertices.
    pub fn bounds(&self) -> Aabb {
        Aabb::enclosing(self.positions.iter().copied())
    }

    /// Fill in smooth normals for every triangle that has none.
    ///
    /// Each vertex normal is the normalized, area-weighted average of the face normals of
    /// all triangles sharing that vertex. Triangles with explicit normals keep them.
    pub fn compute_smooth_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];

        for &[a, b, c] in &self.triangles {
            let p0 = self.positions[a as usize];
            let p1 = self.positions[b as usize];
            let p2 = self.positions[c as usize];
            // Cross product length is twice the area, which gives the weighting.
            let face_normal = (p1 - p0).cross(p2 - p0);
            for i in [a, b, c] {
                accumulated[i as usize] += face_normal;
            }
        }

        let vertex_normals: Vec<Vec3> = accumulated
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect();

        grow(&mut self.normals, self.triangles.len(), None);
        let mut generated = 0usize;
        for (slot, triangle) in self.normals.iter_mut().zip(&self.triangles) {
            if slot.is_none() {
                *slot = Some(triangle.map(|i| vertex_normals[i as usize]));
                generated += 1;
            }
        }
        log::debug!("Generated smooth normals for {generated} triangles");
    }

    /// Check the mesh can be turned into an acceleration structure.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.triangles.is_empty() {
            return Err(MeshError::NoTriangles);
        }
        Ok(())
    }

    fn check_triangle(&self, triangle: usize) -> Result<(), MeshError> {
        if triangle >= self.triangles.len() {
            return Err(MeshError::TriangleOutOfRange {
                triangle,
                triangle_count: self.triangles.len(),
            });
        }
        Ok(())
    }
}

fn grow<T: Clone>(buffer: &mut Vec<T>, len: usize, fill: T) {
    if buffer.len() < len {
        buffer.resize(len, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        MeshData::from_triangles(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = quad();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_vertices(1)[2], Vec3::new(0.0, 1.0, 0.0));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        assert_eq!(MeshData::new().validate(), Err(MeshError::NoTriangles));
    }

    #[test]
    fn test_out_of_range_vertex() {
        let err = MeshData::from_triangles(vec![Vec3::ZERO, Vec3::X], vec![[0, 1, 2]]).unwrap_err();
        assert_eq!(
            err,
            MeshError::VertexOutOfRange {
                triangle: 0,
                index: 2,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn test_missing_attributes_are_none() {
        let mut mesh = quad();
        assert!(mesh.triangle_normals(0).is_none());
        assert!(mesh.triangle_uvs(1).is_none());
        assert!(mesh.triangle_colors(0).is_none());

        mesh.set_triangle_uvs(1, [Vec2::ZERO, Vec2::X, Vec2::ONE]).unwrap();
        assert!(mesh.triangle_uvs(0).is_none());
        assert_eq!(mesh.triangle_uvs(1).unwrap()[2], Vec2::ONE);

        for v in 0..3 {
            mesh.set_vertex_color(v, Color::new(1.0, 0.0, 0.0)).unwrap();
        }
        assert!(mesh.triangle_colors(0).is_some());
        // Vertex 3 has no color, so the second triangle has none either.
        assert!(mesh.triangle_colors(1).is_none());
    }

    #[test]
    fn test_attribute_setters_check_ranges() {
        let mut mesh = quad();
        assert!(matches!(
            mesh.set_triangle_normals(5, [Vec3::Z; 3]),
            Err(MeshError::TriangleOutOfRange { triangle: 5, .. })
        ));
        assert!(mesh.set_vertex_color(4, Color::ONE).is_err());
        assert!(matches!(
            mesh.link_triangle(0, 3),
            Err(MeshError::SubMeshOutOfRange { sub_mesh: 3, count: 1 })
        ));
    }

    #[test]
    fn test_sub_mesh_linking() {
        let mut mesh = quad();
        let shiny = mesh.add_sub_mesh(SubMesh::new("shiny").with_smooth(false));

        mesh.link_triangle(1, shiny).unwrap();
        assert_eq!(mesh.sub_mesh_of(0).name, "default");
        assert_eq!(mesh.sub_mesh_of(1).name, "shiny");
        assert!(!mesh.sub_mesh_of(1).smooth);

        mesh.unlink_triangle(1).unwrap();
        assert_eq!(mesh.sub_mesh_of(1).name, "default");
    }

    #[test]
    fn test_compute_smooth_normals() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut mesh = quad();
        mesh.set_triangle_normals(0, [Vec3::X; 3]).unwrap();
        mesh.compute_smooth_normals();

        // Explicit normals are kept
        assert_eq!(mesh.triangle_normals(0).unwrap(), [Vec3::X; 3]);
        // Flat quad in the XY plane with CCW winding faces +Z
        for n in mesh.triangle_normals(1).unwrap() {
            assert!((n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_bounds() {
        let mesh = quad();
        let bounds = mesh.bounds();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.triangle_bounds(0).max, Vec3::new(1.0, 1.0, 0.0));
    }
}
