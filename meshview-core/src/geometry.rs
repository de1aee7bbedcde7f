/// Geometry primitives: vertices, faces and the validated mesh
use nalgebra::Point3;
use tracing::warn;

use crate::bounds::{compute_view_bounds, ViewBounds};
use crate::error::{MeshError, MeshResult};
use crate::triangulate::{triangulate, Triangle};

/// A vertex position. Vertices have no identity beyond their index in a [`Mesh`].
pub type Vertex = Point3<f64>;

/// An ordered polygon of 0-based vertex indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Face(pub Vec<usize>);

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fan triangulation of this face; empty for fewer than 3 indices.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        triangulate(&self.0)
    }

    /// Closed outline of the face: each consecutive pair plus the last-to-first edge.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.0.len();
        let closed = if n >= 3 { n } else { 0 };
        (0..closed).map(move |i| (self.0[i], self.0[(i + 1) % n]))
    }
}

impl From<Vec<usize>> for Face {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// Raw parser output, not yet validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl MeshData {
    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }
}

/// A polygonal mesh whose faces only reference existing vertices.
///
/// The only way to build one is [`Mesh::new`], so every `Mesh` in circulation
/// has at least one vertex and no dangling indices. Meshes are never mutated
/// after construction; loading a file always yields a fresh value.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Validate raw vertex and face lists.
    ///
    /// Faces with fewer than three indices are dropped. A mesh without
    /// vertices is rejected with [`MeshError::EmptyModel`], and any index
    /// past the vertex list with [`MeshError::IndexOutOfRange`].
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> MeshResult<Self> {
        if vertices.is_empty() {
            return Err(MeshError::EmptyModel);
        }

        let vertex_count = vertices.len();
        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&index) = face.indices().iter().find(|&&i| i >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_idx,
                    index: index as i64,
                    vertex_count,
                });
            }
        }

        let total = faces.len();
        let faces: Vec<Face> = faces.into_iter().filter(|f| f.len() >= 3).collect();
        if faces.len() != total {
            warn!(
                skipped = total - faces.len(),
                "dropped faces with fewer than 3 vertices"
            );
        }

        Ok(Self { vertices, faces })
    }

    pub fn from_data(data: MeshData) -> MeshResult<Self> {
        Self::new(data.vertices, data.faces)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Every face fan-triangulated, in face order.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().flat_map(|face| face.triangles())
    }

    /// Every face outline edge, in face order. Shared edges appear once per face.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.faces.iter().flat_map(|face| face.edges())
    }

    /// Positions of a triangle's corners.
    pub fn triangle_positions(&self, triangle: Triangle) -> [Vertex; 3] {
        triangle.map(|i| self.vertices[i])
    }

    pub fn bounds(&self) -> ViewBounds {
        // never empty, see `Mesh::new`
        compute_view_bounds(&self.vertices).unwrap_or_default()
    }

    pub fn into_parts(self) -> (Vec<Vertex>, Vec<Face>) {
        (self.vertices, self.faces)
    }

    /// Unit cube made of six quads, handy for demos and tests.
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let faces = [
            [0, 3, 2, 1], // bottom
            [4, 5, 6, 7], // top
            [0, 1, 5, 4], // front
            [2, 3, 7, 6], // back
            [1, 2, 6, 5], // right
            [3, 0, 4, 7], // left
        ]
        .into_iter()
        .map(|f| Face::new(f.to_vec()))
        .collect();

        Self { vertices, faces }
    }
}
