//! Geometry primitives for decoded STL surfaces
use nalgebra::{Point3, Vector3};

/// A 3D coordinate. Used for mesh vertices and sampled points alike.
pub type Point = Point3<f64>;

/// A triangle face defined by three vertices, in file order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point; 3],
}

impl Triangle {
    pub fn new(v0: Point, v1: Point, v2: Point) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Edge vectors from the first vertex
    pub fn edges(&self) -> (Vector3<f64>, Vector3<f64>) {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0, v2 - v0)
    }

    /// Surface area. Zero for collinear or repeated vertices.
    pub fn area(&self) -> f64 {
        let (edge1, edge2) = self.edges();
        edge1.cross(&edge2).norm() * 0.5
    }

    /// Point at barycentric weights `(1 - u - v, u, v)`.
    ///
    /// Inside the triangle when `u, v >= 0` and `u + v <= 1`.
    pub fn point_at(&self, u: f64, v: f64) -> Point {
        let (edge1, edge2) = self.edges();
        self.vertices[0] + edge1 * u + edge2 * v
    }
}

/// An unindexed triangle list, as stored in an STL file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// All vertices of all triangles, in file order
    pub fn vertices(&self) -> impl Iterator<Item = &Point> + '_ {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Axis-aligned cube spanning `[0, size]` on every axis, 12 triangles
    pub fn cube(size: f64) -> Self {
        let p = |x: f64, y: f64, z: f64| Point::new(x * size, y * size, z * size);
        let c = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 1.0),
        ];

        // Two triangles per side, counter-clockwise seen from outside
        const QUADS: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // front (+z)
            [1, 0, 3, 2], // back (-z)
            [3, 7, 6, 2], // top (+y)
            [0, 1, 5, 4], // bottom (-y)
            [1, 2, 6, 5], // right (+x)
            [0, 4, 7, 3], // left (-x)
        ];

        let mut mesh = Self::with_capacity(12);
        for [a, b, c2, d] in QUADS {
            mesh.add_triangle(Triangle::new(c[a], c[b], c[c2]));
            mesh.add_triangle(Triangle::new(c[a], c[c2], c[d]));
        }
        mesh
    }
}
