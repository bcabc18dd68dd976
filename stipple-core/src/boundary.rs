//! Per-face areas, bounding box, center and hollow radius of a mesh.

use nalgebra::Vector3;
use tracing::debug;

use crate::geometry::{Mesh, Point, Triangle};

/// Fraction of the largest bounding-box extent used as the hollow radius.
pub const DEFAULT_HOLLOW_FRACTION: f64 = 0.2;

/// A triangle with its precomputed area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRecord {
    pub vertices: [Point; 3],
    /// Always `>= 0`; zero for degenerate faces.
    pub area: f64,
}

impl FaceRecord {
    pub fn triangle(&self) -> Triangle {
        let [v0, v1, v2] = self.vertices;
        Triangle::new(v0, v1, v2)
    }
}

/// Axis-aligned bounding box.
///
/// The empty box has `min = +inf` and `max = -inf` on every axis, so folding
/// any point into it yields that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min: Point::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    /// Grow the box to contain `point`.
    pub fn include(&mut self, point: &Point) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// `max - min`; zero on flat axes. Meaningless for the empty box.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point {
        nalgebra::center(&self.min, &self.max)
    }

    /// Largest of the three extents, zero for the empty box.
    pub fn max_extent(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.size().max()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// Geometry summary consumed by the sampler.
#[derive(Debug, Clone)]
pub struct ShapeBoundary {
    pub faces: Vec<FaceRecord>,
    /// Sum of all face areas.
    pub total_area: f64,
    pub bounding_box: BoundingBox,
    /// Bounding-box midpoint, not the area centroid.
    pub center: Point,
    /// Points closer than this to `center` are excluded.
    pub hollow_radius: f64,
}

impl ShapeBoundary {
    /// True when there is no surface to sample.
    pub fn is_degenerate(&self) -> bool {
        !(self.total_area > 0.0 && self.total_area.is_finite())
    }
}

/// Analyze a mesh with the default hollow fraction.
pub fn analyze(mesh: &Mesh) -> ShapeBoundary {
    analyze_with_hollow_fraction(mesh, DEFAULT_HOLLOW_FRACTION)
}

/// Analyze a mesh; `hollow_radius = hollow_fraction * max_extent`.
///
/// An empty mesh gives zero area, the empty box, the origin as center and a
/// zero hollow radius.
pub fn analyze_with_hollow_fraction(mesh: &Mesh, hollow_fraction: f64) -> ShapeBoundary {
    let mut faces = Vec::with_capacity(mesh.len());
    let mut total_area = 0.0;
    let mut bounding_box = BoundingBox::empty();

    for triangle in &mesh.triangles {
        let area = triangle.area();
        total_area += area;
        for vertex in &triangle.vertices {
            bounding_box.include(vertex);
        }
        faces.push(FaceRecord {
            vertices: triangle.vertices,
            area,
        });
    }

    let (center, hollow_radius) = if bounding_box.is_empty() {
        (Point::origin(), 0.0)
    } else {
        (
            bounding_box.center(),
            bounding_box.max_extent() * hollow_fraction.max(0.0),
        )
    };

    debug!(
        faces = faces.len(),
        total_area,
        hollow_radius,
        "Analyzed shape boundary"
    );

    ShapeBoundary {
        faces,
        total_area,
        bounding_box,
        center,
        hollow_radius,
    }
}
