//! Area-weighted point sampling with hollow and minimum-distance filtering.
//!
//! Sampling runs in two phases:
//!
//! 1. Every face gets a candidate budget proportional to its share of the
//!    total area, oversampled to leave room for rejection. Candidates are
//!    laid out per face, capped at a multiple of the target, then shuffled.
//! 2. Candidates are accepted in shuffled order unless they fall inside the
//!    hollow sphere or too close to an already accepted point.

use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::boundary::{FaceRecord, ShapeBoundary};
use crate::geometry::Point;
use crate::palette::{height_color, UNIFORM_COLOR};
use crate::params::{CandidateLayout, SamplerParams};
use crate::spatial_hash::SpatialHashIndex;

/// Accepted points with aligned colors, in acceptance order.
///
/// Acceptance order is randomized and carries no geometric meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, position: &Point, color: [f32; 3]) {
        self.positions
            .push([position.x as f32, position.y as f32, position.z as f32]);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleaved `x, y, z` buffer
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flatten().copied().collect()
    }

    /// Interleaved `r, g, b` buffer
    pub fn flat_colors(&self) -> Vec<f32> {
        self.colors.iter().flatten().copied().collect()
    }
}

/// Counters from one sampling run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplingStats {
    pub target: usize,
    pub avg_spacing: f64,
    /// Minimum distance enforced between accepted points.
    pub min_distance: f64,
    /// Seed actually used, for reproducing unseeded runs.
    pub seed: u64,
    pub candidates: usize,
    pub rejected_hollow: usize,
    pub rejected_spacing: usize,
    pub accepted: usize,
    /// Faces contributing at least one accepted point.
    pub faces_represented: usize,
}

impl fmt::Display for SamplingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accepted {}/{} points from {} candidates (hollow rejected {}, spacing rejected {}, min distance {:.4}, seed {})",
            self.accepted,
            self.target,
            self.candidates,
            self.rejected_hollow,
            self.rejected_spacing,
            self.min_distance,
            self.seed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    position: Point,
    face: usize,
}

/// How many candidates to draw from one face.
#[derive(Debug, Clone, Copy)]
struct FacePlan {
    face: usize,
    budget: usize,
    take: usize,
}

/// Sample up to `target_count` points from `boundary`.
pub fn sample(boundary: &ShapeBoundary, target_count: usize, params: &SamplerParams) -> PointCloud {
    sample_with_stats(boundary, target_count, params).0
}

/// Sample and report what happened to the candidates.
///
/// Returns an empty cloud when `target_count` is zero or the boundary has no
/// area.
pub fn sample_with_stats(
    boundary: &ShapeBoundary,
    target_count: usize,
    params: &SamplerParams,
) -> (PointCloud, SamplingStats) {
    let seed = params.seed.unwrap_or_else(rand::random);
    let mut stats = SamplingStats {
        target: target_count,
        seed,
        ..Default::default()
    };

    if target_count == 0 || boundary.is_degenerate() {
        debug!(
            target = target_count,
            total_area = boundary.total_area,
            "Nothing to sample"
        );
        return (PointCloud::new(), stats);
    }

    stats.avg_spacing = (boundary.total_area / target_count as f64).sqrt() * params.spacing_scale;
    stats.min_distance = stats.avg_spacing * params.min_distance_scale;

    let mut index = if params.spacing_filter {
        let index = SpatialHashIndex::try_new(stats.min_distance);
        if index.is_none() {
            warn!(
                min_distance = stats.min_distance,
                "Minimum distance is not positive, spacing filter disabled"
            );
        }
        index
    } else {
        None
    };

    let mut candidates = generate_candidates(boundary, target_count, params, seed);
    stats.candidates = candidates.len();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    candidates.shuffle(&mut rng);

    let mut cloud = PointCloud::with_capacity(target_count.min(candidates.len()));
    let mut represented = vec![false; boundary.faces.len()];

    for candidate in &candidates {
        if cloud.len() >= target_count {
            break;
        }

        if params.hollow_filter
            && (candidate.position - boundary.center).norm() <= boundary.hollow_radius
        {
            stats.rejected_hollow += 1;
            continue;
        }

        if let Some(index) = index.as_mut() {
            if index.has_neighbor_within(&candidate.position, stats.min_distance) {
                stats.rejected_spacing += 1;
                continue;
            }
            index.insert(candidate.position);
        }

        let color = if params.colorize {
            height_color(&candidate.position, &boundary.bounding_box)
        } else {
            UNIFORM_COLOR
        };
        cloud.push(&candidate.position, color);
        represented[candidate.face] = true;
    }

    stats.accepted = cloud.len();
    stats.faces_represented = represented.iter().filter(|&&hit| hit).count();
    info!(
        accepted = stats.accepted,
        target = target_count,
        candidates = stats.candidates,
        rejected_hollow = stats.rejected_hollow,
        rejected_spacing = stats.rejected_spacing,
        "Sampled point cloud"
    );

    (cloud, stats)
}

/// Per-face budget: the face's area share of the oversampled target, at
/// least one.
fn face_budget(area: f64, total_area: f64, target_count: usize, oversample: f64) -> usize {
    let share = (area / total_area) * target_count as f64 * oversample;
    if share.is_finite() {
        (share.floor() as usize).max(1)
    } else {
        1
    }
}

/// Grid resolution per edge for a face budget
fn grid_resolution(budget: usize) -> usize {
    ((budget as f64).sqrt().ceil() as usize).max(1)
}

/// Upward sub-triangles in a resolution-`r` subdivision
fn grid_cell_count(resolution: usize) -> usize {
    resolution * (resolution + 1) / 2
}

/// Centroids `((i + 1/3) / r, (j + 1/3) / r)` of the upward sub-triangles
/// of a resolution-`r` subdivision, row by row.
///
/// Every point is strictly inside the face, so faces sharing an edge never
/// produce the same candidate. Resolution 1 gives the face centroid.
fn barycentric_grid(resolution: usize) -> impl Iterator<Item = (f64, f64)> {
    const THIRD: f64 = 1.0 / 3.0;
    let r = resolution as f64;
    (0..resolution).flat_map(move |i| {
        (0..resolution - i).map(move |j| ((i as f64 + THIRD) / r, (j as f64 + THIRD) / r))
    })
}

/// Uniform random barycentric weights via the square-root warp
fn random_barycentric<R: Rng>(rng: &mut R) -> (f64, f64) {
    let r1 = rng.gen::<f64>().sqrt();
    let r2 = rng.gen::<f64>();
    (r1 * (1.0 - r2), r1 * r2)
}

/// Decide how many candidates each face contributes, stopping once the
/// candidate limit is reached.
fn plan_faces(boundary: &ShapeBoundary, target_count: usize, params: &SamplerParams) -> Vec<FacePlan> {
    let limit = (params.candidate_limit_factor * target_count as f64).ceil();
    let limit = if limit.is_finite() && limit > 0.0 {
        limit as usize
    } else {
        0
    };

    let mut plans = Vec::new();
    let mut total = 0;
    for (face, record) in boundary.faces.iter().enumerate() {
        if total >= limit {
            break;
        }
        let budget = face_budget(
            record.area,
            boundary.total_area,
            target_count,
            params.oversample_factor,
        );
        let available = match params.layout {
            CandidateLayout::BarycentricGrid => grid_cell_count(grid_resolution(budget)),
            CandidateLayout::Random => budget,
        };
        let take = available.min(limit - total);
        plans.push(FacePlan { face, budget, take });
        total += take;
    }

    plans
}

fn face_candidates(record: &FaceRecord, plan: FacePlan, layout: CandidateLayout, seed: u64) -> Vec<Candidate> {
    let triangle = record.triangle();
    let face = plan.face;

    match layout {
        CandidateLayout::BarycentricGrid => barycentric_grid(grid_resolution(plan.budget))
            .take(plan.take)
            .map(|(u, v)| Candidate {
                position: triangle.point_at(u, v),
                face,
            })
            .collect(),
        CandidateLayout::Random => {
            // Stream 0 is the shuffle; each face draws from its own stream
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(face as u64 + 1);
            (0..plan.take)
                .map(|_| {
                    let (u, v) = random_barycentric(&mut rng);
                    Candidate {
                        position: triangle.point_at(u, v),
                        face,
                    }
                })
                .collect()
        }
    }
}

/// Phase 1. Output is in face order and independent of thread count.
fn generate_candidates(
    boundary: &ShapeBoundary,
    target_count: usize,
    params: &SamplerParams,
    seed: u64,
) -> Vec<Candidate> {
    let plans = plan_faces(boundary, target_count, params);
    let total: usize = plans.iter().map(|p| p.take).sum();

    #[cfg(feature = "parallel")]
    let per_face: Vec<Vec<Candidate>> = plans
        .par_iter()
        .map(|&plan| face_candidates(&boundary.faces[plan.face], plan, params.layout, seed))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let per_face: Vec<Vec<Candidate>> = plans
        .iter()
        .map(|&plan| face_candidates(&boundary.faces[plan.face], plan, params.layout, seed))
        .collect();

    let mut candidates = Vec::with_capacity(total);
    for chunk in per_face {
        candidates.extend(chunk);
    }

    debug!(
        faces = plans.len(),
        candidates = candidates.len(),
        "Generated candidates"
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::analyze;
    use crate::geometry::{Mesh, Triangle};

    fn square_plate(half: f64) -> Mesh {
        let mut mesh = Mesh::new();
        let a = Point::new(-half, -half, 0.0);
        let b = Point::new(half, -half, 0.0);
        let c = Point::new(half, half, 0.0);
        let d = Point::new(-half, half, 0.0);
        mesh.add_triangle(Triangle::new(a, b, c));
        mesh.add_triangle(Triangle::new(a, c, d));
        mesh
    }

    fn distance(p: &[f32; 3], q: &[f32; 3]) -> f64 {
        p.iter()
            .zip(q)
            .map(|(a, b)| f64::from(a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    #[test]
    fn test_grid_cell_count_matches_iterator() {
        for r in 1..20 {
            let cells: Vec<_> = barycentric_grid(r).collect();
            assert_eq!(cells.len(), grid_cell_count(r));
            assert!(cells
                .iter()
                .all(|&(u, v)| u > 0.0 && v > 0.0 && u + v < 1.0));
        }
    }

    #[test]
    fn test_grid_single_cell_is_centroid() {
        let cells: Vec<_> = barycentric_grid(1).collect();
        assert_eq!(cells.len(), 1);
        assert!((cells[0].0 - 1.0 / 3.0).abs() < 1e-12);
        assert!((cells[0].1 - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_keeps_equal_margin_from_every_edge() {
        for r in 1..12 {
            let margin = 1.0 / (3.0 * r as f64);
            for (u, v) in barycentric_grid(r) {
                let w = 1.0 - u - v;
                assert!(u >= margin - 1e-12 && v >= margin - 1e-12 && w >= margin - 1e-12);
            }
        }
    }

    #[test]
    fn test_dense_mesh_candidates_are_distinct() {
        // One candidate per face, and the shared edge is v1-v2 on both faces
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);
        let d = Point::new(1.0, 1.0, 0.0);
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(a, b, c));
        mesh.add_triangle(Triangle::new(d, c, b));

        let boundary = analyze(&mesh);
        let params = SamplerParams::default().with_oversample_factor(0.5);
        let plans = plan_faces(&boundary, 1, &params);
        assert!(plans.iter().all(|p| p.take == 1));
        let candidates: Vec<_> = plans
            .iter()
            .flat_map(|&plan| {
                face_candidates(&boundary.faces[plan.face], plan, CandidateLayout::BarycentricGrid, 0)
            })
            .collect();
        assert_eq!(candidates.len(), 2);
        assert!((candidates[0].position - candidates[1].position).norm() > 0.1);
    }

    #[test]
    fn test_generation_matches_face_by_face_order() {
        // Candidate limit lands inside a face, so the last plan is partial
        let mut mesh = Mesh::cube(1.0);
        mesh.add_triangle(Triangle::new(
            Point::new(2.0, 0.0, 0.0),
            Point::new(3.0, 0.0, 0.0),
            Point::new(2.0, 1.0, 0.0),
        ));
        let boundary = analyze(&mesh);

        for layout in [CandidateLayout::BarycentricGrid, CandidateLayout::Random] {
            let params = SamplerParams::default()
                .with_layout(layout)
                .with_oversample_factor(20.0);
            let plans = plan_faces(&boundary, 40, &params);
            assert!(plans.len() < boundary.faces.len());

            let sequential: Vec<Candidate> = plans
                .iter()
                .flat_map(|&plan| face_candidates(&boundary.faces[plan.face], plan, layout, 17))
                .collect();
            let generated = generate_candidates(&boundary, 40, &params, 17);
            assert_eq!(generated.len(), 200);
            assert_eq!(generated, sequential);
        }
    }

    #[test]
    fn test_face_budget_has_floor_of_one() {
        assert_eq!(face_budget(0.0, 10.0, 100, 3.0), 1);
        assert_eq!(face_budget(1e-9, 10.0, 100, 3.0), 1);
        assert_eq!(face_budget(5.0, 10.0, 100, 3.0), 150);
    }

    #[test]
    fn test_zero_target_is_empty() {
        let boundary = analyze(&Mesh::cube(1.0));
        let (cloud, stats) = sample_with_stats(&boundary, 0, &SamplerParams::default());
        assert!(cloud.is_empty());
        assert_eq!(stats.candidates, 0);
    }

    #[test]
    fn test_degenerate_triangle_is_empty() {
        let p = Point::new(1.0, 1.0, 1.0);
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(p, Point::new(2.0, 2.0, 2.0), Point::new(3.0, 3.0, 3.0)));
        let boundary = analyze(&mesh);
        assert_eq!(boundary.total_area, 0.0);

        let (cloud, stats) = sample_with_stats(&boundary, 100, &SamplerParams::default());
        assert!(cloud.is_empty());
        assert!(cloud.colors.is_empty());
        assert!(!stats.min_distance.is_nan());
    }

    #[test]
    fn test_hollow_region_is_empty() {
        let boundary = analyze(&square_plate(1.0));
        assert!((boundary.hollow_radius - 0.4).abs() < 1e-12);

        let params = SamplerParams::default().with_seed(11);
        let (cloud, stats) = sample_with_stats(&boundary, 400, &params);
        assert!(!cloud.is_empty());
        assert!(stats.rejected_hollow > 0);
        for p in &cloud.positions {
            assert!(distance(p, &[0.0, 0.0, 0.0]) > 0.4 - 1e-6);
        }
    }

    #[test]
    fn test_hollow_filter_can_be_disabled() {
        let boundary = analyze(&square_plate(1.0));
        let params = SamplerParams::default()
            .with_seed(11)
            .with_hollow_filter(false);
        let (cloud, stats) = sample_with_stats(&boundary, 400, &params);
        assert_eq!(stats.rejected_hollow, 0);
        assert!(cloud
            .positions
            .iter()
            .any(|p| distance(p, &[0.0, 0.0, 0.0]) < 0.4));
    }

    #[test]
    fn test_minimum_distance_is_respected() {
        let boundary = analyze(&Mesh::cube(2.0));
        let params = SamplerParams::default().with_seed(3);
        let (cloud, stats) = sample_with_stats(&boundary, 600, &params);
        assert!(cloud.len() > 100);
        assert!(cloud.len() <= 600);

        for (i, p) in cloud.positions.iter().enumerate() {
            for q in &cloud.positions[i + 1..] {
                assert!(distance(p, q) >= stats.min_distance - 1e-5);
            }
        }
    }

    #[test]
    fn test_candidates_are_capped() {
        let boundary = analyze(&Mesh::cube(1.0));
        let params = SamplerParams::default()
            .with_seed(1)
            .with_oversample_factor(50.0);
        let (_, stats) = sample_with_stats(&boundary, 100, &params);
        assert_eq!(stats.candidates, 500);
    }

    #[test]
    fn test_tiny_faces_still_contribute() {
        let mut mesh = Mesh::cube(1.0);
        mesh.add_triangle(Triangle::new(
            Point::new(5.0, 5.0, 5.0),
            Point::new(5.001, 5.0, 5.0),
            Point::new(5.0, 5.001, 5.0),
        ));
        let boundary = analyze(&mesh);
        let plans = plan_faces(&boundary, 10, &SamplerParams::default());
        assert_eq!(plans.len(), 13);
        assert_eq!(plans[12].take, 1);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let boundary = analyze(&Mesh::cube(1.0));
        for params in [SamplerParams::default(), SamplerParams::uniform()] {
            let params = params.with_seed(42);
            let first = sample(&boundary, 300, &params);
            let second = sample(&boundary, 300, &params);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_different_seeds_change_order() {
        let boundary = analyze(&Mesh::cube(1.0));
        let a = sample(&boundary, 200, &SamplerParams::default().with_seed(1));
        let b = sample(&boundary, 200, &SamplerParams::default().with_seed(2));
        assert_ne!(a.positions, b.positions);
    }

    #[test]
    fn test_uniform_sampling_fills_target() {
        let boundary = analyze(&Mesh::cube(1.0));
        let params = SamplerParams::uniform().with_seed(5);
        let (cloud, stats) = sample_with_stats(&boundary, 100, &params);
        // About 25 candidates per face, none rejected
        assert!(stats.candidates >= 12 * 24);
        assert_eq!(cloud.len(), 100);
        assert!(cloud.colors.iter().all(|&c| c == UNIFORM_COLOR));
        assert_eq!(stats.rejected_hollow + stats.rejected_spacing, 0);
    }

    #[test]
    fn test_random_layout_stays_on_face() {
        let boundary = analyze(&square_plate(1.0));
        let params = SamplerParams::uniform().with_seed(8);
        let cloud = sample(&boundary, 200, &params);
        assert!(cloud
            .positions
            .iter()
            .all(|p| p[2] == 0.0 && p[0].abs() <= 1.0 && p[1].abs() <= 1.0));
    }

    #[test]
    fn test_flat_buffers_are_interleaved() {
        let mut cloud = PointCloud::new();
        cloud.push(&Point::new(1.0, 2.0, 3.0), [0.1, 0.2, 0.3]);
        cloud.push(&Point::new(4.0, 5.0, 6.0), [0.4, 0.5, 0.6]);
        assert_eq!(cloud.flat_positions(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(cloud.flat_colors(), vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_stats_display() {
        let stats = SamplingStats {
            target: 10,
            accepted: 7,
            candidates: 30,
            ..Default::default()
        };
        assert!(stats.to_string().starts_with("accepted 7/10 points from 30 candidates"));
    }
}
