//! Owned scene state for the terminal viewer.
//!
//! Everything a frame needs lives in [`SceneContext`], created by [`setup`]
//! and passed explicitly to [`render`], [`resize`] and [`teardown`].
use nalgebra::Vector3;
use std::io::{self, Write};
use stipple_core::PointCloud;
use tracing::debug;

use crate::projection::Camera;
use crate::renderer::PointRenderer;
use crate::transform::{RotationState, Transform};

/// Side of the cube the cloud is scaled into
pub const CANONICAL_SIZE: f32 = 2.0;

/// Half-diagonal of the canonical cube
const SCENE_RADIUS: f32 = CANONICAL_SIZE * 0.866_025_4;

/// Scene state for one loaded point cloud
pub struct SceneContext {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    pub camera: Camera,
    pub rotation: RotationState,
    renderer: PointRenderer,
}

impl SceneContext {
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn renderer(&self) -> &PointRenderer {
        &self.renderer
    }
}

/// Center positions on their bounding-box midpoint and scale the largest
/// extent to [`CANONICAL_SIZE`]. Flat clouds are only centered.
pub fn normalize_positions(positions: &[[f32; 3]]) -> Vec<[f32; 3]> {
    if positions.is_empty() {
        return Vec::new();
    }

    let mut min = Vector3::repeat(f32::INFINITY);
    let mut max = Vector3::repeat(f32::NEG_INFINITY);
    for p in positions {
        let p = Vector3::from(*p);
        min = min.inf(&p);
        max = max.sup(&p);
    }

    let center = (min + max) * 0.5;
    let extent = (max - min).max();
    let scale = if extent > 0.0 {
        CANONICAL_SIZE / extent
    } else {
        1.0
    };

    let matrix = Transform::normalize_matrix(-center, scale);
    positions
        .iter()
        .map(|p| {
            let q = matrix.transform_point(&(*p).into());
            [q.x, q.y, q.z]
        })
        .collect()
}

/// Build a scene for a `width` x `height` character grid
pub fn setup(cloud: &PointCloud, width: u16, height: u16) -> SceneContext {
    let positions = normalize_positions(&cloud.positions);
    debug!(points = positions.len(), width, height, "Scene setup");

    SceneContext {
        positions,
        colors: cloud.colors.clone(),
        camera: Camera::new(u32::from(width), u32::from(height)),
        rotation: RotationState::new(0.3, 0.3, 0.0),
        renderer: PointRenderer::new(usize::from(width), usize::from(height)),
    }
}

/// Advance the idle spin
pub fn update(scene: &mut SceneContext) {
    scene.rotation.rotate(0.01, 0.015, 0.0);
}

/// Rasterize the current frame and queue it on `writer`
pub fn render<W: Write>(scene: &mut SceneContext, writer: &mut W) -> io::Result<()> {
    let model = Transform::rotation_matrix(&scene.rotation);
    let distance = scene.camera.distance();
    let depth_range = (distance - SCENE_RADIUS, distance + SCENE_RADIUS);

    scene.renderer.clear();
    scene.renderer.render_points(
        &scene.positions,
        &scene.colors,
        &model,
        &scene.camera,
        depth_range,
    );
    scene.renderer.draw(writer)
}

/// Match a new terminal size
pub fn resize(scene: &mut SceneContext, width: u16, height: u16) {
    scene.camera.set_viewport(u32::from(width), u32::from(height));
    scene.renderer = PointRenderer::new(usize::from(width), usize::from(height));
}

/// Release the scene and its buffers
pub fn teardown(scene: SceneContext) {
    debug!(points = scene.point_count(), "Scene teardown");
    drop(scene);
}
