//! Stipple Web - WASM bridge to the point cloud pipeline
//!
//! JavaScript hands over the raw STL bytes it fetched and receives flat
//! `Float32Array` position and color buffers ready for a point renderer.

use stipple_core::{run_with, CandidateLayout, SamplerParams};
use wasm_bindgen::prelude::*;

/// Flat buffers for one generated cloud
#[wasm_bindgen]
pub struct PointCloudBuffers {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

#[wasm_bindgen]
impl PointCloudBuffers {
    /// Interleaved `x, y, z`
    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f32> {
        self.positions.clone()
    }

    /// Interleaved `r, g, b`
    #[wasm_bindgen(getter)]
    pub fn colors(&self) -> Vec<f32> {
        self.colors.clone()
    }

    /// Number of points
    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Configurable point cloud generator
#[wasm_bindgen]
pub struct PointCloudGenerator {
    params: SamplerParams,
}

#[wasm_bindgen]
impl PointCloudGenerator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PointCloudGenerator {
        PointCloudGenerator {
            params: SamplerParams::default(),
        }
    }

    /// Fix the seed so the same bytes always give the same cloud
    pub fn set_seed(&mut self, seed: u32) {
        self.params.seed = Some(u64::from(seed));
    }

    pub fn clear_seed(&mut self) {
        self.params.seed = None;
    }

    /// Switch between the hollow colored cloud and plain uniform sampling
    pub fn set_uniform(&mut self, uniform: bool) {
        let seed = self.params.seed;
        let hollow_fraction = self.params.hollow_fraction;
        let mut params = if uniform {
            SamplerParams::uniform()
        } else {
            SamplerParams::default()
        };
        params.seed = seed;
        self.params = params.with_hollow_fraction(hollow_fraction);
    }

    pub fn set_random_layout(&mut self, random: bool) {
        self.params.layout = if random {
            CandidateLayout::Random
        } else {
            CandidateLayout::BarycentricGrid
        };
    }

    pub fn set_hollow_fraction(&mut self, fraction: f64) {
        self.params.hollow_fraction = fraction.max(0.0);
    }

    /// Run the pipeline on an STL buffer
    pub fn generate(&self, bytes: &[u8], target_count: usize) -> Result<PointCloudBuffers, JsValue> {
        let cloud = run_with(bytes, target_count, &self.params)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse STL: {}", e)))?;

        Ok(PointCloudBuffers {
            positions: cloud.flat_positions(),
            colors: cloud.flat_colors(),
        })
    }
}

impl Default for PointCloudGenerator {
    fn default() -> Self {
        Self::new()
    }
}
