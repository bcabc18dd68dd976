//! Stipple Core - STL to point cloud pipeline
//!
//! Decodes an STL surface, measures it, and samples a sparse colored point
//! cloud with an empty region around the bounding-box center. The result is
//! two aligned buffers, positions and colors, for a point renderer.

pub mod boundary;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod params;
pub mod pipeline;
pub mod sampler;
pub mod spatial_hash;
pub mod stl;

// Re-export commonly used types
pub use boundary::{analyze, analyze_with_hollow_fraction, BoundingBox, FaceRecord, ShapeBoundary};
pub use error::{FormatError, StlResult};
pub use geometry::{Mesh, Point, Triangle};
pub use params::{CandidateLayout, SamplerParams};
pub use pipeline::{run, run_with, run_with_stats};
pub use sampler::{sample, sample_with_stats, PointCloud, SamplingStats};
pub use spatial_hash::SpatialHashIndex;
