//! Decode, analyze and sample in one call.

use tracing::info;

use crate::boundary::analyze_with_hollow_fraction;
use crate::error::StlResult;
use crate::params::SamplerParams;
use crate::sampler::{sample_with_stats, PointCloud, SamplingStats};
use crate::stl::parse_stl;

/// Turn an STL buffer into a point cloud with default parameters.
///
/// Fails only on malformed STL. A surface with no area yields an empty cloud.
pub fn run(bytes: &[u8], target_count: usize) -> StlResult<PointCloud> {
    run_with(bytes, target_count, &SamplerParams::default())
}

pub fn run_with(bytes: &[u8], target_count: usize, params: &SamplerParams) -> StlResult<PointCloud> {
    run_with_stats(bytes, target_count, params).map(|(cloud, _)| cloud)
}

/// Like [`run_with`], also returning sampling counters.
pub fn run_with_stats(
    bytes: &[u8],
    target_count: usize,
    params: &SamplerParams,
) -> StlResult<(PointCloud, SamplingStats)> {
    let mesh = parse_stl(bytes)?;
    let boundary = analyze_with_hollow_fraction(&mesh, params.hollow_fraction);
    let (cloud, stats) = sample_with_stats(&boundary, target_count, params);

    info!(
        triangles = mesh.len(),
        points = cloud.len(),
        target = target_count,
        "Point cloud pipeline finished"
    );
    Ok((cloud, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use crate::geometry::Mesh;
    use crate::stl::write_binary_stl;

    #[test]
    fn test_run_cube() {
        let bytes = write_binary_stl(&Mesh::cube(1.0));
        let cloud = run_with(&bytes, 250, &SamplerParams::default().with_seed(4)).unwrap();
        assert!(!cloud.is_empty());
        assert!(cloud.len() <= 250);
        assert_eq!(cloud.positions.len(), cloud.colors.len());
    }

    #[test]
    fn test_run_propagates_format_error() {
        let mut bytes = write_binary_stl(&Mesh::cube(1.0));
        bytes.truncate(200);
        assert!(matches!(
            run(&bytes, 100),
            Err(FormatError::Truncated { declared: 12, .. })
        ));
    }

    #[test]
    fn test_run_empty_solid() {
        let cloud = run(b"solid empty\nendsolid empty\n", 100).unwrap();
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_hollow_fraction_reaches_analyzer() {
        let bytes = write_binary_stl(&Mesh::cube(1.0));
        // Sphere of radius 1.0 around the center swallows the whole cube
        let params = SamplerParams::default().with_seed(2).with_hollow_fraction(1.0);
        let (cloud, stats) = run_with_stats(&bytes, 100, &params).unwrap();
        assert!(cloud.is_empty());
        assert_eq!(stats.rejected_hollow, stats.candidates);
    }
}
