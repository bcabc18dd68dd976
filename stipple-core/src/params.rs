//! Parameters for point sampling.

use crate::boundary::DEFAULT_HOLLOW_FRACTION;

/// How candidate points are placed on each face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateLayout {
    /// Cell centers of a triangular barycentric grid.
    #[default]
    BarycentricGrid,
    /// Uniformly random points on the face.
    Random,
}

/// Parameters for [`sample`](crate::sample) and [`run_with`](crate::run_with).
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerParams {
    /// Hollow radius as a fraction of the largest bounding-box extent.
    /// Default: 0.2
    pub hollow_fraction: f64,

    /// Candidates generated per requested point, spread by face area.
    /// Default: 3.0
    pub oversample_factor: f64,

    /// Candidate generation stops at this multiple of the target count.
    /// Default: 5.0
    pub candidate_limit_factor: f64,

    /// Scale on `sqrt(total_area / target)` giving the average spacing.
    /// Default: 0.8
    pub spacing_scale: f64,

    /// Minimum distance between accepted points as a fraction of the
    /// average spacing. Also the spatial hash cell size. Default: 0.7
    pub min_distance_scale: f64,

    pub layout: CandidateLayout,

    /// Reject candidates inside the hollow sphere. Default: true
    pub hollow_filter: bool,

    /// Reject candidates closer than the minimum distance to an accepted
    /// point. Default: true
    pub spacing_filter: bool,

    /// Color points by height. When false every point is white. Default: true
    pub colorize: bool,

    /// Seed for the shuffle and random layout. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            hollow_fraction: DEFAULT_HOLLOW_FRACTION,
            oversample_factor: 3.0,
            candidate_limit_factor: 5.0,
            spacing_scale: 0.8,
            min_distance_scale: 0.7,
            layout: CandidateLayout::BarycentricGrid,
            hollow_filter: true,
            spacing_filter: true,
            colorize: true,
            seed: None,
        }
    }
}

impl SamplerParams {
    /// Plain uniform surface sampling: random placement, no hollow, no
    /// spacing filter, no colors.
    #[must_use]
    pub fn uniform() -> Self {
        Self {
            layout: CandidateLayout::Random,
            hollow_filter: false,
            spacing_filter: false,
            colorize: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_hollow_fraction(mut self, fraction: f64) -> Self {
        self.hollow_fraction = fraction.max(0.0);
        self
    }

    #[must_use]
    pub fn with_oversample_factor(mut self, factor: f64) -> Self {
        self.oversample_factor = factor.max(0.0);
        self
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: CandidateLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn with_hollow_filter(mut self, enabled: bool) -> Self {
        self.hollow_filter = enabled;
        self
    }

    #[must_use]
    pub const fn with_spacing_filter(mut self, enabled: bool) -> Self {
        self.spacing_filter = enabled;
        self
    }

    #[must_use]
    pub const fn with_colorize(mut self, enabled: bool) -> Self {
        self.colorize = enabled;
        self
    }
}
