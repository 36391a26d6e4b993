// Centralized ingestion limits to harden against untrusted persisted input

// Document size caps
pub const MAX_LAYERS: usize = 64;
pub const MAX_DOTS_PER_LAYER: usize = 1_000;

// Per-layer sampling density
pub const MIN_SAMPLE_COUNT: usize = 3;
pub const MAX_SAMPLE_COUNT: usize = 50;
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

// Numeric bounds
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 =  10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn clamp_sample_count(n: usize) -> usize { n.clamp(MIN_SAMPLE_COUNT, MAX_SAMPLE_COUNT) }
