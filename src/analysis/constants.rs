//! Decimal magnitude constants used when labelling chart axes
//!
//! Flow features mix byte counts, microsecond durations and per-second rates, so axis
//! labels are shortened with plain base-1000 suffixes rather than byte units.

/// Thousand (k)
pub const KILO: f64 = 1000.0;

/// Million (M)
pub const MEGA: f64 = KILO * 1000.0;

/// Billion (G)
pub const GIGA: f64 = MEGA * 1000.0;

/// Trillion (T)
pub const TERA: f64 = GIGA * 1000.0;
