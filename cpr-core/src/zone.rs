//! Latitude zone table: the NL function for CPR.
//!
//! NL(lat) is the number of longitude zones at a latitude: 59 at the equator,
//! narrowing to 1 above 87°. The boundaries are derived in closed form from the
//! 60-zone latitude grid rather than copied from the ICAO table:
//!
//! ```text
//! boundary(i) = acos( sqrt( (1 - cos(π/30)) / (1 - cos(2π/i)) ) )   for i = 2..59
//! boundary(1) = 90
//! ```

use std::f64::consts::PI;
use std::sync::LazyLock;

use tracing::trace;

/// Number of zone boundaries (one per possible NL value).
pub const ZONE_COUNT: usize = 59;

/// Latitude at and above which a single longitude zone is used.
const POLAR_LAT: f64 = 87.0;

/// Process-wide zone table, built on first use.
pub static ZONE_TABLE: LazyLock<ZoneTable> = LazyLock::new(ZoneTable::new);

/// Latitude boundaries of the NL zones, decreasing from 90° toward the equator.
///
/// `boundaries[k]` is the highest latitude that still has `k + 1` longitude
/// zones. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTable {
    boundaries: [f64; ZONE_COUNT],
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneTable {
    pub fn new() -> Self {
        let tmp = 1.0 - (PI / 30.0).cos();
        let mut boundaries = [0.0; ZONE_COUNT];
        boundaries[0] = 90.0;
        for i in 2..=ZONE_COUNT {
            let ratio = tmp / (1.0 - (2.0 * PI / i as f64).cos());
            boundaries[i - 1] = ratio.sqrt().acos().to_degrees();
        }
        trace!(finest = boundaries[ZONE_COUNT - 1], "built CPR zone table");
        ZoneTable { boundaries }
    }

    /// Boundary latitude for a 1-based zone count. `None` outside 1..=59.
    pub fn boundary(&self, zone: usize) -> Option<f64> {
        if zone == 0 {
            return None;
        }
        self.boundaries.get(zone - 1).copied()
    }

    pub fn boundaries(&self) -> &[f64; ZONE_COUNT] {
        &self.boundaries
    }

    /// Number of longitude zones at `lat` (the NL function). Symmetric in
    /// latitude; 59 at the equator, 1 above 87°.
    pub fn nl(&self, lat: f64) -> u32 {
        let lat = lat.abs();

        if lat == 0.0 {
            return 59;
        } else if lat == POLAR_LAT {
            // The closed form lands on 87° within rounding; pin it.
            return 2;
        } else if lat > POLAR_LAT {
            return 1;
        }

        let mut i = ZONE_COUNT - 1;
        // boundaries[0] is 90°, so the scan stops before underflowing.
        while i > 0 && lat > self.boundaries[i] {
            i -= 1;
        }
        (i + 1) as u32
    }

    /// Longitude zone count for a frame parity: NL, minus one for odd frames,
    /// never below 1.
    pub fn n(&self, lat: f64, odd: bool) -> u32 {
        let nl = self.nl(lat);
        let n = if odd { nl.saturating_sub(1) } else { nl };
        n.max(1)
    }

    /// Longitude cell width in degrees for the zone containing `lat`.
    pub fn dlon(&self, lat: f64, odd: bool, surface: bool) -> f64 {
        let span = if surface { 90.0 } else { 360.0 };
        span / self.n(lat, odd) as f64
    }
}

/// NL function against the shared table.
pub fn nl(lat: f64) -> u32 {
    ZONE_TABLE.nl(lat)
}

/// N function against the shared table.
pub fn n(lat: f64, odd: bool) -> u32 {
    ZONE_TABLE.n(lat, odd)
}

/// Longitude cell width against the shared table.
pub fn dlon(lat: f64, odd: bool, surface: bool) -> f64 {
    ZONE_TABLE.dlon(lat, odd, surface)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
