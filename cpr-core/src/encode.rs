//! CPR encoding: the 17-bit fields a transponder broadcasts for a position.
//!
//! The inverse of the decoders in [`crate::cpr`]. Encoding quantizes the
//! position to the CPR grid of the chosen parity, so a decode returns the
//! grid point nearest the input rather than the input itself.

use crate::cpr::{modulo, CPR_MAX, NB};
use crate::types::{EncodedPosition, Parity, Position};
use crate::zone::ZONE_TABLE;

/// Encode a position as raw CPR fields for one frame parity.
///
/// `surface` selects the 90° surface grid instead of the 360° airborne grid.
pub fn encode(position: Position, parity: Parity, surface: bool) -> EncodedPosition {
    let odd = parity.is_odd();
    let span = if surface { 90.0 } else { 360.0 };
    let dlat = span / parity.lat_zones();

    let yz = (CPR_MAX * modulo(position.lat, dlat) / dlat + 0.5).floor();
    // Latitude the receiver will reconstruct; the longitude grid depends on it.
    let rlat = dlat * (yz / CPR_MAX + (position.lat / dlat).floor());

    let dlon = ZONE_TABLE.dlon(rlat, odd, surface);
    let xz = (CPR_MAX * modulo(position.lon, dlon) / dlon + 0.5).floor();

    EncodedPosition {
        lat: to_field(yz),
        lon: to_field(xz),
    }
}

/// A fraction that rounds up to a whole cell wraps to zero.
fn to_field(value: f64) -> u32 {
    (value as u32) % (1 << NB)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
