//! Compact Position Reporting: CPR decode for ADS-B positions.
//!
//! Two decode modes:
//! - Global: requires an even+odd frame pair. No reference needed for
//!   airborne positions; surface positions need one to pick the quadrant.
//! - Local: single frame + reference position within half a cell.
//!
//! Key constants:
//! - Nb = 17 (bits per coordinate)
//! - Dlat_even = 360 / 60 = 6.0 degrees (90 / 60 on the surface)
//! - Dlat_odd = 360 / 59 ≈ 6.1017 degrees (90 / 59 on the surface)

use tracing::debug;

use crate::types::{CprError, Parity, Position, Result};
use crate::zone::ZONE_TABLE;

/// Bits per CPR coordinate.
pub const NB: u32 = 17;

/// Maximum CPR value (2^17 = 131072).
pub const CPR_MAX: f64 = (1u32 << NB) as f64;

/// Largest valid raw CPR field.
pub const CPR_FIELD_MAX: u32 = (1u32 << NB) - 1;

/// Modulo that always returns a non-negative result.
///
/// Returns NaN for a zero divisor. The decoders only ever pass positive cell
/// widths, so that branch is a guard rather than a designed outcome.
pub(crate) fn modulo(x: f64, y: f64) -> f64 {
    if y == 0.0 {
        return f64::NAN;
    }
    x.rem_euclid(y)
}

fn check_field(value: u32) -> Result<f64> {
    if value > CPR_FIELD_MAX {
        return Err(CprError::FieldOutOfRange(value));
    }
    Ok(value as f64)
}

/// Renormalize longitude into [-180, 180).
fn wrap_lon(lon: f64) -> f64 {
    lon - ((lon + 180.0) / 360.0).floor() * 360.0
}

fn lat_in_range(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

/// Surface latitudes are ambiguous between the northern and southern
/// hemisphere solution; pick the one closest to the reference latitude.
/// 0 encodes -90, 0 and +90 alike.
fn surface_lat_quadrant(rlat: f64, ref_lat: f64) -> f64 {
    if rlat == 0.0 {
        if ref_lat < -45.0 {
            -90.0
        } else if ref_lat > 45.0 {
            90.0
        } else {
            0.0
        }
    } else if rlat - ref_lat > 45.0 {
        rlat - 90.0
    } else {
        rlat
    }
}

/// Shared body of the airborne and surface global decoders.
fn global_decode(
    even_lat: u32,
    even_lon: u32,
    odd_lat: u32,
    odd_lon: u32,
    latest: Parity,
    surface_ref: Option<Position>,
) -> Result<Position> {
    let lat0 = check_field(even_lat)?;
    let lon0 = check_field(even_lon)?;
    let lat1 = check_field(odd_lat)?;
    let lon1 = check_field(odd_lon)?;

    let surface = surface_ref.is_some();
    let span = if surface { 90.0 } else { 360.0 };
    let dlat_even = span / 60.0;
    let dlat_odd = span / 59.0;

    // Latitude index j
    let j = ((59.0 * lat0 - 60.0 * lat1) / CPR_MAX + 0.5).floor();

    let mut rlat0 = dlat_even * (modulo(j, 60.0) + lat0 / CPR_MAX);
    let mut rlat1 = dlat_odd * (modulo(j, 59.0) + lat1 / CPR_MAX);

    match surface_ref {
        Some(reference) => {
            rlat0 = surface_lat_quadrant(rlat0, reference.lat);
            rlat1 = surface_lat_quadrant(rlat1, reference.lat);
        }
        None => {
            if rlat0 >= 270.0 {
                rlat0 -= 360.0;
            }
            if rlat1 >= 270.0 {
                rlat1 -= 360.0;
            }
        }
    }

    if !lat_in_range(rlat0) || !lat_in_range(rlat1) {
        debug!(rlat0, rlat1, surface, "CPR global decode: latitude out of range");
        return Err(CprError::BadData);
    }

    if ZONE_TABLE.nl(rlat0) != ZONE_TABLE.nl(rlat1) {
        debug!(rlat0, rlat1, surface, "CPR global decode: zone boundary crossing");
        return Err(CprError::ZoneMismatch);
    }

    let odd = latest.is_odd();
    let (rlat, own_lon) = if odd { (rlat1, lon1) } else { (rlat0, lon0) };

    // Longitude index m
    let nl = ZONE_TABLE.nl(rlat) as f64;
    let ni = ZONE_TABLE.n(rlat, odd) as f64;
    let m = ((lon0 * (nl - 1.0) - lon1 * nl) / CPR_MAX + 0.5).floor();
    let mut rlon = ZONE_TABLE.dlon(rlat, odd, surface) * (modulo(m, ni) + own_lon / CPR_MAX);

    if let Some(reference) = surface_ref {
        // All four longitude quadrants are valid on the surface; move a
        // multiple of 90° toward the reference.
        rlon += ((reference.lon - rlon + 45.0) / 90.0).floor() * 90.0;
    }

    Ok(Position::new(rlat, wrap_lon(rlon)))
}

/// Global CPR decode of an airborne even/odd frame pair.
///
/// `latest` selects which frame's position is returned (normally the most
/// recently received one). Fails with `ZoneMismatch` when the two frames
/// were sent either side of an NL boundary; retry with a fresh pair.
pub fn decode_global_airborne(
    even_lat: u32,
    even_lon: u32,
    odd_lat: u32,
    odd_lon: u32,
    latest: Parity,
) -> Result<Position> {
    global_decode(even_lat, even_lon, odd_lat, odd_lon, latest, None)
}

/// Global CPR decode of a surface even/odd frame pair.
///
/// Surface cells are a quarter of the airborne size, so the result is only
/// known modulo 90°. `reference` picks the hemisphere and longitude quadrant
/// nearest to it; any position within 45° of the truth works.
pub fn decode_global_surface(
    reference: Position,
    even_lat: u32,
    even_lon: u32,
    odd_lat: u32,
    odd_lon: u32,
    latest: Parity,
) -> Result<Position> {
    global_decode(even_lat, even_lon, odd_lat, odd_lon, latest, Some(reference))
}

/// Local CPR decode of a single frame using a reference position.
///
/// Valid when the reference is within half a cell of the true position
/// (about 3° of latitude airborne, 0.75° on the surface).
pub fn decode_local(
    reference: Position,
    cpr_lat: u32,
    cpr_lon: u32,
    parity: Parity,
    surface: bool,
) -> Result<Position> {
    let frac_lat = check_field(cpr_lat)? / CPR_MAX;
    let frac_lon = check_field(cpr_lon)? / CPR_MAX;
    let odd = parity.is_odd();

    let span = if surface { 90.0 } else { 360.0 };
    let dlat = span / parity.lat_zones();

    // Latitude index j from the reference
    let j = (reference.lat / dlat).floor()
        + (0.5 + modulo(reference.lat, dlat) / dlat - frac_lat).floor();

    let mut rlat = dlat * (j + frac_lat);
    if rlat >= 270.0 {
        rlat -= 360.0;
    }

    if !lat_in_range(rlat) {
        debug!(rlat, ref_lat = reference.lat, "CPR local decode: latitude out of range");
        return Err(CprError::OutOfRange);
    }
    if (rlat - reference.lat).abs() > dlat / 2.0 {
        debug!(rlat, ref_lat = reference.lat, "CPR local decode: latitude ambiguous");
        return Err(CprError::Ambiguous);
    }

    // Longitude zone size depends on the latitude just found
    let dlon = ZONE_TABLE.dlon(rlat, odd, surface);

    let m = (reference.lon / dlon).floor()
        + (0.5 + modulo(reference.lon, dlon) / dlon - frac_lon).floor();

    let mut rlon = dlon * (m + frac_lon);
    if rlon > 180.0 {
        rlon -= 360.0;
    }

    if (rlon - reference.lon).abs() > dlon / 2.0 {
        debug!(rlon, ref_lon = reference.lon, "CPR local decode: longitude ambiguous");
        return Err(CprError::Ambiguous);
    }

    Ok(Position::new(rlat, rlon))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
