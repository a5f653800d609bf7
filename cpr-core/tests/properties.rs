use proptest::prelude::*;

use cpr_core::{
    decode_global_airborne, decode_local, dlon, encode, nl, CprError, Parity, Position,
};

const CPR_MAX: f64 = 131072.0;

fn parity_strategy() -> impl Strategy<Value = Parity> {
    prop_oneof![Just(Parity::Even), Just(Parity::Odd)]
}

fn lat_cell(parity: Parity, surface: bool) -> f64 {
    let span = if surface { 90.0 } else { 360.0 };
    span / parity.lat_zones()
}

/// The CPR grid point a receiver reconstructs for `pos`, before any
/// longitude wrap.
fn grid_point(pos: Position, parity: Parity, surface: bool) -> Position {
    let dlat = lat_cell(parity, surface);
    let yz = (CPR_MAX * pos.lat.rem_euclid(dlat) / dlat + 0.5).floor();
    let lat = dlat * (yz / CPR_MAX + (pos.lat / dlat).floor());

    let dl = dlon(lat, parity.is_odd(), surface);
    let xz = (CPR_MAX * pos.lon.rem_euclid(dl) / dl + 0.5).floor();
    let lon = dl * (xz / CPR_MAX + (pos.lon / dl).floor());
    Position::new(lat, lon)
}

fn wrap_lon(lon: f64) -> f64 {
    lon - ((lon + 180.0) / 360.0).floor() * 360.0
}

// Property 1: the zone count is symmetric about the equator and in 1..=59
proptest! {
    #[test]
    fn prop_nl_symmetric(lat in -90.0f64..=90.0) {
        prop_assert_eq!(nl(lat), nl(-lat));
        let zones = nl(lat);
        prop_assert!((1..=59).contains(&zones), "NL({}) = {}", lat, zones);
    }
}

// Property 2: encode both parities, then global airborne decode recovers the
// grid point of the requested parity
proptest! {
    #[test]
    fn prop_global_airborne_roundtrip(
        lat in -85.0f64..85.0,
        lon in -179.9f64..179.9,
        latest in parity_strategy(),
    ) {
        // Frames either side of a zone boundary legitimately disagree
        prop_assume!(nl(lat - 0.01) == nl(lat + 0.01));

        let pos = Position::new(lat, lon);
        let even = encode(pos, Parity::Even, false);
        let odd = encode(pos, Parity::Odd, false);

        let decoded = decode_global_airborne(even.lat, even.lon, odd.lat, odd.lon, latest)
            .map_err(|e| TestCaseError::fail(format!("{pos}: {e}")))?;

        let expected = grid_point(pos, latest, false);
        prop_assert!((decoded.lat - expected.lat).abs() <= 1e-6, "{} vs {}", decoded, expected);
        prop_assert!((decoded.lon - wrap_lon(expected.lon)).abs() <= 1e-6, "{} vs {}", decoded, expected);

        // The grid point itself is within one quantum of the input
        prop_assert!((expected.lat - lat).abs() <= lat_cell(latest, false) / CPR_MAX);
    }
}

// Property 3: local decode with a reference within 0.1 cell recovers the
// grid point, airborne and surface
proptest! {
    #[test]
    fn prop_local_roundtrip(
        lat in -80.0f64..80.0,
        lon in -179.0f64..179.0,
        parity in parity_strategy(),
        surface in any::<bool>(),
        dy in -0.1f64..0.1,
        dx in -0.1f64..0.1,
    ) {
        let pos = Position::new(lat, lon);
        let enc = encode(pos, parity, surface);
        let expected = grid_point(pos, parity, surface);

        let cell_lon = dlon(expected.lat, parity.is_odd(), surface);
        let reference = Position::new(
            expected.lat + dy * lat_cell(parity, surface),
            expected.lon + dx * cell_lon,
        );

        let decoded = decode_local(reference, enc.lat, enc.lon, parity, surface)
            .map_err(|e| TestCaseError::fail(format!("{pos} ref {reference}: {e}")))?;
        prop_assert!((decoded.lat - expected.lat).abs() <= 1e-6, "{} vs {}", decoded, expected);
        prop_assert!((decoded.lon - expected.lon).abs() <= 1e-6, "{} vs {}", decoded, expected);
    }
}

// Property 4: a reference more than half a cell off never yields the true
// position; the decoder either rejects it or lands in a neighbouring cell
proptest! {
    #[test]
    fn prop_local_reference_beyond_half_cell(
        lat in -80.0f64..80.0,
        lon in -179.0f64..179.0,
        parity in parity_strategy(),
        surface in any::<bool>(),
        offset in 0.51f64..0.99,
        negative in any::<bool>(),
        along_lat in any::<bool>(),
    ) {
        let pos = Position::new(lat, lon);
        let enc = encode(pos, parity, surface);
        let expected = grid_point(pos, parity, surface);

        let sign = if negative { -1.0 } else { 1.0 };
        let reference = if along_lat {
            Position::new(expected.lat + sign * offset * lat_cell(parity, surface), expected.lon)
        } else {
            let cell_lon = dlon(expected.lat, parity.is_odd(), surface);
            Position::new(expected.lat, expected.lon + sign * offset * cell_lon)
        };

        match decode_local(reference, enc.lat, enc.lon, parity, surface) {
            Err(e) => prop_assert!(
                matches!(e, CprError::Ambiguous | CprError::OutOfRange),
                "unexpected error {}", e
            ),
            Ok(decoded) => prop_assert!(
                (decoded.lat - expected.lat).abs() > 1e-6 || (decoded.lon - expected.lon).abs() > 1e-6,
                "decoded the true position {} from a reference {} beyond half a cell",
                decoded, reference
            ),
        }
    }
}

#[test]
fn local_ambiguous_across_antimeridian() {
    // A reference just east of 180° resolves to a cell past the antimeridian,
    // which wraps to the far side and fails the half-cell check.
    let enc = encode(Position::new(10.0, -179.9), Parity::Even, false);
    let err = decode_local(Position::new(10.0, 179.9), enc.lat, enc.lon, Parity::Even, false)
        .unwrap_err();
    assert!(matches!(err, CprError::Ambiguous));
    assert!(err.is_transient());
}

#[test]
fn global_zone_mismatch_across_boundary() {
    // NL drops from 59 to 58 at 10.4704713°
    let even = encode(Position::new(10.46, 0.5), Parity::Even, false);
    let odd = encode(Position::new(10.48, 0.5), Parity::Odd, false);
    let err = decode_global_airborne(even.lat, even.lon, odd.lat, odd.lon, Parity::Even)
        .unwrap_err();
    assert!(matches!(err, CprError::ZoneMismatch));
    assert!(err.is_transient());
}

#[test]
fn decoders_agree_across_threads() {
    let expected = decode_global_airborne(80536, 9432, 61720, 9192, Parity::Odd).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    (0..1000)
                        .map(|_| decode_global_airborne(80536, 9432, 61720, 9192, Parity::Odd).unwrap())
                        .all(|pos| pos == expected)
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
    });
}
