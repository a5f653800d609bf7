//! Even/odd frame pairing for global decode.
//!
//! Global decode is only valid when both frames describe (nearly) the same
//! position, so a pair is rejected once the frames are too far apart in time.
//! The most recent frame decides which parity's position is reported.

use serde::{Deserialize, Serialize};

use crate::cpr::{decode_global_airborne, decode_global_surface};
use crate::types::{CprError, Parity, Position, Result};

/// Maximum time between airborne even/odd frames for global decode (seconds).
pub const MAX_PAIR_AGE: f64 = 10.0;

/// Maximum time between surface even/odd frames (seconds). Surface traffic
/// moves slowly enough that older pairs stay consistent.
pub const MAX_SURFACE_PAIR_AGE: f64 = 50.0;

/// One received CPR position sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CprFrame {
    pub lat: u32,
    pub lon: u32,
    pub parity: Parity,
    pub surface: bool,
    /// Receive time in seconds.
    pub timestamp: f64,
}

impl CprFrame {
    pub fn new(lat: u32, lon: u32, parity: Parity, surface: bool, timestamp: f64) -> Self {
        CprFrame {
            lat,
            lon,
            parity,
            surface,
            timestamp,
        }
    }
}

/// Globally decode an even/odd frame pair.
///
/// `reference` is required for surface frames and ignored for airborne ones.
pub fn decode_frames(
    even: &CprFrame,
    odd: &CprFrame,
    reference: Option<Position>,
) -> Result<Position> {
    if even.parity != Parity::Even || odd.parity != Parity::Odd {
        return Err(CprError::ParityMismatch);
    }
    if even.surface != odd.surface {
        return Err(CprError::MovementMismatch);
    }

    let max_age = if even.surface {
        MAX_SURFACE_PAIR_AGE
    } else {
        MAX_PAIR_AGE
    };
    let age = (even.timestamp - odd.timestamp).abs();
    if age > max_age {
        return Err(CprError::PairTooOld { age });
    }

    let latest = if even.timestamp >= odd.timestamp {
        Parity::Even
    } else {
        Parity::Odd
    };

    if even.surface {
        let reference = reference.ok_or(CprError::MissingReference)?;
        decode_global_surface(reference, even.lat, even.lon, odd.lat, odd.lon, latest)
    } else {
        decode_global_airborne(even.lat, even.lon, odd.lat, odd.lon, latest)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn airborne(t_even: f64, t_odd: f64) -> (CprFrame, CprFrame) {
        (
            CprFrame::new(80536, 9432, Parity::Even, false, t_even),
            CprFrame::new(61720, 9192, Parity::Odd, false, t_odd),
        )
    }

    #[test]
    fn test_latest_even() {
        let (even, odd) = airborne(1.0, 0.0);
        let pos = decode_frames(&even, &odd, None).unwrap();
        assert!((pos.lat - 51.686646).abs() < 1e-6);
        assert!((pos.lon - 0.700156).abs() < 1e-6);
    }

    #[test]
    fn test_latest_odd() {
        let (even, odd) = airborne(0.0, 1.0);
        let pos = decode_frames(&even, &odd, None).unwrap();
        assert!((pos.lat - 51.686763).abs() < 1e-6);
        assert!((pos.lon - 0.701294).abs() < 1e-6);
    }

    #[test]
    fn test_simultaneous_frames_use_even() {
        let (even, odd) = airborne(5.0, 5.0);
        let pos = decode_frames(&even, &odd, None).unwrap();
        assert!((pos.lat - 51.686646).abs() < 1e-6);
    }

    #[test]
    fn test_pair_too_old() {
        let (even, odd) = airborne(11.0, 0.0);
        let err = decode_frames(&even, &odd, None).unwrap_err();
        assert!(matches!(err, CprError::PairTooOld { age } if age == 11.0));
        assert!(err.is_transient());
    }

    #[test]
    fn test_parity_mismatch() {
        let (even, _) = airborne(0.0, 0.0);
        let err = decode_frames(&even, &even, None).unwrap_err();
        assert!(matches!(err, CprError::ParityMismatch));
    }

    #[test]
    fn test_movement_mismatch() {
        let (even, mut odd) = airborne(0.0, 1.0);
        odd.surface = true;
        let err = decode_frames(&even, &odd, None).unwrap_err();
        assert!(matches!(err, CprError::MovementMismatch));
    }

    #[test]
    fn test_surface_pair() {
        let even = CprFrame::new(105730, 9259, Parity::Even, true, 30.0);
        let odd = CprFrame::new(29693, 8997, Parity::Odd, true, 0.0);

        let err = decode_frames(&even, &odd, None).unwrap_err();
        assert!(matches!(err, CprError::MissingReference));

        // 30s apart is fine on the surface
        let pos = decode_frames(&even, &odd, Some(Position::new(52.0, 0.0))).unwrap();
        assert!((pos.lat - 52.209984).abs() < 1e-6);
        assert!((pos.lon - 0.176601).abs() < 1e-6);
    }
}
