//! Shared types and the error enum for cpr-core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors produced by cpr-core.
#[derive(Debug, Error)]
pub enum CprError {
    /// Global decode produced a latitude outside [-90, 90].
    #[error("bad CPR data: decoded latitude out of range")]
    BadData,
    /// Even and odd samples disagree on the number of longitude zones.
    #[error("even/odd frames straddle a latitude zone boundary")]
    ZoneMismatch,
    /// Local decode produced a latitude outside [-90, 90].
    #[error("local decode latitude out of range")]
    OutOfRange,
    /// Local decode candidate is more than half a cell from the reference.
    #[error("reference position too far from decoded position")]
    Ambiguous,
    #[error("CPR field out of range: {0} (max 131071)")]
    FieldOutOfRange(u32),
    #[error("global decode needs one even and one odd frame")]
    ParityMismatch,
    #[error("cannot pair an airborne frame with a surface frame")]
    MovementMismatch,
    #[error("frame pair too old: {age:.1}s apart")]
    PairTooOld { age: f64 },
    #[error("surface decode requires a reference position")]
    MissingReference,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
}

impl CprError {
    /// Whether retrying with fresher input (a newer frame pair, or a better
    /// reference fix) can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CprError::ZoneMismatch | CprError::Ambiguous | CprError::PairTooOld { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CprError>;

// ---------------------------------------------------------------------------
// Frame parity
// ---------------------------------------------------------------------------

/// CPR format flag. Even and odd frames use grids of 60 and 59 latitude zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn is_odd(self) -> bool {
        self == Parity::Odd
    }

    /// Number of latitude zones for this parity (60 even, 59 odd).
    pub fn lat_zones(self) -> f64 {
        match self {
            Parity::Even => 60.0,
            Parity::Odd => 59.0,
        }
    }
}

impl From<bool> for Parity {
    /// `true` is the odd format, matching the F bit of the position message.
    fn from(odd: bool) -> Self {
        if odd {
            Parity::Odd
        } else {
            Parity::Even
        }
    }
}

impl std::fmt::Display for Parity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
        }
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Latitude/longitude in degrees. Used both as decoder output and as the
/// reference position for local and surface decoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Position { lat, lon }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Raw 17-bit CPR latitude/longitude fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPosition {
    pub lat: u32,
    pub lon: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
