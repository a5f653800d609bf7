//! cpr-core: Compact Position Reporting decode for ADS-B positions.
//!
//! No async, no I/O in the decode path, just algorithms. Every decoder is a
//! pure function of its inputs and the read-only zone table, so it can be
//! called from any thread. `cpr-cli` is a thin harness on top.

pub mod config;
pub mod cpr;
pub mod encode;
pub mod pair;
pub mod types;
pub mod zone;

// Re-export commonly used items at crate root
pub use cpr::{decode_global_airborne, decode_global_surface, decode_local};
pub use encode::encode;
pub use pair::{decode_frames, CprFrame};
pub use types::*;
pub use zone::{dlon, n, nl, ZoneTable, ZONE_TABLE};
