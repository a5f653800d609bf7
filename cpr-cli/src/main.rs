//! cpr: command-line harness for CPR position decoding.
//!
//! Takes raw 17-bit CPR fields (as extracted from ADS-B position messages)
//! and prints the decoded position. Reference positions default to the
//! receiver position in `~/.cpr-decode/config.yaml`.

use clap::{Args, Parser, Subcommand};
use comfy_table::{Cell, Table};
use serde::Serialize;
use tracing::{debug, info};

use cpr_core::config::{self, Config};
use cpr_core::zone::ZONE_TABLE;
use cpr_core::{CprError, EncodedPosition, Parity, Position};

mod logging;

#[derive(Parser)]
#[command(name = "cpr", version, about = "ADS-B Compact Position Reporting decoder")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Globally decode an airborne even/odd frame pair
    Airborne {
        #[command(flatten)]
        pair: PairArgs,
    },

    /// Globally decode a surface even/odd frame pair
    Surface {
        #[command(flatten)]
        pair: PairArgs,

        #[command(flatten)]
        reference: RefArgs,
    },

    /// Decode a single frame relative to a reference position
    Local {
        /// Raw 17-bit CPR latitude
        lat: u32,

        /// Raw 17-bit CPR longitude
        lon: u32,

        /// Frame uses the odd format
        #[arg(long)]
        odd: bool,

        /// Decode as a surface position
        #[arg(long)]
        surface: bool,

        #[command(flatten)]
        reference: RefArgs,
    },

    /// Encode a position into raw CPR fields
    Encode {
        /// Latitude in degrees
        #[arg(allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(allow_hyphen_values = true)]
        lon: f64,

        /// Use the odd format
        #[arg(long)]
        odd: bool,

        /// Use the surface grid
        #[arg(long)]
        surface: bool,
    },

    /// Print the latitude zone (NL) table
    Zones,

    /// Show the configuration, or write it with --init
    Config {
        /// Write the configuration file
        #[arg(long)]
        init: bool,

        /// Receiver name
        #[arg(long)]
        name: Option<String>,

        /// Receiver latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Receiver longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },
}

#[derive(Args)]
struct PairArgs {
    /// Raw CPR latitude of the even frame
    even_lat: u32,

    /// Raw CPR longitude of the even frame
    even_lon: u32,

    /// Raw CPR latitude of the odd frame
    odd_lat: u32,

    /// Raw CPR longitude of the odd frame
    odd_lon: u32,

    /// Report the odd frame's position (the odd frame is the most recent)
    #[arg(long)]
    odd: bool,
}

#[derive(Args)]
struct RefArgs {
    /// Reference latitude (defaults to the configured receiver)
    #[arg(long, env = "CPR_REF_LAT", allow_hyphen_values = true)]
    ref_lat: Option<f64>,

    /// Reference longitude (defaults to the configured receiver)
    #[arg(long, env = "CPR_REF_LON", allow_hyphen_values = true)]
    ref_lon: Option<f64>,
}

impl RefArgs {
    fn resolve(&self, config: &Config) -> Result<Position, CprError> {
        match (self.ref_lat, self.ref_lon) {
            (Some(lat), Some(lon)) => Ok(Position::new(lat, lon)),
            (None, None) => config.reference().ok_or(CprError::MissingReference),
            _ => Err(CprError::Config(
                "--ref-lat and --ref-lon must be given together".into(),
            )),
        }
    }
}

#[derive(Serialize)]
struct DecodeOutput {
    mode: &'static str,
    parity: Parity,
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
struct EncodeOutput {
    parity: Parity,
    surface: bool,
    #[serde(flatten)]
    fields: EncodedPosition,
}

fn main() {
    let cli = Cli::parse();
    let config = config::load_config();
    logging::init_logging(cli.verbose, &config.logging.level);
    debug!(path = %config::config_file().display(), "loaded config");

    let json = cli.json;
    let result = match cli.command {
        Commands::Airborne { pair } => cmd_airborne(&pair, json),
        Commands::Surface { pair, reference } => cmd_surface(&pair, &reference, &config, json),
        Commands::Local {
            lat,
            lon,
            odd,
            surface,
            reference,
        } => cmd_local(lat, lon, Parity::from(odd), surface, &reference, &config, json),
        Commands::Encode {
            lat,
            lon,
            odd,
            surface,
        } => cmd_encode(Position::new(lat, lon), Parity::from(odd), surface, json),
        Commands::Zones => cmd_zones(json),
        Commands::Config {
            init,
            name,
            lat,
            lon,
        } => cmd_config(config, init, name, lat, lon),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if e.is_transient() {
            eprintln!("  (transient: retry with a fresher frame pair or reference)");
        }
        std::process::exit(1);
    }
}

fn print_position(mode: &'static str, parity: Parity, pos: Position, json: bool) {
    if json {
        let out = DecodeOutput {
            mode,
            parity,
            lat: pos.lat,
            lon: pos.lon,
        };
        match serde_json::to_string(&out) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    } else {
        println!("{:.6} {:.6}", pos.lat, pos.lon);
    }
}

fn cmd_airborne(pair: &PairArgs, json: bool) -> Result<(), CprError> {
    let latest = Parity::from(pair.odd);
    let pos = cpr_core::decode_global_airborne(
        pair.even_lat,
        pair.even_lon,
        pair.odd_lat,
        pair.odd_lon,
        latest,
    )?;
    print_position("airborne", latest, pos, json);
    Ok(())
}

fn cmd_surface(
    pair: &PairArgs,
    reference: &RefArgs,
    config: &Config,
    json: bool,
) -> Result<(), CprError> {
    let reference = reference.resolve(config)?;
    info!(%reference, "surface decode");
    let latest = Parity::from(pair.odd);
    let pos = cpr_core::decode_global_surface(
        reference,
        pair.even_lat,
        pair.even_lon,
        pair.odd_lat,
        pair.odd_lon,
        latest,
    )?;
    print_position("surface", latest, pos, json);
    Ok(())
}

fn cmd_local(
    lat: u32,
    lon: u32,
    parity: Parity,
    surface: bool,
    reference: &RefArgs,
    config: &Config,
    json: bool,
) -> Result<(), CprError> {
    let reference = reference.resolve(config)?;
    info!(%reference, surface, "local decode");
    let pos = cpr_core::decode_local(reference, lat, lon, parity, surface)?;
    print_position("local", parity, pos, json);
    Ok(())
}

fn cmd_encode(pos: Position, parity: Parity, surface: bool, json: bool) -> Result<(), CprError> {
    let fields = cpr_core::encode(pos, parity, surface);
    if json {
        let out = EncodeOutput {
            parity,
            surface,
            fields,
        };
        println!(
            "{}",
            serde_json::to_string(&out).map_err(|e| CprError::Config(e.to_string()))?
        );
    } else {
        println!("{} {}", fields.lat, fields.lon);
    }
    Ok(())
}

fn cmd_zones(json: bool) -> Result<(), CprError> {
    let boundaries = ZONE_TABLE.boundaries();

    if json {
        println!(
            "{}",
            serde_json::to_string(&boundaries[..]).map_err(|e| CprError::Config(e.to_string()))?
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["NL", "Up to lat (°)", "Even Dlon (°)", "Odd Dlon (°)"]);
    for (i, &lat) in boundaries.iter().enumerate() {
        let zones = i + 1;
        let odd_zones = zones.saturating_sub(1).max(1);
        table.add_row(vec![
            Cell::new(zones),
            Cell::new(format!("{lat:.8}")),
            Cell::new(format!("{:.4}", 360.0 / zones as f64)),
            Cell::new(format!("{:.4}", 360.0 / odd_zones as f64)),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn cmd_config(
    mut config: Config,
    init: bool,
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<(), CprError> {
    if let Some(name) = name {
        config.receiver.name = name;
    }
    if lat.is_some() {
        config.receiver.lat = lat;
    }
    if lon.is_some() {
        config.receiver.lon = lon;
    }

    if init {
        let path = config::save_config(&config)?;
        println!("Wrote {}", path.display());
    }

    println!();
    println!("Config: {}", config::config_file().display());
    println!();
    println!("  Receiver:   {}", config.receiver.name);
    match config.reference() {
        Some(pos) => println!("  Reference:  {pos}"),
        None => println!("  Reference:  -"),
    }
    println!("  Log level:  {}", config.logging.level);
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
