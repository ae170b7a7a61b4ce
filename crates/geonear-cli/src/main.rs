//! Administrative CLI for geonear program databases.
//!
//! Provides the `geonear` binary with subcommands for seeding and inspecting
//! a program database directly, without going through the HTTP server or the
//! geocoding provider: coordinates are supplied on the command line.
//!
//! Uses the same storage and covering code as the server, ensuring identical
//! behavior from both entry points.

use std::process;

use clap::{Parser, Subcommand};

use geonear_core::{covering_ranges, CellId, CoveringConfig, LatLng};
use geonear_storage::{NewProgram, ProgramStore, SqliteStore, TypeId};

/// Geonear program database tools.
#[derive(Parser)]
#[command(name = "geonear", about = "Social-support program database tools")]
struct Cli {
    /// Path to the program database file.
    #[arg(short, long, default_value = "geonear.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Register a program type.
    AddType {
        /// Type name (e.g. "Food", "Housing").
        name: String,
    },

    /// List all program types.
    Types,

    /// Add a program with explicit coordinates.
    AddProgram {
        /// Program name.
        #[arg(long)]
        name: String,

        /// Street address (stored verbatim, not geocoded).
        #[arg(long)]
        address: String,

        /// Latitude in degrees.
        #[arg(long)]
        lat: f64,

        /// Longitude in degrees.
        #[arg(long)]
        lng: f64,

        /// Type IDs to associate (unknown IDs are skipped).
        #[arg(long, value_delimiter = ',')]
        type_ids: Vec<i64>,
    },

    /// Find programs near a coordinate.
    Search {
        /// Latitude in degrees.
        #[arg(long)]
        lat: f64,

        /// Longitude in degrees.
        #[arg(long)]
        lng: f64,

        /// Search radius in miles.
        #[arg(long)]
        radius_miles: f64,

        /// Restrict to one type ID.
        #[arg(long)]
        type_id: Option<i64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut store = match SqliteStore::new(&cli.db) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", cli.db, e);
            process::exit(2);
        }
    };

    let exit_code = match cli.command {
        Commands::AddType { name } => run_add_type(&mut store, &name),
        Commands::Types => run_types(&store),
        Commands::AddProgram {
            name,
            address,
            lat,
            lng,
            type_ids,
        } => run_add_program(&mut store, &name, &address, lat, lng, &type_ids),
        Commands::Search {
            lat,
            lng,
            radius_miles,
            type_id,
        } => run_search(&store, lat, lng, radius_miles, type_id),
    };
    process::exit(exit_code);
}

/// Execute the add-type subcommand. Returns exit code.
fn run_add_type(store: &mut SqliteStore, name: &str) -> i32 {
    match store.create_type(name) {
        Ok(ty) => {
            println!("{}", serde_json::json!({ "type_id": ty.type_id.0, "type_name": ty.type_name }));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Execute the types subcommand.
fn run_types(store: &SqliteStore) -> i32 {
    match store.all_types() {
        Ok(types) => {
            for ty in types {
                println!("{}\t{}", ty.type_id.0, ty.type_name);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Execute the add-program subcommand.
fn run_add_program(
    store: &mut SqliteStore,
    name: &str,
    address: &str,
    lat: f64,
    lng: f64,
    type_ids: &[i64],
) -> i32 {
    let coords = match LatLng::new(lat, lng) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let config = CoveringConfig::default();
    let new = NewProgram {
        name: name.to_string(),
        address: address.to_string(),
        latitude: lat,
        longitude: lng,
        cell_id: CellId::from_lat_lng(coords).parent(config.storage_level),
    };
    let type_ids: Vec<TypeId> = type_ids.iter().copied().map(TypeId).collect();
    match store.save_program(&new, &type_ids) {
        Ok(record) => {
            println!(
                "{}",
                serde_json::json!({ "id": record.id.0, "name": record.name, "cell_id": record.cell_id.0 })
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Execute the search subcommand.
fn run_search(
    store: &SqliteStore,
    lat: f64,
    lng: f64,
    radius_miles: f64,
    type_id: Option<i64>,
) -> i32 {
    let coords = match LatLng::new(lat, lng) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if !radius_miles.is_finite() || radius_miles < 0.0 {
        eprintln!("Error: radius must be a non-negative number of miles");
        return 1;
    }

    let ranges = covering_ranges(coords, radius_miles, &CoveringConfig::default());
    let mut seen = std::collections::HashSet::new();
    for range in &ranges {
        let programs = match store.find_in_range(*range, type_id.map(TypeId)) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        for program in programs {
            if !seen.insert(program.id) {
                continue;
            }
            let types = match store.types_of(program.id) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return 1;
                }
            };
            let names: Vec<String> = types.into_iter().map(|t| t.type_name).collect();
            println!(
                "{}",
                serde_json::json!({
                    "id": program.id.0,
                    "name": program.name,
                    "address": program.address,
                    "latitude": program.latitude,
                    "longitude": program.longitude,
                    "types": names,
                })
            );
        }
    }
    0
}
