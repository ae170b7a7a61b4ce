//! Binary entrypoint for the geonear HTTP server.
//!
//! Reads configuration from environment variables:
//! - `GEONEAR_DB_PATH`: SQLite database file path (default: "geonear.db")
//! - `GEONEAR_PORT`: Server listen port (default: "3000")
//! - `GOOGLE_MAPS_API_KEY`: Google Geocoding API key (production geocoder)
//! - `GEONEAR_FIXED_COORDS`: "lat,lng" pair; when set, replaces the Google
//!   geocoder with a fixed-coordinate one (development only)

use geonear_server::geocoder::Geocoder;
use geonear_server::router::build_router;
use geonear_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let db_path = std::env::var("GEONEAR_DB_PATH")
        .unwrap_or_else(|_| "geonear.db".to_string());
    let port = std::env::var("GEONEAR_PORT")
        .unwrap_or_else(|_| "3000".to_string());

    let geocoder = match std::env::var("GEONEAR_FIXED_COORDS") {
        Ok(coords) => match parse_fixed_coords(&coords) {
            Some((lat, lng)) => {
                tracing::warn!("using fixed-coordinate geocoder; addresses will not be resolved");
                Geocoder::fixed(lat, lng)
            }
            None => {
                eprintln!("GEONEAR_FIXED_COORDS must be \"lat,lng\", got '{}'", coords);
                std::process::exit(1);
            }
        },
        Err(_) => match std::env::var("GOOGLE_MAPS_API_KEY") {
            Ok(api_key) => Geocoder::google(api_key),
            Err(_) => {
                eprintln!(
                    "GOOGLE_MAPS_API_KEY is required (or set GEONEAR_FIXED_COORDS for development)"
                );
                std::process::exit(1);
            }
        },
    };

    let state = AppState::new(&db_path, geocoder)
        .expect("Failed to initialize application state");

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("geonear server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn parse_fixed_coords(s: &str) -> Option<(f64, f64)> {
    let (lat, lng) = s.split_once(',')?;
    Some((lat.trim().parse().ok()?, lng.trim().parse().ok()?))
}
