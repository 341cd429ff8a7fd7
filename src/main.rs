//! ride-places CLI entry point
//!
//! Place registry for ride history - resolve, list and ingest

use ride_places::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
