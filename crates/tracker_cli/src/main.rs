//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tracker_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use tracker_core::db::migrations::latest_version;
use tracker_core::db::open_db_in_memory;

fn main() {
    println!("tracker_core ping={}", tracker_core::ping());
    println!("tracker_core version={}", tracker_core::core_version());

    // Opening an in-memory database exercises the migration path without
    // touching the filesystem.
    match open_db_in_memory() {
        Ok(_) => println!("tracker_core schema_version={}", latest_version()),
        Err(err) => {
            eprintln!("tracker_core schema bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}
