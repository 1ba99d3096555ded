//! `sqlx::migrate!` embeds the SQL files at compile time, so any change under
//! `migrations/` must rebuild the crate.

use std::fs;

fn main() {
    println!("cargo:rerun-if-changed=migrations");

    if let Ok(entries) = fs::read_dir("migrations") {
        for entry in entries.flatten() {
            println!("cargo:rerun-if-changed={}", entry.path().display());
        }
    }
}
