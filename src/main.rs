//! # Voxel World Demo Entry Point
//!
//! Runs the headless streaming demo from the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [world.json] [catalog.json]
//! ```

fn main() {
    if let Err(error) = voxel_world::run() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}
