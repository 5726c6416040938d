//! # Voxel Streaming Entry Point
//!
//! Runs the headless demo session. Set `RUST_LOG=info` (or `debug`) to see what
//! the engine is doing.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    if let Err(error) = voxel_streaming::run() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}
