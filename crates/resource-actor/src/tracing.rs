//! # Tracing Setup
//!
//! Structured logging for binaries built on this crate. The filter comes from
//! `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle and outcomes
//! RUST_LOG=debug cargo run     # full payloads
//! ```

use tracing_subscriber::EnvFilter;

/// Install a compact fmt subscriber filtered by `RUST_LOG`.
///
/// Calling it more than once is harmless; later calls leave the first subscriber in place.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false) // entity_type already names the source
        .compact()
        .try_init();
}
