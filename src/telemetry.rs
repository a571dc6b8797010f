// src/telemetry.rs
// =============================================================================
// Logging setup.
//
// Log lines go to stdout next to the results, except when the results are
// JSON: then they move to stderr so stdout stays machine-readable.
// The level comes from RUST_LOG and defaults to "info".
// =============================================================================

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init(machine_output: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = if machine_output {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(writer).compact())
        .init();
}
