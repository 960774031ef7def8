//! `tt version`.

use serde::Serialize;

use crate::config::Latency;
use crate::error::Result;

#[derive(Serialize)]
struct VersionOutput {
    name: &'static str,
    version: &'static str,
    profile: &'static str,
    simulated_latency: bool,
}

/// Print the version and whether backend latency is simulated.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(no_latency: bool, json: bool) -> Result<()> {
    let output = VersionOutput {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        profile: if cfg!(debug_assertions) { "dev" } else { "release" },
        simulated_latency: Latency::resolve(no_latency) != Latency::NONE,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        let latency = if output.simulated_latency { "simulated latency" } else { "no latency" };
        println!("{} {} ({}, {latency})", output.name, output.version, output.profile);
    }
    Ok(())
}
