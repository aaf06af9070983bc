//! YantraIO - Teleop control daemon
//!
//! Runs the pairing sequence and the teleop loop against the mock device
//! suite. Real deployments replace the suite with the vendor platform's
//! device handles behind the same traits.

use std::env;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use yantra_io::core::hal::SystemClock;
use yantra_io::devices::mock;
use yantra_io::{app, Config, Error, Result};

/// Parse config path from command line arguments.
///
/// Supports:
/// - `yantra-io <path>` (positional)
/// - `yantra-io --config <path>` (flag-based)
/// - `yantra-io -c <path>` (short flag)
///
/// Defaults to `yantra.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    // Default path
    "yantra.toml".to_string()
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config = if Path::new(&config_path).exists() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("YantraIO v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!("Using config: {}", config_path);

    // Ctrl-C leaves the loop the same way the hub center button does,
    // minus the hardware power-off
    let stop_flag = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop_flag);
    ctrlc::set_handler(move || {
        log::info!("Received stop signal");
        flag.store(true, Ordering::Relaxed);
    })
    .map_err(|e| Error::Device(format!("Failed to set Ctrl-C handler: {}", e)))?;

    let suite = mock::create_suite(&config);
    log::info!(
        "Mock suite ready (battery {}%, sensor {})",
        config.mock.battery_level,
        if config.sensor.enabled { "fitted" } else { "absent" }
    );

    app::run(
        suite.hub,
        suite.left_motor,
        suite.right_motor,
        suite.sensor,
        suite.connector,
        SystemClock,
        &config,
        Some(stop_flag),
    )?;

    log::info!("YantraIO stopped");
    Ok(())
}
