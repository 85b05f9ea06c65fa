//! Config validation CLI tool
//!
//! Validates a healthsync configuration file and reports any errors.

use healthsync_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a healthsync configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match healthsync_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", healthsync_config::CURRENT_CONFIG_VERSION);
            println!("  Read timeout: {} ms", settings.sync.read_timeout.as_millis());
            println!("  Cache key prefix: {}", settings.sync.cache_key_prefix);
            match &settings.remote.base_url {
                Some(url) => println!("  Remote: {}", url),
                None => println!("  Remote: (not configured, pushes disabled)"),
            }
            println!("  Connectivity check: {}", settings.connectivity.check_url);
            println!("  Data dir: {}", settings.storage.data_dir.display());
            if let Some(path) = &settings.health.export_path {
                println!("  Health export: {}", path.display());
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                healthsync_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                healthsync_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                healthsync_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                healthsync_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        healthsync_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
