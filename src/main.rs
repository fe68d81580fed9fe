//! admin-kit - Main entry point

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use admin_kit::cli::{Cli, Commands};
use admin_kit::commands;
use admin_kit::config_file::AdminKitConfig;
use admin_kit::resources::ResourceTagAttributes;
use admin_kit::rules::RuleOutcome;

/// Initialize the tracing subscriber; RUST_LOG overrides the default level
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

fn load_config(path: Option<&Path>) -> Result<AdminKitConfig> {
    let config = match path {
        Some(path) => AdminKitConfig::load_from_file(path)?,
        None => AdminKitConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::ValidateConfig { path } => {
            info!("Validating configuration file: {:?}", path);
            let config = AdminKitConfig::load_from_file(&path)?;
            config.validate()?;
            println!("✓ Configuration file is valid: {:?}", path);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Preload {
            name,
            mapping_prefix,
            unbundled,
            files,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut attributes = ResourceTagAttributes::new(name, mapping_prefix, files);
            if unbundled {
                attributes = attributes.with_bundle(false);
            }
            println!("{}", commands::render_preload(&config, &attributes));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Request { metadata, crumbs } => {
            let metadata_json = read(&metadata)?;
            let crumbs_json = crumbs.as_deref().map(read).transpose()?;
            let request = commands::build_request(&metadata_json, crumbs_json.as_deref())
                .with_context(|| format!("Failed to seed request from {:?}", metadata))?;
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::MatchPage { page, vars } => {
            let config = load_config(cli.config.as_deref())?;
            let page_json = read(&page)?;
            let vars_json = vars.as_deref().map(read).transpose()?;
            let outcome = commands::match_page(&config, &page_json, vars_json.as_deref())?;
            debug!("Rule outcome: {:?}", outcome);

            match outcome {
                RuleOutcome::NoRule | RuleOutcome::Matched => {
                    println!("match");
                    Ok(ExitCode::SUCCESS)
                }
                RuleOutcome::Rejected => {
                    println!("no match");
                    Ok(ExitCode::from(1))
                }
                RuleOutcome::Failed(err) => {
                    println!("no match ({})", err);
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            ExitCode::from(2)
        }
    }
}
