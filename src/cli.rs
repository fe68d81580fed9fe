use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// admin-kit - admin request seeding, resource preloading and page rules
#[derive(Parser)]
#[command(name = "admin-kit")]
#[command(about = "Persistence request builder, preload tag emitter and page rule matcher")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print preload <link> tags for a set of resource files
    Preload {
        /// Bundle name, e.g. lib.js
        #[arg(short, long)]
        name: String,
        /// Path prefix the files are mapped under, e.g. /js/
        #[arg(short, long, default_value = "")]
        mapping_prefix: String,
        /// Emit one link per file instead of a single bundle link
        #[arg(long)]
        unbundled: bool,
        /// Files named by the resource tag
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Seed a persistence package request from field metadata and print it as JSON
    Request {
        /// Field metadata JSON file
        #[arg(short, long)]
        metadata: PathBuf,
        /// Section crumbs JSON file (array)
        #[arg(long)]
        crumbs: Option<PathBuf>,
    },
    /// Decide whether a CMS page is included for a variable context
    MatchPage {
        /// Page JSON file
        #[arg(short, long)]
        page: PathBuf,
        /// Rule variables JSON file (object)
        #[arg(long)]
        vars: Option<PathBuf>,
    },
    /// Validate a configuration file
    ValidateConfig {
        /// Path to configuration file to validate
        path: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_preload() {
        let cli = Cli::try_parse_from([
            "admin-kit", "preload", "--name", "lib.js", "-m", "/js/", "--unbundled", "a.js",
            "b.css",
        ])
        .unwrap();
        match cli.command {
            Commands::Preload {
                name,
                mapping_prefix,
                unbundled,
                files,
            } => {
                assert_eq!(name, "lib.js");
                assert_eq!(mapping_prefix, "/js/");
                assert!(unbundled);
                assert_eq!(files, ["a.js", "b.css"]);
            }
            _ => panic!("expected preload command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "admin-kit",
            "match-page",
            "--page",
            "page.json",
            "--verbose",
            "--config",
            "kit.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("kit.json")));
    }
}
