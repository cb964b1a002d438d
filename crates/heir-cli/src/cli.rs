use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(
    name = "heir",
    about = "heir - resolve inherited application manifests",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides the configuration file)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve the applications of a manifest and its ancestors
    Resolve(ResolveArgs),
    /// Show the inheritance chain, root first
    Chain(ChainArgs),
    /// Resolve and report which applications are valid
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Leaf manifest
    pub manifest: PathBuf,
    /// Only resolve this application
    #[arg(short, long)]
    pub app: Option<String>,
}

#[derive(Args)]
pub struct ChainArgs {
    pub manifest: PathBuf,
}

#[derive(Args)]
pub struct ValidateArgs {
    pub manifest: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resolve() {
        let cli = Cli::try_parse_from(["heir", "resolve", "manifest.yml"]).unwrap();
        if let Command::Resolve(args) = cli.command {
            assert_eq!(args.manifest, PathBuf::from("manifest.yml"));
            assert!(args.app.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_resolve_single_app() {
        let cli = Cli::try_parse_from(["heir", "resolve", "m.yml", "--app", "web"]).unwrap();
        if let Command::Resolve(args) = cli.command {
            assert_eq!(args.app, Some("web".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_chain() {
        let cli = Cli::try_parse_from(["heir", "chain", "m.yml"]).unwrap();
        assert!(matches!(cli.command, Command::Chain(_)));
    }

    #[test]
    fn parse_validate() {
        let cli = Cli::try_parse_from(["heir", "validate", "m.yml"]).unwrap();
        assert!(matches!(cli.command, Command::Validate(_)));
    }

    #[test]
    fn manifest_is_required() {
        assert!(Cli::try_parse_from(["heir", "resolve"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["heir", "--verbose", "chain", "m.yml"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format_after_subcommand() {
        let cli = Cli::try_parse_from(["heir", "resolve", "m.yml", "--format", "json"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::try_parse_from(["heir", "--config", "heir.toml", "chain", "m.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("heir.toml")));
        assert!(cli.format.is_none());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["heir", "--format", "xml", "chain", "m.yml"]).is_err());
    }
}
