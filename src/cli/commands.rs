//! CLI commands and argument parsing

use clap::{Parser, Subcommand};

/// Invoke paged web service operations from a declarative catalog
#[derive(Parser, Debug)]
#[command(name = "connectkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service catalog: a built-in name or a YAML file
    #[arg(short, long, global = true, default_value = "connect")]
    pub catalog: String,

    /// Override the catalog endpoint (e.g. a local proxy)
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Region substituted into the endpoint
    #[arg(short, long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Extra request header (repeatable)
    #[arg(short = 'H', long = "header", global = true, value_name = "KEY=VALUE")]
    pub headers: Vec<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the operations of the catalog
    List,

    /// Show an operation's parameters and pagination fields
    Describe {
        /// Operation name
        operation: String,
    },

    /// Validate the catalog
    Validate,

    /// Call an operation, following continuation tokens
    Invoke {
        /// Operation name
        operation: String,

        /// Operation parameter (repeatable)
        #[arg(short, long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Start from this continuation token and fetch a single page
        #[arg(long)]
        next_token: Option<String>,

        /// Fetch a single page and report the token for the next one
        #[arg(long)]
        no_auto_iteration: bool,

        /// Page size requested from the service
        #[arg(long)]
        max_results: Option<u32>,

        /// Output selector: `*`, `^Parameter` or a response path
        #[arg(short, long)]
        select: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_invoke() {
        let cli = Cli::try_parse_from([
            "connectkit",
            "--region",
            "eu-west-2",
            "invoke",
            "ListUsers",
            "-p",
            "InstanceId=abc",
            "--max-results",
            "50",
            "--no-auto-iteration",
            "--select",
            "^InstanceId",
        ])
        .unwrap();

        assert_eq!(cli.catalog, "connect");
        assert_eq!(cli.region.as_deref(), Some("eu-west-2"));
        match cli.command {
            Commands::Invoke {
                operation,
                params,
                next_token,
                no_auto_iteration,
                max_results,
                select,
            } => {
                assert_eq!(operation, "ListUsers");
                assert_eq!(params, vec!["InstanceId=abc"]);
                assert!(next_token.is_none());
                assert!(no_auto_iteration);
                assert_eq!(max_results, Some(50));
                assert_eq!(select.as_deref(), Some("^InstanceId"));
            }
            other => panic!("Expected invoke, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "connectkit",
            "describe",
            "SearchUsers",
            "--format",
            "pretty",
            "-H",
            "Authorization=token",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Pretty);
        assert_eq!(cli.headers, vec!["Authorization=token"]);
    }
}
