use clap::Parser;
use std::path::PathBuf;

/// Inline-styles generator - compiles Tailwind classes used in email
/// templates into a static style map module
#[derive(Parser, Debug, Clone)]
#[command(name = "tailwind-inliner-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (JSON or YAML)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        required = true,
        help = "Path to the generator configuration file"
    )]
    pub config: PathBuf,

    /// Force validation reporting for every configuration
    #[arg(
        long = "validate",
        default_value_t = false,
        help = "Report missing and obsolete classes after each generation"
    )]
    pub validate: bool,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose output"
    )]
    pub verbose: bool,

    /// Command used to launch the Node helper hosting the utility engine
    #[arg(
        long = "node-command",
        value_name = "CMD",
        default_value = "node",
        env = "TAILWIND_INLINER_NODE",
        help = "Node executable used to run the Tailwind engine helper"
    )]
    pub node_command: String,
}
