use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pingln-infra - infrastructure definitions and template synthesizer
#[derive(Parser, Debug)]
#[command(name = "pingln-infra")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize provisioning templates for every composed stack
    Synth {
        /// Path to the deployment config
        #[arg(short, long, default_value = "pingln.toml")]
        config: PathBuf,

        /// Output directory for templates and the assembly manifest
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
    },

    /// Compare the composition against the previously synthesized assembly
    Diff {
        /// Path to the deployment config
        #[arg(short, long, default_value = "pingln.toml")]
        config: PathBuf,

        /// Directory holding the previous assembly
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
    },

    /// List the declared outputs of every composed stack
    Outputs {
        /// Path to the deployment config
        #[arg(short, long, default_value = "pingln.toml")]
        config: PathBuf,
    },
}
