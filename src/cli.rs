use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labforge")]
#[command(author, version, about = "Compile test-lab job descriptions into action pipelines")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a job description for a device and print its pipeline
    Compile {
        /// Job description (YAML)
        #[arg(required = true)]
        job: PathBuf,

        /// Device profile (YAML)
        #[arg(short, long)]
        device: PathBuf,

        /// Dispatcher configuration (YAML) exposed to the job
        #[arg(long)]
        dispatcher_config: Option<PathBuf>,

        /// Job identifier
        #[arg(long, default_value = "0")]
        job_id: String,

        /// Environment string passed to the job as env_dut
        #[arg(long)]
        env_dut: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how every strategy scores for each action of a job
    Strategies {
        /// Job description (YAML)
        #[arg(required = true)]
        job: PathBuf,

        /// Device profile (YAML)
        #[arg(short, long)]
        device: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
