mod cli;

use labforge::{compile, explain, CompileOptions};
use lf_core::config::Config;
use lf_core::JobId;
use lf_pipeline::Job;
use lf_strategy::Protocol;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            // Verbose mode: every candidate rejection and appended action
            "labforge=trace,lf_pipeline=trace,lf_strategy=trace,lf_core=debug".to_string()
        } else {
            "labforge=info,lf_pipeline=info,lf_strategy=warn,lf_core=info".to_string()
        }
    });

    // Logs go to stderr so `compile --json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compile {
            job,
            device,
            dispatcher_config,
            job_id,
            env_dut,
            json,
        } => {
            let config = Config::load_or_default(cli.config.as_deref());
            let options = CompileOptions {
                job,
                device,
                dispatcher_config,
                job_id: JobId::new(job_id),
                env_dut,
            };
            compile_job(&config, &options, json)
        }
        Commands::Strategies { job, device } => {
            let config = Config::load_or_default(cli.config.as_deref());
            show_strategies(&config, &job, &device)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("labforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn compile_job(config: &Config, options: &CompileOptions, json: bool) -> Result<()> {
    let job = compile(config, options)
        .with_context(|| format!("Failed to compile {}", options.job.display()))?;

    if json {
        let json_str = serde_json::to_string_pretty(&job.summary())?;
        println!("{}", json_str);
    } else {
        print_job(&job);
    }

    Ok(())
}

fn print_job(job: &Job) {
    println!("Job: {}", job.id());
    if let Some(hostname) = job.device().hostname() {
        println!("Device: {}", hostname);
    }
    println!("Timeout: {}", job.timeout());
    println!("Compatibility: {}", job.compatibility());

    if !job.protocols().is_empty() {
        println!("\nProtocols:");
        for protocol in job.protocols() {
            println!("  {} (level {})", protocol.name(), protocol.level());
        }
    }

    println!("\nPipeline: {} actions", job.pipeline().len());
    for action in job.pipeline().describe() {
        println!(
            "  {}. {} [{}]",
            action.level, action.name, action.namespace
        );
    }
}

fn show_strategies(config: &Config, job: &Path, device: &Path) -> Result<()> {
    let report = explain(config, job, device)
        .with_context(|| format!("Failed to read {}", job.display()))?;

    if report.is_empty() {
        println!("No deploy, boot or test actions.");
        return Ok(());
    }

    for action in &report {
        println!(
            "{}. {} [{}]",
            action.index, action.kind, action.namespace
        );
        for score in &action.scores {
            match score.reason {
                Some(ref reason) => println!("     {} - {}: {}", score.score, score.name, reason),
                None => println!("     {} - {}", score.score, score.name),
            }
        }
        match action.selected {
            Some(name) => println!("   selected: {}", name),
            None => println!("   selected: none"),
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = Config::load(p)
                .with_context(|| format!("Invalid config file {}", p.display()))?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Compatibility baseline: {}", config.parser.compatibility);
    println!(
        "  Default job timeout: {}s",
        config.parser.default_job_timeout_secs
    );
    println!(
        "  Dispatcher config: {}",
        config
            .dispatcher_config
            .as_ref()
            .map(PathBuf::as_path)
            .map_or_else(|| "none".to_string(), |p| p.display().to_string())
    );

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}
