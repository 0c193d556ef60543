//! File-level entry points: read the job, device and dispatcher files named
//! on the command line and hand them to the parser.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lf_core::config::Config;
use lf_core::{Device, JobId, Result};
use lf_pipeline::{ActionScores, Job, JobDescription, JobParser};

/// Everything needed to compile one job.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub job: PathBuf,
    pub device: PathBuf,
    /// Overrides `Config::dispatcher_config`.
    pub dispatcher_config: Option<PathBuf>,
    pub job_id: JobId,
    /// Overrides `Config::env_dut`.
    pub env_dut: Option<String>,
}

impl CompileOptions {
    pub fn new(job: impl Into<PathBuf>, device: impl Into<PathBuf>) -> Self {
        Self {
            job: job.into(),
            device: device.into(),
            dispatcher_config: None,
            job_id: JobId::from(0_u64),
            env_dut: None,
        }
    }
}

/// Load a device profile.
pub fn load_device(path: &Path) -> Result<Arc<Device>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(Arc::new(Device::from_yaml(&contents)?))
}

/// Compile the job named by `options`.
pub fn compile(config: &Config, options: &CompileOptions) -> Result<Job> {
    let content = std::fs::read_to_string(&options.job)?;
    let device = load_device(&options.device)?;

    let dispatcher_path = options
        .dispatcher_config
        .as_deref()
        .or(config.dispatcher_config.as_deref());
    let dispatcher = dispatcher_path.map(std::fs::read_to_string).transpose()?;
    let env_dut = options.env_dut.as_deref().or(config.env_dut.as_deref());

    tracing::debug!(
        job = %options.job.display(),
        device = %options.device.display(),
        dispatcher = ?dispatcher_path,
        "compiling job"
    );

    JobParser::builtin()
        .with_config(config.parser.clone())
        .parse(
            &content,
            device,
            options.job_id.clone(),
            dispatcher.as_deref(),
            env_dut,
        )
}

/// Score every strategy candidate for each action of a job.
pub fn explain(config: &Config, job: &Path, device: &Path) -> Result<Vec<ActionScores>> {
    let content = std::fs::read_to_string(job)?;
    let description = JobDescription::from_yaml(&content)?;
    let device = load_device(device)?;
    Ok(JobParser::builtin()
        .with_config(config.parser.clone())
        .explain(&description, &device))
}
