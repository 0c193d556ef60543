//! Shared fixtures for integration tests.
//!
//! Provides device profiles, job descriptions and [`parse`] helpers that run
//! the built-in parser, plus [`Workspace`] which writes fixtures to a temp
//! directory for CLI-level testing.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use lf_core::{Device, JobId, Result};
use lf_pipeline::{Job, JobParser};
use tempfile::TempDir;

/// A QEMU virtual device supporting every built-in method.
pub const QEMU_DEVICE: &str = r#"
hostname: qemu01
device_type: qemu
actions:
  deploy:
    methods:
      tftp: {}
      nbd: {}
      tmpfs: {}
      fastboot: {}
      overlay: {}
  boot:
    methods:
      qemu: {}
      u-boot: {}
      fastboot: {}
      minimal: {}
"#;

/// A BeagleBone Black that only deploys over TFTP and boots with U-Boot.
pub const BBB_DEVICE: &str = r#"
hostname: bbb-03
device_type: beaglebone-black
actions:
  deploy:
    methods: [tftp]
  boot:
    methods:
      - u-boot:
          parameters: {bootloader_prompt: "=>"}
"#;

/// Deploy over TFTP, boot QEMU, run one test shell.
pub const SIMPLE_JOB: &str = r#"
job_name: simple
timeouts:
  job: {minutes: 30}
actions:
  - deploy:
      to: tftp
      kernel: {url: "http://images.example.com/zImage"}
      os: debian
  - boot:
      method: qemu
  - test:
      definitions:
        - {repository: "http://git.example.com/tests.git", name: smoke, path: smoke.yaml}
"#;

pub fn device(yaml: &str) -> Arc<Device> {
    Arc::new(Device::from_yaml(yaml).expect("fixture device is valid"))
}

/// Parse `job` for the QEMU device with the built-in parser.
pub fn parse(job: &str) -> Result<Job> {
    parse_for(job, QEMU_DEVICE)
}

pub fn parse_for(job: &str, device_yaml: &str) -> Result<Job> {
    JobParser::builtin().parse(job, device(device_yaml), JobId::from("1001"), None, None)
}

/// `stage` of every action named `name`, in pipeline order.
pub fn stages(job: &Job, name: &str) -> Vec<u64> {
    job.pipeline()
        .actions()
        .iter()
        .filter(|action| action.name() == name)
        .filter_map(|action| action.parameters().get("stage").and_then(|s| s.as_u64()))
        .collect()
}

/// Whether the first action named `name` carries deployment data.
pub fn has_deployment_data(job: &Job, name: &str) -> bool {
    job.pipeline()
        .actions()
        .iter()
        .find(|action| action.name() == name)
        .is_some_and(|action| action.parameters().contains_key("deployment_data"))
}

/// Fixture files written to a temporary directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Write `contents` to `name` inside the workspace and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write fixture");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
