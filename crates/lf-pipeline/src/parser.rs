//! The [`JobParser`]: job description + device → [`Job`].
//!
//! Parsing runs in two passes over the description's actions. The pre-scan
//! resolves the test strategy of every test action and records what it needs
//! in the [`NamespaceTracker`], so that deploy actions processed later in the
//! main pass know whether to carry OS-specific deployment data. The main pass
//! then resolves each action's strategy in declared order and lets it append
//! its steps to the pipeline. A finalize action always closes the pipeline,
//! and the job is only returned once its compatibility level covers what the
//! description declares.

use std::sync::Arc;
use std::time::Duration;

use lf_core::config::ParserConfig;
use lf_core::{Device, JobId, Parameters, Result, Timeout};
use lf_strategy::{CandidateScore, Capability};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::actions::{CommandAction, FinalizeAction};
use crate::compatibility;
use crate::deployment_data::{BuiltinDeploymentData, DeploymentDataSource};
use crate::description::{ActionKind, ActionSpec, JobDescription};
use crate::job::Job;
use crate::namespace::{NamespaceTracker, TestRequirement};
use crate::pipeline::Pipeline;
use crate::registry::{self, Registries};
use crate::strategy::Deployment;

/// Parameter key the OS bundle is attached under.
pub const DEPLOYMENT_DATA_KEY: &str = "deployment_data";

/// Parameter key holding a test action's stage.
pub const STAGE_KEY: &str = "stage";

/// How every candidate scored for one strategy-backed action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionScores {
    /// 1-based position in the description's action list.
    pub index: usize,
    pub kind: &'static str,
    pub namespace: String,
    pub scores: Vec<CandidateScore>,
    /// The strategy selection would pick, if any accepts.
    pub selected: Option<&'static str>,
}

/// Builds [`Job`]s from job descriptions.
///
/// A parser only borrows its registries and deployment-data source, so any
/// number of parsers may share them across threads.
pub struct JobParser<'a> {
    registries: &'a Registries,
    deployment_data: &'a dyn DeploymentDataSource,
    config: ParserConfig,
}

impl JobParser<'static> {
    /// A parser over the process-wide built-in registries and deployment
    /// data.
    pub fn builtin() -> Self {
        Self::new(registry::registries(), &BuiltinDeploymentData)
    }
}

impl<'a> JobParser<'a> {
    pub fn new(registries: &'a Registries, deployment_data: &'a dyn DeploymentDataSource) -> Self {
        Self {
            registries,
            deployment_data,
            config: ParserConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn registries(&self) -> &Registries {
        self.registries
    }

    /// Parse a YAML job description for `device`.
    ///
    /// `dispatcher_config` is the dispatcher's own YAML configuration; when
    /// it is a mapping it is exposed to the job as `dispatcher`. `env_dut`
    /// is passed through as `env_dut`.
    ///
    /// # Errors
    ///
    /// Fails on the first problem found: a malformed description, an
    /// unknown action, an action no strategy accepts, or a declared
    /// compatibility the job cannot meet. No partial job is returned.
    pub fn parse(
        &self,
        content: &str,
        device: Arc<Device>,
        job_id: JobId,
        dispatcher_config: Option<&str>,
        env_dut: Option<&str>,
    ) -> Result<Job> {
        let description = JobDescription::from_yaml(content)?;
        self.parse_description(description, device, job_id, dispatcher_config, env_dut)
    }

    /// Build a job from an already-parsed description.
    pub fn parse_description(
        &self,
        description: JobDescription,
        device: Arc<Device>,
        job_id: JobId,
        dispatcher_config: Option<&str>,
        env_dut: Option<&str>,
    ) -> Result<Job> {
        let parameters = job_parameters(&description, dispatcher_config, env_dut)?;
        let protocols = self.registries.protocols.select_all(&parameters, &job_id);

        let timeout = Timeout::new(
            "job",
            description
                .job_timeout
                .unwrap_or(Duration::from_secs(self.config.default_job_timeout_secs)),
        );

        let mut tracker = NamespaceTracker::new();
        self.prescan(&description, &device, &mut tracker)?;

        let mut pipeline = Pipeline::new(self.config.compatibility);
        for entry in &description.actions {
            self.build_action(
                entry,
                description.protocols.as_ref(),
                &device,
                &mut tracker,
                &mut pipeline,
            )?;
        }
        pipeline.add_action(Box::new(FinalizeAction::new()));

        let compatibility = pipeline.compatibility();
        compatibility::check(description.compatibility.as_ref(), compatibility)?;

        tracing::info!(
            job = %job_id,
            device = device.hostname().unwrap_or("unknown"),
            actions = pipeline.len(),
            protocols = protocols.len(),
            compatibility,
            "{} ready",
            timeout
        );

        Ok(Job {
            id: job_id,
            device,
            parameters,
            pipeline,
            protocols,
            test_info: tracker.into_test_info(),
            timeout,
            compatibility,
        })
    }

    /// Score every candidate for each deploy, boot and test action without
    /// building anything.
    pub fn explain(&self, description: &JobDescription, device: &Device) -> Vec<ActionScores> {
        let protocols = description.protocols.as_ref();
        description
            .actions
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                let params = action_parameters(entry, protocols);
                let (scores, selected) = match entry.kind {
                    ActionKind::Deploy => (
                        self.registries.deploy.scores(device, &params),
                        self.registries.deploy.select(device, &params).ok().map(|s| s.name()),
                    ),
                    ActionKind::Boot => (
                        self.registries.boot.scores(device, &params),
                        self.registries.boot.select(device, &params).ok().map(|s| s.name()),
                    ),
                    ActionKind::Test => (
                        self.registries.test.scores(device, &params),
                        self.registries.test.select(device, &params).ok().map(|s| s.name()),
                    ),
                    ActionKind::Command => return None,
                };
                Some(ActionScores {
                    index: i + 1,
                    kind: entry.kind.as_str(),
                    namespace: entry.namespace().to_string(),
                    scores,
                    selected,
                })
            })
            .collect()
    }

    /// Resolve every test action's strategy and record its requirements.
    fn prescan(
        &self,
        description: &JobDescription,
        device: &Device,
        tracker: &mut NamespaceTracker,
    ) -> Result<()> {
        for entry in description.test_actions() {
            let params = action_parameters(entry, description.protocols.as_ref());
            let strategy = self.registries.test.select(device, &params)?;
            tracker.register_test(TestRequirement {
                strategy: strategy.name(),
                needs_deployment_data: strategy.needs_deployment_data(),
                parameters: params,
            });
        }
        Ok(())
    }

    fn build_action(
        &self,
        entry: &ActionSpec,
        protocols: Option<&Parameters>,
        device: &Device,
        tracker: &mut NamespaceTracker,
        pipeline: &mut Pipeline,
    ) -> Result<()> {
        let namespace = entry.namespace();
        tracker.enter(namespace);
        let params = action_parameters(entry, protocols);

        match entry.kind {
            ActionKind::Deploy => {
                let strategy = self.registries.deploy.select(device, &params)?;
                let params = if wants_deployment_data(strategy, &params, tracker) {
                    let os = params.get_str("os").unwrap_or("");
                    let bundle = self.deployment_data.lookup(os);
                    tracing::debug!(namespace, os, keys = bundle.len(), "attached deployment data");
                    params.with(DEPLOYMENT_DATA_KEY, bundle)
                } else {
                    params
                };
                strategy.populate(pipeline, &params)
            }
            ActionKind::Boot => {
                let strategy = self.registries.boot.select(device, &params)?;
                strategy.populate(pipeline, &params)
            }
            ActionKind::Test => {
                let params = params.with(STAGE_KEY, tracker.stage(namespace));
                let strategy = self.registries.test.select(device, &params)?;
                strategy.populate(pipeline, &params)?;
                if strategy.needs_overlay() {
                    tracker.advance_stage(namespace);
                }
                Ok(())
            }
            ActionKind::Command => {
                pipeline.add_action(Box::new(CommandAction::new(params)));
                Ok(())
            }
        }
    }
}

/// The job-wide parameters: the description plus `dispatcher` and `env_dut`.
fn job_parameters(
    description: &JobDescription,
    dispatcher_config: Option<&str>,
    env_dut: Option<&str>,
) -> Result<Parameters> {
    let dispatcher = match dispatcher_config
        .map(serde_yaml::from_str::<Value>)
        .transpose()?
    {
        Some(Value::Object(map)) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };
    let env_dut = env_dut.map_or(Value::Null, |env| Value::String(env.to_string()));

    Ok(description
        .raw
        .with("dispatcher", dispatcher)
        .with("env_dut", env_dut))
}

/// An action's parameter snapshot; strategy-backed actions also see the
/// job's protocol blocks.
fn action_parameters(entry: &ActionSpec, protocols: Option<&Parameters>) -> Parameters {
    match (entry.kind.phase(), protocols) {
        (Some(_), Some(protocols)) => entry.parameters.merged(protocols),
        _ => entry.parameters.clone(),
    }
}

fn wants_deployment_data(
    strategy: &dyn Deployment,
    params: &Parameters,
    tracker: &NamespaceTracker,
) -> bool {
    let needed = tracker.needs_deployment_data(params.namespace())
        || tracker.needs_deployment_data(params.connection_namespace());
    (strategy.uses_deployment_data() && needed) || params.contains_key("preseed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use lf_core::Error;
    use lf_strategy::Verdict;
    use serde_json::json;

    use crate::actions::StepAction;
    use crate::strategies;
    use crate::strategy::TestStrategy;

    fn device() -> Arc<Device> {
        Arc::new(
            Device::from_value(json!({
                "hostname": "qemu01",
                "actions": {
                    "deploy": {"methods": ["tftp", "tmpfs", "fastboot"]},
                    "boot": {"methods": ["qemu", "fastboot"]},
                },
            }))
            .unwrap(),
        )
    }

    fn parse(content: &str) -> Result<Job> {
        JobParser::builtin().parse(content, device(), JobId::from("42"), None, None)
    }

    #[test]
    fn empty_job_is_just_finalize() {
        let job = parse("actions: []\n").unwrap();
        assert_eq!(job.pipeline().names(), vec!["finalize"]);
        assert!(job.test_info().is_empty());
        assert!(job.protocols().is_empty());
        assert_eq!(job.timeout().duration(), Duration::from_secs(86_400));
    }

    #[test]
    fn job_parameters_carry_dispatcher_and_env() {
        let job = JobParser::builtin()
            .parse(
                "job_name: smoke\nactions: []\n",
                device(),
                JobId::from("1"),
                Some("http_proxy: http://proxy:3128\n"),
                Some("{\"LANG\": \"C\"}"),
            )
            .unwrap();
        let params = job.parameters();
        assert_eq!(params.get_str("job_name"), Some("smoke"));
        assert_eq!(
            params.get("dispatcher"),
            Some(&json!({"http_proxy": "http://proxy:3128"}))
        );
        assert_eq!(params.get_str("env_dut"), Some("{\"LANG\": \"C\"}"));
    }

    #[test]
    fn non_mapping_dispatcher_config_is_empty() {
        let job = JobParser::builtin()
            .parse("actions: []\n", device(), JobId::from("1"), Some("- a\n- b\n"), None)
            .unwrap();
        assert_eq!(job.parameters().get("dispatcher"), Some(&json!({})));
        assert_eq!(job.parameters().get("env_dut"), Some(&Value::Null));
    }

    #[test]
    fn malformed_dispatcher_config_is_an_error() {
        let err = JobParser::builtin()
            .parse("actions: []\n", device(), JobId::from("1"), Some("a: ["), None)
            .unwrap_err();
        assert_matches!(err, Error::Yaml(_));
    }

    #[test]
    fn command_actions_use_raw_parameters() {
        let job = parse(
            "protocols: {lava-lxc: {name: c1}}\nactions:\n  - command: {name: power_on}\n",
        )
        .unwrap();
        let command = &job.pipeline().actions()[0];
        assert_eq!(command.name(), "command");
        assert!(!command.parameters().contains_key("lava-lxc"));
        assert_eq!(command.parameters().get_str("name"), Some("power_on"));
    }

    #[test]
    fn protocols_are_merged_into_strategy_parameters() {
        let job = parse(
            r#"
protocols:
  lava-lxc: {name: c1}
actions:
  - boot: {method: qemu}
"#,
        )
        .unwrap();
        let boot = &job.pipeline().actions()[0];
        assert_eq!(boot.parameters().get("lava-lxc"), Some(&json!({"name": "c1"})));
        assert_eq!(job.protocols()[0].name(), "lava-lxc");
    }

    #[test]
    fn configured_default_timeout_and_baseline() {
        let config = ParserConfig {
            compatibility: 2,
            default_job_timeout_secs: 60,
        };
        let job = JobParser::builtin()
            .with_config(config)
            .parse("actions: []\n", device(), JobId::from("1"), None, None)
            .unwrap();
        assert_eq!(job.timeout().duration(), Duration::from_secs(60));
        assert_eq!(job.compatibility(), 2);
    }

    #[test]
    fn fastboot_raises_compatibility() {
        let config = ParserConfig {
            compatibility: 1,
            ..ParserConfig::default()
        };
        let job = JobParser::builtin()
            .with_config(config)
            .parse(
                "compatibility: 4\nactions:\n  - deploy: {to: fastboot, images: {}}\n",
                device(),
                JobId::from("1"),
                None,
                None,
            )
            .unwrap();
        assert_eq!(job.compatibility(), 4);
    }

    /// Test strategy that needs data but no overlay.
    #[derive(Debug)]
    struct Probe;

    impl Capability for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn accepts(&self, _device: &Device, _params: &Parameters) -> Verdict {
            Verdict::Accept
        }
    }

    impl TestStrategy for Probe {
        fn needs_deployment_data(&self) -> bool {
            true
        }

        fn populate(&self, pipeline: &mut Pipeline, params: &Parameters) -> Result<()> {
            pipeline.add_action(Box::new(StepAction::new("probe", "probe", params.clone())));
            Ok(())
        }
    }

    #[test]
    fn private_registries_and_data_source() {
        let mut registries = Registries::new();
        for deployment in strategies::deploy::builtin() {
            registries.register_deploy(deployment);
        }
        registries.register_test(Box::new(Probe));
        let source = |os: &str| Parameters::new().with("shell", format!("{os}-sh"));
        let parser = JobParser::new(&registries, &source);

        let job = parser
            .parse(
                "actions:\n  - deploy: {to: tmpfs, images: {}, os: oe}\n  - test: {}\n  - test: {}\n",
                device(),
                JobId::from("5"),
                None,
                None,
            )
            .unwrap();

        let deploy = &job.pipeline().actions()[0];
        assert_eq!(
            deploy.parameters().get("deployment_data"),
            Some(&json!({"shell": "oe-sh"}))
        );
        // Probe needs no overlay, so both tests stay on stage 0.
        let stages: Vec<_> = job.pipeline().actions()[1..3]
            .iter()
            .map(|a| a.parameters().get("stage").cloned())
            .collect();
        assert_eq!(stages, vec![Some(json!(0)), Some(json!(0))]);
    }

    #[test]
    fn explain_scores_each_strategy_action() {
        let description = JobDescription::from_yaml(
            r#"
protocols:
  lava-multinode: {role: host}
actions:
  - deploy: {to: tftp}
  - command: {name: power_on}
  - test: {definitions: []}
  - boot: {method: u-boot}
"#,
        )
        .unwrap();
        let report = JobParser::builtin().explain(&description, &device());
        assert_eq!(report.len(), 3);

        assert_eq!(report[0].index, 1);
        assert_eq!(report[0].kind, "deploy");
        assert_eq!(report[0].selected, Some("tftp"));

        assert_eq!(report[1].index, 3);
        assert_eq!(report[1].selected, Some("multinode-test-shell"));
        let shell = report[1]
            .scores
            .iter()
            .find(|s| s.name == "lava-test-shell")
            .unwrap();
        assert_eq!(shell.score, 1);

        assert_eq!(report[2].kind, "boot");
        assert_eq!(report[2].selected, None);
        assert!(report[2].scores.iter().all(|s| s.score == 0));
    }

    #[test]
    fn empty_registry_reports_no_candidates() {
        let registries = Registries::new();
        let parser = JobParser::new(&registries, &BuiltinDeploymentData);
        let err = parser
            .parse("actions:\n  - boot: {method: qemu}\n", device(), JobId::from("1"), None, None)
            .unwrap_err();
        assert_matches!(
            err,
            Error::NoStrategyMatch { ref phase, ref reasons }
                if phase == "boot" && reasons == "no candidates are registered"
        );
    }
}
