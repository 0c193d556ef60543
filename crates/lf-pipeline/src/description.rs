//! Job descriptions: the YAML document a submitter writes.
//!
//! ```yaml
//! timeouts:
//!   job: {minutes: 30}
//! compatibility: 4
//! protocols:
//!   lava-multinode: {role: server}
//! actions:
//!   - deploy: {to: tftp, kernel: {url: http://example.com/zImage}}
//!   - boot: {method: u-boot, commands: ramdisk}
//!   - test: {definitions: [...]}
//! ```
//!
//! Parsing checks structure only. Every action gets its namespace filled in
//! here, before the parser sees it.

use std::str::FromStr;
use std::time::Duration;

use lf_core::params::NAMESPACE_KEY;
use lf_core::{Error, Parameters, Result, Timeout, DEFAULT_NAMESPACE};
use lf_strategy::Phase;
use serde_json::Value;

/// The closed set of action keys a description may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Deploy,
    Boot,
    Test,
    Command,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Deploy => "deploy",
            ActionKind::Boot => "boot",
            ActionKind::Test => "test",
            ActionKind::Command => "command",
        }
    }

    /// The strategy phase this kind resolves through, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            ActionKind::Deploy => Some(Phase::Deploy),
            ActionKind::Boot => Some(Phase::Boot),
            ActionKind::Test => Some(Phase::Test),
            ActionKind::Command => None,
        }
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deploy" => Ok(ActionKind::Deploy),
            "boot" => Ok(ActionKind::Boot),
            "test" => Ok(ActionKind::Test),
            "command" => Ok(ActionKind::Command),
            other => Err(Error::unknown_action(other)),
        }
    }
}

/// One entry of the `actions` list.
#[derive(Debug, Clone)]
pub struct ActionSpec {
    pub kind: ActionKind,
    /// Parameters as written, with `namespace` filled in.
    pub parameters: Parameters,
}

impl ActionSpec {
    pub fn namespace(&self) -> &str {
        self.parameters.namespace()
    }
}

/// A parsed job description.
#[derive(Debug, Clone)]
pub struct JobDescription {
    pub actions: Vec<ActionSpec>,
    /// The top-level `protocols` mapping, if declared.
    pub protocols: Option<Parameters>,
    /// Override of the overall job timeout (`timeouts.job`).
    pub job_timeout: Option<Duration>,
    /// The declared `compatibility`, validated later against the job.
    pub compatibility: Option<Value>,
    /// The whole document.
    pub raw: Parameters,
}

impl JobDescription {
    /// Parse a description from YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| Error::invalid_job(format!("job description is not valid YAML: {e}")))?;
        Self::from_value(value)
    }

    /// Build a description from an already-parsed document.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownAction`] for an action key outside
    /// deploy/boot/test/command, [`Error::InvalidTimeout`] for a malformed
    /// `timeouts.job`, and [`Error::InvalidJob`] for any other structural
    /// problem.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw = Parameters::from_value(value)
            .ok_or_else(|| Error::invalid_job("job description must be a mapping"))?;

        let entries = match raw.get("actions") {
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(Error::invalid_job("'actions' must be a list")),
            None => return Err(Error::invalid_job("'actions' is required")),
        };
        let actions = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_entry(index, entry))
            .collect::<Result<Vec<_>>>()?;

        let protocols = match raw.get("protocols") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                Parameters::from_value(value.clone())
                    .ok_or_else(|| Error::invalid_job("'protocols' must be a mapping"))?,
            ),
        };

        let job_timeout = match raw.get("timeouts") {
            None | Some(Value::Null) => None,
            Some(Value::Object(timeouts)) => timeouts.get("job").map(Timeout::parse).transpose()?,
            Some(_) => return Err(Error::invalid_job("'timeouts' must be a mapping")),
        };

        let compatibility = raw.get("compatibility").cloned();

        Ok(Self {
            actions,
            protocols,
            job_timeout,
            compatibility,
            raw,
        })
    }

    /// Test actions in declaration order.
    pub fn test_actions(&self) -> impl Iterator<Item = &ActionSpec> {
        self.actions
            .iter()
            .filter(|entry| entry.kind == ActionKind::Test)
    }
}

fn parse_entry(index: usize, entry: &Value) -> Result<ActionSpec> {
    let map = match entry {
        Value::Object(map) if map.len() == 1 => map,
        _ => {
            return Err(Error::invalid_job(format!(
                "actions[{index}] must be a mapping with exactly one key"
            )))
        }
    };
    let Some((key, body)) = map.iter().next() else {
        return Err(Error::invalid_job(format!("actions[{index}] is empty")));
    };
    let kind: ActionKind = key.parse()?;

    let parameters = match body {
        Value::Null => Parameters::new(),
        other => Parameters::from_value(other.clone()).ok_or_else(|| {
            Error::invalid_job(format!("actions[{index}].{key} must be a mapping"))
        })?,
    };

    let parameters = match parameters.get(NAMESPACE_KEY) {
        None => parameters.with(NAMESPACE_KEY, DEFAULT_NAMESPACE),
        Some(Value::String(_)) => parameters,
        Some(_) => {
            return Err(Error::invalid_job(format!(
                "actions[{index}].{key}.namespace must be a string"
            )))
        }
    };

    Ok(ActionSpec { kind, parameters })
}
