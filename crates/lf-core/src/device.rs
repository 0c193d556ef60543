//! Opaque device profile.
//!
//! The device schema belongs to the lab's device dictionary tooling. The
//! parser never interprets it: capability predicates read whatever they need
//! through the small set of helpers below.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::params::Parameters;

/// Capability descriptor of the device a job will run on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Device(Parameters);

impl Device {
    /// Parse a device profile from YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| Error::InvalidDevice(format!("device profile is not valid YAML: {e}")))?;
        Self::from_value(value)
    }

    /// Wrap an already-parsed profile; it must be a mapping.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            other => Parameters::from_value(other)
                .map(Self)
                .ok_or_else(|| Error::InvalidDevice("device profile must be a mapping".into())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.0.get_str("hostname")
    }

    pub fn device_type(&self) -> Option<&str> {
        self.0.get_str("device_type")
    }

    /// Deployment methods listed under `actions.deploy.methods`.
    pub fn deploy_methods(&self) -> Vec<&str> {
        self.methods("deploy")
    }

    /// Boot methods listed under `actions.boot.methods`.
    pub fn boot_methods(&self) -> Vec<&str> {
        self.methods("boot")
    }

    pub fn has_deploy_method(&self, method: &str) -> bool {
        self.deploy_methods().iter().any(|m| *m == method)
    }

    pub fn has_boot_method(&self, method: &str) -> bool {
        self.boot_methods().iter().any(|m| *m == method)
    }

    // Device dictionaries list methods either as a mapping keyed by method
    // name, a list of names, or a list of single-key mappings.
    fn methods(&self, phase: &str) -> Vec<&str> {
        let methods = self
            .0
            .get("actions")
            .and_then(|actions| actions.get(phase))
            .and_then(|section| section.get("methods"));

        match methods {
            Some(Value::Object(map)) => map.keys().map(String::as_str).collect(),
            Some(Value::Array(items)) => items
                .iter()
                .flat_map(|item| match item {
                    Value::String(name) => vec![name.as_str()],
                    Value::Object(map) => map.keys().map(String::as_str).collect(),
                    _ => Vec::new(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const QEMU_DEVICE: &str = r#"
hostname: qemu01
device_type: qemu
actions:
  deploy:
    methods:
      tmpfs: {}
      overlay: {}
  boot:
    methods:
      - qemu:
          parameters:
            command: qemu-system-x86_64
      - qemu-nfs: {}
"#;

    #[test]
    fn reads_identity_fields() {
        let device = Device::from_yaml(QEMU_DEVICE).unwrap();
        assert_eq!(device.hostname(), Some("qemu01"));
        assert_eq!(device.device_type(), Some("qemu"));
    }

    #[test]
    fn deploy_methods_from_mapping() {
        let device = Device::from_yaml(QEMU_DEVICE).unwrap();
        assert!(device.has_deploy_method("tmpfs"));
        assert!(device.has_deploy_method("overlay"));
        assert!(!device.has_deploy_method("tftp"));
    }

    #[test]
    fn boot_methods_from_list_of_mappings() {
        let device = Device::from_yaml(QEMU_DEVICE).unwrap();
        assert_eq!(device.boot_methods(), vec!["qemu", "qemu-nfs"]);
    }

    #[test]
    fn methods_from_plain_list() {
        let device = Device::from_yaml(
            "actions:\n  deploy:\n    methods: [tftp, nbd]\n  boot:\n    methods: [u-boot]\n",
        )
        .unwrap();
        assert_eq!(device.deploy_methods(), vec!["tftp", "nbd"]);
        assert!(device.has_boot_method("u-boot"));
    }

    #[test]
    fn missing_actions_means_no_methods() {
        let device = Device::from_yaml("hostname: bare").unwrap();
        assert!(device.deploy_methods().is_empty());
        assert!(device.boot_methods().is_empty());
    }

    #[test]
    fn non_mapping_is_rejected() {
        assert_matches!(Device::from_yaml("- a\n- b\n"), Err(Error::InvalidDevice(_)));
    }
}
