//! OS-specific deployment data.
//!
//! Test shells need to know how to talk to the deployed system: which shell
//! to run, where the test overlay lives, what the prompt looks like. Those
//! settings depend on the OS being deployed and are looked up by the `os`
//! parameter of the deploy action.

use lf_core::Parameters;
use serde_json::{json, Value};

/// Source of OS-specific settings bundles.
pub trait DeploymentDataSource: Send + Sync {
    /// Return the bundle for `os`; unknown identifiers yield an empty bundle.
    fn lookup(&self, os: &str) -> Parameters;
}

impl<F> DeploymentDataSource for F
where
    F: Fn(&str) -> Parameters + Send + Sync,
{
    fn lookup(&self, os: &str) -> Parameters {
        self(os)
    }
}

/// The bundles shipped with labforge.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDeploymentData;

/// OS identifiers [`BuiltinDeploymentData`] knows about.
pub const KNOWN_OS: &[&str] = &[
    "android",
    "centos",
    "centos_installer",
    "debian",
    "debian_installer",
    "fedora",
    "oe",
    "slackware",
    "ubuntu",
];

impl DeploymentDataSource for BuiltinDeploymentData {
    fn lookup(&self, os: &str) -> Parameters {
        let bundle = match os {
            "android" => android(),
            "debian" | "ubuntu" | "centos" | "fedora" => shell("/bin/bash", "~/.bashrc"),
            "oe" | "slackware" => shell("/bin/sh", "~/.profile"),
            "debian_installer" => installer("/bin/sh", "preseed"),
            "centos_installer" => installer("/bin/bash", "kickstart"),
            other => {
                tracing::warn!(os = other, "no deployment data for OS; using an empty bundle");
                return Parameters::new();
            }
        };
        Parameters::from_value(bundle).unwrap_or_default()
    }
}

fn shell(sh: &str, shell_file: &str) -> Value {
    json!({
        "TESTER_PS1": "linaro-test [rc=$(echo \\$?)]# ",
        "TESTER_PS1_PATTERN": "linaro-test \\[rc=(\\d+)\\]# ",
        "TESTER_PS1_INCLUDES_RC": true,
        "boot_cmds": "boot_cmds",
        "line_separator": "\n",
        "lava_test_sh_cmd": sh,
        "lava_test_dir": "/lava-%s",
        "lava_test_results_part_attr": "root_part",
        "lava_test_results_dir": "/lava-%s",
        "lava_test_shell_file": shell_file,
    })
}

fn installer(sh: &str, installer_kind: &str) -> Value {
    let mut bundle = shell(sh, "~/.bashrc");
    bundle["installer_kind"] = json!(installer_kind);
    bundle["preseed_to_ramdisk"] = json!(installer_kind == "preseed");
    bundle
}

fn android() -> Value {
    json!({
        "TESTER_PS1": "root@linaro# ",
        "TESTER_PS1_PATTERN": "root@linaro# ",
        "TESTER_PS1_INCLUDES_RC": false,
        "boot_cmds": "boot_cmds_android",
        "line_separator": "\n",
        "lava_test_sh_cmd": "/system/bin/sh",
        "lava_test_dir": "/data/local/tmp/lava-%s",
        "lava_test_results_part_attr": "data_part_android_org",
        "lava_test_results_dir": "/data/local/tmp/lava-%s",
        "lava_test_shell_file": null,
    })
}
