//! Deployment methods, keyed by the `to` parameter.

use lf_core::{Device, Parameters, Result};
use lf_strategy::{Capability, Verdict};

use crate::actions::StepAction;
use crate::pipeline::Pipeline;
use crate::strategy::Deployment;

/// A deployment selected when `to` names it and the device supports it.
#[derive(Debug, Clone, Copy)]
pub struct DeployMethod {
    pub name: &'static str,
    required: &'static [&'static str],
    uses_deployment_data: bool,
    action: &'static str,
    description: &'static str,
    compatibility: u32,
}

pub const TFTP: DeployMethod = DeployMethod {
    name: "tftp",
    required: &[],
    uses_deployment_data: true,
    action: "tftp-deploy",
    description: "download files and deploy using tftp",
    compatibility: 1,
};

pub const NBD: DeployMethod = DeployMethod {
    name: "nbd",
    required: &["kernel", "initrd", "nbdroot"],
    uses_deployment_data: true,
    action: "nbd-deploy",
    description: "download files and deploy for using tftp+initrd+nbd",
    compatibility: 1,
};

pub const TMPFS: DeployMethod = DeployMethod {
    name: "tmpfs",
    required: &["images"],
    uses_deployment_data: true,
    action: "deployimages",
    description: "deploy images using guestfs",
    compatibility: 1,
};

pub const FASTBOOT: DeployMethod = DeployMethod {
    name: "fastboot",
    required: &["images"],
    uses_deployment_data: false,
    action: "fastboot-deploy",
    description: "download files and deploy using fastboot",
    compatibility: 4,
};

pub const OVERLAY: DeployMethod = DeployMethod {
    name: "overlay",
    required: &[],
    uses_deployment_data: true,
    action: "overlay-deploy",
    description: "add an overlay to the device",
    compatibility: 1,
};

/// Built-in deployments in registration order.
pub fn builtin() -> Vec<Box<dyn Deployment>> {
    vec![
        Box::new(TFTP),
        Box::new(NBD),
        Box::new(TMPFS),
        Box::new(FASTBOOT),
        Box::new(OVERLAY),
    ]
}

impl Capability for DeployMethod {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, device: &Device, params: &Parameters) -> Verdict {
        let to = params.get_str("to");
        Verdict::require(to == Some(self.name), || {
            format!("'to' is '{}', not '{}'", to.unwrap_or("unset"), self.name)
        })
        .and_then(|| {
            Verdict::require(device.has_deploy_method(self.name), || {
                format!("device does not support deploy to '{}'", self.name)
            })
        })
        .and_then(|| super::missing_parameter(params, self.required))
    }
}

impl Deployment for DeployMethod {
    fn uses_deployment_data(&self) -> bool {
        self.uses_deployment_data
    }

    fn populate(&self, pipeline: &mut Pipeline, params: &Parameters) -> Result<()> {
        pipeline.add_action(Box::new(
            StepAction::new(self.action, self.description, params.clone())
                .with_compatibility(self.compatibility),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device(methods: &[&str]) -> Device {
        Device::from_value(json!({"actions": {"deploy": {"methods": methods}}})).unwrap()
    }

    fn params(value: serde_json::Value) -> Parameters {
        Parameters::from_value(value).unwrap()
    }

    #[test]
    fn tftp_accepts_matching_job_and_device() {
        let p = params(json!({"to": "tftp", "kernel": {"url": "http://x/zImage"}}));
        assert_eq!(TFTP.accepts(&device(&["tftp"]), &p), Verdict::Accept);
        assert_eq!(TFTP.score(&device(&["tftp"]), &p), 1);
    }

    #[test]
    fn rejects_other_to() {
        let p = params(json!({"to": "nbd"}));
        assert_eq!(
            TFTP.accepts(&device(&["tftp"]), &p),
            Verdict::reject("'to' is 'nbd', not 'tftp'")
        );
    }

    #[test]
    fn rejects_unsupported_device() {
        let p = params(json!({"to": "tftp", "kernel": {}}));
        assert!(!TFTP.accepts(&device(&["nbd"]), &p).is_accepted());
    }

    #[test]
    fn nbd_requires_all_images() {
        let p = params(json!({"to": "nbd", "kernel": {}, "initrd": {}}));
        assert_eq!(
            NBD.accepts(&device(&["nbd"]), &p),
            Verdict::reject("missing required parameter 'nbdroot'")
        );
    }

    #[test]
    fn fastboot_does_not_use_deployment_data() {
        assert!(!FASTBOOT.uses_deployment_data());
        assert!(TFTP.uses_deployment_data());
    }

    #[test]
    fn populate_appends_one_step() {
        let mut pipeline = Pipeline::new(1);
        let p = params(json!({"to": "fastboot", "images": {}}));
        FASTBOOT.populate(&mut pipeline, &p).unwrap();
        assert_eq!(pipeline.names(), vec!["fastboot-deploy"]);
        assert_eq!(pipeline.compatibility(), 4);
    }
}
