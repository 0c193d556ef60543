//! Boot methods, keyed by the `method` parameter.

use lf_core::{Device, Parameters, Result};
use lf_strategy::{Capability, Verdict};

use crate::actions::StepAction;
use crate::pipeline::Pipeline;
use crate::strategy::Boot;

/// A boot selected when `method` is one of its spellings and the device
/// lists it under `actions.boot.methods`.
#[derive(Debug, Clone, Copy)]
pub struct BootMethod {
    pub name: &'static str,
    methods: &'static [&'static str],
    required: &'static [&'static str],
    action: &'static str,
    description: &'static str,
    compatibility: u32,
}

pub const QEMU: BootMethod = BootMethod {
    name: "qemu",
    methods: &["qemu", "qemu-nfs", "qemu-iso"],
    required: &[],
    action: "boot-image-retry",
    description: "boot an image using QEMU",
    compatibility: 1,
};

pub const UBOOT: BootMethod = BootMethod {
    name: "u-boot",
    methods: &["u-boot"],
    required: &["commands"],
    action: "uboot-action",
    description: "interactive uboot action",
    compatibility: 1,
};

pub const FASTBOOT: BootMethod = BootMethod {
    name: "fastboot",
    methods: &["fastboot"],
    required: &[],
    action: "fastboot-boot",
    description: "fastboot boot into the system",
    compatibility: 4,
};

pub const MINIMAL: BootMethod = BootMethod {
    name: "minimal",
    methods: &["minimal"],
    required: &[],
    action: "minimal-boot",
    description: "connect and reset device",
    compatibility: 1,
};

/// Built-in boot methods in registration order.
pub fn builtin() -> Vec<Box<dyn Boot>> {
    vec![
        Box::new(QEMU),
        Box::new(UBOOT),
        Box::new(FASTBOOT),
        Box::new(MINIMAL),
    ]
}

impl Capability for BootMethod {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, device: &Device, params: &Parameters) -> Verdict {
        let method = params.get_str("method");
        let known = method.is_some_and(|m| self.methods.iter().any(|k| *k == m));
        Verdict::require(known, || {
            format!(
                "'method' is '{}', not one of {:?}",
                method.unwrap_or("unset"),
                self.methods
            )
        })
        .and_then(|| {
            Verdict::require(device.has_boot_method(self.name), || {
                format!("device does not support boot method '{}'", self.name)
            })
        })
        .and_then(|| super::missing_parameter(params, self.required))
    }
}

impl Boot for BootMethod {
    fn populate(&self, pipeline: &mut Pipeline, params: &Parameters) -> Result<()> {
        pipeline.add_action(Box::new(
            StepAction::new(self.action, self.description, params.clone())
                .with_compatibility(self.compatibility),
        ));
        Ok(())
    }
}
