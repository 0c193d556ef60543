//! Strategy registries and their one-time bootstrap.
//!
//! [`init`] fills the process-wide [`Registries`] with the built-in
//! strategies; after that the registries are only ever read. Tests and
//! embedders that need a different set build their own with
//! [`Registries::new`] and the `register_*` methods, then hand it to a
//! [`JobParser`](crate::JobParser).

use std::sync::OnceLock;

use lf_strategy::{Phase, ProtocolCandidate, ProtocolRegistry, StrategyRegistry};

use crate::strategies;
use crate::strategy::{Boot, Deployment, TestStrategy};

/// One registry per phase plus the protocol candidates.
#[derive(Debug)]
pub struct Registries {
    pub deploy: StrategyRegistry<dyn Deployment>,
    pub boot: StrategyRegistry<dyn Boot>,
    pub test: StrategyRegistry<dyn TestStrategy>,
    pub protocols: ProtocolRegistry,
}

impl Registries {
    /// Empty registries.
    pub fn new() -> Self {
        Self {
            deploy: StrategyRegistry::new(Phase::Deploy),
            boot: StrategyRegistry::new(Phase::Boot),
            test: StrategyRegistry::new(Phase::Test),
            protocols: ProtocolRegistry::new(),
        }
    }

    /// Registries holding every built-in strategy and protocol.
    pub fn builtin() -> Self {
        let mut registries = Self::new();
        for deployment in strategies::deploy::builtin() {
            registries.register_deploy(deployment);
        }
        for boot in strategies::boot::builtin() {
            registries.register_boot(boot);
        }
        for test in strategies::test::builtin() {
            registries.register_test(test);
        }
        for protocol in strategies::protocols::builtin() {
            registries.register_protocol(protocol);
        }
        registries
    }

    pub fn register_deploy(&mut self, strategy: Box<dyn Deployment>) -> &mut Self {
        self.deploy.register(strategy);
        self
    }

    pub fn register_boot(&mut self, strategy: Box<dyn Boot>) -> &mut Self {
        self.boot.register(strategy);
        self
    }

    pub fn register_test(&mut self, strategy: Box<dyn TestStrategy>) -> &mut Self {
        self.test.register(strategy);
        self
    }

    pub fn register_protocol(&mut self, candidate: Box<dyn ProtocolCandidate>) -> &mut Self {
        self.protocols.register(candidate);
        self
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRIES: OnceLock<Registries> = OnceLock::new();

/// Populate the process-wide registries with the built-ins.
///
/// Later calls return the instance created by the first.
pub fn init() -> &'static Registries {
    REGISTRIES.get_or_init(|| {
        let registries = Registries::builtin();
        tracing::debug!(
            deploy = registries.deploy.len(),
            boot = registries.boot.len(),
            test = registries.test.len(),
            protocols = registries.protocols.len(),
            "registered built-in strategies"
        );
        registries
    })
}

/// The process-wide registries, initialised on first use.
pub fn registries() -> &'static Registries {
    init()
}
