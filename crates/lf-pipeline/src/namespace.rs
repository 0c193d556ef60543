//! Per-namespace state threaded through pipeline construction.
//!
//! A namespace groups the deploy/boot/test actions aimed at one target
//! (the DUT, an LXC companion, a second board). The tracker holds, per
//! namespace, the stage counter used to number successive test overlays and
//! the test requirements registered by the pre-scan, which deploy actions
//! consult to decide whether OS-specific deployment data is needed.

use std::collections::{BTreeMap, HashMap};

use lf_core::Parameters;
use serde::Serialize;

/// What a test action in a namespace needs from the deployment before it.
#[derive(Debug, Clone, Serialize)]
pub struct TestRequirement {
    /// Name of the test strategy resolved for the action.
    pub strategy: &'static str,
    pub needs_deployment_data: bool,
    pub parameters: Parameters,
}

/// Stage counters and test requirements, keyed by namespace.
#[derive(Debug, Default)]
pub struct NamespaceTracker {
    // Counters start at 1; the exposed stage is `counter - 1`.
    counters: HashMap<String, u32>,
    test_info: BTreeMap<String, Vec<TestRequirement>>,
}

impl NamespaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `namespace` if it has not been seen yet.
    pub fn enter(&mut self, namespace: &str) {
        self.counters.entry(namespace.to_string()).or_insert(1);
    }

    /// Current test stage of `namespace` (0 for an unseen namespace).
    pub fn stage(&self, namespace: &str) -> u32 {
        self.counters
            .get(namespace)
            .map_or(0, |counter| counter.saturating_sub(1))
    }

    /// Move `namespace` to its next stage.
    pub fn advance_stage(&mut self, namespace: &str) {
        *self.counters.entry(namespace.to_string()).or_insert(1) += 1;
    }

    /// Record a test requirement under its namespace and, when it differs,
    /// its connection namespace.
    pub fn register_test(&mut self, requirement: TestRequirement) {
        let namespace = requirement.parameters.namespace().to_string();
        let connection = requirement.parameters.connection_namespace().to_string();

        if connection != namespace {
            self.test_info
                .entry(connection)
                .or_default()
                .push(requirement.clone());
        }
        self.test_info.entry(namespace).or_default().push(requirement);
    }

    /// Requirements registered under `namespace`, in registration order.
    pub fn requirements(&self, namespace: &str) -> &[TestRequirement] {
        self.test_info
            .get(namespace)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether any test registered under `namespace` needs deployment data.
    pub fn needs_deployment_data(&self, namespace: &str) -> bool {
        self.requirements(namespace)
            .iter()
            .any(|requirement| requirement.needs_deployment_data)
    }

    pub fn test_info(&self) -> &BTreeMap<String, Vec<TestRequirement>> {
        &self.test_info
    }

    pub fn into_test_info(self) -> BTreeMap<String, Vec<TestRequirement>> {
        self.test_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn requirement(params: serde_json::Value, needs_data: bool) -> TestRequirement {
        TestRequirement {
            strategy: "lava-test-shell",
            needs_deployment_data: needs_data,
            parameters: Parameters::from_value(params).unwrap(),
        }
    }

    #[test]
    fn fresh_namespace_starts_at_stage_zero() {
        let mut tracker = NamespaceTracker::new();
        tracker.enter("common");
        assert_eq!(tracker.stage("common"), 0);
        assert_eq!(tracker.stage("unseen"), 0);
    }

    #[test]
    fn enter_does_not_reset_counter() {
        let mut tracker = NamespaceTracker::new();
        tracker.enter("common");
        tracker.advance_stage("common");
        tracker.enter("common");
        assert_eq!(tracker.stage("common"), 1);
    }

    #[test]
    fn stages_are_independent_per_namespace() {
        let mut tracker = NamespaceTracker::new();
        tracker.enter("host");
        tracker.enter("guest");
        tracker.advance_stage("host");
        tracker.advance_stage("host");
        assert_eq!(tracker.stage("host"), 2);
        assert_eq!(tracker.stage("guest"), 0);
    }

    #[test]
    fn requirement_without_namespace_goes_to_common() {
        let mut tracker = NamespaceTracker::new();
        tracker.register_test(requirement(json!({"definitions": []}), true));
        assert_eq!(tracker.requirements("common").len(), 1);
        assert_eq!(tracker.test_info().len(), 1);
    }

    #[test]
    fn connection_namespace_gets_a_copy() {
        let mut tracker = NamespaceTracker::new();
        tracker.register_test(requirement(
            json!({"namespace": "guest", "connection-namespace": "host"}),
            true,
        ));
        assert_eq!(tracker.requirements("guest").len(), 1);
        assert_eq!(tracker.requirements("host").len(), 1);
        assert!(tracker.needs_deployment_data("host"));
    }

    #[test]
    fn same_connection_namespace_is_not_duplicated() {
        let mut tracker = NamespaceTracker::new();
        tracker.register_test(requirement(
            json!({"namespace": "guest", "connection-namespace": "guest"}),
            false,
        ));
        assert_eq!(tracker.requirements("guest").len(), 1);
        assert_eq!(tracker.test_info().len(), 1);
    }

    #[test]
    fn requirements_accumulate() {
        let mut tracker = NamespaceTracker::new();
        tracker.register_test(requirement(json!({"monitors": []}), false));
        assert!(!tracker.needs_deployment_data("common"));
        tracker.register_test(requirement(json!({"definitions": []}), true));
        assert_eq!(tracker.requirements("common").len(), 2);
        assert!(tracker.needs_deployment_data("common"));
    }
}
