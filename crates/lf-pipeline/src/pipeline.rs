//! The [`Pipeline`]: the ordered actions of one job.

use crate::action::{Action, ActionSummary};

/// Append-only ordered list of actions.
///
/// A pipeline is owned by the job being built and is only ever extended;
/// actions are never reordered or removed.
#[derive(Debug)]
pub struct Pipeline {
    actions: Vec<Box<dyn Action>>,
    compatibility: u32,
}

impl Pipeline {
    /// Create an empty pipeline whose compatibility starts at `baseline`.
    pub fn new(baseline: u32) -> Self {
        Self {
            actions: Vec::new(),
            compatibility: baseline,
        }
    }

    /// Append an action, raising the compatibility level if needed.
    pub fn add_action(&mut self, action: Box<dyn Action>) {
        self.compatibility = self.compatibility.max(action.compatibility());
        tracing::debug!(
            level = self.actions.len() + 1,
            action = action.name(),
            namespace = action.namespace(),
            "added action"
        );
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Box<dyn Action>] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn last(&self) -> Option<&dyn Action> {
        self.actions.last().map(|a| &**a)
    }

    /// Action names in pipeline order.
    pub fn names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Highest compatibility level among the baseline and all actions.
    pub fn compatibility(&self) -> u32 {
        self.compatibility
    }

    /// Describe every action with its 1-based level.
    pub fn describe(&self) -> Vec<ActionSummary> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, action)| ActionSummary {
                level: i + 1,
                name: action.name(),
                description: action.description(),
                namespace: action.namespace().to_string(),
                parameters: action.parameters().clone(),
            })
            .collect()
    }
}
