//! The [`Capability`] trait every strategy candidate implements.

use std::borrow::Cow;

use lf_core::{Device, Parameters};

/// Outcome of a capability predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    /// The candidate cannot handle this device/parameter combination.
    Reject(Cow<'static, str>),
}

impl Verdict {
    pub fn reject(reason: impl Into<Cow<'static, str>>) -> Self {
        Verdict::Reject(reason.into())
    }

    /// Accept when `condition` holds, otherwise reject with `reason()`.
    pub fn require(condition: bool, reason: impl FnOnce() -> String) -> Self {
        if condition {
            Verdict::Accept
        } else {
            Verdict::Reject(Cow::Owned(reason()))
        }
    }

    /// Chain a further check onto an accepted verdict.
    #[must_use]
    pub fn and_then(self, next: impl FnOnce() -> Verdict) -> Self {
        match self {
            Verdict::Accept => next(),
            rejected => rejected,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// A candidate implementation registered for a phase.
///
/// Candidates are stateless: the registry holds one instance per
/// implementation for the lifetime of the process, and phase-specific traits
/// built on top of this one add the behaviour that runs once selected.
pub trait Capability: Send + Sync {
    /// Short, stable name used in logs and diagnostics (e.g. `"tftp"`).
    fn name(&self) -> &'static str;

    /// Declared priority; higher wins among accepting candidates.
    fn priority(&self) -> u32 {
        1
    }

    /// Decide whether this candidate can handle the device and parameters.
    fn accepts(&self, device: &Device, params: &Parameters) -> Verdict;

    /// Effective priority for selection: the declared priority when
    /// accepted, 0 otherwise.
    fn score(&self, device: &Device, params: &Parameters) -> u32 {
        match self.accepts(device, params) {
            Verdict::Accept => self.priority(),
            Verdict::Reject(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Picky;

    impl Capability for Picky {
        fn name(&self) -> &'static str {
            "picky"
        }

        fn priority(&self) -> u32 {
            7
        }

        fn accepts(&self, _device: &Device, params: &Parameters) -> Verdict {
            Verdict::require(params.contains_key("kernel"), || "needs a kernel".into())
        }
    }

    #[test]
    fn score_is_priority_when_accepted() {
        let params = Parameters::new().with("kernel", "zImage");
        assert_eq!(Picky.score(&Device::default(), &params), 7);
    }

    #[test]
    fn score_is_zero_when_rejected() {
        assert_eq!(Picky.score(&Device::default(), &Parameters::new()), 0);
    }

    #[test]
    fn and_then_short_circuits_on_reject() {
        let v = Verdict::reject("first").and_then(|| panic!("must not run"));
        assert_eq!(v, Verdict::reject("first"));

        let v = Verdict::Accept.and_then(|| Verdict::reject("second"));
        assert_eq!(v, Verdict::reject("second"));
    }
}
