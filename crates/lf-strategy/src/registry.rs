//! The [`StrategyRegistry`] holds the candidates for one phase and selects
//! the best match for a device and parameter snapshot.

use std::fmt;

use lf_core::{Device, Error, Parameters, Result};
use serde::Serialize;

use crate::capability::{Capability, Verdict};
use crate::phase::Phase;

/// Ordered candidates for a single phase.
///
/// Registration order is significant: when several candidates accept at the
/// same priority, the one registered first wins.
pub struct StrategyRegistry<S: ?Sized> {
    phase: Phase,
    candidates: Vec<Box<S>>,
}

/// How one candidate scored against a device and parameters.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    pub name: &'static str,
    pub priority: u32,
    /// Effective score; 0 means the candidate rejected.
    pub score: u32,
    /// Rejection reason, if any.
    pub reason: Option<String>,
}

impl<S: ?Sized + Capability> StrategyRegistry<S> {
    /// Create an empty registry for `phase`.
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            candidates: Vec::new(),
        }
    }

    /// Append a candidate. Later registrations lose priority ties.
    pub fn register(&mut self, candidate: Box<S>) -> &mut Self {
        self.candidates.push(candidate);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterate over candidates in registration order.
    pub fn candidates(&self) -> impl Iterator<Item = &S> {
        self.candidates.iter().map(|c| &**c)
    }

    /// Score every candidate, in registration order.
    pub fn scores(&self, device: &Device, params: &Parameters) -> Vec<CandidateScore> {
        self.candidates()
            .map(|candidate| {
                let priority = candidate.priority();
                match candidate.accepts(device, params) {
                    Verdict::Accept if priority > 0 => CandidateScore {
                        name: candidate.name(),
                        priority,
                        score: priority,
                        reason: None,
                    },
                    Verdict::Accept => CandidateScore {
                        name: candidate.name(),
                        priority,
                        score: 0,
                        reason: Some("declared priority is 0".into()),
                    },
                    Verdict::Reject(reason) => CandidateScore {
                        name: candidate.name(),
                        priority,
                        score: 0,
                        reason: Some(reason.into_owned()),
                    },
                }
            })
            .collect()
    }

    /// Return the accepting candidate with the highest priority.
    ///
    /// Ties go to the first-registered candidate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoStrategyMatch`] when every candidate scores 0; the
    /// message lists each candidate's rejection reason.
    pub fn select(&self, device: &Device, params: &Parameters) -> Result<&S> {
        let mut best: Option<(&S, u32)> = None;
        let mut reasons = Vec::new();

        for (candidate, score) in self.candidates().zip(self.scores(device, params)) {
            if score.score == 0 {
                let reason = score.reason.unwrap_or_default();
                tracing::trace!(
                    phase = %self.phase,
                    candidate = score.name,
                    "rejected: {reason}"
                );
                reasons.push(format!("{}: {reason}", score.name));
                continue;
            }
            // Strictly greater: an equal score never displaces an earlier candidate.
            if best.map_or(true, |(_, top)| score.score > top) {
                best = Some((candidate, score.score));
            }
        }

        match best {
            Some((candidate, score)) => {
                tracing::debug!(
                    phase = %self.phase,
                    strategy = candidate.name(),
                    priority = score,
                    "selected strategy"
                );
                Ok(candidate)
            }
            None if reasons.is_empty() => Err(Error::no_strategy(
                self.phase,
                "no candidates are registered",
            )),
            None => Err(Error::no_strategy(self.phase, reasons.join("; "))),
        }
    }
}

impl<S: ?Sized + Capability> fmt::Debug for StrategyRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("phase", &self.phase)
            .field(
                "candidates",
                &self.candidates().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    struct Fixed {
        name: &'static str,
        priority: u32,
        accept: bool,
    }

    impl Capability for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn accepts(&self, _device: &Device, _params: &Parameters) -> Verdict {
            if self.accept {
                Verdict::Accept
            } else {
                Verdict::reject(format!("{} refuses", self.name))
            }
        }
    }

    fn fixed(name: &'static str, priority: u32, accept: bool) -> Box<dyn Capability> {
        Box::new(Fixed {
            name,
            priority,
            accept,
        })
    }

    fn registry(candidates: Vec<Box<dyn Capability>>) -> StrategyRegistry<dyn Capability> {
        let mut registry = StrategyRegistry::new(Phase::Boot);
        for c in candidates {
            registry.register(c);
        }
        registry
    }

    #[test]
    fn highest_priority_wins() {
        let registry = registry(vec![
            fixed("low", 1, true),
            fixed("high", 10, true),
            fixed("mid", 5, true),
        ]);
        let selected = registry
            .select(&Device::default(), &Parameters::new())
            .unwrap();
        assert_eq!(selected.name(), "high");
    }

    #[test]
    fn rejecting_candidates_are_skipped_regardless_of_priority() {
        let registry = registry(vec![fixed("greedy", 100, false), fixed("modest", 1, true)]);
        let selected = registry
            .select(&Device::default(), &Parameters::new())
            .unwrap();
        assert_eq!(selected.name(), "modest");
    }

    #[test]
    fn ties_go_to_first_registered() {
        let registry = registry(vec![
            fixed("first", 3, true),
            fixed("second", 3, true),
            fixed("lower", 2, true),
        ]);
        let selected = registry
            .select(&Device::default(), &Parameters::new())
            .unwrap();
        assert_eq!(selected.name(), "first");
    }

    #[test]
    fn zero_priority_never_matches() {
        let registry = registry(vec![fixed("silent", 0, true)]);
        let err = registry
            .select(&Device::default(), &Parameters::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("declared priority is 0"));
    }

    #[test]
    fn all_rejecting_lists_every_reason() {
        let registry = registry(vec![fixed("a", 1, false), fixed("b", 2, false)]);
        let err = registry
            .select(&Device::default(), &Parameters::new())
            .err()
            .unwrap();
        assert_matches!(err, Error::NoStrategyMatch { ref phase, ref reasons } => {
            assert_eq!(phase, "boot");
            assert_eq!(reasons, "a: a refuses; b: b refuses");
        });
    }

    #[test]
    fn empty_registry_fails() {
        let registry: StrategyRegistry<dyn Capability> = StrategyRegistry::new(Phase::Deploy);
        assert_matches!(
            registry
                .select(&Device::default(), &Parameters::new())
                .map(|s| s.name()),
            Err(Error::NoStrategyMatch { .. })
        );
    }

    #[test]
    fn scores_report_every_candidate_in_order() {
        let registry = registry(vec![fixed("a", 4, true), fixed("b", 2, false)]);
        let scores = registry.scores(&Device::default(), &Parameters::new());
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].name, "a");
        assert_eq!(scores[0].score, 4);
        assert!(scores[0].reason.is_none());
        assert_eq!(scores[1].score, 0);
        assert_eq!(scores[1].reason.as_deref(), Some("b refuses"));
    }

    #[test]
    fn debug_lists_candidate_names() {
        let registry = registry(vec![fixed("a", 1, true), fixed("b", 1, true)]);
        let debug = format!("{registry:?}");
        assert!(debug.contains("Boot"));
        assert!(debug.contains("\"a\""));
    }
}
