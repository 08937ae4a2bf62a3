//! Suite results
//!
//! A run is conformant when nothing failed. If nothing failed but some
//! scenario could not run because the backend was unavailable, the run is
//! inconclusive rather than passing.

use std::fmt;

use tracing::warn;

use crate::scenario::Scenario;
use crate::violation::Violation;

/// Result of one scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every expectation held
    Passed,
    /// Backend could not be provisioned; carries the reason
    Skipped(String),
    /// Contract violation
    Failed(Violation),
}

impl Outcome {
    /// True for `Passed`
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// True for `Skipped`
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    /// True for `Failed`
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "passed"),
            Outcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            Outcome::Failed(violation) => write!(f, "FAILED: {}", violation),
        }
    }
}

/// Scenario paired with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioResult {
    /// Scenario that ran
    pub scenario: Scenario,
    /// What happened
    pub outcome: Outcome,
}

/// Outcomes of a suite run against one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    backend: String,
    results: Vec<ScenarioResult>,
}

impl SuiteReport {
    /// Create an empty report
    pub fn new(backend: impl Into<String>) -> Self {
        SuiteReport {
            backend: backend.into(),
            results: Vec::new(),
        }
    }

    /// Report where every scenario was skipped for the same reason
    pub fn all_skipped(backend: impl Into<String>, scenarios: &[Scenario], reason: &str) -> Self {
        let mut report = SuiteReport::new(backend);
        for &scenario in scenarios {
            report.record(scenario, Outcome::Skipped(reason.to_string()));
        }
        report
    }

    /// Append a scenario outcome
    pub fn record(&mut self, scenario: Scenario, outcome: Outcome) {
        self.results.push(ScenarioResult { scenario, outcome });
    }

    pub(crate) fn set_backend(&mut self, backend: impl Into<String>) {
        self.backend = backend.into();
    }

    /// Backend the suite ran against
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Results in run order
    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    /// Outcome of a given scenario, if it ran
    pub fn outcome(&self, scenario: Scenario) -> Option<&Outcome> {
        self.results
            .iter()
            .find(|r| r.scenario == scenario)
            .map(|r| &r.outcome)
    }

    /// Number of passed scenarios
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    /// Number of skipped scenarios
    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_skipped()).count()
    }

    /// Number of failed scenarios
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failed()).count()
    }

    /// Violations in run order
    pub fn violations(&self) -> impl Iterator<Item = (Scenario, &Violation)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            Outcome::Failed(v) => Some((r.scenario, v)),
            _ => None,
        })
    }

    /// No scenario failed
    pub fn is_conformant(&self) -> bool {
        self.failed() == 0
    }

    /// No scenario failed, but at least one was skipped
    pub fn is_inconclusive(&self) -> bool {
        self.is_conformant() && self.skipped() > 0
    }

    /// Panic if any scenario failed
    ///
    /// Skips are logged and tolerated, mirroring how a test framework
    /// treats a failed assumption.
    pub fn assert_conformant(&self) {
        if !self.is_conformant() {
            panic!("{}", self);
        }
        if self.is_inconclusive() {
            warn!(
                target: "kvharness::conformance",
                backend = %self.backend,
                skipped = self.skipped(),
                "Conformance run inconclusive"
            );
        }
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "backend {}: {} passed, {} skipped, {} failed",
            self.backend,
            self.passed(),
            self.skipped(),
            self.failed()
        )?;
        for result in &self.results {
            writeln!(f, "  {:<20} {}", result.scenario.name(), result.outcome)?;
        }
        Ok(())
    }
}
