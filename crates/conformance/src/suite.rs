//! Conformance suite runner
//!
//! The suite owns no backend. It is handed either a client factory or a
//! launcher plus a connect function, and builds one fresh client per
//! scenario. Provisioning failures skip; contract violations fail.
//!
//! A config that fails `ConformanceConfig::validate` cannot tell a broken
//! adapter from a correct one, so every scenario is skipped instead of run.

use tracing::{error, info, warn};

use kvharness_core::{BackendHandle, BackendLauncher, BackendUnavailable, StoreClient};

use crate::config::{ConfigError, ConformanceConfig};
use crate::report::{Outcome, SuiteReport};
use crate::scenario::Scenario;

/// Backend name reported when no client could ever be constructed
const UNKNOWN_BACKEND: &str = "unknown";

/// Stops the wrapped handle when dropped, including during a panic
struct StopOnDrop<H: BackendHandle>(H);

impl<H: BackendHandle> Drop for StopOnDrop<H> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Runs scenarios against a backend adapter
#[derive(Debug, Clone)]
pub struct ConformanceSuite {
    config: ConformanceConfig,
    scenarios: Vec<Scenario>,
}

impl ConformanceSuite {
    /// Suite running the canonical scenarios, plus the extended ones if
    /// `config.extended` is set
    ///
    /// The config is checked when the suite runs; an invalid one skips
    /// every scenario. Use `try_new` to reject it up front.
    pub fn new(config: ConformanceConfig) -> Self {
        let scenarios = Scenario::all(config.extended);
        ConformanceSuite { config, scenarios }
    }

    /// Like `new`, but fails on a config that does not validate
    pub fn try_new(config: ConformanceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Replace the scenario list
    pub fn with_scenarios(mut self, scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        self.scenarios = scenarios.into_iter().collect();
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ConformanceConfig {
        &self.config
    }

    /// Scenarios in run order
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    fn invalid_config(&self) -> Option<String> {
        self.config.validate().err().map(|e| e.to_string())
    }

    /// Run one scenario against an existing client
    pub fn run_scenario<C: StoreClient + ?Sized>(&self, scenario: Scenario, client: &C) -> Outcome {
        if let Some(reason) = self.invalid_config() {
            warn!(
                target: "kvharness::conformance",
                scenario = scenario.name(),
                %reason,
                "Scenario skipped"
            );
            return Outcome::Skipped(reason);
        }
        self.run_checked(scenario, client)
    }

    fn run_checked<C: StoreClient + ?Sized>(&self, scenario: Scenario, client: &C) -> Outcome {
        info!(
            target: "kvharness::conformance",
            scenario = scenario.name(),
            backend = client.backend_name(),
            "Scenario started"
        );
        match scenario.run(client, &self.config) {
            Ok(()) => {
                info!(
                    target: "kvharness::conformance",
                    scenario = scenario.name(),
                    "Scenario passed"
                );
                Outcome::Passed
            }
            Err(violation) => {
                error!(
                    target: "kvharness::conformance",
                    scenario = scenario.name(),
                    %violation,
                    "Scenario failed"
                );
                Outcome::Failed(violation)
            }
        }
    }

    /// Run every scenario, constructing a fresh client for each
    ///
    /// A factory error skips that scenario; it never fails it.
    pub fn run<C, F>(&self, mut factory: F) -> SuiteReport
    where
        C: StoreClient,
        F: FnMut() -> Result<C, BackendUnavailable>,
    {
        if let Some(reason) = self.invalid_config() {
            error!(target: "kvharness::conformance", %reason, "Refusing to run suite");
            return SuiteReport::all_skipped(UNKNOWN_BACKEND, &self.scenarios, &reason);
        }

        let mut report = SuiteReport::new(UNKNOWN_BACKEND);
        let mut named = false;

        for &scenario in &self.scenarios {
            let outcome = match factory() {
                Ok(client) => {
                    if !named {
                        report.set_backend(client.backend_name());
                        named = true;
                    }
                    self.run_checked(scenario, &client)
                }
                Err(e) => {
                    warn!(
                        target: "kvharness::conformance",
                        scenario = scenario.name(),
                        backend = %e.backend,
                        reason = %e.reason,
                        "Scenario skipped"
                    );
                    if !named {
                        report.set_backend(e.backend.clone());
                    }
                    Outcome::Skipped(e.to_string())
                }
            };
            report.record(scenario, outcome);
        }

        info!(
            target: "kvharness::conformance",
            backend = report.backend(),
            passed = report.passed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Suite finished"
        );
        report
    }

    /// Start a backend, run every scenario against it, and stop it
    ///
    /// If the launcher cannot start the backend every scenario is skipped.
    /// The handle is stopped after the run whatever the outcome, even if
    /// the adapter panics.
    pub fn run_with_launcher<L, C, F>(&self, launcher: &L, mut connect: F) -> SuiteReport
    where
        L: BackendLauncher,
        C: StoreClient,
        F: FnMut(&L::Handle) -> Result<C, BackendUnavailable>,
    {
        if let Some(reason) = self.invalid_config() {
            error!(
                target: "kvharness::conformance",
                backend = launcher.name(),
                %reason,
                "Refusing to run suite"
            );
            return SuiteReport::all_skipped(launcher.name(), &self.scenarios, &reason);
        }

        let handle = match launcher.start() {
            Ok(handle) => StopOnDrop(handle),
            Err(e) => {
                warn!(
                    target: "kvharness::conformance",
                    backend = launcher.name(),
                    reason = %e.reason,
                    "Backend unavailable, skipping suite"
                );
                return SuiteReport::all_skipped(launcher.name(), &self.scenarios, &e.to_string());
            }
        };

        let mut report = self.run(|| connect(&handle.0));
        report.set_backend(launcher.name());

        drop(handle);
        report
    }
}

impl Default for ConformanceSuite {
    fn default() -> Self {
        Self::new(ConformanceConfig::default())
    }
}
