//! Backend lifecycle: unavailable backends skip, handles are always stopped

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kvharness::storage::{EmbeddedEngine, EngineKind, OrderedStore};
use kvharness::{
    BackendHandle, BackendLauncher, BackendUnavailable, ConformanceSuite, Outcome, Scenario,
};

use crate::{Fault, FaultyStore};

/// Launcher whose start always fails, like an engine whose port is taken
struct UnavailableLauncher;

impl BackendLauncher for UnavailableLauncher {
    type Handle = CountingHandle;

    fn name(&self) -> &str {
        "remote"
    }

    fn start(&self) -> Result<CountingHandle, BackendUnavailable> {
        Err(BackendUnavailable::new("remote", "address already in use"))
    }
}

/// Launcher counting how often its handles are stopped
#[derive(Default)]
struct CountingLauncher {
    stops: Arc<AtomicUsize>,
}

struct CountingHandle {
    running: bool,
    stops: Arc<AtomicUsize>,
}

impl BackendLauncher for CountingLauncher {
    type Handle = CountingHandle;

    fn name(&self) -> &str {
        "counting"
    }

    fn start(&self) -> Result<CountingHandle, BackendUnavailable> {
        Ok(CountingHandle {
            running: true,
            stops: Arc::clone(&self.stops),
        })
    }
}

impl BackendHandle for CountingHandle {
    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[test]
fn test_failed_start_skips_every_scenario() {
    let report = ConformanceSuite::default().run_with_launcher(&UnavailableLauncher, |_| {
        Ok::<_, BackendUnavailable>(OrderedStore::new())
    });

    assert_eq!(report.backend(), "remote");
    assert_eq!(report.skipped(), 6);
    assert_eq!(report.failed(), 0);
    assert!(report.is_inconclusive());
    assert!(matches!(
        report.outcome(Scenario::Scan),
        Some(Outcome::Skipped(reason)) if reason.contains("address already in use")
    ));

    // Skips never count as failures
    report.assert_conformant();
}

#[test]
fn test_handle_stopped_after_passing_run() {
    let launcher = CountingLauncher::default();
    let report = launcher_run(&launcher, None);

    assert!(report.is_conformant());
    assert_eq!(launcher.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_handle_stopped_after_failing_run() {
    let launcher = CountingLauncher::default();
    let report = launcher_run(&launcher, Some(Fault::DeleteAlwaysOk));

    assert!(!report.is_conformant());
    assert_eq!(launcher.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_handle_stopped_when_adapter_panics() {
    let launcher = CountingLauncher::default();
    let suite = ConformanceSuite::default();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        suite.run_with_launcher(&launcher, |_| -> Result<OrderedStore, BackendUnavailable> {
            panic!("adapter crashed while connecting")
        })
    }));

    assert!(result.is_err());
    assert_eq!(launcher.stops.load(Ordering::SeqCst), 1);
}

fn launcher_run(launcher: &CountingLauncher, fault: Option<Fault>) -> kvharness::SuiteReport {
    ConformanceSuite::default().run_with_launcher(launcher, |handle| {
        assert!(handle.is_running());
        let client: Box<dyn kvharness::StoreClient> = match fault {
            Some(fault) => Box::new(FaultyStore::new(fault)),
            None => Box::new(OrderedStore::new()),
        };
        Ok::<_, BackendUnavailable>(client)
    })
}

#[test]
fn test_connect_failure_skips_only_that_scenario() {
    let mut calls = 0;
    let report = ConformanceSuite::default().run(|| {
        calls += 1;
        if calls == 1 {
            Err(BackendUnavailable::new("flaky", "connection refused"))
        } else {
            Ok(OrderedStore::new())
        }
    });

    assert_eq!(report.outcome(Scenario::InsertReadDelete).map(Outcome::is_skipped), Some(true));
    assert_eq!(report.passed(), 5);
    assert!(report.is_inconclusive());
    // Named after the first client that could be constructed
    assert_eq!(report.backend(), "ordered");
}

#[test]
fn test_engine_in_use_is_inconclusive() {
    let engine = EmbeddedEngine::new(EngineKind::Ordered);
    let mut running = engine.start().unwrap();

    let report = ConformanceSuite::default().run_with_launcher(&engine, |handle| handle.connect());
    assert!(report.is_inconclusive());

    // The blocking instance is unaffected and can still be stopped
    assert!(running.is_running());
    running.stop();
    running.stop();

    let report = ConformanceSuite::default().run_with_launcher(&engine, |handle| handle.connect());
    assert!(report.is_conformant());
    assert!(!report.is_inconclusive());
}

#[test]
fn test_engine_restart_starts_empty() {
    let engine = EmbeddedEngine::new(EngineKind::Sharded);

    // Same canonical keys are inserted twice; a leftover store would
    // reject them as duplicates
    for _ in 0..2 {
        let report =
            ConformanceSuite::default().run_with_launcher(&engine, |handle| handle.connect());
        report.assert_conformant();
        assert_eq!(report.passed(), 6);
    }
}
