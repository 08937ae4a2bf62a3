//! Deliberately faulty adapters must fail, and fail in the right place

use kvharness::{ConformanceSuite, Outcome, Scenario, Status, SuiteReport, Violation};

use crate::{faulty, Fault};

fn run(fault: Fault) -> SuiteReport {
    ConformanceSuite::default().run(faulty(fault))
}

fn violation(report: &SuiteReport, scenario: Scenario) -> Violation {
    match report.outcome(scenario) {
        Some(Outcome::Failed(v)) => v.clone(),
        other => panic!("{} expected to fail, got {:?}", scenario, other),
    }
}

fn assert_passed(report: &SuiteReport, scenarios: &[Scenario]) {
    for &scenario in scenarios {
        assert_eq!(report.outcome(scenario), Some(&Outcome::Passed), "{}", scenario);
    }
}

// ============================================================================
// Status Violations
// ============================================================================

#[test]
fn test_delete_always_ok_fails_idempotent_delete() {
    let report = run(Fault::DeleteAlwaysOk);
    assert!(!report.is_conformant());

    assert_eq!(
        violation(&report, Scenario::InsertReadDelete),
        Violation::StatusMismatch {
            step: "delete again".into(),
            expected: Status::NotFound,
            actual: Status::Ok,
        }
    );
    assert_eq!(violation(&report, Scenario::ReadMissing).step(), "delete missing");
    assert_passed(&report, &[Scenario::InsertReadUpdate, Scenario::Scan]);
}

#[test]
fn test_missing_as_error_fails_not_found_checks() {
    let report = run(Fault::MissingIsError);

    assert_eq!(
        violation(&report, Scenario::InsertReadDelete),
        Violation::StatusMismatch {
            step: "read after delete".into(),
            expected: Status::NotFound,
            actual: Status::Error(7),
        }
    );
    assert_eq!(violation(&report, Scenario::ReadMissing).step(), "read missing");
    assert_passed(&report, &[Scenario::InsertReadUpdate, Scenario::Scan]);
}

#[test]
fn test_update_upsert_detected() {
    let report = run(Fault::UpdateUpserts);

    assert_eq!(
        violation(&report, Scenario::UpdateMissing),
        Violation::StatusMismatch {
            step: "update missing".into(),
            expected: Status::NotFound,
            actual: Status::Ok,
        }
    );
    assert_eq!(report.failed(), 1);
    assert_passed(&report, &Scenario::CANONICAL);
}

// ============================================================================
// Value Violations
// ============================================================================

#[test]
fn test_truncated_values_detected() {
    let report = run(Fault::TruncateValues);

    assert!(matches!(
        violation(&report, Scenario::InsertReadDelete),
        Violation::ValueTooShort { expected_len: 4, actual_len: 3, .. }
    ));
    assert!(matches!(
        violation(&report, Scenario::InsertReadUpdate),
        Violation::ValueTooShort { .. }
    ));
    // Scans go through a different path
    assert_passed(&report, &[Scenario::Scan, Scenario::ScanEdges]);
}

#[test]
fn test_ignored_projection_detected() {
    let report = run(Fault::IgnoreProjection);

    assert_eq!(
        violation(&report, Scenario::ScanEdges),
        Violation::UnexpectedField {
            step: "projected scan record 0".into(),
            field: "extra".into(),
        }
    );
    // Canonical records hold a single field, so projection cannot be observed
    assert_passed(&report, &Scenario::CANONICAL);
}

// ============================================================================
// Scan Violations
// ============================================================================

#[test]
fn test_scan_overflow_detected() {
    let report = run(Fault::ScanOverflow);

    assert_eq!(
        violation(&report, Scenario::Scan),
        Violation::ScanOverflow {
            step: "scan".into(),
            count: 5,
            returned: 6,
        }
    );
    assert!(matches!(
        violation(&report, Scenario::ScanEdges),
        Violation::ScanOverflow { count: 0, returned: 1, .. }
    ));
}

#[test]
fn test_exclusive_scan_start_detected() {
    let report = run(Fault::ExclusiveScanStart);

    assert_eq!(
        violation(&report, Scenario::Scan),
        Violation::ByteMismatch {
            step: "scan record 0".into(),
            field: "a".into(),
            position: 0,
            expected: 50,
            actual: 51,
        }
    );
    assert!(matches!(
        violation(&report, Scenario::ScanEdges),
        Violation::ScanCountMismatch { expected: 1, returned: 0, .. }
    ));
}

#[test]
#[should_panic(expected = "FAILED")]
fn test_assert_conformant_panics_for_broken_adapter() {
    run(Fault::ScanOverflow).assert_conformant();
}
