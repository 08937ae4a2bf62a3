//! Report → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): the report's own summary lines
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use std::fmt;

use serde_json::{json, Value};

use kvharness_conformance::{Outcome, Scenario, SuiteReport};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

fn outcome_json(outcome: &Outcome) -> Value {
    match outcome {
        Outcome::Passed => json!({ "outcome": "passed" }),
        Outcome::Skipped(reason) => json!({ "outcome": "skipped", "reason": reason }),
        Outcome::Failed(violation) => json!({
            "outcome": "failed",
            "step": violation.step(),
            "violation": violation.to_string(),
        }),
    }
}

fn report_json(report: &SuiteReport) -> Value {
    let scenarios: Vec<Value> = report
        .results()
        .iter()
        .map(|r| {
            let mut entry = outcome_json(&r.outcome);
            entry["scenario"] = json!(r.scenario.name());
            entry
        })
        .collect();

    json!({
        "backend": report.backend(),
        "conformant": report.is_conformant(),
        "inconclusive": report.is_inconclusive(),
        "passed": report.passed(),
        "skipped": report.skipped(),
        "failed": report.failed(),
        "scenarios": scenarios,
    })
}

/// Format the reports of one run.
pub fn format_reports(reports: &[SuiteReport], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let all: Vec<Value> = reports.iter().map(report_json).collect();
            serde_json::to_string_pretty(&all)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
        OutputMode::Human => reports
            .iter()
            .map(|r| r.to_string().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// Format the scenario list.
pub fn format_scenarios(scenarios: &[Scenario], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let all: Vec<Value> = scenarios
                .iter()
                .map(|s| json!({ "name": s.name(), "canonical": s.is_canonical() }))
                .collect();
            serde_json::to_string_pretty(&all)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
        OutputMode::Human => scenarios
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let kind = if s.is_canonical() { "canonical" } else { "extended" };
                format!("{}) {} ({})", i + 1, s.name(), kind)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Format an error.
pub fn format_error(err: &dyn fmt::Display, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({
            "error": err.to_string()
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvharness_conformance::Violation;
    use kvharness_core::Status;

    fn sample() -> SuiteReport {
        let mut report = SuiteReport::new("ordered");
        report.record(Scenario::InsertReadDelete, Outcome::Passed);
        report.record(Scenario::Scan, Outcome::Skipped("down".into()));
        report.record(
            Scenario::UpdateMissing,
            Outcome::Failed(Violation::StatusMismatch {
                step: "update missing".into(),
                expected: Status::NotFound,
                actual: Status::Ok,
            }),
        );
        report
    }

    #[test]
    fn test_format_human_report() {
        let text = format_reports(&[sample()], OutputMode::Human);
        assert!(text.starts_with("backend ordered: 1 passed, 1 skipped, 1 failed"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_format_json_report() {
        let text = format_reports(&[sample()], OutputMode::Json);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        let report = &parsed[0];
        assert_eq!(report["backend"], "ordered");
        assert_eq!(report["conformant"], false);
        assert_eq!(report["scenarios"][0]["scenario"], "insert_read_delete");
        assert_eq!(report["scenarios"][1]["reason"], "down");
        assert_eq!(report["scenarios"][2]["outcome"], "failed");
        assert_eq!(report["scenarios"][2]["step"], "update missing");
    }

    #[test]
    fn test_format_scenarios() {
        let text = format_scenarios(&Scenario::all(true), OutputMode::Human);
        assert!(text.starts_with("1) insert_read_delete (canonical)"));
        assert!(text.ends_with("6) update_missing (extended)"));
    }

    #[test]
    fn test_format_error() {
        assert_eq!(format_error(&"boom", OutputMode::Human), "(error) boom");
        let parsed: Value = serde_json::from_str(&format_error(&"boom", OutputMode::Json)).unwrap();
        assert_eq!(parsed["error"], "boom");
    }
}
