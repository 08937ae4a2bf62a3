//! Expectation helpers shared by the scenarios
//!
//! Values are checked the way a benchmark client consumes them: one
//! `has_next` / `next_byte` pair per byte, then `has_next() == false`.

use kvharness_core::{FieldSet, Record, Status, StoreResult};

use crate::violation::Violation;

/// Require `result` to carry the `expected` status
pub fn expect_status<T>(
    step: &str,
    expected: Status,
    result: &StoreResult<T>,
) -> Result<(), Violation> {
    let actual = Status::of(result);
    if actual == expected {
        Ok(())
    } else {
        Err(Violation::StatusMismatch {
            step: step.to_string(),
            expected,
            actual,
        })
    }
}

/// Require success and hand back the value
pub fn expect_ok<T>(step: &str, result: StoreResult<T>) -> Result<T, Violation> {
    result.map_err(|e| Violation::StatusMismatch {
        step: step.to_string(),
        expected: Status::Ok,
        actual: e.status(),
    })
}

/// Consume `field` from `record` and compare it byte for byte
pub fn expect_bytes(
    step: &str,
    record: &mut Record,
    field: &str,
    expected: &[u8],
) -> Result<(), Violation> {
    let value = record.get_mut(field).ok_or_else(|| Violation::MissingField {
        step: step.to_string(),
        field: field.to_string(),
    })?;

    for (position, &want) in expected.iter().enumerate() {
        if !value.has_next() {
            return Err(Violation::ValueTooShort {
                step: step.to_string(),
                field: field.to_string(),
                expected_len: expected.len(),
                actual_len: position,
            });
        }
        let got = value.next_byte().map_err(|_| Violation::SequenceExhausted {
            step: step.to_string(),
            field: field.to_string(),
            position,
        })?;
        if got != want {
            return Err(Violation::ByteMismatch {
                step: step.to_string(),
                field: field.to_string(),
                position,
                expected: want,
                actual: got,
            });
        }
    }

    if value.has_next() {
        return Err(Violation::ValueTooLong {
            step: step.to_string(),
            field: field.to_string(),
            expected_len: expected.len(),
        });
    }
    Ok(())
}

/// Reject fields a projection did not ask for
pub fn expect_projected(
    step: &str,
    record: &Record,
    projection: &FieldSet,
) -> Result<(), Violation> {
    match record.field_names().find(|name| !projection.selects(name)) {
        Some(extra) => Err(Violation::UnexpectedField {
            step: step.to_string(),
            field: extra.to_string(),
        }),
        None => Ok(()),
    }
}

/// Require a scan to return exactly `expected` records out of `count`
pub fn expect_scan_len(
    step: &str,
    records: &[Record],
    count: usize,
    expected: usize,
) -> Result<(), Violation> {
    if records.len() > count {
        return Err(Violation::ScanOverflow {
            step: step.to_string(),
            count,
            returned: records.len(),
        });
    }
    if records.len() != expected {
        return Err(Violation::ScanCountMismatch {
            step: step.to_string(),
            expected,
            returned: records.len(),
        });
    }
    Ok(())
}
