use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

const MISSING: &str = "<missing>";

/// One failed expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl Mismatch {
    pub fn new(path: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.path, self.expected, self.actual
        )
    }
}

#[derive(Debug, Error)]
#[error("{scenario}: {} of {checks} checks failed\n{}", .mismatches.len(), render_mismatches(.mismatches))]
pub struct AssertionFailure {
    pub scenario: String,
    pub checks: usize,
    pub mismatches: Vec<Mismatch>,
}

fn render_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(|m| format!("  - {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accumulates checks so every mismatch of a scenario is reported at once.
#[derive(Debug, Default)]
pub struct CheckReport {
    checks: usize,
    mismatches: Vec<Mismatch>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checks(&self) -> usize {
        self.checks
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn is_success(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Records a check whose outcome was decided by the caller.
    pub fn expect(
        &mut self,
        path: impl Into<String>,
        passed: bool,
        expected: impl Into<String>,
        actual: impl fmt::Debug,
    ) {
        self.checks += 1;
        if !passed {
            self.mismatches
                .push(Mismatch::new(path, expected, format!("{:?}", actual)));
        }
    }

    pub fn expect_eq<T>(&mut self, path: impl Into<String>, expected: T, actual: T)
    where
        T: PartialEq + fmt::Debug,
    {
        self.checks += 1;
        if expected != actual {
            self.mismatches.push(Mismatch::new(
                path,
                format!("{:?}", expected),
                format!("{:?}", actual),
            ));
        }
    }

    /// Exact cardinality; the items are shown on mismatch.
    pub fn expect_count<T: fmt::Debug>(&mut self, path: impl Into<String>, expected: usize, items: &[T]) {
        self.expect(
            path,
            items.len() == expected,
            format!("{} item(s)", expected),
            items,
        );
    }

    pub fn expect_empty<T: fmt::Debug>(&mut self, path: impl Into<String>, items: &[T]) {
        self.expect_count(path, 0, items);
    }

    /// Structural JSON equality; one mismatch per differing leaf.
    pub fn expect_json(&mut self, path: impl Into<String>, expected: &Value, actual: &Value) {
        self.checks += 1;
        diff_values(&path.into(), expected, actual, &mut self.mismatches);
    }

    pub fn fail(&mut self, path: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) {
        self.checks += 1;
        self.mismatches.push(Mismatch::new(path, expected, actual));
    }

    pub fn into_result(self, scenario: &str) -> Result<usize, AssertionFailure> {
        if self.mismatches.is_empty() {
            Ok(self.checks)
        } else {
            Err(AssertionFailure {
                scenario: scenario.to_string(),
                checks: self.checks,
                mismatches: self.mismatches,
            })
        }
    }
}

/// Recursive diff of two JSON values, appending mismatches under `path`.
pub fn diff_values(path: &str, expected: &Value, actual: &Value, out: &mut Vec<Mismatch>) {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            let keys: BTreeSet<&String> = expected_map.keys().chain(actual_map.keys()).collect();
            for key in keys {
                let child = format!("{}/{}", path, key);
                match (expected_map.get(key), actual_map.get(key)) {
                    (Some(e), Some(a)) => diff_values(&child, e, a, out),
                    (Some(e), None) => out.push(Mismatch::new(child, e.to_string(), MISSING)),
                    (None, Some(a)) => out.push(Mismatch::new(child, MISSING, a.to_string())),
                    (None, None) => {}
                }
            }
        }
        (Value::Array(expected_items), Value::Array(actual_items)) => {
            if expected_items.len() != actual_items.len() {
                out.push(Mismatch::new(path, expected.to_string(), actual.to_string()));
                return;
            }
            for (index, (e, a)) in expected_items.iter().zip(actual_items).enumerate() {
                diff_values(&format!("{}/{}", path, index), e, a, out);
            }
        }
        (Value::Number(e), Value::Number(a)) => {
            if e.as_f64() != a.as_f64() {
                out.push(Mismatch::new(path, e.to_string(), a.to_string()));
            }
        }
        (e, a) if e != a => out.push(Mismatch::new(path, e.to_string(), a.to_string())),
        _ => {}
    }
}
