// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Run reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::Response;

/// Which list of a test case a step came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Step,
    TearDown,
}

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// A response came back, whatever its status
    Completed {
        status_code: u16,
        reason: String,
        elapsed: f64,
        url: String,
    },
    /// The send failed
    Failed { error: String },
    /// Not run because an earlier step failed or there was no request
    Skipped { reason: String },
}

/// Report for one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub name: String,
    pub phase: Phase,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

impl StepReport {
    pub(crate) fn completed(name: &str, phase: Phase, response: &Response) -> Self {
        Self {
            name: name.to_string(),
            phase,
            outcome: StepOutcome::Completed {
                status_code: response.status_code,
                reason: response.reason.clone(),
                elapsed: response.elapsed,
                url: response.url.clone(),
            },
        }
    }

    pub(crate) fn failed(name: &str, phase: Phase, error: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            phase,
            outcome: StepOutcome::Failed {
                error: error.to_string(),
            },
        }
    }

    pub(crate) fn skipped(name: &str, phase: Phase, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            phase,
            outcome: StepOutcome::Skipped {
                reason: reason.into(),
            },
        }
    }

    /// Check if the step failed to send
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, StepOutcome::Failed { .. })
    }

    /// Check if the step was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, StepOutcome::Skipped { .. })
    }

    /// Status code, if a response came back
    pub fn status_code(&self) -> Option<u16> {
        match self.outcome {
            StepOutcome::Completed { status_code, .. } => Some(status_code),
            _ => None,
        }
    }
}

/// Report for one test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub name: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub steps: Vec<StepReport>,
}

impl CaseReport {
    /// True when no step failed to send
    pub fn passed(&self) -> bool {
        !self.steps.iter().any(StepReport::is_failed)
    }

    /// Reports of one phase
    pub fn phase(&self, phase: Phase) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(move |s| s.phase == phase)
    }
}

/// Report for a whole suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// True when every case passed
    pub fn passed(&self) -> bool {
        self.cases.iter().all(CaseReport::passed)
    }

    /// Number of cases with a failed send
    pub fn failed_cases(&self) -> usize {
        self.cases.iter().filter(|c| !c.passed()).count()
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(steps: Vec<StepReport>) -> CaseReport {
        CaseReport {
            name: "case".to_string(),
            priority: "P0".to_string(),
            tags: vec!["demo".to_string()],
            steps,
        }
    }

    #[test]
    fn test_case_passed() {
        let ok = case(vec![StepReport::skipped("s", Phase::Step, "no request")]);
        assert!(ok.passed());

        let bad = case(vec![
            StepReport::failed("s", Phase::Setup, "connection refused"),
            StepReport::skipped("t", Phase::Step, "setup failed"),
        ]);
        assert!(!bad.passed());
        assert_eq!(bad.phase(Phase::Step).count(), 1);
    }

    #[test]
    fn test_report_json_shape() {
        let report = SuiteReport {
            name: "suite".to_string(),
            started_at: Utc::now(),
            duration_ms: 5,
            cases: vec![case(vec![StepReport::failed(
                "login",
                Phase::TearDown,
                "boom",
            )])],
        };

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let step = &value["cases"][0]["steps"][0];
        assert_eq!(step["phase"], "tear_down");
        assert_eq!(step["outcome"], "failed");
        assert_eq!(step["error"], "boom");
        assert_eq!(report.failed_cases(), 1);
        assert!(!report.passed());
    }
}
