// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Steps, test cases and suites

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::report::{CaseReport, Phase, StepReport, SuiteReport};
use crate::config::Config;
use crate::error::{ErrorContext, Result};
use crate::http::{HttpClient, RequestDescriptor};
use crate::session::Session;

/// One request in a test case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    pub name: String,
    pub request: Option<RequestDescriptor>,
}

impl Step {
    /// Create a step
    pub fn new(name: impl Into<String>, request: RequestDescriptor) -> Self {
        Self {
            name: name.into(),
            request: Some(request),
        }
    }
}

/// Ordered steps run in one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCase {
    pub name: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub setups: Vec<Step>,
    pub steps: Vec<Step>,
    pub tear_downs: Vec<Step>,
}

impl TestCase {
    /// Create an empty test case
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set priority, e.g. `P0`
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Add a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a setup step
    pub fn setup(mut self, step: Step) -> Self {
        self.setups.push(step);
        self
    }

    /// Add a step
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Add a tear-down step
    pub fn tear_down(mut self, step: Step) -> Self {
        self.tear_downs.push(step);
        self
    }

    /// Check for a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Run setups, steps and tear-downs in a fresh session
    ///
    /// The first failed send skips the rest of the setups and steps.
    /// Tear-downs always run.
    pub async fn run(&self, client: &HttpClient) -> CaseReport {
        tracing::info!(case = %self.name, priority = %self.priority, "Running test case");
        let session = Session::with_client(client.clone());
        let mut reports = Vec::with_capacity(
            self.setups.len() + self.steps.len() + self.tear_downs.len(),
        );
        let mut failed = false;

        let main = self
            .setups
            .iter()
            .map(|s| (Phase::Setup, s))
            .chain(self.steps.iter().map(|s| (Phase::Step, s)));
        for (phase, step) in main {
            if failed {
                reports.push(StepReport::skipped(
                    &step.name,
                    phase,
                    "an earlier step failed",
                ));
                continue;
            }
            let report = run_step(&session, step, phase).await;
            failed = report.is_failed();
            reports.push(report);
        }

        for step in &self.tear_downs {
            reports.push(run_step(&session, step, Phase::TearDown).await);
        }

        CaseReport {
            name: self.name.clone(),
            priority: self.priority.clone(),
            tags: self.tags.clone(),
            steps: reports,
        }
    }
}

async fn run_step(session: &Session, step: &Step, phase: Phase) -> StepReport {
    let request = match &step.request {
        Some(request) => request,
        None => {
            tracing::warn!(step = %step.name, "Step has no request, skipping");
            return StepReport::skipped(&step.name, phase, "no request");
        }
    };

    match session.send(request).await {
        Ok(response) => {
            tracing::debug!(step = %step.name, status = response.status_code, "Step completed");
            StepReport::completed(&step.name, phase, &response)
        }
        Err(e) => {
            tracing::warn!(step = %step.name, error = %e, "Step failed");
            StepReport::failed(&step.name, phase, e)
        }
    }
}

/// Named collection of test cases sharing a configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestSuite {
    pub name: String,
    pub config: Option<Config>,
    pub test_cases: Vec<TestCase>,
}

impl TestSuite {
    /// Create an empty suite
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the suite configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Add a test case
    pub fn case(mut self, case: TestCase) -> Self {
        self.test_cases.push(case);
        self
    }

    /// Load from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .context(&format!("reading suite {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Run every case with a default client
    pub async fn run(&self) -> SuiteReport {
        self.run_with(&HttpClient::new()).await
    }

    /// Run every case through `client`, layering the suite configuration
    /// over the client's
    pub async fn run_with(&self, client: &HttpClient) -> SuiteReport {
        self.run_cases(client, |_| true).await
    }

    /// Run only the cases carrying `tag`
    pub async fn run_tagged(&self, client: &HttpClient, tag: &str) -> SuiteReport {
        self.run_cases(client, |case| case.has_tag(tag)).await
    }

    async fn run_cases<F>(&self, client: &HttpClient, filter: F) -> SuiteReport
    where
        F: Fn(&TestCase) -> bool,
    {
        tracing::info!(suite = %self.name, cases = self.test_cases.len(), "Running test suite");
        let client = self.client_for(client);
        let started_at = Utc::now();
        let start = Instant::now();

        let mut cases = Vec::new();
        for case in self.test_cases.iter().filter(|c| filter(c)) {
            cases.push(case.run(&client).await);
        }

        let report = SuiteReport {
            name: self.name.clone(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            cases,
        };
        tracing::info!(
            suite = %self.name,
            failed = report.failed_cases(),
            duration_ms = report.duration_ms,
            "Test suite finished"
        );
        report
    }

    fn client_for(&self, client: &HttpClient) -> HttpClient {
        match (&self.config, client.config()) {
            (Some(suite), Some(base)) => client.clone().with_config(suite.overlay(base)),
            (Some(suite), None) => client.clone().with_config(suite.clone()),
            (None, _) => client.clone(),
        }
    }
}
