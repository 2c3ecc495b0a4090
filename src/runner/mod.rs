// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scenario runner
//!
//! A [`TestSuite`] holds [`TestCase`]s, each a list of setup steps, steps
//! and tear-down steps. Every case runs in its own [`Session`](crate::Session)
//! so cookies flow from one step to the next. Running produces a
//! serializable [`SuiteReport`].
//!
//! ```rust,no_run
//! use reqkit::runner::TestSuite;
//!
//! # async fn demo() -> reqkit::Result<()> {
//! let suite = TestSuite::from_json_file("suite.json")?;
//! let report = suite.run().await;
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```

mod report;
mod suite;

pub use report::{CaseReport, Phase, StepOutcome, StepReport, SuiteReport};
pub use suite::{Step, TestCase, TestSuite};
