//! Test scenarios and batch planning.
//!
//! A scenario is pure data: its name, the workflows to invoke in every
//! workplace, and how workplace names are derived from an index. Adding a
//! scenario means adding a [`TestScenario`] variant and its recipe; the
//! harness itself does not change.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use ops_proto::DataPayload;
use serde::{Serialize, Serializer};

use crate::error::UsageError;
use crate::request::InvocationRequest;

/// Static description of a scenario.
#[derive(Debug)]
pub struct ScenarioRecipe {
    /// Name the operator types.
    pub name: &'static str,
    /// Workflows invoked in every workplace, in issuance order. Never empty.
    pub workflow_ids: &'static [&'static str],
    /// Workplace names are this prefix followed by the index.
    pub workplace_prefix: &'static str,
    /// Builds a fresh payload for each request.
    pub payload: fn() -> DataPayload,
}

fn sample_payload() -> DataPayload {
    DataPayload::new().with("count", 0)
}

static INVOKE_SAMPLE: ScenarioRecipe = ScenarioRecipe {
    name: "invoke-sample",
    workflow_ids: &["sample.workflow-0", "sample.workflow-1", "sample.workflow-2"],
    workplace_prefix: "test_name-",
    payload: sample_payload,
};

/// Registered test scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestScenario {
    /// Invokes the three sample workflows in each of `n + 1` workplaces.
    InvokeSample,
}

impl TestScenario {
    /// Every registered scenario.
    pub const ALL: &'static [Self] = &[Self::InvokeSample];

    /// The scenario's recipe.
    #[must_use]
    pub fn recipe(self) -> &'static ScenarioRecipe {
        match self {
            Self::InvokeSample => &INVOKE_SAMPLE,
        }
    }

    /// Operator-facing name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.recipe().name
    }

    /// Finds a scenario by its exact name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    /// Names of all registered scenarios, for help text and completion.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|s| s.name())
    }

    /// Workflows invoked per workplace.
    #[must_use]
    pub fn workflow_ids(self) -> &'static [&'static str] {
        self.recipe().workflow_ids
    }

    /// Deterministic workplace name for `index`.
    #[must_use]
    pub fn workplace_name(self, index: u32) -> String {
        format!("{}{index}", self.recipe().workplace_prefix)
    }

    /// A fresh payload.
    #[must_use]
    pub fn payload(self) -> DataPayload {
        (self.recipe().payload)()
    }
}

impl fmt::Display for TestScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestScenario {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| UsageError::UnsupportedTestName(s.to_string()))
    }
}

impl Serialize for TestScenario {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A validated batch: which scenario, and against how many workplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    scenario: TestScenario,
    workplaces: u32,
}

impl BatchPlan {
    /// Validates operator arguments into a plan.
    ///
    /// Checks run in order and stop at the first problem: test name present,
    /// test name registered, repeat count present, repeat count an integer.
    /// A blank or whitespace-only test name counts as missing and is
    /// reported as [`UsageError::MissingTestName`]. A repeat count of `n`
    /// yields workplaces `0..=n`.
    ///
    /// # Errors
    ///
    /// Returns the [`UsageError`] describing the first problem found.
    pub fn parse(test_name: Option<&str>, arg1: Option<&str>) -> Result<Self, UsageError> {
        let name = test_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(UsageError::MissingTestName)?;
        let scenario: TestScenario = name.parse()?;

        let raw = arg1.ok_or(UsageError::MissingRepeatCount(scenario.name()))?;
        let count = parse_repeat_count(raw)?;
        Ok(Self::repeated(scenario, count))
    }

    /// A plan for workplaces `0..=count`. Negative counts yield no workplaces.
    #[must_use]
    pub fn repeated(scenario: TestScenario, count: i32) -> Self {
        let workplaces = u32::try_from(count).map_or(0, |n| n + 1);
        Self {
            scenario,
            workplaces,
        }
    }

    /// The scenario.
    #[must_use]
    pub const fn scenario(&self) -> TestScenario {
        self.scenario
    }

    /// Number of workplaces.
    #[must_use]
    pub const fn workplaces(&self) -> u32 {
        self.workplaces
    }

    /// Number of requests the plan issues.
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        u64::from(self.workplaces) * self.scenario.workflow_ids().len() as u64
    }

    /// Requests in issuance order: workplace ascending, then workflow order.
    ///
    /// Generated lazily; each request gets a fresh payload.
    #[must_use]
    pub fn requests(self) -> PlanRequests {
        PlanRequests {
            plan: self,
            workplace: 0,
            step: 0,
            sequence: 0,
        }
    }
}

/// Iterator over the requests of a [`BatchPlan`].
#[derive(Debug, Clone)]
pub struct PlanRequests {
    plan: BatchPlan,
    workplace: u32,
    step: usize,
    sequence: u64,
}

impl Iterator for PlanRequests {
    type Item = InvocationRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.workplace >= self.plan.workplaces {
            return None;
        }

        let scenario = self.plan.scenario;
        let ids = scenario.workflow_ids();
        let request = InvocationRequest::new(
            self.sequence,
            scenario.workplace_name(self.workplace),
            ids[self.step],
            scenario.payload(),
        );

        self.sequence += 1;
        self.step += 1;
        if self.step == ids.len() {
            self.step = 0;
            self.workplace += 1;
        }
        Some(request)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.total_requests().saturating_sub(self.sequence);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

fn parse_repeat_count(raw: &str) -> Result<i32, UsageError> {
    raw.parse::<i32>().map_err(|err| match err.kind() {
        IntErrorKind::Empty
        | IntErrorKind::InvalidDigit
        | IntErrorKind::PosOverflow
        | IntErrorKind::NegOverflow => UsageError::RepeatNotInteger(raw.to_string()),
        _ => UsageError::unexpected(&err),
    })
}
