//! Shared test utilities for milestone integration tests.
//!
//! Provides scripted [`TextGenerator`] stubs, the reference queries used
//! across suites, and plan-level assertions.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use milestone_core::ingest::check_complete;
use milestone_core::{GenerateError, GenerationConfig, Plan, TextGenerator};

/// Diet request from the sample queries.
pub const MEAL_WEEK_QUERY: &str = "Build a 7-day protein rich diet plan for muscle gain";
/// Workout request from the sample queries.
pub const WORKOUT_MONTH_QUERY: &str = "Create a month-long workout routine for weight loss";
/// Finance request from the sample queries.
pub const FINANCE_YEAR_QUERY: &str = "Plan a year-long financial savings strategy";

/// A Monday, used to pin dates in tests.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn fail(s: impl Into<String>) -> Self {
        Self::Fail(s.into())
    }
}

/// Replays scripted replies in order, then repeats the `fallback` reply
/// forever. Records every prompt and config it receives.
#[derive(Debug)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    prompts: Mutex<Vec<String>>,
    configs: Mutex<Vec<GenerationConfig>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Reply>) -> Self {
        Self::with_fallback(script, Reply::fail("script exhausted"))
    }

    pub fn with_fallback(script: Vec<Reply>, fallback: Reply) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            prompts: Mutex::new(Vec::new()),
            configs: Mutex::new(Vec::new()),
        }
    }

    /// Always returns `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::with_fallback(Vec::new(), Reply::text(text))
    }

    /// Always fails with a transport-style error.
    pub fn failing() -> Self {
        Self::with_fallback(Vec::new(), Reply::fail("service unavailable"))
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("prompts lock").len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }

    pub fn configs(&self) -> Vec<GenerationConfig> {
        self.configs.lock().expect("configs lock").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, GenerateError> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());
        self.configs.lock().expect("configs lock").push(*config);
        let reply = self
            .script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail(message) => Err(GenerateError::InvalidResponse(message)),
        }
    }
}

/// Assert every entry description passes the completeness check.
pub fn assert_plan_complete(plan: &Plan) {
    for entry in &plan.entries {
        let value = entry.description.clone().into_value();
        if let Err(err) = check_complete(&value) {
            panic!("entry {:?} is incomplete: {err}", entry.period_name);
        }
    }
}
