//! Prompt text for the generative service.

use serde::{Deserialize, Serialize};

use crate::model::{ContentBlock, ContentDomain, Granularity};

/// What the ingestor knows about the entry it is refining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContext {
    /// The user's original request.
    pub query: String,
    /// Granularity of the whole plan.
    pub granularity: Granularity,
    pub domain: ContentDomain,
    /// Period label of the entry (`"Monday"`, `"Week 2"`, `"March"`).
    pub label: Option<String>,
    /// 1-based position of the entry.
    pub index: usize,
    pub total: usize,
}

impl PromptContext {
    pub fn new(query: impl Into<String>, granularity: Granularity, domain: ContentDomain) -> Self {
        Self {
            query: query.into(),
            granularity,
            domain,
            label: None,
            index: 1,
            total: 1,
        }
    }

    pub fn for_entry(mut self, label: Option<&str>, index: usize, total: usize) -> Self {
        self.label = label.map(str::to_string);
        self.index = index;
        self.total = total;
        self
    }
}

fn domain_requirements(domain: ContentDomain) -> &'static str {
    match domain {
        ContentDomain::Meal => {
            "Meal plan requirements:\n\
             - Give each meal concrete ingredients, portions and protein grams.\n\
             - Keep the macro targets and calorie totals as specific numbers.\n\
             - Weekdays favour quick preparation; weekends and months may vary more.\n\
             - Tracking fields must state target values."
        }
        ContentDomain::Workout => {
            "Workout requirements:\n\
             - Name each exercise with sets, reps or time.\n\
             - State duration, intensity and required equipment.\n\
             - Add form and safety notes and build on the previous entry."
        }
        ContentDomain::Study => {
            "Study requirements:\n\
             - Break topics into sessions that fit the schedule blocks.\n\
             - Name concrete resources and include review or practice.\n\
             - Goals must be measurable."
        }
        ContentDomain::Finance => {
            "Finance requirements:\n\
             - Keep percentage targets as numbers with one decimal place.\n\
             - Tasks must be concrete actions for this period."
        }
        ContentDomain::General => {
            "Requirements:\n\
             - Tasks and goals must be concrete and actionable."
        }
    }
}

/// Build the prompt asking the service to elaborate `skeleton` for one entry.
pub fn build_prompt(skeleton: &ContentBlock, ctx: &PromptContext) -> String {
    let shape = serde_json::to_string_pretty(skeleton).unwrap_or_else(|_| "{}".to_string());
    let period = match &ctx.label {
        Some(label) => format!("{label} (entry {} of {})", ctx.index, ctx.total),
        None => format!("entry {} of {}", ctx.index, ctx.total),
    };

    format!(
        "You are a planning assistant writing one entry of a {granularity} plan.\n\
         \n\
         Request: \"{query}\"\n\
         Content type: {domain}\n\
         Period: {period}\n\
         \n\
         Rewrite the draft below so it is specific to this request and this period. \
         Return a single JSON object with exactly the same keys and nesting.\n\
         \n\
         Draft:\n\
         {shape}\n\
         \n\
         {requirements}\n\
         \n\
         Rules:\n\
         1. Use double quotes for every key and string.\n\
         2. Do not leave any list, object or string empty.\n\
         3. Keep lists to 3-4 items.\n\
         4. Do not add or remove keys.\n\
         5. Return only the JSON object: no comments, no markdown, no extra text.\n",
        granularity = ctx.granularity,
        query = ctx.query.trim(),
        domain = ctx.domain,
        requirements = domain_requirements(ctx.domain),
    )
}
