//! Static content used when every refinement attempt failed.

use serde_json::{Value, json};

use super::prompt::PromptContext;
use crate::model::{ContentBlock, ContentDomain};

/// Coarse plan type used only for the fallback shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    Meal,
    Workout,
    Study,
    General,
}

impl FallbackKind {
    /// Keyword scan of the request text. Meal words win over workout words,
    /// which win over study words.
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));
        if has_any(&["diet", "meal", "food"]) {
            Self::Meal
        } else if has_any(&["workout", "exercise", "fitness"]) {
            Self::Workout
        } else if has_any(&["study", "learn", "education"]) {
            Self::Study
        } else {
            Self::General
        }
    }

    /// Kind for a classified request. Domains with their own fallback shape
    /// map directly; finance and general fall back to the keyword scan.
    pub fn for_domain(domain: ContentDomain, text: &str) -> Self {
        match domain {
            ContentDomain::Meal => Self::Meal,
            ContentDomain::Workout => Self::Workout,
            ContentDomain::Study => Self::Study,
            ContentDomain::Finance | ContentDomain::General => Self::detect(text),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meal => "meal",
            Self::Workout => "workout",
            Self::Study => "study",
            Self::General => "general",
        }
    }

    fn content(self) -> Value {
        match self {
            Self::Meal => json!({
                "meals": {
                    "breakfast": ["Healthy breakfast option 1", "Healthy breakfast option 2"],
                    "lunch": ["Balanced lunch option 1", "Balanced lunch option 2"],
                    "dinner": ["Nutritious dinner option 1", "Nutritious dinner option 2"],
                    "snacks": ["Healthy snack options"]
                }
            }),
            Self::Workout => json!({
                "exercises": {
                    "warmup": ["Basic stretches", "Light cardio"],
                    "main": ["Beginner-friendly exercises"],
                    "cooldown": ["Cool-down stretches"]
                }
            }),
            Self::Study => json!({
                "schedule": {
                    "morning": ["Study session 1"],
                    "afternoon": ["Study session 2"],
                    "evening": ["Review and practice"]
                }
            }),
            Self::General => json!({
                "schedule": {
                    "morning": ["Morning activities"],
                    "afternoon": ["Afternoon activities"],
                    "evening": ["Evening activities"]
                }
            }),
        }
    }
}

/// Deterministic block for a request whose refinement was exhausted.
pub fn fallback_content(ctx: &PromptContext) -> ContentBlock {
    let kind = FallbackKind::for_domain(ctx.domain, &ctx.query);
    let title = match ctx.query.trim() {
        "" => "Plan",
        query => query,
    };

    ContentBlock::new()
        .with("title", Value::String(title.to_string()))
        .with(
            "description",
            Value::String(format!(
                "Structured {} plan with progressive content",
                kind.as_str()
            )),
        )
        .with("plan_type", Value::String(kind.as_str().to_string()))
        .with("content", kind.content())
        .with(
            "metrics_to_track",
            json!([
                format!("Daily {} progress", kind.as_str()),
                "Goal completion rate",
                "Consistency level"
            ]),
        )
        .with(
            "resources_needed",
            json!([
                "Essential tools and materials",
                "Progress tracking method",
                "Support resources"
            ]),
        )
        .with(
            "tips_and_recommendations",
            json!([
                "Start with basics",
                "Maintain consistency",
                "Track progress regularly"
            ]),
        )
}
