//! Deterministic content synthesis.
//!
//! Each [`ContentDomain`] has one [`ContentStrategy`]. A strategy starts from
//! the domain's base shape ([`base_shape`]) and overlays values scaled by the
//! entry's [`Progress`], so every block within a domain has the same keys no
//! matter where it sits in the sequence.
//!
//! Builders are pure: every call returns a freshly built [`ContentBlock`].
//!
//! # Architecture
//!
//! ```text
//! TemplateEngine::generate(domain, index, total, label)
//!     |
//!     v
//! strategy_for(domain) --> &dyn ContentStrategy
//!     |
//!     |   base_shape(domain)          (empty, schema-shaped)
//!     |   skeleton(progress, label)   (fully populated)
//!     |   default_fill(block)         (repairs partial blocks)
//! ```

pub mod finance;
pub mod general;
pub mod meal;
pub mod study;
pub mod workout;

use serde_json::{Map, Value, json};

use crate::model::{ContentBlock, ContentDomain};

pub use finance::FinanceStrategy;
pub use general::GeneralStrategy;
pub use meal::MealStrategy;
pub use study::StudyStrategy;
pub use workout::WorkoutStrategy;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Position of an entry within its sequence (1-based `index`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    index: usize,
    total: usize,
}

impl Progress {
    /// Clamps `total` to at least 1 and `index` into `1..=total`.
    pub fn new(index: usize, total: usize) -> Self {
        let total = total.max(1);
        Self {
            index: index.clamp(1, total),
            total,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `index / total`, always in `(0, 1]`.
    pub fn fraction(&self) -> f64 {
        self.index as f64 / self.total as f64
    }

    /// `floor(fraction * factor)`, used for integer-valued targets.
    pub fn scaled(&self, factor: f64) -> i64 {
        (self.fraction() * factor).floor() as i64
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Per-domain content rules.
pub trait ContentStrategy: Send + Sync {
    fn domain(&self) -> ContentDomain;

    /// Fully populated block for one entry.
    fn skeleton(&self, progress: Progress, label: Option<&str>) -> ContentBlock;

    /// Replace every missing or empty required collection with a small
    /// canned list for this domain.
    fn default_fill(&self, block: ContentBlock) -> ContentBlock;
}

static WORKOUT: WorkoutStrategy = WorkoutStrategy;
static STUDY: StudyStrategy = StudyStrategy;
static MEAL: MealStrategy = MealStrategy;
static FINANCE: FinanceStrategy = FinanceStrategy;
static GENERAL: GeneralStrategy = GeneralStrategy;

/// Look up the strategy for a domain.
pub fn strategy_for(domain: ContentDomain) -> &'static dyn ContentStrategy {
    match domain {
        ContentDomain::Workout => &WORKOUT,
        ContentDomain::Study => &STUDY,
        ContentDomain::Meal => &MEAL,
        ContentDomain::Finance => &FINANCE,
        ContentDomain::General => &GENERAL,
    }
}

/// Empty, schema-shaped block for a domain.
pub fn base_shape(domain: ContentDomain) -> ContentBlock {
    let value = match domain {
        ContentDomain::Workout => json!({
            "exercises": [],
            "duration": "45-60 minutes",
            "intensity": "Moderate",
            "equipment": [],
            "notes": []
        }),
        ContentDomain::Study => json!({
            "topics": [],
            "schedule": { "morning": [], "afternoon": [], "evening": [] },
            "resources": [],
            "goals": []
        }),
        ContentDomain::Meal => json!({
            "meals": { "breakfast": [], "lunch": [], "dinner": [], "snacks": [] },
            "nutrients": { "protein": [], "carbs": [], "fats": [] },
            "macros": {
                "protein_target": "0g",
                "carbs_target": "0g",
                "fats_target": "0g",
                "total_calories": "0"
            },
            "tasks": [],
            "tips": [],
            "tracking": { "weight": "", "protein_intake": "", "water_intake": "" }
        }),
        ContentDomain::Finance => json!({
            "budget": { "income": [], "expenses": [], "savings": [] },
            "goals": {
                "savings_target": "0",
                "expense_reduction": "0",
                "investment_allocation": "0"
            },
            "tracking": { "current_balance": "", "savings_progress": "", "expense_categories": [] },
            "tasks": [],
            "tips": []
        }),
        ContentDomain::General => json!({
            "tasks": [],
            "schedule": { "morning": [], "afternoon": [], "evening": [] },
            "goals": [],
            "notes": []
        }),
    };
    ContentBlock::from_value(value).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Deterministic content generator. Stateless; cheap to copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Build the block for entry `index` of `total` (1-based).
    pub fn generate(
        &self,
        domain: ContentDomain,
        index: usize,
        total: usize,
        label: Option<&str>,
    ) -> ContentBlock {
        strategy_for(domain).skeleton(Progress::new(index, total), label)
    }

    pub fn default_fill(&self, domain: ContentDomain, block: ContentBlock) -> ContentBlock {
        strategy_for(domain).default_fill(block)
    }
}

// ---------------------------------------------------------------------------
// Helpers shared by strategies
// ---------------------------------------------------------------------------

/// JSON array of strings.
pub(crate) fn strings<S: AsRef<str>>(items: &[S]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|s| Value::String(s.as_ref().to_string()))
            .collect(),
    )
}

/// Overlay `fields` onto a base shape, replacing keys wholesale.
pub(crate) fn overlay(base: ContentBlock, fields: Vec<(&str, Value)>) -> ContentBlock {
    fields
        .into_iter()
        .fold(base, |block, (key, value)| block.with(key, value))
}

/// True when a value carries no content.
pub(crate) fn is_vacant(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Set `key` to `defaults` if it is missing or empty.
pub(crate) fn fill_list(block: ContentBlock, key: &str, defaults: &[&str]) -> ContentBlock {
    if is_vacant(block.get(key)) {
        block.with(key, strings(defaults))
    } else {
        block
    }
}

/// Ensure `key` is an object and fill each `(sub_key, defaults)` pair inside it.
pub(crate) fn fill_nested(
    block: ContentBlock,
    key: &str,
    fields: &[(&str, &[&str])],
) -> ContentBlock {
    let mut inner = match block.get(key) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    for (sub_key, defaults) in fields {
        if is_vacant(inner.get(*sub_key)) {
            inner.insert(sub_key.to_string(), strings(defaults));
        }
    }
    block.with(key, Value::Object(inner))
}

/// Ensure `key` is an object whose `(sub_key, default)` strings are non-blank.
pub(crate) fn fill_text(block: ContentBlock, key: &str, fields: &[(&str, &str)]) -> ContentBlock {
    let mut inner = match block.get(key) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    for (sub_key, default) in fields {
        if is_vacant(inner.get(*sub_key)) {
            inner.insert(sub_key.to_string(), Value::String(default.to_string()));
        }
    }
    block.with(key, Value::Object(inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_inputs() {
        let p = Progress::new(0, 0);
        assert_eq!((p.index(), p.total()), (1, 1));
        assert_eq!(p.fraction(), 1.0);

        let p = Progress::new(9, 4);
        assert_eq!(p.index(), 4);
    }

    #[test]
    fn progress_fraction_in_range() {
        for total in 1..=12 {
            for index in 1..=total {
                let f = Progress::new(index, total).fraction();
                assert!(f > 0.0 && f <= 1.0);
            }
        }
    }

    #[test]
    fn strategy_for_returns_matching_domain() {
        for domain in ContentDomain::ALL {
            assert_eq!(strategy_for(domain).domain(), domain);
        }
    }

    #[test]
    fn skeleton_keeps_base_shape_keys() {
        let engine = TemplateEngine::new();
        for domain in ContentDomain::ALL {
            let base: Vec<String> = base_shape(domain).keys().map(String::from).collect();
            let block = engine.generate(domain, 2, 7, Some("Tuesday"));
            for key in &base {
                assert!(block.get(key).is_some(), "{domain}: missing key {key}");
            }
        }
    }

    #[test]
    fn generate_is_deterministic() {
        let engine = TemplateEngine::new();
        for domain in ContentDomain::ALL {
            let a = engine.generate(domain, 3, 12, Some("March"));
            let b = engine.generate(domain, 3, 12, Some("March"));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn default_fill_repairs_empty_base_shape() {
        let engine = TemplateEngine::new();
        for domain in ContentDomain::ALL {
            let filled = engine.default_fill(domain, base_shape(domain));
            for key in filled.keys() {
                assert!(
                    !is_vacant(filled.get(key)),
                    "{domain}: {key} still empty after default fill"
                );
            }
        }
    }

    #[test]
    fn fill_nested_replaces_non_object() {
        let block = ContentBlock::new().with("meals", json!(["not", "a", "map"]));
        let filled = fill_nested(block, "meals", &[("breakfast", &["eggs"])]);
        assert_eq!(filled.get("meals").unwrap()["breakfast"][0], "eggs");
    }

    #[test]
    fn fill_list_keeps_existing_content() {
        let block = ContentBlock::new().with("tips", json!(["mine"]));
        let filled = fill_list(block, "tips", &["default"]);
        assert_eq!(filled.get("tips").unwrap(), &json!(["mine"]));
    }
}
