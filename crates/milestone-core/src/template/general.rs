//! Catch-all content for goals that match no specific domain. The same
//! block is produced for every entry.

use serde_json::json;

use super::{ContentStrategy, Progress, base_shape, fill_list, fill_nested, overlay, strings};
use crate::model::{ContentBlock, ContentDomain};

const MORNING: &[&str] = &[
    "Start with light activity",
    "Focus on main goals",
    "Track progress",
];
const AFTERNOON: &[&str] = &[
    "Continue with planned activities",
    "Review progress",
    "Adjust as needed",
];
const EVENING: &[&str] = &[
    "Complete remaining tasks",
    "Review day's progress",
    "Plan for tomorrow",
];
const GOALS: &[&str] = &[
    "Complete planned activities",
    "Maintain consistent effort",
    "Track progress",
];
const TASKS: &[&str] = &["Priority task 1", "Secondary task", "Follow-up activities"];
const NOTES: &[&str] = &["Adjust the plan as needed"];

#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralStrategy;

impl ContentStrategy for GeneralStrategy {
    fn domain(&self) -> ContentDomain {
        ContentDomain::General
    }

    fn skeleton(&self, _progress: Progress, _label: Option<&str>) -> ContentBlock {
        overlay(
            base_shape(ContentDomain::General),
            vec![
                ("tasks", strings(TASKS)),
                (
                    "schedule",
                    json!({
                        "morning": MORNING,
                        "afternoon": AFTERNOON,
                        "evening": EVENING,
                    }),
                ),
                ("goals", strings(GOALS)),
                ("notes", strings(NOTES)),
            ],
        )
    }

    fn default_fill(&self, block: ContentBlock) -> ContentBlock {
        let block = fill_list(block, "tasks", TASKS);
        let block = fill_nested(
            block,
            "schedule",
            &[("morning", MORNING), ("afternoon", AFTERNOON), ("evening", EVENING)],
        );
        let block = fill_list(block, "goals", GOALS);
        fill_list(block, "notes", NOTES)
    }
}
