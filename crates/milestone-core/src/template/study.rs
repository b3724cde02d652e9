//! IELTS-style study content. Weekdays map to a pair of skill foci; the
//! schedule draws on each focus skill's component list and the accuracy
//! goal rises with progress.

use super::{ContentStrategy, Progress, base_shape, fill_list, fill_nested, overlay, strings};
use crate::model::{ContentBlock, ContentDomain};

const READING: &[&str] = &[
    "Skimming and scanning practice",
    "Reading for detail",
    "Time management strategies",
    "Multiple choice questions",
    "True/False/Not Given",
    "Matching headings",
];

const WRITING: &[&str] = &[
    "Task 1 - Data interpretation",
    "Task 1 - Process description",
    "Task 2 - Essay structure",
    "Task 2 - Argument development",
    "Grammar and vocabulary",
    "Coherence and cohesion",
];

const LISTENING: &[&str] = &[
    "Note completion",
    "Multiple choice",
    "Map/Plan completion",
    "Form filling",
    "Sentence completion",
    "Summary completion",
];

const SPEAKING: &[&str] = &[
    "Part 1 - Personal questions",
    "Part 2 - Long turn",
    "Part 3 - Discussion",
    "Pronunciation practice",
    "Fluency development",
    "Vocabulary building",
];

const REVIEW_MORNING: &[&str] = &[
    "Review previous week's materials - 1 hour",
    "Practice test (Reading) - 1 hour",
    "Practice test (Writing Task 1) - 1 hour",
];

const REVIEW_AFTERNOON: &[&str] = &[
    "Practice test (Listening) - 1 hour",
    "Practice test (Writing Task 2) - 1 hour",
    "Review and mark practice tests - 1 hour",
];

const REVIEW_EVENING: &[&str] = &[
    "Speaking practice with study partner - 30 mins",
    "Plan next week's study goals - 30 mins",
    "Review weak areas identified in practice tests - 1 hour",
];

const REGULAR_EVENING: &[&str] = &[
    "Review day's learning - 30 mins",
    "Practice exercises - 45 mins",
    "Prepare for tomorrow's topics - 15 mins",
];

const RESOURCES: &[&str] = &[
    "Cambridge IELTS Practice Tests",
    "IELTS Official Guide",
    "Online practice platform",
    "Study timer/stopwatch",
    "Note-taking materials",
];

const DEFAULT_MORNING: &[&str] = &[
    "Timed reading passage - 40 mins",
    "Vocabulary review - 20 mins",
    "Check answers and note mistakes",
];
const DEFAULT_AFTERNOON: &[&str] = &[
    "Listening drill - 30 mins",
    "Writing practice - one short task",
    "Grammar exercises - 20 mins",
];
const DEFAULT_EVENING: &[&str] = &[
    "Speaking practice - record and replay",
    "Flashcard review - 15 mins",
    "List topics for the next session",
];
const DEFAULT_GOALS: &[&str] = &[
    "Finish one timed practice section",
    "Learn 15 new words",
    "Log weak areas for review",
];
const DEFAULT_TOPICS: &[&str] = &["Core skill review", "Vocabulary and Grammar Development"];
const DEFAULT_RESOURCES: &[&str] = &["Practice tests", "Study notes"];

/// One area of focus for a study day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Reading,
    Writing,
    Listening,
    Speaking,
    Review,
    PracticeTest,
    AllSkills,
}

impl Focus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Reading => "Reading",
            Self::Writing => "Writing",
            Self::Listening => "Listening",
            Self::Speaking => "Speaking",
            Self::Review => "Review",
            Self::PracticeTest => "Practice Test",
            Self::AllSkills => "All Skills",
        }
    }

    /// Component list for the four core skills.
    pub fn components(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Reading => Some(READING),
            Self::Writing => Some(WRITING),
            Self::Listening => Some(LISTENING),
            Self::Speaking => Some(SPEAKING),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StudyStrategy;

impl StudyStrategy {
    /// Focus pair for a period label. Non-weekday labels get an all-skills
    /// review.
    pub fn focus_for(label: Option<&str>) -> (Focus, Focus) {
        use Focus::*;
        match label {
            Some("Monday") => (Reading, Writing),
            Some("Tuesday") => (Listening, Speaking),
            Some("Wednesday") => (Writing, Reading),
            Some("Thursday") => (Speaking, Listening),
            Some("Friday") => (Reading, Listening),
            Some("Saturday") => (Writing, Speaking),
            Some("Sunday") => (Review, PracticeTest),
            _ => (AllSkills, Review),
        }
    }

    fn schedule(focus: (Focus, Focus)) -> (Vec<String>, Vec<String>, Vec<String>) {
        match focus {
            (Focus::Review, _) => (
                owned(REVIEW_MORNING),
                owned(REVIEW_AFTERNOON),
                owned(REVIEW_EVENING),
            ),
            (Focus::AllSkills, _) => {
                let mut morning = vec![
                    block_line(Focus::Reading, READING[0]),
                    block_line(Focus::Writing, WRITING[0]),
                ];
                morning.push("Vocabulary building - 30 mins".to_string());
                let mut afternoon = vec![
                    block_line(Focus::Listening, LISTENING[0]),
                    block_line(Focus::Speaking, SPEAKING[0]),
                ];
                afternoon.push("Grammar practice - 30 mins".to_string());
                (morning, afternoon, owned(REGULAR_EVENING))
            }
            (first, second) => {
                let mut morning = skill_lines(first);
                morning.push("Vocabulary building - 30 mins".to_string());
                let mut afternoon = skill_lines(second);
                afternoon.push("Grammar practice - 30 mins".to_string());
                (morning, afternoon, owned(REGULAR_EVENING))
            }
        }
    }
}

fn block_line(skill: Focus, component: &str) -> String {
    format!("{} skill: {component} - 45 mins", skill.name())
}

/// First two components of a skill as 45-minute blocks.
fn skill_lines(skill: Focus) -> Vec<String> {
    skill
        .components()
        .unwrap_or_default()
        .iter()
        .take(2)
        .map(|c| block_line(skill, c))
        .collect()
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ContentStrategy for StudyStrategy {
    fn domain(&self) -> ContentDomain {
        ContentDomain::Study
    }

    fn skeleton(&self, progress: Progress, label: Option<&str>) -> ContentBlock {
        let focus = Self::focus_for(label);
        let (morning, afternoon, evening) = Self::schedule(focus);

        let topics = [
            format!("Focus 1: {}", focus.0.name()),
            format!("Focus 2: {}", focus.1.name()),
            "Vocabulary and Grammar Development".to_string(),
        ];
        let goals = [
            format!(
                "Complete {} exercises with {}% accuracy",
                focus.0.name(),
                70 + progress.scaled(20.0)
            ),
            format!("Practice {} for at least 2 hours", focus.1.name()),
            "Learn and use 10 new vocabulary words".to_string(),
            "Complete all planned practice sessions".to_string(),
        ];

        overlay(
            base_shape(ContentDomain::Study),
            vec![
                ("topics", strings(&topics)),
                (
                    "schedule",
                    serde_json::json!({
                        "morning": morning,
                        "afternoon": afternoon,
                        "evening": evening,
                    }),
                ),
                ("resources", strings(RESOURCES)),
                ("goals", strings(&goals)),
            ],
        )
    }

    fn default_fill(&self, block: ContentBlock) -> ContentBlock {
        let block = fill_nested(
            block,
            "schedule",
            &[
                ("morning", DEFAULT_MORNING),
                ("afternoon", DEFAULT_AFTERNOON),
                ("evening", DEFAULT_EVENING),
            ],
        );
        let block = fill_list(block, "goals", DEFAULT_GOALS);
        let block = fill_list(block, "topics", DEFAULT_TOPICS);
        fill_list(block, "resources", DEFAULT_RESOURCES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::general::GeneralStrategy;

    fn schedule_slot(block: &ContentBlock, slot: &str) -> Vec<String> {
        block.get("schedule").unwrap()[slot]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn monday_pairs_reading_and_writing() {
        let block = StudyStrategy.skeleton(Progress::new(1, 7), Some("Monday"));
        let morning = schedule_slot(&block, "morning");
        assert_eq!(
            morning,
            vec![
                "Reading skill: Skimming and scanning practice - 45 mins",
                "Reading skill: Reading for detail - 45 mins",
                "Vocabulary building - 30 mins",
            ]
        );
        let afternoon = schedule_slot(&block, "afternoon");
        assert!(afternoon[0].starts_with("Writing skill: Task 1 - Data interpretation"));
        assert_eq!(afternoon.last().unwrap(), "Grammar practice - 30 mins");
    }

    #[test]
    fn sunday_is_review_day() {
        let block = StudyStrategy.skeleton(Progress::new(7, 7), Some("Sunday"));
        assert_eq!(schedule_slot(&block, "morning"), owned(REVIEW_MORNING));
        assert_eq!(block.get("topics").unwrap()[1], "Focus 2: Practice Test");
    }

    #[test]
    fn non_day_labels_get_all_skills_review() {
        for label in [Some("Week 2"), Some("March"), Some("Today"), None] {
            let block = StudyStrategy.skeleton(Progress::new(1, 4), label);
            for slot in ["morning", "afternoon", "evening"] {
                assert_eq!(schedule_slot(&block, slot).len(), 3, "{label:?} {slot}");
            }
            assert_eq!(block.get("topics").unwrap()[0], "Focus 1: All Skills");
        }
    }

    #[test]
    fn accuracy_goal_scales() {
        let first = StudyStrategy.skeleton(Progress::new(1, 4), Some("Monday"));
        let last = StudyStrategy.skeleton(Progress::new(4, 4), Some("Monday"));
        assert_eq!(
            first.get("goals").unwrap()[0],
            "Complete Reading exercises with 75% accuracy"
        );
        assert_eq!(
            last.get("goals").unwrap()[0],
            "Complete Reading exercises with 90% accuracy"
        );
    }

    #[test]
    fn default_fill_creates_missing_schedule() {
        let filled = StudyStrategy.default_fill(ContentBlock::new());
        assert_eq!(schedule_slot(&filled, "evening"), owned(DEFAULT_EVENING));
        assert!(filled.get("goals").is_some());
    }

    #[test]
    fn default_fill_is_study_specific() {
        let study = StudyStrategy.default_fill(ContentBlock::new());
        let general = GeneralStrategy.default_fill(ContentBlock::new());
        for slot in ["morning", "afternoon", "evening"] {
            assert_ne!(
                study.get("schedule").unwrap()[slot],
                general.get("schedule").unwrap()[slot],
                "{slot}"
            );
        }
        assert_ne!(study.get("goals"), general.get("goals"));
        assert_eq!(schedule_slot(&study, "morning")[0], "Timed reading passage - 40 mins");
    }
}
