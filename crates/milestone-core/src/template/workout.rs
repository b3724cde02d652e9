//! Workout content: fixed warmup/cardio/strength/cooldown sequence whose
//! strength block, intensity, duration and heart-rate band advance with
//! progress.

use serde_json::Value;

use super::{ContentStrategy, Progress, base_shape, fill_list, overlay, strings};
use crate::calendar::{month_index, week_number};
use crate::model::{ContentBlock, ContentDomain};

const WARMUP: &[&str] = &[
    "Dynamic stretching - 5 mins",
    "Light jogging in place - 5 mins",
    "Arm circles and leg swings - 2 mins",
];

const CARDIO: &[&str] = &[
    "Jumping jacks - 1 min",
    "High knees - 30 secs",
    "Mountain climbers - 30 secs",
    "Burpees - 30 secs",
];

const STRENGTH_BASE: &[&str] = &[
    "Push-ups - 10 reps",
    "Bodyweight squats - 15 reps",
    "Lunges - 10 each leg",
    "Plank hold - 30 secs",
];

const STRENGTH_INTERMEDIATE: &[&str] = &[
    "Push-ups - 15 reps",
    "Jump squats - 20 reps",
    "Walking lunges - 15 each leg",
    "Plank hold - 45 secs",
];

const STRENGTH_ADVANCED: &[&str] = &[
    "Diamond push-ups - 12 reps",
    "Pistol squats - 8 each leg",
    "Jump lunges - 12 each leg",
    "Plank with shoulder taps - 45 secs",
];

const COOLDOWN: &[&str] = &[
    "Static stretching - 5 mins",
    "Deep breathing - 2 mins",
    "Light walking - 3 mins",
];

const INTENSITY_LEVELS: [&str; 5] = [
    "Light",
    "Light-Moderate",
    "Moderate",
    "Moderate-High",
    "High",
];

const WEEK_FOCUS: &[&str] = &[
    "Form and Technique",
    "Building Endurance",
    "Strength Development",
    "High-Intensity Training",
];

const DEFAULT_EXERCISES: &[&str] = &[
    "Warm-up exercises (10 minutes)",
    "Main workout routine",
    "Cool-down stretches",
];
const DEFAULT_EQUIPMENT: &[&str] = &["Exercise mat", "Water bottle", "Comfortable clothes"];
const DEFAULT_NOTES: &[&str] = &[
    "Start with proper form",
    "Listen to your body",
    "Stay hydrated",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkoutStrategy;

impl WorkoutStrategy {
    /// Strength block: base, then harder past 0.3 and 0.6 progress.
    pub fn strength_tier(progress: Progress) -> &'static [&'static str] {
        let p = progress.fraction();
        if p > 0.6 {
            STRENGTH_ADVANCED
        } else if p > 0.3 {
            STRENGTH_INTERMEDIATE
        } else {
            STRENGTH_BASE
        }
    }

    pub fn intensity(progress: Progress) -> &'static str {
        let level = (progress.scaled(5.0).max(0) as usize).min(INTENSITY_LEVELS.len() - 1);
        INTENSITY_LEVELS[level]
    }

    /// Focus label from a `"Week N"` or month-name label.
    pub fn focus(label: Option<&str>) -> &'static str {
        let Some(label) = label else {
            return "General Fitness";
        };
        if let Some(week) = week_number(label) {
            return week
                .checked_sub(1)
                .and_then(|i| WEEK_FOCUS.get(i))
                .copied()
                .unwrap_or("Maintenance");
        }
        match month_index(label) {
            Some(0..=2) => "Building Foundation",
            Some(3..=5) => "Strength and Endurance",
            Some(6..=8) => "Power and Performance",
            Some(_) => "Peak Performance",
            None => "General Fitness",
        }
    }
}

impl ContentStrategy for WorkoutStrategy {
    fn domain(&self) -> ContentDomain {
        ContentDomain::Workout
    }

    fn skeleton(&self, progress: Progress, label: Option<&str>) -> ContentBlock {
        let p = progress.fraction();

        let exercises: Vec<&str> = WARMUP
            .iter()
            .chain(CARDIO)
            .chain(Self::strength_tier(progress))
            .chain(COOLDOWN)
            .copied()
            .collect();

        let mut equipment = vec!["Exercise mat", "Water bottle", "Timer/stopwatch"];
        if p > 0.3 {
            equipment.push("Resistance bands");
        }
        if p > 0.6 {
            equipment.push("Dumbbells (optional)");
        }

        let heart_rate = progress.scaled(40.0);
        let notes = [
            format!("Focus area: {}", Self::focus(label)),
            format!(
                "Target heart rate: {}-{} BPM",
                110 + heart_rate,
                130 + heart_rate
            ),
            "Rest 30-60 seconds between exercises".to_string(),
            "Maintain proper form throughout".to_string(),
            "Progress to next level when current exercises feel comfortable".to_string(),
        ];

        overlay(
            base_shape(ContentDomain::Workout),
            vec![
                ("exercises", strings(&exercises)),
                (
                    "duration",
                    Value::String(format!("{} minutes", 45 + progress.scaled(15.0))),
                ),
                ("intensity", Value::String(Self::intensity(progress).to_string())),
                ("equipment", strings(&equipment)),
                ("notes", strings(&notes)),
            ],
        )
    }

    fn default_fill(&self, block: ContentBlock) -> ContentBlock {
        let block = fill_list(block, "exercises", DEFAULT_EXERCISES);
        let block = fill_list(block, "equipment", DEFAULT_EQUIPMENT);
        fill_list(block, "notes", DEFAULT_NOTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn skeleton(index: usize, total: usize, label: Option<&str>) -> ContentBlock {
        WorkoutStrategy.skeleton(Progress::new(index, total), label)
    }

    fn list(block: &ContentBlock, key: &str) -> Vec<String> {
        block
            .get(key)
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn strength_tier_changes_at_thresholds() {
        // 1/4 = 0.25, 2/4 = 0.5, 3/4 = 0.75
        let early = list(&skeleton(1, 4, None), "exercises");
        let mid = list(&skeleton(2, 4, None), "exercises");
        let late = list(&skeleton(3, 4, None), "exercises");
        assert!(early.contains(&"Push-ups - 10 reps".to_string()));
        assert!(mid.contains(&"Jump squats - 20 reps".to_string()));
        assert!(late.contains(&"Pistol squats - 8 each leg".to_string()));
        assert_eq!(early.len(), 14);
    }

    #[test]
    fn intensity_scale_is_clamped() {
        assert_eq!(WorkoutStrategy::intensity(Progress::new(1, 7)), "Light");
        assert_eq!(WorkoutStrategy::intensity(Progress::new(4, 7)), "Moderate");
        assert_eq!(WorkoutStrategy::intensity(Progress::new(7, 7)), "High");
    }

    #[test]
    fn duration_and_heart_rate_scale_linearly() {
        let first = skeleton(1, 4, Some("Week 1"));
        let last = skeleton(4, 4, Some("Week 4"));
        assert_eq!(first.get("duration").unwrap(), &json!("48 minutes"));
        assert_eq!(last.get("duration").unwrap(), &json!("60 minutes"));
        assert!(list(&last, "notes").contains(&"Target heart rate: 150-170 BPM".to_string()));
    }

    #[test]
    fn equipment_grows_with_progress() {
        assert_eq!(list(&skeleton(1, 4, None), "equipment").len(), 3);
        assert!(list(&skeleton(2, 4, None), "equipment").contains(&"Resistance bands".to_string()));
        assert_eq!(list(&skeleton(4, 4, None), "equipment").len(), 5);
    }

    #[test]
    fn focus_table() {
        assert_eq!(WorkoutStrategy::focus(Some("Week 2")), "Building Endurance");
        assert_eq!(WorkoutStrategy::focus(Some("Week 9")), "Maintenance");
        assert_eq!(WorkoutStrategy::focus(Some("February")), "Building Foundation");
        assert_eq!(WorkoutStrategy::focus(Some("November")), "Peak Performance");
        assert_eq!(WorkoutStrategy::focus(Some("Monday")), "General Fitness");
        assert_eq!(WorkoutStrategy::focus(None), "General Fitness");
    }

    #[test]
    fn default_fill_only_touches_empty_fields() {
        let block = ContentBlock::new()
            .with("exercises", json!(["Row - 10 mins"]))
            .with("equipment", json!([]));
        let filled = WorkoutStrategy.default_fill(block);
        assert_eq!(list(&filled, "exercises"), vec!["Row - 10 mins"]);
        assert_eq!(list(&filled, "equipment").len(), 3);
        assert_eq!(list(&filled, "notes").len(), 3);
    }
}
