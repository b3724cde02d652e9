//! Meal-plan content. Macro targets drift with progress; month labels pick
//! seasonal foods, tips and cooking methods.

use serde_json::{Value, json};

use super::{
    ContentStrategy, Progress, base_shape, fill_list, fill_nested, fill_text, overlay, strings,
};
use crate::calendar::month_index;
use crate::model::{ContentBlock, ContentDomain};

const BASE_PROTEIN: i64 = 150;
const BASE_CARBS: i64 = 250;
const BASE_FATS: i64 = 70;
const BASE_CALORIES: i64 = 2000;

const OPTIONS_PER_MEAL: usize = 3;

const NEUTRAL_FOODS: [&str; 3] = ["vegetables", "fruits", "proteins"];
const NEUTRAL_TIPS: &[&str] = &[
    "Stay consistent with portions",
    "Track macros daily",
    "Prep meals in advance",
];

/// Seasonal produce by month, January first.
const SEASONAL_FOODS: [[&str; 3]; 12] = [
    ["root vegetables", "citrus fruits", "winter greens"],
    ["winter squash", "potatoes", "citrus fruits"],
    ["spring greens", "asparagus", "early berries"],
    ["peas", "asparagus", "spring onions"],
    ["strawberries", "new potatoes", "spring vegetables"],
    ["summer berries", "leafy greens", "early tomatoes"],
    ["tomatoes", "summer squash", "stone fruits"],
    ["corn", "tomatoes", "melons"],
    ["apples", "pears", "fall squash"],
    ["pumpkins", "apples", "root vegetables"],
    ["winter squash", "root vegetables", "cranberries"],
    ["winter citrus", "root vegetables", "winter greens"],
];

const TASKS: &[&str] = &[
    "Week 1: Meal prep and grocery planning",
    "Week 2: Review and adjust portions based on progress",
    "Week 3: Try new recipes with seasonal ingredients",
    "Week 4: Monthly progress assessment and adjustments",
];

const DEFAULT_BREAKFAST: &[&str] = &["High-protein breakfast option", "Healthy carbs and fruits"];
const DEFAULT_LUNCH: &[&str] = &["Balanced protein and vegetables", "Complex carbohydrates"];
const DEFAULT_DINNER: &[&str] = &["Lean protein option", "Vegetables and whole grains"];
const DEFAULT_SNACKS: &[&str] = &["Protein-rich snack", "Healthy fruits or nuts"];
const DEFAULT_PROTEIN: &[&str] = &[
    "Track daily protein intake",
    "Aim for balanced protein distribution",
];
const DEFAULT_CARBS: &[&str] = &["Focus on complex carbohydrates", "Monitor carb intake"];
const DEFAULT_FATS: &[&str] = &["Include healthy fats", "Balance fat consumption"];
const DEFAULT_TIPS: &[&str] = &[
    "Stay hydrated throughout the day",
    "Prepare meals in advance",
    "Track your nutrition",
];
const DEFAULT_TASKS: &[&str] = &[
    "Plan weekly meals",
    "Shop for groceries",
    "Prepare meals in advance",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Season for a month name; `None` for anything else.
    pub fn of_month(label: &str) -> Option<Self> {
        month_index(label).map(|m| match m {
            11 | 0 | 1 => Self::Winter,
            2..=4 => Self::Spring,
            5..=7 => Self::Summer,
            _ => Self::Fall,
        })
    }

    pub fn tips(self) -> &'static [&'static str] {
        match self {
            Self::Winter => &[
                "Boost vitamin D intake",
                "Include warming foods",
                "Focus on immune support",
            ],
            Self::Spring => &[
                "Incorporate fresh greens",
                "Lighter cooking methods",
                "Seasonal produce focus",
            ],
            Self::Summer => &["Stay hydrated", "Light, cooling meals", "Grill and fresh prep"],
            Self::Fall => &[
                "Boost fiber intake",
                "Hearty, warming dishes",
                "Immune system support",
            ],
        }
    }

    /// Rewrite a dinner option's cooking method for the season.
    fn adjust_dinner(self, option: String) -> String {
        match self {
            Self::Summer => option.replace("Baked", "Grilled").replace("roast", "grilled"),
            Self::Winter => option.replace("Grilled", "Roasted").replace("stir-fry", "baked"),
            _ => option,
        }
    }
}

/// Daily macro targets at a point in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macros {
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
    pub calories: i64,
}

impl Macros {
    pub fn at(progress: Progress) -> Self {
        Self {
            protein: BASE_PROTEIN + progress.scaled(10.0),
            carbs: BASE_CARBS - progress.scaled(20.0),
            fats: BASE_FATS,
            calories: BASE_CALORIES + progress.scaled(100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MealStrategy;

impl MealStrategy {
    fn foods(label: Option<&str>) -> [&'static str; 3] {
        label
            .and_then(month_index)
            .map(|m| SEASONAL_FOODS[m])
            .unwrap_or(NEUTRAL_FOODS)
    }

    fn meals(foods: [&str; 3], protein: i64, season: Option<Season>) -> Value {
        let [first, second, third] = foods;
        let breakfast = [
            format!("Oatmeal with {first} and almonds ({}g protein)", protein / 6),
            format!("Greek yogurt parfait with {second} ({}g protein)", protein / 6),
            format!("Protein smoothie bowl with {second} ({}g protein)", protein / 6),
        ];
        let lunch = [
            format!("Quinoa bowl with {second} and tofu ({}g protein)", protein / 4),
            format!("Lean protein salad with {first} ({}g protein)", protein / 4),
            format!("Whole grain wrap with {third} ({}g protein)", protein / 4),
        ];
        let dinner: Vec<String> = [
            format!("Grilled fish with {third} ({}g protein)", protein / 3),
            format!("Lean protein stir-fry with {first} ({}g protein)", protein / 3),
            format!("Baked protein with {second} ({}g protein)", protein / 3),
        ]
        .into_iter()
        .map(|option| match season {
            Some(season) => season.adjust_dinner(option),
            None => option,
        })
        .take(OPTIONS_PER_MEAL)
        .collect();
        let snacks = [
            format!("Fresh {second} with protein yogurt dip"),
            format!("Trail mix with nuts and dried {second}"),
            format!("Protein smoothie with {first}"),
        ];

        json!({
            "breakfast": breakfast,
            "lunch": lunch,
            "dinner": dinner,
            "snacks": snacks,
        })
    }
}

impl ContentStrategy for MealStrategy {
    fn domain(&self) -> ContentDomain {
        ContentDomain::Meal
    }

    fn skeleton(&self, progress: Progress, label: Option<&str>) -> ContentBlock {
        let Macros {
            protein,
            carbs,
            fats,
            calories,
        } = Macros::at(progress);
        let season = label.and_then(Season::of_month);
        let tips = season.map(Season::tips).unwrap_or(NEUTRAL_TIPS);

        overlay(
            base_shape(ContentDomain::Meal),
            vec![
                ("meals", Self::meals(Self::foods(label), protein, season)),
                (
                    "nutrients",
                    json!({
                        "protein": [
                            format!("Target {protein}g protein daily"),
                            "Space protein intake throughout the day",
                            format!("Minimum {}g protein per main meal", protein / 4),
                        ],
                        "carbs": [
                            format!("Target {carbs}g complex carbs daily"),
                            "Focus on whole grains and vegetables",
                            "Limit refined sugars and processed carbs",
                        ],
                        "fats": [
                            format!("Target {fats}g healthy fats daily"),
                            "Include sources of omega-3 fatty acids",
                            "Limit saturated fats to 20g daily",
                        ],
                    }),
                ),
                (
                    "macros",
                    json!({
                        "protein_target": format!("{protein}g"),
                        "carbs_target": format!("{carbs}g"),
                        "fats_target": format!("{fats}g"),
                        "total_calories": calories.to_string(),
                    }),
                ),
                ("tasks", strings(TASKS)),
                ("tips", strings(tips)),
                (
                    "tracking",
                    json!({
                        "weight": format!(
                            "Track weekly: Target {:.1}% progress",
                            progress.fraction() * 100.0
                        ),
                        "protein_intake": format!("{protein}g daily"),
                        "water_intake": "2-3 liters daily",
                    }),
                ),
            ],
        )
    }

    fn default_fill(&self, block: ContentBlock) -> ContentBlock {
        let block = fill_nested(
            block,
            "meals",
            &[
                ("breakfast", DEFAULT_BREAKFAST),
                ("lunch", DEFAULT_LUNCH),
                ("dinner", DEFAULT_DINNER),
                ("snacks", DEFAULT_SNACKS),
            ],
        );
        let block = fill_nested(
            block,
            "nutrients",
            &[
                ("protein", DEFAULT_PROTEIN),
                ("carbs", DEFAULT_CARBS),
                ("fats", DEFAULT_FATS),
            ],
        );
        let block = fill_text(
            block,
            "tracking",
            &[
                ("weight", "Track weekly"),
                ("protein_intake", "Track daily"),
                ("water_intake", "2-3 liters daily"),
            ],
        );
        let block = fill_list(block, "tips", DEFAULT_TIPS);
        fill_list(block, "tasks", DEFAULT_TASKS)
    }
}
