//! Personal-finance content: savings, investment and expense-reduction
//! percentages rise with progress; quarter-opening months get their own
//! task list.

use serde_json::json;

use super::{
    ContentStrategy, Progress, base_shape, fill_list, fill_nested, fill_text, overlay, strings,
};
use crate::model::{ContentBlock, ContentDomain};

const BASE_SAVINGS: f64 = 20.0;
const BASE_INVESTMENT: f64 = 30.0;
const BASE_EXPENSE_REDUCTION: f64 = 5.0;

const COMMON_TASKS: &[&str] = &[
    "Review and categorize expenses",
    "Update budget tracking spreadsheet",
    "Check progress on savings goals",
];

const INCOME: &[&str] = &["Regular income sources", "Additional income opportunities"];
const EXPENSES: &[&str] = &["Essential expenses", "Non-essential spending"];
const SAVINGS: &[&str] = &["Emergency fund allocation", "Long-term savings goals"];
const EXPENSE_CATEGORIES: &[&str] = &[
    "Housing and utilities",
    "Food and groceries",
    "Transportation",
    "Healthcare",
];
const TIPS: &[&str] = &[
    "Automate transfers to savings",
    "Review subscriptions monthly",
    "Keep an emergency fund of 6 months",
];
const DEFAULT_TIPS: &[&str] = &[
    "Track every expense",
    "Pay yourself first",
    "Review your budget regularly",
];

/// Percentage targets at a point in the sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub savings: f64,
    pub investment: f64,
    pub expense_reduction: f64,
}

impl Targets {
    pub fn at(progress: Progress) -> Self {
        let p = progress.fraction();
        Self {
            savings: BASE_SAVINGS + 5.0 * p,
            investment: BASE_INVESTMENT + 10.0 * p,
            expense_reduction: BASE_EXPENSE_REDUCTION + 5.0 * p,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FinanceStrategy;

impl FinanceStrategy {
    /// Task list for a period label.
    pub fn tasks(label: Option<&str>) -> &'static [&'static str] {
        match label {
            Some("January") => &[
                "Set annual financial goals",
                "Review previous year's performance",
            ],
            Some("April") => &["Prepare tax documents", "Review Q1 performance"],
            Some("July") => &["Mid-year financial review", "Adjust investment strategy"],
            Some("October") => &["Q4 planning", "Holiday budget preparation"],
            _ => COMMON_TASKS,
        }
    }
}

impl ContentStrategy for FinanceStrategy {
    fn domain(&self) -> ContentDomain {
        ContentDomain::Finance
    }

    fn skeleton(&self, progress: Progress, label: Option<&str>) -> ContentBlock {
        let targets = Targets::at(progress);

        overlay(
            base_shape(ContentDomain::Finance),
            vec![
                (
                    "budget",
                    json!({
                        "income": INCOME,
                        "expenses": EXPENSES,
                        "savings": SAVINGS,
                    }),
                ),
                (
                    "goals",
                    json!({
                        "savings_target": format!("{:.1}%", targets.savings),
                        "expense_reduction": format!("{:.1}%", targets.expense_reduction),
                        "investment_allocation": format!("{:.1}%", targets.investment),
                    }),
                ),
                (
                    "tracking",
                    json!({
                        "current_balance": "Update weekly",
                        "savings_progress": format!("Target: {:.1}% of income", targets.savings),
                        "expense_categories": EXPENSE_CATEGORIES,
                    }),
                ),
                ("tasks", strings(Self::tasks(label))),
                ("tips", strings(TIPS)),
            ],
        )
    }

    fn default_fill(&self, block: ContentBlock) -> ContentBlock {
        let block = fill_nested(
            block,
            "budget",
            &[("income", INCOME), ("expenses", EXPENSES), ("savings", SAVINGS)],
        );
        let block = fill_text(
            block,
            "tracking",
            &[
                ("current_balance", "Update weekly"),
                ("savings_progress", "Track monthly"),
            ],
        );
        let block = fill_nested(block, "tracking", &[("expense_categories", EXPENSE_CATEGORIES)]);
        let block = fill_list(block, "tasks", COMMON_TASKS);
        fill_list(block, "tips", DEFAULT_TIPS)
    }
}
