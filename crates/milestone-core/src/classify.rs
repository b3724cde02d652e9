//! Query classification: time granularity, explicit duration, content domain.
//!
//! Pure functions over the raw query text. Classification never fails;
//! ambiguity is resolved by a fixed precedence order and a global default
//! of [`Granularity::Week`].

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Classification, ContentDomain, Granularity};

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

static NUMERIC_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)[\s-]*(day|week|month|year)").expect("numeric unit pattern is valid")
});

static SPELLED_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(seven|thirty)[\s-]*(day|week|month)").expect("spelled unit pattern is valid")
});

/// Words that map straight to a granularity.
const DIRECT_WORDS: &[(&str, Granularity)] = &[
    ("daily", Granularity::Day),
    ("tomorrow", Granularity::Day),
    ("today", Granularity::Day),
    ("weekly", Granularity::Week),
    ("monthly", Granularity::Month),
    ("yearly", Granularity::Year),
    ("annual", Granularity::Year),
];

/// Surface forms of each time unit.
const UNIT_VARIANTS: &[(Granularity, &[&str])] = &[
    (
        Granularity::Day,
        &["day", "days", "daily", "tomorrow", "today"],
    ),
    (
        Granularity::Week,
        &["week", "weeks", "weekly", "7-day", "seven-day"],
    ),
    (
        Granularity::Month,
        &["month", "months", "monthly", "30-day", "thirty-day"],
    ),
    (
        Granularity::Year,
        &["year", "years", "yearly", "annual", "annually"],
    ),
];

const PHRASES: &[(&str, Granularity)] = &[
    ("next week", Granularity::Week),
    ("this month", Granularity::Month),
    ("this year", Granularity::Year),
    ("daily routine", Granularity::Day),
    ("weekly plan", Granularity::Week),
    ("monthly schedule", Granularity::Month),
    ("yearly goals", Granularity::Year),
];

const DAY_HINTS: &[&str] = &["routine", "today", "tomorrow", "schedule"];
const WEEK_HINTS: &[&str] = &["weekend", "weekly"];

/// Compound phrases that force a granularity after the main pass.
/// Groups are checked in order; the first group with a hit wins.
const COMPOUND_OVERRIDES: &[(&[&str], Granularity)] = &[
    (&["week long", "week-long", "weekly"], Granularity::Week),
    (&["month long", "month-long", "monthly"], Granularity::Month),
    (
        &["year long", "year-long", "yearly", "annual"],
        Granularity::Year,
    ),
    (
        &["daily", "day long", "day-long", "tomorrow's", "today's"],
        Granularity::Day,
    ),
];

const EXPLICIT_OVERRIDES: &[(&[&str], Granularity)] = &[
    (&["7 day", "seven day", "7-day"], Granularity::Week),
    (&["30 day", "thirty day", "30-day"], Granularity::Month),
    (&["365 day", "year long"], Granularity::Year),
];

/// Recurring-habit activities for which a single day is under-specified.
const HABIT_WORDS: &[&str] = &["workout", "diet", "meal", "study", "learn"];

const NUMBER_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Domain vocabularies in priority order. `General` has no vocabulary.
const DOMAIN_VOCABULARY: &[(ContentDomain, &[&str])] = &[
    (
        ContentDomain::Workout,
        &["workout", "fitness", "exercise", "training", "gym"],
    ),
    (
        ContentDomain::Study,
        &[
            "study",
            "learn",
            "practice",
            "education",
            "course",
            "ielts",
            "coding",
        ],
    ),
    (
        ContentDomain::Meal,
        &["diet", "meal", "food", "nutrition", "protein", "vegetarian"],
    ),
    (
        ContentDomain::Finance,
        &["budget", "savings", "financial", "money", "finance"],
    ),
];

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can",
    "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not",
    "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "you", "your", "yours",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify a free-text query. Total: every input yields a value.
pub fn classify(query: &str) -> Classification {
    let classification = Classification {
        granularity: detect_granularity(query),
        duration: extract_duration(query),
        domain: detect_domain(query),
    };
    tracing::debug!(
        granularity = %classification.granularity,
        duration = ?classification.duration,
        domain = %classification.domain,
        "classified query"
    );
    classification
}

/// Resolve the plan granularity using the precedence chain plus post-pass
/// overrides.
pub fn detect_granularity(query: &str) -> Granularity {
    let lower = query.to_lowercase();
    let mut granularity = base_granularity(&lower);

    if let Some(g) = first_group_hit(&lower, COMPOUND_OVERRIDES) {
        granularity = g;
    }
    if let Some(g) = first_group_hit(&lower, EXPLICIT_OVERRIDES) {
        granularity = g;
    }
    if granularity == Granularity::Day && HABIT_WORDS.iter().any(|w| lower.contains(w)) {
        granularity = Granularity::Week;
    }
    granularity
}

/// First number word or digit in `1..=10`, scanning tokens left to right.
pub fn extract_duration(query: &str) -> Option<u32> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .find_map(|token| {
            if let Some((_, n)) = NUMBER_WORDS.iter().find(|(w, _)| *w == token) {
                return Some(*n);
            }
            token.parse::<u32>().ok().filter(|n| (1..=10).contains(n))
        })
}

/// First vocabulary (in priority order) with a keyword in the query.
pub fn detect_domain(query: &str) -> ContentDomain {
    let lower = query.to_lowercase();
    DOMAIN_VOCABULARY
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(domain, _)| *domain)
        .unwrap_or(ContentDomain::General)
}

/// Lowercase, drop stop words and strip symbols other than `.,!?-`.
pub fn clean_query(query: &str) -> String {
    let kept: Vec<String> = tokens(query)
        .into_iter()
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect();
    kept.join(" ")
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || "_.,!?-".contains(*c))
        .collect()
}

/// Title for a plan built from `query`: the cleaned query in title case.
pub fn plan_title(query: &str) -> String {
    let cleaned = clean_query(query);
    if cleaned.trim().is_empty() {
        return "Plan".to_string();
    }
    title_case(&cleaned)
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn base_granularity(lower: &str) -> Granularity {
    if let Some(g) = numeric_unit(lower) {
        return g;
    }
    if let Some(g) = token_unit(&tokens(lower)) {
        return g;
    }
    if let Some((_, g)) = PHRASES.iter().find(|(p, _)| lower.contains(p)) {
        return *g;
    }
    if DAY_HINTS.iter().any(|w| lower.contains(w)) {
        return Granularity::Day;
    }
    if WEEK_HINTS.iter().any(|w| lower.contains(w)) {
        return Granularity::Week;
    }
    Granularity::Week
}

/// `"<number> <unit>"` patterns, digits first, then spelled-out numbers.
fn numeric_unit(lower: &str) -> Option<Granularity> {
    if let Some(caps) = NUMERIC_UNIT.captures(lower) {
        let count = caps[1].parse::<u64>().ok();
        return unit_for(&caps[2]).map(|unit| normalize_days(unit, count));
    }
    if let Some(caps) = SPELLED_UNIT.captures(lower) {
        let count = if &caps[1] == "seven" { 7 } else { 30 };
        return unit_for(&caps[2]).map(|unit| normalize_days(unit, Some(count)));
    }
    None
}

/// Walk tokens in order; direct words and unit variants both terminate.
fn token_unit(tokens: &[String]) -> Option<Granularity> {
    for (i, token) in tokens.iter().enumerate() {
        if let Some((_, g)) = DIRECT_WORDS.iter().find(|(w, _)| w == token) {
            return Some(*g);
        }
        let unit = UNIT_VARIANTS
            .iter()
            .find(|(_, variants)| variants.contains(&token.as_str()))
            .map(|(unit, _)| *unit);
        if let Some(unit) = unit {
            let prev = i
                .checked_sub(1)
                .and_then(|p| tokens[p].parse::<u64>().ok());
            return Some(normalize_days(unit, prev));
        }
    }
    None
}

/// 7 days is a week and 30 days a month.
fn normalize_days(unit: Granularity, count: Option<u64>) -> Granularity {
    match (unit, count) {
        (Granularity::Day, Some(7)) => Granularity::Week,
        (Granularity::Day, Some(30)) => Granularity::Month,
        _ => unit,
    }
}

fn unit_for(word: &str) -> Option<Granularity> {
    word.parse().ok()
}

fn first_group_hit(lower: &str, groups: &[(&[&str], Granularity)]) -> Option<Granularity> {
    groups
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| lower.contains(p)))
        .map(|(_, g)| *g)
}

/// Lowercased word tokens. Keeps inner hyphens (`7-day`), drops a
/// possessive suffix (`tomorrow's` -> `tomorrow`).
fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter_map(|raw| {
            let word = raw.split('\'').next().unwrap_or(raw);
            let word = word.trim_matches(|c: char| !c.is_alphanumeric());
            (!word.is_empty()).then(|| word.to_string())
        })
        .collect()
}

/// Uppercase every letter that follows a non-letter, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- granularity precedence --

    #[test]
    fn numeric_seven_days_is_a_week() {
        assert_eq!(detect_granularity("Plan my 7 days of reading"), Granularity::Week);
        assert_eq!(detect_granularity("a 7-day cleanse"), Granularity::Week);
    }

    #[test]
    fn numeric_thirty_days_is_a_month() {
        assert_eq!(detect_granularity("30 day challenge"), Granularity::Month);
        assert_eq!(detect_granularity("thirty-day sprint"), Granularity::Month);
    }

    #[test]
    fn numeric_unit_is_taken_literally() {
        assert_eq!(detect_granularity("a 3 month roadmap"), Granularity::Month);
        assert_eq!(detect_granularity("a 2 year roadmap"), Granularity::Year);
        assert_eq!(detect_granularity("12-week course"), Granularity::Week);
    }

    #[test]
    fn direct_word_mapping() {
        assert_eq!(detect_granularity("annual review of goals"), Granularity::Year);
        assert_eq!(detect_granularity("my tomorrow errands"), Granularity::Day);
    }

    #[test]
    fn unit_token_without_number() {
        assert_eq!(detect_granularity("plan my year"), Granularity::Year);
        assert_eq!(detect_granularity("errands for the month"), Granularity::Month);
    }

    #[test]
    fn phrase_table() {
        // "next week" is caught earlier by the unit token "week".
        assert_eq!(detect_granularity("things for next week"), Granularity::Week);
    }

    #[test]
    fn domain_word_defaults() {
        assert_eq!(detect_granularity("my morning routine"), Granularity::Day);
        assert_eq!(detect_granularity("a relaxing weekend"), Granularity::Week);
    }

    #[test]
    fn global_default_is_week() {
        assert_eq!(detect_granularity("get organized"), Granularity::Week);
        assert_eq!(detect_granularity(""), Granularity::Week);
    }

    #[test]
    fn compound_phrase_overrides_earlier_steps() {
        // "routine" alone would select day.
        assert_eq!(
            detect_granularity("Create a month-long workout routine for weight loss"),
            Granularity::Month
        );
        assert_eq!(
            detect_granularity("Plan a year-long financial savings strategy"),
            Granularity::Year
        );
    }

    #[test]
    fn explicit_day_counts_override_compounds() {
        assert_eq!(detect_granularity("a monthly 7-day reset"), Granularity::Week);
        assert_eq!(detect_granularity("365 day journaling"), Granularity::Year);
    }

    #[test]
    fn habit_domains_promote_day_to_week() {
        assert_eq!(detect_granularity("Plan tomorrow's workout"), Granularity::Week);
        assert_eq!(detect_granularity("Create a daily study plan"), Granularity::Week);
        assert_eq!(detect_granularity("Plan tomorrow's errands"), Granularity::Day);
    }

    // -- duration --

    #[test]
    fn duration_from_digits_and_words() {
        assert_eq!(extract_duration("a 3 month plan"), Some(3));
        assert_eq!(extract_duration("six weeks of running"), Some(6));
        assert_eq!(extract_duration("Build a 7-day diet"), Some(7));
    }

    #[test]
    fn duration_first_match_wins() {
        assert_eq!(extract_duration("two plans for 5 months"), Some(2));
    }

    #[test]
    fn duration_ignores_out_of_range_and_substrings() {
        assert_eq!(extract_duration("a 12-month plan"), None);
        assert_eq!(extract_duration("save money often"), None);
        assert_eq!(extract_duration("no numbers here"), None);
    }

    // -- domain --

    #[test]
    fn domain_priority_order() {
        assert_eq!(detect_domain("gym and diet"), ContentDomain::Workout);
        assert_eq!(detect_domain("learn about food"), ContentDomain::Study);
        assert_eq!(detect_domain("protein budget"), ContentDomain::Meal);
        assert_eq!(detect_domain("monthly budget"), ContentDomain::Finance);
        assert_eq!(detect_domain("visit grandma"), ContentDomain::General);
    }

    // -- full classification scenarios --

    #[test]
    fn scenario_protein_diet() {
        let c = classify("Build a 7-day protein rich diet plan for muscle gain");
        assert_eq!(c.granularity, Granularity::Week);
        assert_eq!(c.domain, ContentDomain::Meal);
    }

    #[test]
    fn scenario_month_workout() {
        let c = classify("Create a month-long workout routine for weight loss");
        assert_eq!(c.granularity, Granularity::Month);
        assert_eq!(c.duration, None);
        assert_eq!(c.domain, ContentDomain::Workout);
    }

    #[test]
    fn scenario_year_finance() {
        let c = classify("Plan a year-long financial savings strategy");
        assert_eq!(c.granularity, Granularity::Year);
        assert_eq!(c.duration, None);
        assert_eq!(c.domain, ContentDomain::Finance);
    }

    #[test]
    fn classify_is_total_on_odd_input() {
        for q in ["", "   ", "!!!", "99999999999999999999999 day", "日本語のクエリ"] {
            let c = classify(q);
            assert!(ContentDomain::ALL.contains(&c.domain));
        }
    }

    // -- title --

    #[test]
    fn plan_title_drops_stop_words_and_title_cases() {
        assert_eq!(
            plan_title("Build a 7-day protein rich diet plan for muscle gain"),
            "Build 7-Day Protein Rich Diet Plan Muscle Gain"
        );
    }

    #[test]
    fn plan_title_falls_back_when_empty() {
        assert_eq!(plan_title("the a of"), "Plan");
        assert_eq!(plan_title(""), "Plan");
    }

    #[test]
    fn clean_query_strips_symbols() {
        assert_eq!(clean_query("Save $500 (fast)!"), "save 500 fast");
    }
}
