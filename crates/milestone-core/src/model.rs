use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Time granularity of a plan or of one of its entries.
///
/// Variants are declared finest-first so the derived `Ord` matches
/// coarseness: `Day < Week < Month < Year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    /// Granularity of the entries inside a plan of this granularity.
    ///
    /// A single-day plan holds one `day` entry.
    pub fn entry_period(self) -> Granularity {
        match self {
            Self::Day | Self::Week => Self::Day,
            Self::Month => Self::Week,
            Self::Year => Self::Month,
        }
    }

    /// Number of entries when the query states no explicit duration.
    pub fn default_entry_count(self) -> usize {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 4,
            Self::Year => 12,
        }
    }

    /// Number of entries for this granularity given an optional duration.
    ///
    /// Week plans always hold 7 days and day plans a single entry; month
    /// plans hold `duration` weeks and year plans at most 12 months.
    pub fn entry_count(self, duration: Option<u32>) -> usize {
        let explicit = duration.filter(|d| *d > 0).map(|d| d as usize);
        match (self, explicit) {
            (Self::Month, Some(n)) => n,
            (Self::Year, Some(n)) => n.min(12),
            _ => self.default_entry_count(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(s)
    }
}

impl FromStr for Granularity {
    type Err = GranularityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(GranularityParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Granularity`] string.
#[derive(Debug, Clone)]
pub struct GranularityParseError(pub String);

impl fmt::Display for GranularityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid granularity: {:?}", self.0)
    }
}

impl std::error::Error for GranularityParseError {}

// ---------------------------------------------------------------------------

/// Subject-matter category that selects the content shape and progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentDomain {
    Workout,
    Study,
    Meal,
    Finance,
    General,
}

impl ContentDomain {
    /// All domains, in classification priority order.
    pub const ALL: [ContentDomain; 5] = [
        Self::Workout,
        Self::Study,
        Self::Meal,
        Self::Finance,
        Self::General,
    ];
}

impl fmt::Display for ContentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Workout => "workout",
            Self::Study => "study",
            Self::Meal => "meal",
            Self::Finance => "finance",
            Self::General => "general",
        };
        f.write_str(s)
    }
}

impl FromStr for ContentDomain {
    type Err = ContentDomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workout" => Ok(Self::Workout),
            "study" => Ok(Self::Study),
            "meal" => Ok(Self::Meal),
            "finance" => Ok(Self::Finance),
            "general" => Ok(Self::General),
            other => Err(ContentDomainParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ContentDomain`] string.
#[derive(Debug, Clone)]
pub struct ContentDomainParseError(pub String);

impl fmt::Display for ContentDomainParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid content domain: {:?}", self.0)
    }
}

impl std::error::Error for ContentDomainParseError {}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Domain-specific nested mapping describing one entry.
///
/// Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentBlock(Map<String, Value>);

impl ContentBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; returns `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(key.to_string(), value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ContentBlock {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Output of the query classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub granularity: Granularity,
    /// Explicit numeric duration stated in the query, if any.
    pub duration: Option<u32>,
    pub domain: ContentDomain,
}

/// One time slot's worth of content within a [`Plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub period: Granularity,
    #[serde(rename = "periodName")]
    pub period_name: String,
    /// Single date or `"A to B"` range.
    pub date: String,
    pub title: String,
    pub description: ContentBlock,
}

/// Top-level artifact returned for a query. Entries are chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub period: Granularity,
    pub title: String,
    pub entries: Vec<Entry>,
}
