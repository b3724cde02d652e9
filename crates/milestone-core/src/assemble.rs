//! Plan assembly: time slots, per-slot content, and the final default fill.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::calendar::{MONTHS, WEEKDAYS, entry_date};
use crate::classify::plan_title;
use crate::ingest::{PromptContext, ResponseIngestor};
use crate::model::{Classification, ContentBlock, ContentDomain, Entry, Granularity, Plan};
use crate::template::TemplateEngine;

/// Label used for the single entry of a day plan.
pub const TODAY: &str = "Today";

/// One time slot of a plan, as seen by a [`ContentProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySlot {
    /// The user's request text.
    pub query: String,
    /// Granularity of the whole plan.
    pub plan_period: Granularity,
    pub domain: ContentDomain,
    /// 1-based position within the plan.
    pub index: usize,
    pub total: usize,
    /// `"Monday"`, `"Week 2"`, `"March"` or `"Today"`.
    pub label: String,
}

impl EntrySlot {
    /// Granularity of the entry itself.
    pub fn period(&self) -> Granularity {
        self.plan_period.entry_period()
    }

    pub fn title(&self) -> String {
        match self.plan_period {
            Granularity::Week | Granularity::Day => format!("{}'s Focus", self.label),
            Granularity::Month | Granularity::Year => format!("{} Focus", self.label),
        }
    }
}

/// Source of per-entry content.
///
/// # Object Safety
///
/// Object-safe so planners can hold an `Arc<dyn ContentProvider>`.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Content for one slot. Must not fail.
    async fn content(&self, slot: &EntrySlot) -> ContentBlock;
}

const _: () = {
    fn _assert_object_safe(_: &dyn ContentProvider) {}
};

#[async_trait]
impl ContentProvider for TemplateEngine {
    fn name(&self) -> &str {
        "template"
    }

    async fn content(&self, slot: &EntrySlot) -> ContentBlock {
        self.generate(slot.domain, slot.index, slot.total, Some(&slot.label))
    }
}

/// Template skeletons elaborated by a generative service.
///
/// When the service never produces usable content the skeleton itself is
/// used, so refined plans are never worse than offline ones.
#[derive(Debug, Clone)]
pub struct Refiner {
    engine: TemplateEngine,
    ingestor: ResponseIngestor,
}

impl Refiner {
    pub fn new(ingestor: ResponseIngestor) -> Self {
        Self {
            engine: TemplateEngine::new(),
            ingestor,
        }
    }
}

#[async_trait]
impl ContentProvider for Refiner {
    fn name(&self) -> &str {
        "refiner"
    }

    async fn content(&self, slot: &EntrySlot) -> ContentBlock {
        let skeleton = self
            .engine
            .generate(slot.domain, slot.index, slot.total, Some(&slot.label));
        let ctx = PromptContext::new(slot.query.as_str(), slot.plan_period, slot.domain).for_entry(
            Some(&slot.label),
            slot.index,
            slot.total,
        );
        match self.ingestor.try_refine(&skeleton, &ctx).await {
            Ok(refined) => keep_skeleton_keys(refined, &skeleton),
            Err(err) => {
                warn!(entry = slot.index, error = %err, "refiner: keeping template content");
                skeleton
            }
        }
    }
}

/// Copy over any top-level key the refined block dropped.
fn keep_skeleton_keys(mut refined: ContentBlock, skeleton: &ContentBlock) -> ContentBlock {
    for (key, value) in skeleton.as_map() {
        if refined.get(key).is_none() {
            refined.insert(key, value.clone());
        }
    }
    refined
}

/// Builds the entry sequence for a classification and fills each entry
/// from a [`ContentProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanAssembler {
    today: Option<NaiveDate>,
    engine: TemplateEngine,
}

impl PlanAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin "today" for date calculation.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Period labels for a plan, in order.
    pub fn labels(granularity: Granularity, duration: Option<u32>) -> Vec<String> {
        let count = granularity.entry_count(duration);
        match granularity {
            Granularity::Week => WEEKDAYS.iter().take(count).map(|d| d.to_string()).collect(),
            Granularity::Month => (1..=count).map(|n| format!("Week {n}")).collect(),
            Granularity::Year => MONTHS.iter().take(count).map(|m| m.to_string()).collect(),
            Granularity::Day => vec![TODAY.to_string()],
        }
    }

    /// Slots for a query's classification.
    pub fn slots(&self, query: &str, classification: &Classification) -> Vec<EntrySlot> {
        let labels = Self::labels(classification.granularity, classification.duration);
        let total = labels.len();
        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| EntrySlot {
                query: query.to_string(),
                plan_period: classification.granularity,
                domain: classification.domain,
                index: i + 1,
                total,
                label,
            })
            .collect()
    }

    /// Build the full plan. Entries are requested one at a time, in order.
    pub async fn assemble(
        &self,
        query: &str,
        classification: &Classification,
        provider: &dyn ContentProvider,
    ) -> Plan {
        let today = self.today();
        let slots = self.slots(query, classification);
        info!(
            granularity = %classification.granularity,
            domain = %classification.domain,
            entries = slots.len(),
            provider = provider.name(),
            "assemble: building plan"
        );

        let mut entries = Vec::with_capacity(slots.len());
        for slot in &slots {
            let content = provider.content(slot).await;
            let description = self.engine.default_fill(slot.domain, content);
            debug!(entry = slot.index, label = %slot.label, "assemble: entry ready");
            entries.push(Entry {
                period: slot.period(),
                period_name: slot.label.clone(),
                date: entry_date(classification.granularity, &slot.label, today),
                title: slot.title(),
                description,
            });
        }

        Plan {
            period: classification.granularity,
            title: plan_title(query),
            entries,
        }
    }
}
