//! Read-only aggregations over usage, feedback and engagement records.
//!
//! Every function works on a slice the caller already filtered, groups it by
//! a composite key and returns rows sorted newest day first.

use crate::engagement::EngagementEvent;
use crate::feedback::{FeedbackRecord, FeedbackSignal};
use crate::usage::UsageRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Gaps between consecutive events longer than this are idle time
pub const IDLE_CUTOFF_SECS: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyUsageSummary {
    pub date: NaiveDate,
    pub user_id: String,
    pub provider: String,
    pub model_id: String,
    pub request_count: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FeedbackSummary {
    pub date: NaiveDate,
    pub user_id: String,
    pub language_id: Option<String>,
    pub model_id: String,
    pub feature: String,
    pub functionality: Option<String>,
    pub learning_mode: Option<String>,
    pub learning_level: Option<String>,
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EngagementSummary {
    pub date: NaiveDate,
    pub user_id: String,
    pub language_id: Option<String>,
    pub model_id: String,
    pub feature: String,
    pub functionality: Option<String>,
    pub learning_mode: Option<String>,
    pub learning_level: Option<String>,
    pub action_count: u64,
    pub xp_total: i64,
    pub active_seconds: f64,
    pub active_minutes: f64,
    pub actions_per_active_minute: f64,
    pub xp_per_active_minute: f64,
}

/// Shared grouping key of the feedback and engagement summaries
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct LearningKey {
    date: NaiveDate,
    user_id: String,
    language_id: Option<String>,
    model_id: String,
    feature: String,
    functionality: Option<String>,
    learning_mode: Option<String>,
    learning_level: Option<String>,
}

fn truncate<T>(mut rows: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

/// Sum tokens and cost per (day, user, provider, model). Costs in different
/// currencies are never added together.
pub fn daily_usage_summary(records: &[UsageRecord], limit: Option<usize>) -> Vec<DailyUsageSummary> {
    let mut groups: BTreeMap<(NaiveDate, &str, &str, &str, &str), DailyUsageSummary> =
        BTreeMap::new();

    for record in records {
        let date = record.timestamp.date_naive();
        let row = groups
            .entry((
                date,
                record.user_id.as_str(),
                record.provider.as_str(),
                record.model_id.as_str(),
                record.currency.as_str(),
            ))
            .or_insert_with(|| DailyUsageSummary {
                date,
                user_id: record.user_id.clone(),
                provider: record.provider.clone(),
                model_id: record.model_id.clone(),
                request_count: 0,
                input_tokens: 0,
                output_tokens: 0,
                total_tokens: 0,
                input_cost: 0.0,
                output_cost: 0.0,
                total_cost: 0.0,
                currency: record.currency.clone(),
            });
        row.request_count += 1;
        row.input_tokens += record.input_tokens;
        row.output_tokens += record.output_tokens;
        row.total_tokens += record.total_tokens;
        row.input_cost += record.input_cost;
        row.output_cost += record.output_cost;
        row.total_cost += record.total_cost;
    }

    let mut rows: Vec<_> = groups.into_values().collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    truncate(rows, limit)
}

/// Count signals per day and learning context
pub fn feedback_summary(records: &[FeedbackRecord], limit: Option<usize>) -> Vec<FeedbackSummary> {
    let mut groups: BTreeMap<LearningKey, [u64; 3]> = BTreeMap::new();

    for record in records {
        let key = LearningKey {
            date: record.created_at.date_naive(),
            user_id: record.user_id.clone(),
            language_id: record.language_id.clone(),
            model_id: record.model_id.clone(),
            feature: record.feature.clone(),
            functionality: record.functionality.clone(),
            learning_mode: record.learning_mode.clone(),
            learning_level: record.learning_level.clone(),
        };
        let counts = groups.entry(key).or_default();
        match record.signal {
            FeedbackSignal::Positive => counts[0] += 1,
            FeedbackSignal::Negative => counts[1] += 1,
            FeedbackSignal::Neutral => counts[2] += 1,
        }
    }

    let mut rows: Vec<_> = groups
        .into_iter()
        .map(|(key, [positive, negative, neutral])| FeedbackSummary {
            date: key.date,
            user_id: key.user_id,
            language_id: key.language_id,
            model_id: key.model_id,
            feature: key.feature,
            functionality: key.functionality,
            learning_mode: key.learning_mode,
            learning_level: key.learning_level,
            total: positive + negative + neutral,
            positive,
            negative,
            neutral,
        })
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.total.cmp(&a.total)));
    truncate(rows, limit)
}

/// Seconds covered by gaps of at most `IDLE_CUTOFF_SECS` between consecutive
/// events. `events` must be sorted by timestamp.
pub fn active_seconds(events: &[&EngagementEvent]) -> f64 {
    events
        .windows(2)
        .map(|pair| (pair[1].timestamp - pair[0].timestamp).num_milliseconds() as f64 / 1000.0)
        .filter(|gap| *gap <= IDLE_CUTOFF_SECS)
        .sum()
}

/// `count / minutes`, or the raw count when no active time was observed
fn per_active_minute(count: f64, active_minutes: f64) -> f64 {
    if active_minutes > 0.0 {
        count / active_minutes
    } else {
        count
    }
}

/// Derive active time, XP and per-minute rates per day and learning context
pub fn engagement_summary(
    events: &[EngagementEvent],
    limit: Option<usize>,
) -> Vec<EngagementSummary> {
    let mut groups: BTreeMap<LearningKey, Vec<&EngagementEvent>> = BTreeMap::new();

    for event in events {
        let key = LearningKey {
            date: event.timestamp.date_naive(),
            user_id: event.user_id.clone(),
            language_id: event.language_id.clone(),
            model_id: event.model_id.clone(),
            feature: event.feature.clone(),
            functionality: event.functionality.clone(),
            learning_mode: event.learning_mode.clone(),
            learning_level: event.learning_level.clone(),
        };
        groups.entry(key).or_default().push(event);
    }

    let mut rows: Vec<_> = groups
        .into_iter()
        .map(|(key, mut bucket)| {
            bucket.sort_by_key(|event| event.timestamp);

            let action_count = bucket.len() as u64;
            let xp_total: i64 = bucket.iter().filter_map(|event| event.xp_delta).sum();
            let active_seconds = active_seconds(&bucket);
            let active_minutes = active_seconds / 60.0;

            EngagementSummary {
                date: key.date,
                user_id: key.user_id,
                language_id: key.language_id,
                model_id: key.model_id,
                feature: key.feature,
                functionality: key.functionality,
                learning_mode: key.learning_mode,
                learning_level: key.learning_level,
                action_count,
                xp_total,
                active_seconds,
                active_minutes,
                actions_per_active_minute: per_active_minute(action_count as f64, active_minutes),
                xp_per_active_minute: per_active_minute(xp_total as f64, active_minutes),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.action_count.cmp(&a.action_count))
    });
    truncate(rows, limit)
}
