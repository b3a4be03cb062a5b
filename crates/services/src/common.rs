use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

/// Shared error types for repository operations across all domains.
/// These errors represent storage concerns rather than domain-specific
/// business logic.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("'{0}' does not exist")]
    NotFound(String),
    #[error("Cannot add this resource as it already exists")]
    AlreadyExists,
    #[error("Storage operation error: {0}")]
    StorageError(String),
}

/// Offset/limit window over a newest-first result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

impl Page {
    pub fn new(limit: Option<usize>, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Every row, no window
    pub fn all() -> Self {
        Self::default()
    }

    /// Apply the window, returning the page and the total number of rows before paging
    pub fn apply<T>(&self, rows: Vec<T>) -> (Vec<T>, usize) {
        let total = rows.len();
        let page = rows
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();
        (page, total)
    }
}

/// Dimensions a record can be filtered on besides user and time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Language,
    Model,
    Feature,
    Operation,
    Functionality,
    LearningMode,
    LearningLevel,
    Signal,
    Touchpoint,
    Action,
}

/// A stored record that `RecordFilter` can be evaluated against
pub trait FilterableRecord {
    fn user_id(&self) -> &str;
    fn timestamp(&self) -> DateTime<Utc>;
    /// Value of `dimension` for this record, `None` when absent or not applicable
    fn dimension(&self, dimension: Dimension) -> Option<&str>;
}

/// Conjunctive filter shared by the usage, feedback and engagement stores.
/// Every criterion is optional; time bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub user_id: Option<String>,
    pub language_id: Option<String>,
    pub model_id: Option<String>,
    pub feature: Option<String>,
    pub operation: Option<String>,
    pub functionality: Option<String>,
    pub learning_mode: Option<String>,
    pub learning_level: Option<String>,
    pub signal: Option<String>,
    pub touchpoint: Option<String>,
    pub action: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl RecordFilter {
    /// Set time bounds from raw strings. Malformed values are treated as "no bound".
    pub fn with_bounds(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start = start.and_then(|s| parse_time_bound(s, BoundKind::Start));
        self.end = end.and_then(|s| parse_time_bound(s, BoundKind::End));
        self
    }

    pub fn matches<R: FilterableRecord>(&self, record: &R) -> bool {
        if let Some(user_id) = &self.user_id {
            if record.user_id() != user_id {
                return false;
            }
        }

        let criteria = [
            (&self.language_id, Dimension::Language),
            (&self.model_id, Dimension::Model),
            (&self.feature, Dimension::Feature),
            (&self.operation, Dimension::Operation),
            (&self.functionality, Dimension::Functionality),
            (&self.learning_mode, Dimension::LearningMode),
            (&self.learning_level, Dimension::LearningLevel),
            (&self.signal, Dimension::Signal),
            (&self.touchpoint, Dimension::Touchpoint),
            (&self.action, Dimension::Action),
        ];
        for (expected, dimension) in criteria {
            if let Some(expected) = expected {
                if record.dimension(dimension) != Some(expected.as_str()) {
                    return false;
                }
            }
        }

        let timestamp = record.timestamp();
        if self.start.is_some_and(|start| timestamp < start) {
            return false;
        }
        if self.end.is_some_and(|end| timestamp > end) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Start,
    End,
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
///
/// A bare date covers the whole day: it starts at midnight for a start bound
/// and ends at the last millisecond of the day for an end bound.
pub fn parse_time_bound(raw: &str, kind: BoundKind) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = match kind {
            BoundKind::Start => NaiveTime::MIN,
            BoundKind::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?,
        };
        return Some(Utc.from_utc_datetime(&date.and_time(time)));
    }
    tracing::debug!(bound = raw, "Ignoring malformed time bound");
    None
}

/// Shorten free text kept in metadata snapshots
pub fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
