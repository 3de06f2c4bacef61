//! Recurrence descriptors and next-occurrence arithmetic.

use super::ParseTaskEnumError;
use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Interval at which a recurring task repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Every fourteen days.
    Biweekly,
    /// Same day of the next calendar month.
    Monthly,
}

impl RecurrencePattern {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }

    /// Advances `date` by one interval.
    ///
    /// Monthly steps clamp to the last day of a shorter target month, so
    /// 2024-01-31 advances to 2024-02-29. Returns `None` only when the result
    /// falls outside the representable calendar.
    #[must_use]
    pub fn advance(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => date.checked_add_days(Days::new(1)),
            Self::Weekly => date.checked_add_days(Days::new(7)),
            Self::Biweekly => date.checked_add_days(Days::new(14)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
        }
    }
}

impl TryFrom<&str> for RecurrencePattern {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ParseTaskEnumError::new("recurrence pattern", value)),
        }
    }
}

/// Recurrence pattern with an optional inclusive end boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recurrence {
    pattern: RecurrencePattern,
    end: Option<NaiveDate>,
}

impl Recurrence {
    /// Creates an open-ended recurrence.
    #[must_use]
    pub const fn new(pattern: RecurrencePattern) -> Self {
        Self { pattern, end: None }
    }

    /// Sets the last date on which an occurrence may fall.
    #[must_use]
    pub const fn until(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Reconstructs a recurrence from persisted parts.
    #[must_use]
    pub const fn from_parts(pattern: RecurrencePattern, end: Option<NaiveDate>) -> Self {
        Self { pattern, end }
    }

    /// Returns the repeat interval.
    #[must_use]
    pub const fn pattern(&self) -> RecurrencePattern {
        self.pattern
    }

    /// Returns the end boundary, if any.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Computes the single next occurrence after `reference`.
    ///
    /// Returns `None` when the next date lies beyond the end boundary.
    /// Missed intervals are never backfilled: the result is always exactly
    /// one interval after `reference`.
    #[must_use]
    pub fn next_occurrence(&self, reference: NaiveDate) -> Option<NaiveDate> {
        let next = self.pattern.advance(reference)?;
        match self.end {
            Some(end) if next > end => None,
            _ => Some(next),
        }
    }
}

/// Moves a timestamp onto `date`, keeping its UTC clock time.
#[must_use]
pub fn shift_to_date(timestamp: DateTime<Utc>, date: NaiveDate) -> DateTime<Utc> {
    date.and_time(timestamp.time()).and_utc()
}
