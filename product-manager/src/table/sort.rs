//! Sorter - orders display rows by a single field

use std::cmp::Ordering;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::row::{DisplayRow, LAST_MODIFIED_FIELD, MOD_DATE_FIELD};
use super::value::{is_truthy, timestamp_millis};

/// Header sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Recognise the renderer's direction tokens; anything else is `None`
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Which fields compare as timestamps; every other field compares as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldClassification {
    pub date_fields: Vec<String>,
}

impl Default for FieldClassification {
    fn default() -> Self {
        Self {
            date_fields: vec![LAST_MODIFIED_FIELD.into(), MOD_DATE_FIELD.into()],
        }
    }
}

impl FieldClassification {
    pub fn is_temporal(&self, field: &str) -> bool {
        self.date_fields.iter().any(|f| f == field)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Instant(i64),
    Text(String),
}

/// Sorts row sets according to a field classification
#[derive(Debug, Clone, PartialEq)]
pub struct RowSorter {
    pub classification: FieldClassification,
    /// Zone for timestamps that carry none (the `modDate` display strings)
    pub timezone: Tz,
}

impl Default for RowSorter {
    fn default() -> Self {
        Self::new(FieldClassification::default(), Tz::UTC)
    }
}

impl RowSorter {
    pub fn new(classification: FieldClassification, timezone: Tz) -> Self {
        Self {
            classification,
            timezone,
        }
    }

    /// Return `rows` ordered by `field`
    ///
    /// `direction` is the raw renderer token. Unrecognised tokens leave the
    /// order unchanged. The input slice is never modified.
    pub fn sort(&self, rows: &[DisplayRow], field: &str, direction: &str) -> Vec<DisplayRow> {
        match SortDirection::parse(direction) {
            Some(direction) => self.sort_by(rows, field, direction),
            None => {
                log::debug!("Ignoring sort on '{}' with direction '{}'", field, direction);
                rows.to_vec()
            }
        }
    }

    /// Typed variant of [`RowSorter::sort`]
    pub fn sort_by(
        &self,
        rows: &[DisplayRow],
        field: &str,
        direction: SortDirection,
    ) -> Vec<DisplayRow> {
        let temporal = self.classification.is_temporal(field);
        log::debug!(
            "Sorting {} rows by '{}' {}",
            rows.len(),
            field,
            direction.as_str()
        );
        let mut keyed: Vec<(SortKey, &DisplayRow)> = rows
            .iter()
            .map(|row| (self.sort_key(row, field, temporal), row))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ordering: Ordering = a.cmp(b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        keyed.into_iter().map(|(_, row)| row.clone()).collect()
    }

    fn sort_key(&self, row: &DisplayRow, field: &str, temporal: bool) -> SortKey {
        let value = row.get(field);
        if temporal {
            // missing and unparseable timestamps both sort as the epoch
            let millis = value
                .filter(|v| is_truthy(Some(*v)))
                .and_then(|v| timestamp_millis(v, self.timezone))
                .unwrap_or(0);
            SortKey::Instant(millis)
        } else {
            SortKey::Text(row.text(field).to_uppercase())
        }
    }
}
