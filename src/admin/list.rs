use chrono::{DateTime, Datelike, Days, Months, NaiveTime, Utc};
use sea_orm::Condition;
use serde::{Deserialize, Serialize};

/// Rows per list page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: u64 = 100;
const MAX_PAGE_SIZE: u64 = 500;
/// Rows returned by an autocomplete lookup.
pub const AUTOCOMPLETE_PAGE_SIZE: u64 = 20;

/// Relative date filter offered on timestamp columns of list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DateRange {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "past_7_days")]
    Past7Days,
    #[serde(rename = "this_month")]
    ThisMonth,
    #[serde(rename = "this_year")]
    ThisYear,
}

impl DateRange {
    /// Half-open `[start, end)` interval in UTC for the range relative to `now`.
    pub fn bounds(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let (start, end) = match self {
            DateRange::Today => (today, today + Days::new(1)),
            DateRange::Past7Days => (today - Days::new(7), today + Days::new(1)),
            DateRange::ThisMonth => {
                let start = today - Days::new(u64::from(today.day0()));
                (start, start + Months::new(1))
            }
            DateRange::ThisYear => {
                let start = today - Days::new(u64::from(today.ordinal0()));
                (start, start + Months::new(12))
            }
        };
        (
            start.and_time(NaiveTime::MIN).and_utc(),
            end.and_time(NaiveTime::MIN).and_utc(),
        )
    }
}

/// Page number and size resolved from optional query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based page index as expected by the sea-orm paginator.
    pub fn index(&self) -> u64 {
        self.page - 1
    }
}

/// One page of a list view.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub page: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Search condition over a list view's search fields.
///
/// The query is split on whitespace; every term must match at least one
/// field, and `per_term` builds the "any field matches" condition for a term.
pub fn search_condition<F>(q: Option<&str>, per_term: F) -> Condition
where
    F: Fn(&str) -> Condition,
{
    search_terms(q)
        .into_iter()
        .fold(Condition::all(), |cond, term| cond.add(per_term(term)))
}

pub fn search_terms(q: Option<&str>) -> Vec<&str> {
    q.unwrap_or_default().split_whitespace().collect()
}

/// Autocomplete query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutocompleteQuery {
    pub term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutocompleteOption {
    pub id: i32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutocompleteMore {
    pub more: bool,
}

/// Response shape of the autocomplete pickers.
#[derive(Debug, Clone, Serialize)]
pub struct AutocompleteResponse {
    pub results: Vec<AutocompleteOption>,
    pub pagination: AutocompleteMore,
}
