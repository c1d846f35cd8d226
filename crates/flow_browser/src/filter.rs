//! Filter state and its single mutation path.
//!
//! [`FilterStore`] owns the [`FilterState`] and only exposes
//! [`FilterStore::merge`]. Every merge reports whether the fetch-relevant
//! part of the state (the [`QueryKey`]) changed.
use chrono::{Datelike, Months, NaiveDate, TimeDelta};

use crate::{Amount, table::TransactionRow};

/// Maximum length of the free-text keyword, in characters.
pub const KEYWORD_MAX_CHARS: usize = 300;

/// Coarse direction of a transaction, as used by categories and the type filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoarseType {
    Income,
    Expense,
}

impl CoarseType {
    /// Wire code of the coarse type.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Income => 1,
            Self::Expense => 2,
        }
    }

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Income),
            2 => Some(Self::Expense),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

/// Inclusive calendar date range with `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range from two dates in any order.
    #[must_use]
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    #[must_use]
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// First to last day of the month containing `day`.
    #[must_use]
    pub fn month_of(day: NaiveDate) -> Self {
        let first = day.with_day(1).unwrap_or(day);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(day);
        Self {
            start: first,
            end: last,
        }
    }

    /// The whole month `delta` months away from the month of `start`.
    #[must_use]
    pub fn shifted_month(self, delta: i32) -> Self {
        let months = Months::new(delta.unsigned_abs());
        let anchor = if delta >= 0 {
            self.start.checked_add_months(months)
        } else {
            self.start.checked_sub_months(months)
        };
        Self::month_of(anchor.unwrap_or(self.start))
    }

    #[must_use]
    pub fn start(self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(self) -> NaiveDate {
        self.end
    }
}

/// Date shortcuts offered next to the range picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuickDate {
    Today,
    Yesterday,
}

impl QuickDate {
    #[must_use]
    pub fn range(self, today: NaiveDate) -> DateRange {
        match self {
            Self::Today => DateRange::single(today),
            Self::Yesterday => DateRange::single(today - TimeDelta::days(1)),
        }
    }
}

/// Totals over the whole filtered set, as computed by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub income: Amount,
    pub expense: Amount,
    pub net_available: Amount,
}

/// Resolved type filter: a category wins over a coarse type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    All,
    Category(i64),
    Coarse(CoarseType),
}

/// The subset of the filter state that decides what a fetch returns,
/// excluding the keyword which only applies on explicit search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub date_range: Option<DateRange>,
    pub type_filter: TypeFilter,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    pub date_range: Option<DateRange>,
    pub search_keyword: String,
    pub category_id: Option<i64>,
    pub coarse_type: Option<CoarseType>,
    pub aggregates: Aggregates,
    /// Record open in the dialog; `None` means create mode.
    pub active_record: Option<TransactionRow>,
    pub dialog_open: bool,
}

impl FilterState {
    #[must_use]
    pub fn type_filter(&self) -> TypeFilter {
        match (self.category_id, self.coarse_type) {
            (Some(id), _) => TypeFilter::Category(id),
            (None, Some(coarse)) => TypeFilter::Coarse(coarse),
            (None, None) => TypeFilter::All,
        }
    }

    #[must_use]
    pub fn query_key(&self) -> QueryKey {
        QueryKey {
            date_range: self.date_range,
            type_filter: self.type_filter(),
        }
    }

    /// Returns a new state with every field present in `patch` replaced.
    #[must_use]
    pub fn merged(&self, patch: FilterPatch) -> FilterState {
        let mut next = self.clone();
        if let Some(date_range) = patch.date_range {
            next.date_range = date_range;
        }
        if let Some(keyword) = patch.search_keyword {
            next.search_keyword = truncate_keyword(keyword);
        }
        if let Some(category_id) = patch.category_id {
            next.category_id = category_id;
        }
        if let Some(coarse_type) = patch.coarse_type {
            next.coarse_type = coarse_type;
        }
        if let Some(aggregates) = patch.aggregates {
            next.aggregates = aggregates;
        }
        if let Some(active_record) = patch.active_record {
            next.active_record = active_record;
        }
        if let Some(dialog_open) = patch.dialog_open {
            next.dialog_open = dialog_open;
        }
        next
    }
}

fn truncate_keyword(keyword: String) -> String {
    match keyword.char_indices().nth(KEYWORD_MAX_CHARS) {
        Some((cut, _)) => keyword[..cut].to_string(),
        None => keyword,
    }
}

/// Partial update for [`FilterState`]. Unset fields are left untouched.
///
/// Aggregates can only be written by the fetch path inside this crate.
#[derive(Clone, Debug, Default)]
pub struct FilterPatch {
    date_range: Option<Option<DateRange>>,
    search_keyword: Option<String>,
    category_id: Option<Option<i64>>,
    coarse_type: Option<Option<CoarseType>>,
    active_record: Option<Option<TransactionRow>>,
    dialog_open: Option<bool>,
    aggregates: Option<Aggregates>,
}

impl FilterPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn date_range(mut self, date_range: Option<DateRange>) -> Self {
        self.date_range = Some(date_range);
        self
    }

    #[must_use]
    pub fn search_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.search_keyword = Some(keyword.into());
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Option<i64>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn coarse_type(mut self, coarse_type: Option<CoarseType>) -> Self {
        self.coarse_type = Some(coarse_type);
        self
    }

    #[must_use]
    pub fn active_record(mut self, record: Option<TransactionRow>) -> Self {
        self.active_record = Some(record);
        self
    }

    #[must_use]
    pub fn dialog_open(mut self, open: bool) -> Self {
        self.dialog_open = Some(open);
        self
    }

    #[must_use]
    pub(crate) fn aggregates(mut self, aggregates: Aggregates) -> Self {
        self.aggregates = Some(aggregates);
        self
    }
}

/// What a merge changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    pub key_changed: bool,
    /// The key changed and the date range is complete.
    pub refetch: bool,
}

/// Owner of the filter state.
#[derive(Debug, Default)]
pub struct FilterStore {
    state: FilterState,
}

impl FilterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn merge(&mut self, patch: FilterPatch) -> MergeOutcome {
        let before = self.state.query_key();
        self.state = self.state.merged(patch);
        let after = self.state.query_key();

        let key_changed = before != after;
        MergeOutcome {
            key_changed,
            refetch: key_changed && after.date_range.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_orders_its_ends() {
        let range = DateRange::new(day(2026, 10, 9), day(2026, 10, 1));
        assert_eq!(range.start(), day(2026, 10, 1));
        assert_eq!(range.end(), day(2026, 10, 9));
    }

    #[test]
    fn month_of_handles_short_and_leap_months() {
        let feb = DateRange::month_of(day(2028, 2, 14));
        assert_eq!(feb.start(), day(2028, 2, 1));
        assert_eq!(feb.end(), day(2028, 2, 29));

        let dec = DateRange::month_of(day(2026, 12, 31));
        assert_eq!(dec.end(), day(2026, 12, 31));
    }

    #[test]
    fn shifted_month_moves_whole_months() {
        let oct = DateRange::month_of(day(2026, 10, 19));
        assert_eq!(oct.shifted_month(-1), DateRange::month_of(day(2026, 9, 1)));
        assert_eq!(oct.shifted_month(3), DateRange::month_of(day(2027, 1, 1)));
    }

    #[test]
    fn merge_leaves_absent_fields_untouched() {
        let mut store = FilterStore::new();
        store.merge(
            FilterPatch::new()
                .search_keyword("rent")
                .coarse_type(Some(CoarseType::Expense)),
        );
        store.merge(FilterPatch::new().dialog_open(true));

        let state = store.state();
        assert_eq!(state.search_keyword, "rent");
        assert_eq!(state.coarse_type, Some(CoarseType::Expense));
        assert!(state.dialog_open);
    }

    #[test]
    fn keyword_is_truncated_to_limit() {
        let mut store = FilterStore::new();
        store.merge(FilterPatch::new().search_keyword("é".repeat(KEYWORD_MAX_CHARS + 20)));
        assert_eq!(store.state().search_keyword.chars().count(), KEYWORD_MAX_CHARS);
    }

    #[test]
    fn keyword_change_does_not_touch_query_key() {
        let mut store = FilterStore::new();
        store.merge(FilterPatch::new().date_range(Some(DateRange::single(day(2026, 10, 1)))));
        let outcome = store.merge(FilterPatch::new().search_keyword("coffee"));
        assert!(!outcome.key_changed);
        assert!(!outcome.refetch);
    }

    #[test]
    fn key_change_without_date_range_does_not_refetch() {
        let mut store = FilterStore::new();
        let outcome = store.merge(FilterPatch::new().category_id(Some(4)));
        assert!(outcome.key_changed);
        assert!(!outcome.refetch);
    }

    #[test]
    fn coarse_type_is_shadowed_by_category() {
        let mut store = FilterStore::new();
        store.merge(
            FilterPatch::new()
                .date_range(Some(DateRange::single(day(2026, 10, 1))))
                .category_id(Some(3)),
        );
        let outcome = store.merge(FilterPatch::new().coarse_type(Some(CoarseType::Income)));
        assert!(!outcome.key_changed);
        assert_eq!(store.state().type_filter(), TypeFilter::Category(3));
    }

    #[test]
    fn quick_dates_are_single_days() {
        let today = day(2026, 10, 1);
        assert_eq!(QuickDate::Today.range(today), DateRange::single(today));
        assert_eq!(
            QuickDate::Yesterday.range(today),
            DateRange::single(day(2026, 9, 30))
        );
    }
}
