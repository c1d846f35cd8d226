use chrono::{DateTime, Utc};

use crate::{Amount, filter::CoarseType, query::PageRequest};

/// A display-ready ledger row for the current page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRow {
    /// 1-based position within the page.
    pub order: usize,
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub category_id: Option<i64>,
    pub category_name: String,
    /// Unsigned amount as sent by the server.
    pub amount: Amount,
    pub type_code: i64,
    pub coarse_type: CoarseType,
    pub remarks: String,
    /// `YYYY-MM-DD HH:mm` in the operator's time zone.
    pub display_date: String,
    /// Type symbol followed by the amount, e.g. `-12.50`.
    pub display_amount: String,
    /// `#rrggbb` color of the row's type.
    pub display_color: &'static str,
}

/// Rows of the page currently shown, plus its paging position.
///
/// Rows are replaced wholesale on every applied fetch.
#[derive(Debug)]
pub struct RecordTable {
    rows: Vec<TransactionRow>,
    page: u32,
    page_size: u32,
    total: u64,
}

impl RecordTable {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            rows: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[TransactionRow] {
        &self.rows
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages for the current total; at least 1.
    #[must_use]
    pub fn page_count(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Request for the page currently shown.
    #[must_use]
    pub fn current_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }

    #[must_use]
    pub fn first_request(&self) -> PageRequest {
        PageRequest::first(self.page_size)
    }

    #[must_use]
    pub fn find(&self, id: i64) -> Option<&TransactionRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub(crate) fn replace(&mut self, page: u32, rows: Vec<TransactionRow>, total: u64) {
        self.page = page.max(1);
        self.rows = rows;
        self.total = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        let mut table = RecordTable::new(20);
        assert_eq!(table.page_count(), 1);
        assert!(!table.has_next());

        table.replace(1, Vec::new(), 41);
        assert_eq!(table.page_count(), 3);
        assert!(table.has_next());
        assert!(!table.has_prev());

        table.replace(3, Vec::new(), 41);
        assert!(!table.has_next());
        assert!(table.has_prev());
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let table = RecordTable::new(0);
        assert_eq!(table.page_size(), 1);
    }
}
