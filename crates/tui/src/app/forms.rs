use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use flow_browser::{Amount, CategoryCatalog, DateRange, RecordDraft, TransactionRow};

pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Start,
    End,
}

/// Editor for the date range: two `YYYY-MM-DD` fields.
#[derive(Debug, Clone)]
pub struct RangeForm {
    pub start: String,
    pub end: String,
    pub focus: RangeField,
    pub error: Option<String>,
}

impl RangeForm {
    pub fn from_range(range: Option<DateRange>) -> Self {
        let format = |date: NaiveDate| date.format(DATE_INPUT_FORMAT).to_string();
        Self {
            start: range.map(|r| format(r.start())).unwrap_or_default(),
            end: range.map(|r| format(r.end())).unwrap_or_default(),
            focus: RangeField::Start,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            RangeField::Start => RangeField::End,
            RangeField::End => RangeField::Start,
        };
    }

    pub fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            RangeField::Start => &mut self.start,
            RangeField::End => &mut self.end,
        }
    }

    /// `Ok(None)` clears the range; one empty field is an error.
    pub fn parse(&self) -> Result<Option<DateRange>, String> {
        let start = self.start.trim();
        let end = self.end.trim();
        match (start.is_empty(), end.is_empty()) {
            (true, true) => Ok(None),
            (false, false) => {
                let start = parse_date(start)?;
                let end = parse_date(end)?;
                Ok(Some(DateRange::new(start, end)))
            }
            _ => Err("Enter both dates or clear both.".to_string()),
        }
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input, DATE_INPUT_FORMAT)
        .map_err(|_| format!("Invalid date \"{input}\", expected YYYY-MM-DD."))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Amount,
    Category,
    Date,
    Remarks,
}

impl DialogField {
    fn next(self) -> Self {
        match self {
            Self::Amount => Self::Category,
            Self::Category => Self::Date,
            Self::Date => Self::Remarks,
            Self::Remarks => Self::Amount,
        }
    }
}

/// Inputs of the create/edit dialog.
#[derive(Debug, Clone)]
pub struct DialogForm {
    /// Record being edited; `None` creates a new one.
    pub record_id: Option<i64>,
    pub amount: String,
    pub category_id: Option<i64>,
    pub date: String,
    pub remarks: String,
    pub focus: DialogField,
    pub error: Option<String>,
    pub saving: bool,
}

impl DialogForm {
    pub fn for_create(catalog: &CategoryCatalog, now: DateTime<Tz>) -> Self {
        Self {
            record_id: None,
            amount: String::new(),
            category_id: catalog.entries().first().map(|entry| entry.id),
            date: now.format(DATE_TIME_INPUT_FORMAT).to_string(),
            remarks: String::new(),
            focus: DialogField::Amount,
            error: None,
            saving: false,
        }
    }

    pub fn for_edit(row: &TransactionRow) -> Self {
        Self {
            record_id: Some(row.id),
            amount: row.amount.to_string(),
            category_id: row.category_id,
            date: row.display_date.clone(),
            remarks: row.remarks.clone(),
            focus: DialogField::Amount,
            error: None,
            saving: false,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    /// Text buffer of the focused field; the category is picked, not typed.
    pub fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            DialogField::Amount => Some(&mut self.amount),
            DialogField::Category => None,
            DialogField::Date => Some(&mut self.date),
            DialogField::Remarks => Some(&mut self.remarks),
        }
    }

    pub fn cycle_category(&mut self, catalog: &CategoryCatalog, forward: bool) {
        let entries = catalog.entries();
        if entries.is_empty() {
            self.category_id = None;
            return;
        }
        let len = entries.len();
        let current = self
            .category_id
            .and_then(|id| entries.iter().position(|entry| entry.id == id));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
        };
        self.category_id = Some(entries[next].id);
    }

    pub fn to_draft(&self, tz: Tz) -> Result<RecordDraft, String> {
        let category_id = self
            .category_id
            .ok_or_else(|| "Pick a category.".to_string())?;
        let amount: Amount = self.amount.parse().map_err(|err| format!("{err}"))?;
        let occurred_at = parse_local_datetime(self.date.trim(), tz)?;
        RecordDraft::new(category_id, amount, occurred_at, self.remarks.trim())
            .map_err(|err| err.to_string())
    }
}

fn parse_local_datetime(input: &str, tz: Tz) -> Result<DateTime<Utc>, String> {
    let naive = NaiveDateTime::parse_from_str(input, DATE_TIME_INPUT_FORMAT)
        .map_err(|_| format!("Invalid date \"{input}\", expected YYYY-MM-DD HH:MM."))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("{input} does not exist in {tz}."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::category::CategoryView;

    fn catalog() -> CategoryCatalog {
        let mut catalog = CategoryCatalog::new();
        catalog.load(Ok(vec![
            CategoryView {
                id: 10,
                name: "Rent".to_string(),
                coarse_type: 2,
            },
            CategoryView {
                id: 11,
                name: "Salary".to_string(),
                coarse_type: 1,
            },
        ]));
        catalog
    }

    #[test]
    fn range_form_requires_both_or_neither() {
        let mut form = RangeForm::from_range(None);
        assert_eq!(form.parse(), Ok(None));

        form.start = "2026-10-01".to_string();
        assert!(form.parse().is_err());

        form.end = "2026-09-15".to_string();
        let range = form.parse().unwrap().unwrap();
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2026, 9, 15).unwrap());
    }

    #[test]
    fn range_form_rejects_bad_dates() {
        let form = RangeForm {
            start: "2026-13-01".to_string(),
            end: "2026-10-01".to_string(),
            focus: RangeField::Start,
            error: None,
        };
        assert!(form.parse().is_err());
    }

    #[test]
    fn dialog_cycles_categories_in_catalog_order() {
        let catalog = catalog();
        let now = chrono_tz::UTC.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
        let mut form = DialogForm::for_create(&catalog, now);
        assert_eq!(form.category_id, Some(11));
        assert_eq!(form.date, "2026-10-19 09:30");

        form.cycle_category(&catalog, true);
        assert_eq!(form.category_id, Some(10));
        form.cycle_category(&catalog, true);
        assert_eq!(form.category_id, Some(11));
        form.cycle_category(&catalog, false);
        assert_eq!(form.category_id, Some(10));
    }

    #[test]
    fn dialog_builds_draft_in_operator_zone() {
        let tz: Tz = "Europe/Rome".parse().unwrap();
        let form = DialogForm {
            record_id: None,
            amount: "12,50".to_string(),
            category_id: Some(10),
            date: "2026-10-19 09:30".to_string(),
            remarks: "  lunch ".to_string(),
            focus: DialogField::Amount,
            error: None,
            saving: false,
        };

        let draft = form.to_draft(tz).unwrap();
        assert_eq!(draft.amount, Amount::new(1250));
        assert_eq!(
            draft.occurred_at,
            Utc.with_ymd_and_hms(2026, 10, 19, 7, 30, 0).unwrap()
        );
        assert_eq!(draft.remarks, "lunch");
    }

    #[test]
    fn dialog_reports_missing_inputs() {
        let mut form = DialogForm::for_create(
            &CategoryCatalog::new(),
            chrono_tz::UTC.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap(),
        );
        assert!(form.to_draft(Tz::UTC).is_err());

        form.category_id = Some(1);
        form.amount = "0".to_string();
        assert!(form.to_draft(Tz::UTC).is_err());

        form.amount = "3".to_string();
        assert!(form.to_draft(Tz::UTC).is_ok());
    }
}
