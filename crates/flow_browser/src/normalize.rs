//! Turns a raw list response into display rows.
use api_types::capital_flow::{CapitalFlowListResponse, CapitalFlowView};
use chrono_tz::Tz;

use crate::{
    Amount, BrowserError,
    filter::{Aggregates, CoarseType},
    table::TransactionRow,
};

pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Presentation of a transaction type code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowType {
    pub code: i64,
    pub name: &'static str,
    /// Sign shown in front of the amount.
    pub symbol: &'static str,
    pub color: &'static str,
    pub coarse: CoarseType,
}

/// Known transaction types, indexed by `code - 1`.
pub const TYPES: [FlowType; 4] = [
    FlowType {
        code: 1,
        name: "Income",
        symbol: "+",
        color: "#52c41a",
        coarse: CoarseType::Income,
    },
    FlowType {
        code: 2,
        name: "Expense",
        symbol: "-",
        color: "#f5222d",
        coarse: CoarseType::Expense,
    },
    FlowType {
        code: 3,
        name: "Investment",
        symbol: "-",
        color: "#1890ff",
        coarse: CoarseType::Expense,
    },
    FlowType {
        code: 4,
        name: "Refund",
        symbol: "+",
        color: "#faad14",
        coarse: CoarseType::Income,
    },
];

#[must_use]
pub fn flow_type(code: i64) -> Option<&'static FlowType> {
    let index = usize::try_from(code.checked_sub(1)?).ok()?;
    TYPES.get(index)
}

/// A response ready to be applied to the table and the aggregates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedPage {
    pub rows: Vec<TransactionRow>,
    pub total: u64,
    pub aggregates: Aggregates,
}

/// Normalizes every row; a single unknown type code rejects the response.
pub fn normalize(response: CapitalFlowListResponse, tz: Tz) -> Result<NormalizedPage, BrowserError> {
    let CapitalFlowListResponse {
        rows,
        total,
        income,
        expense,
        available,
    } = response;

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| normalize_row(idx + 1, row, tz))
        .collect::<Result<Vec<_>, _>>()?;

    // Older backends omit the total; the page itself is then all we know.
    let total = total.max(rows.len() as u64);

    Ok(NormalizedPage {
        rows,
        total,
        aggregates: Aggregates {
            income: Amount::new(income),
            expense: Amount::new(expense),
            net_available: Amount::new(available),
        },
    })
}

fn normalize_row(order: usize, row: CapitalFlowView, tz: Tz) -> Result<TransactionRow, BrowserError> {
    let kind = flow_type(row.type_code).ok_or(BrowserError::DataIntegrity {
        code: row.type_code,
        row_id: row.id,
    })?;
    let amount = Amount::new(row.price);

    Ok(TransactionRow {
        order,
        id: row.id,
        timestamp: row.date,
        category_id: row.type_name_id,
        category_name: row.name,
        amount,
        type_code: kind.code,
        coarse_type: kind.coarse,
        remarks: row.remarks,
        display_date: row
            .date
            .with_timezone(&tz)
            .format(DISPLAY_DATE_FORMAT)
            .to_string(),
        display_amount: format!("{}{amount}", kind.symbol),
        display_color: kind.color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(id: i64, type_code: i64, price: i64) -> CapitalFlowView {
        CapitalFlowView {
            id,
            date: Utc.with_ymd_and_hms(2026, 10, 3, 22, 30, 0).unwrap(),
            type_code,
            price,
            type_name_id: Some(5),
            name: "Salary".to_string(),
            remarks: String::new(),
        }
    }

    fn response(rows: Vec<CapitalFlowView>) -> CapitalFlowListResponse {
        CapitalFlowListResponse {
            rows,
            total: 42,
            income: 500_000,
            expense: 120_050,
            available: 379_950,
        }
    }

    #[test]
    fn rows_get_order_sign_and_color() {
        let page = normalize(response(vec![row(1, 1, 250_000), row(2, 2, 1999)]), Tz::UTC).unwrap();

        assert_eq!(page.rows[0].order, 1);
        assert_eq!(page.rows[0].display_amount, "+2500.00");
        assert_eq!(page.rows[0].display_color, TYPES[0].color);
        assert_eq!(page.rows[1].order, 2);
        assert_eq!(page.rows[1].display_amount, "-19.99");
        assert_eq!(page.rows[1].coarse_type, CoarseType::Expense);
    }

    #[test]
    fn dates_are_formatted_in_operator_zone() {
        let tz: Tz = "Europe/Rome".parse().unwrap();
        let page = normalize(response(vec![row(1, 1, 100)]), tz).unwrap();
        assert_eq!(page.rows[0].display_date, "2026-10-04 00:30");
    }

    #[test]
    fn aggregates_are_taken_verbatim() {
        let page = normalize(response(vec![row(1, 2, 100)]), Tz::UTC).unwrap();
        assert_eq!(page.total, 42);
        assert_eq!(page.aggregates.income, Amount::new(500_000));
        assert_eq!(page.aggregates.expense, Amount::new(120_050));
        assert_eq!(page.aggregates.net_available, Amount::new(379_950));
    }

    #[test]
    fn unknown_type_code_is_a_data_integrity_fault() {
        let err = normalize(response(vec![row(1, 1, 100), row(8, 99, 100)]), Tz::UTC).unwrap_err();
        assert_eq!(err, BrowserError::DataIntegrity { code: 99, row_id: 8 });

        assert!(flow_type(0).is_none());
        assert!(flow_type(-1).is_none());
        assert!(flow_type(5).is_none());
    }
}
