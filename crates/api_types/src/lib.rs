use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope wrapping every response body.
///
/// `success = false` means the server refused the request; `message` then
/// carries the reason.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

pub mod category {
    use super::*;

    /// A user-defined category as stored on the server.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
        /// Coarse type code (`1` income, `2` expense).
        #[serde(rename = "type")]
        pub coarse_type: u8,
    }
}

pub mod capital_flow {
    use super::*;

    /// Request body for `capital-flow/list`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CapitalFlowList {
        pub keyword: String,
        /// Category id. Takes precedence over `type` on the server.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub type_name_id: Option<i64>,
        /// Coarse type code. Absent means all types.
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub coarse_type: Option<u8>,
        /// Inclusive lower bound, epoch milliseconds.
        pub start_date: i64,
        /// Exclusive upper bound, epoch milliseconds.
        pub end_date: i64,
        /// 1-based page number.
        pub page: u32,
        pub page_size: u32,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CapitalFlowView {
        pub id: i64,
        /// RFC3339 timestamp.
        pub date: DateTime<Utc>,
        /// Type code indexing the fixed type table (1-based).
        #[serde(rename = "type")]
        pub type_code: i64,
        /// Unsigned amount in minor units; the sign comes from the type.
        pub price: i64,
        #[serde(default)]
        pub type_name_id: Option<i64>,
        /// Category name.
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub remarks: String,
    }

    /// Response data for `capital-flow/list`.
    ///
    /// The aggregates cover the whole filtered set, not only the current page.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CapitalFlowListResponse {
        pub rows: Vec<CapitalFlowView>,
        #[serde(default)]
        pub total: u64,
        pub income: i64,
        #[serde(alias = "consumption")]
        pub expense: i64,
        pub available: i64,
    }

    /// Request body for `capital-flow/create`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CapitalFlowNew {
        pub type_name_id: i64,
        pub price: i64,
        pub date: DateTime<Utc>,
        pub remarks: String,
    }

    /// Request body for `capital-flow/update`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CapitalFlowUpdate {
        pub id: i64,
        pub type_name_id: i64,
        pub price: i64,
        pub date: DateTime<Utc>,
        pub remarks: String,
    }

    /// Request body for `capital-flow/delete`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CapitalFlowDelete {
        pub id: i64,
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiResponse, capital_flow::*, category::CategoryView};

    #[test]
    fn list_response_accepts_consumption_alias() {
        let body = r#"{
            "success": true,
            "data": {
                "rows": [{
                    "id": 7,
                    "date": "2026-10-03T08:15:00Z",
                    "type": 2,
                    "price": 1250,
                    "typeNameId": 3,
                    "name": "Groceries",
                    "remarks": "weekly shop"
                }],
                "total": 1,
                "income": 0,
                "consumption": 1250,
                "available": 0
            }
        }"#;

        let res: ApiResponse<CapitalFlowListResponse> = serde_json::from_str(body).unwrap();
        assert!(res.success);
        let data = res.data.unwrap();
        assert_eq!(data.expense, 1250);
        assert_eq!(data.rows[0].type_code, 2);
        assert_eq!(data.rows[0].type_name_id, Some(3));
    }

    #[test]
    fn empty_list_envelope_decodes() {
        let body = r#"{"success": true, "data": {"rows": [], "income": 0, "expense": 0, "available": 0}}"#;
        let res: ApiResponse<CapitalFlowListResponse> = serde_json::from_str(body).unwrap();
        let data = res.data.unwrap();
        assert!(data.rows.is_empty());
        assert_eq!(data.total, 0);
        assert!(res.message.is_none());
    }

    #[test]
    fn failed_envelope_has_no_data() {
        let body = r#"{"success": false, "message": "boom"}"#;
        let res: ApiResponse<Vec<CategoryView>> = serde_json::from_str(body).unwrap();
        assert!(!res.success);
        assert!(res.data.is_none());
        assert_eq!(res.message.as_deref(), Some("boom"));
    }

    #[test]
    fn list_query_omits_absent_type_filters() {
        let query = CapitalFlowList {
            keyword: String::new(),
            type_name_id: None,
            coarse_type: None,
            start_date: 0,
            end_date: 86_400_000,
            page: 1,
            page_size: 20,
        };
        let json = serde_json::to_value(&query).unwrap();
        assert!(json.get("typeNameId").is_none());
        assert!(json.get("type").is_none());
        assert_eq!(json["pageSize"], 20);
        assert_eq!(json["endDate"], 86_400_000);
    }
}
