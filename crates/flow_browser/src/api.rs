//! Contracts the browser needs from its collaborators.
use std::future::Future;

use api_types::{
    capital_flow::{
        CapitalFlowList, CapitalFlowListResponse, CapitalFlowNew, CapitalFlowUpdate,
    },
    category::CategoryView,
};

use crate::RemoteFailure;

/// Remote ledger backend.
///
/// Futures must be `Send` so callers can run them on a worker task while the
/// state owner keeps handling input.
pub trait LedgerApi {
    fn fetch_transactions(
        &self,
        query: CapitalFlowList,
    ) -> impl Future<Output = Result<CapitalFlowListResponse, RemoteFailure>> + Send;

    fn fetch_categories(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryView>, RemoteFailure>> + Send;

    fn delete_transaction(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<(), RemoteFailure>> + Send;

    fn create_transaction(
        &self,
        record: CapitalFlowNew,
    ) -> impl Future<Output = Result<(), RemoteFailure>> + Send;

    fn update_transaction(
        &self,
        record: CapitalFlowUpdate,
    ) -> impl Future<Output = Result<(), RemoteFailure>> + Send;
}

/// Asks the operator to confirm a destructive action.
///
/// Resolves to `true` on confirm. Cancel may resolve to `false` or never
/// resolve at all.
pub trait ConfirmPrompt {
    fn confirm(self) -> impl Future<Output = bool> + Send;
}
