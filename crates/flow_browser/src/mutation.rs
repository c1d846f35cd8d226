//! Create, edit and delete flows.
//!
//! The remote side of a mutation runs through the async helpers in this
//! module, which never touch the page state. Their outcome is then handed
//! back to [`CapitalFlowPage`](crate::CapitalFlowPage), which closes the
//! dialog and re-fetches at the current filters.
use api_types::capital_flow::{CapitalFlowNew, CapitalFlowUpdate};
use chrono::{DateTime, Utc};

use crate::{
    Amount, BrowserError, RemoteFailure,
    api::{ConfirmPrompt, LedgerApi},
};

/// Validated content of the create/edit dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordDraft {
    pub category_id: i64,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
    pub remarks: String,
}

impl RecordDraft {
    pub fn new(
        category_id: i64,
        amount: Amount,
        occurred_at: DateTime<Utc>,
        remarks: impl Into<String>,
    ) -> Result<Self, BrowserError> {
        if !amount.is_positive() {
            return Err(BrowserError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            category_id,
            amount,
            occurred_at,
            remarks: remarks.into(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Failed(RemoteFailure),
}

/// Tracks the single delete that may be outstanding.
#[derive(Debug, Default)]
pub struct MutationCoordinator {
    pending_delete: Option<i64>,
}

impl MutationCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    /// Reserves a delete for `id`; `false` if another one is outstanding.
    pub(crate) fn begin_delete(&mut self, id: i64) -> bool {
        if self.pending_delete.is_some() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub(crate) fn finish_delete(&mut self) -> Option<i64> {
        self.pending_delete.take()
    }
}

/// Waits for confirmation, then issues exactly one remote delete.
pub async fn delete_with_confirmation<A, C>(api: &A, prompt: C, id: i64) -> DeleteOutcome
where
    A: LedgerApi + Sync,
    C: ConfirmPrompt,
{
    if !prompt.confirm().await {
        tracing::debug!("delete of {id} cancelled");
        return DeleteOutcome::Cancelled;
    }

    match api.delete_transaction(id).await {
        Ok(()) => DeleteOutcome::Deleted,
        Err(err) => {
            tracing::warn!("delete of {id} failed: {err}");
            DeleteOutcome::Failed(err)
        }
    }
}

/// Submit step of the dialog: creates when `record_id` is `None`, updates otherwise.
pub async fn submit_record<A>(
    api: &A,
    record_id: Option<i64>,
    draft: RecordDraft,
) -> Result<(), RemoteFailure>
where
    A: LedgerApi + Sync,
{
    let RecordDraft {
        category_id,
        amount,
        occurred_at,
        remarks,
    } = draft;

    match record_id {
        None => {
            api.create_transaction(CapitalFlowNew {
                type_name_id: category_id,
                price: amount.minor(),
                date: occurred_at,
                remarks,
            })
            .await
        }
        Some(id) => {
            api.update_transaction(CapitalFlowUpdate {
                id,
                type_name_id: category_id,
                price: amount.minor(),
                date: occurred_at,
                remarks,
            })
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn draft_requires_positive_amount() {
        let when = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();
        assert!(RecordDraft::new(1, Amount::new(0), when, "").is_err());
        assert!(RecordDraft::new(1, Amount::new(-5), when, "").is_err());
        assert!(RecordDraft::new(1, Amount::new(5), when, "coffee").is_ok());
    }

    #[test]
    fn only_one_delete_at_a_time() {
        let mut coordinator = MutationCoordinator::new();
        assert!(coordinator.begin_delete(3));
        assert!(!coordinator.begin_delete(4));
        assert_eq!(coordinator.pending_delete(), Some(3));
        assert_eq!(coordinator.finish_delete(), Some(3));
        assert!(coordinator.begin_delete(4));
    }
}
