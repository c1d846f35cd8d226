//! Fetch sequencing.
//!
//! Every issued fetch gets the next sequence number. A completion is applied
//! only when its sequence is still the latest issued one, so a slow response
//! for old filters can never overwrite a newer result.
use api_types::capital_flow::{CapitalFlowList, CapitalFlowListResponse};
use chrono_tz::Tz;

use crate::{
    BrowserError, RemoteFailure,
    filter::FilterState,
    normalize::{NormalizedPage, normalize},
    query::{PageRequest, build_query},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Fetching,
    /// The latest fetch failed. Rows of the previous success stay visible.
    Error(BrowserError),
}

/// An issued request, to be handed to the remote and settled with its sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: CapitalFlowList,
}

#[derive(Debug)]
pub struct FetchOrchestrator {
    issued: u64,
    applied: u64,
    status: FetchStatus,
}

impl Default for FetchOrchestrator {
    fn default() -> Self {
        Self {
            issued: 0,
            applied: 0,
            status: FetchStatus::Idle,
        }
    }
}

impl FetchOrchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Sequence of the most recently issued fetch (0 before the first).
    #[must_use]
    pub fn latest_issued(&self) -> u64 {
        self.issued
    }

    /// Sequence of the most recently applied fetch (0 before the first).
    #[must_use]
    pub fn latest_applied(&self) -> u64 {
        self.applied
    }

    #[must_use]
    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }

    /// Builds the query and issues a new sequence number.
    ///
    /// An incomplete date range is refused and leaves the sequence untouched.
    pub fn issue(
        &mut self,
        state: &FilterState,
        page: PageRequest,
        tz: Tz,
    ) -> Result<FetchTicket, BrowserError> {
        let query = build_query(state, page, tz)?;
        self.issued += 1;
        self.status = FetchStatus::Fetching;
        tracing::debug!("issued fetch #{} for page {}", self.issued, query.page);
        Ok(FetchTicket {
            seq: self.issued,
            query,
        })
    }

    /// Voids every fetch issued so far; their completions become stale.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        self.status = FetchStatus::Idle;
        tracing::debug!("in-flight fetches voided up to #{}", self.issued);
    }

    /// Settles the fetch `seq`.
    ///
    /// Returns `Ok(None)` when the completion is stale and was discarded.
    pub fn settle(
        &mut self,
        seq: u64,
        result: Result<CapitalFlowListResponse, RemoteFailure>,
        tz: Tz,
    ) -> Result<Option<NormalizedPage>, BrowserError> {
        if !self.is_latest(seq) {
            tracing::debug!("discarding stale fetch #{seq}, latest is #{}", self.issued);
            return Ok(None);
        }

        let outcome = result
            .map_err(BrowserError::Remote)
            .and_then(|response| normalize(response, tz));

        match outcome {
            Ok(page) => {
                self.applied = seq;
                self.status = FetchStatus::Idle;
                Ok(Some(page))
            }
            Err(err) => {
                match &err {
                    BrowserError::DataIntegrity { .. } => tracing::error!("fetch #{seq}: {err}"),
                    _ => tracing::warn!("fetch #{seq}: {err}"),
                }
                self.status = FetchStatus::Error(err.clone());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DateRange, FilterPatch, FilterStore};
    use chrono::NaiveDate;

    fn ready_store() -> FilterStore {
        let mut store = FilterStore::new();
        let day = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        store.merge(FilterPatch::new().date_range(Some(DateRange::month_of(day))));
        store
    }

    fn empty_response() -> CapitalFlowListResponse {
        CapitalFlowListResponse {
            rows: Vec::new(),
            total: 0,
            income: 0,
            expense: 0,
            available: 0,
        }
    }

    #[test]
    fn incomplete_range_issues_nothing() {
        let mut fetch = FetchOrchestrator::new();
        let err = fetch
            .issue(FilterStore::new().state(), PageRequest::first(20), Tz::UTC)
            .unwrap_err();
        assert_eq!(err, BrowserError::IncompleteFilter);
        assert_eq!(fetch.latest_issued(), 0);
        assert_eq!(fetch.status(), &FetchStatus::Idle);
    }

    #[test]
    fn success_moves_back_to_idle() {
        let store = ready_store();
        let mut fetch = FetchOrchestrator::new();
        let ticket = fetch
            .issue(store.state(), PageRequest::first(20), Tz::UTC)
            .unwrap();
        assert_eq!(fetch.status(), &FetchStatus::Fetching);

        let page = fetch.settle(ticket.seq, Ok(empty_response()), Tz::UTC).unwrap();
        assert!(page.is_some());
        assert_eq!(fetch.status(), &FetchStatus::Idle);
        assert_eq!(fetch.latest_applied(), ticket.seq);
    }

    #[test]
    fn remote_failure_moves_to_error() {
        let store = ready_store();
        let mut fetch = FetchOrchestrator::new();
        let ticket = fetch
            .issue(store.state(), PageRequest::first(20), Tz::UTC)
            .unwrap();
        let failure = RemoteFailure::Transport("connection refused".to_string());

        let err = fetch.settle(ticket.seq, Err(failure.clone()), Tz::UTC).unwrap_err();
        assert_eq!(err, BrowserError::Remote(failure.clone()));
        assert_eq!(fetch.status(), &FetchStatus::Error(BrowserError::Remote(failure)));
        assert_eq!(fetch.latest_applied(), 0);
    }

    #[test]
    fn stale_completion_is_discarded_even_when_failed() {
        let store = ready_store();
        let mut fetch = FetchOrchestrator::new();
        let first = fetch
            .issue(store.state(), PageRequest::first(20), Tz::UTC)
            .unwrap();
        let second = fetch
            .issue(store.state(), PageRequest::first(20), Tz::UTC)
            .unwrap();

        let stale = fetch
            .settle(first.seq, Err(RemoteFailure::NotFound), Tz::UTC)
            .unwrap();
        assert!(stale.is_none());
        assert_eq!(fetch.status(), &FetchStatus::Fetching);

        assert!(fetch.settle(second.seq, Ok(empty_response()), Tz::UTC).unwrap().is_some());
    }

    #[test]
    fn invalidate_makes_in_flight_fetch_stale() {
        let store = ready_store();
        let mut fetch = FetchOrchestrator::new();
        let ticket = fetch
            .issue(store.state(), PageRequest::first(20), Tz::UTC)
            .unwrap();

        fetch.invalidate();
        assert_eq!(fetch.status(), &FetchStatus::Idle);
        assert!(fetch.settle(ticket.seq, Ok(empty_response()), Tz::UTC).unwrap().is_none());
        assert_eq!(fetch.latest_applied(), 0);
    }
}
