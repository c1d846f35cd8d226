use api_types::{capital_flow::CapitalFlowListResponse, category::CategoryView};
use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::{
    BrowserError, RemoteFailure,
    catalog::CategoryCatalog,
    fetch::{FetchOrchestrator, FetchStatus, FetchTicket},
    filter::{DateRange, FilterPatch, FilterState, FilterStore, QuickDate},
    mutation::{DeleteOutcome, MutationCoordinator},
    query::PageRequest,
    table::RecordTable,
};

#[derive(Clone, Copy, Debug)]
pub struct PageOptions {
    /// Zone used for day boundaries and displayed timestamps.
    pub timezone: Tz,
    pub page_size: u32,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            page_size: 20,
        }
    }
}

/// The capital flow page: filters, categories, the record table and the
/// dialog, kept consistent with each other.
///
/// Methods never perform I/O. Those that need the remote return a
/// [`FetchTicket`]; the caller runs the query and reports back through
/// [`CapitalFlowPage::fetch_settled`].
#[derive(Debug)]
pub struct CapitalFlowPage {
    options: PageOptions,
    filters: FilterStore,
    catalog: CategoryCatalog,
    table: RecordTable,
    fetch: FetchOrchestrator,
    mutations: MutationCoordinator,
    /// Page asked for by the latest issued fetch.
    requested_page: u32,
}

impl CapitalFlowPage {
    #[must_use]
    pub fn new(options: PageOptions) -> Self {
        Self {
            table: RecordTable::new(options.page_size),
            options,
            filters: FilterStore::new(),
            catalog: CategoryCatalog::new(),
            fetch: FetchOrchestrator::new(),
            mutations: MutationCoordinator::new(),
            requested_page: 1,
        }
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        self.filters.state()
    }

    #[must_use]
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    #[must_use]
    pub fn status(&self) -> &FetchStatus {
        self.fetch.status()
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.options.timezone
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<i64> {
        self.mutations.pending_delete()
    }

    /// Initial state: the current month. Categories are loaded separately.
    pub fn mount(&mut self, today: NaiveDate) -> Option<FetchTicket> {
        self.reset(today)
    }

    pub fn categories_loaded(&mut self, result: Result<Vec<CategoryView>, RemoteFailure>) {
        self.catalog.load(result);
    }

    /// Applies a filter change; re-fetches the first page when the query key changed.
    ///
    /// A key change that cannot fetch (incomplete range) voids the fetch in
    /// flight, so a response for the previous filters is never applied.
    pub fn update_filters(&mut self, patch: FilterPatch) -> Option<FetchTicket> {
        let outcome = self.filters.merge(patch);
        if outcome.refetch {
            return self.auto_fetch(self.table.first_request());
        }
        if outcome.key_changed {
            self.fetch.invalidate();
        }
        None
    }

    /// Keyword edits never fetch on their own; see [`CapitalFlowPage::search`].
    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.filters.merge(FilterPatch::new().search_keyword(keyword));
    }

    pub fn quick_date(&mut self, quick: QuickDate, today: NaiveDate) -> Option<FetchTicket> {
        self.update_filters(FilterPatch::new().date_range(Some(quick.range(today))))
    }

    /// Clears keyword and category and selects the current month.
    ///
    /// Always results in exactly one fetch, even when the filters already
    /// matched.
    pub fn reset(&mut self, today: NaiveDate) -> Option<FetchTicket> {
        let patch = FilterPatch::new()
            .search_keyword("")
            .category_id(None)
            .date_range(Some(DateRange::month_of(today)));
        self.filters.merge(patch);
        self.auto_fetch(self.table.first_request())
    }

    /// Explicit search/query action: fetches the first page with the current
    /// filters, keyword included.
    pub fn search(&mut self) -> Result<FetchTicket, BrowserError> {
        self.issue(self.table.first_request())
    }

    /// Re-fetches the page currently shown.
    pub fn refresh(&mut self) -> Result<FetchTicket, BrowserError> {
        self.issue(self.table.current_request())
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if !self.table.has_next() {
            return None;
        }
        let mut request = self.table.current_request();
        request.page += 1;
        self.auto_fetch(request)
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        if !self.table.has_prev() {
            return None;
        }
        let mut request = self.table.current_request();
        request.page -= 1;
        self.auto_fetch(request)
    }

    /// Reports the completion of fetch `seq`.
    ///
    /// Returns `Ok(true)` when applied, `Ok(false)` when the completion was
    /// stale and dropped. Failures keep the current rows.
    pub fn fetch_settled(
        &mut self,
        seq: u64,
        result: Result<CapitalFlowListResponse, RemoteFailure>,
    ) -> Result<bool, BrowserError> {
        let Some(page) = self.fetch.settle(seq, result, self.options.timezone)? else {
            return Ok(false);
        };

        self.table.replace(self.requested_page, page.rows, page.total);
        self.filters
            .merge(FilterPatch::new().aggregates(page.aggregates));
        tracing::debug!("applied fetch #{seq}: {} rows", self.table.rows().len());
        Ok(true)
    }

    /// Opens the dialog in create mode.
    pub fn open_create(&mut self) {
        self.filters.merge(
            FilterPatch::new()
                .dialog_open(true)
                .active_record(None),
        );
    }

    /// Opens the dialog on a row of the current page.
    pub fn open_edit(&mut self, id: i64) -> Result<(), BrowserError> {
        let row = self
            .table
            .find(id)
            .cloned()
            .ok_or(BrowserError::UnknownRecord(id))?;
        self.filters.merge(
            FilterPatch::new()
                .dialog_open(true)
                .active_record(Some(row)),
        );
        Ok(())
    }

    pub fn dialog_cancelled(&mut self) {
        self.filters.merge(FilterPatch::new().dialog_open(false));
    }

    /// The dialog saved its record: close it and reload at the current filters.
    pub fn dialog_succeeded(&mut self) -> Option<FetchTicket> {
        self.filters.merge(FilterPatch::new().dialog_open(false));
        self.auto_fetch(self.table.current_request())
    }

    /// Starts the delete of a row; the caller then runs
    /// [`delete_with_confirmation`](crate::delete_with_confirmation).
    ///
    /// `Ok(None)` when another delete is still outstanding.
    pub fn request_delete(&mut self, id: i64) -> Result<Option<i64>, BrowserError> {
        if self.table.find(id).is_none() {
            return Err(BrowserError::UnknownRecord(id));
        }
        Ok(self.mutations.begin_delete(id).then_some(id))
    }

    /// Reports how the delete ended. A successful delete re-fetches once at
    /// the current filters; cancellation and failure change nothing.
    pub fn delete_settled(
        &mut self,
        outcome: DeleteOutcome,
    ) -> Result<Option<FetchTicket>, BrowserError> {
        self.mutations.finish_delete();
        match outcome {
            DeleteOutcome::Cancelled => Ok(None),
            DeleteOutcome::Deleted => Ok(self.auto_fetch(self.table.current_request())),
            DeleteOutcome::Failed(err) => Err(BrowserError::Mutation(err)),
        }
    }

    fn issue(&mut self, request: PageRequest) -> Result<FetchTicket, BrowserError> {
        let ticket = self
            .fetch
            .issue(self.filters.state(), request, self.options.timezone)?;
        self.requested_page = request.page;
        Ok(ticket)
    }

    /// Fetch triggered by the page itself; an incomplete range is absorbed.
    fn auto_fetch(&mut self, request: PageRequest) -> Option<FetchTicket> {
        match self.issue(request) {
            Ok(ticket) => Some(ticket),
            Err(err) => {
                tracing::debug!("fetch skipped: {err}");
                None
            }
        }
    }
}
