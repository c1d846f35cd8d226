//! Filtered browser over a remote capital flow ledger.
//!
//! The crate keeps five filter dimensions (date range, category, coarse type,
//! keyword and the quick-date shortcuts) in a single [`FilterState`], turns
//! them into list requests, and applies the responses to a [`RecordTable`]
//! and to the income/expense/net [`Aggregates`].
//!
//! [`CapitalFlowPage`] is the entry point. It performs no I/O itself: every
//! operation that needs the backend returns a [`FetchTicket`] that the caller
//! runs against a [`LedgerApi`] and reports back with
//! [`CapitalFlowPage::fetch_settled`]. Only the completion of the latest
//! issued ticket is ever applied.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use flow_browser::{CapitalFlowPage, PageOptions, QuickDate};
//!
//! let mut page = CapitalFlowPage::new(PageOptions::default());
//! let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
//!
//! let first = page.mount(today).unwrap();
//! let second = page.quick_date(QuickDate::Yesterday, today).unwrap();
//! assert!(second.seq > first.seq);
//! ```
pub mod api;
pub mod catalog;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod money;
pub mod mutation;
pub mod normalize;
pub mod page;
pub mod query;
pub mod table;

pub use api::{ConfirmPrompt, LedgerApi};
pub use catalog::{CategoryCatalog, CategoryEntry};
pub use error::{BrowserError, RemoteFailure};
pub use fetch::{FetchOrchestrator, FetchStatus, FetchTicket};
pub use filter::{
    Aggregates, CoarseType, DateRange, FilterPatch, FilterState, FilterStore, QuickDate,
    TypeFilter,
};
pub use money::Amount;
pub use mutation::{DeleteOutcome, RecordDraft, delete_with_confirmation, submit_record};
pub use normalize::{FlowType, TYPES, flow_type};
pub use page::{CapitalFlowPage, PageOptions};
pub use query::{PageRequest, build_query};
pub use table::{RecordTable, TransactionRow};
