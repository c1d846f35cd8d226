use api_types::capital_flow::CapitalFlowList;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::{
    BrowserError,
    filter::{FilterState, TypeFilter},
};

/// One day in milliseconds. The backend expects half-open ranges, so the
/// end date is sent as the start of the following day.
pub const ONE_DAY_MS: i64 = 86_400_000;

/// Page of the record table to load (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }
}

/// First instant of `date` in `tz`.
///
/// When midnight does not exist (DST gap) the day starts at the first valid
/// local hour after it.
#[must_use]
pub fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=3)
        .find_map(|hours| {
            tz.from_local_datetime(&(midnight + TimeDelta::hours(hours)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Builds the list request for the current filters.
///
/// Refuses to build without a complete date range.
pub fn build_query(
    state: &FilterState,
    page: PageRequest,
    tz: Tz,
) -> Result<CapitalFlowList, BrowserError> {
    let range = state.date_range.ok_or(BrowserError::IncompleteFilter)?;

    let (type_name_id, coarse_type) = match state.type_filter() {
        TypeFilter::All => (None, None),
        TypeFilter::Category(id) => (Some(id), None),
        TypeFilter::Coarse(coarse) => (None, Some(coarse.code())),
    };

    let start_date = start_of_day(range.start(), tz).timestamp_millis();
    let end_date = start_of_day(range.end(), tz).timestamp_millis() + ONE_DAY_MS;

    Ok(CapitalFlowList {
        keyword: state.search_keyword.clone(),
        type_name_id,
        coarse_type,
        start_date,
        end_date,
        page: page.page,
        page_size: page.page_size,
    })
}
