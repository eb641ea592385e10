//! Pagination, filtering and sorting for the review read path.
//!
//! Raw query-string parameters arrive as [`ListParams`] and are validated
//! into a [`PageRequest`] before any store access. Invalid values are
//! rejected with a 422 rather than silently corrected; this includes a
//! `page_size` above the configured maximum.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::review::{Review, ReviewStatus},
};

/// Column the result set is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    CreatedAt,
    Rating,
}

impl SortBy {
    /// Column name as it appears in the relational backend.
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Rating => "rating",
        }
    }
}

/// Direction of the sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Raw query-string parameters for `GET /products/{id}/reviews`.
///
/// Everything is optional here; validation and defaulting happen in
/// [`PageRequest::from_params`].
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Page number as received; kept textual so malformed values surface as
    /// a 422 in the uniform envelope instead of a transport-level rejection
    pub page: Option<String>,
    pub page_size: Option<String>,
    /// Comma-separated rating values, e.g. `rating=4,5`
    pub rating: Option<String>,
    pub status: Option<String>,
    /// RFC 3339 timestamp or plain `YYYY-MM-DD` date
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// A validated page request.
///
/// # Semantics
///
/// - `ratings` is OR-combined: a review matches if its rating equals any
///   listed value; an empty set means no rating filter
/// - `status`, `date_from` and `date_to` are AND-combined with the rating
///   filter; date bounds are inclusive on `created_at`
/// - Sorting uses a single key with the review id as a stable secondary key,
///   so repeated identical calls paginate deterministically
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub ratings: Vec<i16>,
    pub status: Option<ReviewStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl PageRequest {
    /// Validate raw query parameters into a usable page request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` (HTTP 422) when:
    /// - `page` is 0
    /// - `page_size` is 0 or above `max_page_size`
    /// - any rating value is not an integer in 1..=5
    /// - `status` is not one of approved/pending/rejected
    /// - a date bound is neither RFC 3339 nor `YYYY-MM-DD`
    /// - `sort_by`/`sort_order` name an unknown column or direction
    pub fn from_params(
        params: ListParams,
        default_page_size: u32,
        max_page_size: u32,
    ) -> Result<Self, AppError> {
        let page = parse_number(params.page.as_deref(), "page", 1)?;
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".into()));
        }

        let page_size = parse_number(params.page_size.as_deref(), "page_size", default_page_size)?;
        if page_size < 1 {
            return Err(AppError::Validation("page_size must be at least 1".into()));
        }
        if page_size > max_page_size {
            return Err(AppError::Validation(format!(
                "page_size must not exceed {max_page_size}"
            )));
        }

        let ratings = match params.rating.as_deref() {
            None => Vec::new(),
            Some(raw) => parse_ratings(raw)?,
        };

        let status = match params.status.as_deref() {
            None => None,
            Some(raw) => Some(ReviewStatus::parse(raw).ok_or_else(|| {
                AppError::Validation(format!("unknown status: {raw}"))
            })?),
        };

        let date_from = params
            .date_from
            .as_deref()
            .map(|raw| parse_date_bound(raw, false))
            .transpose()?;
        let date_to = params
            .date_to
            .as_deref()
            .map(|raw| parse_date_bound(raw, true))
            .transpose()?;

        let sort_by = match params.sort_by.as_deref() {
            None | Some("created_at") => SortBy::CreatedAt,
            Some("rating") => SortBy::Rating,
            Some(other) => {
                return Err(AppError::Validation(format!("unknown sort_by: {other}")));
            }
        };

        let sort_order = match params.sort_order.as_deref() {
            None | Some("desc") => SortOrder::Desc,
            Some("asc") => SortOrder::Asc,
            Some(other) => {
                return Err(AppError::Validation(format!("unknown sort_order: {other}")));
            }
        };

        Ok(Self {
            page,
            page_size,
            ratings,
            status,
            date_from,
            date_to,
            sort_by,
            sort_order,
        })
    }

    /// Row offset for this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// Parse an optional numeric parameter, falling back to a default.
fn parse_number(raw: Option<&str>, field: &str, default: u32) -> Result<u32, AppError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| AppError::Validation(format!("{field} must be a positive integer"))),
    }
}

/// Parse a comma-separated rating filter like `4,5`.
fn parse_ratings(raw: &str) -> Result<Vec<i16>, AppError> {
    let mut ratings = Vec::new();
    for part in raw.split(',') {
        let value: i16 = part
            .trim()
            .parse()
            .map_err(|_| AppError::Validation(format!("invalid rating filter: {part}")))?;
        if !(1..=5).contains(&value) {
            return Err(AppError::Validation(format!(
                "rating filter values must be between 1 and 5, got {value}"
            )));
        }
        ratings.push(value);
    }
    Ok(ratings)
}

/// Parse a date bound as RFC 3339, falling back to a plain date.
///
/// Plain dates expand to the start of the day for `date_from` and the end of
/// the day for `date_to`, keeping both bounds inclusive.
fn parse_date_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let (h, m, s) = if end_of_day { (23, 59, 59) } else { (0, 0, 0) };
        let dt = date
            .and_hms_opt(h, m, s)
            .ok_or_else(|| AppError::Validation(format!("invalid date: {raw}")))?;
        return Ok(Utc.from_utc_datetime(&dt));
    }
    Err(AppError::Validation(format!(
        "invalid date (expected RFC 3339 or YYYY-MM-DD): {raw}"
    )))
}

/// Response body for `GET /products/{id}/reviews`.
///
/// A bounded slice of the filtered/sorted review set plus metadata
/// describing its position within the whole.
#[derive(Debug, Serialize)]
pub struct PagedReviews {
    pub reviews: Vec<Review>,
    /// Count of rows matching the filters, before pagination
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    /// `ceil(total / page_size)`
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}
