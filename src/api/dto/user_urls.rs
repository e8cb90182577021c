//! DTOs for listing a user's links.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::AliasView;
use crate::domain::repositories::{AliasQuery, AliasSort};
use crate::domain::route::RouteCodec;
use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for `GET /api/user-urls`.
///
/// Dates accept RFC 3339 timestamps or plain `YYYY-MM-DD` dates. A plain
/// `endDate` covers the whole day.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUrlsQuery {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,
}

impl UserUrlsQuery {
    /// Validates the parameters and returns `(page, limit, query)`.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `limit`: 20, capped at 100
    /// - `sortBy`: `newest`
    ///
    /// # Errors
    ///
    /// Returns a `validation_error` for page 0, limit 0, an unknown sort key,
    /// an unparseable date, or a start date after the end date.
    pub fn into_alias_query(self) -> Result<(u32, u32, AliasQuery), AppError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "field": "page" }),
            ));
        }

        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 {
            return Err(AppError::bad_request(
                "Limit must be greater than 0",
                json!({ "field": "limit" }),
            ));
        }
        let limit = limit.min(MAX_PAGE_SIZE);

        let sort = match self.sort_by.as_deref().map(str::trim) {
            None | Some("") | Some("newest") => AliasSort::Newest,
            Some("oldest") => AliasSort::Oldest,
            Some("clicks") => AliasSort::Clicks,
            Some(other) => {
                return Err(AppError::bad_request(
                    "sortBy must be one of: newest, oldest, clicks",
                    json!({ "field": "sortBy", "value": other }),
                ));
            }
        };

        let created_from = parse_bound(self.start_date.as_deref(), "startDate", false)?;
        let created_to = parse_bound(self.end_date.as_deref(), "endDate", true)?;

        if let (Some(from), Some(to)) = (created_from, created_to)
            && from > to
        {
            return Err(AppError::bad_request(
                "startDate must not be after endDate",
                json!({ "field": "startDate" }),
            ));
        }

        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok((
            page,
            limit,
            AliasQuery {
                search,
                sort,
                created_from,
                created_to,
                offset: (page as i64 - 1) * limit as i64,
                limit: limit as i64,
            },
        ))
    }
}

fn parse_bound(
    raw: Option<&str>,
    field: &str,
    end_of_day: bool,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::bad_request(
            "Dates must be YYYY-MM-DD or RFC 3339",
            json!({ "field": field, "value": raw }),
        )
    })?;

    let time = if end_of_day {
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
    } else {
        Some(NaiveTime::MIN)
    };

    Ok(time.map(|t| date.and_time(t).and_utc()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUrlItem {
    pub id: i64,
    pub original_url: String,
    pub title: String,
    pub short_url: String,
    pub short_code: String,
    pub custom_path: Option<String>,
    pub custom_domain: Option<String>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub is_custom: bool,
}

impl UserUrlItem {
    pub fn from_view(view: AliasView, codec: &RouteCodec) -> Self {
        let (short_url, is_custom) = match view.custom_route() {
            Some((prefix, path)) => (codec.custom_url(prefix, path), true),
            None => (codec.short_url(&view.short_code), false),
        };

        Self {
            id: view.id,
            title: view.display_title().to_string(),
            short_url,
            is_custom,
            original_url: view.original_url,
            short_code: view.short_code,
            custom_path: view.custom_path,
            custom_domain: view.custom_prefix,
            click_count: view.click_count,
            created_at: view.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: u32, limit: u32, total_count: i64) -> Self {
        let limit_i = i64::from(limit.max(1));
        Self {
            page,
            limit,
            total_count,
            total_pages: (total_count + limit_i - 1) / limit_i,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserUrlsResponse {
    pub urls: Vec<UserUrlItem>,
    pub pagination: PaginationMeta,
}
