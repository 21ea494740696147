//! Turns untrusted listing query parameters into a [`ProductFilters`].
//!
//! Admin-only parameters are dropped unparsed for everyone else; the admin
//! flag itself always comes from the resolved session, never from the query.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::IntoParams;

use crate::error::{ProductError, ProductResult};
use crate::models::ProductType;

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

/// Raw query string of `GET /api/products`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// `DIGITAL_PRINTABLE` or `WEDDING_INVITATION`; required unless admin
    pub product_type: Option<String>,
    /// Offset returned as `nextCursor` by the previous page
    pub cursor: Option<String>,
    /// Page size, 1-100 (default 20)
    pub limit: Option<String>,
    /// Lower bound on the featured variant's price
    pub min_price: Option<String>,
    /// Upper bound on the featured variant's price
    pub max_price: Option<String>,
    /// Comma-separated; matches products sharing at least one tag
    pub tags: Option<String>,
    /// Case-insensitive match on title or description
    pub search: Option<String>,
    /// Admin only
    pub title_search: Option<String>,
    /// Admin only. RFC 3339 or YYYY-MM-DD
    pub created_after: Option<String>,
    /// Admin only
    pub created_before: Option<String>,
    /// Admin only
    pub updated_after: Option<String>,
    /// Admin only
    pub updated_before: Option<String>,
    /// Admin only
    pub active: Option<String>,
    /// `price`, `createdAt`, `updatedAt`, `title` or `active`
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum SortBy {
    Price,
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Active,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Validated listing filters
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilters {
    pub is_admin: bool,
    pub product_type: Option<ProductType>,
    pub cursor: u64,
    pub limit: u64,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub title_search: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub updated_after: Option<DateTime<Utc>>,
    pub updated_before: Option<DateTime<Utc>>,
    pub active: Option<bool>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl ProductFilters {
    /// Everything at its default: first page of 20, newest first.
    pub fn new(is_admin: bool) -> Self {
        Self {
            is_admin,
            product_type: None,
            cursor: 0,
            limit: DEFAULT_LIMIT,
            min_price: None,
            max_price: None,
            tags: Vec::new(),
            search: None,
            title_search: None,
            created_after: None,
            created_before: None,
            updated_after: None,
            updated_before: None,
            active: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }

    pub fn from_query(query: ListProductsQuery, is_admin: bool) -> ProductResult<Self> {
        let mut filters = Self::new(is_admin);

        filters.product_type = non_blank(query.product_type)
            .map(|raw| parse_enum::<ProductType>("productType", &raw))
            .transpose()?;
        if !is_admin && filters.product_type.is_none() {
            return Err(ProductError::Validation("productType is required".to_string()));
        }

        if let Some(raw) = non_blank(query.cursor) {
            // Bound to i64::MAX: the offset is bound as a Postgres bigint
            filters.cursor = raw
                .parse::<u64>()
                .ok()
                .filter(|c| i64::try_from(*c).is_ok())
                .ok_or_else(|| {
                    ProductError::Validation("cursor must be a non-negative integer".to_string())
                })?;
        }

        if let Some(raw) = non_blank(query.limit) {
            let limit = match raw.parse::<i64>() {
                Ok(limit) => Some(limit),
                // Too many digits for i64 is out of range, not malformed
                Err(_) if is_integer(&raw) => None,
                Err(_) => {
                    return Err(ProductError::Validation("limit must be an integer".to_string()));
                }
            };
            // Out of range falls back to the default instead of failing
            filters.limit = limit
                .and_then(|l| u64::try_from(l).ok())
                .filter(|l| (1..=MAX_LIMIT).contains(l))
                .unwrap_or(DEFAULT_LIMIT);
        }

        filters.min_price = parse_price("minPrice", query.min_price)?;
        filters.max_price = parse_price("maxPrice", query.max_price)?;

        filters.tags = query
            .tags
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        filters.search = non_blank(query.search);

        if let Some(raw) = non_blank(query.sort_by) {
            filters.sort_by = parse_enum("sortBy", &raw)?;
        }
        if let Some(raw) = non_blank(query.sort_order) {
            filters.sort_order = parse_enum("sortOrder", &raw)?;
        }

        if is_admin {
            filters.title_search = non_blank(query.title_search);
            filters.created_after = parse_date("createdAfter", query.created_after)?;
            filters.created_before = parse_date("createdBefore", query.created_before)?;
            filters.updated_after = parse_date("updatedAfter", query.updated_after)?;
            filters.updated_before = parse_date("updatedBefore", query.updated_before)?;
            filters.active = non_blank(query.active)
                .map(|raw| {
                    raw.parse::<bool>().map_err(|_| {
                        ProductError::Validation("active must be true or false".to_string())
                    })
                })
                .transpose()?;
        }

        Ok(filters)
    }

    /// Price lives on the featured variant, so price bounds and price
    /// ordering need the featured-variant join.
    pub fn needs_featured_price(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some() || self.sort_by == SortBy::Price
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Optional leading `+` or `-`, then ASCII digits only
fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_enum<T: FromStr>(name: &str, raw: &str) -> ProductResult<T> {
    raw.parse::<T>()
        .map_err(|_| ProductError::Validation(format!("Invalid {}: '{}'", name, raw)))
}

fn parse_price(name: &str, value: Option<String>) -> ProductResult<Option<i32>> {
    non_blank(value)
        .map(|raw| {
            raw.parse::<i32>()
                .ok()
                .filter(|p| *p >= 0)
                .ok_or_else(|| {
                    ProductError::Validation(format!("{} must be a non-negative integer", name))
                })
        })
        .transpose()
}

/// RFC 3339, or a bare date meaning midnight UTC.
fn parse_date(name: &str, value: Option<String>) -> ProductResult<Option<DateTime<Utc>>> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| ProductError::Validation(format!("{} must be a date", name)))
}
