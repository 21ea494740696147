//! Offset pagination: ordering, page window and the next cursor.
//!
//! The total is a `COUNT(*) OVER()` on the page query itself, so one
//! round trip yields both the page ids and the size of the full result.

use sea_orm::FromQueryResult;
use uuid::Uuid;

use crate::filters::{ProductFilters, SortBy, SortOrder};

/// One row of the page query
#[derive(Debug, Clone, FromQueryResult)]
pub struct MatchedRow {
    pub id: Uuid,
    pub total_count: i64,
}

/// Ids of one page in display order, plus the number of matches overall.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPage {
    pub ids: Vec<Uuid>,
    pub total: u64,
}

impl ProductPage {
    /// An empty page carries no window row, so its total reads as 0.
    pub fn from_rows(rows: Vec<MatchedRow>) -> Self {
        let total = rows
            .first()
            .map(|row| u64::try_from(row.total_count).unwrap_or_default())
            .unwrap_or_default();

        Self {
            ids: rows.into_iter().map(|row| row.id).collect(),
            total,
        }
    }

    /// `None` once this page reaches the end of the result set.
    pub fn next_cursor(&self, cursor: u64) -> Option<u64> {
        next_cursor(cursor, self.ids.len(), self.total)
    }
}

pub fn next_cursor(cursor: u64, page_len: usize, total: u64) -> Option<u64> {
    let next = cursor + page_len as u64;
    (next < total).then_some(next)
}

/// Column each sort key orders by. `fv` is the featured-variant projection.
pub fn sort_column(sort_by: SortBy) -> &'static str {
    match sort_by {
        SortBy::Price => "fv.price",
        SortBy::CreatedAt => "p.created_at",
        SortBy::UpdatedAt => "p.updated_at",
        SortBy::Title => "p.title",
        SortBy::Active => "p.is_active",
    }
}

fn direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

/// `p.id` breaks ties so consecutive offsets never overlap.
pub fn order_clause(filters: &ProductFilters) -> String {
    format!(
        "ORDER BY {} {}, p.id ASC",
        sort_column(filters.sort_by),
        direction(filters.sort_order)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(total: i64) -> MatchedRow {
        MatchedRow {
            id: Uuid::new_v4(),
            total_count: total,
        }
    }

    #[test]
    fn test_next_cursor_null_iff_end_reached() {
        assert_eq!(next_cursor(0, 2, 4), Some(2));
        assert_eq!(next_cursor(2, 2, 4), None);
        assert_eq!(next_cursor(0, 2, 2), None);
        assert_eq!(next_cursor(0, 0, 0), None);
        assert_eq!(next_cursor(40, 20, 61), Some(60));
        assert_eq!(next_cursor(60, 1, 61), None);
    }

    #[test]
    fn test_page_total_from_window_column() {
        let page = ProductPage::from_rows(vec![row(7), row(7)]);
        assert_eq!(page.ids.len(), 2);
        assert_eq!(page.total, 7);
        assert_eq!(page.next_cursor(0), Some(2));
        assert_eq!(page.next_cursor(5), None);
    }

    #[test]
    fn test_empty_page_past_end() {
        let page = ProductPage::from_rows(vec![]);
        assert_eq!(page.total, 0);
        assert_eq!(page.next_cursor(100), None);
    }

    #[test]
    fn test_order_clause() {
        let mut filters = ProductFilters::new(false);
        assert_eq!(order_clause(&filters), "ORDER BY p.created_at DESC, p.id ASC");

        filters.sort_by = SortBy::Price;
        filters.sort_order = SortOrder::Asc;
        assert_eq!(order_clause(&filters), "ORDER BY fv.price ASC, p.id ASC");

        filters.sort_by = SortBy::Active;
        assert_eq!(order_clause(&filters), "ORDER BY p.is_active ASC, p.id ASC");
    }
}
